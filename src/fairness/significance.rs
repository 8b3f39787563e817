//! Significance tests between the two largest groups
//!
//! Two independent tests, each judged at the configured alpha with no
//! correction for multiple comparisons:
//! - score distributions: two-sided Mann-Whitney U on raw scores
//! - classification rates: chi-square on the flagged / not-flagged 2x2 table

use crate::fairness::partition::{by_descending_size, GroupSubset};
use crate::fairness::statistics::{chi2_contingency_2x2, mann_whitney_u, TestOutcome};
use serde::Serialize;

/// Which test produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    MannWhitneyU,
    ChiSquare,
}

impl TestKind {
    pub fn label(&self) -> &'static str {
        match self {
            TestKind::MannWhitneyU => "Mann-Whitney U",
            TestKind::ChiSquare => "Chi-square (Yates)",
        }
    }
}

/// One comparison between two groups
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignificanceResult {
    pub groups_compared: (String, String),
    pub test: TestKind,
    pub statistic: f64,
    pub p_value: f64,
    pub significant: bool,
}

impl SignificanceResult {
    fn new(first: &str, second: &str, test: TestKind, outcome: TestOutcome, alpha: f64) -> Self {
        Self {
            groups_compared: (first.to_string(), second.to_string()),
            test,
            statistic: outcome.statistic,
            p_value: outcome.p_value,
            significant: outcome.p_value < alpha,
        }
    }

    /// "A vs B"
    pub fn comparison_label(&self) -> String {
        format!("{} vs {}", self.groups_compared.0, self.groups_compared.1)
    }
}

/// Both tests for the two largest groups
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignificanceReport {
    pub score_difference: SignificanceResult,
    pub classification_difference: SignificanceResult,
    pub significance_level: f64,
}

/// Test the two largest groups against each other
///
/// Returns `None` when there are fewer than two groups; that step is then
/// skipped and every other metric stays valid.
pub fn compare_largest_groups(groups: &[GroupSubset<'_>], alpha: f64) -> Option<SignificanceReport> {
    let sorted = by_descending_size(groups);
    let [first, second] = sorted.get(..2)? else {
        return None;
    };
    tracing::debug!(
        first = first.name,
        first_count = first.len(),
        second = second.name,
        second_count = second.len(),
        "testing largest groups"
    );

    Some(SignificanceReport {
        score_difference: score_difference(first, second, alpha),
        classification_difference: classification_difference(first, second, alpha),
        significance_level: alpha,
    })
}

/// Mann-Whitney U on the raw scores of two groups
pub fn score_difference(a: &GroupSubset<'_>, b: &GroupSubset<'_>, alpha: f64) -> SignificanceResult {
    let outcome = mann_whitney_u(&a.scores(), &b.scores());
    SignificanceResult::new(a.name, b.name, TestKind::MannWhitneyU, outcome, alpha)
}

/// Chi-square on flagged / not-flagged counts of two groups
pub fn classification_difference(
    a: &GroupSubset<'_>,
    b: &GroupSubset<'_>,
    alpha: f64,
) -> SignificanceResult {
    let row = |g: &GroupSubset<'_>| {
        let flagged = g.high_risk_count();
        [flagged as f64, (g.len() - flagged) as f64]
    };
    let outcome = chi2_contingency_2x2([row(a), row(b)]);
    SignificanceResult::new(a.name, b.name, TestKind::ChiSquare, outcome, alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Record;
    use crate::fairness::partition::partition;

    fn group_records(group: &str, scores: &[f64]) -> Vec<Record> {
        scores
            .iter()
            .map(|&s| Record::new(group, false, s, 7.0))
            .collect()
    }

    #[test]
    fn test_fewer_than_two_groups_skipped() {
        let records = group_records("Only", &[1.0, 2.0, 3.0]);
        let groups = partition(&records);
        assert!(compare_largest_groups(&groups, 0.05).is_none());
        assert!(compare_largest_groups(&[], 0.05).is_none());
    }

    #[test]
    fn test_picks_two_largest_in_order() {
        let mut records = group_records("Small", &[5.0]);
        records.extend(group_records("Mid", &[1.0, 2.0, 3.0]));
        records.extend(group_records("Big", &[4.0, 5.0, 6.0, 7.0]));
        let groups = partition(&records);

        let report = compare_largest_groups(&groups, 0.05).unwrap();
        assert_eq!(
            report.score_difference.groups_compared,
            ("Big".to_string(), "Mid".to_string())
        );
        assert_eq!(report.score_difference.comparison_label(), "Big vs Mid");
        assert_eq!(report.classification_difference.test, TestKind::ChiSquare);
    }

    #[test]
    fn test_separated_groups_significant() {
        let mut records = group_records("A", &[1.0; 5]);
        records.extend(group_records("B", &[9.0; 5]));
        let groups = partition(&records);

        let report = compare_largest_groups(&groups, 0.05).unwrap();
        assert!(report.score_difference.significant);
        assert!((report.score_difference.p_value - 0.003976751709788652).abs() < 1e-9);
        // [[0, 5], [5, 0]] flagged table
        assert!((report.classification_difference.statistic - 6.4).abs() < 1e-12);
        assert!(report.classification_difference.significant);
    }

    #[test]
    fn test_identical_groups_not_significant() {
        let scores = [1.0, 3.0, 3.0, 5.0, 7.0, 8.0, 9.0, 2.0, 4.0, 10.0];
        let mut records = group_records("A", &scores);
        records.extend(group_records("B", &scores));
        let groups = partition(&records);

        let report = compare_largest_groups(&groups, 0.05).unwrap();
        assert!(!report.score_difference.significant);
        assert_eq!(report.score_difference.statistic, 50.0);
        assert_eq!(report.classification_difference.p_value, 1.0);
    }

    #[test]
    fn test_boundary_is_strict() {
        let result = SignificanceResult::new(
            "A",
            "B",
            TestKind::ChiSquare,
            TestOutcome {
                statistic: 3.84,
                p_value: 0.05,
            },
            0.05,
        );
        assert!(!result.significant);
    }
}
