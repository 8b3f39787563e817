//! Disparate impact (four-fifths rule)
//!
//! Each group's high-risk rate is divided by the highest rate observed in
//! the same dataset. No external reference population is involved.

use crate::fairness::metrics::FairnessMetricSet;
use serde::Serialize;

/// Disparate impact for one group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisparateImpactEntry {
    pub group: String,
    /// Fraction of the group flagged high risk
    pub rate: f64,
    /// `rate / max_rate`, or 0 when nobody in the dataset is flagged
    pub ratio: f64,
    /// `ratio >= threshold`
    pub passes_80_rule: bool,
}

/// Disparate impact across all groups
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisparateImpactResult {
    pub entries: Vec<DisparateImpactEntry>,
    pub max_rate: f64,
    pub threshold: f64,
}

impl DisparateImpactResult {
    /// Evaluate `(group, rate)` pairs against `threshold`
    ///
    /// # Example
    /// ```
    /// use fairaudit::fairness::DisparateImpactResult;
    ///
    /// let rates = vec![("A".to_string(), 0.2), ("B".to_string(), 0.5)];
    /// let di = DisparateImpactResult::evaluate(&rates, 0.8);
    /// assert_eq!(di.get("A").unwrap().ratio, 0.4);
    /// assert!(!di.get("A").unwrap().passes_80_rule);
    /// assert_eq!(di.get("B").unwrap().ratio, 1.0);
    /// ```
    pub fn evaluate(rates: &[(String, f64)], threshold: f64) -> Self {
        let max_rate = rates.iter().map(|(_, r)| *r).fold(0.0, f64::max);

        let entries = rates
            .iter()
            .map(|(group, rate)| {
                let ratio = if max_rate > 0.0 { rate / max_rate } else { 0.0 };
                DisparateImpactEntry {
                    group: group.clone(),
                    rate: *rate,
                    ratio,
                    passes_80_rule: ratio >= threshold,
                }
            })
            .collect();

        Self {
            entries,
            max_rate,
            threshold,
        }
    }

    /// Evaluate using each group's high-risk rate
    pub fn from_metrics(metrics: &FairnessMetricSet, threshold: f64) -> Self {
        let rates: Vec<(String, f64)> = metrics
            .iter()
            .map(|m| (m.group.clone(), m.high_risk_rate))
            .collect();
        Self::evaluate(&rates, threshold)
    }

    pub fn get(&self, group: &str) -> Option<&DisparateImpactEntry> {
        self.entries.iter().find(|e| e.group == group)
    }

    /// Groups below the threshold, in group order
    pub fn failing_groups(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| !e.passes_80_rule)
            .map(|e| e.group.as_str())
            .collect()
    }

    pub fn all_pass(&self) -> bool {
        self.entries.iter().all(|e| e.passes_80_rule)
    }
}
