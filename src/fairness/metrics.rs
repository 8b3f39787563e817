//! Per-group fairness metrics
//!
//! Every rate is a ratio in [0, 1]; a zero denominator yields exactly 0,
//! never NaN. That convention feeds straight into disparity comparisons, so
//! it is part of the contract rather than an error path.

use crate::fairness::confusion::{ratio, ConfusionMatrix};
use crate::fairness::partition::GroupSubset;
use serde::Serialize;

/// Metrics for one group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMetrics {
    pub group: String,
    pub count: usize,
    pub recidivism_rate: f64,
    pub high_risk_rate: f64,
    pub avg_score: f64,
    pub false_positive_rate: f64,
    pub false_negative_rate: f64,
    pub true_positive_rate: f64,
    pub precision: f64,
    pub confusion: ConfusionMatrix,
}

impl GroupMetrics {
    /// Derive metrics from a group's records and its confusion matrix
    pub fn compute(subset: &GroupSubset<'_>, confusion: ConfusionMatrix) -> Self {
        let count = subset.len();
        let n = count as u64;
        let recidivated = subset.records.iter().filter(|r| r.outcome).count() as u64;
        let flagged = subset.high_risk_count() as u64;
        let avg_score = if count == 0 {
            0.0
        } else {
            subset.records.iter().map(|r| r.score).sum::<f64>() / count as f64
        };

        Self {
            group: subset.name.to_string(),
            count,
            recidivism_rate: ratio(recidivated, n),
            high_risk_rate: ratio(flagged, n),
            avg_score,
            false_positive_rate: confusion.false_positive_rate(),
            false_negative_rate: confusion.false_negative_rate(),
            true_positive_rate: confusion.true_positive_rate(),
            precision: confusion.precision(),
            confusion,
        }
    }
}

/// Metrics for every group, in group order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FairnessMetricSet {
    pub groups: Vec<GroupMetrics>,
}

impl FairnessMetricSet {
    /// Compute metrics for each partitioned group
    pub fn compute(groups: &[GroupSubset<'_>]) -> Self {
        let groups = groups
            .iter()
            .map(|subset| {
                let confusion = ConfusionMatrix::from_records(subset.records.iter().copied());
                GroupMetrics::compute(subset, confusion)
            })
            .collect();
        Self { groups }
    }

    pub fn get(&self, group: &str) -> Option<&GroupMetrics> {
        self.groups.iter().find(|m| m.group == group)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GroupMetrics> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Max minus min false positive rate across groups (0 with no groups)
    pub fn fpr_range(&self) -> f64 {
        let mut rates = self.groups.iter().map(|m| m.false_positive_rate);
        let Some(first) = rates.next() else {
            return 0.0;
        };
        let (min, max) = rates.fold((first, first), |(lo, hi), r| (lo.min(r), hi.max(r)));
        max - min
    }
}
