//! Per-group confusion matrices
//!
//! Predicted positive = high-risk label, actual positive = outcome recurred.

use crate::dataset::Record;
use serde::Serialize;

/// Outcome counts for one group; the four cells sum to the group size
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    pub true_positives: u64,
    pub false_positives: u64,
    pub true_negatives: u64,
    pub false_negatives: u64,
}

impl ConfusionMatrix {
    /// Count the four (predicted × actual) conjunctions over `records`
    ///
    /// An empty iterator yields the all-zero matrix.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let mut matrix = Self::default();
        for record in records {
            match (record.high_risk, record.outcome) {
                (true, true) => matrix.true_positives += 1,
                (true, false) => matrix.false_positives += 1,
                (false, false) => matrix.true_negatives += 1,
                (false, true) => matrix.false_negatives += 1,
            }
        }
        matrix
    }

    pub fn total(&self) -> u64 {
        self.true_positives + self.false_positives + self.true_negatives + self.false_negatives
    }

    /// FP / (FP + TN)
    pub fn false_positive_rate(&self) -> f64 {
        ratio(self.false_positives, self.false_positives + self.true_negatives)
    }

    /// FN / (FN + TP)
    pub fn false_negative_rate(&self) -> f64 {
        ratio(self.false_negatives, self.false_negatives + self.true_positives)
    }

    /// TP / (TP + FN)
    pub fn true_positive_rate(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }

    /// TP / (TP + FP)
    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }
}

/// `num / den`, defined as exactly 0 when the denominator is 0
pub(crate) fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}
