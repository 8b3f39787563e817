//! Predictive performance per group: ROC AUC and calibration
//!
//! Calibration here is the observed recurrence rate among records labelled
//! high risk. Whether AUC ranks by the raw score or by the high-risk label is
//! a configuration choice ([`ScoreBasis`]).

use crate::config::ScoreBasis;
use crate::fairness::partition::GroupSubset;
use crate::fairness::statistics::roc_auc;
use serde::Serialize;

/// Predictive performance for one group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictiveEntry {
    pub group: String,
    pub sample_size: usize,
    /// `None` when the group contains only one outcome class
    pub auc_score: Option<f64>,
    pub calibration: f64,
}

/// Predictive performance for every sufficiently large group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictiveReport {
    pub entries: Vec<PredictiveEntry>,
    pub basis: ScoreBasis,
    pub min_group_size: usize,
}

impl PredictiveReport {
    pub fn get(&self, group: &str) -> Option<&PredictiveEntry> {
        self.entries.iter().find(|e| e.group == group)
    }
}

/// Analyze groups with strictly more than `min_group_size` records
pub fn analyze_predictive_performance(
    groups: &[GroupSubset<'_>],
    basis: ScoreBasis,
    min_group_size: usize,
) -> PredictiveReport {
    let entries = groups
        .iter()
        .filter(|g| g.len() > min_group_size)
        .map(|g| evaluate_group(g, basis))
        .collect();

    PredictiveReport {
        entries,
        basis,
        min_group_size,
    }
}

fn evaluate_group(group: &GroupSubset<'_>, basis: ScoreBasis) -> PredictiveEntry {
    let scores: Vec<f64> = group
        .records
        .iter()
        .map(|r| match basis {
            ScoreBasis::RawScore => r.score,
            ScoreBasis::Binarized => f64::from(u8::from(r.high_risk)),
        })
        .collect();
    let labels: Vec<bool> = group.records.iter().map(|r| r.outcome).collect();

    let flagged = group.high_risk_count();
    let flagged_recurred = group
        .records
        .iter()
        .filter(|r| r.high_risk && r.outcome)
        .count();
    let calibration = if flagged == 0 {
        0.0
    } else {
        flagged_recurred as f64 / flagged as f64
    };

    PredictiveEntry {
        group: group.name.to_string(),
        sample_size: group.len(),
        auc_score: roc_auc(&scores, &labels),
        calibration,
    }
}
