//! Audit pipeline: one prepared dataset in, one report out
//!
//! [`run_audit`] partitions the dataset once and derives every result from
//! that single partition. It performs no I/O and is deterministic, so two
//! runs over the same dataset and configuration compare equal.

use crate::config::AuditConfig;
use crate::dataset::Dataset;
use crate::fairness::statistics::{summarize_scores, ScoreSummary};
use crate::fairness::{
    analyze_predictive_performance, by_descending_size, compare_largest_groups, partition,
    DisparateImpactResult, FairnessMetricSet, PredictiveReport, SignificanceReport,
};
use serde::Serialize;

/// Size of one group in the dataset summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupCount {
    pub group: String,
    pub count: usize,
}

/// Dataset-level facts shown ahead of the per-group results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub total_records: usize,
    pub dropped_rows: usize,
    /// Descending by count, ties in order of first appearance
    pub group_counts: Vec<GroupCount>,
    pub overall_recidivism_rate: f64,
    pub score_summary: Option<ScoreSummary>,
    pub source: String,
    pub fingerprint: String,
}

impl DatasetSummary {
    pub fn group_count(&self) -> usize {
        self.group_counts.len()
    }
}

/// Everything one audit run produces
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditReport {
    pub summary: DatasetSummary,
    pub metrics: FairnessMetricSet,
    pub disparate_impact: DisparateImpactResult,
    pub predictive: PredictiveReport,
    /// `None` when fewer than two groups are present
    pub significance: Option<SignificanceReport>,
    pub fpr_range: f64,
    pub config: AuditConfig,
}

impl AuditReport {
    /// Groups failing the four-fifths rule
    pub fn failing_groups(&self) -> Vec<&str> {
        self.disparate_impact.failing_groups()
    }

    pub fn bias_detected(&self) -> bool {
        !self.failing_groups().is_empty()
    }

    /// FPR range strictly above the configured disparity threshold
    pub fn has_fpr_disparity(&self) -> bool {
        self.fpr_range > self.config.fpr_disparity_threshold
    }
}

/// Run the full audit over a prepared dataset
pub fn run_audit(dataset: &Dataset, config: &AuditConfig) -> AuditReport {
    let groups = partition(dataset.records());
    tracing::info!(
        records = dataset.len(),
        groups = groups.len(),
        "running fairness audit"
    );

    let group_counts = by_descending_size(&groups)
        .into_iter()
        .map(|g| GroupCount {
            group: g.name.to_string(),
            count: g.len(),
        })
        .collect();
    let scores: Vec<f64> = dataset.records().iter().map(|r| r.score).collect();

    let summary = DatasetSummary {
        total_records: dataset.len(),
        dropped_rows: dataset.dropped_rows(),
        group_counts,
        overall_recidivism_rate: dataset.overall_recidivism_rate(),
        score_summary: summarize_scores(&scores),
        source: dataset.origin().to_string(),
        fingerprint: dataset.fingerprint().to_string(),
    };

    let metrics = FairnessMetricSet::compute(&groups);
    let disparate_impact = DisparateImpactResult::from_metrics(&metrics, config.di_threshold);
    let predictive = analyze_predictive_performance(
        &groups,
        config.auc_basis,
        config.min_group_size_for_performance,
    );
    let significance = compare_largest_groups(&groups, config.significance_level);
    if significance.is_none() {
        tracing::warn!("fewer than two groups; significance testing skipped");
    }
    let fpr_range = metrics.fpr_range();

    tracing::debug!(
        failing = disparate_impact.failing_groups().len(),
        fpr_range,
        "audit complete"
    );

    AuditReport {
        summary,
        metrics,
        disparate_impact,
        predictive,
        significance,
        fpr_range,
        config: config.clone(),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::dataset::Record;

    /// Two groups of 12 where "Group <A>" is flagged far less often
    pub(crate) fn sample_report() -> AuditReport {
        let mut records = Vec::new();
        for i in 0..12 {
            records.push(Record::new("Group <A>", i % 2 == 0, (i % 10 + 1) as f64, 7.0));
        }
        for i in 0..12 {
            records.push(Record::new("B", i % 3 != 0, (10 - i % 5) as f64, 7.0));
        }
        run_audit(&Dataset::from_records(records), &AuditConfig::default())
    }

    pub(crate) fn single_group_report() -> AuditReport {
        let records = vec![
            Record::new("Only", true, 8.0, 7.0),
            Record::new("Only", false, 3.0, 7.0),
        ];
        run_audit(&Dataset::from_records(records), &AuditConfig::default())
    }
}
