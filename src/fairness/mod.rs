// Group fairness metrics for scored binary classification
//
// Pipeline: partition by protected attribute -> per-group confusion matrix
// -> rate metrics -> disparate impact -> significance between the two
// largest groups. Every stage takes its input as an argument and returns a
// new value; nothing here does I/O or keeps state between calls.
//
// Conventions:
// - rates with a zero denominator are exactly 0
// - group order is order of first appearance in the dataset
// - "two largest groups" ties are broken by first appearance
// - no multiple-comparison correction across the two significance tests

mod confusion;
mod disparate_impact;
mod metrics;
mod partition;
mod predictive;
mod significance;
pub mod statistics;

pub use confusion::ConfusionMatrix;
pub use disparate_impact::{DisparateImpactEntry, DisparateImpactResult};
pub use metrics::{FairnessMetricSet, GroupMetrics};
pub use partition::{by_descending_size, partition, GroupSubset};
pub use predictive::{analyze_predictive_performance, PredictiveEntry, PredictiveReport};
pub use significance::{
    classification_difference, compare_largest_groups, score_difference, SignificanceReport,
    SignificanceResult, TestKind,
};
