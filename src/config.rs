//! Audit configuration
//!
//! Thresholds are parameters, not constants, so the same pipeline can audit
//! any scored binary-classification dataset. Values come from (lowest to
//! highest precedence) the defaults, a TOML file, and CLI flags.
//!
//! # Example fairaudit.toml
//!
//! ```toml
//! high_risk_threshold = 7.0
//! di_threshold = 0.8
//! significance_level = 0.05
//! auc_basis = "raw_score"
//!
//! [columns]
//! group = "race"
//! outcome = "two_year_recid"
//! score = "decile_score"
//! ```

use crate::error::{AuditError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Names of the three columns the audit requires
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnSpec {
    /// Protected attribute used for grouping
    pub group: String,
    /// Binary ground-truth outcome (1 = event recurred)
    pub outcome: String,
    /// Raw risk score
    pub score: String,
}

impl Default for ColumnSpec {
    fn default() -> Self {
        Self {
            group: "race".to_string(),
            outcome: "two_year_recid".to_string(),
            score: "decile_score".to_string(),
        }
    }
}

impl ColumnSpec {
    /// Column names in the order group, outcome, score
    pub fn names(&self) -> [&str; 3] {
        [&self.group, &self.outcome, &self.score]
    }
}

/// Which score the predictive-performance analysis ranks by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBasis {
    /// The raw (ordinal) risk score
    #[default]
    RawScore,
    /// The binarized high-risk label as a 0/1 score
    Binarized,
}

/// Configuration for a fairness audit
///
/// # Example
/// ```
/// use fairaudit::config::AuditConfig;
///
/// let config = AuditConfig::default();
/// assert_eq!(config.high_risk_threshold, 7.0);
/// assert_eq!(config.di_threshold, 0.8);
/// assert_eq!(config.significance_level, 0.05);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Required column names
    pub columns: ColumnSpec,

    /// Scores at or above this value are labelled high risk
    pub high_risk_threshold: f64,

    /// Minimum ratio to the most-flagged group's rate (four-fifths rule)
    pub di_threshold: f64,

    /// Alpha for both significance tests (no multiple-comparison correction)
    pub significance_level: f64,

    /// FPR range above which the report warns about an FPR disparity
    pub fpr_disparity_threshold: f64,

    /// Groups must have strictly more rows than this to get AUC/calibration
    pub min_group_size_for_performance: usize,

    /// Score used for AUC
    pub auc_basis: ScoreBasis,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            columns: ColumnSpec::default(),
            high_risk_threshold: 7.0,
            di_threshold: 0.8,
            significance_level: 0.05,
            fpr_disparity_threshold: 0.1,
            min_group_size_for_performance: 10,
            auc_basis: ScoreBasis::RawScore,
        }
    }
}

impl AuditConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            AuditError::InvalidConfig(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string; missing keys take defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.high_risk_threshold.is_finite() {
            return Err(AuditError::InvalidConfig(format!(
                "high_risk_threshold must be finite, got {}",
                self.high_risk_threshold
            )));
        }

        if !(self.di_threshold > 0.0 && self.di_threshold <= 1.0) {
            return Err(AuditError::InvalidConfig(format!(
                "di_threshold must be in (0, 1], got {}",
                self.di_threshold
            )));
        }

        if !(self.significance_level > 0.0 && self.significance_level < 1.0) {
            return Err(AuditError::InvalidConfig(format!(
                "significance_level must be in (0, 1), got {}",
                self.significance_level
            )));
        }

        if self.fpr_disparity_threshold.is_nan() || self.fpr_disparity_threshold < 0.0 {
            return Err(AuditError::InvalidConfig(format!(
                "fpr_disparity_threshold must be non-negative, got {}",
                self.fpr_disparity_threshold
            )));
        }

        let names = self.columns.names();
        if names.iter().any(|n| n.trim().is_empty()) {
            return Err(AuditError::InvalidConfig(
                "column names must not be empty".to_string(),
            ));
        }
        if names[0] == names[1] || names[0] == names[2] || names[1] == names[2] {
            return Err(AuditError::InvalidConfig(format!(
                "column names must be distinct, got {:?}",
                names
            )));
        }

        Ok(())
    }
}
