//! CLI argument parsing for fairaudit

use crate::config::{AuditConfig, ScoreBasis};
use crate::dataset::source::{DataSource, DEFAULT_FALLBACK_PATH, PROPUBLICA_URL};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// What gets printed to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary (default)
    Text,
    /// JSON format for machine parsing
    Json,
    /// CSV format for spreadsheet analysis
    Csv,
    /// Full Markdown report
    Markdown,
    /// Self-contained HTML report
    Html,
}

/// Score basis for per-group AUC
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AucBasis {
    /// Rank by the raw risk score
    RawScore,
    /// Rank by the 0/1 high-risk label
    Binarized,
}

impl From<AucBasis> for ScoreBasis {
    fn from(basis: AucBasis) -> Self {
        match basis {
            AucBasis::RawScore => ScoreBasis::RawScore,
            AucBasis::Binarized => ScoreBasis::Binarized,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "fairaudit")]
#[command(version)]
#[command(about = "Group fairness audit for risk-score datasets such as COMPAS", long_about = None)]
pub struct Cli {
    /// Primary data source (URL or file path)
    #[arg(short, long, value_name = "URL|PATH", default_value = PROPUBLICA_URL)]
    pub source: String,

    /// Fallback data source tried once if the primary fails
    #[arg(long, value_name = "URL|PATH", conflicts_with = "no_fallback")]
    pub fallback: Option<String>,

    /// Do not try a fallback source
    #[arg(long = "no-fallback")]
    pub no_fallback: bool,

    /// Save the raw downloaded CSV to this path
    #[arg(long = "save-dataset", value_name = "PATH")]
    pub save_dataset: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Protected attribute column
    #[arg(long = "group-column", value_name = "NAME")]
    pub group_column: Option<String>,

    /// Binary outcome column
    #[arg(long = "outcome-column", value_name = "NAME")]
    pub outcome_column: Option<String>,

    /// Risk score column
    #[arg(long = "score-column", value_name = "NAME")]
    pub score_column: Option<String>,

    /// Scores at or above this are labelled high risk (default: 7)
    #[arg(long = "high-risk-threshold", value_name = "SCORE")]
    pub high_risk_threshold: Option<f64>,

    /// Disparate impact pass threshold (default: 0.8)
    #[arg(long = "di-threshold", value_name = "RATIO")]
    pub di_threshold: Option<f64>,

    /// Significance level for hypothesis tests (default: 0.05)
    #[arg(long = "alpha", value_name = "ALPHA")]
    pub alpha: Option<f64>,

    /// Score basis for per-group AUC
    #[arg(long = "auc-basis", value_enum)]
    pub auc_basis: Option<AucBasis>,

    /// Directory for report files
    #[arg(short = 'o', long = "output-dir", value_name = "DIR", default_value = "results")]
    pub output_dir: PathBuf,

    /// Output format printed to stdout
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Do not write report files
    #[arg(long = "no-files")]
    pub no_files: bool,

    /// Enable debug tracing on stderr
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    pub fn primary_source(&self) -> DataSource {
        DataSource::parse(&self.source)
    }

    /// Explicit fallback, the bundled default, or none with `--no-fallback`
    pub fn fallback_source(&self) -> Option<DataSource> {
        if self.no_fallback {
            return None;
        }
        Some(DataSource::parse(
            self.fallback.as_deref().unwrap_or(DEFAULT_FALLBACK_PATH),
        ))
    }

    /// Overwrite config values with any flags given on the command line
    pub fn apply_overrides(&self, config: &mut AuditConfig) {
        if let Some(name) = &self.group_column {
            config.columns.group = name.clone();
        }
        if let Some(name) = &self.outcome_column {
            config.columns.outcome = name.clone();
        }
        if let Some(name) = &self.score_column {
            config.columns.score = name.clone();
        }
        if let Some(t) = self.high_risk_threshold {
            config.high_risk_threshold = t;
        }
        if let Some(t) = self.di_threshold {
            config.di_threshold = t;
        }
        if let Some(alpha) = self.alpha {
            config.significance_level = alpha;
        }
        if let Some(basis) = self.auc_basis {
            config.auc_basis = basis.into();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["fairaudit"]);
        assert_eq!(cli.source, PROPUBLICA_URL);
        assert_eq!(cli.output_dir, PathBuf::from("results"));
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(!cli.no_files);
        assert!(!cli.debug);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_default_fallback() {
        let cli = Cli::parse_from(["fairaudit"]);
        assert_eq!(
            cli.fallback_source(),
            Some(DataSource::File(PathBuf::from(DEFAULT_FALLBACK_PATH)))
        );
    }

    #[test]
    fn test_cli_no_fallback() {
        let cli = Cli::parse_from(["fairaudit", "--no-fallback"]);
        assert!(cli.fallback_source().is_none());
    }

    #[test]
    fn test_cli_fallback_conflicts_with_no_fallback() {
        let result = Cli::try_parse_from(["fairaudit", "--fallback", "x.csv", "--no-fallback"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_source_file() {
        let cli = Cli::parse_from(["fairaudit", "-s", "data/local.csv"]);
        assert_eq!(
            cli.primary_source(),
            DataSource::File(PathBuf::from("data/local.csv"))
        );
    }

    #[test]
    fn test_cli_format_values() {
        for (arg, expected) in [
            ("json", OutputFormat::Json),
            ("csv", OutputFormat::Csv),
            ("markdown", OutputFormat::Markdown),
            ("html", OutputFormat::Html),
        ] {
            let cli = Cli::parse_from(["fairaudit", "--format", arg]);
            assert_eq!(cli.format, expected);
        }
        assert!(Cli::try_parse_from(["fairaudit", "--format", "xml"]).is_err());
    }

    #[test]
    fn test_cli_no_overrides_keeps_config() {
        let cli = Cli::parse_from(["fairaudit"]);
        let mut config = AuditConfig {
            di_threshold: 0.9,
            ..AuditConfig::default()
        };
        cli.apply_overrides(&mut config);
        assert_eq!(config.di_threshold, 0.9);
        assert_eq!(config.columns.group, "race");
    }

    #[test]
    fn test_cli_overrides_applied() {
        let cli = Cli::parse_from([
            "fairaudit",
            "--group-column",
            "sex",
            "--score-column",
            "v_decile_score",
            "--high-risk-threshold",
            "5",
            "--alpha",
            "0.01",
            "--auc-basis",
            "binarized",
        ]);
        let mut config = AuditConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.columns.group, "sex");
        assert_eq!(config.columns.outcome, "two_year_recid");
        assert_eq!(config.columns.score, "v_decile_score");
        assert_eq!(config.high_risk_threshold, 5.0);
        assert_eq!(config.significance_level, 0.01);
        assert_eq!(config.auc_basis, ScoreBasis::Binarized);
    }
}
