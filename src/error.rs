//! Error types for dataset loading, preparation and configuration
//!
//! The fairness computations themselves never fail: degenerate groups and
//! zero denominators resolve to defined values. Everything that can go wrong
//! happens before a [`Dataset`](crate::dataset::Dataset) exists.

use thiserror::Error;

/// Errors raised while loading, preparing or configuring an audit
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Missing required columns: {}", missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    #[error("Invalid value {value:?} in column '{column}' at row {row}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("CSV parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Failed to load {source_desc}: {message}")]
    Load {
        source_desc: String,
        message: String,
    },

    #[error("All data sources failed: {}", attempts.join("; "))]
    SourcesExhausted { attempts: Vec<String> },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type for audit operations
pub type Result<T> = std::result::Result<T, AuditError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message_lists_all() {
        let err = AuditError::MissingColumns {
            missing: vec!["race".to_string(), "decile_score".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Missing required columns: race, decile_score"
        );
    }

    #[test]
    fn test_invalid_value_message() {
        let err = AuditError::InvalidValue {
            row: 4,
            column: "two_year_recid".to_string(),
            value: "maybe".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("\"maybe\""));
        assert!(msg.contains("two_year_recid"));
        assert!(msg.contains("row 4"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: AuditError = io.into();
        assert!(matches!(err, AuditError::Io(_)));
    }
}
