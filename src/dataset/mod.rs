//! Dataset loading and preparation
//!
//! Turns raw CSV bytes into immutable [`Record`]s: required columns are
//! checked, rows with a missing required value are dropped, the outcome is
//! parsed as binary, and the high-risk label is derived once from the score.

pub mod csv;
pub mod source;

use crate::config::ColumnSpec;
use crate::error::{AuditError, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};

pub use self::csv::{parse_csv, RawRow, RawTable};
pub use self::source::{load_with_fallback, save_raw, DataSource, LoadedData};

/// Values treated as missing, in addition to empty / whitespace-only fields
const MISSING_MARKERS: &[&str] = &["NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

/// One retained row of the dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// Protected attribute value
    pub group: String,
    /// Ground truth: did the event recur within the observation window
    pub outcome: bool,
    /// Raw risk score
    pub score: f64,
    /// Binarized label: `score >= high_risk_threshold`
    pub high_risk: bool,
}

impl Record {
    /// Build a record, deriving the high-risk label from `threshold`
    pub fn new(group: impl Into<String>, outcome: bool, score: f64, threshold: f64) -> Self {
        Self {
            group: group.into(),
            outcome,
            score,
            high_risk: score >= threshold,
        }
    }
}

/// Prepared, read-only dataset for one audit run
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    records: Vec<Record>,
    dropped_rows: usize,
    origin: String,
    fingerprint: String,
}

impl Dataset {
    /// Wrap already-built records (tests, benchmarks, library callers)
    pub fn from_records(records: Vec<Record>) -> Self {
        Self {
            records,
            dropped_rows: 0,
            origin: "in-memory".to_string(),
            fingerprint: String::new(),
        }
    }

    /// Parse and prepare raw CSV bytes
    pub fn from_csv_bytes(
        bytes: &[u8],
        columns: &ColumnSpec,
        high_risk_threshold: f64,
        origin: impl Into<String>,
    ) -> Result<Self> {
        let text = String::from_utf8_lossy(bytes);
        let table = parse_csv(&text)?;
        let mut dataset = Self::prepare(&table, columns, high_risk_threshold)?;
        dataset.origin = origin.into();
        dataset.fingerprint = fingerprint(bytes);
        Ok(dataset)
    }

    /// Prepare a parsed table
    ///
    /// Fails with [`AuditError::MissingColumns`] before looking at any row if
    /// a required column is absent.
    pub fn prepare(table: &RawTable, columns: &ColumnSpec, high_risk_threshold: f64) -> Result<Self> {
        let missing: Vec<String> = columns
            .names()
            .iter()
            .filter(|name| table.column_index(name).is_none())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(AuditError::MissingColumns { missing });
        }

        // Presence checked above
        let group_idx = table.column_index(&columns.group).unwrap_or_default();
        let outcome_idx = table.column_index(&columns.outcome).unwrap_or_default();
        let score_idx = table.column_index(&columns.score).unwrap_or_default();

        let mut records = Vec::with_capacity(table.rows.len());
        let mut dropped_rows = 0;

        for row in &table.rows {
            // Short rows read as missing
            let field = |idx: usize| row.fields.get(idx).map(String::as_str).unwrap_or("");
            let (group, outcome, score) = (field(group_idx), field(outcome_idx), field(score_idx));

            if is_missing(group) || is_missing(outcome) || is_missing(score) {
                dropped_rows += 1;
                continue;
            }

            let outcome = parse_outcome(outcome).ok_or_else(|| AuditError::InvalidValue {
                row: row.line,
                column: columns.outcome.clone(),
                value: outcome.to_string(),
            })?;
            let score = parse_score(score).ok_or_else(|| AuditError::InvalidValue {
                row: row.line,
                column: columns.score.clone(),
                value: score.to_string(),
            })?;

            records.push(Record::new(group.trim(), outcome, score, high_risk_threshold));
        }

        if dropped_rows > 0 {
            tracing::debug!(dropped_rows, "dropped rows with missing required values");
        }

        Ok(Self {
            records,
            dropped_rows,
            origin: "in-memory".to_string(),
            fingerprint: String::new(),
        })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows removed because a required field was missing
    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    /// Human-readable description of where the data came from
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Hex SHA-256 of the raw input bytes (empty for in-memory datasets)
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Fraction of records whose outcome recurred (0 when empty)
    pub fn overall_recidivism_rate(&self) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        let recurred = self.records.iter().filter(|r| r.outcome).count();
        recurred as f64 / self.records.len() as f64
    }
}

fn is_missing(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || MISSING_MARKERS.contains(&value)
}

fn parse_outcome(value: &str) -> Option<bool> {
    let value = value.trim();
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" => return Some(true),
        "0" | "false" => return Some(false),
        _ => {}
    }
    match value.parse::<f64>() {
        Ok(v) if v == 1.0 => Some(true),
        Ok(v) if v == 0.0 => Some(false),
        _ => None,
    }
}

fn parse_score(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn fingerprint(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
