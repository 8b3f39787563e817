//! JSON output format for audit reports
//!
//! The full [`AuditReport`] wrapped in a versioned envelope so downstream
//! tooling can detect format changes.

use crate::audit::AuditReport;
use crate::error::Result;
use serde::Serialize;

/// Format name written into every document
pub const JSON_FORMAT: &str = "fairaudit-json-v1";

/// Root JSON output structure
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput<'a> {
    /// Crate version that produced the document
    pub version: String,
    /// Format name
    pub format: String,
    pub report: &'a AuditReport,
}

impl<'a> JsonOutput<'a> {
    pub fn new(report: &'a AuditReport) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: JSON_FORMAT.to_string(),
            report,
        }
    }

    /// Serialize to a pretty-printed JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
