//! Dataset sources: remote URL or local file, with one fallback
//!
//! The primary source is tried first; on failure a warning is logged and the
//! fallback is tried exactly once. Only when both fail does loading surface
//! a fatal error.

use crate::error::{AuditError, Result};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// ProPublica's two-year COMPAS export
pub const PROPUBLICA_URL: &str =
    "https://raw.githubusercontent.com/propublica/compas-analysis/master/compas-scores-two-years.csv";

/// Where a previously saved copy of the dataset lives by default
pub const DEFAULT_FALLBACK_PATH: &str = "data/compas-scores-two-years.csv";

#[cfg(feature = "remote")]
const FETCH_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(60);

/// A place raw CSV bytes can be read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Url(String),
    File(PathBuf),
}

impl DataSource {
    /// `http://` and `https://` prefixes select a URL; anything else is a path
    pub fn parse(spec: &str) -> Self {
        let spec = spec.trim();
        if spec.starts_with("http://") || spec.starts_with("https://") {
            DataSource::Url(spec.to_string())
        } else {
            DataSource::File(PathBuf::from(spec))
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, DataSource::Url(_))
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Url(url) => write!(f, "{}", url),
            DataSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Raw bytes plus where they actually came from
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub bytes: Vec<u8>,
    pub source: DataSource,
    pub used_fallback: bool,
}

/// Read all bytes from a source
pub fn fetch(source: &DataSource) -> Result<Vec<u8>> {
    match source {
        DataSource::Url(url) => fetch_url(url),
        DataSource::File(path) => fs::read(path).map_err(|e| AuditError::Load {
            source_desc: path.display().to_string(),
            message: e.to_string(),
        }),
    }
}

#[cfg(feature = "remote")]
fn fetch_url(url: &str) -> Result<Vec<u8>> {
    let load_err = |message: String| AuditError::Load {
        source_desc: url.to_string(),
        message,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| load_err(e.to_string()))?;
    let response = client
        .get(url)
        .send()
        .map_err(|e| load_err(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(load_err(format!("HTTP status {}", status)));
    }

    let bytes = response.bytes().map_err(|e| load_err(e.to_string()))?;
    Ok(bytes.to_vec())
}

#[cfg(not(feature = "remote"))]
fn fetch_url(url: &str) -> Result<Vec<u8>> {
    Err(AuditError::Load {
        source_desc: url.to_string(),
        message: "remote sources require the `remote` feature".to_string(),
    })
}

/// Load from `primary`, falling back to `fallback` once
///
/// # Example
/// ```no_run
/// use fairaudit::dataset::{load_with_fallback, DataSource};
///
/// # fn main() -> fairaudit::error::Result<()> {
/// let primary = DataSource::parse("https://example.org/compas.csv");
/// let fallback = DataSource::parse("data/compas-scores-two-years.csv");
/// let loaded = load_with_fallback(&primary, Some(&fallback))?;
/// println!("{} bytes from {}", loaded.bytes.len(), loaded.source);
/// # Ok(())
/// # }
/// ```
pub fn load_with_fallback(primary: &DataSource, fallback: Option<&DataSource>) -> Result<LoadedData> {
    let mut attempts = Vec::new();

    match fetch(primary) {
        Ok(bytes) => {
            tracing::info!(source = %primary, bytes = bytes.len(), "dataset loaded");
            return Ok(LoadedData {
                bytes,
                source: primary.clone(),
                used_fallback: false,
            });
        }
        Err(e) => {
            tracing::warn!(source = %primary, error = %e, "primary source failed");
            attempts.push(e.to_string());
        }
    }

    if let Some(fallback) = fallback {
        match fetch(fallback) {
            Ok(bytes) => {
                tracing::info!(source = %fallback, bytes = bytes.len(), "dataset loaded from fallback");
                return Ok(LoadedData {
                    bytes,
                    source: fallback.clone(),
                    used_fallback: true,
                });
            }
            Err(e) => {
                tracing::warn!(source = %fallback, error = %e, "fallback source failed");
                attempts.push(e.to_string());
            }
        }
    }

    Err(AuditError::SourcesExhausted { attempts })
}

/// Save fetched bytes, creating parent directories
pub fn save_raw(bytes: &[u8], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, bytes)?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "dataset saved");
    Ok(())
}
