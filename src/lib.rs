//! fairaudit - group fairness audit for risk-score datasets
//!
//! This library loads a tabular dataset (the ProPublica COMPAS export by
//! default), partitions it by a protected attribute, and computes per-group
//! error rates, disparate impact, significance tests and predictive
//! performance. Report composers render the result as Markdown, HTML, CSV
//! or JSON.

pub mod audit;
pub mod cli;
pub mod config;
pub mod csv_output;
pub mod dataset;
pub mod error;
pub mod fairness;
pub mod html_output;
pub mod json_output;
pub mod markdown_output;
