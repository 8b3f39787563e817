use anyhow::{Context, Result};
use clap::Parser;
use fairaudit::audit::{run_audit, AuditReport};
use fairaudit::cli::{Cli, OutputFormat};
use fairaudit::config::AuditConfig;
use fairaudit::csv_output::CsvOutput;
use fairaudit::dataset::{load_with_fallback, save_raw, Dataset};
use fairaudit::html_output::HtmlOutput;
use fairaudit::json_output::JsonOutput;
use fairaudit::markdown_output::MarkdownOutput;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const MARKDOWN_REPORT: &str = "compas_bias_audit_report.md";
const HTML_REPORT: &str = "compas_bias_audit_report.html";
const METRICS_CSV: &str = "fairness_metrics.csv";
const AUDIT_JSON: &str = "audit.json";

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Defaults, then the config file, then command-line flags
fn build_config(args: &Cli) -> Result<AuditConfig> {
    let mut config = match &args.config {
        Some(path) => AuditConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AuditConfig::default(),
    };
    args.apply_overrides(&mut config);
    config.validate()?;
    Ok(config)
}

/// Write every report file into `dir`, returning the paths written
fn write_reports(report: &AuditReport, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let outputs = [
        (MARKDOWN_REPORT, MarkdownOutput::new(report).to_markdown()),
        (HTML_REPORT, HtmlOutput::new(report).to_html()),
        (METRICS_CSV, CsvOutput::new(report).to_csv()),
        (AUDIT_JSON, JsonOutput::new(report).to_json()?),
    ];

    let mut written = Vec::with_capacity(outputs.len());
    for (name, content) in outputs {
        let path = dir.join(name);
        fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}

/// Short human-readable summary
fn print_summary(report: &AuditReport, written: &[PathBuf]) {
    println!("COMPAS bias audit");
    println!("─────────────────────────────────────────");
    println!(
        "Records: {} ({} dropped), groups: {}",
        report.summary.total_records,
        report.summary.dropped_rows,
        report.summary.group_count()
    );
    println!(
        "Overall recidivism rate: {:.1}%",
        report.summary.overall_recidivism_rate * 100.0
    );
    println!();

    let failing = report.failing_groups();
    if failing.is_empty() {
        println!("All groups pass disparate impact threshold");
    } else {
        println!(
            "BIAS DETECTED: {} fail {:.0}% rule",
            failing.join(", "),
            report.config.di_threshold * 100.0
        );
    }
    if report.has_fpr_disparity() {
        println!("SIGNIFICANT FPR DISPARITY: {:.3} range", report.fpr_range);
    }

    match &report.significance {
        Some(sig) => {
            for result in [&sig.score_difference, &sig.classification_difference] {
                println!(
                    "{} ({}): p = {:.4e}{}",
                    result.test.label(),
                    result.comparison_label(),
                    result.p_value,
                    if result.significant { " *" } else { "" }
                );
            }
        }
        None => println!("Significance tests skipped (fewer than two groups)"),
    }

    if !written.is_empty() {
        println!();
        println!("Files generated:");
        for path in written {
            println!("- {}", path.display());
        }
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let config = build_config(&args)?;

    let primary = args.primary_source();
    let fallback = args.fallback_source();
    let loaded = load_with_fallback(&primary, fallback.as_ref())?;

    if let Some(path) = &args.save_dataset {
        save_raw(&loaded.bytes, path)
            .with_context(|| format!("Failed to save dataset to {}", path.display()))?;
    }

    let dataset = Dataset::from_csv_bytes(
        &loaded.bytes,
        &config.columns,
        config.high_risk_threshold,
        loaded.source.to_string(),
    )?;

    let report = run_audit(&dataset, &config);

    let written = if args.no_files {
        Vec::new()
    } else {
        write_reports(&report, &args.output_dir)?
    };

    match args.format {
        OutputFormat::Text => print_summary(&report, &written),
        OutputFormat::Json => println!("{}", JsonOutput::new(&report).to_json()?),
        OutputFormat::Csv => print!("{}", CsvOutput::new(&report).to_csv()),
        OutputFormat::Markdown => print!("{}", MarkdownOutput::new(&report).to_markdown()),
        OutputFormat::Html => print!("{}", HtmlOutput::new(&report).to_html()),
    }

    Ok(())
}
