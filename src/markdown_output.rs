//! Markdown audit report
//!
//! Renders an [`AuditReport`] as the narrative report written to
//! `compas_bias_audit_report.md`. Nothing is recomputed here and no wall-clock
//! time is included, so the same report always renders to the same text.

use crate::audit::AuditReport;
use crate::config::ScoreBasis;

/// Markdown report formatter
#[derive(Debug)]
pub struct MarkdownOutput<'a> {
    report: &'a AuditReport,
}

impl<'a> MarkdownOutput<'a> {
    pub fn new(report: &'a AuditReport) -> Self {
        Self { report }
    }

    /// Generate the complete Markdown document
    pub fn to_markdown(&self) -> String {
        let mut lines: Vec<String> = Vec::new();

        lines.push("# COMPAS Dataset Bias Audit Report".to_string());
        lines.push(format!(
            "Generated by fairaudit {}",
            env!("CARGO_PKG_VERSION")
        ));
        lines.push(String::new());

        self.executive_summary(&mut lines);
        self.key_findings(&mut lines);
        self.statistical_tests(&mut lines);
        self.predictive_performance(&mut lines);
        self.recommendations(&mut lines);
        self.technical_details(&mut lines);

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    fn executive_summary(&self, lines: &mut Vec<String>) {
        let summary = &self.report.summary;
        lines.push("## Executive Summary".to_string());
        lines.push(format!(
            "- **Total samples analyzed:** {}",
            thousands(summary.total_records)
        ));
        lines.push(format!("- **Groups:** {}", summary.group_count()));
        lines.push(format!(
            "- **Overall recidivism rate:** {}",
            percent(summary.overall_recidivism_rate)
        ));
        if summary.dropped_rows > 0 {
            lines.push(format!(
                "- **Rows dropped (missing values):** {}",
                thousands(summary.dropped_rows)
            ));
        }
        lines.push(String::new());
    }

    fn key_findings(&self, lines: &mut Vec<String>) {
        let report = self.report;
        lines.push("## Key Findings".to_string());

        let failing = report.failing_groups();
        let threshold_pct = report.config.di_threshold * 100.0;
        if failing.is_empty() {
            lines.push(format!(
                "### Disparate Impact: All groups pass {:.0}% rule",
                threshold_pct
            ));
        } else {
            lines.push("### Disparate Impact Detected".to_string());
            lines.push(format!(
                "Groups failing {:.0}% rule: {}",
                threshold_pct,
                failing.join(", ")
            ));
            for entry in report
                .disparate_impact
                .entries
                .iter()
                .filter(|e| !e.passes_80_rule)
            {
                lines.push(format!(
                    "- **{}:** {:.3} ratio ({:.1}% below parity)",
                    entry.group,
                    entry.ratio,
                    (1.0 - entry.ratio) * 100.0
                ));
            }
        }
        lines.push(String::new());

        lines.push("### False Positive Rate Disparity".to_string());
        lines.push(format!("- **Range across groups:** {:.3}", report.fpr_range));
        if report.has_fpr_disparity() {
            lines.push(format!(
                "- **Significant disparity detected** (>{:.0}% difference)",
                report.config.fpr_disparity_threshold * 100.0
            ));
        }
        lines.push(String::new());

        lines.push("### Per-Group Metrics".to_string());
        lines.push(
            "| Group | Count | Recidivism | High Risk | Avg Score | FPR | FNR | TPR | Precision | DI Ratio |"
                .to_string(),
        );
        lines.push("|---|---:|---:|---:|---:|---:|---:|---:|---:|---:|".to_string());
        for m in report.metrics.iter() {
            let ratio = report
                .disparate_impact
                .get(&m.group)
                .map(|e| format!("{:.3}", e.ratio))
                .unwrap_or_default();
            lines.push(format!(
                "| {} | {} | {:.3} | {:.3} | {:.2} | {:.3} | {:.3} | {:.3} | {:.3} | {} |",
                escape_cell(&m.group),
                m.count,
                m.recidivism_rate,
                m.high_risk_rate,
                m.avg_score,
                m.false_positive_rate,
                m.false_negative_rate,
                m.true_positive_rate,
                m.precision,
                ratio
            ));
        }
        lines.push(String::new());
    }

    fn statistical_tests(&self, lines: &mut Vec<String>) {
        lines.push("## Statistical Tests".to_string());
        match &self.report.significance {
            Some(sig) => {
                lines.push(format!(
                    "Significance level: {}",
                    sig.significance_level
                ));
                for result in [&sig.score_difference, &sig.classification_difference] {
                    lines.push(format!(
                        "- **{}** ({}): statistic {:.4}, p-value {:.4e}, {}",
                        result.test.label(),
                        result.comparison_label(),
                        result.statistic,
                        result.p_value,
                        if result.significant {
                            "significant"
                        } else {
                            "not significant"
                        }
                    ));
                }
            }
            None => {
                lines.push("Skipped: fewer than two groups in the dataset.".to_string());
            }
        }
        lines.push(String::new());
    }

    fn predictive_performance(&self, lines: &mut Vec<String>) {
        let predictive = &self.report.predictive;
        lines.push("## Predictive Performance".to_string());
        if predictive.entries.is_empty() {
            lines.push(format!(
                "No group has more than {} records.",
                predictive.min_group_size
            ));
            lines.push(String::new());
            return;
        }

        lines.push("| Group | Samples | AUC | Calibration |".to_string());
        lines.push("|---|---:|---:|---:|".to_string());
        for entry in &predictive.entries {
            let auc = entry
                .auc_score
                .map(|a| format!("{:.3}", a))
                .unwrap_or_else(|| "n/a".to_string());
            lines.push(format!(
                "| {} | {} | {} | {:.3} |",
                escape_cell(&entry.group),
                entry.sample_size,
                auc,
                entry.calibration
            ));
        }
        lines.push(String::new());
    }

    fn recommendations(&self, lines: &mut Vec<String>) {
        lines.push("## Recommendations".to_string());
        lines.push("### Immediate Actions".to_string());
        if self.report.bias_detected() || self.report.has_fpr_disparity() {
            lines.push("1. **Implement fairness constraints** in model training".to_string());
            lines.push("2. **Audit training data** for historical bias patterns".to_string());
            lines.push("3. **Establish human oversight** for high-risk classifications".to_string());
            lines.push("4. **Monitor bias metrics** on an ongoing basis".to_string());
        } else {
            lines.push("1. **Continue monitoring** current fairness levels".to_string());
            lines.push("2. **Establish regular auditing** procedures".to_string());
        }
        lines.push(String::new());

        lines.push("### Long-term Improvements".to_string());
        lines.push("1. **Diversify training data** to ensure representation".to_string());
        lines.push("2. **Implement fairness-aware algorithms**".to_string());
        lines.push("3. **Engage stakeholders** in system design".to_string());
        lines.push("4. **Enhance transparency** and explainability".to_string());
        lines.push(String::new());
    }

    fn technical_details(&self, lines: &mut Vec<String>) {
        let config = &self.report.config;
        let basis = match config.auc_basis {
            ScoreBasis::RawScore => "raw score",
            ScoreBasis::Binarized => "binarized label",
        };

        lines.push("## Technical Details".to_string());
        lines.push(format!(
            "- **High-risk threshold:** {} >= {}",
            config.columns.score, config.high_risk_threshold
        ));
        lines.push(format!(
            "- **Disparate impact threshold:** {}",
            config.di_threshold
        ));
        lines.push("- **Fairness metrics:** FPR, FNR, TPR, Precision, Disparate Impact".to_string());
        lines.push("- **Statistical tests:** Mann-Whitney U, Chi-square".to_string());
        lines.push(format!("- **AUC basis:** {}", basis));
        lines.push(format!("- **Data source:** {}", self.report.summary.source));
        if !self.report.summary.fingerprint.is_empty() {
            lines.push(format!(
                "- **Dataset SHA-256:** `{}`",
                self.report.summary.fingerprint
            ));
        }
    }
}

/// `0.345` -> `34.5%`
fn percent(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

/// `7214` -> `7,214`
fn thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Keep group names from breaking table rows
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::fixtures::{sample_report, single_group_report};

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(7214), "7,214");
        assert_eq!(thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(0.45), "45.0%");
        assert_eq!(percent(0.0), "0.0%");
    }

    #[test]
    fn test_escape_cell() {
        assert_eq!(escape_cell("a|b"), "a\\|b");
    }

    #[test]
    fn test_sections_present() {
        let md = MarkdownOutput::new(&sample_report()).to_markdown();
        for heading in [
            "# COMPAS Dataset Bias Audit Report",
            "## Executive Summary",
            "## Key Findings",
            "## Statistical Tests",
            "## Predictive Performance",
            "## Recommendations",
            "## Technical Details",
        ] {
            assert!(md.contains(heading), "missing {heading}");
        }
    }

    #[test]
    fn test_failing_group_reported_with_ratio() {
        let report = sample_report();
        let md = MarkdownOutput::new(&report).to_markdown();

        assert!(md.contains("### Disparate Impact Detected"));
        assert!(md.contains("Groups failing 80% rule: Group <A>"));
        // 4/12 flagged vs 10/12 -> ratio 0.4
        assert!(md.contains("- **Group <A>:** 0.400 ratio (60.0% below parity)"));
        assert!(md.contains("**Significant disparity detected**"));
        assert!(md.contains("**Implement fairness constraints**"));
    }

    #[test]
    fn test_single_group_notes_skip() {
        let md = MarkdownOutput::new(&single_group_report()).to_markdown();
        assert!(md.contains("Skipped: fewer than two groups"));
        assert!(md.contains("All groups pass 80% rule"));
        assert!(md.contains("**Continue monitoring**"));
        assert!(md.contains("No group has more than 10 records."));
    }

    #[test]
    fn test_rendering_is_stable() {
        let report = sample_report();
        assert_eq!(
            MarkdownOutput::new(&report).to_markdown(),
            MarkdownOutput::new(&report).to_markdown()
        );
    }
}
