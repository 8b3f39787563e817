//! CSV output format for per-group fairness metrics
//!
//! One row per group, written to `fairness_metrics.csv` for spreadsheet
//! analysis and machine parsing.

use crate::audit::AuditReport;

const HEADER: &[&str] = &[
    "group",
    "count",
    "recidivism_rate",
    "high_risk_rate",
    "avg_score",
    "false_positive_rate",
    "false_negative_rate",
    "true_positive_rate",
    "precision",
    "true_positives",
    "false_positives",
    "true_negatives",
    "false_negatives",
    "di_ratio",
    "passes_80_rule",
];

/// CSV output formatter
#[derive(Debug)]
pub struct CsvOutput<'a> {
    report: &'a AuditReport,
}

impl<'a> CsvOutput<'a> {
    pub fn new(report: &'a AuditReport) -> Self {
        Self { report }
    }

    /// Escape CSV field (handle commas, quotes, newlines)
    fn escape_field(field: &str) -> String {
        if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
        {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    /// Generate CSV output as string
    pub fn to_csv(&self) -> String {
        let mut output = String::new();

        output.push_str(&HEADER.join(","));
        output.push('\n');

        for m in self.report.metrics.iter() {
            let (ratio, passes) = self
                .report
                .disparate_impact
                .get(&m.group)
                .map(|e| (e.ratio, e.passes_80_rule))
                .unwrap_or((0.0, false));
            let c = &m.confusion;

            let fields = [
                Self::escape_field(&m.group),
                m.count.to_string(),
                m.recidivism_rate.to_string(),
                m.high_risk_rate.to_string(),
                m.avg_score.to_string(),
                m.false_positive_rate.to_string(),
                m.false_negative_rate.to_string(),
                m.true_positive_rate.to_string(),
                m.precision.to_string(),
                c.true_positives.to_string(),
                c.false_positives.to_string(),
                c.true_negatives.to_string(),
                c.false_negatives.to_string(),
                ratio.to_string(),
                passes.to_string(),
            ];
            output.push_str(&fields.join(","));
            output.push('\n');
        }

        output
    }
}
