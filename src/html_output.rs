//! HTML output format for audit reports
//!
//! Self-contained document with embedded CSS. Charts are horizontal bars
//! sized with CSS widths, so the file needs no scripts or images.

use crate::audit::AuditReport;
use crate::fairness::GroupMetrics;

/// One bar in a chart
struct Bar<'a> {
    label: &'a str,
    value: f64,
    failing: bool,
}

/// HTML output formatter
#[derive(Debug)]
pub struct HtmlOutput<'a> {
    report: &'a AuditReport,
}

impl<'a> HtmlOutput<'a> {
    pub fn new(report: &'a AuditReport) -> Self {
        Self { report }
    }

    /// Escape HTML special characters to prevent XSS
    fn escape_html(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&#39;")
    }

    /// Generate embedded CSS styles
    fn generate_styles() -> &'static str {
        r#"
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            margin: 20px;
            background-color: #f5f5f5;
        }
        h1, h2 {
            color: #333;
        }
        table {
            border-collapse: collapse;
            width: 100%;
            background-color: white;
            box-shadow: 0 1px 3px rgba(0,0,0,0.1);
            margin-bottom: 20px;
        }
        th, td {
            border: 1px solid #ddd;
            padding: 8px;
            text-align: left;
        }
        th {
            background-color: #4a90d9;
            color: white;
            font-weight: bold;
        }
        tr:nth-child(even) {
            background-color: #f9f9f9;
        }
        .chart {
            background-color: white;
            box-shadow: 0 1px 3px rgba(0,0,0,0.1);
            padding: 12px;
            margin-bottom: 20px;
        }
        .bar-row {
            display: flex;
            align-items: center;
            margin: 4px 0;
        }
        .bar-label {
            width: 180px;
            font-family: monospace;
        }
        .bar-track {
            position: relative;
            flex: 1;
            height: 18px;
            background-color: #eee;
        }
        .bar {
            height: 100%;
            background-color: #4a90d9;
        }
        .bar-fail {
            background-color: #cc0000;
        }
        .threshold {
            position: absolute;
            top: -2px;
            bottom: -2px;
            border-left: 2px dashed #333;
        }
        .bar-value {
            width: 70px;
            text-align: right;
            font-family: monospace;
        }
        .fail {
            color: #cc0000;
            font-weight: bold;
        }
        .pass {
            color: #2d862d;
        }
        .footer {
            margin-top: 20px;
            font-size: 0.8em;
            color: #888;
            text-align: center;
        }
        "#
    }

    /// Generate complete HTML document
    pub fn to_html(&self) -> String {
        let report = self.report;
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n");
        html.push_str("<html lang=\"en\">\n");

        html.push_str("<head>\n");
        html.push_str("    <meta charset=\"UTF-8\">\n");
        html.push_str(
            "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        html.push_str("    <title>COMPAS Bias Audit Report</title>\n");
        html.push_str("    <style>");
        html.push_str(Self::generate_styles());
        html.push_str("</style>\n");
        html.push_str("</head>\n");

        html.push_str("<body>\n");
        html.push_str("    <h1>COMPAS Bias Audit Report</h1>\n");

        html.push_str(&self.render_overview());
        html.push_str(&self.render_metrics_table());

        html.push_str(&Self::render_chart(
            "False Positive Rate",
            &self.metric_bars(|m| m.false_positive_rate),
            1.0,
            None,
        ));
        html.push_str(&Self::render_chart(
            "False Negative Rate",
            &self.metric_bars(|m| m.false_negative_rate),
            1.0,
            None,
        ));
        html.push_str(&Self::render_chart(
            "High-Risk Rate",
            &self.metric_bars(|m| m.high_risk_rate),
            1.0,
            None,
        ));
        let max_score = report
            .summary
            .score_summary
            .map(|s| f64::from(s.max))
            .filter(|m| *m > 0.0)
            .unwrap_or(1.0);
        html.push_str(&Self::render_chart(
            "Average Score",
            &self.metric_bars(|m| m.avg_score),
            max_score,
            None,
        ));

        let di_bars: Vec<Bar<'_>> = report
            .disparate_impact
            .entries
            .iter()
            .map(|e| Bar {
                label: &e.group,
                value: e.ratio,
                failing: !e.passes_80_rule,
            })
            .collect();
        html.push_str(&Self::render_chart(
            "Disparate Impact Ratio",
            &di_bars,
            1.0,
            Some(report.disparate_impact.threshold),
        ));

        html.push_str(&self.render_significance());

        html.push_str("    <div class=\"footer\">\n");
        html.push_str(&format!(
            "        Generated by fairaudit {}\n",
            env!("CARGO_PKG_VERSION")
        ));
        html.push_str("    </div>\n");

        html.push_str("</body>\n");
        html.push_str("</html>\n");

        html
    }

    /// One bar per group, red when the group fails disparate impact
    fn metric_bars(&self, value: fn(&GroupMetrics) -> f64) -> Vec<Bar<'a>> {
        let failing = self.report.failing_groups();
        self.report
            .metrics
            .iter()
            .map(|m| Bar {
                label: &m.group,
                value: value(m),
                failing: failing.contains(&m.group.as_str()),
            })
            .collect()
    }

    fn render_overview(&self) -> String {
        let summary = &self.report.summary;
        let mut html = String::new();

        html.push_str("    <h2>Overview</h2>\n");
        html.push_str("    <table>\n");
        html.push_str(&format!(
            "        <tr><th>Total samples</th><td>{}</td></tr>\n",
            summary.total_records
        ));
        html.push_str(&format!(
            "        <tr><th>Overall recidivism rate</th><td>{:.1}%</td></tr>\n",
            summary.overall_recidivism_rate * 100.0
        ));
        html.push_str(&format!(
            "        <tr><th>Data source</th><td>{}</td></tr>\n",
            Self::escape_html(&summary.source)
        ));
        for gc in &summary.group_counts {
            html.push_str(&format!(
                "        <tr><th>{}</th><td>{}</td></tr>\n",
                Self::escape_html(&gc.group),
                gc.count
            ));
        }
        html.push_str("    </table>\n");

        let report = self.report;
        let failing = report.failing_groups();
        if failing.is_empty() {
            html.push_str(
                "    <p class=\"pass\">All groups pass the disparate impact threshold</p>\n",
            );
        } else {
            let names: Vec<String> = failing.iter().map(|g| Self::escape_html(g)).collect();
            html.push_str(&format!(
                "    <p class=\"fail\">Bias detected: {} fail the {:.0}% rule</p>\n",
                names.join(", "),
                report.config.di_threshold * 100.0
            ));
        }
        if report.has_fpr_disparity() {
            html.push_str(&format!(
                "    <p class=\"fail\">False positive rate range {:.3} exceeds {:.3}</p>\n",
                report.fpr_range, report.config.fpr_disparity_threshold
            ));
        }

        html
    }

    fn render_metrics_table(&self) -> String {
        let mut html = String::new();

        html.push_str("    <h2>Fairness Metrics</h2>\n");
        html.push_str("    <table>\n");
        html.push_str("        <tr><th>Group</th><th>Count</th><th>Recidivism</th><th>High risk</th><th>Avg score</th><th>FPR</th><th>FNR</th><th>TPR</th><th>Precision</th><th>DI ratio</th></tr>\n");

        for m in self.report.metrics.iter() {
            let di = self.report.disparate_impact.get(&m.group);
            let class = if di.is_some_and(|e| !e.passes_80_rule) {
                " class=\"fail\""
            } else {
                ""
            };
            html.push_str(&format!(
                "        <tr><td{}>{}</td><td>{}</td><td>{:.3}</td><td>{:.3}</td><td>{:.2}</td><td>{:.3}</td><td>{:.3}</td><td>{:.3}</td><td>{:.3}</td><td>{:.3}</td></tr>\n",
                class,
                Self::escape_html(&m.group),
                m.count,
                m.recidivism_rate,
                m.high_risk_rate,
                m.avg_score,
                m.false_positive_rate,
                m.false_negative_rate,
                m.true_positive_rate,
                m.precision,
                di.map(|e| e.ratio).unwrap_or_default()
            ));
        }

        html.push_str("    </table>\n");
        html
    }

    /// Bar chart scaled so `scale` fills the track
    fn render_chart(title: &str, bars: &[Bar<'_>], scale: f64, threshold: Option<f64>) -> String {
        let mut html = String::new();
        let width = |v: f64| (v / scale * 100.0).clamp(0.0, 100.0);

        html.push_str(&format!("    <h2>{}</h2>\n", Self::escape_html(title)));
        html.push_str("    <div class=\"chart\">\n");
        for bar in bars {
            let class = if bar.failing { "bar bar-fail" } else { "bar" };
            let marker = threshold
                .map(|t| {
                    format!(
                        "<div class=\"threshold\" style=\"left: {:.1}%\"></div>",
                        width(t)
                    )
                })
                .unwrap_or_default();
            html.push_str(&format!(
                "        <div class=\"bar-row\"><span class=\"bar-label\">{}</span><div class=\"bar-track\"><div class=\"{}\" style=\"width: {:.1}%\"></div>{}</div><span class=\"bar-value\">{:.3}</span></div>\n",
                Self::escape_html(bar.label),
                class,
                width(bar.value),
                marker,
                bar.value
            ));
        }
        html.push_str("    </div>\n");
        html
    }

    fn render_significance(&self) -> String {
        let mut html = String::new();
        html.push_str("    <h2>Statistical Tests</h2>\n");

        let Some(sig) = &self.report.significance else {
            html.push_str("    <p>Skipped: fewer than two groups in the dataset.</p>\n");
            return html;
        };

        html.push_str("    <table>\n");
        html.push_str("        <tr><th>Test</th><th>Groups</th><th>Statistic</th><th>p-value</th><th>Significant</th></tr>\n");
        for result in [&sig.score_difference, &sig.classification_difference] {
            html.push_str(&format!(
                "        <tr><td>{}</td><td>{}</td><td>{:.4}</td><td>{:.4e}</td><td>{}</td></tr>\n",
                result.test.label(),
                Self::escape_html(&result.comparison_label()),
                result.statistic,
                result.p_value,
                if result.significant { "yes" } else { "no" }
            ));
        }
        html.push_str("    </table>\n");
        html
    }
}
