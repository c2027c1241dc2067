//! Output formatting module for CLI display
//!
//! This module handles all terminal output formatting, separating
//! the concerns of conversion from presentation.

use colored::Colorize;
use serde::Serialize;

use crate::converter::{ConversionReport, ConversionSummary};
use crate::error::SkippedRow;
use crate::utils::{format_amount, format_currency};

/// Diagnostic line for a rejected row
pub fn format_skipped_row(row: &SkippedRow) -> String {
    let mut line = format!(
        "{} processing row {}: {}",
        "Error".red().bold(),
        row.line,
        row.reason
    );
    if !row.raw.is_empty() {
        line.push_str(&format!(" [{}]", row.raw));
    }
    line
}

/// Verification totals for terminal output
pub fn format_totals_text(summary: &ConversionSummary) -> String {
    let totals = &summary.totals;
    let mut output = String::new();

    output.push_str(&format!(
        "{}\n",
        "Verify these totals with your Schwab 1099-B summary:".bold()
    ));
    output.push_str(&format!("Total Proceeds: {}\n", format_currency(totals.proceeds)));
    output.push_str(&format!("Total Basis: {}\n", format_currency(totals.basis)));
    output.push_str(&format!(
        "Total Wash Sale Adjustments: {}\n",
        format_currency(totals.wash)
    ));
    output.push_str(&format!("Total Gain/Loss: {}\n", format_currency(totals.gain_loss)));
    output.push_str(&format!(
        "Wash-Adjusted Total Gain/Loss: {}\n",
        format_currency(totals.wash_adjusted_gain_loss)
    ));

    output.push_str(&format!("Transactions written: {}\n", totals.transactions));
    if summary.has_skipped_rows() {
        output.push_str(&format!(
            "{}\n",
            format!("Rows skipped: {}", summary.skipped.len()).yellow()
        ));
    }
    if summary.unclassified > 0 {
        output.push_str(&format!(
            "{}\n",
            format!(
                "Rows without a recognized Form 8949 code (filed as N711): {}",
                summary.unclassified
            )
            .yellow()
        ));
    }

    output
}

/// Conversion report as JSON
pub fn format_report_json(report: &ConversionReport) -> String {
    #[derive(Serialize)]
    struct JsonSkipped {
        line: usize,
        reason: String,
    }

    #[derive(Serialize)]
    struct JsonReport {
        output: String,
        transactions: usize,
        total_proceeds: String,
        total_basis: String,
        total_wash: String,
        total_gain_loss: String,
        wash_adjusted_gain_loss: String,
        unclassified: usize,
        skipped: Vec<JsonSkipped>,
    }

    let summary = &report.summary;
    let totals = &summary.totals;
    let json_report = JsonReport {
        output: report.output_path.display().to_string(),
        transactions: totals.transactions,
        total_proceeds: format_amount(totals.proceeds),
        total_basis: format_amount(totals.basis),
        total_wash: format_amount(totals.wash),
        total_gain_loss: format_amount(totals.gain_loss),
        wash_adjusted_gain_loss: format_amount(totals.wash_adjusted_gain_loss),
        unclassified: summary.unclassified,
        skipped: summary
            .skipped
            .iter()
            .map(|s| JsonSkipped {
                line: s.line,
                reason: s.reason.to_string(),
            })
            .collect(),
    };

    serde_json::to_string_pretty(&json_report)
        .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RowError;
    use crate::reports::RunningTotals;
    use rust_decimal_macros::dec;
    use std::path::PathBuf;

    fn summary() -> ConversionSummary {
        ConversionSummary {
            totals: RunningTotals {
                proceeds: dec!(2300),
                basis: dec!(2000),
                wash: dec!(150),
                gain_loss: dec!(300),
                wash_adjusted_gain_loss: dec!(450),
                transactions: 2,
            },
            skipped: vec![SkippedRow {
                line: 9,
                raw: "XYZ,abc".to_string(),
                reason: RowError::InvalidMonetaryValue {
                    field: "Proceeds",
                    value: "abc".to_string(),
                },
            }],
            unclassified: 0,
        }
    }

    #[test]
    fn test_totals_text() {
        colored::control::set_override(false);
        let text = format_totals_text(&summary());
        assert!(text.contains("Total Proceeds: $2,300.00\n"));
        assert!(text.contains("Total Basis: $2,000.00\n"));
        assert!(text.contains("Total Wash Sale Adjustments: $150.00\n"));
        assert!(text.contains("Total Gain/Loss: $300.00\n"));
        assert!(text.contains("Wash-Adjusted Total Gain/Loss: $450.00\n"));
        assert!(text.contains("Rows skipped: 1"));
        assert!(!text.contains("Form 8949 code"));
    }

    #[test]
    fn test_skipped_row_line() {
        colored::control::set_override(false);
        let line = format_skipped_row(&summary().skipped[0]);
        assert_eq!(
            line,
            "Error processing row 9: Invalid monetary value in Proceeds: 'abc' [XYZ,abc]"
        );
    }

    #[test]
    fn test_report_json() {
        let report = ConversionReport {
            output_path: PathBuf::from("out.TXF"),
            summary: summary(),
        };
        let value: serde_json::Value = serde_json::from_str(&format_report_json(&report)).unwrap();
        assert_eq!(value["output"], "out.TXF");
        assert_eq!(value["total_proceeds"], "2300.00");
        assert_eq!(value["total_gain_loss"], "300.00");
        assert_eq!(value["skipped"][0]["line"], 9);
    }
}
