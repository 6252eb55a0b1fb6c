//! CSV output format for latency reports
//!
//! One row per (path, tier) pair, for spreadsheet analysis and machine parsing.

use crate::report::AggregateReport;

/// CSV report formatter
#[derive(Debug)]
pub struct CsvOutput<'a> {
    report: &'a AggregateReport,
    include_empty_tiers: bool,
}

impl<'a> CsvOutput<'a> {
    /// Create a CSV formatter over a report
    pub fn new(report: &'a AggregateReport, include_empty_tiers: bool) -> Self {
        Self {
            report,
            include_empty_tiers,
        }
    }

    /// CSV header row
    fn header() -> &'static str {
        "path,tier,label,count,path_total"
    }

    /// Escape CSV field (handle commas, quotes, newlines)
    fn escape_field(field: &str) -> String {
        // If field contains comma, quote, or newline, wrap in quotes and escape quotes
        if field.contains(',') || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    /// Generate CSV output as string
    pub fn to_csv(&self) -> String {
        let mut output = String::new();

        output.push_str(Self::header());
        output.push('\n');

        for path in &self.report.paths {
            let escaped_path = Self::escape_field(&path.path);
            for tier in path.display_tiers(self.include_empty_tiers) {
                let fields = [
                    escaped_path.clone(),
                    tier.tier.key().to_string(),
                    tier.tier.label().to_string(),
                    tier.count.to_string(),
                    path.total.to_string(),
                ];
                output.push_str(&fields.join(","));
                output.push('\n');
            }
        }

        output
    }
}
