//! JSON output format for latency reports
//!
//! `--format json` implementation

use crate::report::AggregateReport;
use crate::tier::LatencyTier;
use serde::{Deserialize, Serialize};

/// Request count for a single tier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonTier {
    /// Machine key (e.g., "under_100")
    pub tier: LatencyTier,
    /// Human-readable label (e.g., "Less than 100 ms")
    pub label: String,
    pub count: u64,
}

/// Report block for a single path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonPath {
    pub path: String,
    pub total_requests: u64,
    /// Tiers in ascending latency order
    pub performance: Vec<JsonTier>,
}

/// Run-wide totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSummary {
    /// Number of distinct paths
    pub total_paths: usize,
    /// Requests across all paths
    pub total_requests: u64,
    /// Lines dropped under the skip policy
    pub skipped_lines: u64,
}

/// Root JSON output structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonOutput {
    /// Format version identifier
    pub version: String,
    /// Format name
    pub format: String,
    /// Paths in first-seen order
    pub paths: Vec<JsonPath>,
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Build the JSON document for a report
    pub fn from_report(report: &AggregateReport, include_empty_tiers: bool) -> Self {
        let paths = report
            .paths
            .iter()
            .map(|p| JsonPath {
                path: p.path.clone(),
                total_requests: p.total,
                performance: p
                    .display_tiers(include_empty_tiers)
                    .into_iter()
                    .map(|t| JsonTier {
                        tier: t.tier,
                        label: t.tier.label().to_string(),
                        count: t.count,
                    })
                    .collect(),
            })
            .collect();

        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "pageperf-json-v1".to_string(),
            paths,
            summary: JsonSummary {
                total_paths: report.paths.len(),
                total_requests: report.total_requests(),
                skipped_lines: report.skipped_lines,
            },
        }
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
