//! Aggregate latency report and its text rendering

use crate::tier::LatencyTier;
use std::fmt::Write as _;

/// Request count for one tier of one path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierCount {
    pub tier: LatencyTier,
    pub count: u64,
}

/// Report block for a single path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathReport {
    pub path: String,
    /// Sum of all tier counts
    pub total: u64,
    /// Non-empty tiers in ascending latency order
    pub tiers: Vec<TierCount>,
}

impl PathReport {
    /// Count for a tier (0 if the tier is absent)
    pub fn count(&self, tier: LatencyTier) -> u64 {
        self.tiers
            .iter()
            .find(|t| t.tier == tier)
            .map_or(0, |t| t.count)
    }

    /// All four tiers in ascending order, zero counts included
    pub fn all_tiers(&self) -> Vec<TierCount> {
        LatencyTier::ALL
            .iter()
            .map(|&tier| TierCount {
                tier,
                count: self.count(tier),
            })
            .collect()
    }

    /// Tiers to display, with or without the empty ones
    pub fn display_tiers(&self, include_empty: bool) -> Vec<TierCount> {
        if include_empty {
            self.all_tiers()
        } else {
            self.tiers.clone()
        }
    }
}

/// Per-path tier report for a whole log
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateReport {
    /// One entry per path, in first-seen order
    pub paths: Vec<PathReport>,
    /// Lines dropped under the skip policy
    pub skipped_lines: u64,
}

impl AggregateReport {
    /// Report block for a path
    pub fn get(&self, path: &str) -> Option<&PathReport> {
        self.paths.iter().find(|p| p.path == path)
    }

    /// Requests across every path
    pub fn total_requests(&self) -> u64 {
        self.paths.iter().map(|p| p.total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Render the human-readable report
    ///
    /// ```text
    /// == Path: /a/
    ///     Total requests: 3
    ///     Performance:
    ///         - Less than 100 ms: 2
    ///         - Between 100 ms and 300 ms: 1
    /// ```
    pub fn to_text(&self, include_empty_tiers: bool) -> String {
        let mut output = String::new();

        for path in &self.paths {
            // Writing to a String cannot fail
            let _ = writeln!(output, "== Path: {}", path.path);
            let _ = writeln!(output, "    Total requests: {}", path.total);
            let _ = writeln!(output, "    Performance:");
            for tier in path.display_tiers(include_empty_tiers) {
                let _ = writeln!(output, "        - {}: {}", tier.tier.label(), tier.count);
            }
        }

        output
    }
}
