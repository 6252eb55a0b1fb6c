//! Latency tiers for request classification
//!
//! Every request falls into exactly one of four tiers. Boundaries are
//! lower-bound inclusive: 100 ms belongs to `Between100And300`, 1000 ms to
//! `Over1000`.

use crate::error::{LogError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Latency tier of a single request
///
/// Variant order is boundary order, so the derived `Ord` sorts tiers from
/// fastest to slowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LatencyTier {
    /// latency < 100 ms
    #[serde(rename = "under_100")]
    Under100,
    /// 100 ms <= latency < 300 ms
    #[serde(rename = "between_100_300")]
    Between100And300,
    /// 300 ms <= latency < 1000 ms
    #[serde(rename = "between_300_1000")]
    Between300And1000,
    /// latency >= 1000 ms
    #[serde(rename = "over_1000")]
    Over1000,
}

impl LatencyTier {
    /// All tiers in ascending order
    pub const ALL: [LatencyTier; 4] = [
        LatencyTier::Under100,
        LatencyTier::Between100And300,
        LatencyTier::Between300And1000,
        LatencyTier::Over1000,
    ];

    /// Classify a latency in milliseconds
    ///
    /// Negative latencies are rejected with [`LogError::InvalidInput`].
    pub fn classify(latency_ms: i64) -> Result<Self> {
        match latency_ms {
            i64::MIN..=-1 => Err(LogError::InvalidInput {
                line_no: 0,
                latency_ms,
            }),
            0..=99 => Ok(LatencyTier::Under100),
            100..=299 => Ok(LatencyTier::Between100And300),
            300..=999 => Ok(LatencyTier::Between300And1000),
            _ => Ok(LatencyTier::Over1000),
        }
    }

    /// Stable machine-readable key (JSON and CSV output)
    pub fn key(self) -> &'static str {
        match self {
            LatencyTier::Under100 => "under_100",
            LatencyTier::Between100And300 => "between_100_300",
            LatencyTier::Between300And1000 => "between_300_1000",
            LatencyTier::Over1000 => "over_1000",
        }
    }

    /// Human-readable label used in the text report
    pub fn label(self) -> &'static str {
        match self {
            LatencyTier::Under100 => "Less than 100 ms",
            LatencyTier::Between100And300 => "Between 100 ms and 300 ms",
            LatencyTier::Between300And1000 => "Between 300 ms and 1 s",
            LatencyTier::Over1000 => "Greater than 1 s",
        }
    }

    /// Inclusive lower bound in milliseconds
    pub fn lower_bound_ms(self) -> i64 {
        match self {
            LatencyTier::Under100 => 0,
            LatencyTier::Between100And300 => 100,
            LatencyTier::Between300And1000 => 300,
            LatencyTier::Over1000 => 1000,
        }
    }

    /// Exclusive upper bound in milliseconds (None for the open-ended tier)
    pub fn upper_bound_ms(self) -> Option<i64> {
        match self {
            LatencyTier::Under100 => Some(100),
            LatencyTier::Between100And300 => Some(300),
            LatencyTier::Between300And1000 => Some(1000),
            LatencyTier::Over1000 => None,
        }
    }
}

impl fmt::Display for LatencyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Shorthand for [`LatencyTier::classify`]
pub fn classify(latency_ms: i64) -> Result<LatencyTier> {
    LatencyTier::classify(latency_ms)
}
