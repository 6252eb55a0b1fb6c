//! pageperf - per-path latency tier report for web access logs
//!
//! Reads `<path> <latency_ms>` records, buckets each request into one of four
//! latency tiers, and reports request totals and per-tier counts per path in
//! first-seen order.
//!
//! ```
//! use pageperf::stats::LogPerformanceAggregator;
//! use pageperf::tier::LatencyTier;
//!
//! let mut aggregator = LogPerformanceAggregator::new();
//! aggregator.ingest("/a/ 50")?;
//! aggregator.ingest("/a/ 150")?;
//!
//! let report = aggregator.report();
//! assert_eq!(report.paths[0].total, 2);
//! assert_eq!(report.paths[0].count(LatencyTier::Under100), 1);
//! # Ok::<(), pageperf::error::LogError>(())
//! ```

pub mod cli;
pub mod config;
pub mod csv_output;
pub mod error;
pub mod json_output;
pub mod record;
pub mod report;
pub mod stats;
pub mod tier;
