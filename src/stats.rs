//! Per-path latency tier statistics
//!
//! [`LogPerformanceAggregator`] consumes access log lines one at a time and
//! keeps a [`PathStats`] counter per request path, in the order paths were
//! first seen. Memory is bounded by the number of distinct paths.

use crate::error::{LogError, Result};
use crate::record::LogRecord;
use crate::report::{AggregateReport, PathReport, TierCount};
use crate::tier::LatencyTier;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Tier counters for a single path
///
/// Counts are keyed by tier, but callers may also count a raw latency with
/// [`PathStats::increment_latency`], which classifies it first. Absent tiers
/// read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathStats {
    counts: HashMap<LatencyTier, u64>,
}

impl PathStats {
    /// Create an empty counter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Count for a tier (0 if never incremented)
    pub fn get(&self, tier: LatencyTier) -> u64 {
        self.counts.get(&tier).copied().unwrap_or(0)
    }

    /// Add one request to a tier
    pub fn increment(&mut self, tier: LatencyTier) {
        *self.counts.entry(tier).or_default() += 1;
    }

    /// Classify a latency and add one request to its tier
    pub fn increment_latency(&mut self, latency_ms: i64) -> Result<LatencyTier> {
        let tier = LatencyTier::classify(latency_ms)?;
        self.increment(tier);
        Ok(tier)
    }

    /// Tiers with at least one request, fastest first
    pub fn ordered_items(&self) -> Vec<(LatencyTier, u64)> {
        let mut items: Vec<_> = self
            .counts
            .iter()
            .map(|(&tier, &count)| (tier, count))
            .collect();
        items.sort_by_key(|&(tier, _)| tier);
        items
    }

    /// Total requests across all tiers
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// True if nothing has been counted yet
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// What to do with a line that cannot be parsed or classified
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MalformedPolicy {
    /// Return the error and stop; no report is produced
    #[default]
    Abort,
    /// Log a warning, count the line, and keep going
    Skip,
}

/// Aggregates access log lines into a per-path tier report
#[derive(Debug, Default)]
pub struct LogPerformanceAggregator {
    /// Per-path counters in first-seen order
    paths: Vec<(String, PathStats)>,
    /// Fast lookup: path → position in `paths`
    index: HashMap<String, usize>,
    policy: MalformedPolicy,
    /// Number of lines passed to `ingest` so far
    lines_seen: usize,
    skipped_lines: u64,
}

impl LogPerformanceAggregator {
    /// Create an aggregator that aborts on the first bad line
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an aggregator with an explicit bad-line policy
    pub fn with_policy(policy: MalformedPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Bad-line policy this aggregator was built with
    pub fn policy(&self) -> MalformedPolicy {
        self.policy
    }

    /// Parse one log line and count it
    ///
    /// Lines are numbered by call order starting at 1; that number is
    /// attached to any line error returned. Under
    /// [`MalformedPolicy::Skip`] bad lines are counted in
    /// [`skipped_lines`](Self::skipped_lines) and `Ok(())` is returned.
    pub fn ingest(&mut self, line: &str) -> Result<()> {
        let outcome = LogRecord::parse(line).and_then(|record| self.record(&record).map(|_| ()));
        self.settle(outcome)
    }

    /// Ingest one raw line that may not be valid UTF-8
    ///
    /// Undecodable bytes make the line malformed, so the policy decides
    /// whether the run stops.
    pub fn ingest_bytes(&mut self, raw: &[u8]) -> Result<()> {
        match std::str::from_utf8(raw) {
            Ok(line) => self.ingest(line),
            Err(e) => self.settle(Err(LogError::MalformedLine {
                line_no: 0,
                line: String::from_utf8_lossy(raw).into_owned(),
                reason: format!("invalid UTF-8 ({})", e),
            })),
        }
    }

    /// Number the line and apply the bad-line policy to its outcome
    fn settle(&mut self, outcome: Result<()>) -> Result<()> {
        self.lines_seen += 1;
        let line_no = self.lines_seen;

        match outcome {
            Ok(()) => Ok(()),
            Err(e) if e.is_line_error() && self.policy == MalformedPolicy::Skip => {
                tracing::warn!("Skipping line {}: {}", line_no, e);
                self.skipped_lines += 1;
                Ok(())
            }
            Err(e) => Err(e.at_line(line_no)),
        }
    }

    /// Count an already-parsed record
    ///
    /// A negative latency is rejected before any state changes, so the path
    /// is not registered.
    pub fn record(&mut self, record: &LogRecord) -> Result<LatencyTier> {
        let tier = LatencyTier::classify(record.latency_ms)?;
        self.stats_for(&record.path).increment(tier);
        Ok(tier)
    }

    /// Counters for a path, created empty on first access
    fn stats_for(&mut self, path: &str) -> &mut PathStats {
        let idx = match self.index.get(path) {
            Some(&idx) => idx,
            None => {
                tracing::debug!("New path: {}", path);
                let idx = self.paths.len();
                self.paths.push((path.to_string(), PathStats::new()));
                self.index.insert(path.to_string(), idx);
                idx
            }
        };
        &mut self.paths[idx].1
    }

    /// Ingest every line from a reader
    ///
    /// Lines end at `\n`; a trailing `\r` is dropped. I/O errors are always
    /// returned, whatever the policy.
    pub fn ingest_reader<R: BufRead>(&mut self, mut reader: R) -> Result<()> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            if buf.last() == Some(&b'\n') {
                buf.pop();
                if buf.last() == Some(&b'\r') {
                    buf.pop();
                }
            }
            self.ingest_bytes(&buf)?;
        }

        tracing::info!(
            "Ingested {} lines: {} paths, {} skipped",
            self.lines_seen,
            self.paths.len(),
            self.skipped_lines
        );
        Ok(())
    }

    /// Stats for a path, if it has been seen
    pub fn path_stats(&self, path: &str) -> Option<&PathStats> {
        self.index.get(path).map(|&idx| &self.paths[idx].1)
    }

    /// Number of distinct paths seen
    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Number of bad lines dropped under the skip policy
    pub fn skipped_lines(&self) -> u64 {
        self.skipped_lines
    }

    /// Build the report for everything ingested so far
    ///
    /// Paths appear in first-seen order; tiers within a path in ascending
    /// latency order. Zero-count tiers are not listed.
    pub fn report(&self) -> AggregateReport {
        let paths = self
            .paths
            .iter()
            .map(|(path, stats)| PathReport {
                path: path.clone(),
                total: stats.total(),
                tiers: stats
                    .ordered_items()
                    .into_iter()
                    .map(|(tier, count)| TierCount { tier, count })
                    .collect(),
            })
            .collect();

        AggregateReport {
            paths,
            skipped_lines: self.skipped_lines,
        }
    }
}

/// Read an access log from any reader and build its report
pub fn analyze_reader<R: BufRead>(reader: R, policy: MalformedPolicy) -> Result<AggregateReport> {
    let mut aggregator = LogPerformanceAggregator::with_policy(policy);
    aggregator.ingest_reader(reader)?;
    Ok(aggregator.report())
}

/// Read an access log file and build its report
pub fn analyze_file<P: AsRef<Path>>(path: P, policy: MalformedPolicy) -> Result<AggregateReport> {
    let path = path.as_ref();
    tracing::debug!("Analyzing {}", path.display());
    let file = File::open(path)?;
    analyze_reader(BufReader::new(file), policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn aggregate(lines: &[&str]) -> LogPerformanceAggregator {
        let mut aggregator = LogPerformanceAggregator::new();
        for line in lines {
            aggregator.ingest(line).unwrap();
        }
        aggregator
    }

    #[test]
    fn test_path_stats_default_is_zero() {
        let stats = PathStats::new();
        assert!(stats.is_empty());
        for tier in LatencyTier::ALL {
            assert_eq!(stats.get(tier), 0);
        }
        assert_eq!(stats.total(), 0);
    }

    #[test]
    fn test_path_stats_increment_latency() {
        let mut stats = PathStats::new();
        assert_eq!(stats.increment_latency(50).unwrap(), LatencyTier::Under100);
        stats.increment_latency(403).unwrap();
        stats.increment_latency(403).unwrap();
        stats.increment_latency(30).unwrap();

        assert_eq!(stats.get(LatencyTier::Under100), 2);
        assert_eq!(stats.get(LatencyTier::Between300And1000), 2);
        assert_eq!(stats.get(LatencyTier::Over1000), 0);
        assert_eq!(stats.total(), 4);
    }

    #[test]
    fn test_path_stats_negative_latency_untouched() {
        let mut stats = PathStats::new();
        assert!(stats.increment_latency(-1).is_err());
        assert!(stats.is_empty());
    }

    #[test]
    fn test_path_stats_ordered_items_by_tier() {
        let mut stats = PathStats::new();
        stats.increment(LatencyTier::Over1000);
        stats.increment(LatencyTier::Under100);
        stats.increment(LatencyTier::Over1000);
        stats.increment(LatencyTier::Between100And300);

        assert_eq!(
            stats.ordered_items(),
            vec![
                (LatencyTier::Under100, 1),
                (LatencyTier::Between100And300, 1),
                (LatencyTier::Over1000, 2),
            ]
        );
    }

    #[test]
    fn test_end_to_end_scenario() {
        let aggregator = aggregate(&["/a/ 50", "/a/ 150", "/b/ 1200", "/a/ 50"]);
        let report = aggregator.report();

        assert_eq!(report.paths.len(), 2);

        let a = &report.paths[0];
        assert_eq!(a.path, "/a/");
        assert_eq!(a.total, 3);
        assert_eq!(
            a.tiers,
            vec![
                TierCount { tier: LatencyTier::Under100, count: 2 },
                TierCount { tier: LatencyTier::Between100And300, count: 1 },
            ]
        );

        let b = &report.paths[1];
        assert_eq!(b.path, "/b/");
        assert_eq!(b.total, 1);
        assert_eq!(b.tiers, vec![TierCount { tier: LatencyTier::Over1000, count: 1 }]);
    }

    #[test]
    fn test_first_seen_order_preserved() {
        let aggregator = aggregate(&["/z/ 10", "/b/ 10", "/z/ 10", "/a/ 10"]);
        let order: Vec<_> = aggregator
            .report()
            .paths
            .into_iter()
            .map(|p| p.path)
            .collect();
        assert_eq!(order, vec!["/z/", "/b/", "/a/"]);
    }

    #[test]
    fn test_report_is_idempotent() {
        let aggregator = aggregate(&["/a/ 50", "/b/ 500"]);
        assert_eq!(aggregator.report(), aggregator.report());
    }

    #[test]
    fn test_report_reflects_later_ingest() {
        let mut aggregator = aggregate(&["/a/ 50"]);
        assert_eq!(aggregator.report().total_requests(), 1);
        aggregator.ingest("/a/ 2000").unwrap();
        assert_eq!(aggregator.report().total_requests(), 2);
    }

    #[test]
    fn test_abort_policy_returns_numbered_error() {
        let mut aggregator = LogPerformanceAggregator::new();
        aggregator.ingest("/a/ 50").unwrap();
        let err = aggregator.ingest("/a/ notanumber").unwrap_err();

        match err {
            LogError::MalformedLine { line_no, line, .. } => {
                assert_eq!(line_no, 2);
                assert_eq!(line, "/a/ notanumber");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(aggregator.skipped_lines(), 0);
    }

    #[test]
    fn test_negative_latency_does_not_register_path() {
        let mut aggregator = LogPerformanceAggregator::new();
        let err = aggregator.ingest("/neg/ -10").unwrap_err();
        assert!(matches!(
            err,
            LogError::InvalidInput {
                line_no: 1,
                latency_ms: -10
            }
        ));
        assert!(aggregator.is_empty());
        assert!(aggregator.path_stats("/neg/").is_none());
    }

    #[test]
    fn test_negative_latency_error_carries_line_number() {
        let input = "/a/ 50\n/a/ 60\n/a/ -7\n/a/ 70\n";
        let err = analyze_reader(Cursor::new(input), MalformedPolicy::Abort).unwrap_err();

        assert!(matches!(
            err,
            LogError::InvalidInput {
                line_no: 3,
                latency_ms: -7
            }
        ));
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_invalid_utf8_aborts_with_line_number() {
        let input: &[u8] = b"/a/ 50\n/caf\xe9/ 10\n/b/ 20\n";
        let err = analyze_reader(input, MalformedPolicy::Abort).unwrap_err();

        match err {
            LogError::MalformedLine { line_no, line, reason } => {
                assert_eq!(line_no, 2);
                assert_eq!(line, "/caf\u{FFFD}/ 10");
                assert!(reason.contains("invalid UTF-8"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_utf8_skipped_under_skip_policy() {
        let input: &[u8] = b"/a/ 50\n/caf\xe9/ 10\n/b/ 20\n";
        let report = analyze_reader(input, MalformedPolicy::Skip).unwrap();

        assert_eq!(report.skipped_lines, 1);
        assert_eq!(report.paths.len(), 2);
        assert_eq!(report.paths[0].path, "/a/");
        assert_eq!(report.paths[1].path, "/b/");
    }

    #[test]
    fn test_ingest_reader_strips_crlf_and_missing_final_newline() {
        let input: &[u8] = b"/a/ 50\r\n/a/ 150\r\n/b/ 1200";
        let report = analyze_reader(input, MalformedPolicy::Abort).unwrap();

        assert_eq!(report.get("/a/").unwrap().total, 2);
        assert_eq!(report.get("/b/").unwrap().count(LatencyTier::Over1000), 1);
    }

    #[test]
    fn test_policy_accessor() {
        assert_eq!(LogPerformanceAggregator::new().policy(), MalformedPolicy::Abort);
        let aggregator = LogPerformanceAggregator::with_policy(MalformedPolicy::Skip);
        assert_eq!(aggregator.policy(), MalformedPolicy::Skip);
    }

    #[test]
    fn test_skip_policy_counts_bad_lines() {
        let mut aggregator = LogPerformanceAggregator::with_policy(MalformedPolicy::Skip);
        aggregator.ingest("/a/ 50").unwrap();
        aggregator.ingest("/a/ notanumber").unwrap();
        aggregator.ingest("/a/ -3").unwrap();
        aggregator.ingest("garbage").unwrap();
        aggregator.ingest("/a/ 150").unwrap();

        assert_eq!(aggregator.skipped_lines(), 3);
        let report = aggregator.report();
        assert_eq!(report.skipped_lines, 3);
        assert_eq!(report.paths[0].total, 2);
    }

    #[test]
    fn test_ingest_reader_aborts_without_report() {
        let input = "/a/ 50\n/a/ 60 70\n/b/ 10\n";
        let err = analyze_reader(Cursor::new(input), MalformedPolicy::Abort).unwrap_err();
        match err {
            LogError::MalformedLine { line_no, .. } => assert_eq!(line_no, 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_ingest_reader_skip_policy() {
        let input = "/a/ 50\n/a/ 60 70\n/b/ 10\n";
        let report = analyze_reader(Cursor::new(input), MalformedPolicy::Skip).unwrap();
        assert_eq!(report.paths.len(), 2);
        assert_eq!(report.skipped_lines, 1);
    }

    #[test]
    fn test_analyze_file_missing() {
        let err = analyze_file("/nonexistent/access.log", MalformedPolicy::Abort).unwrap_err();
        assert!(matches!(err, LogError::Io(_)));
    }

    #[test]
    fn test_path_count_and_lookup() {
        let aggregator = aggregate(&["/a/ 1", "/b/ 2", "/a/ 3"]);
        assert_eq!(aggregator.path_count(), 2);
        assert_eq!(aggregator.path_stats("/a/").unwrap().total(), 2);
        assert!(aggregator.path_stats("/c/").is_none());
    }

    #[test]
    fn test_aggregator_debug() {
        let aggregator = aggregate(&["/a/ 1"]);
        let debug_str = format!("{:?}", aggregator);
        assert!(debug_str.contains("LogPerformanceAggregator"));
    }
}
