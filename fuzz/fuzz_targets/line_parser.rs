#![no_main]

use libfuzzer_sys::fuzz_target;
use pageperf::record::LogRecord;
use pageperf::stats::{LogPerformanceAggregator, MalformedPolicy};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Parsing must never panic, whatever the line holds
        let _ = LogRecord::parse(input);

        // Under the skip policy every line is accepted
        let mut aggregator = LogPerformanceAggregator::with_policy(MalformedPolicy::Skip);
        for line in input.lines() {
            assert!(aggregator.ingest(line).is_ok());
        }
        let report = aggregator.report();
        assert_eq!(
            report.total_requests() + report.skipped_lines,
            input.lines().count() as u64
        );
    }
});
