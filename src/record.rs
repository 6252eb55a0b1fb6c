//! Access log record parsing
//!
//! One record per line: `<path> <latency_ms>`, separated by any run of
//! whitespace.

use crate::error::{LogError, Result};

/// A single parsed access log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Request path, e.g. "/articles/15-thinking-in-edge-cases/"
    pub path: String,
    /// Response time in milliseconds (may be negative until classified)
    pub latency_ms: i64,
}

impl LogRecord {
    /// Parse a line into a record
    ///
    /// The line must hold exactly two whitespace-separated fields and the
    /// second must parse as an integer. Errors carry line number 0; use
    /// [`LogError::at_line`] to attach the real position.
    pub fn parse(line: &str) -> Result<Self> {
        let mut fields = line.split_whitespace();

        let (path, latency) = match (fields.next(), fields.next(), fields.next()) {
            (Some(path), Some(latency), None) => (path, latency),
            _ => {
                return Err(malformed(
                    line,
                    format!("expected 2 fields, found {}", line.split_whitespace().count()),
                ))
            }
        };

        let latency_ms = latency.parse::<i64>().map_err(|e| {
            malformed(line, format!("latency {:?} is not an integer ({})", latency, e))
        })?;

        Ok(Self {
            path: path.to_string(),
            latency_ms,
        })
    }
}

fn malformed(line: &str, reason: String) -> LogError {
    LogError::MalformedLine {
        line_no: 0,
        line: line.to_string(),
        reason,
    }
}
