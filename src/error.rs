//! Error types for log parsing and aggregation

use thiserror::Error;

/// Errors that can occur while reading and aggregating an access log
#[derive(Error, Debug)]
pub enum LogError {
    #[error("Malformed line {line_no}: {reason}: {line:?}")]
    MalformedLine {
        /// 1-based line number, or 0 when the line was ingested directly
        line_no: usize,
        line: String,
        reason: String,
    },

    #[error("Invalid latency on line {line_no}: {latency_ms} ms (must be >= 0)")]
    InvalidInput {
        /// 1-based line number, or 0 when classified outside a log
        line_no: usize,
        latency_ms: i64,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LogError {
    /// Attach a line number to a line error raised without one
    pub fn at_line(self, line_no: usize) -> Self {
        match self {
            LogError::MalformedLine { line, reason, .. } => LogError::MalformedLine {
                line_no,
                line,
                reason,
            },
            LogError::InvalidInput { latency_ms, .. } => LogError::InvalidInput {
                line_no,
                latency_ms,
            },
            other => other,
        }
    }

    /// True for errors caused by the content of a single line
    ///
    /// These are the errors the skip policy may swallow; I/O and
    /// configuration errors always propagate.
    pub fn is_line_error(&self) -> bool {
        matches!(
            self,
            LogError::MalformedLine { .. } | LogError::InvalidInput { .. }
        )
    }
}

/// Result type for log analysis operations
pub type Result<T> = std::result::Result<T, LogError>;
