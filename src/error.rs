//! Error taxonomy for the analyzer.
//!
//! Degenerate inputs (no detections, no inference time) are not errors; they
//! fall back to zero means and ratios. Only precondition violations, a
//! comparison without enough history, and export failures are reported here.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalyzerError>;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// A parallel detection sequence does not have the same length as `boxes`.
    #[error("detection set precondition violated: `{field}` has {actual} entries, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A class identifier does not index into the label table.
    #[error("detection #{index} has class id {class_id}, but the label table has {labels} entries")]
    UnknownClass {
        index: usize,
        class_id: usize,
        labels: usize,
    },

    /// Comparison needs the two most recent records.
    #[error("insufficient history: {available} record(s) available, comparison needs 2")]
    InsufficientHistory { available: usize },

    /// Reading or writing an exported report failed.
    #[error("report I/O failed for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("report encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid analyzer config: {0}")]
    InvalidConfig(String),
}

impl AnalyzerError {
    /// True for conditions the caller can recover from by trying again later.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AnalyzerError::InsufficientHistory { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_insufficient_history_is_recoverable() {
        assert!(AnalyzerError::InsufficientHistory { available: 1 }.is_recoverable());
        assert!(!AnalyzerError::UnknownClass {
            index: 0,
            class_id: 9,
            labels: 2
        }
        .is_recoverable());
    }

    #[test]
    fn messages_name_the_violated_precondition() {
        let err = AnalyzerError::LengthMismatch {
            field: "confidences",
            expected: 3,
            actual: 2,
        };
        assert_eq!(
            err.to_string(),
            "detection set precondition violated: `confidences` has 2 entries, expected 3"
        );
    }
}
