//! Error types for diffx.

use thiserror::Error;

/// Result type alias for diffx operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while computing or replaying an edit script.
#[derive(Error, Debug)]
pub enum Error {
    /// The comparison matrix would exceed the configured cell limit.
    ///
    /// Callers can retry with slicing enabled, raise the threshold, or
    /// reject the input.
    #[error("Diff too large: {size} cells exceeds threshold of {threshold}")]
    SizeLimit { size: usize, threshold: usize },

    /// A Myers search ran past every possible edit distance.
    ///
    /// This only happens when the equality relation is inconsistent or an
    /// algorithm invariant is broken. It must not be retried.
    #[error("{algorithm}: no edit path found within {max_d} steps")]
    SearchExhausted { algorithm: &'static str, max_d: usize },

    /// An edit script does not fit the sequence it was applied to.
    #[error("Invalid edit script: {0}")]
    InvalidScript(String),

    /// The algorithm name is not recognised.
    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// The algorithm requires structured (XML-shaped) tokens.
    #[error("Algorithm {0} requires structured tokens")]
    UnsupportedAlgorithm(&'static str),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns true when a caller may reasonably retry with other settings.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::SizeLimit { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_limit_message() {
        let err = Error::SizeLimit {
            size: 100,
            threshold: 10,
        };
        assert_eq!(
            err.to_string(),
            "Diff too large: 100 cells exceeds threshold of 10"
        );
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_search_exhausted_is_fatal() {
        let err = Error::SearchExhausted {
            algorithm: "myers-greedy",
            max_d: 4,
        };
        assert!(!err.is_recoverable());
        assert!(err.to_string().contains("myers-greedy"));
    }
}
