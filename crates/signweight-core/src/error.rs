//! Error types for SignWeight

use thiserror::Error;

/// Main error type for SignWeight operations
#[derive(Debug, Error)]
pub enum SignWeightError {
    /// Error in weight configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Corpus could not be loaded
    #[error("Corpus error: {0}")]
    Corpus(String),

    /// Solver failed for a reason other than the problem itself
    #[error("Solver error: {0}")]
    Solver(String),

    /// Filesystem error while reading inputs or writing the weight map
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error (should not occur in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A tabular row that could not be turned into an inscription or table entry.
///
/// Malformed rows are skipped and collected, never fatal to a load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {reason}")]
pub struct MalformedRowError {
    /// 1-based line number in the source text.
    pub line: usize,
    /// What was wrong with the row.
    pub reason: String,
}

impl MalformedRowError {
    pub fn new(line: usize, reason: impl Into<String>) -> Self {
        Self {
            line,
            reason: reason.into(),
        }
    }
}

/// Result type alias for SignWeight operations
pub type Result<T> = std::result::Result<T, SignWeightError>;
