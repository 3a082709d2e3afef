//! Error types for the SEQMEM core library.

use thiserror::Error;

/// Top-level error type for all SEQMEM operations.
#[derive(Error, Debug)]
pub enum SeqMemError {
    /// A cell index fell outside `[0, cell_count)`.
    #[error("Cell out of range: {cell} (cell count: {cell_count})")]
    CellOutOfRange {
        /// The offending index.
        cell: usize,
        /// Number of cells the dial was built with.
        cell_count: usize,
    },

    /// A feature vector did not have the configured dimensionality.
    #[error("Feature dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// The configured `feature_dim`.
        expected: usize,
        /// Length of the vector that was passed in.
        actual: usize,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, SeqMemError>;
