//! Error types for bitsieve.

use thiserror::Error;

/// Top-level error type for index construction and persistence.
#[derive(Debug, Error)]
pub enum BitsieveError {
    /// A record carried a set bit at or beyond the configured width.
    #[error("bit {bit} out of range for index width {width}")]
    BitOutOfRange {
        /// The offending bit position.
        bit: usize,
        /// The configured index width.
        width: usize,
    },

    /// The build configuration cannot be honored.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A serialized tree failed header or structural validation.
    #[error("corrupt index data: {0}")]
    Corrupt(String),

    /// I/O error wrapper.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Tree encoding/decoding error.
    #[error("encoding error: {0}")]
    Encode(#[from] bincode::Error),
}

/// Result type for bitsieve operations.
pub type Result<T> = std::result::Result<T, BitsieveError>;
