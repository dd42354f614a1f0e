//! Error types for vocabulary decoding and encoding.

use thiserror::Error;

/// Errors that can occur when working with vocabulary resources.
///
/// Rejected words and class mismatches are not errors; they are reported
/// on the result of the operation and processing continues.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error (truncated buffer, bad signature).
    #[error("{0}")]
    Common(#[from] scires_common::Error),

    /// Group id does not fit the 12-bit group field.
    #[error("group id {0} does not fit in 12 bits (max 4095)")]
    GroupOutOfRange(u32),

    /// Class name not present in the word class table.
    #[error("unknown word class name: {0:?}")]
    UnknownClassName(String),

    /// CSV reading or writing error.
    #[cfg(feature = "serde")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for vocabulary operations.
pub type Result<T> = std::result::Result<T, Error>;
