//! Error types for scires-common.

use thiserror::Error;

/// Common error type for scires decoders.
#[derive(Debug, Error)]
pub enum Error {
    /// End of buffer reached while reading.
    #[error("unexpected end of buffer at offset {position}: needed {needed} bytes but only {available} available")]
    UnexpectedEof {
        position: usize,
        needed: usize,
        available: usize,
    },

    /// Invalid signature bytes encountered.
    #[error("invalid signature: expected {expected:02x?}, got {actual:02x?}")]
    InvalidMagic { expected: Vec<u8>, actual: Vec<u8> },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing null terminator in string.
    #[error("string missing null terminator at offset {0}")]
    MissingNullTerminator(usize),
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
