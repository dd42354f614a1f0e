//! Error types for audio map decoding and chunk extraction.

use thiserror::Error;

/// Errors that can occur when working with audio maps and resource files.
///
/// Chunks of an unknown or unsupported kind are not errors; extraction
/// reports them as skipped so the caller can move on to the next entry.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error (truncated buffer, bad signature).
    #[error("{0}")]
    Common(#[from] scires_common::Error),

    /// The map ended before its end-of-map record.
    #[error("map for room {room} ends at offset {position} without an end-of-map record")]
    MissingEndOfMap { room: u16, position: usize },

    /// Accumulated offsets exceeded 32 bits.
    #[error("map for room {room} accumulates an offset beyond 4 GiB")]
    OffsetOverflow { room: u16 },

    /// More than one map entry has the requested selector.
    #[error("room {room} has {count} entries for noun {noun}, verb {verb}, cond {cond}, seq {seq}")]
    AmbiguousSelector {
        room: u16,
        noun: u8,
        verb: u8,
        cond: u8,
        seq: u8,
        count: usize,
    },

    /// A chunk's declared size cannot be represented.
    #[error("chunk at offset {offset:#x} declares a size beyond 4 GiB")]
    ChunkSizeOverflow { offset: u64 },

    /// The resource file ends inside a chunk.
    #[error("chunk at offset {offset:#x} is truncated: expected {expected} bytes")]
    TruncatedChunk { offset: u64, expected: u32 },

    /// CSV reading error.
    #[cfg(feature = "serde")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for audio operations.
pub type Result<T> = std::result::Result<T, Error>;
