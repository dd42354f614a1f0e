//! Common utilities for scires.
//!
//! This crate provides the foundational types shared by the resource crates:
//!
//! - [`BinaryReader`] - Zero-copy little-endian reading from byte slices
//! - [`ReadExt`] - Fixed-size structure reads from `Read` streams
//! - [`Error`] - Truncation and signature errors common to every decoder

mod error;
mod reader;

pub use error::{Error, Result};
pub use reader::{BinaryReader, ReadExt};

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

