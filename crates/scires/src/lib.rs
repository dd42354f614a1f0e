//! Scires - Sierra SCI game resource library.
//!
//! This crate provides a unified interface to the scires crates for working
//! with the resources of SCI adventure games.
//!
//! # Crates
//!
//! - [`scires_common`] - Common utilities (binary reading, shared errors)
//! - [`scires_vocab`] - Parser vocabulary (`vocab.000` / `vocab.900`) codec
//! - [`scires_audio`] - Audio maps (`<room>.MAP`) and `RESOURCE.AUD` chunks
//!
//! # Example
//!
//! ```no_run
//! use scires::prelude::*;
//!
//! // Decode an old-format vocabulary and group it by synonym id
//! let data = std::fs::read("vocab.000")?;
//! let entries = VocabDecoder::new(VocabFormat::Old).decode(&data)?;
//! let grouped = GroupedVocab::from_entries(entries);
//! println!("Groups: {}", grouped.len());
//!
//! // Extract one voice line
//! let mut library = VoiceLibrary::open(".")?;
//! if let Extraction::Found(voice) = library.extract(230, Selector::new(28, 0, 0, 1))? {
//!     println!("{}: {} bytes", voice.file_name(), voice.chunk.data.len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use scires_audio as audio;
pub use scires_common as common;
pub use scires_vocab as vocab;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use scires_audio::{
        AudioMap, AudioMapEntry, ChunkExtractor, ChunkHeader, ExtractedVoice, Extraction,
        Selector, VoiceLibrary,
    };
    pub use scires_common::BinaryReader;
    pub use scires_vocab::{
        CodePage, EncoderGroup, GroupedVocab, VocabDecoder, VocabEncoder, VocabFormat, VocabGroup,
        WordClass, WordClassSet,
    };
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
