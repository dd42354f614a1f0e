//! SCI message audio extraction.
//!
//! Voice lines live in one shared `RESOURCE.AUD`. Each room has a
//! `<room>.MAP` that maps a (noun, verb, cond, seq) selector to the offset
//! of a chunk in that file. Chunks are either RIFF/WAVE, written out as-is,
//! or Sierra SOL, which carries its own header.
//!
//! # Example
//!
//! ```no_run
//! use scires_audio::{Extraction, Selector, VoiceLibrary};
//!
//! let mut library = VoiceLibrary::open("game")?;
//! if let Extraction::Found(voice) = library.extract(230, Selector::new(28, 0, 0, 1))? {
//!     std::fs::write(voice.file_name(), &voice.chunk.data)?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod chunk;
mod error;
#[cfg(feature = "serde")]
mod interchange;
mod library;
mod map;

pub use chunk::{
    ChunkExtractor, ChunkHeader, ChunkSniffer, Extracted, ReadSeek, ResourceChunk, SkipReason,
    Sniff, SolSniffer, WaveSniffer, RESOURCE_HEADER_SIZE, RIFF_TAG, SIERRA_AUDIO_TYPE,
    SOL_HEADER_SIZE, SOL_TAG,
};
pub use error::{Error, Result};
#[cfg(feature = "serde")]
pub use interchange::{read_voice_requests, VoiceRequest};
pub use library::{ExtractedVoice, Extraction, VoiceLibrary, RESOURCE_AUD};
pub use map::{AudioMap, AudioMapEntry, Selector, END_OF_MAP, MAP_SIGNATURE};
