//! SCI parser vocabulary codec.
//!
//! The vocabulary resource maps every word the text parser understands to a
//! set of grammatical classes and a synonym group. It comes in two layouts:
//!
//! - **Old** (`vocab.000`): 26 pointer slots, 7-bit text whose last
//!   character has the high bit set.
//! - **New** (`vocab.900`): signature `86 00`, 255 pointer slots, 8-bit text
//!   with an explicit zero terminator.
//!
//! Both layouts prefix-compress words and end each record with three packed
//! bytes holding the 12-bit class mask and 12-bit group id.
//!
//! # Example
//!
//! ```no_run
//! use scires_vocab::{EncoderGroup, GroupedVocab, VocabDecoder, VocabEncoder, VocabFormat};
//!
//! let old = std::fs::read("vocab.000")?;
//! let entries = VocabDecoder::new(VocabFormat::Old).decode(&old)?;
//! let grouped = GroupedVocab::from_entries(entries);
//!
//! let groups: Vec<EncoderGroup> = grouped.into_groups().into_iter().map(Into::into).collect();
//! let encoded = VocabEncoder::new().encode(&groups)?;
//! std::fs::write("vocab.900", &encoded.bytes)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod class;
mod code_page;
mod decoder;
mod encoder;
mod error;
mod format;
mod grouper;
#[cfg(feature = "serde")]
mod interchange;

pub use class::{pack_record, unpack_record, WordClass, WordClassSet, MAX_GROUP};
pub use code_page::CodePage;
pub use decoder::{VocabDecoder, VocabEntry};
pub use encoder::{EncodedVocab, EncoderGroup, RejectReason, RejectedWord, VocabEncoder};
pub use error::{Error, Result};
pub use format::{VocabFormat, NEW_POINTER_SLOTS, NEW_SIGNATURE, OLD_POINTER_SLOTS};
pub use grouper::{ClassMismatch, GroupedVocab, VocabGroup};
#[cfg(feature = "serde")]
pub use interchange::{read_vocab_csv, write_vocab_csv, VocabRow};
