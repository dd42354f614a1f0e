//! New-format vocabulary encoding.
//!
//! The encoder never emits shared prefixes: every record starts with a zero
//! prefix byte and spells the whole word, followed by a zero terminator.

use std::collections::HashSet;
use std::fmt;

use crate::class::pack_record;
use crate::format::{NEW_POINTER_SLOTS, NEW_SIGNATURE};
use crate::{CodePage, Result, VocabGroup, WordClassSet};

/// One group to encode. A missing group id is assigned automatically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncoderGroup {
    pub group: Option<u16>,
    pub words: Vec<String>,
    pub classes: WordClassSet,
}

impl From<VocabGroup> for EncoderGroup {
    fn from(group: VocabGroup) -> Self {
        Self {
            group: Some(group.group),
            words: group.words,
            classes: group.classes,
        }
    }
}

/// Why a word was left out of the encoded vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The word contains internal whitespace.
    MultiWord,
    /// The word was already emitted, under this or another group.
    Duplicate,
    /// The word has characters outside the code page.
    Unencodable,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RejectReason::MultiWord => "multi-word",
            RejectReason::Duplicate => "duplicate",
            RejectReason::Unencodable => "unencodable",
        })
    }
}

/// A word dropped during encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedWord {
    pub word: String,
    pub group: u16,
    pub reason: RejectReason,
}

/// Output of [`VocabEncoder::encode`].
#[derive(Debug, Clone)]
pub struct EncodedVocab {
    /// The new-format vocabulary resource.
    pub bytes: Vec<u8>,
    /// Number of word records written.
    pub word_count: usize,
    /// Words that were dropped, in input order.
    pub rejected: Vec<RejectedWord>,
}

/// Encoder producing new-format vocabulary resources.
#[derive(Debug, Clone, Default)]
pub struct VocabEncoder {
    code_page: CodePage,
}

impl VocabEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the code page word text is encoded in.
    pub fn with_code_page(mut self, code_page: CodePage) -> Self {
        self.code_page = code_page;
        self
    }

    /// Encode groups in the given order.
    ///
    /// Groups without an id get sequential ids starting one past the
    /// largest id present (or zero when none is). Multi-word, duplicate
    /// and unencodable words are logged, dropped and reported; blank words
    /// are skipped silently. Only a group id that does not fit 12 bits is
    /// an error.
    pub fn encode(&self, groups: &[EncoderGroup]) -> Result<EncodedVocab> {
        let mut next_group = groups
            .iter()
            .filter_map(|g| g.group)
            .max()
            .map_or(0, |max| u32::from(max) + 1);

        let mut bytes = Vec::with_capacity(2 + NEW_POINTER_SLOTS * 2);
        bytes.extend_from_slice(&NEW_SIGNATURE);
        bytes.resize(2 + NEW_POINTER_SLOTS * 2, 0);

        let mut emitted: HashSet<&str> = HashSet::new();
        let mut rejected = Vec::new();
        let mut word_count = 0;

        for entry in groups {
            let group = match entry.group {
                Some(group) => group,
                None => {
                    let assigned = u16::try_from(next_group)
                        .map_err(|_| crate::Error::GroupOutOfRange(next_group))?;
                    next_group += 1;
                    assigned
                }
            };
            let record = pack_record(entry.classes, group)?;

            for word in entry.words.iter().map(|w| w.trim()) {
                if word.is_empty() {
                    continue;
                }

                let encoded = if word.split_whitespace().nth(1).is_some() {
                    Err(RejectReason::MultiWord)
                } else if emitted.contains(word) {
                    Err(RejectReason::Duplicate)
                } else {
                    self.code_page.encode(word).ok_or(RejectReason::Unencodable)
                };

                match encoded {
                    Ok(text) => {
                        bytes.push(0);
                        bytes.extend_from_slice(&text);
                        bytes.push(0);
                        bytes.extend_from_slice(&record);
                        emitted.insert(word);
                        word_count += 1;
                    }
                    Err(reason) => {
                        tracing::warn!(group, word, %reason, "rejecting word");
                        rejected.push(RejectedWord {
                            word: word.to_string(),
                            group,
                            reason,
                        });
                    }
                }
            }
        }

        tracing::debug!(
            words = word_count,
            rejected = rejected.len(),
            code_page = self.code_page.name(),
            "encoded vocabulary"
        );
        Ok(EncodedVocab {
            bytes,
            word_count,
            rejected,
        })
    }
}
