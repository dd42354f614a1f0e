//! Vocabulary decoding.
//!
//! Word records are prefix-compressed: each record starts with the number of
//! leading characters shared with the previous word, followed by the
//! remaining characters and the packed class/group record. The decoder walks
//! the buffer once with an explicit two-state machine.

use scires_common::BinaryReader;

use crate::class::{unpack_record, WordClassSet};
use crate::{CodePage, Result, VocabFormat};

/// One decoded word occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabEntry {
    /// The word text.
    pub text: String,
    /// Classes the word may play.
    pub classes: WordClassSet,
    /// Synonym group id (12 bits).
    pub group: u16,
}

/// Where the decoder is within a word record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WordState {
    /// The next byte is the shared-prefix length.
    StartOfWord,
    /// Text bytes are being accumulated.
    Accumulating,
}

/// Decoder for old- and new-format vocabulary resources.
#[derive(Debug, Clone)]
pub struct VocabDecoder {
    format: VocabFormat,
    pointer_slots: usize,
    code_page: CodePage,
}

impl VocabDecoder {
    /// Create a decoder for a layout with its default pointer table size.
    pub fn new(format: VocabFormat) -> Self {
        Self {
            format,
            pointer_slots: format.pointer_slots(),
            code_page: CodePage::default(),
        }
    }

    /// Override the number of leading 16-bit pointer slots to skip.
    pub fn with_pointer_slots(mut self, pointer_slots: usize) -> Self {
        self.pointer_slots = pointer_slots;
        self
    }

    /// Set the code page used to decode word text.
    pub fn with_code_page(mut self, code_page: CodePage) -> Self {
        self.code_page = code_page;
        self
    }

    pub fn format(&self) -> VocabFormat {
        self.format
    }

    /// Decode every word record in the buffer, in file order.
    ///
    /// A missing signature or a record cut off by the end of the buffer is
    /// fatal. The buffer may end only between records.
    pub fn decode(&self, data: &[u8]) -> Result<Vec<VocabEntry>> {
        let mut reader = BinaryReader::new(data);

        if let Some(signature) = self.format.signature() {
            reader.expect_magic(signature)?;
        }
        reader.skip(self.pointer_slots * 2)?;

        let mut entries = Vec::new();
        let mut word: Vec<u8> = Vec::new();
        let mut state = WordState::StartOfWord;

        loop {
            match state {
                WordState::StartOfWord => {
                    if reader.is_empty() {
                        break;
                    }
                    let shared = usize::from(reader.read_u8()?);
                    word.truncate(shared);
                    state = WordState::Accumulating;
                }
                WordState::Accumulating => {
                    let finished = match self.format {
                        VocabFormat::New => {
                            word.extend_from_slice(reader.read_until_nul()?);
                            true
                        }
                        // High bit marks the last character.
                        VocabFormat::Old => {
                            let byte = reader.read_u8()?;
                            word.push(byte & 0x7F);
                            byte & 0x80 != 0
                        }
                    };

                    if finished {
                        let (classes, group) = unpack_record(reader.read_struct::<[u8; 3]>()?);
                        entries.push(VocabEntry {
                            text: self.code_page.decode(&word).into_owned(),
                            classes,
                            group,
                        });
                        state = WordState::StartOfWord;
                    }
                }
            }
        }

        tracing::debug!(
            format = ?self.format,
            words = entries.len(),
            "decoded vocabulary"
        );
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, WordClass};

    fn old_header() -> Vec<u8> {
        vec![0u8; 26 * 2]
    }

    #[test]
    fn test_decode_old_with_prefix_reuse() {
        let mut data = old_header();
        // "look": noun|imperative verb, group 0x012
        data.extend_from_slice(&[0, b'l', b'o', b'o', b'k' | 0x80, 0x90, 0x00, 0x12]);
        // "lookup" shares 4 characters: "up"
        data.extend_from_slice(&[4, b'u', b'p' | 0x80, 0x80, 0x00, 0x12]);
        // "lamp" shares 1 character
        data.extend_from_slice(&[1, b'a', b'm', b'p' | 0x80, 0x10, 0x00, 0x34]);

        let entries = VocabDecoder::new(VocabFormat::Old).decode(&data).unwrap();
        let texts: Vec<_> = entries.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, ["look", "lookup", "lamp"]);

        assert_eq!(entries[0].group, 0x012);
        assert!(entries[0].classes.contains(WordClass::Noun));
        assert!(entries[0].classes.contains(WordClass::ImperativeVerb));
        assert_eq!(entries[1].classes.bits(), 0x800);
        assert_eq!(entries[2].classes.bits(), 0x100);
        assert_eq!(entries[2].group, 0x034);
    }

    #[test]
    fn test_single_character_word() {
        let mut data = old_header();
        data.extend_from_slice(&[0, b'a' | 0x80, 0x02, 0x00, 0x01]);

        let entries = VocabDecoder::new(VocabFormat::Old).decode(&data).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "a");
        assert_eq!(entries[0].classes.bits(), 0x020);
    }

    #[test]
    fn test_prefix_longer_than_previous_word() {
        let mut data = old_header();
        data.extend_from_slice(&[0, b'o', b'n' | 0x80, 0x01, 0x00, 0x01]);
        data.extend_from_slice(&[9, b'e' | 0x80, 0x01, 0x00, 0x02]);

        let entries = VocabDecoder::new(VocabFormat::Old).decode(&data).unwrap();
        assert_eq!(entries[1].text, "one");
    }

    #[test]
    fn test_custom_pointer_slots() {
        let data = [0, 0, 0, b'x' | 0x80, 0x10, 0x00, 0x07];
        let entries = VocabDecoder::new(VocabFormat::Old)
            .with_pointer_slots(1)
            .decode(&data)
            .unwrap();
        assert_eq!(entries[0].text, "x");
        assert_eq!(entries[0].group, 7);
    }

    #[test]
    fn test_empty_word_list() {
        let entries = VocabDecoder::new(VocabFormat::Old).decode(&old_header()).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_truncated_text_is_fatal() {
        let mut data = old_header();
        data.extend_from_slice(&[0, b'l', b'o']);
        assert!(matches!(
            VocabDecoder::new(VocabFormat::Old).decode(&data),
            Err(Error::Common(scires_common::Error::UnexpectedEof { .. }))
        ));
    }

    #[test]
    fn test_truncated_record_is_fatal() {
        let mut data = old_header();
        data.extend_from_slice(&[0, b'o' | 0x80, 0x10]);
        assert!(VocabDecoder::new(VocabFormat::Old).decode(&data).is_err());
    }

    #[test]
    fn test_truncated_pointer_table_is_fatal() {
        assert!(VocabDecoder::new(VocabFormat::Old).decode(&[0u8; 10]).is_err());
    }

    #[test]
    fn test_decode_new_format() {
        let mut data = NEW_SIGNATURE_WITH_TABLE.to_vec();
        data.extend_from_slice(&[0, 0xF9, 0xEC, 0xE5, 0xED, 0, 0x10, 0x00, 0x05]);
        data.extend_from_slice(&[0, b'h', b'i', 0, 0x10, 0x00, 0x05]);

        let entries = VocabDecoder::new(VocabFormat::New).decode(&data).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].text, "שלום");
        assert_eq!(entries[1].text, "hi");
        assert_eq!(entries[1].group, 5);
    }

    #[test]
    fn test_new_format_missing_terminator_is_fatal() {
        let mut data = NEW_SIGNATURE_WITH_TABLE.to_vec();
        data.extend_from_slice(&[0, b'h', b'i', 0, 0x10, 0x00, 0x05]);
        data.extend_from_slice(&[1, b'a', b't']);
        assert!(matches!(
            VocabDecoder::new(VocabFormat::New).decode(&data),
            Err(Error::Common(scires_common::Error::MissingNullTerminator(_)))
        ));
    }

    #[test]
    fn test_new_format_bad_signature() {
        let mut data = vec![0x87, 0x00];
        data.extend_from_slice(&[0u8; 510]);
        assert!(matches!(
            VocabDecoder::new(VocabFormat::New).decode(&data),
            Err(Error::Common(scires_common::Error::InvalidMagic { .. }))
        ));
    }

    const NEW_SIGNATURE_WITH_TABLE: [u8; 512] = {
        let mut header = [0u8; 512];
        header[0] = 0x86;
        header
    };
}
