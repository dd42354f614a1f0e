//! Vocabulary resource layouts.

/// Signature at the start of a new-format vocabulary (`vocab.900`).
pub const NEW_SIGNATURE: [u8; 2] = [0x86, 0x00];

/// Number of 16-bit pointer slots in the old layout (one per letter).
pub const OLD_POINTER_SLOTS: usize = 26;

/// Number of 16-bit pointer slots in the new layout.
pub const NEW_POINTER_SLOTS: usize = 255;

/// The two vocabulary layouts.
///
/// The old layout (`vocab.000`) stores 7-bit text and marks the last
/// character of each word with the high bit. The new layout (`vocab.900`)
/// stores 8-bit text followed by an explicit zero terminator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VocabFormat {
    #[default]
    Old,
    New,
}

impl VocabFormat {
    /// Signature bytes preceding the pointer table, if the layout has one.
    pub const fn signature(self) -> Option<&'static [u8; 2]> {
        match self {
            VocabFormat::Old => None,
            VocabFormat::New => Some(&NEW_SIGNATURE),
        }
    }

    /// Default number of leading pointer slots.
    pub const fn pointer_slots(self) -> usize {
        match self {
            VocabFormat::Old => OLD_POINTER_SLOTS,
            VocabFormat::New => NEW_POINTER_SLOTS,
        }
    }
}
