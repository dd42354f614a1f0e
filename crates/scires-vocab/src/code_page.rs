//! Single-byte code page used for new-format vocabulary text.

use std::borrow::Cow;
use std::fmt;

use encoding_rs::{Encoding, WINDOWS_1255};

/// An 8-bit code page for word text.
///
/// The default is Windows-1255, which new-format vocabularies of Hebrew
/// translations are written in. The ASCII range is shared by every
/// supported code page, so old-format 7-bit text decodes identically.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CodePage(&'static Encoding);

impl CodePage {
    /// Look up a single-byte code page by its WHATWG label (e.g. `windows-1252`).
    pub fn for_label(label: &str) -> Option<Self> {
        Encoding::for_label(label.trim().as_bytes())
            .filter(|encoding| encoding.is_single_byte())
            .map(Self)
    }

    /// Canonical name of the code page.
    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    /// Encode text, or `None` if any character is not representable.
    pub fn encode<'a>(&self, text: &'a str) -> Option<Cow<'a, [u8]>> {
        let (bytes, _, had_errors) = self.0.encode(text);
        (!had_errors).then_some(bytes)
    }

    /// Decode bytes into text.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Cow<'a, str> {
        self.0.decode_without_bom_handling(bytes).0
    }
}

impl Default for CodePage {
    fn default() -> Self {
        Self(WINDOWS_1255)
    }
}

impl fmt::Debug for CodePage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CodePage").field(&self.name()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hebrew_roundtrip() {
        let page = CodePage::default();
        let bytes = page.encode("שלום").unwrap();
        assert_eq!(bytes.as_ref(), &[0xF9, 0xEC, 0xE5, 0xED]);
        assert_eq!(page.decode(&bytes), "שלום");
    }

    #[test]
    fn test_unrepresentable() {
        assert!(CodePage::default().encode("привет").is_none());
    }

    #[test]
    fn test_labels() {
        assert_eq!(CodePage::for_label("windows-1252").unwrap().name(), "windows-1252");
        assert!(CodePage::for_label("utf-8").is_none());
        assert!(CodePage::for_label("not-a-code-page").is_none());
    }
}
