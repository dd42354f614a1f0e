//! Grammatical word classes and the packed class/group record.
//!
//! Every vocabulary word carries a 12-bit class bitmask and a 12-bit synonym
//! group id, packed together into three bytes:
//!
//! ```text
//! byte1 = mask >> 4
//! byte2 = (mask & 0xF) << 4 | group >> 8
//! byte3 = group & 0xFF
//! ```

use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Largest group id representable in the 12-bit group field.
pub const MAX_GROUP: u16 = 0x0FFF;

/// A grammatical role a word may play in the SCI parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum WordClass {
    Conjunction = 0x004,
    Association = 0x008,
    Preposition = 0x010,
    Article = 0x020,
    Adjective = 0x040,
    Pronoun = 0x080,
    Noun = 0x100,
    IndicativeVerb = 0x200,
    Adverb = 0x400,
    ImperativeVerb = 0x800,
}

impl WordClass {
    /// All word classes in ascending bit order.
    pub const ALL: [WordClass; 10] = [
        WordClass::Conjunction,
        WordClass::Association,
        WordClass::Preposition,
        WordClass::Article,
        WordClass::Adjective,
        WordClass::Pronoun,
        WordClass::Noun,
        WordClass::IndicativeVerb,
        WordClass::Adverb,
        WordClass::ImperativeVerb,
    ];

    /// The single bit of the class mask this class occupies.
    #[inline]
    pub const fn bit(self) -> u16 {
        self as u16
    }

    /// Interchange name of this class.
    pub const fn name(self) -> &'static str {
        match self {
            WordClass::Conjunction => "CONJUNCTION",
            WordClass::Association => "ASSOCIATION",
            WordClass::Preposition => "PREPOSITION",
            WordClass::Article => "ARTICLE",
            WordClass::Adjective => "ADJECTIVE",
            WordClass::Pronoun => "PRONOUN",
            WordClass::Noun => "NOUN",
            WordClass::IndicativeVerb => "INDICATIVE_VERB",
            WordClass::Adverb => "ADVERB",
            WordClass::ImperativeVerb => "IMPERATIVE_VERB",
        }
    }

    /// Look up a class by its interchange name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|class| class.name() == name)
    }
}

impl fmt::Display for WordClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WordClass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s).ok_or_else(|| Error::UnknownClassName(s.to_string()))
    }
}

/// A set of word classes, backed by the 12-bit packed class mask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct WordClassSet(u16);

impl WordClassSet {
    /// Mask of every bit with a known class.
    pub const KNOWN_BITS: u16 = 0x0FFC;

    /// The empty set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Build a set from a raw class mask.
    ///
    /// Bits that do not correspond to a known class are dropped.
    pub const fn from_bits(mask: u16) -> Self {
        Self(mask & Self::KNOWN_BITS)
    }

    /// The packed class mask.
    #[inline]
    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, class: WordClass) -> bool {
        self.0 & class.bit() != 0
    }

    pub fn insert(&mut self, class: WordClass) {
        self.0 |= class.bit();
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Check that every class of `other` is also in this set.
    pub const fn is_superset(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Iterate over the classes in ascending bit order.
    pub fn iter(self) -> impl Iterator<Item = WordClass> {
        WordClass::ALL
            .into_iter()
            .filter(move |class| self.contains(*class))
    }

    /// Parse a `|`-separated list of class names.
    ///
    /// Surrounding whitespace is ignored; a blank string is the empty set.
    pub fn parse_names(names: &str) -> Result<Self> {
        names
            .split('|')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::parse::<WordClass>)
            .collect()
    }
}

impl FromIterator<WordClass> for WordClassSet {
    fn from_iter<T: IntoIterator<Item = WordClass>>(iter: T) -> Self {
        let mut set = Self::empty();
        for class in iter {
            set.insert(class);
        }
        set
    }
}

impl fmt::Display for WordClassSet {
    /// Formats as `NOUN | ADJECTIVE`, the interchange representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, class) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            f.write_str(class.name())?;
        }
        Ok(())
    }
}

/// Pack a class set and group id into the 3-byte record trailing each word.
pub fn pack_record(classes: WordClassSet, group: u16) -> Result<[u8; 3]> {
    if group > MAX_GROUP {
        return Err(Error::GroupOutOfRange(group.into()));
    }
    let mask = classes.bits();
    Ok([
        (mask >> 4) as u8,
        (((mask & 0x0F) << 4) as u8) | (group >> 8) as u8,
        (group & 0xFF) as u8,
    ])
}

/// Unpack the 3-byte record trailing each word into its class set and group.
pub fn unpack_record(record: [u8; 3]) -> (WordClassSet, u16) {
    let [b1, b2, b3] = record.map(u16::from);
    let mask = ((b1 << 8) | b2) >> 4;
    let group = ((b2 & 0x0F) << 8) | b3;
    (WordClassSet::from_bits(mask), group)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noun_adjective_roundtrip() {
        let classes: WordClassSet = [WordClass::Noun, WordClass::Adjective].into_iter().collect();
        assert_eq!(classes.bits(), 0x140);

        let record = pack_record(classes, 0x123).unwrap();
        assert_eq!(record, [0x14, 0x01, 0x23]);

        let (decoded, group) = unpack_record(record);
        assert_eq!(decoded, classes);
        assert_eq!(decoded.iter().collect::<Vec<_>>(), vec![WordClass::Adjective, WordClass::Noun]);
        assert_eq!(group, 0x123);
    }

    #[test]
    fn test_unknown_bits_ignored() {
        // Bits 0 and 1 have no class.
        let (classes, group) = unpack_record([0x10, 0x30, 0x05]);
        assert_eq!(classes, WordClassSet::from_bits(0x100));
        assert_eq!(group, 0x005);
        assert!(WordClassSet::from_bits(0x0003).is_empty());
    }

    #[test]
    fn test_group_out_of_range() {
        assert!(matches!(
            pack_record(WordClassSet::empty(), 0x1000),
            Err(Error::GroupOutOfRange(0x1000))
        ));
        assert!(pack_record(WordClassSet::empty(), MAX_GROUP).is_ok());
    }

    #[test]
    fn test_names_roundtrip() {
        let set = WordClassSet::parse_names(" NOUN |IMPERATIVE_VERB| ").unwrap();
        assert_eq!(set.bits(), 0x900);
        assert_eq!(set.to_string(), "NOUN | IMPERATIVE_VERB");
        assert_eq!(WordClassSet::parse_names("").unwrap(), WordClassSet::empty());
        assert!(matches!(
            WordClassSet::parse_names("NOUN | VERB"),
            Err(Error::UnknownClassName(name)) if name == "VERB"
        ));
    }

    #[test]
    fn test_table_bits_are_disjoint() {
        let mut seen = 0u16;
        for class in WordClass::ALL {
            assert_eq!(class.bit().count_ones(), 1);
            assert_eq!(seen & class.bit(), 0);
            seen |= class.bit();
            assert_eq!(WordClass::from_name(class.name()), Some(class));
        }
        assert_eq!(seen, WordClassSet::KNOWN_BITS);
    }

    #[test]
    fn test_superset() {
        let noun = WordClassSet::from_bits(WordClass::Noun.bit());
        let both = noun.union(WordClassSet::from_bits(WordClass::Adjective.bit()));
        assert!(both.is_superset(noun));
        assert!(!noun.is_superset(both));
    }
}
