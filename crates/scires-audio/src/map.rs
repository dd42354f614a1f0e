//! Per-room audio map (`<room>.MAP`) decoding.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use scires_common::BinaryReader;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::{Error, Result};

/// Signature at the start of every audio map.
pub const MAP_SIGNATURE: [u8; 2] = [0x90, 0x00];

/// `seq` value of the end-of-map record.
pub const END_OF_MAP: u8 = 0xFF;

/// The (noun, verb, cond, seq) tuple identifying one line of message audio.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    FromBytes,
    IntoBytes,
    Immutable,
    KnownLayout,
    Unaligned,
)]
#[repr(C)]
pub struct Selector {
    pub noun: u8,
    pub verb: u8,
    pub cond: u8,
    pub seq: u8,
}

impl Selector {
    pub const fn new(noun: u8, verb: u8, cond: u8, seq: u8) -> Self {
        Self {
            noun,
            verb,
            cond,
            seq,
        }
    }

    /// Whether this record marks the end of the map.
    pub const fn is_end_of_map(&self) -> bool {
        self.seq == END_OF_MAP
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}_{}", self.noun, self.verb, self.cond, self.seq)
    }
}

/// One entry of a room's audio map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioMapEntry {
    pub room: u16,
    pub noun: u8,
    pub verb: u8,
    pub cond: u8,
    pub seq: u8,
    /// Absolute offset of the chunk in `RESOURCE.AUD`.
    pub offset: u32,
}

impl AudioMapEntry {
    pub const fn selector(&self) -> Selector {
        Selector::new(self.noun, self.verb, self.cond, self.seq)
    }
}

/// The decoded audio map of one room.
#[derive(Debug, Clone)]
pub struct AudioMap {
    room: u16,
    entries: Vec<AudioMapEntry>,
    consumed: usize,
}

impl AudioMap {
    /// Decode a room's map.
    ///
    /// The map is a signature, a 32-bit base offset, then records of a
    /// selector and a 24-bit delta added to the running offset. Decoding
    /// stops at the first record whose `seq` is [`END_OF_MAP`]; that record
    /// has no delta and is not emitted. Running out of bytes before it is
    /// fatal.
    pub fn parse(room: u16, data: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data);
        reader.expect_magic(&MAP_SIGNATURE)?;

        let mut offset = reader.read_u32()?;
        let mut entries = Vec::new();

        loop {
            if reader.is_empty() {
                return Err(Error::MissingEndOfMap {
                    room,
                    position: reader.position(),
                });
            }

            let selector: Selector = reader.read_struct()?;
            if selector.is_end_of_map() {
                break;
            }

            let delta = reader.read_u24()?;
            offset = offset
                .checked_add(delta)
                .ok_or(Error::OffsetOverflow { room })?;

            entries.push(AudioMapEntry {
                room,
                noun: selector.noun,
                verb: selector.verb,
                cond: selector.cond,
                seq: selector.seq,
                offset,
            });
        }

        tracing::debug!(room, entries = entries.len(), "decoded audio map");
        Ok(Self {
            room,
            entries,
            consumed: reader.position(),
        })
    }

    /// Read and decode `<room>.MAP` from a directory.
    pub fn open<P: AsRef<Path>>(dir: P, room: u16) -> Result<Self> {
        let path = resolve_resource_path(dir.as_ref(), &format!("{room}.MAP"))?;
        let data = fs::read(path)?;
        Self::parse(room, &data)
    }

    pub fn room(&self) -> u16 {
        self.room
    }

    /// Entries in file order.
    pub fn entries(&self) -> &[AudioMapEntry] {
        &self.entries
    }

    /// Bytes consumed, up to and including the end-of-map record.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Find the entry for a selector.
    ///
    /// Several entries with the same selector make the map ambiguous, which
    /// is an error.
    pub fn find(&self, selector: Selector) -> Result<Option<&AudioMapEntry>> {
        let mut matches = self.entries.iter().filter(|e| e.selector() == selector);
        let first = matches.next();
        let others = matches.count();

        if others > 0 {
            return Err(Error::AmbiguousSelector {
                room: self.room,
                noun: selector.noun,
                verb: selector.verb,
                cond: selector.cond,
                seq: selector.seq,
                count: others + 1,
            });
        }
        Ok(first)
    }
}

/// Locate a resource file, accepting an all-lowercase name as well.
pub(crate) fn resolve_resource_path(dir: &Path, name: &str) -> io::Result<PathBuf> {
    let exact = dir.join(name);
    if exact.is_file() {
        return Ok(exact);
    }

    let lower = dir.join(name.to_ascii_lowercase());
    if lower.is_file() {
        return Ok(lower);
    }

    Err(io::Error::new(
        io::ErrorKind::NotFound,
        format!("{} not found", exact.display()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_bytes(base: u32, records: &[&[u8]]) -> Vec<u8> {
        let mut data = MAP_SIGNATURE.to_vec();
        data.extend_from_slice(&base.to_le_bytes());
        for record in records {
            data.extend_from_slice(record);
        }
        data
    }

    #[test]
    fn test_first_record_is_terminator() {
        let data = map_bytes(0, &[&[0x01, 0x02, 0x03, 0xFF]]);
        let map = AudioMap::parse(7, &data).unwrap();

        assert!(map.entries().is_empty());
        assert_eq!(map.consumed(), data.len());
    }

    #[test]
    fn test_single_entry_then_terminator() {
        let data = map_bytes(
            0x10,
            &[&[0x05, 0x00, 0x00, 0x00], &[0x02, 0x00, 0x00], &[0x06, 0x01, 0x00, 0xFF]],
        );
        let map = AudioMap::parse(230, &data).unwrap();

        assert_eq!(
            map.entries(),
            &[AudioMapEntry {
                room: 230,
                noun: 5,
                verb: 0,
                cond: 0,
                seq: 0,
                offset: 0x12,
            }]
        );
        assert_eq!(map.consumed(), data.len());
    }

    #[test]
    fn test_trailing_bytes_after_terminator_ignored() {
        let mut data = map_bytes(0, &[&[0x00, 0x00, 0x00, 0xFF]]);
        data.extend_from_slice(&[0xAA; 5]);
        let map = AudioMap::parse(1, &data).unwrap();
        assert_eq!(map.consumed(), 10);
    }

    #[test]
    fn test_offsets_accumulate() {
        let data = map_bytes(
            0x100,
            &[
                &[1, 0, 0, 1],
                &[0x00, 0x00, 0x00],
                &[2, 0, 0, 1],
                &[0x34, 0x12, 0x01],
                &[3, 4, 5, 2],
                &[0x01, 0x00, 0x00],
                &[0, 0, 0, 0xFF],
            ],
        );
        let map = AudioMap::parse(3, &data).unwrap();
        let offsets: Vec<_> = map.entries().iter().map(|e| e.offset).collect();
        assert_eq!(offsets, [0x100, 0x11334, 0x11335]);
        assert_eq!(map.entries()[2].selector(), Selector::new(3, 4, 5, 2));
    }

    #[test]
    fn test_bad_signature() {
        let mut data = map_bytes(0, &[&[0, 0, 0, 0xFF]]);
        data[0] = 0x91;
        assert!(matches!(
            AudioMap::parse(1, &data),
            Err(Error::Common(scires_common::Error::InvalidMagic { .. }))
        ));
    }

    #[test]
    fn test_missing_end_of_map() {
        let data = map_bytes(0, &[&[1, 0, 0, 1], &[0x10, 0x00, 0x00]]);
        assert!(matches!(
            AudioMap::parse(9, &data),
            Err(Error::MissingEndOfMap { room: 9, position: 13 })
        ));
    }

    #[test]
    fn test_truncated_record() {
        let data = map_bytes(0, &[&[1, 0, 0, 1], &[0x10]]);
        assert!(matches!(
            AudioMap::parse(9, &data),
            Err(Error::Common(scires_common::Error::UnexpectedEof { .. }))
        ));

        let data = map_bytes(0, &[&[1, 0]]);
        assert!(AudioMap::parse(9, &data).is_err());
    }

    #[test]
    fn test_offset_overflow() {
        let data = map_bytes(u32::MAX, &[&[1, 0, 0, 1], &[0x01, 0x00, 0x00], &[0, 0, 0, 0xFF]]);
        assert!(matches!(
            AudioMap::parse(4, &data),
            Err(Error::OffsetOverflow { room: 4 })
        ));
    }

    #[test]
    fn test_find() {
        let data = map_bytes(
            0,
            &[
                &[1, 0, 0, 1],
                &[0x10, 0x00, 0x00],
                &[2, 0, 0, 1],
                &[0x10, 0x00, 0x00],
                &[2, 0, 0, 1],
                &[0x10, 0x00, 0x00],
                &[0, 0, 0, 0xFF],
            ],
        );
        let map = AudioMap::parse(5, &data).unwrap();

        assert_eq!(map.find(Selector::new(1, 0, 0, 1)).unwrap().unwrap().offset, 0x10);
        assert!(map.find(Selector::new(9, 0, 0, 1)).unwrap().is_none());
        assert!(matches!(
            map.find(Selector::new(2, 0, 0, 1)),
            Err(Error::AmbiguousSelector { count: 2, .. })
        ));
    }

    #[test]
    fn test_open_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("12.map"), map_bytes(0, &[&[0, 0, 0, 0xFF]])).unwrap();

        let map = AudioMap::open(dir.path(), 12).unwrap();
        assert_eq!(map.room(), 12);
        assert!(matches!(
            AudioMap::open(dir.path(), 13),
            Err(Error::Io(e)) if e.kind() == io::ErrorKind::NotFound
        ));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn offsets_never_decrease(
            base in 0u32..0x0100_0000,
            records in prop::collection::vec(
                (any::<[u8; 3]>(), 0u8..0xFF, 0u32..0x0100_0000),
                0..64,
            )
        ) {
            let mut data = MAP_SIGNATURE.to_vec();
            data.extend_from_slice(&base.to_le_bytes());
            for (head, seq, delta) in &records {
                data.extend_from_slice(head);
                data.push(*seq);
                data.extend_from_slice(&delta.to_le_bytes()[..3]);
            }
            data.extend_from_slice(&[0, 0, 0, END_OF_MAP]);

            let map = AudioMap::parse(1, &data).unwrap();
            prop_assert_eq!(map.entries().len(), records.len());
            prop_assert_eq!(map.consumed(), data.len());

            let mut previous = base;
            for entry in map.entries() {
                prop_assert!(entry.offset >= previous);
                previous = entry.offset;
            }
        }
    }
}
