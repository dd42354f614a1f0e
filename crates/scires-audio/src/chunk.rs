//! Audio chunk sniffing and extraction from `RESOURCE.AUD`.
//!
//! Each map entry points at a chunk inside the shared resource file. The
//! chunk is either a RIFF/WAVE container or a Sierra SOL container; its kind
//! is sniffed from the leading bytes and its exact byte span is read back.
//!
//! Chunk kinds are recognized by [`ChunkSniffer`] implementations consulted
//! in order, so a new container kind only needs a new sniffer reporting a
//! [`ChunkHeader::Other`].

use std::fmt;
use std::io::{self, Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};
use scires_common::ReadExt;
use zerocopy::little_endian::U32;
use zerocopy::{FromBytes, Immutable, KnownLayout, Unaligned};

use crate::{Error, Result};

/// Type code of a Sierra audio resource.
pub const SIERRA_AUDIO_TYPE: u8 = 0x8D;

/// The only SOL header size currently supported.
pub const SOL_HEADER_SIZE: u8 = 12;

/// Size of the resource header (type code and header size) before a SOL header.
pub const RESOURCE_HEADER_SIZE: u32 = 2;

/// Tag opening a RIFF container.
pub const RIFF_TAG: &[u8] = b"RIFF";

/// Tag identifying a SOL header.
pub const SOL_TAG: &[u8] = b"SOL";

/// A seekable byte source.
pub trait ReadSeek: Read + Seek {}

impl<T: Read + Seek> ReadSeek for T {}

/// Kind and total size of a recognized chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ChunkHeader {
    /// RIFF/WAVE container: declared size plus the 8-byte RIFF header.
    Wave { total_size: u32 },
    /// Sierra SOL container: payload plus SOL and resource headers.
    Sol { total_size: u32 },
    /// Any other container, written out with its own extension.
    Other {
        extension: &'static str,
        total_size: u32,
    },
}

impl ChunkHeader {
    /// Total number of bytes spanned by the chunk.
    pub const fn total_size(&self) -> u32 {
        match *self {
            ChunkHeader::Wave { total_size }
            | ChunkHeader::Sol { total_size }
            | ChunkHeader::Other { total_size, .. } => total_size,
        }
    }

    /// File extension for the raw chunk.
    pub const fn extension(&self) -> &'static str {
        match self {
            ChunkHeader::Wave { .. } => "wav",
            ChunkHeader::Sol { .. } => "sol",
            ChunkHeader::Other { extension, .. } => *extension,
        }
    }
}

/// A chunk read from the resource file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceChunk {
    pub header: ChunkHeader,
    /// Exactly `header.total_size()` bytes, starting at the chunk offset.
    pub data: Vec<u8>,
}

/// Why a chunk was not extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No sniffer recognized the chunk; carries its first byte.
    UnknownType(u8),
    /// A Sierra audio resource with a header size other than the supported one.
    UnsupportedHeaderSize(u8),
    /// A Sierra audio resource whose header tag is not `SOL`.
    UnknownTag([u8; 4]),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnknownType(code) => write!(f, "unknown chunk type {code:#04x}"),
            SkipReason::UnsupportedHeaderSize(size) => {
                write!(f, "unsupported header size {size}")
            }
            SkipReason::UnknownTag(tag) => {
                write!(f, "unknown chunk {:?}", String::from_utf8_lossy(trim_nul(tag)))
            }
        }
    }
}

/// Result of extracting one chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted {
    Chunk(ResourceChunk),
    Skipped(SkipReason),
}

/// What a sniffer concluded about the bytes at a chunk offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sniff {
    /// Not this sniffer's kind; try the next one.
    NotMine,
    /// Recognized, with the span to extract.
    Chunk(ChunkHeader),
    /// Recognized as this kind, but it cannot be extracted.
    Skip(SkipReason),
}

/// Recognizes one kind of chunk.
///
/// `sniff` is called with the source positioned at the chunk offset and may
/// leave it anywhere; the extractor seeks back before each sniffer. A source
/// too short to hold the sniffer's signature is [`Sniff::NotMine`].
pub trait ChunkSniffer: Send + Sync {
    fn sniff(&self, source: &mut dyn ReadSeek) -> Result<Sniff>;
}

/// Recognizes RIFF/WAVE containers.
#[derive(Debug, Clone, Copy, Default)]
pub struct WaveSniffer;

impl ChunkSniffer for WaveSniffer {
    fn sniff(&self, source: &mut dyn ReadSeek) -> Result<Sniff> {
        let offset = source.stream_position()?;
        let tag: [u8; 4] = match source.read_struct() {
            Ok(tag) => tag,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(Sniff::NotMine),
            Err(e) => return Err(e.into()),
        };
        if trim_nul(&tag) != RIFF_TAG {
            return Ok(Sniff::NotMine);
        }

        let total_size = source
            .read_u32::<LittleEndian>()
            .map_err(|e| truncated(e, offset, 8))?
            .checked_add(8)
            .ok_or(Error::ChunkSizeOverflow { offset })?;
        Ok(Sniff::Chunk(ChunkHeader::Wave { total_size }))
    }
}

/// SOL header of a Sierra audio chunk, following the resource header.
#[derive(Debug, Clone, Copy, FromBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
struct SolHeader {
    tag: [u8; 4],
    _unknown: [u8; 3],
    payload_size: U32,
}

/// Recognizes Sierra SOL containers.
#[derive(Debug, Clone, Copy)]
pub struct SolSniffer {
    type_code: u8,
    header_size: u8,
}

impl Default for SolSniffer {
    fn default() -> Self {
        Self {
            type_code: SIERRA_AUDIO_TYPE,
            header_size: SOL_HEADER_SIZE,
        }
    }
}

impl SolSniffer {
    /// Sniffer for a custom type code and supported header size.
    pub const fn new(type_code: u8, header_size: u8) -> Self {
        Self {
            type_code,
            header_size,
        }
    }
}

impl ChunkSniffer for SolSniffer {
    fn sniff(&self, source: &mut dyn ReadSeek) -> Result<Sniff> {
        let offset = source.stream_position()?;
        match source.read_u8() {
            Ok(code) if code == self.type_code => {}
            Ok(_) => return Ok(Sniff::NotMine),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(Sniff::NotMine),
            Err(e) => return Err(e.into()),
        }

        let header_size = source
            .read_u8()
            .map_err(|e| truncated(e, offset, RESOURCE_HEADER_SIZE))?;
        if header_size != self.header_size {
            return Ok(Sniff::Skip(SkipReason::UnsupportedHeaderSize(header_size)));
        }

        let header: SolHeader = source
            .read_struct()
            .map_err(|e| truncated(e, offset, u32::from(header_size) + RESOURCE_HEADER_SIZE))?;
        if trim_nul(&header.tag) != SOL_TAG {
            return Ok(Sniff::Skip(SkipReason::UnknownTag(header.tag)));
        }

        let total_size = header
            .payload_size
            .get()
            .checked_add(u32::from(header_size) + RESOURCE_HEADER_SIZE)
            .ok_or(Error::ChunkSizeOverflow { offset })?;
        Ok(Sniff::Chunk(ChunkHeader::Sol { total_size }))
    }
}

/// Extracts chunks by sniffing their kind and reading their exact span.
pub struct ChunkExtractor {
    sniffers: Vec<Box<dyn ChunkSniffer>>,
}

impl Default for ChunkExtractor {
    /// Recognizes WAVE and SOL chunks, in that order.
    fn default() -> Self {
        Self::empty()
            .with_sniffer(WaveSniffer)
            .with_sniffer(SolSniffer::default())
    }
}

impl fmt::Debug for ChunkExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkExtractor")
            .field("sniffers", &self.sniffers.len())
            .finish()
    }
}

impl ChunkExtractor {
    /// An extractor that recognizes nothing.
    pub fn empty() -> Self {
        Self {
            sniffers: Vec::new(),
        }
    }

    /// Add a sniffer, consulted after the existing ones.
    pub fn with_sniffer<S: ChunkSniffer + 'static>(mut self, sniffer: S) -> Self {
        self.sniffers.push(Box::new(sniffer));
        self
    }

    /// Extract the chunk starting at `offset`.
    ///
    /// Unrecognized or unsupported chunks are logged and reported as
    /// [`Extracted::Skipped`]. A chunk running past the end of the source
    /// is an error.
    pub fn extract<R: Read + Seek>(&self, source: &mut R, offset: u64) -> Result<Extracted> {
        for sniffer in &self.sniffers {
            source.seek(SeekFrom::Start(offset))?;
            match sniffer.sniff(source)? {
                Sniff::NotMine => continue,
                Sniff::Skip(reason) => return Ok(Self::skipped(offset, reason)),
                Sniff::Chunk(header) => {
                    let data = Self::read_span(source, offset, header.total_size())?;
                    return Ok(Extracted::Chunk(ResourceChunk { header, data }));
                }
            }
        }

        source.seek(SeekFrom::Start(offset))?;
        let code = source.read_u8()?;
        Ok(Self::skipped(offset, SkipReason::UnknownType(code)))
    }

    fn skipped(offset: u64, reason: SkipReason) -> Extracted {
        tracing::warn!(offset, %reason, "skipping chunk");
        Extracted::Skipped(reason)
    }

    /// Read `size` bytes at `offset`, growing the buffer only as data arrives.
    fn read_span<R: Read + Seek>(source: &mut R, offset: u64, size: u32) -> Result<Vec<u8>> {
        source.seek(SeekFrom::Start(offset))?;
        let mut data = Vec::new();
        source.take(u64::from(size)).read_to_end(&mut data)?;
        if data.len() < size as usize {
            return Err(Error::TruncatedChunk {
                offset,
                expected: size,
            });
        }
        Ok(data)
    }
}

/// Map a short header read to a truncated chunk.
fn truncated(e: io::Error, offset: u64, expected: u32) -> Error {
    match e.kind() {
        io::ErrorKind::UnexpectedEof => Error::TruncatedChunk { offset, expected },
        _ => Error::Io(e),
    }
}

/// Strip NUL padding from both ends of a tag.
fn trim_nul(tag: &[u8]) -> &[u8] {
    let start = tag.iter().position(|&b| b != 0).unwrap_or(tag.len());
    let end = tag.iter().rposition(|&b| b != 0).map_or(start, |i| i + 1);
    &tag[start..end]
}
