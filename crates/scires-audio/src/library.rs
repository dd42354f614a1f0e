//! Voice extraction from a game's audio resources.
//!
//! A game directory holds one shared `RESOURCE.AUD` and a `<room>.MAP` per
//! room. [`VoiceLibrary`] decodes each room's map once, on first use, and
//! extracts chunks by seeking in a single read-only resource handle.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::map::resolve_resource_path;
use crate::{
    AudioMap, AudioMapEntry, ChunkExtractor, Extracted, ResourceChunk, Result, Selector, SkipReason,
};

/// Name of the shared audio resource file.
pub const RESOURCE_AUD: &str = "RESOURCE.AUD";

/// A chunk extracted for one map entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedVoice {
    pub entry: AudioMapEntry,
    pub chunk: ResourceChunk,
}

impl ExtractedVoice {
    /// Output file name stem: `<room>_<noun>_<verb>_<cond>_<seq>`.
    pub fn file_stem(&self) -> String {
        format!("{}_{}", self.entry.room, self.entry.selector())
    }

    /// Output file name, with the extension of the chunk kind.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.file_stem(), self.chunk.header.extension())
    }
}

/// Outcome of one extraction request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Found(ExtractedVoice),
    /// The room's map has no entry for the selector.
    NotInMap,
    /// The entry's chunk is of an unknown or unsupported kind.
    Skipped(SkipReason),
}

/// Audio maps and the shared resource file of one game.
#[derive(Debug)]
pub struct VoiceLibrary {
    input_dir: PathBuf,
    resource_path: PathBuf,
    resource: BufReader<File>,
    maps: HashMap<u16, AudioMap>,
    extractor: ChunkExtractor,
}

impl VoiceLibrary {
    /// Open the `RESOURCE.AUD` in a directory. Maps are loaded on demand.
    pub fn open<P: AsRef<Path>>(input_dir: P) -> Result<Self> {
        let input_dir = input_dir.as_ref().to_path_buf();
        let resource_path = resolve_resource_path(&input_dir, RESOURCE_AUD)?;
        let resource = BufReader::new(File::open(&resource_path)?);

        Ok(Self {
            input_dir,
            resource_path,
            resource,
            maps: HashMap::new(),
            extractor: ChunkExtractor::default(),
        })
    }

    /// Replace the chunk extractor, e.g. to register more chunk kinds.
    pub fn with_extractor(mut self, extractor: ChunkExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn resource_path(&self) -> &Path {
        &self.resource_path
    }

    /// The decoded map of a room, loading it on first use.
    pub fn map(&mut self, room: u16) -> Result<&AudioMap> {
        if !self.maps.contains_key(&room) {
            let map = AudioMap::open(&self.input_dir, room)?;
            self.maps.insert(room, map);
        }
        Ok(&self.maps[&room])
    }

    /// Extract the chunk for a selector in a room.
    pub fn extract(&mut self, room: u16, selector: Selector) -> Result<Extraction> {
        self.map(room)?;
        extract_entry(&self.maps[&room], &self.extractor, &mut self.resource, selector)
    }

    /// Extract many requests, one worker per room.
    ///
    /// All maps are decoded first; each worker then opens its own read-only
    /// handle on the resource file. Results are in request order.
    #[cfg(feature = "parallel")]
    pub fn extract_parallel(
        &mut self,
        requests: &[(u16, Selector)],
    ) -> Result<Vec<Result<Extraction>>> {
        use rayon::prelude::*;

        let mut by_room: HashMap<u16, Vec<(usize, Selector)>> = HashMap::new();
        for (index, &(room, selector)) in requests.iter().enumerate() {
            self.map(room)?;
            by_room.entry(room).or_default().push((index, selector));
        }

        let maps = &self.maps;
        let extractor = &self.extractor;
        let resource_path = &self.resource_path;

        let mut results: Vec<(usize, Result<Extraction>)> = by_room
            .into_par_iter()
            .flat_map_iter(|(room, batch)| {
                let mut resource = File::open(resource_path).map(BufReader::new);
                batch.into_iter().map(move |(index, selector)| {
                    let result = match &mut resource {
                        Ok(resource) => extract_entry(&maps[&room], extractor, resource, selector),
                        Err(e) => Err(std::io::Error::new(e.kind(), e.to_string()).into()),
                    };
                    (index, result)
                })
            })
            .collect();

        results.sort_by_key(|(index, _)| *index);
        Ok(results.into_iter().map(|(_, result)| result).collect())
    }
}

fn extract_entry(
    map: &AudioMap,
    extractor: &ChunkExtractor,
    resource: &mut BufReader<File>,
    selector: Selector,
) -> Result<Extraction> {
    let Some(entry) = map.find(selector)?.copied() else {
        tracing::warn!(room = map.room(), %selector, "selector not found in map");
        return Ok(Extraction::NotInMap);
    };

    Ok(match extractor.extract(resource, entry.offset.into())? {
        Extracted::Chunk(chunk) => Extraction::Found(ExtractedVoice { entry, chunk }),
        Extracted::Skipped(reason) => Extraction::Skipped(reason),
    })
}
