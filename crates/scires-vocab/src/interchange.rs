//! CSV interchange for vocabulary groups.
//!
//! Rows have the columns `words,class,group`: words and class names are
//! `|`-separated lists and an empty group asks the encoder to assign one.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::{EncoderGroup, Result, VocabGroup, WordClassSet};

/// One CSV row describing a synonym group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabRow {
    pub words: String,
    pub class: String,
    pub group: Option<u16>,
}

impl From<&VocabGroup> for VocabRow {
    fn from(group: &VocabGroup) -> Self {
        Self {
            words: group.words.join(" | "),
            class: group.classes.to_string(),
            group: Some(group.group),
        }
    }
}

impl VocabRow {
    /// Convert into encoder input, resolving class names.
    pub fn to_encoder_group(&self) -> Result<EncoderGroup> {
        Ok(EncoderGroup {
            group: self.group,
            words: self
                .words
                .split('|')
                .map(str::trim)
                .filter(|word| !word.is_empty())
                .map(str::to_string)
                .collect(),
            classes: WordClassSet::parse_names(&self.class)?,
        })
    }
}

/// Read vocabulary rows from CSV with a header line.
pub fn read_vocab_csv<R: Read>(reader: R) -> Result<Vec<VocabRow>> {
    let mut csv = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let rows = csv.deserialize().collect::<std::result::Result<Vec<VocabRow>, _>>()?;
    Ok(rows)
}

/// Write groups as CSV rows with a header line.
pub fn write_vocab_csv<'a, W, I>(writer: W, groups: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a VocabGroup>,
{
    let mut csv = csv::Writer::from_writer(writer);
    for group in groups {
        csv.serialize(VocabRow::from(group))?;
    }
    csv.flush()?;
    Ok(())
}
