//! Synonym-group aggregation.

use std::collections::btree_map::{self, BTreeMap};

use crate::{VocabEntry, WordClassSet};

/// All words sharing one synonym group id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabGroup {
    /// Synonym group id (12 bits).
    pub group: u16,
    /// Member words in first-seen order.
    pub words: Vec<String>,
    /// Union of the classes of every member word.
    pub classes: WordClassSet,
}

/// A word whose classes differed from its group's classes when it was added.
///
/// The sets are merged regardless; this only records that the input was
/// inconsistent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMismatch {
    pub group: u16,
    pub word: String,
    /// Group classes before this word was merged in.
    pub group_classes: WordClassSet,
    /// Classes of the word itself.
    pub word_classes: WordClassSet,
}

/// Decoded words aggregated by group id, iterable in ascending group order.
#[derive(Debug, Clone, Default)]
pub struct GroupedVocab {
    groups: BTreeMap<u16, VocabGroup>,
    mismatches: Vec<ClassMismatch>,
}

impl GroupedVocab {
    /// Group entries by synonym group id.
    ///
    /// Each entry's word is appended to its group and its classes are
    /// unioned into the group's classes. An entry whose classes differ from
    /// the group's current classes is logged and recorded as a
    /// [`ClassMismatch`], and is still merged.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = VocabEntry>,
    {
        let mut grouped = Self::default();
        for entry in entries {
            grouped.insert(entry);
        }
        grouped
    }

    /// Add one decoded entry.
    pub fn insert(&mut self, entry: VocabEntry) {
        match self.groups.entry(entry.group) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(VocabGroup {
                    group: entry.group,
                    words: vec![entry.text],
                    classes: entry.classes,
                });
            }
            btree_map::Entry::Occupied(mut slot) => {
                let group = slot.get_mut();
                if group.classes != entry.classes {
                    tracing::warn!(
                        group = group.group,
                        word = %entry.text,
                        group_classes = %group.classes,
                        word_classes = %entry.classes,
                        "class mismatch within synonym group, merging"
                    );
                    self.mismatches.push(ClassMismatch {
                        group: group.group,
                        word: entry.text.clone(),
                        group_classes: group.classes,
                        word_classes: entry.classes,
                    });
                    group.classes = group.classes.union(entry.classes);
                }
                group.words.push(entry.text);
            }
        }
    }

    /// Look up a group by id.
    pub fn get(&self, group: u16) -> Option<&VocabGroup> {
        self.groups.get(&group)
    }

    /// Number of distinct groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterate over groups in ascending group id order.
    pub fn iter(&self) -> impl Iterator<Item = &VocabGroup> {
        self.groups.values()
    }

    /// Class mismatches encountered while grouping, in input order.
    pub fn mismatches(&self) -> &[ClassMismatch] {
        &self.mismatches
    }

    /// Consume into groups in ascending group id order.
    pub fn into_groups(self) -> Vec<VocabGroup> {
        self.groups.into_values().collect()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn group_classes_cover_every_member(
            raw in prop::collection::vec((0u16..0x1000, 0u16..8), 0..64)
        ) {
            let entries: Vec<VocabEntry> = raw
                .iter()
                .enumerate()
                .map(|(i, &(mask, group))| VocabEntry {
                    text: format!("w{i}"),
                    classes: WordClassSet::from_bits(mask),
                    group,
                })
                .collect();

            let grouped = GroupedVocab::from_entries(entries.clone());

            for entry in &entries {
                let group = grouped.get(entry.group).unwrap();
                prop_assert!(group.classes.is_superset(entry.classes));
                prop_assert!(group.words.contains(&entry.text));
            }
            let total: usize = grouped.iter().map(|g| g.words.len()).sum();
            prop_assert_eq!(total, entries.len());
        }
    }
}
