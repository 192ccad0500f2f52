//! Sorted, case-insensitive entry index
//!
//! Entries are ordered by their lowercased filename bytes so lookups can
//! binary search. Names are compared as raw bytes, never as text.

use crate::entry::{Entry, parse_entries};
use crate::error::GrfResult;
use std::cmp::Ordering;
use tracing::debug;

/// Entries of an archive sorted by lookup key
#[derive(Debug, Clone, Default)]
pub struct ArchiveIndex {
    entries: Vec<Entry>,
}

impl ArchiveIndex {
    /// Parse `count` records from an inflated directory table and sort them.
    pub fn build(table: &[u8], count: u32) -> GrfResult<Self> {
        let entries = parse_entries(table, count)?;
        debug!("Parsed {} directory entries", entries.len());
        Ok(Self::from_entries(entries))
    }

    /// Sort already parsed entries.
    ///
    /// The sort is stable, so entries sharing a key keep their directory
    /// order.
    pub fn from_entries(mut entries: Vec<Entry>) -> Self {
        entries.sort_by(|a, b| a.key().cmp(b.key()));
        Self { entries }
    }

    /// Position of the entry whose key equals `key`.
    ///
    /// `key` must already be lowercased. With duplicate keys any matching
    /// position may be returned.
    pub fn search(&self, key: &[u8]) -> Option<usize> {
        if self.entries.is_empty() {
            return None;
        }
        self.entries
            .binary_search_by(|entry| entry.key().cmp(key))
            .ok()
    }

    /// Look up an entry by name, ignoring ASCII case.
    pub fn find(&self, name: &[u8]) -> Option<&Entry> {
        let key = name.to_ascii_lowercase();
        self.search(&key).and_then(|position| self.get(position))
    }

    /// Entry at `position` in sorted order
    pub fn get(&self, position: usize) -> Option<&Entry> {
        self.entries.get(position)
    }

    /// Iterate over entries in sorted order
    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    /// All entries in sorted order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the index has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check that keys are in non-decreasing order
    pub fn is_sorted(&self) -> bool {
        self.entries
            .windows(2)
            .all(|pair| pair[0].key().cmp(pair[1].key()) != Ordering::Greater)
    }
}

impl<'a> IntoIterator for &'a ArchiveIndex {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entry::EntryFlags;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn entry(name: &str, offset: u32) -> Entry {
        Entry::new(name.as_bytes(), 1, 8, 1, EntryFlags::new(EntryFlags::FILE), offset)
    }

    fn names(index: &ArchiveIndex) -> Vec<String> {
        index.iter().map(Entry::display_name).collect()
    }

    #[test]
    fn test_sorted_by_lowercase_key() {
        let index = ArchiveIndex::from_entries(vec![
            entry("data\\Sprite\\B.spr", 0),
            entry("data\\a.txt", 8),
            entry("DATA\\C.TXT", 16),
            entry("data\\Sprite\\a.spr", 24),
        ]);

        assert_eq!(
            names(&index),
            vec![
                "data\\a.txt",
                "DATA\\C.TXT",
                "data\\Sprite\\a.spr",
                "data\\Sprite\\B.spr",
            ]
        );
        assert!(index.is_sorted());
    }

    #[test]
    fn test_duplicates_keep_directory_order() {
        let index = ArchiveIndex::from_entries(vec![
            entry("b", 0),
            entry("A", 1),
            entry("a", 2),
            entry("A", 3),
        ]);
        let offsets: Vec<u32> = index.iter().map(|e| e.offset).collect();
        assert_eq!(offsets, vec![1, 2, 3, 0]);

        let found = index.find(b"a").unwrap();
        assert_eq!(found.key(), b"a");
    }

    #[test]
    fn test_search_empty() {
        let index = ArchiveIndex::default();
        assert!(index.is_empty());
        assert_eq!(index.search(b"a.txt"), None);
        assert_eq!(index.search(b""), None);
        assert!(index.find(b"A.TXT").is_none());
    }

    #[test]
    fn test_search_single() {
        let index = ArchiveIndex::from_entries(vec![entry("A.txt", 0)]);
        assert_eq!(index.search(b"a.txt"), Some(0));
        assert_eq!(index.search(b"A.txt"), None);
        assert_eq!(index.search(b"a.tx"), None);
        assert_eq!(index.search(b"b.txt"), None);
        assert_eq!(index.find(b"A.TXT").unwrap().name(), b"A.txt");
    }

    #[test]
    fn test_search_many() {
        let names: Vec<String> = (0..50).map(|i| format!("Data\\File{i:03}.BIN")).collect();
        let index = ArchiveIndex::from_entries(names.iter().map(|n| entry(n, 0)).collect());
        assert_eq!(index.len(), 50);

        for name in &names {
            let key = name.to_ascii_lowercase();
            let position = index.search(key.as_bytes()).expect("name should be present");
            assert_eq!(index.get(position).unwrap().name(), name.as_bytes());
        }

        assert_eq!(index.search(b"data\\file050.bin"), None);
        assert_eq!(index.search(b"data\\file"), None);
        assert_eq!(index.search(b"zzz"), None);
        assert_eq!(index.search(b""), None);
    }

    #[test]
    fn test_build_from_table() {
        let mut table = Vec::new();
        for (name, offset) in [("Zeta.txt", 0u32), ("alpha.txt", 8)] {
            table.extend_from_slice(name.as_bytes());
            table.push(0);
            table.extend_from_slice(&1u32.to_le_bytes());
            table.extend_from_slice(&8u32.to_le_bytes());
            table.extend_from_slice(&1u32.to_le_bytes());
            table.push(EntryFlags::FILE);
            table.extend_from_slice(&offset.to_le_bytes());
        }

        let index = ArchiveIndex::build(&table, 2).unwrap();
        assert_eq!(names(&index), vec!["alpha.txt", "Zeta.txt"]);
        assert_eq!(index.find(b"ZETA.TXT").unwrap().offset, 0);
        assert!(ArchiveIndex::build(&table, 3).is_err());
    }

    #[test]
    fn test_into_iterator() {
        let index = ArchiveIndex::from_entries(vec![entry("b", 0), entry("a", 0)]);
        let mut count = 0;
        for entry in &index {
            assert!(entry.is_file());
            count += 1;
        }
        assert_eq!(count, 2);
        assert_eq!(index.entries().len(), 2);
    }

    proptest! {
        #[test]
        fn prop_every_name_is_found(
            names in proptest::collection::vec("[A-Za-z0-9_\\\\.]{1,12}", 0..40)
        ) {
            let index = ArchiveIndex::from_entries(
                names.iter().map(|n| entry(n, 0)).collect(),
            );
            prop_assert!(index.is_sorted());

            for name in &names {
                let key = name.to_ascii_lowercase();
                let position = index.search(key.as_bytes());
                prop_assert!(position.is_some());
                prop_assert_eq!(index.get(position.unwrap()).unwrap().key(), key.as_bytes());
            }
        }
    }
}
