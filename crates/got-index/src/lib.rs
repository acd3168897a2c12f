//! The staging area (`.git/index`).
//!
//! A byte-exact binary file sitting between the working tree and the
//! object database: version-2 framing, strict field validation, and the
//! builder that folds the flat entry list into a tree DAG.

pub mod entry;
pub mod tree;

mod read;
mod write;

use std::path::Path;

use bstr::BStr;

pub use entry::{IndexEntry, ModeType, StatData};

/// Errors from index operations.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("invalid index header: {0}")]
    InvalidHeader(String),

    #[error("unsupported index version: {0}")]
    UnsupportedVersion(u32),

    #[error("unsupported index feature: {0}")]
    UnsupportedFeature(String),

    #[error("invalid index entry at offset {offset}: {reason}")]
    InvalidEntry { offset: usize, reason: String },

    #[error("index lock failed: {0}")]
    LockFailed(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Odb(#[from] got_odb::OdbError),
}

/// Merge stage of an entry (bits 13–12 of the flags word).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Normal entry (stage 0).
    Normal,
    /// Common ancestor in a conflict (stage 1).
    Base,
    /// Our side of a conflict (stage 2).
    Ours,
    /// Their side of a conflict (stage 3).
    Theirs,
}

impl Stage {
    pub fn as_u8(&self) -> u8 {
        match self {
            Stage::Normal => 0,
            Stage::Base => 1,
            Stage::Ours => 2,
            Stage::Theirs => 3,
        }
    }

    /// Decode from the two stage bits. All four values are valid.
    pub fn from_bits(n: u8) -> Self {
        match n & 0b11 {
            0 => Stage::Normal,
            1 => Stage::Base,
            2 => Stage::Ours,
            _ => Stage::Theirs,
        }
    }
}

/// The index: an ordered sequence of entries, sorted by (path, stage).
#[derive(Debug, Default)]
pub struct Index {
    entries: Vec<IndexEntry>,
}

impl Index {
    /// A new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the index from a file. A missing file is an empty index.
    pub fn read_from(path: impl AsRef<Path>) -> Result<Self, IndexError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::new());
        }
        let file = std::fs::File::open(path)?;
        let data = unsafe { memmap2::Mmap::map(&file) }?;
        read::parse_index(&data)
    }

    /// Write the index to a file, whole-file atomic through a lock file.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), IndexError> {
        write::write_index(self, path.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get an entry by path and stage.
    pub fn get(&self, path: &BStr, stage: Stage) -> Option<&IndexEntry> {
        self.entries
            .iter()
            .find(|e| e.path[..] == path[..] && e.stage == stage)
    }

    /// Whether any entry has the given path.
    pub fn contains_path(&self, path: &BStr) -> bool {
        self.entries.iter().any(|e| e.path[..] == path[..])
    }

    /// Add or replace an entry, keeping (path, stage) order.
    pub fn add(&mut self, entry: IndexEntry) {
        self.entries
            .retain(|e| !(e.path == entry.path && e.stage == entry.stage));
        let pos = self
            .entries
            .binary_search_by(|e| cmp_entries(e, &entry))
            .unwrap_or_else(|pos| pos);
        self.entries.insert(pos, entry);
    }

    /// Remove every entry with the given path. Returns true if any went.
    pub fn remove(&mut self, path: &BStr) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.path[..] != path[..]);
        self.entries.len() < before
    }

    /// Iterate entries in order.
    pub fn iter(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.iter()
    }

    pub(crate) fn push_parsed(&mut self, entry: IndexEntry) {
        // Parsed entries keep their on-disk order.
        self.entries.push(entry);
    }
}

fn cmp_entries(a: &IndexEntry, b: &IndexEntry) -> std::cmp::Ordering {
    a.path
        .cmp(&b.path)
        .then(a.stage.as_u8().cmp(&b.stage.as_u8()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bstr::BString;
    use got_hash::ObjectId;

    fn entry(path: &str) -> IndexEntry {
        IndexEntry {
            path: BString::from(path),
            id: ObjectId::NULL,
            mode_type: ModeType::Regular,
            mode_perms: 0o644,
            stage: Stage::Normal,
            assume_valid: false,
            stat: StatData::default(),
        }
    }

    #[test]
    fn add_keeps_sorted_order() {
        let mut index = Index::new();
        index.add(entry("b.txt"));
        index.add(entry("a.txt"));
        index.add(entry("c/d.txt"));

        let paths: Vec<_> = index.iter().map(|e| e.path.to_string()).collect();
        assert_eq!(paths, ["a.txt", "b.txt", "c/d.txt"]);
    }

    #[test]
    fn add_replaces_same_path_and_stage() {
        let mut index = Index::new();
        index.add(entry("a.txt"));
        let mut replacement = entry("a.txt");
        replacement.mode_perms = 0o755;
        index.add(replacement);

        assert_eq!(index.len(), 1);
        assert_eq!(index.iter().next().unwrap().mode_perms, 0o755);
    }

    #[test]
    fn remove_drops_all_stages() {
        let mut index = Index::new();
        index.add(entry("a.txt"));
        let mut conflicted = entry("a.txt");
        conflicted.stage = Stage::Theirs;
        index.add(conflicted);

        assert!(index.remove(BStr::new("a.txt")));
        assert!(index.is_empty());
        assert!(!index.remove(BStr::new("a.txt")));
    }

    #[test]
    fn stage_bits_roundtrip() {
        for s in [Stage::Normal, Stage::Base, Stage::Ours, Stage::Theirs] {
            assert_eq!(Stage::from_bits(s.as_u8()), s);
        }
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let index = Index::read_from(dir.path().join("index")).unwrap();
        assert!(index.is_empty());
    }
}
