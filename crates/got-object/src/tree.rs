use std::cmp::Ordering;

use bstr::{BStr, BString, ByteSlice};
use got_hash::ObjectId;

use crate::ObjectError;

/// File mode of a tree leaf, stored as ASCII octal on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileMode {
    /// Regular file (100644)
    Regular,
    /// Executable file (100755)
    Executable,
    /// Symbolic link (120000)
    Symlink,
    /// Gitlink (160000)
    Gitlink,
    /// Subdirectory (40000)
    Tree,
    /// Anything else, preserved for round-trip.
    Unknown(u32),
}

impl FileMode {
    /// Parse from octal ASCII bytes. Only 5- or 6-byte fields are valid on
    /// disk; length is enforced by the tree parser.
    pub fn from_bytes(s: &[u8]) -> Result<Self, ObjectError> {
        let raw = parse_octal(s).ok_or_else(|| {
            ObjectError::InvalidField {
                field: "mode",
                reason: format!("not octal: {}", String::from_utf8_lossy(s)),
            }
        })?;
        Ok(Self::from_raw(raw))
    }

    /// Create from the raw numeric value.
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0o100644 => Self::Regular,
            0o100755 => Self::Executable,
            0o120000 => Self::Symlink,
            0o160000 => Self::Gitlink,
            0o040000 => Self::Tree,
            other => Self::Unknown(other),
        }
    }

    /// Serialize to canonical octal ASCII (no leading zeros, so trees
    /// render as the 5-byte `40000`).
    pub fn as_bytes(&self) -> BString {
        BString::from(format!("{:o}", self.raw()))
    }

    /// The raw numeric value.
    pub fn raw(&self) -> u32 {
        match self {
            Self::Regular => 0o100644,
            Self::Executable => 0o100755,
            Self::Symlink => 0o120000,
            Self::Gitlink => 0o160000,
            Self::Tree => 0o40000,
            Self::Unknown(v) => *v,
        }
    }

    pub fn is_tree(&self) -> bool {
        matches!(self, Self::Tree)
    }

    pub fn is_blob(&self) -> bool {
        matches!(self, Self::Regular | Self::Executable)
    }

    pub fn is_symlink(&self) -> bool {
        matches!(self, Self::Symlink)
    }

    pub fn is_gitlink(&self) -> bool {
        matches!(self, Self::Gitlink)
    }

    /// Whether this leaf sorts with an implicit trailing `/`.
    ///
    /// Trees and gitlinks do; blobs and symlinks compare by bare name.
    /// This classification is the canonical sort key and therefore part of
    /// the object identity.
    pub fn sorts_as_directory(&self) -> bool {
        matches!(self, Self::Tree | Self::Gitlink)
    }
}

fn parse_octal(s: &[u8]) -> Option<u32> {
    if s.is_empty() {
        return None;
    }
    let mut val: u32 = 0;
    for &b in s {
        if !(b'0'..=b'7').contains(&b) {
            return None;
        }
        val = val.checked_mul(8)?.checked_add(u32::from(b - b'0'))?;
    }
    Some(val)
}

/// A single record in a tree: `(mode, name, child-id)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeLeaf {
    pub mode: FileMode,
    pub name: BString,
    pub id: ObjectId,
}

impl TreeLeaf {
    /// Compare leaves by the canonical sort key.
    ///
    /// Directory-like leaves compare as if their name ends in `/`, so a
    /// directory `foo` sorts after `foo-bar` but also after `foo.c`.
    pub fn cmp_leaves(a: &TreeLeaf, b: &TreeLeaf) -> Ordering {
        sort_key_compare(
            a.name.as_ref(),
            a.mode.sorts_as_directory(),
            b.name.as_ref(),
            b.mode.sorts_as_directory(),
        )
    }
}

impl PartialOrd for TreeLeaf {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TreeLeaf {
    fn cmp(&self, other: &Self) -> Ordering {
        Self::cmp_leaves(self, other)
    }
}

/// Compare names with the implicit trailing `/` for directory-like leaves.
fn sort_key_compare(name1: &[u8], is_dir1: bool, name2: &[u8], is_dir2: bool) -> Ordering {
    let min_len = name1.len().min(name2.len());
    let cmp = name1[..min_len].cmp(&name2[..min_len]);
    if cmp != Ordering::Equal {
        return cmp;
    }
    // One name is a prefix of the other. The next byte is the real byte if
    // any, '/' for a directory at its end, NUL otherwise.
    let c1 = if name1.len() > min_len {
        name1[min_len]
    } else if is_dir1 {
        b'/'
    } else {
        0
    };
    let c2 = if name2.len() > min_len {
        name2[min_len]
    } else if is_dir2 {
        b'/'
    } else {
        0
    };
    c1.cmp(&c2)
}

/// A tree object: an ordered directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tree {
    pub leaves: Vec<TreeLeaf>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse tree payload bytes.
    ///
    /// Each record is `<mode> SP <name> NUL <20-byte id>`; the mode field
    /// must be 5 or 6 bytes and the name non-empty. A malformed trailing
    /// record fails the whole parse.
    pub fn parse(payload: &[u8]) -> Result<Self, ObjectError> {
        let mut leaves = Vec::new();
        let mut pos = 0;

        while pos < payload.len() {
            let space_pos = payload[pos..]
                .find_byte(b' ')
                .map(|p| p + pos)
                .ok_or_else(|| ObjectError::InvalidTreeEntry {
                    offset: pos,
                    reason: "missing space after mode".into(),
                })?;

            let mode_len = space_pos - pos;
            if mode_len != 5 && mode_len != 6 {
                return Err(ObjectError::InvalidTreeEntry {
                    offset: pos,
                    reason: format!("mode field is {mode_len} bytes, expected 5 or 6"),
                });
            }
            let mode = FileMode::from_bytes(&payload[pos..space_pos]).map_err(|_| {
                ObjectError::InvalidTreeEntry {
                    offset: pos,
                    reason: "mode is not octal".into(),
                }
            })?;

            let name_start = space_pos + 1;
            let null_pos = payload[name_start..]
                .find_byte(0)
                .map(|p| p + name_start)
                .ok_or_else(|| ObjectError::InvalidTreeEntry {
                    offset: name_start,
                    reason: "missing null after name".into(),
                })?;
            if null_pos == name_start {
                return Err(ObjectError::InvalidTreeEntry {
                    offset: name_start,
                    reason: "empty name".into(),
                });
            }
            let name = BString::from(&payload[name_start..null_pos]);

            let id_start = null_pos + 1;
            let id_end = id_start + 20;
            if id_end > payload.len() {
                return Err(ObjectError::InvalidTreeEntry {
                    offset: id_start,
                    reason: "truncated id".into(),
                });
            }
            let id = ObjectId::from_bytes(&payload[id_start..id_end])?;

            leaves.push(TreeLeaf { mode, name, id });
            pos = id_end;
        }

        Ok(Self { leaves })
    }

    /// Serialize to payload bytes, sorting leaves into canonical order.
    pub fn serialize_payload(&self) -> Vec<u8> {
        let mut sorted = self.leaves.clone();
        sorted.sort();

        let mut out = Vec::new();
        for leaf in &sorted {
            out.extend_from_slice(&leaf.mode.as_bytes());
            out.push(b' ');
            out.extend_from_slice(&leaf.name);
            out.push(0);
            out.extend_from_slice(leaf.id.as_bytes());
        }
        out
    }

    /// Sort leaves in place into canonical order.
    pub fn sort(&mut self) {
        self.leaves.sort();
    }

    /// Find a leaf by name.
    pub fn find(&self, name: &BStr) -> Option<&TreeLeaf> {
        self.leaves.iter().find(|l| l.name.as_bstr() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TreeLeaf> {
        self.leaves.iter()
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }
}
