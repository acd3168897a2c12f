//! Index entry types.

use bstr::BString;
use got_hash::ObjectId;
use got_object::FileMode;

use crate::{IndexError, Stage};

/// The object-kind nibble of an entry's mode word (bits 15–12).
///
/// Only these three codes are valid in an index; anything else fails the
/// read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeType {
    /// Regular file (0b1000).
    Regular,
    /// Symbolic link (0b1010).
    Symlink,
    /// Gitlink (0b1110).
    Gitlink,
}

impl ModeType {
    /// Decode the high nibble of the mode word.
    pub fn from_bits(bits: u16) -> Result<Self, IndexError> {
        match bits {
            0b1000 => Ok(Self::Regular),
            0b1010 => Ok(Self::Symlink),
            0b1110 => Ok(Self::Gitlink),
            other => Err(IndexError::InvalidEntry {
                offset: 0,
                reason: format!("invalid mode type: {other:#06b}"),
            }),
        }
    }

    pub fn bits(&self) -> u16 {
        match self {
            Self::Regular => 0b1000,
            Self::Symlink => 0b1010,
            Self::Gitlink => 0b1110,
        }
    }
}

impl std::fmt::Display for ModeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Regular => "regular file",
            Self::Symlink => "symlink",
            Self::Gitlink => "gitlink",
        })
    }
}

/// Cached filesystem stat data, truncated to 32 bits per field as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatData {
    pub ctime_secs: u32,
    pub ctime_nsecs: u32,
    pub mtime_secs: u32,
    pub mtime_nsecs: u32,
    pub dev: u32,
    pub ino: u32,
    pub uid: u32,
    pub gid: u32,
    /// Low 32 bits of the file length.
    pub size: u32,
}

impl StatData {
    #[cfg(unix)]
    pub fn from_metadata(meta: &std::fs::Metadata) -> Self {
        use std::os::unix::fs::MetadataExt;
        Self {
            ctime_secs: meta.ctime() as u32,
            ctime_nsecs: meta.ctime_nsec() as u32,
            mtime_secs: meta.mtime() as u32,
            mtime_nsecs: meta.mtime_nsec() as u32,
            dev: meta.dev() as u32,
            ino: meta.ino() as u32,
            uid: meta.uid(),
            gid: meta.gid(),
            size: meta.len() as u32,
        }
    }

    #[cfg(not(unix))]
    pub fn from_metadata(meta: &std::fs::Metadata) -> Self {
        use std::time::UNIX_EPOCH;
        let mtime = meta
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .unwrap_or_default();
        Self {
            ctime_secs: mtime.as_secs() as u32,
            ctime_nsecs: mtime.subsec_nanos(),
            mtime_secs: mtime.as_secs() as u32,
            mtime_nsecs: mtime.subsec_nanos(),
            dev: 0,
            ino: 0,
            uid: 0,
            gid: 0,
            size: meta.len() as u32,
        }
    }

    /// Whether the cached data still matches the file's metadata.
    pub fn matches(&self, meta: &std::fs::Metadata) -> bool {
        let other = Self::from_metadata(meta);
        self.size == other.size
            && self.mtime_secs == other.mtime_secs
            && self.mtime_nsecs == other.mtime_nsecs
    }
}

/// A single staged file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Worktree-relative path with `/` separators, no NUL.
    pub path: BString,
    /// Blob id of the staged content.
    pub id: ObjectId,
    pub mode_type: ModeType,
    /// Low 9 permission bits.
    pub mode_perms: u16,
    pub stage: Stage,
    pub assume_valid: bool,
    pub stat: StatData,
}

impl IndexEntry {
    /// The 16-bit mode word: type nibble high, permissions low, middle
    /// bits zero.
    pub fn mode_word(&self) -> u16 {
        (self.mode_type.bits() << 12) | (self.mode_perms & 0o777)
    }

    /// The tree-leaf file mode for this entry.
    pub fn file_mode(&self) -> FileMode {
        FileMode::from_raw(u32::from(self.mode_word()))
    }
}
