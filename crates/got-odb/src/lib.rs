//! The object database: zlib-compressed loose objects.
//!
//! Every object lives at `objects/XX/YYYY…` where `XX` is the first hex
//! byte of its id and `YYYY…` the rest. The file content is the
//! zlib-compressed envelope `"<kind> <size>\0<payload>"`; the id is the
//! SHA-1 of the uncompressed envelope, which makes the store append-only
//! and write-idempotent.

mod enumerate;
mod prefix;
mod read;
mod write;

use std::path::{Path, PathBuf};

use got_hash::{HashError, ObjectId};

/// Handle on an `objects/` directory.
pub struct ObjectStore {
    objects_dir: PathBuf,
    compression: flate2::Compression,
}

impl ObjectStore {
    /// Open the store rooted at the given objects directory.
    pub fn open(objects_dir: impl AsRef<Path>) -> Self {
        Self {
            objects_dir: objects_dir.as_ref().to_path_buf(),
            compression: flate2::Compression::default(),
        }
    }

    /// Set the zlib compression level (0–9).
    pub fn set_compression_level(&mut self, level: u32) {
        self.compression = flate2::Compression::new(level);
    }

    /// The objects directory.
    pub fn objects_dir(&self) -> &Path {
        &self.objects_dir
    }

    /// The file path for a given id.
    pub fn object_path(&self, id: &ObjectId) -> PathBuf {
        self.objects_dir.join(id.loose_path())
    }
}

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum OdbError {
    #[error("object not found: {0}")]
    NotFound(ObjectId),

    #[error("corrupt object {id}: {reason}")]
    Corrupt { id: String, reason: String },

    #[error("decompression error for {id}: {source}")]
    Decompress {
        id: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Object(#[from] got_object::ObjectError),

    #[error(transparent)]
    Hash(#[from] HashError),
}
