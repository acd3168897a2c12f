//! Object model: blob, tree, commit, and tag parsing and serialization.
//!
//! Objects travel in a canonical envelope `"<kind> <len>\0<payload>"`; the
//! SHA-1 of that envelope is the object's identity. Commits and tags share
//! the [`Kvlm`] header format; trees have their own binary layout with a
//! canonical sort order that is part of the hash.

pub mod header;
pub mod kvlm;

mod blob;
mod commit;
mod tag;
mod tree;

pub use blob::Blob;
pub use commit::Commit;
pub use kvlm::Kvlm;
pub use tag::Tag;
pub use tree::{FileMode, Tree, TreeLeaf};

use bstr::BString;
use got_hash::{hasher::Hasher, HashError, ObjectId};

/// Errors produced by object operations.
#[derive(Debug, thiserror::Error)]
pub enum ObjectError {
    #[error("invalid object kind: {0}")]
    InvalidKind(BString),

    #[error("invalid object header: {0}")]
    InvalidHeader(String),

    #[error("truncated object: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("trailing data after object payload: expected {expected} bytes, got {actual}")]
    TrailingData { expected: usize, actual: usize },

    #[error("invalid tree entry at offset {offset}: {reason}")]
    InvalidTreeEntry { offset: usize, reason: String },

    #[error("malformed key-value header at offset {offset}: {reason}")]
    MalformedKvlm { offset: usize, reason: String },

    #[error("missing '{field}' header")]
    MissingHeader { field: &'static str },

    #[error("invalid '{field}' header: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },

    #[error(transparent)]
    Hash(#[from] HashError),
}

/// The four object kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Blob,
    Tree,
    Commit,
    Tag,
}

impl ObjectKind {
    /// Parse from the tag string in an object envelope.
    pub fn from_bytes(s: &[u8]) -> Result<Self, ObjectError> {
        match s {
            b"blob" => Ok(Self::Blob),
            b"tree" => Ok(Self::Tree),
            b"commit" => Ok(Self::Commit),
            b"tag" => Ok(Self::Tag),
            _ => Err(ObjectError::InvalidKind(BString::from(s))),
        }
    }

    /// The canonical byte representation.
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            Self::Blob => b"blob",
            Self::Tree => b"tree",
            Self::Commit => b"commit",
            Self::Tag => b"tag",
        }
    }

    /// The canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blob => "blob",
            Self::Tree => "tree",
            Self::Commit => "commit",
            Self::Tag => "tag",
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ObjectKind {
    type Err = ObjectError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(s.as_bytes())
    }
}

/// A parsed object: the tagged union over the four kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Object {
    Blob(Blob),
    Tree(Tree),
    Commit(Commit),
    Tag(Tag),
}

impl Object {
    /// Parse from envelope bytes (`"<kind> <len>\0<payload>"`).
    ///
    /// The declared length must equal the payload length exactly.
    pub fn parse(data: &[u8]) -> Result<Self, ObjectError> {
        let (kind, size, header_len) = header::parse_header(data)?;
        let payload = &data[header_len..];
        if payload.len() < size {
            return Err(ObjectError::Truncated {
                expected: size,
                actual: payload.len(),
            });
        }
        if payload.len() > size {
            return Err(ObjectError::TrailingData {
                expected: size,
                actual: payload.len(),
            });
        }
        Self::parse_payload(kind, payload)
    }

    /// Parse payload bytes with a known kind (no envelope).
    pub fn parse_payload(kind: ObjectKind, payload: &[u8]) -> Result<Self, ObjectError> {
        match kind {
            ObjectKind::Blob => Ok(Self::Blob(Blob::parse(payload))),
            ObjectKind::Tree => Ok(Self::Tree(Tree::parse(payload)?)),
            ObjectKind::Commit => Ok(Self::Commit(Commit::parse(payload)?)),
            ObjectKind::Tag => Ok(Self::Tag(Tag::parse(payload)?)),
        }
    }

    /// Serialize to the canonical envelope form (header + payload).
    pub fn serialize(&self) -> Vec<u8> {
        let payload = self.serialize_payload();
        let hdr = header::write_header(self.kind(), payload.len());
        let mut out = Vec::with_capacity(hdr.len() + payload.len());
        out.extend_from_slice(&hdr);
        out.extend_from_slice(&payload);
        out
    }

    /// Serialize just the payload (no envelope).
    pub fn serialize_payload(&self) -> Vec<u8> {
        match self {
            Self::Blob(b) => b.data.to_vec(),
            Self::Tree(t) => t.serialize_payload(),
            Self::Commit(c) => c.serialize_payload(),
            Self::Tag(t) => t.serialize_payload(),
        }
    }

    /// The object kind.
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Blob(_) => ObjectKind::Blob,
            Self::Tree(_) => ObjectKind::Tree,
            Self::Commit(_) => ObjectKind::Commit,
            Self::Tag(_) => ObjectKind::Tag,
        }
    }

    /// Compute the id: SHA-1 over the envelope.
    pub fn id(&self) -> Result<ObjectId, ObjectError> {
        let payload = self.serialize_payload();
        Ok(Hasher::hash_object(self.kind().as_str(), &payload)?)
    }
}
