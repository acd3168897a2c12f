//! Object identity for the got revision-control store.
//!
//! Provides the 20-byte SHA-1 [`ObjectId`], hex encoding/decoding, and the
//! streaming [`hasher::Hasher`] used to compute envelope hashes.

pub mod hasher;
pub mod hex;

mod error;
mod oid;

pub use error::HashError;
pub use oid::ObjectId;

/// The id of the empty tree object (`sha1("tree 0\0")`), a fixed point of
/// every SHA-1 object store.
pub const EMPTY_TREE_ID: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";
