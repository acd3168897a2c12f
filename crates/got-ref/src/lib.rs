//! References: small text files naming objects.
//!
//! A reference file holds either a 40-hex object id or `ref: <path>`
//! pointing at another reference. Symbolic chains are chased with a fixed
//! depth bound; a missing file along the chain resolves to nothing, which
//! is exactly the state of HEAD on a branch with no commits yet.

mod loose;
mod name;

pub use loose::{delete_ref, iter_refs, read_ref, resolve, write_ref, write_symbolic_ref};
pub use name::RefName;

use got_hash::ObjectId;

/// How deep a symbolic-ref chain may go before we call it a cycle.
pub const MAX_SYMREF_DEPTH: usize = 8;

/// The parsed content of a reference file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefTarget {
    /// Points directly at an object.
    Direct(ObjectId),
    /// Points at another reference.
    Symbolic(RefName),
}

/// Errors from reference operations.
#[derive(Debug, thiserror::Error)]
pub enum RefError {
    #[error("invalid reference name: {0}")]
    InvalidName(String),

    #[error("malformed reference {name}: {reason}")]
    Malformed { name: String, reason: String },

    #[error("symbolic reference chain exceeds depth {max} at {name}")]
    CycleDetected { name: String, max: usize },

    #[error("cannot lock reference {name}: {reason}")]
    LockFailed { name: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
