//! Shared plumbing for the got revision-control store.
//!
//! Lock-file based atomic writes, git-format dates, and author/committer
//! signatures. Everything here is used by more than one subsystem crate.

pub mod date;
pub mod lockfile;

mod error;

pub use date::{GitDate, Signature};
pub use error::UtilError;
pub use lockfile::LockFile;

pub type Result<T> = std::result::Result<T, UtilError>;
