use std::path::PathBuf;

/// Errors from repository-level operations.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("not a git repository (or any parent): {0}")]
    NotARepository(PathBuf),

    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("git directory is not empty: {0}")]
    GitDirNotEmpty(PathBuf),

    #[error("repository config missing: {0}")]
    MissingConfig(PathBuf),

    #[error("unsupported repositoryformatversion: {0}")]
    UnsupportedFormatVersion(i64),

    #[error("no match for name: {0}")]
    NoMatch(String),

    #[error("ambiguous name {name}: {count} candidates")]
    Ambiguous { name: String, count: usize },

    #[error("object {name} is a {actual}, not a {expected}")]
    KindMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    #[error("path is outside the worktree: {0}")]
    OutsideWorktree(PathBuf),

    #[error("path not staged: {0}")]
    NotStaged(String),

    #[error("checkout target is not an empty directory: {0}")]
    TargetNotEmpty(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Odb(#[from] got_odb::OdbError),

    #[error(transparent)]
    Object(#[from] got_object::ObjectError),

    #[error(transparent)]
    Index(#[from] got_index::IndexError),

    #[error(transparent)]
    Ref(#[from] got_ref::RefError),

    #[error(transparent)]
    Config(#[from] got_config::ConfigError),

    #[error(transparent)]
    Hash(#[from] got_hash::HashError),
}
