use std::path::PathBuf;

/// Errors produced by the shared utility layer.
#[derive(Debug, thiserror::Error)]
pub enum UtilError {
    #[error("lock file already held: {path}")]
    AlreadyLocked { path: PathBuf },

    #[error("cannot create lock file {path}: {source}")]
    LockCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot commit lock file {path}: {source}")]
    LockCommit {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid date: {0}")]
    DateParse(String),

    #[error("invalid signature: {0}")]
    SignatureParse(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
