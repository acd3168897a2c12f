//! INI configuration files.
//!
//! Two consumers: the repository's own `.git/config` (only `[core]` is
//! written, only `repositoryformatversion` is read back) and the user's
//! global config, which supplies `user.name`/`user.email` for commit
//! signatures.

mod file;
mod user;

pub use file::ConfigFile;
pub use user::UserConfig;

/// Errors from configuration handling.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("missing config value: {0}")]
    Missing(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
