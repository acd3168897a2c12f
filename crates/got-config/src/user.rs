use std::path::PathBuf;

use crate::{ConfigError, ConfigFile};

/// The committing user's identity from the global configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserConfig {
    pub name: String,
    pub email: String,
}

impl UserConfig {
    /// Load from the usual places: `~/.gitconfig`, then
    /// `$XDG_CONFIG_HOME/git/config`. The later file wins on conflict.
    ///
    /// A missing file or missing `user.name`/`user.email` is a
    /// [`ConfigError::Missing`], which callers may treat as recoverable.
    pub fn load_default() -> Result<Self, ConfigError> {
        let mut candidates: Vec<PathBuf> = Vec::new();
        if let Some(home) = std::env::var_os("HOME") {
            candidates.push(PathBuf::from(home).join(".gitconfig"));
        }
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            candidates.push(PathBuf::from(xdg).join("git").join("config"));
        }
        Self::load_from(&candidates)
    }

    /// Load from an explicit list of candidate files; later files win.
    pub fn load_from(paths: &[PathBuf]) -> Result<Self, ConfigError> {
        let mut name = None;
        let mut email = None;

        for path in paths {
            if !path.is_file() {
                continue;
            }
            let config = ConfigFile::load(path)?;
            if let Some(n) = config.get("user", "name") {
                name = Some(n.to_string());
            }
            if let Some(e) = config.get("user", "email") {
                email = Some(e.to_string());
            }
        }

        match (name, email) {
            (Some(name), Some(email)) => Ok(Self { name, email }),
            (None, _) => Err(ConfigError::Missing("user.name".into())),
            (_, None) => Err(ConfigError::Missing("user.email".into())),
        }
    }
}
