use std::fs;
use std::path::Path;

use got_config::ConfigFile;

use crate::RepoError;

const DEFAULT_DESCRIPTION: &str =
    "Unnamed repository; edit this file 'description' to name the repository.\n";

const DEFAULT_HEAD: &str = "ref: refs/heads/master\n";

/// Lay down a fresh repository at `path`.
///
/// Refuses a target that is a file, and a `.git` directory that already
/// has content. An existing empty `.git` (or an absent one) is fine.
pub fn init_repository(path: &Path) -> Result<(), RepoError> {
    if path.exists() {
        if !path.is_dir() {
            return Err(RepoError::NotADirectory(path.to_path_buf()));
        }
        let git_dir = path.join(".git");
        if git_dir.exists() {
            if !git_dir.is_dir() {
                return Err(RepoError::NotADirectory(git_dir));
            }
            if fs::read_dir(&git_dir)?.next().is_some() {
                return Err(RepoError::GitDirNotEmpty(git_dir));
            }
        }
    } else {
        fs::create_dir_all(path)?;
    }

    let git_dir = path.join(".git");
    fs::create_dir_all(git_dir.join("branches"))?;
    fs::create_dir_all(git_dir.join("objects"))?;
    fs::create_dir_all(git_dir.join("refs").join("heads"))?;
    fs::create_dir_all(git_dir.join("refs").join("tags"))?;

    fs::write(git_dir.join("description"), DEFAULT_DESCRIPTION)?;
    fs::write(git_dir.join("HEAD"), DEFAULT_HEAD)?;

    let mut config = ConfigFile::new();
    config.set("core", "repositoryformatversion", "0");
    config.set("core", "filemode", "true");
    config.set("core", "bare", "false");
    config.write_to(git_dir.join("config"))?;

    Ok(())
}
