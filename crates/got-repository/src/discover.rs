use std::path::{Path, PathBuf};

use crate::RepoError;

/// Find the worktree root: the nearest ancestor of `start` containing a
/// `.git` directory.
pub fn find_root(start: &Path) -> Result<PathBuf, RepoError> {
    let start = std::fs::canonicalize(start)
        .map_err(|_| RepoError::NotARepository(start.to_path_buf()))?;

    let mut current = start.clone();
    loop {
        if current.join(".git").is_dir() {
            return Ok(current);
        }
        match current.parent() {
            Some(parent) if parent != current => current = parent.to_path_buf(),
            _ => return Err(RepoError::NotARepository(start)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Repository;

    #[test]
    fn finds_root_from_nested_dir() {
        let dir = tempfile::tempdir().unwrap();
        Repository::init(dir.path()).unwrap();
        let nested = dir.path().join("a/b/c");
        std::fs::create_dir_all(&nested).unwrap();

        let root = find_root(&nested).unwrap();
        assert_eq!(root, std::fs::canonicalize(dir.path()).unwrap());
    }

    #[test]
    fn errors_without_repository() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            find_root(dir.path()).unwrap_err(),
            RepoError::NotARepository(_)
        ));
    }
}
