use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::{Result, UtilError};

const LOCK_SUFFIX: &str = ".lock";

/// RAII guard for whole-file replacement.
///
/// Acquiring creates `<path>.lock` with O_CREAT|O_EXCL; new content is
/// written into the lock file and renamed over the target on [`commit`].
/// Dropping without committing removes the lock file, leaving the target
/// untouched.
///
/// [`commit`]: LockFile::commit
#[derive(Debug)]
pub struct LockFile {
    path: PathBuf,
    lock_path: PathBuf,
    file: Option<File>,
    committed: bool,
}

impl LockFile {
    /// Acquire a lock on `path`. Fails if another holder exists.
    pub fn acquire(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let lock_path = PathBuf::from(format!("{}{}", path.display(), LOCK_SUFFIX));

        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&lock_path)
            .map_err(|e| {
                if e.kind() == io::ErrorKind::AlreadyExists {
                    UtilError::AlreadyLocked {
                        path: lock_path.clone(),
                    }
                } else {
                    UtilError::LockCreate {
                        path: lock_path.clone(),
                        source: e,
                    }
                }
            })?;

        Ok(Self {
            path,
            lock_path,
            file: Some(file),
            committed: false,
        })
    }

    /// The target file path (without the `.lock` suffix).
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The lock file path.
    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    /// Flush, sync, and atomically rename the lock file over the target.
    pub fn commit(mut self) -> Result<()> {
        if let Some(ref mut file) = self.file {
            file.flush().map_err(|e| UtilError::LockCommit {
                path: self.lock_path.clone(),
                source: e,
            })?;
            file.sync_all().map_err(|e| UtilError::LockCommit {
                path: self.lock_path.clone(),
                source: e,
            })?;
        }
        self.file.take();

        fs::rename(&self.lock_path, &self.path).map_err(|e| UtilError::LockCommit {
            path: self.lock_path.clone(),
            source: e,
        })?;

        self.committed = true;
        Ok(())
    }

    /// Abandon the write, removing the lock file.
    pub fn rollback(mut self) -> Result<()> {
        self.file.take();
        if self.lock_path.exists() {
            fs::remove_file(&self.lock_path)?;
        }
        self.committed = true;
        Ok(())
    }
}

impl Write for LockFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file
            .as_mut()
            .ok_or_else(|| io::Error::other("lock file already closed"))?
            .write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file
            .as_mut()
            .ok_or_else(|| io::Error::other("lock file already closed"))?
            .flush()
    }
}

impl Drop for LockFile {
    fn drop(&mut self) {
        if !self.committed {
            self.file.take();
            let _ = fs::remove_file(&self.lock_path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_replaces_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("index");
        fs::write(&target, b"old").unwrap();

        let mut lock = LockFile::acquire(&target).unwrap();
        assert!(lock.lock_path().exists());
        lock.write_all(b"new").unwrap();
        lock.commit().unwrap();

        assert!(!dir.path().join("index.lock").exists());
        assert_eq!(fs::read(&target).unwrap(), b"new");
    }

    #[test]
    fn drop_without_commit_rolls_back() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("index");
        fs::write(&target, b"original").unwrap();

        {
            let mut lock = LockFile::acquire(&target).unwrap();
            lock.write_all(b"discarded").unwrap();
        }

        assert!(!dir.path().join("index.lock").exists());
        assert_eq!(fs::read(&target).unwrap(), b"original");
    }

    #[test]
    fn second_acquire_fails() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("index");

        let _held = LockFile::acquire(&target).unwrap();
        match LockFile::acquire(&target) {
            Err(UtilError::AlreadyLocked { .. }) => {}
            other => panic!("expected AlreadyLocked, got {other:?}"),
        }
    }

    #[test]
    fn creates_missing_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("HEAD");

        let mut lock = LockFile::acquire(&target).unwrap();
        lock.write_all(b"ref: refs/heads/master\n").unwrap();
        lock.commit().unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"ref: refs/heads/master\n");
    }
}
