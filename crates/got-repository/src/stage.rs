//! Adding to and removing from the staging area.

use std::fs;
use std::path::{Path, PathBuf};

use bstr::ByteSlice;
use got_index::{IndexEntry, ModeType, Stage, StatData};
use got_object::ObjectKind;

use crate::{RepoError, Repository};

/// Stage files: blob their contents into the object store and record an
/// entry per file. Directories are walked recursively; `.git` is skipped.
pub fn add(repo: &Repository, paths: &[PathBuf]) -> Result<(), RepoError> {
    let mut index = repo.load_index()?;

    for path in paths {
        // The worktree root itself stages everything under it.
        let abs = if repo.is_worktree_root(path)? {
            repo.work_tree().to_path_buf()
        } else {
            let rel = repo.worktree_rel(path)?;
            repo.worktree_path(rel.as_bstr())
        };

        let meta = fs::symlink_metadata(&abs)?;
        if meta.is_dir() {
            let mut files = Vec::new();
            collect_files(repo, &abs, &mut files)?;
            for file in files {
                stage_file(repo, &mut index, &file)?;
            }
        } else {
            stage_file(repo, &mut index, &abs)?;
        }
    }

    repo.write_index(&index)
}

/// Unstage paths; with `delete_files` the worktree copies go too.
///
/// A path with no index entry is an error and aborts before anything is
/// written back.
pub fn remove(
    repo: &Repository,
    paths: &[PathBuf],
    delete_files: bool,
) -> Result<(), RepoError> {
    let mut index = repo.load_index()?;

    for path in paths {
        let rel = repo.worktree_rel(path)?;
        if !index.remove(rel.as_bstr()) {
            return Err(RepoError::NotStaged(rel.to_string()));
        }
        if delete_files {
            let abs = repo.worktree_path(rel.as_bstr());
            match fs::remove_file(&abs) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(RepoError::Io(e)),
            }
        }
    }

    repo.write_index(&index)
}

fn stage_file(
    repo: &Repository,
    index: &mut got_index::Index,
    abs: &Path,
) -> Result<(), RepoError> {
    let rel = repo.worktree_rel(abs)?;
    let meta = fs::symlink_metadata(abs)?;

    let (mode_type, mode_perms, contents) = if meta.file_type().is_symlink() {
        let target = fs::read_link(abs)?;
        let bytes = target.to_string_lossy().into_owned().into_bytes();
        (ModeType::Symlink, 0, bytes)
    } else {
        let perms = if is_executable(&meta) { 0o755 } else { 0o644 };
        (ModeType::Regular, perms, fs::read(abs)?)
    };

    let id = repo.odb().write_raw(ObjectKind::Blob, &contents)?;

    index.add(IndexEntry {
        path: rel,
        id,
        mode_type,
        mode_perms,
        stage: Stage::Normal,
        assume_valid: false,
        stat: StatData::from_metadata(&meta),
    });

    Ok(())
}

#[cfg(unix)]
fn is_executable(meta: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_meta: &fs::Metadata) -> bool {
    false
}

/// Collect regular files under `dir`, skipping the `.git` directory.
fn collect_files(
    repo: &Repository,
    dir: &Path,
    out: &mut Vec<PathBuf>,
) -> Result<(), RepoError> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path == repo.git_dir() {
            continue;
        }

        let meta = fs::symlink_metadata(&path)?;
        if meta.is_dir() {
            collect_files(repo, &path, out)?;
        } else {
            out.push(path);
        }
    }
    Ok(())
}
