//! Instantiating a tree into an empty directory.

use std::fs;
use std::path::Path;

use bstr::ByteSlice;
use got_object::{FileMode, Object, ObjectKind, Tree};

use crate::{find, RepoError, Repository};

/// Materialize the tree named by `name` (a commit peels to its tree)
/// under `target`.
///
/// The target must be an empty directory; a missing one is created. The
/// worktree proper is never touched.
pub fn checkout(repo: &Repository, name: &str, target: &Path) -> Result<(), RepoError> {
    let tree_id = find(repo, name, Some(ObjectKind::Tree), true)?;

    match fs::metadata(target) {
        Ok(meta) => {
            if !meta.is_dir() {
                return Err(RepoError::NotADirectory(target.to_path_buf()));
            }
            if fs::read_dir(target)?.next().is_some() {
                return Err(RepoError::TargetNotEmpty(target.to_path_buf()));
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            fs::create_dir_all(target)?;
        }
        Err(e) => return Err(RepoError::Io(e)),
    }

    let tree = match repo.odb().read(&tree_id)? {
        Object::Tree(tree) => tree,
        other => {
            return Err(RepoError::KindMismatch {
                name: name.to_string(),
                expected: ObjectKind::Tree.to_string(),
                actual: other.kind().to_string(),
            })
        }
    };

    instantiate(repo, &tree, target)
}

fn instantiate(repo: &Repository, tree: &Tree, dir: &Path) -> Result<(), RepoError> {
    for leaf in tree.iter() {
        let dest = dir.join(leaf.name.to_str_lossy().as_ref());

        match repo.odb().read(&leaf.id)? {
            Object::Tree(subtree) => {
                fs::create_dir(&dest)?;
                instantiate(repo, &subtree, &dest)?;
            }
            Object::Blob(blob) => {
                write_blob(&dest, &blob.data, leaf.mode)?;
            }
            other => {
                return Err(RepoError::KindMismatch {
                    name: leaf.id.to_hex(),
                    expected: "tree or blob".to_string(),
                    actual: other.kind().to_string(),
                })
            }
        }
    }
    Ok(())
}

#[cfg(unix)]
fn write_blob(dest: &Path, data: &[u8], mode: FileMode) -> Result<(), RepoError> {
    use std::os::unix::fs::PermissionsExt;

    if mode.is_symlink() {
        let target = String::from_utf8_lossy(data);
        std::os::unix::fs::symlink(target.as_ref(), dest)?;
        return Ok(());
    }

    fs::write(dest, data)?;
    if mode == FileMode::Executable {
        fs::set_permissions(dest, fs::Permissions::from_mode(0o755))?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn write_blob(dest: &Path, data: &[u8], _mode: FileMode) -> Result<(), RepoError> {
    fs::write(dest, data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{add, commit};

    #[test]
    fn checkout_reproduces_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        fs::create_dir_all(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("top.txt"), b"top\n").unwrap();
        fs::write(dir.path().join("sub/nested.txt"), b"nested\n").unwrap();
        add(
            &repo,
            &[dir.path().join("top.txt"), dir.path().join("sub")],
        )
        .unwrap();
        let id = commit(&repo, "snapshot").unwrap();

        let out = tempfile::tempdir().unwrap();
        let target = out.path().join("restore");
        checkout(&repo, &id.to_hex(), &target).unwrap();

        assert_eq!(fs::read(target.join("top.txt")).unwrap(), b"top\n");
        assert_eq!(fs::read(target.join("sub/nested.txt")).unwrap(), b"nested\n");
    }

    #[test]
    fn refuses_non_empty_target() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        fs::write(dir.path().join("a"), b"a").unwrap();
        add(&repo, &[dir.path().join("a")]).unwrap();
        let id = commit(&repo, "c").unwrap();

        let out = tempfile::tempdir().unwrap();
        fs::write(out.path().join("occupied"), b"x").unwrap();

        assert!(matches!(
            checkout(&repo, &id.to_hex(), out.path()).unwrap_err(),
            RepoError::TargetNotEmpty(_)
        ));
    }

    #[test]
    fn refuses_file_target() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        fs::write(dir.path().join("a"), b"a").unwrap();
        add(&repo, &[dir.path().join("a")]).unwrap();
        let id = commit(&repo, "c").unwrap();

        let out = tempfile::tempdir().unwrap();
        let file = out.path().join("a-file");
        fs::write(&file, b"x").unwrap();

        assert!(matches!(
            checkout(&repo, &id.to_hex(), &file).unwrap_err(),
            RepoError::NotADirectory(_)
        ));
    }
}
