//! The three-way workspace report: HEAD vs index vs worktree.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use bstr::{BString, ByteSlice};
use got_hash::ObjectId;
use got_index::Stage;
use got_object::{Object, ObjectKind};
use got_odb::ObjectStore;
use got_ref::RefTarget;

use crate::{RepoError, Repository};

/// Where HEAD currently points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchState {
    /// On a branch with at least one commit.
    OnBranch(String),
    /// HEAD holds a bare id.
    Detached(ObjectId),
    /// On a branch that has no commit yet.
    Unborn(String),
}

/// A difference between HEAD and the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagedChange {
    Added,
    Modified,
    Deleted,
}

/// A difference between the index and the worktree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorktreeChange {
    Modified,
    Deleted,
}

/// The full status report. Paths are worktree-relative byte strings.
#[derive(Debug)]
pub struct Status {
    pub branch: BranchState,
    pub staged: Vec<(BString, StagedChange)>,
    pub unstaged: Vec<(BString, WorktreeChange)>,
    pub untracked: Vec<BString>,
}

/// Compute the status of the repository.
pub fn status(repo: &Repository) -> Result<Status, RepoError> {
    let index = repo.load_index()?;

    let branch = branch_state(repo)?;

    // HEAD vs index.
    let mut head_map = match repo.head_id()? {
        Some(head) => {
            let tree = match repo.odb().read(&head)? {
                Object::Commit(commit) => commit.tree()?,
                other => {
                    return Err(RepoError::KindMismatch {
                        name: "HEAD".into(),
                        expected: ObjectKind::Commit.to_string(),
                        actual: other.kind().to_string(),
                    })
                }
            };
            flatten_tree(repo.odb(), &tree)?
        }
        None => HashMap::new(),
    };

    let mut staged = Vec::new();
    for entry in index.iter().filter(|e| e.stage == Stage::Normal) {
        match head_map.remove(entry.path.as_bstr()) {
            Some(head_id) => {
                if head_id != entry.id {
                    staged.push((entry.path.clone(), StagedChange::Modified));
                }
            }
            None => staged.push((entry.path.clone(), StagedChange::Added)),
        }
    }
    let mut deleted: Vec<BString> = head_map.into_keys().collect();
    deleted.sort();
    staged.extend(deleted.into_iter().map(|p| (p, StagedChange::Deleted)));

    // Index vs worktree.
    let mut unstaged = Vec::new();
    for entry in index.iter().filter(|e| e.stage == Stage::Normal) {
        let abs = repo.worktree_path(entry.path.as_bstr());
        let meta = match fs::symlink_metadata(&abs) {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                unstaged.push((entry.path.clone(), WorktreeChange::Deleted));
                continue;
            }
            Err(e) => return Err(RepoError::Io(e)),
        };

        if entry.stat.matches(&meta) {
            continue;
        }
        // Stat data changed: compare content before declaring a change.
        let contents = if meta.file_type().is_symlink() {
            fs::read_link(&abs)?
                .to_string_lossy()
                .into_owned()
                .into_bytes()
        } else {
            fs::read(&abs)?
        };
        let actual = ObjectStore::hash(ObjectKind::Blob, &contents)?;
        if actual != entry.id {
            unstaged.push((entry.path.clone(), WorktreeChange::Modified));
        }
    }

    // Worktree vs index: untracked files.
    let mut all_files = Vec::new();
    walk_worktree(repo, repo.work_tree(), &mut all_files)?;
    let mut untracked: Vec<BString> = all_files
        .into_iter()
        .filter(|path| !index.contains_path(path.as_bstr()))
        .collect();
    untracked.sort();

    Ok(Status {
        branch,
        staged,
        unstaged,
        untracked,
    })
}

fn branch_state(repo: &Repository) -> Result<BranchState, RepoError> {
    match repo.head_target()? {
        Some(RefTarget::Symbolic(target)) => {
            let branch = target
                .branch_name()
                .unwrap_or(target.as_str())
                .to_string();
            match got_ref::resolve(repo.git_dir(), &target)? {
                Some(_) => Ok(BranchState::OnBranch(branch)),
                None => Ok(BranchState::Unborn(branch)),
            }
        }
        Some(RefTarget::Direct(id)) => Ok(BranchState::Detached(id)),
        None => Ok(BranchState::Unborn("master".to_string())),
    }
}

/// Flatten a tree into a `path → blob id` map, recursing through leaves
/// whose mode classifies as a directory.
pub fn flatten_tree(
    odb: &ObjectStore,
    tree_id: &ObjectId,
) -> Result<HashMap<BString, ObjectId>, RepoError> {
    let mut out = HashMap::new();
    flatten_into(odb, tree_id, b"", &mut out)?;
    Ok(out)
}

fn flatten_into(
    odb: &ObjectStore,
    tree_id: &ObjectId,
    prefix: &[u8],
    out: &mut HashMap<BString, ObjectId>,
) -> Result<(), RepoError> {
    let tree = match odb.read(tree_id)? {
        Object::Tree(tree) => tree,
        other => {
            return Err(RepoError::KindMismatch {
                name: tree_id.to_hex(),
                expected: ObjectKind::Tree.to_string(),
                actual: other.kind().to_string(),
            })
        }
    };

    for leaf in tree.iter() {
        let mut path = BString::from(prefix);
        if !path.is_empty() {
            path.push(b'/');
        }
        path.extend_from_slice(&leaf.name);

        if leaf.mode.is_tree() {
            flatten_into(odb, &leaf.id, &path, out)?;
        } else {
            out.insert(path, leaf.id);
        }
    }
    Ok(())
}

/// Collect every file path in the worktree, relative with `/` separators,
/// skipping `.git`.
fn walk_worktree(
    repo: &Repository,
    dir: &Path,
    out: &mut Vec<BString>,
) -> Result<(), RepoError> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path == repo.git_dir() {
            continue;
        }

        let meta = fs::symlink_metadata(&path)?;
        if meta.is_dir() {
            walk_worktree(repo, &path, out)?;
        } else {
            out.push(repo.worktree_rel(&path)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{add, commit};

    #[test]
    fn fresh_repo_is_unborn_master() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let st = status(&repo).unwrap();
        assert_eq!(st.branch, BranchState::Unborn("master".to_string()));
        assert!(st.staged.is_empty());
        assert!(st.unstaged.is_empty());
    }

    #[test]
    fn untracked_then_added_then_clean() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();

        fs::write(dir.path().join("new.txt"), b"fresh\n").unwrap();
        let st = status(&repo).unwrap();
        assert_eq!(st.untracked, vec![BString::from("new.txt")]);

        add(&repo, &[dir.path().join("new.txt")]).unwrap();
        let st = status(&repo).unwrap();
        assert!(st.untracked.is_empty());
        assert_eq!(
            st.staged,
            vec![(BString::from("new.txt"), StagedChange::Added)]
        );

        commit(&repo, "add new.txt").unwrap();
        let st = status(&repo).unwrap();
        assert!(st.staged.is_empty());
        assert_eq!(st.branch, BranchState::OnBranch("master".to_string()));
    }

    #[test]
    fn worktree_edit_shows_modified() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let file = dir.path().join("f.txt");

        fs::write(&file, b"v1").unwrap();
        add(&repo, &[file.clone()]).unwrap();

        fs::write(&file, b"v2 with different length").unwrap();
        let st = status(&repo).unwrap();
        assert_eq!(
            st.unstaged,
            vec![(BString::from("f.txt"), WorktreeChange::Modified)]
        );
    }

    #[test]
    fn worktree_delete_shows_deleted() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let file = dir.path().join("f.txt");

        fs::write(&file, b"v1").unwrap();
        add(&repo, &[file.clone()]).unwrap();
        fs::remove_file(&file).unwrap();

        let st = status(&repo).unwrap();
        assert_eq!(
            st.unstaged,
            vec![(BString::from("f.txt"), WorktreeChange::Deleted)]
        );
    }

    #[test]
    fn head_delete_shows_staged_deleted() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let file = dir.path().join("f.txt");

        fs::write(&file, b"v1").unwrap();
        add(&repo, &[file.clone()]).unwrap();
        commit(&repo, "one").unwrap();

        crate::remove(&repo, &[file], true).unwrap();
        let st = status(&repo).unwrap();
        assert_eq!(
            st.staged,
            vec![(BString::from("f.txt"), StagedChange::Deleted)]
        );
    }
}
