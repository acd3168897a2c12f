//! Repository discovery, initialization, and the glue between worktree,
//! index, and object store.

mod checkout;
mod commit;
mod discover;
mod error;
mod init;
mod resolve;
mod stage;
mod status;
mod tag;

pub use checkout::checkout;
pub use commit::commit;
pub use error::RepoError;
pub use resolve::{find, resolve};
pub use stage::{add, remove};
pub use status::{flatten_tree, status, BranchState, StagedChange, Status, WorktreeChange};
pub use tag::{create_tag, list_tags};

use std::path::{Path, PathBuf};

use bstr::{BStr, BString, ByteSlice};
use got_config::ConfigFile;
use got_hash::ObjectId;
use got_index::Index;
use got_odb::ObjectStore;
use got_ref::{RefName, RefTarget};

/// An opened repository: a worktree and the `.git` directory inside it.
pub struct Repository {
    git_dir: PathBuf,
    work_tree: PathBuf,
    odb: ObjectStore,
    config: ConfigFile,
}

impl Repository {
    /// Open the repository whose worktree root is `root`.
    ///
    /// Requires `.git/` and a config with `core.repositoryformatversion`
    /// equal to zero.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, RepoError> {
        let work_tree = root.as_ref().to_path_buf();
        let git_dir = work_tree.join(".git");
        if !git_dir.is_dir() {
            return Err(RepoError::NotARepository(work_tree));
        }

        let config_path = git_dir.join("config");
        if !config_path.is_file() {
            return Err(RepoError::MissingConfig(config_path));
        }
        let config = ConfigFile::load(&config_path)?;
        let version = config.get_int("core", "repositoryformatversion").unwrap_or(0);
        if version != 0 {
            return Err(RepoError::UnsupportedFormatVersion(version));
        }

        let odb = ObjectStore::open(git_dir.join("objects"));
        Ok(Self {
            git_dir,
            work_tree,
            odb,
            config,
        })
    }

    /// Discover a repository by walking up from `start`.
    pub fn discover(start: impl AsRef<Path>) -> Result<Self, RepoError> {
        let root = discover::find_root(start.as_ref())?;
        Self::open(root)
    }

    /// Create a new repository at `path` and open it.
    pub fn init(path: impl AsRef<Path>) -> Result<Self, RepoError> {
        init::init_repository(path.as_ref())?;
        Self::open(path)
    }

    /// The `.git` directory.
    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    /// The worktree root.
    pub fn work_tree(&self) -> &Path {
        &self.work_tree
    }

    /// A path under the `.git` directory.
    pub fn git_path(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.git_dir.join(rel)
    }

    /// The object store.
    pub fn odb(&self) -> &ObjectStore {
        &self.odb
    }

    /// The repository configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Path of the index file.
    pub fn index_path(&self) -> PathBuf {
        self.git_dir.join("index")
    }

    /// Read the index (empty when the file does not exist yet).
    pub fn load_index(&self) -> Result<Index, RepoError> {
        Ok(Index::read_from(self.index_path())?)
    }

    /// Replace the index on disk.
    pub fn write_index(&self, index: &Index) -> Result<(), RepoError> {
        Ok(index.write_to(self.index_path())?)
    }

    /// The target HEAD currently points at, if HEAD exists.
    pub fn head_target(&self) -> Result<Option<RefTarget>, RepoError> {
        let head = RefName::new("HEAD")?;
        Ok(got_ref::read_ref(&self.git_dir, &head)?)
    }

    /// Resolve HEAD fully to an id. `None` on an unborn branch.
    pub fn head_id(&self) -> Result<Option<ObjectId>, RepoError> {
        let head = RefName::new("HEAD")?;
        Ok(got_ref::resolve(&self.git_dir, &head)?)
    }

    /// The current branch name, or `None` when HEAD is detached.
    pub fn current_branch(&self) -> Result<Option<String>, RepoError> {
        match self.head_target()? {
            Some(RefTarget::Symbolic(target)) => {
                Ok(target.branch_name().map(|b| b.to_string()))
            }
            _ => Ok(None),
        }
    }

    /// Turn a user-supplied path into a worktree-relative byte path with
    /// `/` separators. The path must lie inside the worktree.
    pub fn worktree_rel(&self, path: &Path) -> Result<BString, RepoError> {
        let abs = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };
        let abs = normalize(&abs);
        let root = normalize(&self.work_tree);

        let rel = abs
            .strip_prefix(&root)
            .map_err(|_| RepoError::OutsideWorktree(path.to_path_buf()))?;

        let mut out = BString::from("");
        for component in rel.components() {
            if !out.is_empty() {
                out.push(b'/');
            }
            out.extend_from_slice(component.as_os_str().to_string_lossy().as_bytes());
        }
        if out.is_empty() {
            return Err(RepoError::OutsideWorktree(path.to_path_buf()));
        }
        Ok(out)
    }

    /// Whether a user-supplied path denotes the worktree root itself.
    pub fn is_worktree_root(&self, path: &Path) -> Result<bool, RepoError> {
        let abs = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };
        Ok(normalize(&abs) == normalize(&self.work_tree))
    }

    /// The absolute worktree path for a stored relative byte path.
    pub fn worktree_path(&self, rel: &BStr) -> PathBuf {
        let mut path = self.work_tree.clone();
        for part in rel.split(|&b| b == b'/') {
            path.push(part.to_str_lossy().as_ref());
        }
        path
    }
}

/// Resolve `.` and `..` components lexically, without touching the
/// filesystem (the paths involved may not exist yet).
fn normalize(path: &Path) -> PathBuf {
    use std::path::Component;
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("git_dir", &self.git_dir)
            .field("work_tree", &self.work_tree)
            .finish_non_exhaustive()
    }
}
