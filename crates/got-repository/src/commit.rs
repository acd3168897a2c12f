//! Recording the staged snapshot as a commit.

use bstr::BString;
use got_config::UserConfig;
use got_hash::ObjectId;
use got_object::{Commit, Object};
use got_ref::{RefName, RefTarget};
use got_utils::{GitDate, Signature};

use crate::{RepoError, Repository};

/// Record the index as a commit and advance the current branch.
///
/// The parent is HEAD's resolved id when there is one; an unborn branch
/// simply yields a root commit. On a branch the branch ref is updated;
/// with a detached HEAD the id goes into HEAD itself.
pub fn commit(repo: &Repository, message: &str) -> Result<ObjectId, RepoError> {
    let index = repo.load_index()?;
    let tree = got_index::tree::write_tree(&index, repo.odb())?;

    let parent = repo.head_id()?;

    let signature = user_signature()?;

    // Normalize to a single trailing newline.
    let mut message = BString::from(message.trim().as_bytes().to_vec());
    message.extend_from_slice(b"\n");

    let commit = Commit::new(tree, parent, &signature, &signature, message);
    let id = repo.odb().write(&Object::Commit(commit))?;

    match repo.head_target()? {
        Some(RefTarget::Symbolic(branch)) => {
            got_ref::write_ref(repo.git_dir(), &branch, &id)?;
        }
        _ => {
            got_ref::write_ref(repo.git_dir(), &RefName::new("HEAD")?, &id)?;
        }
    }

    Ok(id)
}

/// The committing identity, stamped with the current local time.
///
/// A missing or unusable user configuration is recoverable: commits fall
/// back to a placeholder identity rather than failing.
pub(crate) fn user_signature() -> Result<Signature, RepoError> {
    let now = GitDate::now();
    match UserConfig::load_default() {
        Ok(user) => Ok(Signature::new(user.name, user.email, now)),
        Err(_) => Ok(Signature::new("Unknown", "unknown@example.com", now)),
    }
}
