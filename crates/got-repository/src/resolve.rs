//! Turning names into object ids.
//!
//! A name can be the literal `HEAD`, a short or full hex id, a tag name,
//! or a branch name. Resolution collects every candidate; [`find`] then
//! insists on exactly one and optionally peels it to the requested kind.

use got_hash::ObjectId;
use got_object::{Object, ObjectKind};
use got_ref::RefName;

use crate::{RepoError, Repository};

/// Collect all candidate ids for a name.
///
/// `HEAD` resolves through the symbolic-ref chain and short-circuits;
/// hex strings of 4–40 characters match loose objects by prefix; tag and
/// branch names each contribute their resolved id.
pub fn resolve(repo: &Repository, name: &str) -> Result<Vec<ObjectId>, RepoError> {
    if name.is_empty() {
        return Err(RepoError::NoMatch(String::new()));
    }

    if name == "HEAD" {
        return Ok(repo.head_id()?.into_iter().collect());
    }

    let mut candidates = Vec::new();

    if is_hex_name(name) {
        candidates.extend(repo.odb().enumerate_prefix(name)?);
    }

    for prefix in ["refs/tags/", "refs/heads/"] {
        if let Ok(ref_name) = RefName::new(format!("{prefix}{name}")) {
            if let Some(id) = got_ref::resolve(repo.git_dir(), &ref_name)? {
                candidates.push(id);
            }
        }
    }

    Ok(candidates)
}

/// Whether a name is plausible as a (short) hex id: 4 to 40 hex chars.
fn is_hex_name(name: &str) -> bool {
    (4..=40).contains(&name.len()) && name.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Resolve a name to exactly one object of the expected kind.
///
/// With `follow`, tags peel to their target, and a commit peels to its
/// tree when a tree was asked for. Without an expected kind the resolved
/// id is returned as-is.
pub fn find(
    repo: &Repository,
    name: &str,
    expected: Option<ObjectKind>,
    follow: bool,
) -> Result<ObjectId, RepoError> {
    let candidates = resolve(repo, name)?;

    let mut id = match candidates.len() {
        0 => return Err(RepoError::NoMatch(name.to_string())),
        1 => candidates[0],
        n => {
            return Err(RepoError::Ambiguous {
                name: name.to_string(),
                count: n,
            })
        }
    };

    let Some(expected) = expected else {
        return Ok(id);
    };

    loop {
        let obj = repo.odb().read(&id)?;

        if obj.kind() == expected {
            return Ok(id);
        }
        if !follow {
            return Err(kind_mismatch(name, expected, obj.kind()));
        }

        match &obj {
            Object::Tag(tag) => {
                id = tag.target()?;
            }
            Object::Commit(commit) if expected == ObjectKind::Tree => {
                id = commit.tree()?;
            }
            _ => return Err(kind_mismatch(name, expected, obj.kind())),
        }
    }
}

fn kind_mismatch(name: &str, expected: ObjectKind, actual: ObjectKind) -> RepoError {
    RepoError::KindMismatch {
        name: name.to_string(),
        expected: expected.to_string(),
        actual: actual.to_string(),
    }
}
