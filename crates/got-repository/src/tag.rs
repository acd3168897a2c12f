//! Tag creation and listing.

use got_hash::ObjectId;
use got_object::{Object, Tag};
use got_ref::RefName;

use crate::commit::user_signature;
use crate::{find, RepoError, Repository};

/// Create a tag named `name` pointing at whatever `target` resolves to.
///
/// A lightweight tag is just a ref; an annotated one writes a tag object
/// carrying `message` and points the ref at it. Returns the id the ref
/// ends up holding.
pub fn create_tag(
    repo: &Repository,
    name: &str,
    target: &str,
    annotate: bool,
    message: &str,
) -> Result<ObjectId, RepoError> {
    let target_id = find(repo, target, None, true)?;
    let ref_name = RefName::new(format!("refs/tags/{name}"))?;

    let id = if annotate {
        let target_kind = repo.odb().read(&target_id)?.kind();
        let tagger = user_signature()?;
        let mut msg = message.trim().to_string();
        msg.push('\n');
        let tag = Tag::new(target_id, target_kind, name, &tagger, msg);
        repo.odb().write(&Object::Tag(tag))?
    } else {
        target_id
    };

    got_ref::write_ref(repo.git_dir(), &ref_name, &id)?;
    Ok(id)
}

/// All tags, as `(name, id)` pairs sorted by name.
pub fn list_tags(repo: &Repository) -> Result<Vec<(String, ObjectId)>, RepoError> {
    let mut out = Vec::new();
    for (name, id) in got_ref::iter_refs(repo.git_dir())? {
        if let Some(tag) = name.tag_name() {
            out.push((tag.to_string(), id));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{add, commit};
    use got_object::ObjectKind;
    use std::fs;

    fn repo_with_commit() -> (tempfile::TempDir, Repository, ObjectId) {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        fs::write(dir.path().join("a"), b"a").unwrap();
        add(&repo, &[dir.path().join("a")]).unwrap();
        let id = commit(&repo, "base").unwrap();
        (dir, repo, id)
    }

    #[test]
    fn lightweight_tag_points_at_target() {
        let (_dir, repo, commit_id) = repo_with_commit();
        let id = create_tag(&repo, "v1.0", "HEAD", false, "").unwrap();
        assert_eq!(id, commit_id);
        assert_eq!(list_tags(&repo).unwrap(), vec![("v1.0".to_string(), id)]);
    }

    #[test]
    fn annotated_tag_writes_object() {
        let (_dir, repo, commit_id) = repo_with_commit();
        let id = create_tag(&repo, "v2.0", "HEAD", true, "release two").unwrap();
        assert_ne!(id, commit_id);

        let Object::Tag(tag) = repo.odb().read(&id).unwrap() else {
            panic!("expected a tag object");
        };
        assert_eq!(tag.target().unwrap(), commit_id);
        assert_eq!(tag.target_kind().unwrap(), ObjectKind::Commit);
        assert_eq!(tag.name().unwrap(), "v2.0");
        assert_eq!(tag.message(), "release two\n");
    }

    #[test]
    fn tag_name_resolves_as_candidate() {
        let (_dir, repo, commit_id) = repo_with_commit();
        create_tag(&repo, "stable", "HEAD", false, "").unwrap();
        let found = find(&repo, "stable", None, true).unwrap();
        assert_eq!(found, commit_id);
    }
}
