use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use bstr::ByteSlice;
use got_hash::ObjectId;
use got_utils::LockFile;

use crate::{RefError, RefName, RefTarget, MAX_SYMREF_DEPTH};

fn ref_path(git_dir: &Path, name: &RefName) -> PathBuf {
    git_dir.join(name.as_str())
}

/// Read a single reference file without following symbolic targets.
///
/// Returns `None` when the file does not exist.
pub fn read_ref(git_dir: &Path, name: &RefName) -> Result<Option<RefTarget>, RefError> {
    let path = ref_path(git_dir, name);
    let contents = match fs::read(&path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(RefError::Io(e)),
    };

    let trimmed = contents.trim();

    if let Some(target) = trimmed.strip_prefix(b"ref: ") {
        let target = std::str::from_utf8(target.trim()).map_err(|_| RefError::Malformed {
            name: name.to_string(),
            reason: "non-UTF-8 symbolic target".into(),
        })?;
        return Ok(Some(RefTarget::Symbolic(RefName::new(target)?)));
    }

    let hex = std::str::from_utf8(trimmed).map_err(|_| RefError::Malformed {
        name: name.to_string(),
        reason: "non-UTF-8 id".into(),
    })?;
    let id = ObjectId::from_hex(hex).map_err(|e| RefError::Malformed {
        name: name.to_string(),
        reason: e.to_string(),
    })?;
    Ok(Some(RefTarget::Direct(id)))
}

/// Resolve a reference to an object id, chasing symbolic targets.
///
/// A missing file anywhere along the chain resolves to `None`. Chains
/// deeper than [`MAX_SYMREF_DEPTH`] are reported as a cycle.
pub fn resolve(git_dir: &Path, name: &RefName) -> Result<Option<ObjectId>, RefError> {
    let mut current = name.clone();
    for _ in 0..MAX_SYMREF_DEPTH {
        match read_ref(git_dir, &current)? {
            None => return Ok(None),
            Some(RefTarget::Direct(id)) => return Ok(Some(id)),
            Some(RefTarget::Symbolic(next)) => current = next,
        }
    }
    Err(RefError::CycleDetected {
        name: name.to_string(),
        max: MAX_SYMREF_DEPTH,
    })
}

/// Write a direct reference atomically.
pub fn write_ref(git_dir: &Path, name: &RefName, id: &ObjectId) -> Result<(), RefError> {
    let path = ref_path(git_dir, name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut lock = LockFile::acquire(&path).map_err(|e| RefError::LockFailed {
        name: name.to_string(),
        reason: e.to_string(),
    })?;
    lock.write_all(format!("{}\n", id.to_hex()).as_bytes())?;
    lock.commit().map_err(|e| RefError::LockFailed {
        name: name.to_string(),
        reason: e.to_string(),
    })?;
    Ok(())
}

/// Write a symbolic reference atomically.
pub fn write_symbolic_ref(
    git_dir: &Path,
    name: &RefName,
    target: &RefName,
) -> Result<(), RefError> {
    let path = ref_path(git_dir, name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut lock = LockFile::acquire(&path).map_err(|e| RefError::LockFailed {
        name: name.to_string(),
        reason: e.to_string(),
    })?;
    lock.write_all(format!("ref: {target}\n").as_bytes())?;
    lock.commit().map_err(|e| RefError::LockFailed {
        name: name.to_string(),
        reason: e.to_string(),
    })?;
    Ok(())
}

/// Delete a reference file if it exists.
pub fn delete_ref(git_dir: &Path, name: &RefName) -> Result<(), RefError> {
    let path = ref_path(git_dir, name);
    match fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(RefError::Io(e)),
    }
}

/// Enumerate all references under `refs/`, resolved, sorted by name.
///
/// References that resolve to nothing (dangling symbolic refs) are
/// skipped; `.lock` droppings are ignored.
pub fn iter_refs(git_dir: &Path) -> Result<Vec<(RefName, ObjectId)>, RefError> {
    let refs_dir = git_dir.join("refs");
    let mut out = Vec::new();
    if refs_dir.is_dir() {
        collect(git_dir, &refs_dir, &mut out)?;
    }
    out.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(out)
}

fn collect(
    git_dir: &Path,
    dir: &Path,
    out: &mut Vec<(RefName, ObjectId)>,
) -> Result<(), RefError> {
    let entries = match fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(RefError::Io(e)),
    };

    for entry in entries {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            collect(git_dir, &path, out)?;
            continue;
        }

        let rel = path
            .strip_prefix(git_dir)
            .map_err(|_| RefError::InvalidName("path outside git dir".into()))?;
        let Some(name_str) = rel.to_str() else {
            continue;
        };
        if name_str.ends_with(".lock") {
            continue;
        }
        // Stored paths use the native separator; ref names always use '/'.
        let name_str = name_str.replace(std::path::MAIN_SEPARATOR, "/");

        let name = RefName::new(name_str)?;
        if let Some(id) = resolve(git_dir, &name)? {
            out.push((name, id));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oid(byte: u8) -> ObjectId {
        ObjectId::from_bytes(&[byte; 20]).unwrap()
    }

    #[test]
    fn read_direct_ref() {
        let dir = tempfile::tempdir().unwrap();
        let refs = dir.path().join("refs/heads");
        fs::create_dir_all(&refs).unwrap();
        fs::write(
            refs.join("master"),
            "da39a3ee5e6b4b0d3255bfef95601890afd80709\n",
        )
        .unwrap();

        let name = RefName::new("refs/heads/master").unwrap();
        match read_ref(dir.path(), &name).unwrap().unwrap() {
            RefTarget::Direct(id) => {
                assert_eq!(id.to_hex(), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
            }
            other => panic!("expected direct ref, got {other:?}"),
        }
    }

    #[test]
    fn direct_ref_without_newline() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("refs/heads")).unwrap();
        fs::write(
            dir.path().join("refs/heads/x"),
            "da39a3ee5e6b4b0d3255bfef95601890afd80709",
        )
        .unwrap();
        let name = RefName::new("refs/heads/x").unwrap();
        assert!(matches!(
            read_ref(dir.path(), &name).unwrap().unwrap(),
            RefTarget::Direct(_)
        ));
    }

    #[test]
    fn read_symbolic_ref() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("HEAD"), "ref: refs/heads/master\n").unwrap();

        let name = RefName::new("HEAD").unwrap();
        match read_ref(dir.path(), &name).unwrap().unwrap() {
            RefTarget::Symbolic(target) => assert_eq!(target.as_str(), "refs/heads/master"),
            other => panic!("expected symbolic ref, got {other:?}"),
        }
    }

    #[test]
    fn garbage_content_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("HEAD"), "what is this\n").unwrap();
        let name = RefName::new("HEAD").unwrap();
        assert!(matches!(
            read_ref(dir.path(), &name).unwrap_err(),
            RefError::Malformed { .. }
        ));
    }

    #[test]
    fn resolve_through_chain() {
        let dir = tempfile::tempdir().unwrap();
        let id = oid(0xaa);
        write_ref(dir.path(), &RefName::new("refs/heads/master").unwrap(), &id).unwrap();
        write_symbolic_ref(
            dir.path(),
            &RefName::new("HEAD").unwrap(),
            &RefName::new("refs/heads/master").unwrap(),
        )
        .unwrap();

        let resolved = resolve(dir.path(), &RefName::new("HEAD").unwrap()).unwrap();
        assert_eq!(resolved, Some(id));
    }

    #[test]
    fn unborn_branch_resolves_to_none() {
        let dir = tempfile::tempdir().unwrap();
        write_symbolic_ref(
            dir.path(),
            &RefName::new("HEAD").unwrap(),
            &RefName::new("refs/heads/master").unwrap(),
        )
        .unwrap();

        let resolved = resolve(dir.path(), &RefName::new("HEAD").unwrap()).unwrap();
        assert_eq!(resolved, None);
    }

    #[test]
    fn chain_of_depth_eight_resolves() {
        let dir = tempfile::tempdir().unwrap();
        let id = oid(0x01);
        write_ref(dir.path(), &RefName::new("refs/r8").unwrap(), &id).unwrap();
        for i in (1..8).rev() {
            write_symbolic_ref(
                dir.path(),
                &RefName::new(format!("refs/r{i}")).unwrap(),
                &RefName::new(format!("refs/r{}", i + 1)).unwrap(),
            )
            .unwrap();
        }
        let resolved = resolve(dir.path(), &RefName::new("refs/r1").unwrap()).unwrap();
        assert_eq!(resolved, Some(id));
    }

    #[test]
    fn chain_of_depth_nine_is_a_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let id = oid(0x01);
        write_ref(dir.path(), &RefName::new("refs/r9").unwrap(), &id).unwrap();
        for i in (1..9).rev() {
            write_symbolic_ref(
                dir.path(),
                &RefName::new(format!("refs/r{i}")).unwrap(),
                &RefName::new(format!("refs/r{}", i + 1)).unwrap(),
            )
            .unwrap();
        }
        assert!(matches!(
            resolve(dir.path(), &RefName::new("refs/r1").unwrap()).unwrap_err(),
            RefError::CycleDetected { max: 8, .. }
        ));
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let dir = tempfile::tempdir().unwrap();
        write_symbolic_ref(
            dir.path(),
            &RefName::new("refs/loop").unwrap(),
            &RefName::new("refs/loop").unwrap(),
        )
        .unwrap();
        assert!(matches!(
            resolve(dir.path(), &RefName::new("refs/loop").unwrap()).unwrap_err(),
            RefError::CycleDetected { .. }
        ));
    }

    #[test]
    fn enumerate_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let id = oid(0x22);
        write_ref(dir.path(), &RefName::new("refs/heads/master").unwrap(), &id).unwrap();
        write_ref(dir.path(), &RefName::new("refs/heads/dev").unwrap(), &id).unwrap();
        write_ref(dir.path(), &RefName::new("refs/tags/v1.0").unwrap(), &id).unwrap();

        let all = iter_refs(dir.path()).unwrap();
        let names: Vec<_> = all.iter().map(|(n, _)| n.as_str().to_string()).collect();
        assert_eq!(
            names,
            ["refs/heads/dev", "refs/heads/master", "refs/tags/v1.0"]
        );
    }

    #[test]
    fn delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let name = RefName::new("refs/heads/gone").unwrap();
        write_ref(dir.path(), &name, &oid(1)).unwrap();
        delete_ref(dir.path(), &name).unwrap();
        assert!(read_ref(dir.path(), &name).unwrap().is_none());
        delete_ref(dir.path(), &name).unwrap();
    }
}
