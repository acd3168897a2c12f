//! Folding the flat index into a tree DAG.

use std::collections::HashMap;

use bstr::{BStr, BString, ByteSlice};
use got_hash::ObjectId;
use got_object::{FileMode, Tree, TreeLeaf};
use got_odb::ObjectStore;

use crate::{Index, IndexError, Stage};

/// Build and write the tree hierarchy for the current index.
///
/// Entries are bucketed by parent directory and the buckets processed
/// deepest-first, so a directory's tree is written only after all of its
/// subdirectory trees exist and have been linked into it. Returns the root
/// tree id; an empty index produces the canonical empty tree.
pub fn write_tree(index: &Index, store: &ObjectStore) -> Result<ObjectId, IndexError> {
    let mut buckets: HashMap<BString, Vec<TreeLeaf>> = HashMap::new();
    // The root bucket always exists, so an empty index still writes the
    // empty tree.
    buckets.insert(BString::from(""), Vec::new());

    for entry in index.iter().filter(|e| e.stage == Stage::Normal) {
        let dir = dirname(entry.path.as_bstr());
        buckets
            .entry(BString::from(dir))
            .or_default()
            .push(TreeLeaf {
                mode: entry.file_mode(),
                name: BString::from(basename(entry.path.as_bstr())),
                id: entry.id,
            });

        // Every ancestor needs a bucket so subtree ids have somewhere to
        // land even when the ancestor holds no files of its own.
        let mut ancestor = dir;
        while !ancestor.is_empty() {
            ancestor = dirname(ancestor);
            buckets.entry(BString::from(ancestor)).or_default();
        }
    }

    // Deepest directories first; ties broken by descending lexicographic
    // order. By the time a bucket is processed every subdirectory tree is
    // already written and linked in.
    let mut order: Vec<BString> = buckets.keys().cloned().collect();
    order.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| b.cmp(a)));

    let mut root = None;
    for dir in order {
        let leaves = buckets.remove(&dir).unwrap_or_default();
        let tree = Tree { leaves };
        let payload = tree.serialize_payload();
        let id = store.write_raw(got_object::ObjectKind::Tree, &payload)?;

        if dir.is_empty() {
            root = Some(id);
        } else {
            let parent = dirname(dir.as_bstr());
            buckets
                .entry(BString::from(parent))
                .or_default()
                .push(TreeLeaf {
                    mode: FileMode::Tree,
                    name: BString::from(basename(dir.as_bstr())),
                    id,
                });
        }
    }

    // The root bucket is always present and processed last.
    Ok(root.unwrap_or(ObjectId::NULL))
}

/// Everything before the last `/`, or empty for a bare name.
fn dirname(path: &BStr) -> &BStr {
    match path.rfind_byte(b'/') {
        Some(pos) => path[..pos].as_bstr(),
        None => BStr::new(""),
    }
}

/// Everything after the last `/`.
fn basename(path: &BStr) -> &BStr {
    match path.rfind_byte(b'/') {
        Some(pos) => path[pos + 1..].as_bstr(),
        None => path,
    }
}
