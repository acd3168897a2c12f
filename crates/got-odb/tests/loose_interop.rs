//! On-disk compatibility of the loose object store.

use std::io::Read;

use got_object::{Blob, Object, ObjectKind};
use got_odb::ObjectStore;

/// The canonical tool's id for this exact payload (`git hash-object`).
const SAMPLE_PAYLOAD: &[u8] = b"Hello, World!\nThis is a test file for got.";
const SAMPLE_ID: &str = "4d1f1736b7c28f8f2b94b50cbc54c39a7009078f";

#[test]
fn blob_hash_matches_canonical_tool() {
    let id = ObjectStore::hash(ObjectKind::Blob, SAMPLE_PAYLOAD).unwrap();
    assert_eq!(id.to_hex(), SAMPLE_ID);
}

#[test]
fn written_file_is_zlib_of_envelope() {
    let dir = tempfile::tempdir().unwrap();
    let store = ObjectStore::open(dir.path());

    let id = store.write_raw(ObjectKind::Blob, SAMPLE_PAYLOAD).unwrap();
    assert_eq!(id.to_hex(), SAMPLE_ID);

    let path = store.object_path(&id);
    assert!(path.ends_with(format!("{}/{}", &SAMPLE_ID[..2], &SAMPLE_ID[2..])));

    let compressed = std::fs::read(path).unwrap();
    let mut decoder = flate2::read::ZlibDecoder::new(compressed.as_slice());
    let mut envelope = Vec::new();
    decoder.read_to_end(&mut envelope).unwrap();

    let mut expected = format!("blob {}\0", SAMPLE_PAYLOAD.len()).into_bytes();
    expected.extend_from_slice(SAMPLE_PAYLOAD);
    assert_eq!(envelope, expected);
}

#[test]
fn read_yields_serialized_bytes_back() {
    let dir = tempfile::tempdir().unwrap();
    let store = ObjectStore::open(dir.path());

    let obj = Object::Blob(Blob::new(SAMPLE_PAYLOAD.to_vec()));
    let id = store.write(&obj).unwrap();

    let read_back = store.read(&id).unwrap();
    assert_eq!(read_back.serialize(), obj.serialize());
    assert_eq!(read_back.id().unwrap(), id);
}

#[test]
fn all_four_kinds_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let store = ObjectStore::open(dir.path());

    let blob_id = store.write_raw(ObjectKind::Blob, b"content").unwrap();

    let mut tree_payload = Vec::new();
    tree_payload.extend_from_slice(b"100644 f\0");
    tree_payload.extend_from_slice(blob_id.as_bytes());
    let tree_id = store.write_raw(ObjectKind::Tree, &tree_payload).unwrap();

    let commit_payload = format!(
        "tree {}\nauthor A <a@b> 1 +0000\ncommitter A <a@b> 1 +0000\n\nm\n",
        tree_id.to_hex()
    );
    let commit_id = store
        .write_raw(ObjectKind::Commit, commit_payload.as_bytes())
        .unwrap();

    let tag_payload = format!(
        "object {}\ntype commit\ntag v1\ntagger A <a@b> 1 +0000\n\nm\n",
        commit_id.to_hex()
    );
    let tag_id = store
        .write_raw(ObjectKind::Tag, tag_payload.as_bytes())
        .unwrap();

    assert_eq!(store.read(&blob_id).unwrap().kind(), ObjectKind::Blob);
    assert_eq!(store.read(&tree_id).unwrap().kind(), ObjectKind::Tree);
    assert_eq!(store.read(&commit_id).unwrap().kind(), ObjectKind::Commit);
    assert_eq!(store.read(&tag_id).unwrap().kind(), ObjectKind::Tag);
}

#[test]
fn header_read_reports_kind_and_size() {
    let dir = tempfile::tempdir().unwrap();
    let store = ObjectStore::open(dir.path());
    let id = store.write_raw(ObjectKind::Blob, SAMPLE_PAYLOAD).unwrap();
    assert_eq!(
        store.read_header(&id).unwrap(),
        (ObjectKind::Blob, SAMPLE_PAYLOAD.len())
    );
}
