use std::fs;
use std::io::Read;

use flate2::read::ZlibDecoder;
use got_hash::ObjectId;
use got_object::{header, Object, ObjectKind};

use crate::{ObjectStore, OdbError};

impl ObjectStore {
    /// Whether an object exists.
    pub fn contains(&self, id: &ObjectId) -> bool {
        self.object_path(id).is_file()
    }

    /// Read an object by id.
    ///
    /// The decompressed envelope is validated in full: kind tag, decimal
    /// length, and length-equals-payload, before dispatching to the
    /// kind-specific parser.
    pub fn read(&self, id: &ObjectId) -> Result<Object, OdbError> {
        let path = self.object_path(id);
        let compressed = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(OdbError::NotFound(*id));
            }
            Err(e) => return Err(OdbError::Io(e)),
        };

        let envelope = decompress_all(&compressed, id)?;
        Ok(Object::parse(&envelope)?)
    }

    /// Read just `(kind, payload_size)` without decompressing the payload.
    pub fn read_header(&self, id: &ObjectId) -> Result<(ObjectKind, usize), OdbError> {
        let path = self.object_path(id);
        let compressed = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(OdbError::NotFound(*id));
            }
            Err(e) => return Err(OdbError::Io(e)),
        };

        // Decompress just enough for the header; envelopes start with at
        // most "commit " plus a decimal length, well under 64 bytes.
        let mut decoder = ZlibDecoder::new(&compressed[..]);
        let mut buf = [0u8; 64];
        let mut filled = 0;

        loop {
            if filled >= buf.len() {
                return Err(OdbError::Corrupt {
                    id: id.to_hex(),
                    reason: "header exceeds 64 bytes".into(),
                });
            }
            let n = decoder
                .read(&mut buf[filled..])
                .map_err(|e| OdbError::Decompress {
                    id: id.to_hex(),
                    source: e,
                })?;
            if n == 0 {
                return Err(OdbError::Corrupt {
                    id: id.to_hex(),
                    reason: "unexpected EOF before header terminator".into(),
                });
            }
            filled += n;
            if buf[..filled].contains(&0) {
                break;
            }
        }

        let (kind, size, _header_len) = header::parse_header(&buf[..filled])?;
        Ok((kind, size))
    }
}

/// Zlib-decompress the full contents of a loose object file.
fn decompress_all(compressed: &[u8], id: &ObjectId) -> Result<Vec<u8>, OdbError> {
    let mut decoder = ZlibDecoder::new(compressed);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| OdbError::Decompress {
            id: id.to_hex(),
            source: e,
        })?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use got_object::Blob;
    use std::io::Write;

    #[test]
    fn read_what_was_written() {
        let dir = tempfile::tempdir().unwrap();
        let store = ObjectStore::open(dir.path());

        let obj = Object::Blob(Blob::new(b"hello got".to_vec()));
        let id = store.write(&obj).unwrap();
        let read_back = store.read(&id).unwrap();
        assert_eq!(read_back, obj);
    }

    #[test]
    fn missing_object_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = ObjectStore::open(dir.path());
        let id = ObjectId::from_hex("da39a3ee5e6b4b0d3255bfef95601890afd80709").unwrap();
        assert!(matches!(
            store.read(&id).unwrap_err(),
            OdbError::NotFound(_)
        ));
    }

    #[test]
    fn header_only_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = ObjectStore::open(dir.path());
        let id = store.write_raw(ObjectKind::Blob, b"12345").unwrap();
        assert_eq!(store.read_header(&id).unwrap(), (ObjectKind::Blob, 5));
    }

    #[test]
    fn garbage_file_is_decompress_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = ObjectStore::open(dir.path());
        let id = ObjectId::from_hex("da39a3ee5e6b4b0d3255bfef95601890afd80709").unwrap();

        let path = store.object_path(&id);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(b"not zlib at all").unwrap();

        assert!(matches!(
            store.read(&id).unwrap_err(),
            OdbError::Decompress { .. }
        ));
    }

    #[test]
    fn length_mismatch_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let store = ObjectStore::open(dir.path());
        let id = ObjectId::from_hex("da39a3ee5e6b4b0d3255bfef95601890afd80709").unwrap();

        // A well-compressed envelope whose declared length lies.
        let path = store.object_path(&id);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let file = fs::File::create(&path).unwrap();
        let mut enc =
            flate2::write::ZlibEncoder::new(file, flate2::Compression::default());
        enc.write_all(b"blob 3\0toolong").unwrap();
        enc.finish().unwrap();

        assert!(matches!(
            store.read(&id).unwrap_err(),
            OdbError::Object(_)
        ));
    }
}
