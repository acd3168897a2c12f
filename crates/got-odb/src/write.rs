use std::fs;
use std::io::Write;
use std::path::Path;

use flate2::write::ZlibEncoder;
use got_hash::hasher::Hasher;
use got_hash::ObjectId;
use got_object::{header, Object, ObjectKind};

use crate::{ObjectStore, OdbError};

impl ObjectStore {
    /// Write an object. Returns its id.
    ///
    /// Idempotent: an object that already exists is never rewritten.
    pub fn write(&self, obj: &Object) -> Result<ObjectId, OdbError> {
        let payload = obj.serialize_payload();
        self.write_raw(obj.kind(), &payload)
    }

    /// Write raw payload bytes under a known kind. Returns the id.
    ///
    /// The id is computed first; if the target file exists the write is a
    /// no-op. Otherwise the compressed envelope goes to a temp file in the
    /// objects directory and is renamed into place, so a partial write
    /// never lands at the final path.
    pub fn write_raw(&self, kind: ObjectKind, payload: &[u8]) -> Result<ObjectId, OdbError> {
        let hdr = header::write_header(kind, payload.len());

        let id = {
            let mut hasher = Hasher::new();
            hasher.update(&hdr);
            hasher.update(payload);
            hasher.finalize()?
        };

        if self.contains(&id) {
            return Ok(id);
        }

        let final_path = self.object_path(&id);
        if let Some(parent) = final_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = compress_to_temp(&self.objects_dir, &hdr, payload, self.compression)?;
        finalize_object(&tmp_path, &final_path)?;

        Ok(id)
    }

    /// Hash payload bytes without writing anything.
    pub fn hash(kind: ObjectKind, payload: &[u8]) -> Result<ObjectId, OdbError> {
        Ok(Hasher::hash_object(kind.as_str(), payload)?)
    }
}

/// Compress header + payload into a temp file under `objects_dir`, so the
/// final rename stays on one filesystem.
fn compress_to_temp(
    objects_dir: &Path,
    hdr: &[u8],
    payload: &[u8],
    level: flate2::Compression,
) -> Result<std::path::PathBuf, OdbError> {
    let tmp_path = objects_dir.join(format!(
        "tmp_obj_{}",
        std::process::id()
            ^ std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .subsec_nanos()
    ));

    let file = fs::File::create(&tmp_path)?;
    let mut encoder = ZlibEncoder::new(file, level);
    encoder.write_all(hdr)?;
    encoder.write_all(payload)?;
    encoder.finish()?;

    Ok(tmp_path)
}

/// Move a temp file to its final path.
///
/// Losing the rename race to another writer is success: both sides produced
/// identical bytes for the same id.
fn finalize_object(tmp: &Path, final_path: &Path) -> Result<(), OdbError> {
    match fs::rename(tmp, final_path) {
        Ok(()) => Ok(()),
        Err(_) if final_path.exists() => {
            let _ = fs::remove_file(tmp);
            Ok(())
        }
        Err(e) => {
            let _ = fs::remove_file(tmp);
            Err(OdbError::Io(e))
        }
    }
}
