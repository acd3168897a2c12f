use std::fs;

use got_hash::ObjectId;

use crate::{ObjectStore, OdbError};

impl ObjectStore {
    /// Enumerate every object id in the store.
    ///
    /// Walks the two-character fan-out directories; files whose names do
    /// not form a valid id (temp files, stray droppings) are skipped.
    pub fn iter(&self) -> Result<Vec<ObjectId>, OdbError> {
        let mut ids = Vec::new();

        let top = match fs::read_dir(&self.objects_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(ids),
            Err(e) => return Err(OdbError::Io(e)),
        };

        for entry in top {
            let entry = entry?;
            let fan_name = entry.file_name();
            let fan = fan_name.to_string_lossy();
            if fan.len() != 2 || !fan.bytes().all(|b| b.is_ascii_hexdigit()) {
                continue;
            }
            if !entry.path().is_dir() {
                continue;
            }

            for obj in fs::read_dir(entry.path())? {
                let obj = obj?;
                let rest = obj.file_name();
                let rest = rest.to_string_lossy();
                if let Ok(id) = ObjectId::from_hex(&format!("{fan}{rest}")) {
                    ids.push(id);
                }
            }
        }

        ids.sort();
        Ok(ids)
    }
}
