use std::fs;

use got_hash::ObjectId;

use crate::{ObjectStore, OdbError};

impl ObjectStore {
    /// Enumerate ids matching a hex prefix of at least two characters.
    ///
    /// Lists the fan-out directory named by the first two characters and
    /// keeps entries whose file names extend the remainder. Candidates are
    /// returned sorted; an absent fan-out directory yields the empty set.
    pub fn enumerate_prefix(&self, prefix: &str) -> Result<Vec<ObjectId>, OdbError> {
        let prefix = prefix.to_ascii_lowercase();
        debug_assert!(prefix.len() >= 2);

        let fan = &prefix[..2];
        let remainder = &prefix[2..];

        let dir = self.objects_dir.join(fan);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(OdbError::Io(e)),
        };

        let mut matches = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with(remainder) {
                if let Ok(id) = ObjectId::from_hex(&format!("{fan}{name}")) {
                    matches.push(id);
                }
            }
        }

        matches.sort();
        Ok(matches)
    }
}
