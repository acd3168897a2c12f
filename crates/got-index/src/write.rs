//! Index file writing.

use std::io::Write;
use std::path::Path;

use got_hash::hasher::Hasher;
use got_utils::LockFile;

use crate::entry::IndexEntry;
use crate::{Index, IndexError};

const INDEX_SIGNATURE: &[u8; 4] = b"DIRC";

/// Write the index atomically through a lock file.
pub fn write_index(index: &Index, path: &Path) -> Result<(), IndexError> {
    let mut lock =
        LockFile::acquire(path).map_err(|e| IndexError::LockFailed(e.to_string()))?;

    let data = serialize_index(index)?;
    lock.write_all(&data)?;
    lock.commit()
        .map_err(|e| IndexError::LockFailed(e.to_string()))?;

    Ok(())
}

/// Serialize the index to bytes: header, entries in order, then a SHA-1
/// trailer over the body. Readers of this format never verify the trailer,
/// but the canonical tool writes one, so we do too.
pub fn serialize_index(index: &Index) -> Result<Vec<u8>, IndexError> {
    let mut buf = Vec::new();

    buf.extend_from_slice(INDEX_SIGNATURE);
    buf.extend_from_slice(&2u32.to_be_bytes());
    buf.extend_from_slice(&(index.len() as u32).to_be_bytes());

    for entry in index.iter() {
        write_entry(&mut buf, entry);
    }

    let checksum = Hasher::digest(&buf)
        .map_err(|_| IndexError::InvalidHeader("checksum computation failed".into()))?;
    buf.extend_from_slice(checksum.as_bytes());

    Ok(buf)
}

fn write_entry(buf: &mut Vec<u8>, entry: &IndexEntry) {
    let entry_start = buf.len();

    buf.extend_from_slice(&entry.stat.ctime_secs.to_be_bytes());
    buf.extend_from_slice(&entry.stat.ctime_nsecs.to_be_bytes());
    buf.extend_from_slice(&entry.stat.mtime_secs.to_be_bytes());
    buf.extend_from_slice(&entry.stat.mtime_nsecs.to_be_bytes());
    buf.extend_from_slice(&entry.stat.dev.to_be_bytes());
    buf.extend_from_slice(&entry.stat.ino.to_be_bytes());

    // Two unused bytes, then the 16-bit mode word.
    buf.extend_from_slice(&[0, 0]);
    buf.extend_from_slice(&entry.mode_word().to_be_bytes());

    buf.extend_from_slice(&entry.stat.uid.to_be_bytes());
    buf.extend_from_slice(&entry.stat.gid.to_be_bytes());
    buf.extend_from_slice(&entry.stat.size.to_be_bytes());

    buf.extend_from_slice(entry.id.as_bytes());

    // Flags: assume-valid, stage, saturated name length. The extended bit
    // is never set in version 2.
    let name_len = std::cmp::min(entry.path.len(), 0xFFF) as u16;
    let mut flags: u16 = name_len;
    flags |= u16::from(entry.stage.as_u8()) << 12;
    if entry.assume_valid {
        flags |= 0x8000;
    }
    buf.extend_from_slice(&flags.to_be_bytes());

    buf.extend_from_slice(&entry.path);
    buf.push(0);

    // Zero-pad to a multiple of 8 measured from the entry start.
    while (buf.len() - entry_start) % 8 != 0 {
        buf.push(0);
    }
}
