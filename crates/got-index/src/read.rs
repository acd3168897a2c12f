//! Index file reading (version 2 only).

use bstr::{BString, ByteSlice};
use got_hash::ObjectId;

use crate::entry::{IndexEntry, ModeType, StatData};
use crate::{Index, IndexError, Stage};

/// Magic bytes at the start of every index file.
const INDEX_SIGNATURE: &[u8; 4] = b"DIRC";

/// Fixed bytes per entry before the path.
const ENTRY_FIXED_LEN: usize = 62;

/// Name-length field saturation value.
const NAME_LEN_MAX: usize = 0xFFF;

/// Parse an index file from raw bytes.
///
/// Anything after the declared entries — extensions or a checksum trailer
/// a compatible producer may have added — is tolerated and not verified.
pub fn parse_index(data: &[u8]) -> Result<Index, IndexError> {
    if data.len() < 12 {
        return Err(IndexError::InvalidHeader("index file too short".into()));
    }

    if &data[..4] != INDEX_SIGNATURE {
        return Err(IndexError::InvalidHeader(format!(
            "bad signature: expected DIRC, got {:?}",
            &data[..4]
        )));
    }

    let version = read_u32(&data[4..]);
    if version != 2 {
        return Err(IndexError::UnsupportedVersion(version));
    }

    let entry_count = read_u32(&data[8..]) as usize;

    let mut index = Index::new();
    let mut cursor = 12;

    for _ in 0..entry_count {
        let (entry, next) = parse_entry(data, cursor)?;
        index.push_parsed(entry);
        cursor = next;
    }

    Ok(index)
}

fn parse_entry(data: &[u8], start: usize) -> Result<(IndexEntry, usize), IndexError> {
    if start + ENTRY_FIXED_LEN > data.len() {
        return Err(IndexError::InvalidEntry {
            offset: start,
            reason: "entry too short".into(),
        });
    }

    let stat = StatData {
        ctime_secs: read_u32(&data[start..]),
        ctime_nsecs: read_u32(&data[start + 4..]),
        mtime_secs: read_u32(&data[start + 8..]),
        mtime_nsecs: read_u32(&data[start + 12..]),
        dev: read_u32(&data[start + 16..]),
        ino: read_u32(&data[start + 20..]),
        uid: read_u32(&data[start + 28..]),
        gid: read_u32(&data[start + 32..]),
        size: read_u32(&data[start + 36..]),
    };

    // Bytes 24–25 are unused; the mode word is the following two bytes.
    let mode = read_u16(&data[start + 26..]);
    let mode_type = ModeType::from_bits(mode >> 12).map_err(|_| IndexError::InvalidEntry {
        offset: start,
        reason: format!("invalid mode type: {:#06b}", mode >> 12),
    })?;
    let mode_perms = mode & 0o777;

    let id = ObjectId::from_bytes(&data[start + 40..start + 60]).map_err(|_| {
        IndexError::InvalidEntry {
            offset: start,
            reason: "invalid object id".into(),
        }
    })?;

    let flags = read_u16(&data[start + 60..]);
    let assume_valid = (flags & 0x8000) != 0;
    if (flags & 0x4000) != 0 {
        return Err(IndexError::UnsupportedFeature(
            "extended entry flag set".into(),
        ));
    }
    let stage = Stage::from_bits(((flags >> 12) & 0b11) as u8);
    let name_len_field = (flags & 0x0FFF) as usize;

    let name_start = start + ENTRY_FIXED_LEN;
    let name_len = if name_len_field < NAME_LEN_MAX {
        // The length field is authoritative; the terminator must agree.
        if name_start + name_len_field >= data.len()
            || data[name_start + name_len_field] != 0
        {
            return Err(IndexError::InvalidEntry {
                offset: start,
                reason: "name length does not match terminator".into(),
            });
        }
        name_len_field
    } else {
        // Saturated: the terminating NUL delimits the name.
        data[name_start..]
            .find_byte(0)
            .ok_or_else(|| IndexError::InvalidEntry {
                offset: start,
                reason: "unterminated long name".into(),
            })?
    };

    let name = &data[name_start..name_start + name_len];
    if name.contains(&0) {
        return Err(IndexError::InvalidEntry {
            offset: start,
            reason: "NUL byte inside name".into(),
        });
    }

    // Entry length is padded with NULs to a multiple of 8, measured from
    // the entry start.
    let consumed = ENTRY_FIXED_LEN + name_len + 1;
    let padded = (consumed + 7) & !7;
    let next = start + padded;
    if next > data.len() {
        return Err(IndexError::InvalidEntry {
            offset: start,
            reason: "entry padding exceeds file".into(),
        });
    }

    let entry = IndexEntry {
        path: BString::from(name),
        id,
        mode_type,
        mode_perms,
        stage,
        assume_valid,
        stat,
    };

    Ok((entry, next))
}

pub(crate) fn read_u32(data: &[u8]) -> u32 {
    u32::from_be_bytes([data[0], data[1], data[2], data[3]])
}

pub(crate) fn read_u16(data: &[u8]) -> u16 {
    u16::from_be_bytes([data[0], data[1]])
}
