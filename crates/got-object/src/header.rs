//! The object envelope header: `"<kind> <decimal-len>\0"`.

use crate::{ObjectError, ObjectKind};

/// Parse an envelope header from raw bytes.
///
/// Returns `(kind, payload_size, header_length)` where `header_length`
/// includes the NUL terminator. The length field is strict ASCII decimal
/// with no leading zeros (a bare `"0"` is the only length starting with
/// zero).
pub fn parse_header(data: &[u8]) -> Result<(ObjectKind, usize, usize), ObjectError> {
    let space_pos = data
        .iter()
        .position(|&b| b == b' ')
        .ok_or_else(|| ObjectError::InvalidHeader("missing space after kind".into()))?;

    let kind = ObjectKind::from_bytes(&data[..space_pos])?;

    let null_pos = data[space_pos..]
        .iter()
        .position(|&b| b == 0)
        .map(|p| p + space_pos)
        .ok_or_else(|| ObjectError::InvalidHeader("missing null terminator".into()))?;

    let size_bytes = &data[space_pos + 1..null_pos];
    if size_bytes.is_empty() {
        return Err(ObjectError::InvalidHeader("empty length field".into()));
    }
    if size_bytes[0] == b'0' && size_bytes.len() > 1 {
        return Err(ObjectError::InvalidHeader(
            "length has a leading zero".into(),
        ));
    }
    if !size_bytes.iter().all(|b| b.is_ascii_digit()) {
        return Err(ObjectError::InvalidHeader(format!(
            "non-decimal length: {}",
            String::from_utf8_lossy(size_bytes)
        )));
    }

    // All digits, so from_utf8 cannot fail.
    let size: usize = std::str::from_utf8(size_bytes)
        .unwrap_or("")
        .parse()
        .map_err(|_| {
            ObjectError::InvalidHeader(format!(
                "length out of range: {}",
                String::from_utf8_lossy(size_bytes)
            ))
        })?;

    Ok((kind, size, null_pos + 1))
}

/// Write an envelope header: `"<kind> <len>\0"`.
pub fn write_header(kind: ObjectKind, payload_size: usize) -> Vec<u8> {
    format!("{} {}\0", kind, payload_size).into_bytes()
}
