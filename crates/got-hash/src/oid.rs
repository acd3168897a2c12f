use std::fmt;
use std::str::FromStr;

use crate::hex::{hex_decode, hex_to_string};
use crate::HashError;

/// The number of raw bytes in an object id.
pub const RAW_LEN: usize = 20;

/// The number of hex characters in an object id.
pub const HEX_LEN: usize = 40;

/// A got object identifier — the SHA-1 of an object's envelope.
///
/// Exactly 20 raw bytes; the textual form is 40 lowercase hex characters.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; RAW_LEN]);

impl ObjectId {
    /// The null id (all zeros).
    pub const NULL: Self = Self([0u8; RAW_LEN]);

    /// Create from exactly 20 raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HashError> {
        if bytes.len() != RAW_LEN {
            return Err(HashError::InvalidHashLength {
                expected: RAW_LEN,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; RAW_LEN];
        arr.copy_from_slice(bytes);
        Ok(Self(arr))
    }

    /// Create from a 40-character hex string (case-insensitive).
    pub fn from_hex(hex: &str) -> Result<Self, HashError> {
        if hex.len() != HEX_LEN {
            return Err(HashError::InvalidHexLength {
                expected: HEX_LEN,
                actual: hex.len(),
            });
        }
        let mut bytes = [0u8; RAW_LEN];
        hex_decode(hex, &mut bytes)?;
        Ok(Self(bytes))
    }

    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The 40-character lowercase hex form.
    pub fn to_hex(&self) -> String {
        hex_to_string(&self.0)
    }

    /// Whether this is the all-zeros id.
    pub fn is_null(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    /// Whether the hex form starts with the given prefix (case-insensitive).
    pub fn starts_with_hex(&self, prefix: &str) -> bool {
        self.to_hex().starts_with(&prefix.to_ascii_lowercase())
    }

    /// The loose-object path component: `"aa/bbbb…"`.
    pub fn loose_path(&self) -> String {
        let hex = self.to_hex();
        format!("{}/{}", &hex[..2], &hex[2..])
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", &self.to_hex()[..8])
    }
}

impl FromStr for ObjectId {
    type Err = HashError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SAMPLE: &str = "da39a3ee5e6b4b0d3255bfef95601890afd80709";

    #[test]
    fn from_hex_roundtrip() {
        let oid = ObjectId::from_hex(SAMPLE).unwrap();
        assert_eq!(oid.to_hex(), SAMPLE);
        assert_eq!(oid.to_hex().len(), 40);
    }

    #[test]
    fn from_bytes_roundtrip() {
        let oid = ObjectId::from_hex(SAMPLE).unwrap();
        let again = ObjectId::from_bytes(oid.as_bytes()).unwrap();
        assert_eq!(oid, again);
    }

    #[test]
    fn from_bytes_wrong_length() {
        let err = ObjectId::from_bytes(&[0; 10]).unwrap_err();
        assert!(matches!(
            err,
            HashError::InvalidHashLength {
                expected: 20,
                actual: 10
            }
        ));
    }

    #[test]
    fn from_hex_wrong_length() {
        assert!(matches!(
            ObjectId::from_hex("abcd").unwrap_err(),
            HashError::InvalidHexLength { .. }
        ));
    }

    #[test]
    fn from_hex_bad_character() {
        let err =
            ObjectId::from_hex("zzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzz").unwrap_err();
        assert!(matches!(err, HashError::InvalidHex { .. }));
    }

    #[test]
    fn uppercase_accepted() {
        let upper = ObjectId::from_hex(&SAMPLE.to_ascii_uppercase()).unwrap();
        assert_eq!(upper.to_hex(), SAMPLE);
    }

    #[test]
    fn display_and_parse() {
        let oid = ObjectId::from_hex(SAMPLE).unwrap();
        let parsed: ObjectId = oid.to_string().parse().unwrap();
        assert_eq!(parsed, oid);
    }

    #[test]
    fn debug_is_short() {
        let oid = ObjectId::from_hex(SAMPLE).unwrap();
        assert_eq!(format!("{oid:?}"), "ObjectId(da39a3ee)");
    }

    #[test]
    fn usable_as_map_key() {
        let oid = ObjectId::from_hex(SAMPLE).unwrap();
        let mut map = HashMap::new();
        map.insert(oid, "value");
        assert_eq!(map.get(&oid), Some(&"value"));
    }

    #[test]
    fn ordering() {
        let a = ObjectId::from_hex("0000000000000000000000000000000000000001").unwrap();
        let b = ObjectId::from_hex("0000000000000000000000000000000000000002").unwrap();
        assert!(a < b);
    }

    #[test]
    fn null_id() {
        assert!(ObjectId::NULL.is_null());
        assert!(!ObjectId::from_hex(SAMPLE).unwrap().is_null());
    }

    #[test]
    fn prefix_check() {
        let oid = ObjectId::from_hex(SAMPLE).unwrap();
        assert!(oid.starts_with_hex("da39"));
        assert!(oid.starts_with_hex("DA39"));
        assert!(!oid.starts_with_hex("abcd"));
    }

    #[test]
    fn loose_path_splits_after_two() {
        let oid = ObjectId::from_hex(SAMPLE).unwrap();
        assert_eq!(oid.loose_path(), format!("da/{}", &SAMPLE[2..]));
    }
}
