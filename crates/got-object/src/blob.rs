use bstr::BString;

/// A blob: an opaque byte payload with no internal structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub data: BString,
}

impl Blob {
    pub fn new(data: impl Into<BString>) -> Self {
        Self { data: data.into() }
    }

    /// Parse payload bytes. Cannot fail: every byte string is a blob.
    pub fn parse(payload: &[u8]) -> Self {
        Self {
            data: BString::from(payload),
        }
    }
}
