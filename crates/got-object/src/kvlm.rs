//! Key-value list with message: the header format shared by commits and
//! tags.
//!
//! A KVLM is a run of `key SP value LF` header lines followed by a blank
//! line and a free-form byte message. A value continues onto the next line
//! when that line starts with a space; the space is stripped on parse and
//! reintroduced on serialize, so the LF itself survives the round trip.
//! A key appearing more than once folds into one value with `\n` between
//! the occurrences, in first-occurrence order.

use bstr::{BStr, BString, ByteSlice};

use crate::ObjectError;

/// An insertion-ordered key/value list plus trailing message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Kvlm {
    pairs: Vec<(BString, BString)>,
    pub message: BString,
}

impl Kvlm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the folded value for `key`.
    pub fn get(&self, key: &str) -> Option<&BStr> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_bstr())
    }

    /// Whether `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Append a value under `key`: a fresh key is inserted at the end, a
    /// repeated key folds onto the existing value with a `\n` separator.
    pub fn append(&mut self, key: impl Into<BString>, value: impl Into<BString>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => {
                existing.push(b'\n');
                existing.extend_from_slice(&value);
            }
            None => self.pairs.push((key, value)),
        }
    }

    /// Replace the value under `key`, inserting it at the end if absent.
    pub fn set(&mut self, key: impl Into<BString>, value: impl Into<BString>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.pairs.push((key, value)),
        }
    }

    /// Keys in first-occurrence order.
    pub fn keys(&self) -> impl Iterator<Item = &BStr> {
        self.pairs.iter().map(|(k, _)| k.as_bstr())
    }

    /// Parse a KVLM from raw payload bytes.
    pub fn parse(raw: &[u8]) -> Result<Self, ObjectError> {
        let mut kvlm = Self::new();
        let mut pos = 0;

        while pos < raw.len() {
            // A blank line ends the headers; the rest is the message.
            if raw[pos] == b'\n' {
                kvlm.message = BString::from(&raw[pos + 1..]);
                return Ok(kvlm);
            }

            let line_end = raw[pos..]
                .find_byte(b'\n')
                .map(|p| p + pos)
                .unwrap_or(raw.len());

            let sp = raw[pos..line_end].find_byte(b' ').ok_or_else(|| {
                ObjectError::MalformedKvlm {
                    offset: pos,
                    reason: "header line has no space before newline".into(),
                }
            })?;
            let key = &raw[pos..pos + sp];

            // Extend over continuation lines: an LF followed by a space
            // belongs to this value.
            let mut end = line_end;
            while end < raw.len() && end + 1 < raw.len() && raw[end + 1] == b' ' {
                end = raw[end + 1..]
                    .find_byte(b'\n')
                    .map(|p| p + end + 1)
                    .unwrap_or(raw.len());
            }

            let folded = unfold(&raw[pos + sp + 1..end]);
            kvlm.append(BString::from(key), folded);

            pos = end + 1;
        }

        // No blank line: headers only, empty message.
        Ok(kvlm)
    }

    /// Serialize to payload bytes.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for (key, value) in &self.pairs {
            out.extend_from_slice(key);
            out.push(b' ');
            for (i, line) in value.split(|&b| b == b'\n').enumerate() {
                if i > 0 {
                    out.extend_from_slice(b"\n ");
                }
                out.extend_from_slice(line);
            }
            out.push(b'\n');
        }
        out.push(b'\n');
        out.extend_from_slice(&self.message);
        out
    }
}

/// Strip the space after each LF (the continuation marker).
fn unfold(raw: &[u8]) -> BString {
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        out.push(raw[i]);
        if raw[i] == b'\n' && i + 1 < raw.len() && raw[i + 1] == b' ' {
            i += 1; // skip the marker space
        }
        i += 1;
    }
    BString::from(out)
}
