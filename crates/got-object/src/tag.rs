use bstr::{BStr, BString, ByteSlice};
use got_hash::ObjectId;
use got_utils::Signature;

use crate::{Kvlm, ObjectError, ObjectKind};

/// An annotated tag: a [`Kvlm`] carrying `object`, `type`, `tag`, and
/// usually `tagger`, plus a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    kvlm: Kvlm,
}

impl Tag {
    /// Parse tag payload bytes.
    pub fn parse(payload: &[u8]) -> Result<Self, ObjectError> {
        Ok(Self {
            kvlm: Kvlm::parse(payload)?,
        })
    }

    /// Build a tag from its parts, in canonical header order.
    pub fn new(
        target: ObjectId,
        target_kind: ObjectKind,
        name: impl Into<BString>,
        tagger: &Signature,
        message: impl Into<BString>,
    ) -> Self {
        let mut kvlm = Kvlm::new();
        kvlm.append("object", target.to_hex());
        kvlm.append("type", BString::from(target_kind.as_bytes()));
        kvlm.append("tag", name);
        kvlm.append("tagger", tagger.to_bytes());
        kvlm.message = message.into();
        Self { kvlm }
    }

    /// Serialize to payload bytes.
    pub fn serialize_payload(&self) -> Vec<u8> {
        self.kvlm.serialize()
    }

    /// The id of the tagged object.
    pub fn target(&self) -> Result<ObjectId, ObjectError> {
        let value = self
            .kvlm
            .get("object")
            .ok_or(ObjectError::MissingHeader { field: "object" })?;
        let hex = std::str::from_utf8(value.as_bytes()).map_err(|_| {
            ObjectError::InvalidField {
                field: "object",
                reason: "non-UTF-8 id".into(),
            }
        })?;
        ObjectId::from_hex(hex.trim()).map_err(|e| ObjectError::InvalidField {
            field: "object",
            reason: e.to_string(),
        })
    }

    /// The kind of the tagged object.
    pub fn target_kind(&self) -> Result<ObjectKind, ObjectError> {
        let value = self
            .kvlm
            .get("type")
            .ok_or(ObjectError::MissingHeader { field: "type" })?;
        ObjectKind::from_bytes(value.as_bytes())
    }

    /// The tag name.
    pub fn name(&self) -> Result<&BStr, ObjectError> {
        self.kvlm
            .get("tag")
            .ok_or(ObjectError::MissingHeader { field: "tag" })
    }

    /// The tagger signature, when present.
    pub fn tagger(&self) -> Result<Option<Signature>, ObjectError> {
        match self.kvlm.get("tagger") {
            None => Ok(None),
            Some(value) => Signature::parse(value)
                .map(Some)
                .map_err(|e| ObjectError::InvalidField {
                    field: "tagger",
                    reason: e.to_string(),
                }),
        }
    }

    /// The tag message.
    pub fn message(&self) -> &BStr {
        self.kvlm.message.as_bstr()
    }

    /// Access the underlying KVLM.
    pub fn kvlm(&self) -> &Kvlm {
        &self.kvlm
    }
}
