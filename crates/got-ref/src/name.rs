use std::fmt;

use crate::RefError;

/// A validated reference name: a relative path like `refs/heads/master`
/// or the special `HEAD`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RefName(String);

impl RefName {
    pub fn new(name: impl Into<String>) -> Result<Self, RefError> {
        let name = name.into();
        if name.is_empty() {
            return Err(RefError::InvalidName("empty name".into()));
        }
        if name.starts_with('/') || name.ends_with('/') {
            return Err(RefError::InvalidName(format!(
                "leading or trailing slash: {name}"
            )));
        }
        if name.contains('\0') {
            return Err(RefError::InvalidName("NUL byte in name".into()));
        }
        if name.split('/').any(|c| c.is_empty() || c == "." || c == "..") {
            return Err(RefError::InvalidName(format!(
                "dot or empty component: {name}"
            )));
        }
        if name.ends_with(".lock") {
            return Err(RefError::InvalidName(format!(
                "reserved .lock suffix: {name}"
            )));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The name of the branch a `refs/heads/…` ref denotes, if it is one.
    pub fn branch_name(&self) -> Option<&str> {
        self.0.strip_prefix("refs/heads/")
    }

    /// The name of the tag a `refs/tags/…` ref denotes, if it is one.
    pub fn tag_name(&self) -> Option<&str> {
        self.0.strip_prefix("refs/tags/")
    }
}

impl fmt::Display for RefName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for RefName {
    type Err = RefError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
