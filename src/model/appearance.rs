use serde::{Deserialize, Serialize};

/// Opaque visual identity of a roster entry: a (value, signature) pair supplied
/// by the embedding system. Equality and ordering are defined on the pair, never
/// on object identity, so the same appearance rendered in different slots keys
/// the same cache rows.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Appearance {
    value: String,
    signature: String,
}

impl Appearance {
    pub fn new(value: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            signature: signature.into(),
        }
    }

    /// An appearance with empty payload, used for entries that have no
    /// provider-sourced look.
    pub fn blank() -> Self {
        Self::new("", "")
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }
}
