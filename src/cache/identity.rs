//! Deterministic synthetic identities for roster entries.
//!
//! The remote protocol addresses entries by identity, and the viewer sorts
//! entries by identity name. Each identity's name starts with a zero-padded
//! slot prefix, so entries render in slot order, and its UUID is derived (v5)
//! from the name bytes, so the same (appearance, slot) pair always resolves to
//! the same identity without regenerating anything remote-side.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::Appearance;

/// Fixed suffix appended to every identity name after the slot prefix.
pub const IDENTITY_NAME_SUFFIX: &str = "|roster";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub name: String,
}

/// Shared cache of (appearance, slot index) -> [`Identity`].
///
/// Entries are created lazily on first resolution and never evicted, so the
/// cache grows with the number of distinct (appearance, slot) pairs it has
/// seen. Long-lived processes that churn appearances should call [`clear`]
/// periodically.
///
/// One cache instance is meant to be shared across every roster in the
/// process (wrap it in an `Arc`); the interior mutex makes concurrent
/// resolution safe.
///
/// [`clear`]: IdentityCache::clear
#[derive(Debug, Default)]
pub struct IdentityCache {
    entries: Mutex<HashMap<(Appearance, usize), Identity>>,
}

impl IdentityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the identity for `(appearance, index)`, synthesizing and caching
    /// one on first need.
    pub fn resolve(&self, appearance: &Appearance, index: usize) -> Identity {
        let mut entries = self.entries.lock().unwrap();
        entries
            .entry((appearance.clone(), index))
            .or_insert_with(|| {
                let name = format!("{index:03}{IDENTITY_NAME_SUFFIX}");
                let id = Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes());
                Identity { id, name }
            })
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }
}
