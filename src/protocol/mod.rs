//! Wire messages handed to the transport.
//!
//! The engine emits one flat ordered list per reconciliation pass, grouped as
//! removals, then additions, then display-text updates, then latency updates.
//! Removals must precede additions so an entry whose appearance changed can be
//! re-announced under the same identity within one logical frame.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::Appearance;

/// Interaction mode advertised for an entry. Roster entries are display-only,
/// so the engine always announces them as [`EntryMode::Passive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryMode {
    Active,
    Passive,
    Spectator,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewerMessage {
    Remove {
        id: Uuid,
    },
    Add {
        id: Uuid,
        slot_name: String,
        latency: i64,
        mode: EntryMode,
        text: String,
        appearance: Appearance,
        /// Additions always carry the listed flag alongside the add action.
        listed: bool,
    },
    UpdateText {
        id: Uuid,
        text: String,
    },
    UpdateLatency {
        id: Uuid,
        latency: i64,
    },
    HeaderFooter {
        header: String,
        footer: String,
    },
}
