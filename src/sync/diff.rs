//! Minimal-message diffing between the acknowledged snapshot and pending state.
//!
//! One pass classifies every touched index and emits messages in a fixed group
//! order: removals, additions, display-text updates, latency updates. The
//! remote protocol keys entries by identity derived partly from appearance, so
//! an appearance change is a removal of the old entry followed by a fresh
//! addition, and the removal group must come first so both land in the same
//! logical frame without flicker.
//!
//! Classification runs the items' refresh calls, so a diff pass is also the
//! moment provider-sourced values are re-read.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::trace;

use crate::cache::IdentityCache;
use crate::config::RosterConfig;
use crate::protocol::{EntryMode, ViewerMessage};
use crate::store::SlotStore;

pub struct DiffEngine {
    min_column_width: usize,
    max_column_width: Option<usize>,
    identities: Arc<IdentityCache>,
}

impl DiffEngine {
    pub fn new(config: &RosterConfig, identities: Arc<IdentityCache>) -> Self {
        Self {
            min_column_width: config.min_column_width,
            max_column_width: config.max_column_width,
            identities,
        }
    }

    pub fn identities(&self) -> &Arc<IdentityCache> {
        &self.identities
    }

    /// Compute the messages that reconcile the viewer from `before` to the
    /// current content of `after`, considering only `touched` indices.
    ///
    /// Items in `after` are refreshed as a side effect; `before` is read as-is.
    pub fn compute(
        &self,
        before: &SlotStore,
        after: &mut SlotStore,
        touched: &BTreeSet<usize>,
    ) -> Vec<ViewerMessage> {
        let mut removals = Vec::new();
        let mut additions = Vec::new();
        let mut text_updates = Vec::new();
        let mut latency_updates = Vec::new();

        for &index in touched {
            let prior = before.peek(index);
            let Some(item) = after.peek_mut(index) else {
                if let Some(old) = prior {
                    let identity = self.identities.resolve(old.appearance(), index);
                    removals.push(ViewerMessage::Remove { id: identity.id });
                }
                continue;
            };

            let (appearance_changed, text_changed, latency_changed) = match prior {
                None => (true, true, true),
                Some(old) => (
                    item.refresh_appearance() || old.appearance() != item.appearance(),
                    item.refresh_text() || old.text() != item.text(),
                    item.refresh_latency() || old.latency() != item.latency(),
                ),
            };

            if appearance_changed {
                if let Some(old) = prior {
                    let identity = self.identities.resolve(old.appearance(), index);
                    removals.push(ViewerMessage::Remove { id: identity.id });
                }
                let identity = self.identities.resolve(item.appearance(), index);
                additions.push(ViewerMessage::Add {
                    id: identity.id,
                    slot_name: identity.name,
                    latency: item.latency(),
                    mode: EntryMode::Passive,
                    text: self.clamp_text(item.text()),
                    appearance: item.appearance().clone(),
                    listed: true,
                });
                // the addition already carries the clamped text and latency
                continue;
            }
            if latency_changed {
                let identity = self.identities.resolve(item.appearance(), index);
                latency_updates.push(ViewerMessage::UpdateLatency {
                    id: identity.id,
                    latency: item.latency(),
                });
            }
            if text_changed {
                let identity = self.identities.resolve(item.appearance(), index);
                text_updates.push(ViewerMessage::UpdateText {
                    id: identity.id,
                    text: self.clamp_text(item.text()),
                });
            }
        }

        trace!(
            removals = removals.len(),
            additions = additions.len(),
            text_updates = text_updates.len(),
            latency_updates = latency_updates.len(),
            "computed roster diff"
        );

        let mut messages = removals;
        messages.append(&mut additions);
        messages.append(&mut text_updates);
        messages.append(&mut latency_updates);
        messages
    }

    /// Right-pad with spaces up to the minimum column width, then truncate from
    /// the end down to the maximum when one is set.
    fn clamp_text(&self, text: &str) -> String {
        let mut out = text.to_string();
        let mut len = out.chars().count();
        while len < self.min_column_width {
            out.push(' ');
            len += 1;
        }
        if let Some(max) = self.max_column_width {
            if len > max {
                out = out.chars().take(max).collect();
            }
        }
        out
    }
}
