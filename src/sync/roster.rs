//! The roster facade: slot mutations, immediate vs. batched reconciliation,
//! and delivery to the viewer transport.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use crate::cache::IdentityCache;
use crate::config::RosterConfig;
use crate::error::RosterError;
use crate::model::{RosterItem, content_eq};
use crate::store::SlotStore;
use crate::sync::diff::DiffEngine;
use crate::transport::ViewerTransport;

/// A bounded grid of display slots mirrored to one remote viewer.
///
/// The store holds pending (local desired) state; `acknowledged` is a value
/// snapshot of the state last reconciled with the viewer. In immediate mode
/// every mutation triggers a diff pass over the touched slots; with batching
/// enabled, mutations only accumulate until [`commit`] runs one pass over the
/// whole roster, or [`reset`] discards pending work.
///
/// Designed for single-threaded, synchronous use: one roster per viewer,
/// driven from that viewer's own sequential task. The [`IdentityCache`] is the
/// only cross-roster state and is safe to share.
///
/// [`commit`]: Roster::commit
/// [`reset`]: Roster::reset
pub struct Roster {
    store: SlotStore,
    acknowledged: SlotStore,
    touched: BTreeSet<usize>,
    batching: bool,
    engine: DiffEngine,
    transport: Arc<dyn ViewerTransport>,
}

impl Roster {
    pub fn new(
        config: RosterConfig,
        identities: Arc<IdentityCache>,
        transport: Arc<dyn ViewerTransport>,
    ) -> Result<Self, RosterError> {
        config.validate()?;
        Ok(Self {
            store: SlotStore::new(config.capacity),
            acknowledged: SlotStore::new(config.capacity),
            touched: BTreeSet::new(),
            batching: false,
            engine: DiffEngine::new(&config, identities),
            transport,
        })
    }

    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    /// Number of occupied slots in pending state.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn batch_enabled(&self) -> bool {
        self.batching
    }

    pub fn get(&self, index: usize) -> Result<Option<&dyn RosterItem>, RosterError> {
        self.store.get(index)
    }

    pub fn contains(&self, index: usize) -> Result<bool, RosterError> {
        self.store.contains(index)
    }

    pub fn next_free_index(&self) -> Option<usize> {
        self.store.next_free_index()
    }

    /// Toggle deferred-apply mode.
    ///
    /// Enabling records the current state as the reconciliation baseline.
    /// Disabling clears batch tracking without emitting a diff: uncommitted
    /// pending edits become the new local truth and the viewer stays out of
    /// sync for those slots until something touches them again. Callers that
    /// need the viewer reconciled must [`commit`](Roster::commit) first.
    pub fn set_batch_enabled(&mut self, enabled: bool) {
        if self.batching == enabled {
            return;
        }
        self.batching = enabled;
        self.touched.clear();
        self.acknowledged = self.store.snapshot();
        debug!(enabled, "roster batching toggled");
    }

    /// Place `item` at `index`, returning the previous occupant.
    pub fn set(
        &mut self,
        index: usize,
        item: Box<dyn RosterItem>,
    ) -> Result<Option<Box<dyn RosterItem>>, RosterError> {
        let previous = self.store.set(index, item)?;
        self.apply([index])?;
        Ok(previous)
    }

    /// Place `item` in the first free slot, returning its index.
    pub fn push(&mut self, item: Box<dyn RosterItem>) -> Result<usize, RosterError> {
        let index = self.store.next_free_index().ok_or(RosterError::Full)?;
        self.store.set(index, item)?;
        self.apply([index])?;
        Ok(index)
    }

    /// Insert at `index`, shifting the contiguous occupied run above it up by
    /// one slot (see [`SlotStore::insert_shifting`] for the overflow rule).
    pub fn insert(&mut self, index: usize, item: Box<dyn RosterItem>) -> Result<(), RosterError> {
        let touched = self.store.insert_shifting(index, item)?;
        self.apply(touched)
    }

    /// Clear `index`, returning the removed occupant.
    pub fn remove(&mut self, index: usize) -> Result<Option<Box<dyn RosterItem>>, RosterError> {
        let removed = self.store.remove(index)?;
        self.apply([index])?;
        Ok(removed)
    }

    /// Remove every occupant content-equal to `item`, returning how many slots
    /// were cleared.
    pub fn remove_matching(&mut self, item: &dyn RosterItem) -> Result<usize, RosterError> {
        let matching: Vec<usize> = self
            .store
            .indices()
            .filter(|&index| {
                self.store
                    .peek(index)
                    .is_some_and(|occupant| content_eq(occupant, item))
            })
            .collect();
        for &index in &matching {
            self.store.remove(index)?;
        }
        let count = matching.len();
        self.apply(matching)?;
        Ok(count)
    }

    /// Apply every (index, occupant-or-empty) pair in one logical mutation.
    pub fn replace_many(
        &mut self,
        entries: impl IntoIterator<Item = (usize, Option<Box<dyn RosterItem>>)>,
    ) -> Result<(), RosterError> {
        let touched = self.store.replace_many(entries)?;
        self.apply(touched)
    }

    /// Re-evaluate every occupied slot against its provider.
    pub fn refresh(&mut self) -> Result<(), RosterError> {
        let occupied: Vec<usize> = self.store.indices().collect();
        self.apply(occupied)
    }

    /// Re-evaluate a single slot against its provider.
    pub fn refresh_index(&mut self, index: usize) -> Result<(), RosterError> {
        self.store.validate_index(index)?;
        self.apply([index])
    }

    /// Run one diff pass over the whole roster against the acknowledged state
    /// and deliver the net result. Meaningful while batching; callable in
    /// either mode (in immediate mode it picks up provider drift, like
    /// [`refresh`](Roster::refresh)).
    pub fn commit(&mut self) -> Result<(), RosterError> {
        let mut touched: BTreeSet<usize> = self.store.indices().collect();
        touched.extend(self.acknowledged.indices());
        self.touched.clear();
        debug!(slots = touched.len(), "committing roster batch");
        self.reconcile(touched)
    }

    /// Discard pending changes: pending state becomes a value copy of the
    /// acknowledged state and nothing is emitted.
    pub fn reset(&mut self) {
        self.store = self.acknowledged.snapshot();
        self.touched.clear();
        debug!("roster batch reset");
    }

    fn apply(&mut self, touched: impl IntoIterator<Item = usize>) -> Result<(), RosterError> {
        self.touched.extend(touched);
        if self.batching {
            return Ok(());
        }
        let touched = std::mem::take(&mut self.touched);
        self.reconcile(touched)
    }

    fn reconcile(&mut self, touched: BTreeSet<usize>) -> Result<(), RosterError> {
        if touched.is_empty() {
            self.acknowledged = self.store.snapshot();
            return Ok(());
        }
        let messages = self
            .engine
            .compute(&self.acknowledged, &mut self.store, &touched);
        self.acknowledged = self.store.snapshot();
        if messages.is_empty() {
            return Ok(());
        }
        self.transport
            .deliver(messages)
            .map_err(RosterError::Transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Appearance, FixedItem};
    use crate::protocol::ViewerMessage;
    use crate::transport::RecordingTransport;

    struct FailingTransport;

    impl ViewerTransport for FailingTransport {
        fn deliver(&self, _messages: Vec<ViewerMessage>) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("viewer gone"))
        }
    }

    fn roster(capacity: usize) -> (Roster, Arc<RecordingTransport>) {
        let transport = Arc::new(RecordingTransport::new());
        let roster = Roster::new(
            RosterConfig::new(capacity),
            Arc::new(IdentityCache::new()),
            transport.clone(),
        )
        .unwrap();
        (roster, transport)
    }

    fn item(text: &str) -> Box<dyn RosterItem> {
        Box::new(FixedItem::new(text, 0, Appearance::blank()))
    }

    fn item_with(text: &str, latency: i64, appearance: &Appearance) -> Box<dyn RosterItem> {
        Box::new(FixedItem::new(text, latency, appearance.clone()))
    }

    #[test]
    fn construction_validates_config() {
        let result = Roster::new(
            RosterConfig::new(81),
            Arc::new(IdentityCache::new()),
            Arc::new(RecordingTransport::new()),
        );
        assert!(matches!(result, Err(RosterError::CapacityExceeded { .. })));
    }

    #[test]
    fn immediate_mode_emits_per_mutation() {
        let (mut roster, transport) = roster(8);
        roster.set(0, item("alice")).unwrap();
        roster.set(1, item("bob")).unwrap();
        assert_eq!(transport.batch_count(), 2);
        assert!(matches!(
            transport.batches()[0][0],
            ViewerMessage::Add { .. }
        ));
    }

    #[test]
    fn redundant_set_emits_nothing() {
        let (mut roster, transport) = roster(8);
        roster.set(0, item("alice")).unwrap();
        transport.clear();
        roster.set(0, item("alice")).unwrap();
        assert_eq!(transport.batch_count(), 0);
    }

    #[test]
    fn batch_mutations_defer_until_commit() {
        let (mut roster, transport) = roster(8);
        roster.set_batch_enabled(true);
        roster.set(0, item("alice")).unwrap();
        roster.set(1, item("bob")).unwrap();
        assert_eq!(transport.batch_count(), 0);

        roster.commit().unwrap();
        assert_eq!(transport.batch_count(), 1);
        assert_eq!(transport.batches()[0].len(), 2);
    }

    #[test]
    fn batch_commit_summarizes_net_effect() {
        let (mut roster, transport) = roster(8);
        roster.set(0, item("alice")).unwrap();
        transport.clear();

        roster.set_batch_enabled(true);
        roster.set(0, item("renamed")).unwrap();
        roster.remove(0).unwrap();
        roster.set(0, item("alice")).unwrap();
        roster.commit().unwrap();

        // net effect of the three mutations is no change at all
        assert_eq!(transport.batch_count(), 0);
    }

    #[test]
    fn batch_reset_discards_pending_without_emission() {
        let (mut roster, transport) = roster(8);
        roster.set(0, item("alice")).unwrap();
        transport.clear();

        roster.set_batch_enabled(true);
        roster.set(1, item("bob")).unwrap();
        roster.remove(0).unwrap();
        roster.reset();

        assert_eq!(transport.batch_count(), 0);
        assert!(roster.contains(0).unwrap());
        assert!(!roster.contains(1).unwrap());

        // nothing pending, so a commit after reset is silent too
        roster.commit().unwrap();
        assert_eq!(transport.batch_count(), 0);
    }

    #[test]
    fn disabling_batch_drops_pending_reconciliation() {
        let (mut roster, transport) = roster(8);
        roster.set_batch_enabled(true);
        roster.set(0, item("alice")).unwrap();
        roster.set_batch_enabled(false);

        // pending edits became local truth with no emission
        assert_eq!(transport.batch_count(), 0);
        assert!(roster.contains(0).unwrap());

        roster.commit().unwrap();
        assert_eq!(transport.batch_count(), 0);
    }

    #[test]
    fn push_fills_first_free_slot_and_reports_full() {
        let (mut roster, _transport) = roster(2);
        assert_eq!(roster.push(item("a")).unwrap(), 0);
        assert_eq!(roster.push(item("b")).unwrap(), 1);
        assert!(matches!(roster.push(item("c")), Err(RosterError::Full)));
        assert_eq!(roster.len(), 2);
    }

    #[test]
    fn insert_shifts_and_emits_for_every_moved_slot() {
        let (mut roster, transport) = roster(8);
        roster.set(0, item("a")).unwrap();
        roster.set(1, item("b")).unwrap();
        transport.clear();

        roster.insert(0, item("front")).unwrap();
        let batch = &transport.batches()[0];
        // all items share one appearance, so slots 0 and 1 change text in
        // place and the newly occupied slot 2 is a fresh addition
        let additions = batch
            .iter()
            .filter(|m| matches!(m, ViewerMessage::Add { .. }))
            .count();
        let text_updates = batch
            .iter()
            .filter(|m| matches!(m, ViewerMessage::UpdateText { .. }))
            .count();
        assert_eq!((additions, text_updates), (1, 2));
        assert_eq!(batch.len(), 3);
    }

    #[test]
    fn remove_matching_clears_only_equal_content() {
        let (mut roster, _transport) = roster(8);
        roster.set(0, item("dup")).unwrap();
        roster.set(1, item("other")).unwrap();
        roster.set(2, item("dup")).unwrap();

        let cleared = roster.remove_matching(item("dup").as_ref()).unwrap();
        assert_eq!(cleared, 2);
        assert!(!roster.contains(0).unwrap());
        assert!(roster.contains(1).unwrap());
        assert!(!roster.contains(2).unwrap());
    }

    #[test]
    fn latency_change_survives_batching_as_single_update() {
        let (mut roster, transport) = roster(8);
        let appearance = Appearance::new("v", "s");
        roster.set(0, item_with("alice", 40, &appearance)).unwrap();
        transport.clear();

        roster.set_batch_enabled(true);
        roster.set(0, item_with("alice", 60, &appearance)).unwrap();
        roster.set(0, item_with("alice", 90, &appearance)).unwrap();
        roster.commit().unwrap();

        assert_eq!(
            transport.messages(),
            vec![ViewerMessage::UpdateLatency {
                id: roster
                    .engine
                    .identities()
                    .resolve(&appearance, 0)
                    .id,
                latency: 90,
            }]
        );
    }

    #[test]
    fn transport_failure_propagates() {
        let mut roster = Roster::new(
            RosterConfig::new(4),
            Arc::new(IdentityCache::new()),
            Arc::new(FailingTransport),
        )
        .unwrap();
        assert!(matches!(
            roster.set(0, item("alice")),
            Err(RosterError::Transport(_))
        ));
    }
}
