//! Ordered mapping from slot index to occupant, bounded by a fixed capacity.
//!
//! The store is pure data: it never talks to the transport and never refreshes
//! items. [`SlotStore::snapshot`] deep-copies every occupant, so a snapshot
//! taken as the acknowledged baseline can never alias pending state.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::RosterError;
use crate::model::RosterItem;

pub struct SlotStore {
    slots: BTreeMap<usize, Box<dyn RosterItem>>,
    capacity: usize,
}

impl SlotStore {
    /// Capacity is validated upstream by [`RosterConfig`](crate::config::RosterConfig).
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: BTreeMap::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn validate_index(&self, index: usize) -> Result<(), RosterError> {
        if index >= self.capacity {
            return Err(RosterError::IndexOutOfRange {
                index,
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    pub fn get(&self, index: usize) -> Result<Option<&dyn RosterItem>, RosterError> {
        self.validate_index(index)?;
        Ok(self.slots.get(&index).map(|item| item.as_ref()))
    }

    pub fn contains(&self, index: usize) -> Result<bool, RosterError> {
        self.validate_index(index)?;
        Ok(self.slots.contains_key(&index))
    }

    /// First empty index scanning ascending from zero, or `None` when full.
    pub fn next_free_index(&self) -> Option<usize> {
        (0..self.capacity).find(|index| !self.slots.contains_key(index))
    }

    /// Occupied indices in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots.keys().copied()
    }

    pub fn set(
        &mut self,
        index: usize,
        item: Box<dyn RosterItem>,
    ) -> Result<Option<Box<dyn RosterItem>>, RosterError> {
        self.validate_index(index)?;
        Ok(self.slots.insert(index, item))
    }

    pub fn remove(&mut self, index: usize) -> Result<Option<Box<dyn RosterItem>>, RosterError> {
        self.validate_index(index)?;
        Ok(self.slots.remove(&index))
    }

    /// Shift the contiguous occupied run starting at `index` up by one position
    /// and place `item` at `index`. Shifting stops at the first gap. An
    /// occupant pushed past the last slot is dropped; callers that cannot
    /// tolerate the loss must check occupancy first.
    ///
    /// Returns the indices whose content changed, in ascending order.
    pub fn insert_shifting(
        &mut self,
        index: usize,
        item: Box<dyn RosterItem>,
    ) -> Result<Vec<usize>, RosterError> {
        self.validate_index(index)?;
        let run_end = (index..self.capacity)
            .find(|i| !self.slots.contains_key(i))
            .unwrap_or(self.capacity);

        if run_end == self.capacity {
            self.slots.remove(&(self.capacity - 1));
            debug!(slot = self.capacity - 1, "shift insert dropped overflowing occupant");
        }
        let shift_top = run_end.min(self.capacity - 1);
        for i in (index..shift_top).rev() {
            if let Some(moved) = self.slots.remove(&i) {
                self.slots.insert(i + 1, moved);
            }
        }
        self.slots.insert(index, item);
        Ok((index..=shift_top).collect())
    }

    /// Apply every (index, occupant-or-empty) pair. All indices are validated
    /// before anything is applied, so an out-of-range entry leaves the store
    /// untouched. Returns the applied indices in ascending order.
    pub fn replace_many(
        &mut self,
        entries: impl IntoIterator<Item = (usize, Option<Box<dyn RosterItem>>)>,
    ) -> Result<Vec<usize>, RosterError> {
        let entries: Vec<_> = entries.into_iter().collect();
        for (index, _) in &entries {
            self.validate_index(*index)?;
        }
        let mut touched: Vec<usize> = Vec::with_capacity(entries.len());
        for (index, entry) in entries {
            match entry {
                Some(item) => {
                    self.slots.insert(index, item);
                }
                None => {
                    self.slots.remove(&index);
                }
            }
            touched.push(index);
        }
        touched.sort_unstable();
        touched.dedup();
        Ok(touched)
    }

    /// Deep value copy of the whole mapping.
    pub fn snapshot(&self) -> SlotStore {
        SlotStore {
            slots: self.slots.clone(),
            capacity: self.capacity,
        }
    }

    pub(crate) fn peek(&self, index: usize) -> Option<&dyn RosterItem> {
        self.slots.get(&index).map(|item| item.as_ref())
    }

    pub(crate) fn peek_mut(&mut self, index: usize) -> Option<&mut Box<dyn RosterItem>> {
        self.slots.get_mut(&index)
    }
}
