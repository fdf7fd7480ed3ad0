//! Caller-owned state the engine reads and writes through.
//!
//! # Design
//! - The engine never holds the live selection or expansion state; it is
//!   handed a store per call.
//! - `MemorySelectionStore` backs tests and hosts without their own store.

use crate::key::{EntityId, EntityKind, RowKey};
use crate::registry::Registry;
use crate::selection::{self, SelectionSet};

/// Externally owned selection.
pub trait SelectionStore {
    /// Current selected keys.
    fn selected(&self) -> &SelectionSet;

    /// Replace the whole selection.
    fn replace(&mut self, next: SelectionSet);

    /// Flip membership of one key.
    fn toggle(&mut self, key: &RowKey) {
        let mut next = self.selected().clone();
        if !next.remove(key) {
            next.insert(key.clone());
        }
        self.replace(next);
    }

    /// Select exactly `keys`.
    fn select_all(&mut self, keys: &[RowKey]) {
        self.replace(selection::select_all(keys));
    }

    /// Clear the selection.
    fn clear(&mut self) {
        self.replace(selection::clear());
    }
}

/// In-memory selection store.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemorySelectionStore {
    selected: SelectionSet,
}

impl MemorySelectionStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with keys.
    #[must_use]
    pub fn from_keys(keys: &[RowKey]) -> Self {
        Self {
            selected: selection::select_all(keys),
        }
    }

    /// Drop keys that vanished from the latest snapshot.
    pub fn retain_known(&mut self, registry: &Registry) {
        self.selected = selection::retain_known(&self.selected, registry);
    }
}

impl SelectionStore for MemorySelectionStore {
    fn selected(&self) -> &SelectionSet {
        &self.selected
    }

    fn replace(&mut self, next: SelectionSet) {
        self.selected = next;
    }
}

/// Externally owned expand/collapse state keyed by group id.
pub trait ExpandStore {
    /// Whether the group is currently expanded.
    fn is_expanded(&self, id: &EntityId) -> bool;

    /// Flip the expanded state of a group.
    fn toggle_expand(&mut self, id: &EntityId);
}

/// Detail-page navigation callback.
pub trait Navigator {
    /// Open the detail view for an entity.
    fn navigate(&mut self, kind: EntityKind, id: &EntityId);
}

impl<F> Navigator for F
where
    F: FnMut(EntityKind, &EntityId),
{
    fn navigate(&mut self, kind: EntityKind, id: &EntityId) {
        self(kind, id);
    }
}
