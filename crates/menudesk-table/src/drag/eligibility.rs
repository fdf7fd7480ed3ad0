//! Which rows may be dragged, derived from the current selection.
//!
//! # Design
//! - Eligibility reacts to the selection; dragging never edits it.
//! - Only actionable roots of one kind under one parent are draggable, and
//!   they travel together as one unit.

use tracing::debug;

use crate::key::{EntityId, EntityKind, RowKey};
use crate::registry::Registry;
use crate::selection::{CheckboxState, SelectionModel, SelectionSet};

/// Row that would move with a drag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DraggedEntity {
    /// Row key.
    pub key: RowKey,
    /// Entity behind the row.
    pub entity_id: EntityId,
    /// Parent row, if any.
    pub parent_key: Option<RowKey>,
}

/// Precomputed drag permissions for one render cycle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DragEligibility {
    drag_kind: Option<EntityKind>,
    entities: Vec<DraggedEntity>,
}

impl DragEligibility {
    /// Nothing can be dragged.
    #[must_use]
    pub fn ineligible() -> Self {
        Self::default()
    }

    /// Eligibility for a registry and selection.
    #[must_use]
    pub fn from_selection(registry: &Registry, selected: &SelectionSet) -> Self {
        let model = SelectionModel::new(registry, selected);
        Self::from_roots(registry, &model.actionable_roots(), model.selected_kind())
    }

    /// Eligibility from precomputed actionable roots.
    ///
    /// Mixed kinds, roots under different parents, an empty root list or
    /// roots missing from the registry leave nothing draggable.
    #[must_use]
    pub fn from_roots(
        registry: &Registry,
        roots: &[RowKey],
        selected_kind: Option<EntityKind>,
    ) -> Self {
        let Some(drag_kind) = selected_kind else {
            return Self::ineligible();
        };
        let entities: Vec<DraggedEntity> = roots
            .iter()
            .filter_map(|key| registry.get(key))
            .map(|identity| DraggedEntity {
                key: identity.key.clone(),
                entity_id: identity.entity_id.clone(),
                parent_key: identity.parent_key.clone(),
            })
            .collect();
        let Some((first, rest)) = entities.split_first() else {
            return Self::ineligible();
        };
        if rest.iter().any(|entity| entity.parent_key != first.parent_key) {
            debug!(count = entities.len(), "roots span several parents; drag disabled");
            return Self::ineligible();
        }
        Self {
            drag_kind: Some(drag_kind),
            entities,
        }
    }

    /// Whether any drag may start.
    #[must_use]
    pub fn can_drag(&self) -> bool {
        !self.entities.is_empty()
    }

    /// Kind of the draggable rows.
    #[must_use]
    pub const fn drag_kind(&self) -> Option<EntityKind> {
        self.drag_kind
    }

    /// Draggable rows in tree order.
    #[must_use]
    pub fn entities(&self) -> &[DraggedEntity] {
        &self.entities
    }

    /// Whether `key` is one of the draggable rows.
    #[must_use]
    pub fn contains(&self, key: &RowKey) -> bool {
        self.entities.iter().any(|entity| &entity.key == key)
    }

    /// Whether more than one row moves together.
    #[must_use]
    pub fn is_multi_drag(&self) -> bool {
        self.entities.len() > 1
    }

    /// Number of draggable rows.
    #[must_use]
    pub fn drag_count(&self) -> usize {
        self.entities.len()
    }
}

/// A row's drag handle is active only for fully checked rows of an eligible
/// selection.
#[must_use]
pub fn drag_handle_enabled(eligibility: &DragEligibility, state: CheckboxState) -> bool {
    eligibility.can_drag() && state == CheckboxState::Checked
}

/// Rows taking part in the selection keep their handle visible without hover.
#[must_use]
pub fn drag_handle_always_visible(state: CheckboxState) -> bool {
    matches!(state, CheckboxState::Checked | CheckboxState::Indeterminate)
}
