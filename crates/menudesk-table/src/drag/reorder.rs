//! Insertion math for sibling reorders.

use crate::key::EntityId;

/// Side of the target row the dragged rows land on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DropPosition {
    /// Insert above the target.
    #[default]
    Before,
    /// Insert below the target.
    After,
}

/// Vertical extent of a hovered row, in the same units as the pointer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RowBounds {
    /// Top edge of the row.
    pub top: f64,
    /// Height of the row.
    pub height: f64,
}

impl RowBounds {
    /// Vertical midpoint of the row.
    #[must_use]
    pub fn midpoint(&self) -> f64 {
        self.height.mul_add(0.5, self.top)
    }
}

impl DropPosition {
    /// Before when the pointer is above the row's midpoint, after otherwise.
    #[must_use]
    pub fn from_pointer(pointer_y: f64, bounds: RowBounds) -> Self {
        if pointer_y < bounds.midpoint() {
            Self::Before
        } else {
            Self::After
        }
    }
}

/// New sibling order after moving `dragged` next to `target`.
///
/// Dragged ids are removed first and re-inserted as a block in the order
/// given, so the result does not depend on the drag direction. A target that
/// is missing from the remaining siblings appends the block.
#[must_use]
pub fn reorder_ids(
    siblings: &[EntityId],
    dragged: &[EntityId],
    target: &EntityId,
    position: DropPosition,
) -> Vec<EntityId> {
    let mut remaining: Vec<EntityId> = siblings
        .iter()
        .filter(|id| !dragged.contains(id))
        .cloned()
        .collect();
    let Some(index) = remaining.iter().position(|id| id == target) else {
        remaining.extend(dragged.iter().cloned());
        return remaining;
    };
    let insert_at = match position {
        DropPosition::Before => index,
        DropPosition::After => index + 1,
    };
    remaining.splice(insert_at..insert_at, dragged.iter().cloned());
    remaining
}
