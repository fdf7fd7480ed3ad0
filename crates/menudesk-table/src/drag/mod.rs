//! Drag-and-drop reordering of sibling rows.
//!
//! # Design
//! - `reorder` holds the pure insertion math, `eligibility` decides what may
//!   be dragged, `engine` owns the gesture state machine.
//! - Reorders never cross a level or parent boundary.

pub mod eligibility;
pub mod engine;
pub mod reorder;

pub use eligibility::{
    DragEligibility, DraggedEntity, drag_handle_always_visible, drag_handle_enabled,
};
pub use engine::{
    DragOverOutcome, DragReorderEngine, DragSession, DropOutcome, DropTarget, GestureState,
    ReorderPlan, RowDragState, is_valid_drop_target,
};
pub use reorder::{DropPosition, RowBounds, reorder_ids};
