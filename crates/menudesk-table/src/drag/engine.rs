//! Drag gesture state machine.
//!
//! # Design
//! - One gesture at a time: `Idle -> Dragging -> Idle`, with drag-over
//!   updates only recording the current drop target.
//! - Targets must be siblings of the source (same level and parent); anything
//!   else is refused without ending the gesture.
//! - `on_drop` resets to `Idle` synchronously and hands back a
//!   [`ReorderPlan`]; persistence and undo happen when the plan is committed.
//! - Hover-to-expand uses one host-driven timer slot; every transition that
//!   supersedes a hover cancels it. Only groups that accept the dragged kind
//!   arm it, and at most one group stays auto-expanded per gesture.
//! - The gesture name is recorded on the current span's `gesture` field.

use std::mem;
use std::time::Instant;

use tracing::{Span, debug, warn};

use crate::config::EngineTimings;
use crate::error::ReorderResult;
use crate::key::{EntityId, EntityKind, RowKey};
use crate::ports::{ReorderCommand, ReorderOps, UndoAction, UndoSink};
use crate::registry::{Level, Registry};
use crate::store::ExpandStore;
use crate::timer::TimerSlot;

use super::eligibility::DragEligibility;
use super::reorder::{DropPosition, RowBounds, reorder_ids};

/// Recorded drop target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropTarget {
    /// Row under the pointer.
    pub key: RowKey,
    /// Side of the row the dragged rows land on.
    pub position: DropPosition,
}

/// Active drag gesture.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DragSession {
    /// Row the drag started from.
    pub source: RowKey,
    /// Kind of the dragged rows.
    pub kind: EntityKind,
    /// Level shared by every valid target.
    pub level: Level,
    /// Rows moving together, in tree order.
    pub unit: Vec<RowKey>,
    /// Current valid drop target, if any.
    pub target: Option<DropTarget>,
}

/// Gesture state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum GestureState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A drag is in progress.
    Dragging(DragSession),
}

/// Result of a drag-over update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DragOverOutcome {
    /// No drag in progress.
    Inactive,
    /// Row is not a valid target; no drop target is recorded.
    Refused,
    /// Row recorded as the drop target.
    Target(DropTarget),
}

/// Result of a drop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropOutcome {
    /// No drag or no valid target; nothing to persist.
    Aborted,
    /// Drop would leave the order as it is.
    Unchanged,
    /// New order ready to persist.
    Commit(ReorderPlan),
}

/// Pending reorder produced by a drop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReorderPlan {
    /// Undo history label, e.g. `reorder:2-categories-in-label`.
    pub label: String,
    /// Command restoring the order before the drop.
    pub undo: ReorderCommand,
    /// Command writing the order after the drop.
    pub redo: ReorderCommand,
}

impl ReorderPlan {
    /// Persist the new order and record undo history on success.
    ///
    /// # Errors
    /// Returns the error from the injected operation; no undo entry is pushed
    /// and nothing is rolled back.
    pub async fn commit<R, U>(self, ops: &R, undo: &mut U) -> ReorderResult<()>
    where
        R: ReorderOps + ?Sized,
        U: UndoSink + ?Sized,
    {
        match self.redo.apply(ops).await {
            Ok(()) => {
                debug!(label = %self.label, "reorder persisted");
                undo.push_undo(UndoAction {
                    label: self.label,
                    undo: self.undo,
                    redo: self.redo,
                });
                Ok(())
            }
            Err(err) => {
                warn!(label = %self.label, error = %err, "reorder rejected");
                Err(err)
            }
        }
    }
}

/// Per-row drag styling facts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RowDragState {
    /// Row is the drag source.
    pub is_dragging: bool,
    /// Row moves with the drag.
    pub in_drag_unit: bool,
    /// Row is the current drop target.
    pub is_drag_over: bool,
    /// Drop side when the row is the target.
    pub drop_position: Option<DropPosition>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct HoverExpand {
    key: RowKey,
    group: EntityId,
}

/// Drag-to-reorder state machine for one table.
#[derive(Clone, Debug, Default)]
pub struct DragReorderEngine {
    timings: EngineTimings,
    state: GestureState,
    hovered: Option<RowKey>,
    hover_expand: TimerSlot<HoverExpand>,
    auto_expanded: Option<EntityId>,
    fresh: Option<(EntityId, Instant)>,
}

/// Whether `target` is a legal drop target for a drag from `source`.
///
/// Both rows must exist, differ, and share depth and level (including the
/// parent for nested rows). The relation is symmetric.
#[must_use]
pub fn is_valid_drop_target(registry: &Registry, source: &RowKey, target: &RowKey) -> bool {
    let (Some(source), Some(target)) = (registry.get(source), registry.get(target)) else {
        return false;
    };
    source.key != target.key
        && source.kind == target.kind
        && source.depth == target.depth
        && source.level() == target.level()
}

fn undo_label(kind: EntityKind, parent_kind: Option<EntityKind>, count: usize) -> String {
    let noun = match parent_kind {
        Some(parent) => format!("{}-in-{}", kind.plural_slug(), parent.as_str()),
        None => kind.plural_slug().to_string(),
    };
    if count > 1 {
        format!("reorder:{count}-{noun}")
    } else {
        format!("reorder:{noun}")
    }
}

impl DragReorderEngine {
    /// Engine using the given timings.
    #[must_use]
    pub fn new(timings: EngineTimings) -> Self {
        Self {
            timings,
            ..Self::default()
        }
    }

    /// Current gesture state.
    #[must_use]
    pub const fn state(&self) -> &GestureState {
        &self.state
    }

    /// Active session, if dragging.
    #[must_use]
    pub const fn session(&self) -> Option<&DragSession> {
        match &self.state {
            GestureState::Dragging(session) => Some(session),
            GestureState::Idle => None,
        }
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging(_))
    }

    /// Whether a hover-to-expand timer is pending.
    #[must_use]
    pub const fn is_expand_pending(&self) -> bool {
        self.hover_expand.is_armed()
    }

    /// Start dragging `key`.
    ///
    /// Refused while another gesture runs or when the row is not eligible.
    /// The drag unit is every eligible sibling of the source.
    pub fn on_drag_start(
        &mut self,
        registry: &Registry,
        eligibility: &DragEligibility,
        key: &RowKey,
    ) -> bool {
        if self.is_dragging() {
            debug!(row = %key, "drag start refused: gesture already active");
            return false;
        }
        let Some(identity) = registry.get(key) else {
            return false;
        };
        if !eligibility.contains(key) {
            debug!(row = %key, "drag start refused: row not eligible");
            return false;
        }
        let unit: Vec<RowKey> = registry
            .siblings_of(key)
            .into_iter()
            .filter(|sibling| eligibility.contains(sibling))
            .collect();
        debug!(row = %key, count = unit.len(), "drag started");
        Span::current().record("gesture", "drag");
        self.reset_hover();
        self.auto_expanded = None;
        self.state = GestureState::Dragging(DragSession {
            source: key.clone(),
            kind: identity.kind,
            level: identity.level(),
            unit,
            target: None,
        });
        true
    }

    /// Pointer moved over `key` while dragging.
    ///
    /// Records the drop target when valid. Hovering a collapsed group that
    /// accepts the dragged kind arms the expand timer; hovering another row
    /// cancels it.
    pub fn on_drag_over(
        &mut self,
        registry: &Registry,
        expand: &dyn ExpandStore,
        key: &RowKey,
        pointer_y: f64,
        bounds: RowBounds,
        now: Instant,
    ) -> DragOverOutcome {
        let GestureState::Dragging(session) = &mut self.state else {
            return DragOverOutcome::Inactive;
        };

        if self.hovered.as_ref() != Some(key) {
            self.hover_expand.cancel();
            self.hovered = Some(key.clone());
        }
        if !session.unit.contains(key)
            && !self.hover_expand.is_armed()
            && registry.can_receive_drop(key, session.kind)
            && let Some(group) = registry.get(key).and_then(|row| row.expand_key.as_ref())
            && !expand.is_expanded(group)
        {
            self.hover_expand.schedule(
                now,
                self.timings.hover_expand_delay,
                HoverExpand {
                    key: key.clone(),
                    group: group.clone(),
                },
            );
        }

        if session.unit.contains(key) || !is_valid_drop_target(registry, &session.source, key) {
            session.target = None;
            return DragOverOutcome::Refused;
        }
        let target = DropTarget {
            key: key.clone(),
            position: DropPosition::from_pointer(pointer_y, bounds),
        };
        session.target = Some(target.clone());
        DragOverOutcome::Target(target)
    }

    /// Drive timers with the host clock.
    ///
    /// Returns the group expanded by the hover timer, if it fired. A group
    /// auto-expanded earlier in the same gesture is collapsed first.
    pub fn poll(&mut self, expand: &mut dyn ExpandStore, now: Instant) -> Option<EntityId> {
        if self.fresh.as_ref().is_some_and(|(_, until)| now >= *until) {
            self.fresh = None;
        }
        let fired = self.hover_expand.fire_if_due(now)?;
        if !self.is_dragging()
            || self.hovered.as_ref() != Some(&fired.key)
            || expand.is_expanded(&fired.group)
        {
            return None;
        }
        if let Some(previous) = self.auto_expanded.replace(fired.group.clone())
            && previous != fired.group
            && expand.is_expanded(&previous)
        {
            expand.toggle_expand(&previous);
            debug!(group = %previous, "previous auto-expanded group collapsed");
        }
        expand.toggle_expand(&fired.group);
        debug!(group = %fired.group, "group auto-expanded during drag");
        self.fresh = Some((fired.group.clone(), now + self.timings.auto_expand_flash));
        Some(fired.group)
    }

    /// Whether `group` was auto-expanded within the highlight window.
    #[must_use]
    pub fn is_freshly_auto_expanded(&self, group: &EntityId, now: Instant) -> bool {
        self.fresh
            .as_ref()
            .is_some_and(|(id, until)| id == group && now < *until)
    }

    /// Drop on `key`, ending the gesture.
    ///
    /// The drop only proceeds when `key` is the recorded target. The engine
    /// is back to `Idle` before the returned plan is committed.
    pub fn on_drop(&mut self, registry: &Registry, key: &RowKey) -> DropOutcome {
        Span::current().record("gesture", "idle");
        self.reset_hover();
        self.auto_expanded = None;
        let GestureState::Dragging(session) = mem::take(&mut self.state) else {
            return DropOutcome::Aborted;
        };
        let Some(target) = session.target.filter(|target| &target.key == key) else {
            debug!(row = %key, "drop aborted: no valid target");
            return DropOutcome::Aborted;
        };
        let Some(target_id) = registry.entity_id(&target.key) else {
            return DropOutcome::Aborted;
        };

        let siblings: Vec<EntityId> = registry
            .siblings_of(&session.source)
            .iter()
            .filter_map(|sibling| registry.entity_id(sibling).cloned())
            .collect();
        let dragged: Vec<EntityId> = session
            .unit
            .iter()
            .filter_map(|row| registry.entity_id(row).cloned())
            .collect();
        let next = reorder_ids(&siblings, &dragged, target_id, target.position);
        if next == siblings {
            debug!(row = %key, "drop leaves order unchanged");
            return DropOutcome::Unchanged;
        }

        let parent_kind = registry.parent_key(&session.source).map(RowKey::kind);
        let label = undo_label(session.kind, parent_kind, dragged.len());
        debug!(row = %key, label = %label, "drop produced reorder");
        DropOutcome::Commit(ReorderPlan {
            label,
            undo: ReorderCommand::for_level(&session.level, siblings),
            redo: ReorderCommand::for_level(&session.level, next),
        })
    }

    /// Unconditional cleanup when the pointer gesture ends.
    ///
    /// A group auto-expanded during a gesture that ended without a drop is
    /// collapsed again when configured to.
    pub fn on_drag_end(&mut self, expand: &mut dyn ExpandStore) {
        if self.is_dragging() {
            debug!("drag ended without drop");
        }
        self.state = GestureState::Idle;
        Span::current().record("gesture", "idle");
        self.reset_hover();
        if let Some(group) = self.auto_expanded.take()
            && self.timings.collapse_on_cancel
            && expand.is_expanded(&group)
        {
            expand.toggle_expand(&group);
            debug!(group = %group, "auto-expanded group collapsed");
        }
    }

    /// Drop every timer and gesture without touching collaborators.
    pub fn teardown(&mut self) {
        self.state = GestureState::Idle;
        self.reset_hover();
        self.auto_expanded = None;
        self.fresh = None;
    }

    /// Styling facts for one row.
    #[must_use]
    pub fn row_state(&self, key: &RowKey) -> RowDragState {
        let Some(session) = self.session() else {
            return RowDragState::default();
        };
        let drop_position = session
            .target
            .as_ref()
            .filter(|target| &target.key == key)
            .map(|target| target.position);
        RowDragState {
            is_dragging: &session.source == key,
            in_drag_unit: session.unit.contains(key),
            is_drag_over: drop_position.is_some(),
            drop_position,
        }
    }

    fn reset_hover(&mut self) {
        self.hover_expand.cancel();
        self.hovered = None;
    }
}
