//! Recording fakes for the engine's injected collaborators.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};

use anyhow::{Context, Result};
use async_trait::async_trait;
use menudesk_table::{
    EntityId, EntityKind, ExpandStore, MenuGroup, Navigator, ReorderCommand, ReorderError,
    ReorderOps, ReorderResult, UndoAction, UndoSink,
};

/// In-memory reorder store that records every call.
#[derive(Debug, Default)]
pub struct RecordingReorderOps {
    calls: RefCell<Vec<ReorderCommand>>,
    groups: RefCell<Vec<EntityId>>,
    items: RefCell<HashMap<EntityId, Vec<EntityId>>>,
    rejection: RefCell<Option<ReorderError>>,
}

impl RecordingReorderOps {
    /// Store seeded with the order of a menu snapshot.
    #[must_use]
    pub fn from_menu(groups: &[MenuGroup]) -> Self {
        let items = groups
            .iter()
            .map(|group| {
                let children = group.children.iter().map(|child| child.id.clone()).collect();
                (group.id.clone(), children)
            })
            .collect();
        Self {
            groups: RefCell::new(groups.iter().map(|group| group.id.clone()).collect()),
            items: RefCell::new(items),
            ..Self::default()
        }
    }

    /// Reject every following call with `error`.
    pub fn reject_with(&self, error: ReorderError) {
        *self.rejection.borrow_mut() = Some(error);
    }

    /// Accept calls again.
    pub fn accept(&self) {
        *self.rejection.borrow_mut() = None;
    }

    /// Commands received so far, including rejected ones.
    #[must_use]
    pub fn calls(&self) -> Vec<ReorderCommand> {
        self.calls.borrow().clone()
    }

    /// Current persisted group order.
    #[must_use]
    pub fn group_order(&self) -> Vec<EntityId> {
        self.groups.borrow().clone()
    }

    /// Current persisted item order of one group.
    #[must_use]
    pub fn item_order(&self, group_id: &str) -> Vec<EntityId> {
        self.items
            .borrow()
            .get(&EntityId::from(group_id))
            .cloned()
            .unwrap_or_default()
    }

    fn check(&self, command: ReorderCommand) -> ReorderResult<()> {
        self.calls.borrow_mut().push(command);
        self.rejection.borrow().clone().map_or(Ok(()), Err)
    }
}

#[async_trait(?Send)]
impl ReorderOps for RecordingReorderOps {
    async fn reorder_groups(&self, ids: &[EntityId]) -> ReorderResult<()> {
        self.check(ReorderCommand::Groups { ids: ids.to_vec() })?;
        *self.groups.borrow_mut() = ids.to_vec();
        Ok(())
    }

    async fn reorder_items_in_group(
        &self,
        group_id: &EntityId,
        ids: &[EntityId],
    ) -> ReorderResult<()> {
        self.check(ReorderCommand::ItemsInGroup {
            group_id: group_id.clone(),
            ids: ids.to_vec(),
        })?;
        self.items.borrow_mut().insert(group_id.clone(), ids.to_vec());
        Ok(())
    }
}

/// Undo history with replay against a reorder store.
#[derive(Debug, Default)]
pub struct RecordingUndo {
    done: Vec<UndoAction>,
    undone: Vec<UndoAction>,
}

impl RecordingUndo {
    /// Labels of the actions that can be undone, oldest first.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.done.iter().map(|action| action.label.as_str()).collect()
    }

    /// Number of actions that can be undone.
    #[must_use]
    pub fn len(&self) -> usize {
        self.done.len()
    }

    /// Whether nothing can be undone.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.done.is_empty()
    }

    /// Replay the undo command of the latest action.
    ///
    /// # Errors
    ///
    /// Returns an error when the history is empty or the store rejects it.
    pub async fn undo_latest<R: ReorderOps + ?Sized>(&mut self, ops: &R) -> Result<()> {
        let action = self.done.pop().context("nothing to undo")?;
        action.undo.apply(ops).await.context("undo replay failed")?;
        self.undone.push(action);
        Ok(())
    }

    /// Replay the redo command of the latest undone action.
    ///
    /// # Errors
    ///
    /// Returns an error when nothing was undone or the store rejects it.
    pub async fn redo_latest<R: ReorderOps + ?Sized>(&mut self, ops: &R) -> Result<()> {
        let action = self.undone.pop().context("nothing to redo")?;
        action.redo.apply(ops).await.context("redo replay failed")?;
        self.done.push(action);
        Ok(())
    }
}

impl UndoSink for RecordingUndo {
    fn push_undo(&mut self, action: UndoAction) {
        self.done.push(action);
        self.undone.clear();
    }
}

/// Expand store that remembers every toggle.
#[derive(Debug, Default)]
pub struct MemoryExpandStore {
    expanded: BTreeSet<EntityId>,
    toggles: Vec<EntityId>,
}

impl MemoryExpandStore {
    /// Store with the given groups already expanded.
    #[must_use]
    pub fn with_expanded(ids: &[&str]) -> Self {
        Self {
            expanded: ids.iter().map(|id| EntityId::from(*id)).collect(),
            toggles: Vec::new(),
        }
    }

    /// Groups toggled so far, in call order.
    #[must_use]
    pub fn toggles(&self) -> &[EntityId] {
        &self.toggles
    }
}

impl ExpandStore for MemoryExpandStore {
    fn is_expanded(&self, id: &EntityId) -> bool {
        self.expanded.contains(id)
    }

    fn toggle_expand(&mut self, id: &EntityId) {
        if !self.expanded.remove(id) {
            self.expanded.insert(id.clone());
        }
        self.toggles.push(id.clone());
    }
}

/// Navigator that records visits.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visits: Vec<(EntityKind, EntityId)>,
}

impl RecordingNavigator {
    /// Visits in call order.
    #[must_use]
    pub fn visits(&self) -> &[(EntityKind, EntityId)] {
        &self.visits
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&mut self, kind: EntityKind, id: &EntityId) {
        self.visits.push((kind, id.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{ids, sample_menu};

    #[tokio::test]
    async fn reorder_store_tracks_order_and_rejections() -> Result<()> {
        let ops = RecordingReorderOps::from_menu(&sample_menu());
        assert_eq!(ops.item_order("g1"), ids(&["a", "b", "c"]));

        ops.reorder_groups(&ids(&["g2", "g1"])).await?;
        assert_eq!(ops.group_order(), ids(&["g2", "g1"]));

        ops.reject_with(ReorderError::Unavailable);
        let err = ops
            .reorder_items_in_group(&"g1".into(), &ids(&["c", "b", "a"]))
            .await
            .expect_err("store rejects");
        assert_eq!(err, ReorderError::Unavailable);
        assert_eq!(ops.item_order("g1"), ids(&["a", "b", "c"]));
        assert_eq!(ops.calls().len(), 2);

        ops.accept();
        ops.reorder_items_in_group(&"g1".into(), &ids(&["c", "b", "a"]))
            .await?;
        assert_eq!(ops.item_order("g1"), ids(&["c", "b", "a"]));
        Ok(())
    }

    #[tokio::test]
    async fn undo_history_replays_both_directions() -> Result<()> {
        let ops = RecordingReorderOps::from_menu(&sample_menu());
        let mut history = RecordingUndo::default();
        history.push_undo(UndoAction {
            label: "reorder:labels".to_string(),
            undo: ReorderCommand::Groups {
                ids: ids(&["g1", "g2"]),
            },
            redo: ReorderCommand::Groups {
                ids: ids(&["g2", "g1"]),
            },
        });
        assert_eq!(history.labels(), vec!["reorder:labels"]);

        history.undo_latest(&ops).await?;
        assert_eq!(ops.group_order(), ids(&["g1", "g2"]));
        assert!(history.is_empty());
        history.redo_latest(&ops).await?;
        assert_eq!(ops.group_order(), ids(&["g2", "g1"]));
        assert!(history.redo_latest(&ops).await.is_err());
        Ok(())
    }

    #[test]
    fn expand_store_and_navigator_record_calls() {
        let mut expand = MemoryExpandStore::with_expanded(&["g1"]);
        expand.toggle_expand(&"g1".into());
        expand.toggle_expand(&"g2".into());
        assert!(!expand.is_expanded(&"g1".into()));
        assert!(expand.is_expanded(&"g2".into()));
        assert_eq!(expand.toggles(), ids(&["g1", "g2"]).as_slice());

        let mut navigator = RecordingNavigator::default();
        navigator.navigate(EntityKind::Category, &"a".into());
        assert_eq!(navigator.visits().len(), 1);
    }
}
