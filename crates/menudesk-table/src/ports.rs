//! Injected persistence and undo collaborators.
//!
//! # Design
//! - Reorders always send the complete replacement order for one level.
//! - Undo and redo are plain `ReorderCommand` values so hosts can replay them
//!   against any `ReorderOps` implementation.
//! - The engine runs on a single-threaded event loop, so the async trait is
//!   declared `?Send`.

use async_trait::async_trait;

use crate::error::ReorderResult;
use crate::key::EntityId;
use crate::registry::Level;

/// Persistence operations invoked after a drop.
#[async_trait(?Send)]
pub trait ReorderOps {
    /// Persist a new order for the top-level groups.
    async fn reorder_groups(&self, ids: &[EntityId]) -> ReorderResult<()>;

    /// Persist a new order for the children of one group.
    async fn reorder_items_in_group(&self, group_id: &EntityId, ids: &[EntityId])
    -> ReorderResult<()>;
}

/// One replayable reorder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReorderCommand {
    /// Reorder the top-level groups.
    Groups {
        /// Full order of group ids.
        ids: Vec<EntityId>,
    },
    /// Reorder the children of one group.
    ItemsInGroup {
        /// Group whose children are reordered.
        group_id: EntityId,
        /// Full order of child ids.
        ids: Vec<EntityId>,
    },
}

impl ReorderCommand {
    /// Command that writes `ids` at the given level.
    #[must_use]
    pub fn for_level(level: &Level, ids: Vec<EntityId>) -> Self {
        match level {
            Level::Root => Self::Groups { ids },
            Level::Child { parent } => Self::ItemsInGroup {
                group_id: parent.clone(),
                ids,
            },
        }
    }

    /// Order carried by the command.
    #[must_use]
    pub fn ids(&self) -> &[EntityId] {
        match self {
            Self::Groups { ids } | Self::ItemsInGroup { ids, .. } => ids,
        }
    }

    /// Execute the command.
    ///
    /// # Errors
    /// Propagates the error returned by the injected operation.
    pub async fn apply<R>(&self, ops: &R) -> ReorderResult<()>
    where
        R: ReorderOps + ?Sized,
    {
        match self {
            Self::Groups { ids } => ops.reorder_groups(ids).await,
            Self::ItemsInGroup { group_id, ids } => {
                ops.reorder_items_in_group(group_id, ids).await
            }
        }
    }
}

/// Undo history entry pushed after a successful reorder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UndoAction {
    /// Short action label such as `reorder:labels`.
    pub label: String,
    /// Command restoring the previous order.
    pub undo: ReorderCommand,
    /// Command reproducing the new order.
    pub redo: ReorderCommand,
}

/// Receiver for undo history entries.
pub trait UndoSink {
    /// Record a reversible action.
    fn push_undo(&mut self, action: UndoAction);
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::error::ReorderError;

    #[derive(Default)]
    struct Calls(RefCell<Vec<String>>);

    #[async_trait(?Send)]
    impl ReorderOps for Calls {
        async fn reorder_groups(&self, ids: &[EntityId]) -> ReorderResult<()> {
            self.0.borrow_mut().push(format!("groups:{}", ids.len()));
            Ok(())
        }

        async fn reorder_items_in_group(
            &self,
            group_id: &EntityId,
            _ids: &[EntityId],
        ) -> ReorderResult<()> {
            if group_id.as_str() == "locked" {
                return Err(ReorderError::Rejected {
                    reason: "locked".to_string(),
                });
            }
            self.0.borrow_mut().push(format!("items:{group_id}"));
            Ok(())
        }
    }

    #[test]
    fn level_selects_command_variant() {
        let root = ReorderCommand::for_level(&Level::Root, vec!["g1".into()]);
        assert!(matches!(root, ReorderCommand::Groups { .. }));
        let child = ReorderCommand::for_level(
            &Level::Child {
                parent: "g1".into(),
            },
            vec!["a".into(), "b".into()],
        );
        assert_eq!(child.ids().len(), 2);
        assert!(matches!(
            child,
            ReorderCommand::ItemsInGroup { ref group_id, .. } if group_id.as_str() == "g1"
        ));
    }

    #[tokio::test]
    async fn apply_dispatches_to_matching_operation() {
        let calls = Calls::default();
        ReorderCommand::Groups {
            ids: vec!["g1".into(), "g2".into()],
        }
        .apply(&calls)
        .await
        .expect("groups reorder");
        ReorderCommand::ItemsInGroup {
            group_id: "g1".into(),
            ids: vec!["a".into()],
        }
        .apply(&calls)
        .await
        .expect("items reorder");
        assert_eq!(*calls.0.borrow(), vec!["groups:2", "items:g1"]);

        let err = ReorderCommand::ItemsInGroup {
            group_id: "locked".into(),
            ids: Vec::new(),
        }
        .apply(&calls)
        .await
        .expect_err("locked group rejects");
        assert!(matches!(err, ReorderError::Rejected { .. }));
    }
}
