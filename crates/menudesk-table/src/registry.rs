//! Identity registry: immutable key to row-structure map for one snapshot.
//!
//! # Design
//! - Rebuilt wholesale whenever the entity snapshot changes; never mutated
//!   afterwards.
//! - Keeps tree order (parents before children, depth-first) alongside the
//!   key map so range selection and drag siblings resolve without re-walking
//!   the snapshot.
//! - Colliding keys resolve to the later identity while the ordered list keeps
//!   the first position; uniqueness of `(parent, id)` is the caller's job.

use std::collections::{BTreeMap, HashMap};

use crate::key::{EntityId, EntityKind, RowKey};
use crate::model::{Entity, Group};

/// Nesting level of a row, used to match drag sources with drop targets.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Level {
    /// Top-level row with no parent context.
    Root,
    /// Row shown beneath a parent group.
    Child {
        /// Entity id of the parent group.
        parent: EntityId,
    },
}

/// Structural facts about one row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowIdentity {
    /// Key of the row.
    pub key: RowKey,
    /// Entity kind of the row.
    pub kind: EntityKind,
    /// Entity id of the row.
    pub entity_id: EntityId,
    /// Nesting depth, 0 for top-level rows.
    pub depth: usize,
    /// Key of the parent row, if any.
    pub parent_key: Option<RowKey>,
    /// Immediate children in display order.
    pub direct_child_keys: Vec<RowKey>,
    /// Every descendant in tree order, excluding the row itself.
    pub child_keys: Vec<RowKey>,
    /// Id passed to the expand store; present only for groups with children.
    pub expand_key: Option<EntityId>,
    /// Whether the row can accept dropped entities.
    pub can_receive_drop: bool,
    /// Kind of entity the row contains, for groups.
    pub contains_kind: Option<EntityKind>,
}

impl RowIdentity {
    fn leaf(key: RowKey, depth: usize, parent_key: Option<RowKey>) -> Self {
        Self {
            kind: key.kind(),
            entity_id: key.entity_id().clone(),
            key,
            depth,
            parent_key,
            direct_child_keys: Vec::new(),
            child_keys: Vec::new(),
            expand_key: None,
            can_receive_drop: false,
            contains_kind: None,
        }
    }

    /// Whether the row has at least one descendant.
    #[must_use]
    pub fn has_descendants(&self) -> bool {
        !self.child_keys.is_empty()
    }

    /// Whether the row can be expanded or collapsed.
    #[must_use]
    pub const fn is_expandable(&self) -> bool {
        self.expand_key.is_some()
    }

    /// Level used for drag compatibility.
    #[must_use]
    pub fn level(&self) -> Level {
        match self.key.parent_id() {
            Some(parent) => Level::Child {
                parent: parent.clone(),
            },
            None => Level::Root,
        }
    }
}

/// Immutable lookup tables for one snapshot.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    by_key: HashMap<RowKey, RowIdentity>,
    ordered: Vec<RowKey>,
    by_kind: BTreeMap<EntityKind, Vec<RowKey>>,
}

impl Registry {
    /// Build a registry for a flat table: every entity is a depth-0 leaf.
    #[must_use]
    pub fn build_flat<E: Entity>(entities: &[E], kind: EntityKind) -> Self {
        let mut registry = Self::default();
        for entity in entities {
            let key = RowKey::flat(kind, entity.id().clone());
            registry.insert(RowIdentity::leaf(key, 0, None));
        }
        registry
    }

    /// Build a two-level registry from groups and their children.
    ///
    /// Groups always accept drops of `item_kind`; children never accept drops.
    #[must_use]
    pub fn build_hierarchy<G: Group>(
        groups: &[G],
        group_kind: EntityKind,
        item_kind: EntityKind,
    ) -> Self {
        let mut registry = Self::default();
        for group in groups {
            let group_key = RowKey::flat(group_kind, group.id().clone());
            let child_keys: Vec<RowKey> = group
                .children()
                .iter()
                .map(|child| RowKey::nested(item_kind, group.id().clone(), child.id().clone()))
                .collect();
            let mut identity = RowIdentity::leaf(group_key.clone(), 0, None);
            identity.expand_key = (!child_keys.is_empty()).then(|| group.id().clone());
            identity.can_receive_drop = true;
            identity.contains_kind = Some(item_kind);
            identity.direct_child_keys.clone_from(&child_keys);
            identity.child_keys.clone_from(&child_keys);
            registry.insert(identity);
            for child_key in child_keys {
                registry.insert(RowIdentity::leaf(child_key, 1, Some(group_key.clone())));
            }
        }
        registry
    }

    /// Build the label/category registry used by the menu table.
    #[must_use]
    pub fn build_menu<G: Group>(groups: &[G]) -> Self {
        Self::build_hierarchy(groups, EntityKind::Label, EntityKind::Category)
    }

    fn insert(&mut self, identity: RowIdentity) {
        let key = identity.key.clone();
        let kind = identity.kind;
        if self.by_key.insert(key.clone(), identity).is_none() {
            self.by_kind.entry(kind).or_default().push(key.clone());
            self.ordered.push(key);
        }
    }

    /// Identity for a key.
    #[must_use]
    pub fn get(&self, key: &RowKey) -> Option<&RowIdentity> {
        self.by_key.get(key)
    }

    /// Whether the key belongs to this snapshot.
    #[must_use]
    pub fn contains(&self, key: &RowKey) -> bool {
        self.by_key.contains_key(key)
    }

    /// All descendants of a key, empty when unknown or a leaf.
    #[must_use]
    pub fn descendant_keys(&self, key: &RowKey) -> &[RowKey] {
        self.get(key).map_or(&[], |identity| identity.child_keys.as_slice())
    }

    /// Immediate children of a key, empty when unknown or a leaf.
    #[must_use]
    pub fn direct_child_keys(&self, key: &RowKey) -> &[RowKey] {
        self.get(key)
            .map_or(&[], |identity| identity.direct_child_keys.as_slice())
    }

    /// Entity id behind a key.
    #[must_use]
    pub fn entity_id(&self, key: &RowKey) -> Option<&EntityId> {
        self.get(key).map(|identity| &identity.entity_id)
    }

    /// Entity kind behind a key.
    #[must_use]
    pub fn kind_of(&self, key: &RowKey) -> Option<EntityKind> {
        self.get(key).map(|identity| identity.kind)
    }

    /// Nesting depth of a key.
    #[must_use]
    pub fn depth(&self, key: &RowKey) -> Option<usize> {
        self.get(key).map(|identity| identity.depth)
    }

    /// Parent key of a key, if it has one.
    #[must_use]
    pub fn parent_key(&self, key: &RowKey) -> Option<&RowKey> {
        self.get(key).and_then(|identity| identity.parent_key.as_ref())
    }

    /// Drag level of a key.
    #[must_use]
    pub fn level_of(&self, key: &RowKey) -> Option<Level> {
        self.get(key).map(RowIdentity::level)
    }

    /// Whether the key is an expandable group.
    #[must_use]
    pub fn is_expandable(&self, key: &RowKey) -> bool {
        self.get(key).is_some_and(RowIdentity::is_expandable)
    }

    /// Whether `target` accepts dropped entities of `drag_kind`.
    #[must_use]
    pub fn can_receive_drop(&self, target: &RowKey, drag_kind: EntityKind) -> bool {
        self.get(target).is_some_and(|identity| {
            identity.can_receive_drop && identity.contains_kind == Some(drag_kind)
        })
    }

    /// Keys of one kind in tree order.
    #[must_use]
    pub fn keys_of_kind(&self, kind: EntityKind) -> &[RowKey] {
        self.by_kind.get(&kind).map_or(&[], Vec::as_slice)
    }

    /// Every key in tree order.
    #[must_use]
    pub fn keys(&self) -> &[RowKey] {
        &self.ordered
    }

    /// Keys sharing depth and parent with `key`, in tree order, including
    /// `key` itself. Empty when the key is unknown.
    #[must_use]
    pub fn siblings_of(&self, key: &RowKey) -> Vec<RowKey> {
        let Some(identity) = self.get(key) else {
            return Vec::new();
        };
        self.ordered
            .iter()
            .filter_map(|candidate| self.get(candidate))
            .filter(|candidate| {
                candidate.depth == identity.depth && candidate.parent_key == identity.parent_key
            })
            .map(|candidate| candidate.key.clone())
            .collect()
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Whether the registry holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}
