//! Entity snapshot shapes consumed by the registry.
//!
//! # Design
//! - The engine only needs ids and child lists; visibility and order are
//!   carried for callers but never interpreted.
//! - `Entity`/`Group` traits let callers build registries from their own row
//!   types without converting into `MenuGroup`.

use serde::{Deserialize, Serialize};

use crate::key::EntityId;

/// Anything with a stable id that can appear as a table row.
pub trait Entity {
    /// Stable database identifier.
    fn id(&self) -> &EntityId;
}

/// Entity that owns an ordered list of child entities.
pub trait Group: Entity {
    /// Child type shown beneath the group.
    type Child: Entity;

    /// Children in display order.
    fn children(&self) -> &[Self::Child];
}

/// Leaf row in a menu snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Stable identifier.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Whether the item is shown to customers.
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Persisted order index.
    #[serde(default)]
    pub order: u32,
}

/// Group row in a menu snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuGroup {
    /// Stable identifier.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Whether the group is shown to customers.
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Persisted order index.
    #[serde(default)]
    pub order: u32,
    /// Items in display order.
    #[serde(default)]
    pub children: Vec<MenuItem>,
}

const fn default_visible() -> bool {
    true
}

impl Entity for MenuItem {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Entity for MenuGroup {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Group for MenuGroup {
    type Child = MenuItem;

    fn children(&self) -> &[MenuItem] {
        &self.children
    }
}

/// Sort groups and their children by persisted order index.
///
/// The sort is stable so equal indexes keep their snapshot order.
pub fn sort_menu(groups: &mut [MenuGroup]) {
    groups.sort_by_key(|group| group.order);
    for group in groups.iter_mut() {
        group.children.sort_by_key(|item| item.order);
    }
}
