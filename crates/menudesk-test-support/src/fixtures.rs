//! Menu snapshots, key builders and pointer geometry for tests.

use anyhow::{Context, Result};
use menudesk_table::{EntityId, EntityKind, MenuGroup, MenuItem, RowBounds, RowKey};
use serde_json::json;

/// Height of one rendered row in test geometry.
pub const ROW_HEIGHT: f64 = 40.0;

/// Two groups: `g1` holding `a, b, c` and `g2` holding `d, e`.
#[must_use]
pub fn sample_menu() -> Vec<MenuGroup> {
    vec![group("g1", &["a", "b", "c"]), group("g2", &["d", "e"])]
}

/// Group with one item per id, named after the ids.
#[must_use]
pub fn group(id: &str, children: &[&str]) -> MenuGroup {
    MenuGroup {
        id: id.into(),
        name: id.to_uppercase(),
        visible: true,
        order: 0,
        children: children.iter().map(|child| item(child)).collect(),
    }
}

/// Single visible item.
#[must_use]
pub fn item(id: &str) -> MenuItem {
    MenuItem {
        id: id.into(),
        name: id.to_uppercase(),
        visible: true,
        order: 0,
    }
}

/// Parse a menu snapshot from JSON.
///
/// # Errors
///
/// Returns an error when the document does not describe a list of groups.
pub fn menu_from_json(value: serde_json::Value) -> Result<Vec<MenuGroup>> {
    serde_json::from_value(value).context("menu fixture did not match the group shape")
}

/// JSON form of [`sample_menu`], for tests exercising deserialization.
#[must_use]
pub fn sample_menu_json() -> serde_json::Value {
    json!([
        { "id": "g1", "name": "G1", "order": 0, "children": [
            { "id": "a", "name": "A" },
            { "id": "b", "name": "B" },
            { "id": "c", "name": "C" }
        ]},
        { "id": "g2", "name": "G2", "order": 1, "children": [
            { "id": "d", "name": "D" },
            { "id": "e", "name": "E" }
        ]}
    ])
}

/// Key of a top-level group row.
#[must_use]
pub fn label_key(id: &str) -> RowKey {
    RowKey::flat(EntityKind::Label, id.into())
}

/// Key of an item row shown under `parent`.
#[must_use]
pub fn category_key(parent: &str, id: &str) -> RowKey {
    RowKey::nested(EntityKind::Category, parent.into(), id.into())
}

/// Entity ids from raw strings.
#[must_use]
pub fn ids(raw: &[&str]) -> Vec<EntityId> {
    raw.iter().map(|id| EntityId::from(*id)).collect()
}

/// Bounds of the row at `index` in a uniformly sized table.
#[must_use]
pub fn row_bounds(index: u32) -> RowBounds {
    RowBounds {
        top: f64::from(index) * ROW_HEIGHT,
        height: ROW_HEIGHT,
    }
}

/// Pointer position in the upper half of `bounds`.
#[must_use]
pub fn upper_half(bounds: RowBounds) -> f64 {
    bounds.height.mul_add(0.25, bounds.top)
}

/// Pointer position in the lower half of `bounds`.
#[must_use]
pub fn lower_half(bounds: RowBounds) -> f64 {
    bounds.height.mul_add(0.75, bounds.top)
}
