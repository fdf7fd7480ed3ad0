//! Keeps a freshly created row on top of a table regardless of sorting.

use std::cmp::Ordering;

use crate::key::{EntityId, EntityKind, RowKey};
use crate::model::Entity;

/// Rows split into the pinned row and the rest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PinnedRows<T> {
    /// Row shown above the table, if present.
    pub pinned: Option<T>,
    /// Remaining rows in display order.
    pub rows: Vec<T>,
}

/// Pull the pinned row out of `rows`.
///
/// The remainder is ordered with `default_sort` only when the user is not
/// sorting and a comparator is supplied; otherwise it keeps input order.
pub fn split_pinned<T, F>(
    rows: Vec<T>,
    pinned_id: Option<&EntityId>,
    is_sorting_active: bool,
    default_sort: Option<F>,
) -> PinnedRows<T>
where
    T: Entity,
    F: FnMut(&T, &T) -> Ordering,
{
    let mut pinned = None;
    let mut rest = Vec::with_capacity(rows.len());
    for row in rows {
        if pinned.is_none() && pinned_id.is_some_and(|id| row.id() == id) {
            pinned = Some(row);
        } else {
            rest.push(row);
        }
    }
    if !is_sorting_active && let Some(compare) = default_sort {
        rest.sort_by(compare);
    }
    PinnedRows { pinned, rows: rest }
}

impl<T: Entity> PinnedRows<T> {
    /// Row keys in visual order: pinned row first.
    #[must_use]
    pub fn selectable_keys(&self, kind: EntityKind) -> Vec<RowKey> {
        self.pinned
            .iter()
            .chain(self.rows.iter())
            .map(|row| RowKey::flat(kind, row.id().clone()))
            .collect()
    }

    /// Whether `id` is the pinned row.
    #[must_use]
    pub fn is_pinned(&self, id: &EntityId) -> bool {
        self.pinned.as_ref().is_some_and(|row| row.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MenuItem;

    fn item(id: &str, name: &str) -> MenuItem {
        MenuItem {
            id: id.into(),
            name: name.to_string(),
            visible: true,
            order: 0,
        }
    }

    fn rows() -> Vec<MenuItem> {
        vec![item("a", "Zucchini"), item("b", "Apple"), item("c", "Mango")]
    }

    fn by_name(left: &MenuItem, right: &MenuItem) -> Ordering {
        left.name.cmp(&right.name)
    }

    #[test]
    fn pinned_row_leads_selectable_keys() {
        let split = split_pinned(rows(), Some(&"b".into()), true, Some(by_name));
        assert!(split.is_pinned(&"b".into()));
        let keys: Vec<String> = split
            .selectable_keys(EntityKind::Label)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(keys, vec!["label:b", "label:a", "label:c"]);
    }

    #[test]
    fn default_sort_applies_only_without_user_sort() {
        let split = split_pinned(rows(), Some(&"a".into()), false, Some(by_name));
        let names: Vec<&str> = split.rows.iter().map(|row| row.name.as_str()).collect();
        assert_eq!(names, vec!["Apple", "Mango"]);

        let unsorted = split_pinned(rows(), None, false, None::<fn(&MenuItem, &MenuItem) -> Ordering>);
        assert!(unsorted.pinned.is_none());
        assert_eq!(unsorted.rows, rows());
    }

    #[test]
    fn missing_pinned_id_leaves_rows_intact() {
        let split = split_pinned(rows(), Some(&"zz".into()), true, Some(by_name));
        assert!(split.pinned.is_none());
        assert_eq!(split.rows.len(), 3);
        assert_eq!(split.rows[0].id.as_str(), "a");
    }
}
