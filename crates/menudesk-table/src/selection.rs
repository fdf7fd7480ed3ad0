//! Tri-state selection model and actionable-root computation.
//!
//! # Design
//! - Pure: every operation reads `(registry, selected)` and returns a
//!   replacement set; the caller's store owns the live selection.
//! - A checked parent stands in for its whole subtree, so bulk actions only
//!   ever see the minimal set of roots.
//! - Keys missing from the registry are ignored rather than rejected.

use std::collections::BTreeSet;

use crate::key::{EntityKind, RowKey};
use crate::registry::Registry;

/// Selected row keys, ordered for deterministic iteration.
pub type SelectionSet = BTreeSet<RowKey>;

/// Visual state of a row checkbox.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CheckboxState {
    /// Nothing in the subtree is selected.
    Unchecked,
    /// The row (or its entire subtree) is selected.
    Checked,
    /// Some but not all descendants are selected.
    Indeterminate,
}

/// Header checkbox summary over the visible rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeaderStats {
    /// Every visible row is selected.
    pub all_selected: bool,
    /// At least one but not every visible row is selected.
    pub some_selected: bool,
    /// Number of visible rows that are selected.
    pub count: usize,
}

/// Net effect of a range selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangeEffect {
    /// Rows newly added to the selection.
    Selected(usize),
    /// Rows removed from the selection.
    Deselected(usize),
    /// Nothing changed.
    Unchanged,
}

/// Result of a shift-click range selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RangeOutcome {
    /// Replacement selection.
    pub selection: SelectionSet,
    /// How many rows changed and in which direction.
    pub effect: RangeEffect,
    /// Anchor to use for the next range selection.
    pub anchor: Option<RowKey>,
}

/// Read-only view over a registry and the current selection.
#[derive(Clone, Copy, Debug)]
pub struct SelectionModel<'a> {
    registry: &'a Registry,
    selected: &'a SelectionSet,
}

impl<'a> SelectionModel<'a> {
    /// Create a model for one render cycle.
    #[must_use]
    pub const fn new(registry: &'a Registry, selected: &'a SelectionSet) -> Self {
        Self { registry, selected }
    }

    /// Current selection.
    #[must_use]
    pub const fn selected(&self) -> &'a SelectionSet {
        self.selected
    }

    /// Whether the key itself is in the selection.
    #[must_use]
    pub fn is_selected(&self, key: &RowKey) -> bool {
        self.selected.contains(key)
    }

    /// Tri-state checkbox value for a row.
    ///
    /// Leaves are checked iff selected. Parents derive their state solely from
    /// how many descendants are selected.
    #[must_use]
    pub fn checkbox_state(&self, key: &RowKey) -> CheckboxState {
        let descendants = self.registry.descendant_keys(key);
        if descendants.is_empty() {
            return if self.selected.contains(key) {
                CheckboxState::Checked
            } else {
                CheckboxState::Unchecked
            };
        }
        let picked = descendants
            .iter()
            .filter(|descendant| self.selected.contains(*descendant))
            .count();
        if picked == 0 {
            CheckboxState::Unchecked
        } else if picked == descendants.len() {
            CheckboxState::Checked
        } else {
            CheckboxState::Indeterminate
        }
    }

    /// Minimal set of fully checked rows, in tree order.
    ///
    /// A checked row is dropped when its parent is both selected and checked.
    #[must_use]
    pub fn actionable_roots(&self) -> Vec<RowKey> {
        self.registry
            .keys()
            .iter()
            .filter(|key| self.selected.contains(*key))
            .filter(|key| self.checkbox_state(key) == CheckboxState::Checked)
            .filter(|key| {
                self.registry.parent_key(key).is_none_or(|parent| {
                    !(self.selected.contains(parent)
                        && self.checkbox_state(parent) == CheckboxState::Checked)
                })
            })
            .cloned()
            .collect()
    }

    /// Kind shared by every actionable root; `None` when empty or mixed.
    #[must_use]
    pub fn selected_kind(&self) -> Option<EntityKind> {
        let roots = self.actionable_roots();
        let (first, rest) = roots.split_first()?;
        let kind = first.kind();
        rest.iter().all(|key| key.kind() == kind).then_some(kind)
    }

    /// Whether the actionable roots all share one kind.
    #[must_use]
    pub fn is_same_kind(&self) -> bool {
        self.selected_kind().is_some()
    }

    /// Whether bulk actions (clone, remove, drag) may run.
    #[must_use]
    pub fn can_perform_action(&self) -> bool {
        self.is_same_kind()
    }

    /// Header checkbox summary against the visible rows.
    #[must_use]
    pub fn header_stats(&self, visible: &[RowKey]) -> HeaderStats {
        if visible.is_empty() || self.selected.is_empty() {
            return HeaderStats::default();
        }
        let count = visible
            .iter()
            .filter(|key| self.selected.contains(*key))
            .count();
        let all_selected = count == visible.len();
        HeaderStats {
            all_selected,
            some_selected: count > 0 && !all_selected,
            count,
        }
    }

    /// Flip membership of one key.
    #[must_use]
    pub fn toggle_simple(&self, key: &RowKey) -> SelectionSet {
        let mut next = self.selected.clone();
        if !next.remove(key) {
            next.insert(key.clone());
        }
        next
    }

    /// Hierarchy-aware toggle.
    ///
    /// Parents act as a master switch over their subtree. Deselecting a leaf
    /// under a selected, checked parent also removes the parent; selecting the
    /// last missing leaf of a parent adds the parent.
    #[must_use]
    pub fn toggle_with_hierarchy(&self, key: &RowKey) -> SelectionSet {
        let descendants = self.registry.descendant_keys(key);
        if descendants.is_empty() {
            return self.toggle_leaf(key);
        }
        let mut next = self.selected.clone();
        if self.checkbox_state(key) == CheckboxState::Checked {
            next.remove(key);
            for descendant in descendants {
                next.remove(descendant);
            }
        } else {
            next.insert(key.clone());
            next.extend(descendants.iter().cloned());
        }
        next
    }

    fn toggle_leaf(&self, key: &RowKey) -> SelectionSet {
        let parent = self.registry.parent_key(key);
        let mut next = self.selected.clone();
        if next.remove(key) {
            if let Some(parent) = parent
                && self.selected.contains(parent)
                && self.checkbox_state(parent) == CheckboxState::Checked
            {
                next.remove(parent);
            }
            return next;
        }
        next.insert(key.clone());
        if let Some(parent) = parent
            && self
                .registry
                .descendant_keys(parent)
                .iter()
                .all(|sibling| next.contains(sibling))
        {
            next.insert(parent.clone());
        }
        next
    }

    /// Header checkbox toggle: clear when every visible row is selected,
    /// otherwise select the visible rows.
    #[must_use]
    pub fn toggle_select_all(&self, visible: &[RowKey]) -> SelectionSet {
        if self.header_stats(visible).all_selected {
            clear()
        } else {
            select_all(visible)
        }
    }

    /// Shift-click range selection between `anchor` and `target`.
    ///
    /// Without an anchor the target alone is selected and becomes the anchor.
    /// A range that is already fully selected is deselected and the anchor is
    /// cleared; otherwise the range is added to the selection.
    #[must_use]
    pub fn range_select(
        &self,
        visible: &[RowKey],
        anchor: Option<&RowKey>,
        target: &RowKey,
    ) -> RangeOutcome {
        let Some(anchor) = anchor else {
            if self.selected.contains(target) {
                return RangeOutcome {
                    selection: self.selected.clone(),
                    effect: RangeEffect::Unchanged,
                    anchor: None,
                };
            }
            let mut selection = self.selected.clone();
            selection.insert(target.clone());
            return RangeOutcome {
                selection,
                effect: RangeEffect::Selected(1),
                anchor: Some(target.clone()),
            };
        };

        let range = keys_between(visible, anchor, target);
        if range.is_empty() {
            return RangeOutcome {
                selection: self.selected.clone(),
                effect: RangeEffect::Unchanged,
                anchor: Some(anchor.clone()),
            };
        }

        let mut selection = self.selected.clone();
        if range.iter().all(|key| self.selected.contains(key)) {
            for key in range {
                selection.remove(key);
            }
            RangeOutcome {
                selection,
                effect: RangeEffect::Deselected(range.len()),
                anchor: None,
            }
        } else {
            selection.extend(range.iter().cloned());
            let added = selection.len() - self.selected.len();
            RangeOutcome {
                selection,
                effect: RangeEffect::Selected(added),
                anchor: Some(anchor.clone()),
            }
        }
    }
}

/// Replace the selection with exactly `keys`.
#[must_use]
pub fn select_all(keys: &[RowKey]) -> SelectionSet {
    keys.iter().cloned().collect()
}

/// Empty selection.
#[must_use]
pub const fn clear() -> SelectionSet {
    SelectionSet::new()
}

/// Drop keys that no longer exist in the registry.
#[must_use]
pub fn retain_known(selected: &SelectionSet, registry: &Registry) -> SelectionSet {
    selected
        .iter()
        .filter(|key| registry.contains(key))
        .cloned()
        .collect()
}

/// Inclusive slice of `visible` between two keys, in either direction.
///
/// Empty when either key is not visible.
#[must_use]
pub fn keys_between<'k>(visible: &'k [RowKey], from: &RowKey, to: &RowKey) -> &'k [RowKey] {
    let position = |needle: &RowKey| visible.iter().position(|key| key == needle);
    match (position(from), position(to)) {
        (Some(start), Some(end)) => &visible[start.min(end)..=start.max(end)],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MenuGroup, MenuItem};

    fn menu() -> Registry {
        let group = |id: &str, children: &[&str]| MenuGroup {
            id: id.into(),
            name: id.to_string(),
            visible: true,
            order: 0,
            children: children
                .iter()
                .map(|child| MenuItem {
                    id: (*child).into(),
                    name: (*child).to_string(),
                    visible: true,
                    order: 0,
                })
                .collect(),
        };
        Registry::build_menu(&[group("g1", &["a", "b", "c"]), group("g2", &["d", "e"])])
    }

    fn label(id: &str) -> RowKey {
        RowKey::flat(EntityKind::Label, id.into())
    }

    fn category(parent: &str, id: &str) -> RowKey {
        RowKey::nested(EntityKind::Category, parent.into(), id.into())
    }

    fn set(keys: &[RowKey]) -> SelectionSet {
        keys.iter().cloned().collect()
    }

    #[test]
    fn picking_every_child_promotes_the_group() {
        let registry = menu();
        let mut selected = SelectionSet::new();
        for id in ["a", "b", "c"] {
            selected = SelectionModel::new(&registry, &selected)
                .toggle_with_hierarchy(&category("g1", id));
        }
        let model = SelectionModel::new(&registry, &selected);
        assert_eq!(model.checkbox_state(&label("g1")), CheckboxState::Checked);
        assert_eq!(model.actionable_roots(), vec![label("g1")]);
        assert_eq!(model.selected_kind(), Some(EntityKind::Label));

        let demoted = model.toggle_with_hierarchy(&category("g1", "b"));
        let model = SelectionModel::new(&registry, &demoted);
        assert_eq!(model.checkbox_state(&label("g1")), CheckboxState::Indeterminate);
        assert!(!demoted.contains(&label("g1")));
        assert_eq!(
            model.actionable_roots(),
            vec![category("g1", "a"), category("g1", "c")]
        );
        assert_eq!(model.selected_kind(), Some(EntityKind::Category));
    }

    #[test]
    fn checkbox_state_tracks_descendant_coverage() {
        let registry = menu();
        let children = registry.descendant_keys(&label("g1")).to_vec();
        for mask in 0_u8..8 {
            let picked: Vec<RowKey> = children
                .iter()
                .enumerate()
                .filter(|(index, _)| mask & (1 << index) != 0)
                .map(|(_, key)| key.clone())
                .collect();
            let selected = set(&picked);
            let state = SelectionModel::new(&registry, &selected).checkbox_state(&label("g1"));
            let expected = match picked.len() {
                0 => CheckboxState::Unchecked,
                3 => CheckboxState::Checked,
                _ => CheckboxState::Indeterminate,
            };
            assert_eq!(state, expected, "mask {mask}");
        }
    }

    #[test]
    fn roots_never_overlap_with_descendants() {
        let registry = menu();
        let selected = set(&[
            label("g1"),
            category("g1", "a"),
            category("g1", "b"),
            category("g1", "c"),
            category("g2", "d"),
        ]);
        let roots = SelectionModel::new(&registry, &selected).actionable_roots();
        assert_eq!(roots, vec![label("g1"), category("g2", "d")]);
        for root in &roots {
            for descendant in registry.descendant_keys(root) {
                assert!(!roots.contains(descendant));
            }
        }
        assert!(!SelectionModel::new(&registry, &selected).is_same_kind());
    }

    #[test]
    fn checked_children_of_unselected_parent_stay_roots() {
        let registry = menu();
        let selected = set(&[category("g2", "d"), category("g2", "e")]);
        let model = SelectionModel::new(&registry, &selected);
        assert_eq!(model.checkbox_state(&label("g2")), CheckboxState::Checked);
        assert_eq!(
            model.actionable_roots(),
            vec![category("g2", "d"), category("g2", "e")]
        );
    }

    #[test]
    fn stale_keys_are_ignored() {
        let registry = menu();
        let selected = set(&[label("gone"), category("g1", "a")]);
        let model = SelectionModel::new(&registry, &selected);
        assert_eq!(model.actionable_roots(), vec![category("g1", "a")]);
        assert_eq!(retain_known(&selected, &registry), set(&[category("g1", "a")]));
    }

    #[test]
    fn parent_toggle_twice_restores_selection() {
        let registry = menu();
        let selected = set(&[
            label("g1"),
            category("g1", "a"),
            category("g1", "b"),
            category("g1", "c"),
            category("g2", "d"),
        ]);
        let once = SelectionModel::new(&registry, &selected).toggle_with_hierarchy(&label("g1"));
        assert_eq!(once, set(&[category("g2", "d")]));
        let twice = SelectionModel::new(&registry, &once).toggle_with_hierarchy(&label("g1"));
        assert_eq!(twice, selected);
    }

    #[test]
    fn indeterminate_parent_toggle_selects_subtree() {
        let registry = menu();
        let selected = set(&[category("g1", "a")]);
        let next = SelectionModel::new(&registry, &selected).toggle_with_hierarchy(&label("g1"));
        assert_eq!(
            next,
            set(&[
                label("g1"),
                category("g1", "a"),
                category("g1", "b"),
                category("g1", "c"),
            ])
        );
    }

    #[test]
    fn header_stats_and_select_all() {
        let registry = menu();
        let visible = vec![label("g1"), label("g2")];
        let empty = SelectionSet::new();
        let model = SelectionModel::new(&registry, &empty);
        assert_eq!(model.header_stats(&visible), HeaderStats::default());
        let all = model.toggle_select_all(&visible);
        let stats = SelectionModel::new(&registry, &all).header_stats(&visible);
        assert!(stats.all_selected);
        assert_eq!(stats.count, 2);
        assert!(SelectionModel::new(&registry, &all)
            .toggle_select_all(&visible)
            .is_empty());

        let partial = set(&[label("g1")]);
        let stats = SelectionModel::new(&registry, &partial).header_stats(&visible);
        assert!(stats.some_selected && !stats.all_selected);
    }

    #[test]
    fn range_select_adds_then_removes() {
        let registry = menu();
        let visible = registry.keys().to_vec();
        let empty = SelectionSet::new();
        let first = SelectionModel::new(&registry, &empty).range_select(
            &visible,
            None,
            &category("g1", "b"),
        );
        assert_eq!(first.effect, RangeEffect::Selected(1));
        let anchor = first.anchor.clone();
        assert_eq!(anchor, Some(category("g1", "b")));

        let second = SelectionModel::new(&registry, &first.selection).range_select(
            &visible,
            anchor.as_ref(),
            &label("g2"),
        );
        assert_eq!(second.effect, RangeEffect::Selected(2));
        assert_eq!(second.selection.len(), 3);

        let third = SelectionModel::new(&registry, &second.selection).range_select(
            &visible,
            anchor.as_ref(),
            &label("g2"),
        );
        assert_eq!(third.effect, RangeEffect::Deselected(3));
        assert!(third.selection.is_empty());
        assert!(third.anchor.is_none());
    }

    #[test]
    fn keys_between_is_direction_independent() {
        let registry = menu();
        let visible = registry.keys();
        let forward = keys_between(visible, &label("g1"), &category("g1", "b"));
        let backward = keys_between(visible, &category("g1", "b"), &label("g1"));
        assert_eq!(forward, backward);
        assert_eq!(forward.len(), 3);
        assert!(keys_between(visible, &label("g1"), &label("nope")).is_empty());
    }
}
