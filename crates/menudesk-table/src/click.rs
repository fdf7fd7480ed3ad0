//! Row click handling for flat and hierarchical tables.
//!
//! # Design
//! - A click resolves the row identity, optionally syncs expansion and then
//!   replaces the caller's selection with the toggled set.
//! - An indeterminate group keeps its expansion so the children being picked
//!   stay visible.
//! - Double clicks only navigate; `ClickDisambiguator` holds a single click
//!   back long enough for a double click to cancel it.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::EngineTimings;
use crate::key::RowKey;
use crate::registry::Registry;
use crate::selection::{CheckboxState, RangeOutcome, SelectionModel};
use crate::store::{ExpandStore, Navigator, SelectionStore};
use crate::timer::TimerSlot;

/// What a single click changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClickEffect {
    /// Whether the row's expand state was toggled.
    pub expand_toggled: bool,
    /// Checkbox state of the row after the click.
    pub state: CheckboxState,
}

/// Maps row clicks onto selection, expansion and navigation.
#[derive(Clone, Copy, Debug)]
pub struct RowClickHandler<'a> {
    registry: &'a Registry,
    hierarchical: bool,
}

impl<'a> RowClickHandler<'a> {
    /// Handler for flat tables: every click is a simple toggle.
    #[must_use]
    pub const fn flat(registry: &'a Registry) -> Self {
        Self {
            registry,
            hierarchical: false,
        }
    }

    /// Handler for nested tables: groups act as master switches.
    #[must_use]
    pub const fn hierarchical(registry: &'a Registry) -> Self {
        Self {
            registry,
            hierarchical: true,
        }
    }

    /// Apply a single click to `key`.
    ///
    /// Returns `None` when the key is not part of the registry.
    pub fn handle_click(
        &self,
        key: &RowKey,
        selection: &mut dyn SelectionStore,
        expand: Option<&mut dyn ExpandStore>,
    ) -> Option<ClickEffect> {
        let identity = self.registry.get(key)?;
        let model = SelectionModel::new(self.registry, selection.selected());
        let before = model.checkbox_state(key);

        let mut expand_toggled = false;
        if let (Some(expand_key), Some(expand)) = (identity.expand_key.as_ref(), expand)
            && before != CheckboxState::Indeterminate
        {
            expand.toggle_expand(expand_key);
            expand_toggled = true;
        }

        let next = if self.hierarchical {
            model.toggle_with_hierarchy(key)
        } else {
            model.toggle_simple(key)
        };
        selection.replace(next);

        let state = SelectionModel::new(self.registry, selection.selected()).checkbox_state(key);
        debug!(row = %key, ?before, ?state, expand_toggled, "row click applied");
        Some(ClickEffect {
            expand_toggled,
            state,
        })
    }

    /// Navigate to the row's detail view. Returns whether navigation ran.
    pub fn handle_double_click(&self, key: &RowKey, navigator: Option<&mut dyn Navigator>) -> bool {
        let (Some(navigator), Some(identity)) = (navigator, self.registry.get(key)) else {
            return false;
        };
        debug!(row = %key, "row double click navigates");
        navigator.navigate(identity.kind, &identity.entity_id);
        true
    }

    /// Extend the selection from `anchor` to `key` over the visible rows.
    ///
    /// Returns `None` when the key is not part of the registry.
    pub fn handle_shift_click(
        &self,
        key: &RowKey,
        visible: &[RowKey],
        anchor: Option<&RowKey>,
        selection: &mut dyn SelectionStore,
    ) -> Option<RangeOutcome> {
        self.registry.get(key)?;
        let outcome =
            SelectionModel::new(self.registry, selection.selected()).range_select(visible, anchor, key);
        selection.replace(outcome.selection.clone());
        debug!(row = %key, effect = ?outcome.effect, "range selection applied");
        Some(outcome)
    }
}

/// Pointer event after disambiguation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickEvent {
    /// Deferred single click that was not followed by a double click.
    Single(RowKey),
    /// Double click; any pending single click was dropped.
    Double(RowKey),
    /// Shift-click, released immediately.
    Range(RowKey),
}

/// Tells single clicks from double clicks using one deferred task.
#[derive(Clone, Debug)]
pub struct ClickDisambiguator {
    delay: Duration,
    pending: TimerSlot<RowKey>,
}

impl Default for ClickDisambiguator {
    fn default() -> Self {
        Self::from_timings(&EngineTimings::default())
    }
}

impl ClickDisambiguator {
    /// Disambiguator holding single clicks back for `delay`.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: TimerSlot::default(),
        }
    }

    /// Disambiguator using the configured click delay.
    #[must_use]
    pub fn from_timings(timings: &EngineTimings) -> Self {
        Self::new(timings.click_delay)
    }

    /// Register a click. Shift-clicks are released at once; plain clicks are
    /// deferred and replace any click still pending.
    pub fn click(&mut self, key: RowKey, shift: bool, now: Instant) -> Option<ClickEvent> {
        if shift {
            self.pending.cancel();
            return Some(ClickEvent::Range(key));
        }
        self.pending.schedule(now, self.delay, key);
        None
    }

    /// Register a double click, dropping the pending single click.
    pub fn double_click(&mut self, key: RowKey) -> ClickEvent {
        self.pending.cancel();
        ClickEvent::Double(key)
    }

    /// Release the pending single click once its delay has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<ClickEvent> {
        self.pending.fire_if_due(now).map(ClickEvent::Single)
    }

    /// Whether a single click is waiting.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_armed()
    }

    /// Drop any pending click, e.g. when the row unmounts.
    pub fn cancel(&mut self) {
        self.pending.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::key::{EntityId, EntityKind};
    use crate::model::{MenuGroup, MenuItem};
    use crate::store::MemorySelectionStore;

    #[derive(Default)]
    struct Expanded(BTreeSet<EntityId>);

    impl ExpandStore for Expanded {
        fn is_expanded(&self, id: &EntityId) -> bool {
            self.0.contains(id)
        }

        fn toggle_expand(&mut self, id: &EntityId) {
            if !self.0.remove(id) {
                self.0.insert(id.clone());
            }
        }
    }

    fn registry() -> Registry {
        let items = |ids: &[&str]| {
            ids.iter()
                .map(|id| MenuItem {
                    id: (*id).into(),
                    name: (*id).to_string(),
                    visible: true,
                    order: 0,
                })
                .collect()
        };
        Registry::build_menu(&[
            MenuGroup {
                id: "g1".into(),
                name: "G1".into(),
                visible: true,
                order: 0,
                children: items(&["a", "b", "c"]),
            },
            MenuGroup {
                id: "g2".into(),
                name: "G2".into(),
                visible: true,
                order: 1,
                children: Vec::new(),
            },
        ])
    }

    fn label(id: &str) -> RowKey {
        RowKey::flat(EntityKind::Label, id.into())
    }

    fn category(id: &str) -> RowKey {
        RowKey::nested(EntityKind::Category, "g1".into(), id.into())
    }

    #[test]
    fn indeterminate_group_click_keeps_expansion() {
        let registry = registry();
        let handler = RowClickHandler::hierarchical(&registry);
        let mut selection = MemorySelectionStore::from_keys(&[category("a")]);
        let mut expand = Expanded::default();

        let effect = handler
            .handle_click(&label("g1"), &mut selection, Some(&mut expand))
            .expect("row exists");

        assert!(!effect.expand_toggled);
        assert!(!expand.is_expanded(&"g1".into()));
        assert_eq!(effect.state, CheckboxState::Checked);
        assert_eq!(selection.selected().len(), 4);
    }

    #[test]
    fn unchecked_group_click_expands_and_selects() {
        let registry = registry();
        let handler = RowClickHandler::hierarchical(&registry);
        let mut selection = MemorySelectionStore::new();
        let mut expand = Expanded::default();

        let effect = handler
            .handle_click(&label("g1"), &mut selection, Some(&mut expand))
            .expect("row exists");
        assert!(effect.expand_toggled);
        assert!(expand.is_expanded(&"g1".into()));

        handler.handle_click(&label("g1"), &mut selection, Some(&mut expand));
        assert!(!expand.is_expanded(&"g1".into()));
        assert!(selection.selected().is_empty());
    }

    #[test]
    fn childless_group_never_expands() {
        let registry = registry();
        let handler = RowClickHandler::hierarchical(&registry);
        let mut selection = MemorySelectionStore::new();
        let mut expand = Expanded::default();
        let effect = handler
            .handle_click(&label("g2"), &mut selection, Some(&mut expand))
            .expect("row exists");
        assert!(!effect.expand_toggled);
        assert!(selection.selected().contains(&label("g2")));
    }

    #[test]
    fn flat_handler_uses_simple_toggle() {
        let registry = registry();
        let handler = RowClickHandler::flat(&registry);
        let mut selection = MemorySelectionStore::new();
        handler.handle_click(&label("g1"), &mut selection, None);
        assert_eq!(selection.selected().len(), 1);
    }

    #[test]
    fn unknown_rows_are_ignored() {
        let registry = registry();
        let handler = RowClickHandler::hierarchical(&registry);
        let mut selection = MemorySelectionStore::new();
        assert!(handler.handle_click(&label("zz"), &mut selection, None).is_none());
        let mut visits = Vec::new();
        let mut navigator = |kind: EntityKind, id: &EntityId| visits.push((kind, id.clone()));
        assert!(!handler.handle_double_click(&label("zz"), Some(&mut navigator)));
        assert!(handler.handle_double_click(&category("b"), Some(&mut navigator)));
        assert!(!handler.handle_double_click(&category("b"), None));
        assert_eq!(visits, vec![(EntityKind::Category, EntityId::from("b"))]);
    }

    #[test]
    fn shift_click_selects_visible_range() {
        let registry = registry();
        let handler = RowClickHandler::hierarchical(&registry);
        let mut selection = MemorySelectionStore::from_keys(&[category("a")]);
        let visible = registry.keys().to_vec();
        let outcome = handler
            .handle_shift_click(&category("c"), &visible, Some(&category("a")), &mut selection)
            .expect("row exists");
        assert_eq!(outcome.anchor, Some(category("a")));
        assert_eq!(selection.selected().len(), 3);
    }

    #[test]
    fn double_click_cancels_pending_single_click() {
        let start = Instant::now();
        let mut clicks = ClickDisambiguator::default();
        assert_eq!(clicks.click(label("g1"), false, start), None);
        assert!(clicks.is_pending());
        assert_eq!(clicks.double_click(label("g1")), ClickEvent::Double(label("g1")));
        assert_eq!(clicks.poll(start + Duration::from_secs(1)), None);
    }

    #[test]
    fn single_click_released_after_delay() {
        let start = Instant::now();
        let mut clicks = ClickDisambiguator::new(Duration::from_millis(200));
        clicks.click(label("g1"), false, start);
        assert_eq!(clicks.poll(start + Duration::from_millis(150)), None);
        assert_eq!(
            clicks.poll(start + Duration::from_millis(200)),
            Some(ClickEvent::Single(label("g1")))
        );
        assert!(!clicks.is_pending());
    }

    #[test]
    fn shift_click_bypasses_delay() {
        let start = Instant::now();
        let mut clicks = ClickDisambiguator::default();
        clicks.click(label("g1"), false, start);
        assert_eq!(
            clicks.click(label("g2"), true, start),
            Some(ClickEvent::Range(label("g2")))
        );
        assert!(!clicks.is_pending());
        clicks.click(label("g1"), false, start);
        clicks.cancel();
        assert_eq!(clicks.poll(start + Duration::from_secs(1)), None);
    }
}
