//! Tooltip/highlight coordinator
//!
//! Owns the selection state and the currently hovered key. Every cross-view
//! effect of a hover or click goes through here: the views only report
//! interactions and expose the traits below.

use std::sync::Arc;

use tracing::debug;

use crate::dataset::{CountryKey, DatasetStore};
use crate::events::Interaction;
use crate::state::SelectionState;
use crate::tooltip::{TooltipContent, TooltipField};

/// A view whose marks can be highlighted by country key
pub trait HighlightTarget {
    /// Toggle the hovered look of every mark carrying `key`.
    ///
    /// Must be a no-op when the view has no mark for `key`.
    fn set_highlight(&mut self, key: &CountryKey, on: bool);
}

/// Where tooltip content is displayed
pub trait TooltipSurface {
    fn show(&mut self, content: TooltipContent);
    fn hide(&mut self);
}

/// A view that redraws when the selection changes
pub trait SelectionListener {
    fn on_selection_change(&mut self, store: &DatasetStore, selection: &SelectionState);
}

/// The views a dispatch may touch
pub struct CoordinatorTargets<'a> {
    pub highlights: Vec<&'a mut dyn HighlightTarget>,
    pub tooltip: &'a mut dyn TooltipSurface,
    pub chart: &'a mut dyn SelectionListener,
}

impl CoordinatorTargets<'_> {
    fn highlight_all(&mut self, key: &CountryKey, on: bool) {
        for target in self.highlights.iter_mut() {
            target.set_highlight(key, on);
        }
    }
}

/// Synchronizes hover highlight, tooltip and chart selection across views
pub struct Coordinator {
    store: Arc<DatasetStore>,
    selection: SelectionState,
    hovered: Option<CountryKey>,
    tooltip_fields: Vec<TooltipField>,
}

impl Coordinator {
    /// Create a coordinator over `store`.
    ///
    /// An initial indicator the store does not know is dropped.
    pub fn new(
        store: Arc<DatasetStore>,
        initial_indicator: Option<String>,
        tooltip_fields: Vec<TooltipField>,
    ) -> Self {
        let initial_indicator = initial_indicator.filter(|i| store.has_indicator(i));
        Self {
            store,
            selection: SelectionState::new(initial_indicator),
            hovered: None,
            tooltip_fields,
        }
    }

    pub fn store(&self) -> &Arc<DatasetStore> {
        &self.store
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Key currently in the hovered state, if any
    pub fn hovered(&self) -> Option<&CountryKey> {
        self.hovered.as_ref()
    }

    /// Apply one interaction. Returns whether any view state changed.
    pub fn dispatch(&mut self, interaction: Interaction, targets: &mut CoordinatorTargets<'_>) -> bool {
        debug!(?interaction, "Dispatching interaction");
        match interaction {
            Interaction::Hover(key) => self.hover(&key, targets),
            Interaction::HoverEnd(key) => self.unhover(&key, targets),
            Interaction::Click(key) => self.click(&key, targets),
            Interaction::IndicatorChanged(indicator) => self.select_indicator(indicator, targets),
            Interaction::ClearCountry => self.clear_country(targets),
        }
    }

    /// Enter the hovered state for `key` in every view
    pub fn hover(&mut self, key: &CountryKey, targets: &mut CoordinatorTargets<'_>) -> bool {
        let Some(record) = self.store.get(key) else {
            return false;
        };
        if self.hovered.as_ref() == Some(key) {
            return false;
        }

        // A hover-end that never arrived must not leave a second highlight behind
        if let Some(previous) = self.hovered.take() {
            targets.highlight_all(&previous, false);
        }

        targets.highlight_all(key, true);
        targets.tooltip.show(TooltipContent::from_record(record, &self.tooltip_fields));
        self.hovered = Some(key.clone());
        true
    }

    /// Return `key` to idle in every view, unless another key took over since
    pub fn unhover(&mut self, key: &CountryKey, targets: &mut CoordinatorTargets<'_>) -> bool {
        if self.hovered.as_ref() != Some(key) {
            return false;
        }

        targets.highlight_all(key, false);
        targets.tooltip.hide();
        self.hovered = None;
        true
    }

    /// Select `key` for the line chart when an indicator is chosen
    pub fn click(&mut self, key: &CountryKey, targets: &mut CoordinatorTargets<'_>) -> bool {
        if !self.store.contains(key) || self.selection.selected_indicator.is_none() {
            return false;
        }

        self.selection.selected_country = Some(key.clone());
        self.notify_chart(targets);
        true
    }

    /// Switch the chart to another indicator
    pub fn select_indicator(&mut self, indicator: String, targets: &mut CoordinatorTargets<'_>) -> bool {
        if !self.store.has_indicator(&indicator) {
            return false;
        }

        self.selection.selected_indicator = Some(indicator);
        self.notify_chart(targets);
        true
    }

    /// Go back to the average over all countries
    pub fn clear_country(&mut self, targets: &mut CoordinatorTargets<'_>) -> bool {
        if self.selection.selected_country.take().is_none() {
            return false;
        }

        self.notify_chart(targets);
        true
    }

    /// Draw the chart for the current selection, e.g. right after loading
    pub fn refresh_chart(&self, targets: &mut CoordinatorTargets<'_>) {
        if self.selection.selected_indicator.is_some() {
            self.notify_chart(targets);
        }
    }

    fn notify_chart(&self, targets: &mut CoordinatorTargets<'_>) {
        targets.chart.on_selection_change(&self.store, &self.selection);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::CountryRecord;
    use std::collections::BTreeSet;

    #[derive(Default)]
    struct RecordingView {
        marks: BTreeSet<CountryKey>,
        highlighted: BTreeSet<CountryKey>,
    }

    impl RecordingView {
        fn with_marks(keys: &[&str]) -> Self {
            Self {
                marks: keys.iter().map(|k| CountryKey::new(*k)).collect(),
                highlighted: BTreeSet::new(),
            }
        }
    }

    impl HighlightTarget for RecordingView {
        fn set_highlight(&mut self, key: &CountryKey, on: bool) {
            if !self.marks.contains(key) {
                return;
            }
            if on {
                self.highlighted.insert(key.clone());
            } else {
                self.highlighted.remove(key);
            }
        }
    }

    #[derive(Default)]
    struct RecordingTooltip {
        shown: Option<TooltipContent>,
    }

    impl TooltipSurface for RecordingTooltip {
        fn show(&mut self, content: TooltipContent) {
            self.shown = Some(content);
        }

        fn hide(&mut self) {
            self.shown = None;
        }
    }

    #[derive(Default)]
    struct RecordingChart {
        renders: Vec<SelectionState>,
    }

    impl SelectionListener for RecordingChart {
        fn on_selection_change(&mut self, _store: &DatasetStore, selection: &SelectionState) {
            self.renders.push(selection.clone());
        }
    }

    struct Harness {
        map: RecordingView,
        scatter: RecordingView,
        tooltip: RecordingTooltip,
        chart: RecordingChart,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                map: RecordingView::with_marks(&["A", "B", "Unlisted"]),
                scatter: RecordingView::with_marks(&["A", "B"]),
                tooltip: RecordingTooltip::default(),
                chart: RecordingChart::default(),
            }
        }

        fn run(&mut self, coordinator: &mut Coordinator, interactions: Vec<Interaction>) {
            let mut targets = CoordinatorTargets {
                highlights: vec![&mut self.map as &mut dyn HighlightTarget, &mut self.scatter],
                tooltip: &mut self.tooltip,
                chart: &mut self.chart,
            };
            for interaction in interactions {
                coordinator.dispatch(interaction, &mut targets);
            }
        }
    }

    fn store() -> Arc<DatasetStore> {
        let mut a = CountryRecord::new(CountryKey::new("A"));
        a.current.insert("gdp".into(), 1.0);
        let b = CountryRecord::new(CountryKey::new("B"));
        Arc::new(DatasetStore::new(vec!["gdp".into()], vec![a, b]))
    }

    fn key(name: &str) -> CountryKey {
        CountryKey::new(name)
    }

    #[test]
    fn test_hover_then_unhover_restores_idle() {
        let mut coordinator = Coordinator::new(store(), Some("gdp".into()), TooltipField::defaults());
        let mut harness = Harness::new();

        harness.run(&mut coordinator, vec![Interaction::Hover(key("A"))]);
        assert!(harness.map.highlighted.contains(&key("A")));
        assert!(harness.scatter.highlighted.contains(&key("A")));
        assert_eq!(harness.tooltip.shown.as_ref().map(|t| t.title.as_str()), Some("A"));

        harness.run(&mut coordinator, vec![Interaction::HoverEnd(key("A"))]);
        assert!(harness.map.highlighted.is_empty());
        assert!(harness.scatter.highlighted.is_empty());
        assert!(harness.tooltip.shown.is_none());
        assert_eq!(coordinator.hovered(), None);
    }

    #[test]
    fn test_hover_unknown_country_is_noop() {
        let mut coordinator = Coordinator::new(store(), Some("gdp".into()), TooltipField::defaults());
        let mut harness = Harness::new();

        harness.run(&mut coordinator, vec![Interaction::Hover(key("Unlisted"))]);
        assert!(harness.map.highlighted.is_empty());
        assert!(harness.tooltip.shown.is_none());
        assert_eq!(coordinator.hovered(), None);
    }

    #[test]
    fn test_rapid_hover_leaves_single_highlight() {
        let mut coordinator = Coordinator::new(store(), Some("gdp".into()), TooltipField::defaults());
        let mut harness = Harness::new();

        harness.run(
            &mut coordinator,
            vec![
                Interaction::Hover(key("A")),
                Interaction::Hover(key("B")),
                Interaction::Hover(key("A")),
            ],
        );

        let expected: BTreeSet<CountryKey> = [key("A")].into_iter().collect();
        assert_eq!(harness.map.highlighted, expected);
        assert_eq!(harness.scatter.highlighted, expected);
        assert_eq!(coordinator.hovered(), Some(&key("A")));
    }

    #[test]
    fn test_stale_unhover_keeps_current_highlight() {
        let mut coordinator = Coordinator::new(store(), Some("gdp".into()), TooltipField::defaults());
        let mut harness = Harness::new();

        harness.run(
            &mut coordinator,
            vec![
                Interaction::Hover(key("A")),
                Interaction::Hover(key("B")),
                Interaction::HoverEnd(key("A")),
            ],
        );

        assert!(harness.map.highlighted.contains(&key("B")));
        assert!(!harness.map.highlighted.contains(&key("A")));
        assert_eq!(harness.tooltip.shown.as_ref().map(|t| t.title.as_str()), Some("B"));
    }

    #[test]
    fn test_click_without_indicator_does_nothing() {
        let mut coordinator = Coordinator::new(store(), None, TooltipField::defaults());
        let mut harness = Harness::new();

        harness.run(&mut coordinator, vec![Interaction::Click(key("A"))]);
        assert_eq!(coordinator.selection(), &SelectionState::default());
        assert!(harness.chart.renders.is_empty());
    }

    #[test]
    fn test_click_selects_country_and_redraws_chart() {
        let mut coordinator = Coordinator::new(store(), Some("gdp".into()), TooltipField::defaults());
        let mut harness = Harness::new();

        harness.run(&mut coordinator, vec![Interaction::Click(key("B"))]);
        assert_eq!(coordinator.selection().selected_country, Some(key("B")));
        assert_eq!(harness.chart.renders.len(), 1);

        // Highlight state is not touched by a click
        assert!(harness.map.highlighted.is_empty());
    }

    #[test]
    fn test_click_unknown_country_is_ignored() {
        let mut coordinator = Coordinator::new(store(), Some("gdp".into()), TooltipField::defaults());
        let mut harness = Harness::new();

        harness.run(&mut coordinator, vec![Interaction::Click(key("Unlisted"))]);
        assert_eq!(coordinator.selection().selected_country, None);
        assert!(harness.chart.renders.is_empty());
    }

    #[test]
    fn test_indicator_change_and_clear() {
        let mut coordinator = Coordinator::new(store(), None, TooltipField::defaults());
        let mut harness = Harness::new();

        harness.run(
            &mut coordinator,
            vec![
                Interaction::IndicatorChanged("unknown".into()),
                Interaction::IndicatorChanged("gdp".into()),
                Interaction::Click(key("A")),
                Interaction::ClearCountry,
            ],
        );

        assert_eq!(harness.chart.renders.len(), 3);
        assert_eq!(harness.chart.renders[1].selected_country, Some(key("A")));
        assert_eq!(coordinator.selection(), &SelectionState::new(Some("gdp".into())));
    }

    #[test]
    fn test_unknown_initial_indicator_is_dropped() {
        let coordinator = Coordinator::new(store(), Some("rainfall".into()), Vec::new());
        assert_eq!(coordinator.selection().selected_indicator, None);
    }
}
