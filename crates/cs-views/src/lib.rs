//! Views of the country dashboard
//!
//! The map, scatter and line chart each own their marks and scales. They
//! report pointer activity through their handlers and are changed only by the
//! coordinator, through [`DashboardViews::targets`].

pub mod colors;
mod line_chart;
mod map_view;
pub mod marks;
pub mod projection;
mod scatter_view;
mod tooltip;
mod viewport;

pub use line_chart::{ease_in_out_cubic, ChartFrame, LineChartView};
pub use map_view::MapView;
pub use marks::{HoverTracker, PointStyle, PolygonStyle};
pub use projection::EqualEarth;
pub use scatter_view::{Margins, ScatterView};
pub use tooltip::{TooltipView, TOOLTIP_INSET};
pub use viewport::{DashboardTab, Viewport};

use cs_core::{CoordinatorTargets, HighlightTarget, InteractionQueue, MarkHandlers};
use egui::Vec2;

/// Surface sizes in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSizes {
    pub map: Vec2,
    pub scatter: Vec2,
    pub line_chart: Vec2,
}

impl Default for SurfaceSizes {
    fn default() -> Self {
        Self {
            map: Vec2::new(800.0, 500.0),
            scatter: Vec2::new(400.0, 400.0),
            line_chart: Vec2::new(800.0, 400.0),
        }
    }
}

/// Every view of the dashboard
pub struct DashboardViews {
    pub map: MapView,
    pub scatter: ScatterView,
    pub chart: LineChartView,
    pub tooltip: TooltipView,
}

impl DashboardViews {
    /// Views whose handlers publish onto `queue`
    pub fn new(sizes: SurfaceSizes, transition_secs: f64, queue: &InteractionQueue) -> Self {
        Self {
            map: MapView::new(sizes.map, MarkHandlers::publishing_to(queue)),
            scatter: ScatterView::new(sizes.scatter, MarkHandlers::publishing_to(queue)),
            chart: LineChartView::new(sizes.line_chart, transition_secs),
            tooltip: TooltipView::new(),
        }
    }

    /// What the coordinator may change
    pub fn targets(&mut self) -> CoordinatorTargets<'_> {
        CoordinatorTargets {
            highlights: vec![&mut self.map as &mut dyn HighlightTarget, &mut self.scatter],
            tooltip: &mut self.tooltip,
            chart: &mut self.chart,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use cs_core::{
        Coordinator, CountryKey, CountryRecord, DatasetStore, IndicatorValues, Interaction, ProjectedPoint,
        TooltipField,
    };
    use cs_data::GeometryFeature;
    use geo::{polygon, MultiPolygon};

    fn store() -> Arc<DatasetStore> {
        let mut chile = CountryRecord::new("Chile".into());
        chile.projected = Some(ProjectedPoint::new(-1.0, 0.5));
        chile.current.insert("gdp_per_capita_current_us".into(), 13231.7);
        let mut values = IndicatorValues::new();
        values.insert("gdp_per_capita_current_us".into(), 13231.7);
        chile.history.insert(2020, values);

        let mut peru = CountryRecord::new("Peru".into());
        peru.projected = Some(ProjectedPoint::new(1.0, -0.5));

        Arc::new(DatasetStore::new(vec!["gdp_per_capita_current_us".into()], vec![chile, peru]))
    }

    fn feature(name: &str, lon: f64) -> GeometryFeature {
        GeometryFeature {
            key: Some(name.into()),
            geometry: MultiPolygon::new(vec![polygon![
                (x: lon, y: -30.0),
                (x: lon + 5.0, y: -30.0),
                (x: lon + 5.0, y: -20.0),
                (x: lon, y: -20.0),
                (x: lon, y: -30.0),
            ]]),
        }
    }

    fn dashboard(store: &DatasetStore, queue: &InteractionQueue) -> DashboardViews {
        let mut views = DashboardViews::new(SurfaceSizes::default(), 0.75, queue);
        views.map.render(&[feature("Chile", -72.0), feature("Peru", -60.0)], store);
        views.scatter.render(&store.projected_points());
        views
    }

    #[test]
    fn test_hover_then_unhover_restores_every_view() {
        let store = store();
        let queue = InteractionQueue::new();
        let mut views = dashboard(&store, &queue);
        let mut coordinator = Coordinator::new(store.clone(), None, TooltipField::defaults());

        let map_baseline = views.map.styles();
        let scatter_baseline = views.scatter.styles();
        let chile = CountryKey::new("Chile");

        coordinator.dispatch(Interaction::Hover(chile.clone()), &mut views.targets());
        assert_eq!(views.map.style_of(&chile), Some(PolygonStyle::highlighted()));
        assert_eq!(views.scatter.style_of(&chile), Some(PointStyle::HIGHLIGHTED));
        assert_eq!(views.tooltip.content().map(|c| c.title.as_str()), Some("Chile"));

        coordinator.dispatch(Interaction::HoverEnd(chile), &mut views.targets());
        assert_eq!(views.map.styles(), map_baseline);
        assert_eq!(views.scatter.styles(), scatter_baseline);
        assert!(!views.tooltip.is_visible());
    }

    #[test]
    fn test_hover_sequence_leaves_one_highlight() {
        let store = store();
        let queue = InteractionQueue::new();
        let mut views = dashboard(&store, &queue);
        let mut coordinator = Coordinator::new(store.clone(), None, TooltipField::defaults());
        let chile = CountryKey::new("Chile");
        let peru = CountryKey::new("Peru");

        for key in [&chile, &peru, &chile] {
            coordinator.dispatch(Interaction::Hover(key.clone()), &mut views.targets());
        }

        assert_eq!(views.scatter.style_of(&chile), Some(PointStyle::HIGHLIGHTED));
        assert_eq!(views.scatter.style_of(&peru), Some(PointStyle::BASELINE));
        assert_eq!(views.map.style_of(&peru), Some(PolygonStyle::baseline(true)));
    }

    #[test]
    fn test_click_drives_line_chart() {
        let store = store();
        let queue = InteractionQueue::new();
        let mut views = dashboard(&store, &queue);
        let mut coordinator =
            Coordinator::new(store.clone(), Some("gdp_per_capita_current_us".into()), TooltipField::defaults());

        coordinator.dispatch(Interaction::Click("Chile".into()), &mut views.targets());
        assert!(views.chart.is_rendered());
        assert_eq!(views.chart.title(), "gdp_per_capita_current_us for Chile");

        coordinator.dispatch(Interaction::ClearCountry, &mut views.targets());
        assert_eq!(
            views.chart.title(),
            "Average gdp_per_capita_current_us Across All Countries"
        );
    }
}
