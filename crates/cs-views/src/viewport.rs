//! Viewport - docks the three dashboard views

use cs_core::ViewerContext;
use egui::{ScrollArea, Ui, WidgetText};
use egui_dock::{DockArea, DockState, NodeIndex, Style, TabViewer};

use crate::DashboardViews;

/// The dockable panels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DashboardTab {
    Map,
    Scatter,
    LineChart,
}

impl DashboardTab {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Map => "World Map",
            Self::Scatter => "PCA",
            Self::LineChart => "Time Series",
        }
    }
}

/// Map and scatter side by side above the line chart
pub struct Viewport {
    dock_state: DockState<DashboardTab>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewport {
    pub fn new() -> Self {
        let mut dock_state = DockState::new(vec![DashboardTab::Map]);
        let surface = dock_state.main_surface_mut();
        let [top, _chart] = surface.split_below(NodeIndex::root(), 0.58, vec![DashboardTab::LineChart]);
        surface.split_right(top, 0.66, vec![DashboardTab::Scatter]);
        Self { dock_state }
    }

    pub fn ui(&mut self, ui: &mut Ui, views: &mut DashboardViews, ctx: &ViewerContext) {
        DockArea::new(&mut self.dock_state)
            .style(Style::from_egui(ui.style().as_ref()))
            .show_close_buttons(false)
            .draggable_tabs(true)
            .show_inside(ui, &mut DashboardTabViewer { views, ctx });
    }
}

struct DashboardTabViewer<'a> {
    views: &'a mut DashboardViews,
    ctx: &'a ViewerContext,
}

impl TabViewer for DashboardTabViewer<'_> {
    type Tab = DashboardTab;

    fn title(&mut self, tab: &mut Self::Tab) -> WidgetText {
        tab.title().into()
    }

    fn ui(&mut self, ui: &mut Ui, tab: &mut Self::Tab) {
        // Surfaces have fixed sizes; scroll when the panel is smaller
        ScrollArea::both().id_source(tab.title()).show(ui, |ui| match tab {
            DashboardTab::Map => self.views.map.ui(ui),
            DashboardTab::Scatter => self.views.scatter.ui(ui),
            DashboardTab::LineChart => self.views.chart.ui(self.ctx, ui),
        });
    }
}
