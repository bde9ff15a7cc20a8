//! The eframe application: loading, the frame loop and view wiring

use std::sync::Arc;

use cs_core::{Coordinator, DatasetStore, Interaction, InteractionQueue, TooltipField, ViewerContext};
use cs_data::{load_dataset, load_topology, DataResult, GeometryFeature};
use cs_ui::{apply_theme, status_screen, top_bar, Theme, TopBarState};
use cs_views::{DashboardViews, SurfaceSizes, Viewport};
use eframe::egui::{self, Context};
use tokio::runtime::Runtime;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{error, info, warn};

use crate::config::DashboardConfig;

/// Views, coordinator and the interaction queue between them
///
/// Holds no egui context, so the wiring can be driven directly.
pub struct Dashboard {
    queue: InteractionQueue,
    views: DashboardViews,
    coordinator: Option<Coordinator>,
    features: Option<Vec<GeometryFeature>>,
    initial_indicator: Option<String>,
    tooltip_fields: Vec<TooltipField>,
}

impl Dashboard {
    pub fn new(
        sizes: SurfaceSizes,
        transition_secs: f64,
        initial_indicator: Option<String>,
        tooltip_fields: Vec<TooltipField>,
    ) -> Self {
        let queue = InteractionQueue::new();
        let views = DashboardViews::new(sizes, transition_secs, &queue);
        Self {
            queue,
            views,
            coordinator: None,
            features: None,
            initial_indicator,
            tooltip_fields,
        }
    }

    pub fn queue(&self) -> &InteractionQueue {
        &self.queue
    }

    pub fn views(&self) -> &DashboardViews {
        &self.views
    }

    pub fn coordinator(&self) -> Option<&Coordinator> {
        self.coordinator.as_ref()
    }

    /// Build the coordinator and the data-driven views once the dataset is in
    pub fn on_dataset(&mut self, store: DatasetStore) {
        let store = Arc::new(store);
        let indicator = self
            .initial_indicator
            .clone()
            .filter(|i| store.has_indicator(i))
            .or_else(|| store.indicators().first().cloned());
        if indicator.is_none() {
            warn!("Dataset has no indicator columns");
        }

        let coordinator = Coordinator::new(store.clone(), indicator, self.tooltip_fields.clone());
        self.views.scatter.render(&store.projected_points());
        coordinator.refresh_chart(&mut self.views.targets());
        self.coordinator = Some(coordinator);
        info!("Dashboard ready with {} countries", store.len());

        self.render_map();
    }

    pub fn on_topology(&mut self, features: Vec<GeometryFeature>) {
        self.features = Some(features);
        self.render_map();
    }

    // The map needs both the outlines and the dataset
    fn render_map(&mut self) {
        let Some(coordinator) = &self.coordinator else {
            return;
        };
        if let Some(features) = self.features.take() {
            self.views.map.render(&features, coordinator.store());
        }
    }

    /// Apply every pending interaction. Returns whether any view changed.
    pub fn process_interactions(&mut self) -> bool {
        let pending = self.queue.drain();
        let Some(coordinator) = &mut self.coordinator else {
            return false;
        };

        let mut changed = false;
        for interaction in pending {
            changed |= coordinator.dispatch(interaction, &mut self.views.targets());
        }
        changed
    }
}

/// One input still being read on the runtime
enum Pending<T> {
    Waiting(oneshot::Receiver<DataResult<T>>),
    Finished,
}

impl<T> Pending<T> {
    fn spawn<F>(runtime: &Runtime, ctx: &Context, load: F) -> Self
    where
        F: std::future::Future<Output = DataResult<T>> + Send + 'static,
        T: Send + 'static,
    {
        let (sender, receiver) = oneshot::channel();
        let ctx = ctx.clone();
        runtime.spawn(async move {
            let _ = sender.send(load.await);
            ctx.request_repaint();
        });
        Pending::Waiting(receiver)
    }

    /// The result, the first time it is available
    fn poll(&mut self) -> Option<DataResult<T>> {
        let Pending::Waiting(receiver) = self else {
            return None;
        };
        match receiver.try_recv() {
            Ok(result) => {
                *self = Pending::Finished;
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => {
                error!("Loader task ended without a result");
                *self = Pending::Finished;
                None
            }
        }
    }

    fn is_waiting(&self) -> bool {
        matches!(self, Pending::Waiting(_))
    }
}

/// Main application state
pub struct DashboardApp {
    dashboard: Dashboard,

    /// The viewport managing the docked views
    viewport: Viewport,

    dataset: Pending<DatasetStore>,
    topology: Pending<Vec<GeometryFeature>>,

    dataset_failed: bool,
    map_failed: bool,

    /// Keeps the loader tasks alive
    _runtime: Runtime,
}

impl DashboardApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: DashboardConfig, runtime: Runtime) -> Self {
        apply_theme(&cc.egui_ctx, &Theme { dark_mode: config.ui.dark_mode });

        let dashboard = Dashboard::new(
            SurfaceSizes::from(&config.surfaces),
            config.chart.transition_secs(),
            config.ui.initial_indicator.clone(),
            config.tooltip.clone(),
        );

        let mut dataset_failed = false;
        let dataset = match config.data.input() {
            Ok(input) => {
                let options = config.data.tabular.clone();
                Pending::spawn(&runtime, &cc.egui_ctx, async move { load_dataset(&input, &options).await })
            }
            Err(e) => {
                error!("{e:#}");
                dataset_failed = true;
                Pending::Finished
            }
        };

        let data = config.data.clone();
        let topology = Pending::spawn(&runtime, &cc.egui_ctx, async move {
            load_topology(&data.topology, &data.topology_object, &data.join_property).await
        });

        Self {
            dashboard,
            viewport: Viewport::new(),
            dataset,
            topology,
            dataset_failed,
            map_failed: false,
            _runtime: runtime,
        }
    }

    fn poll_loading(&mut self) {
        match self.dataset.poll() {
            Some(Ok(store)) => self.dashboard.on_dataset(store),
            Some(Err(e)) => {
                error!("Failed to load dataset: {e}");
                self.dataset_failed = true;
            }
            None => {}
        }

        match self.topology.poll() {
            Some(Ok(features)) => self.dashboard.on_topology(features),
            Some(Err(e)) => {
                // The scatter and line chart still work without outlines
                error!("Failed to load world topology: {e}");
                self.map_failed = true;
            }
            None => {}
        }
    }

    fn status_text(&self) -> String {
        if self.dataset.is_waiting() || self.topology.is_waiting() {
            return "Loading…".to_string();
        }
        if self.dataset_failed {
            return "Dataset unavailable".to_string();
        }
        if self.map_failed {
            return "Map unavailable".to_string();
        }
        match self.dashboard.coordinator() {
            Some(coordinator) => format!("{} countries", coordinator.store().len()),
            None => String::new(),
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.poll_loading();

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.dashboard.queue().publish(Interaction::ClearCountry);
        }

        // Interactions published while drawing the previous frame
        self.dashboard.process_interactions();

        let status = self.status_text();
        let interactions = match self.dashboard.coordinator() {
            Some(coordinator) => {
                let selection = coordinator.selection();
                top_bar(
                    ctx,
                    &TopBarState {
                        indicators: coordinator.store().indicators(),
                        selected_indicator: selection.selected_indicator.as_deref(),
                        selected_country: selection.selected_country.as_ref(),
                        status: &status,
                    },
                )
            }
            None => top_bar(
                ctx,
                &TopBarState {
                    indicators: &[],
                    selected_indicator: None,
                    selected_country: None,
                    status: &status,
                },
            ),
        };
        for interaction in interactions {
            self.dashboard.queue().publish(interaction);
        }

        let viewer = ViewerContext { time: ctx.input(|i| i.time) };
        let dashboard = &mut self.dashboard;
        let viewport = &mut self.viewport;
        let loading = !self.dataset_failed;
        egui::CentralPanel::default().show(ctx, |ui| match &dashboard.coordinator {
            Some(_) => viewport.ui(ui, &mut dashboard.views, &viewer),
            // Views that depend on a failed input stay empty
            None if loading => status_screen(ui, "Loading", "Reading the dataset and world topology"),
            None => {}
        });

        self.dashboard.views().tooltip.ui(ctx);

        if !self.dashboard.queue().is_empty() || self.dashboard.views().chart.is_animating() {
            ctx.request_repaint();
        }
    }
}
