//! Core functionality for the country dashboard
//!
//! This crate provides the shared dataset store, the selection state and the
//! coordinator that keeps the map, scatter and line chart views in sync.

pub mod coordinator;
pub mod dataset;
pub mod events;
pub mod scale;
pub mod series;
pub mod state;
pub mod tooltip;

// Re-export commonly used types
pub use coordinator::{
    Coordinator, CoordinatorTargets, HighlightTarget, SelectionListener, TooltipSurface,
};
pub use dataset::{CountryKey, CountryRecord, DatasetStore, IndicatorValues, ProjectedPoint};
pub use events::{handler_from_fn, Interaction, InteractionQueue, KeyHandler, MarkHandlers};
pub use scale::LinearScale;
pub use series::{average_series, single_series, SeriesPoint};
pub use state::{ChartMode, SelectionState, ViewerContext};
pub use tooltip::{TooltipContent, TooltipField, ValueFormat};
