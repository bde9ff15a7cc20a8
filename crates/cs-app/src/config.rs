//! Dashboard configuration
//!
//! Read from a TOML file. Every section and field is optional and falls back
//! to the defaults below, so an empty file is a valid configuration.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use cs_core::TooltipField;
use cs_data::{DatasetInput, TabularOptions};
use cs_views::SurfaceSizes;
use egui::Vec2;
use serde::{Deserialize, Serialize};

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data: DataConfig,
    pub surfaces: SurfaceConfig,
    pub chart: ChartConfig,
    pub ui: UiConfig,

    /// Rows shown in the hover tooltip, in order
    pub tooltip: Vec<TooltipField>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            surfaces: SurfaceConfig::default(),
            chart: ChartConfig::default(),
            ui: UiConfig::default(),
            tooltip: TooltipField::defaults(),
        }
    }
}

/// Input files
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Combined JSON bundle. Takes precedence over `csv` and `projected`.
    pub bundle: Option<PathBuf>,

    /// Indicator table, one row per country and year
    pub csv: Option<PathBuf>,

    /// Precomputed 2-D projection per country
    pub projected: Option<PathBuf>,

    /// World topology
    pub topology: PathBuf,

    /// Topology object holding the country geometries
    pub topology_object: String,

    /// Geometry property matched against country names
    pub join_property: String,

    pub tabular: TabularOptions,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            bundle: None,
            csv: Some(PathBuf::from("data/cleaned_filtered_agriRuralDevelopment.csv")),
            projected: Some(PathBuf::from("data/pca_data.json")),
            topology: PathBuf::from("data/world-topo.json"),
            topology_object: "countries".to_string(),
            join_property: "admin".to_string(),
            tabular: TabularOptions::default(),
        }
    }
}

impl DataConfig {
    /// Which dataset input to load
    pub fn input(&self) -> Result<DatasetInput> {
        if let Some(bundle) = &self.bundle {
            return Ok(DatasetInput::Bundle(bundle.clone()));
        }
        match &self.csv {
            Some(csv) => Ok(DatasetInput::Tabular {
                csv: csv.clone(),
                projected: self.projected.clone(),
            }),
            None => bail!("Either data.bundle or data.csv must be set"),
        }
    }
}

/// Width and height in points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl From<Size> for Vec2 {
    fn from(size: Size) -> Self {
        Vec2::new(size.width, size.height)
    }
}

/// Drawing surface of each view
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub map: Size,
    pub scatter: Size,
    pub line_chart: Size,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            map: Size::new(800.0, 500.0),
            scatter: Size::new(400.0, 400.0),
            line_chart: Size::new(800.0, 400.0),
        }
    }
}

impl From<&SurfaceConfig> for SurfaceSizes {
    fn from(config: &SurfaceConfig) -> Self {
        SurfaceSizes {
            map: config.map.into(),
            scatter: config.scatter.into(),
            line_chart: config.line_chart.into(),
        }
    }
}

/// Line chart behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Duration of the transition between two series
    pub transition_ms: u64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self { transition_ms: 750 }
    }
}

impl ChartConfig {
    pub fn transition_secs(&self) -> f64 {
        self.transition_ms as f64 / 1000.0
    }
}

/// Window and selection defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub dark_mode: bool,

    /// Indicator selected at startup. The first indicator when unset.
    pub initial_indicator: Option<String>,
}

impl DashboardConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse configuration")
    }

    /// Load a configuration file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }
}
