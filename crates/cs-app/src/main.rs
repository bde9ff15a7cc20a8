//! Main application entry point

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use eframe::egui;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod app;
mod config;

use app::DashboardApp;
use config::DashboardConfig;

/// Linked world map, projection scatter and indicator history
#[derive(Parser, Debug)]
#[command(name = "countryscope", version, about)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Combined data bundle, overrides the configured inputs
    #[arg(long)]
    bundle: Option<PathBuf>,

    /// Indicator CSV
    #[arg(long, conflicts_with = "bundle")]
    csv: Option<PathBuf>,

    /// Precomputed projection JSON
    #[arg(long, conflicts_with = "bundle")]
    projected: Option<PathBuf>,

    /// World topology JSON
    #[arg(long)]
    topology: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    /// Configuration file contents with the command line applied on top
    fn resolve_config(&self) -> Result<DashboardConfig> {
        let mut config = match &self.config {
            Some(path) => DashboardConfig::load_from_file(path)?,
            None => DashboardConfig::default(),
        };

        if let Some(bundle) = &self.bundle {
            config.data.bundle = Some(bundle.clone());
        }
        if let Some(csv) = &self.csv {
            config.data.bundle = None;
            config.data.csv = Some(csv.clone());
        }
        if let Some(projected) = &self.projected {
            config.data.projected = Some(projected.clone());
        }
        if let Some(topology) = &self.topology {
            config.data.topology = topology.clone();
        }
        Ok(config)
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "countryscope={level},cs_core={level},cs_data={level},cs_views={level},cs_ui={level}"
        ))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Dataset input for the startup log. A missing input is left to the app,
/// which shows the dashboard without data.
fn input_summary(config: &DashboardConfig) -> String {
    match config.data.input() {
        Ok(input) => format!("{input:?}"),
        Err(e) => format!("no dataset input ({e})"),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let config = cli.resolve_config()?;
    info!("Starting dashboard with {}", input_summary(&config));

    let runtime = tokio::runtime::Runtime::new()?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 960.0])
            .with_min_inner_size([800.0, 600.0]),
        persist_window: false,
        ..Default::default()
    };

    eframe::run_native(
        "Country Scope",
        options,
        Box::new(move |cc| Box::new(DashboardApp::new(cc, config, runtime))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}
