//! Input loading for the country dashboard
//!
//! Reads the tabular indicator dataset, the projected coordinates, the
//! combined data bundle and the world topology, and assembles the shared
//! dataset store.

pub mod builder;
pub mod config;
pub mod loader;
pub mod sources;

use thiserror::Error;
use tokio::task::JoinError;

// Re-exports
pub use builder::DatasetBuilder;
pub use config::{NullConfig, TabularOptions};
pub use loader::{load_bundle, load_dataset, load_topology, DatasetInput};
pub use sources::{GeometryFeature, TabularDataset};

/// Errors that can occur while loading inputs
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid topology: {0}")]
    Topology(String),

    #[error("Column '{0}' not found")]
    MissingColumn(String),

    #[error("Join error: {0}")]
    Join(#[from] JoinError),
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => DataError::Io(std::io::Error::new(io_err.kind(), error.to_string())),
            _ => DataError::Csv(error.to_string()),
        }
    }
}

pub type DataResult<T> = Result<T, DataError>;
