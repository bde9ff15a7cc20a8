//! Async entry points for reading the dashboard inputs off disk

use std::path::{Path, PathBuf};

use cs_core::DatasetStore;
use tracing::info;

use crate::builder::DatasetBuilder;
use crate::config::TabularOptions;
use crate::sources::{decode_topology, parse_bundle, parse_projected, GeometryFeature, TabularDataset};
use crate::DataResult;

/// Where the per-country data comes from
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetInput {
    /// A combined JSON bundle
    Bundle(PathBuf),

    /// The indicator CSV plus optional projected coordinates
    Tabular { csv: PathBuf, projected: Option<PathBuf> },
}

/// Load the country outlines of `object`, keyed by `join_property`
pub async fn load_topology(path: &Path, object: &str, join_property: &str) -> DataResult<Vec<GeometryFeature>> {
    let payload = tokio::fs::read_to_string(path).await?;
    let object = object.to_string();
    let join_property = join_property.to_string();

    let features =
        tokio::task::spawn_blocking(move || decode_topology(&payload, &object, &join_property)).await??;
    info!("Loaded {} country outlines from {}", features.len(), path.display());
    Ok(features)
}

/// Load a combined data bundle
pub async fn load_bundle(path: &Path, options: &TabularOptions) -> DataResult<DatasetStore> {
    let payload = tokio::fs::read_to_string(path).await?;
    let options = options.clone();

    let store = tokio::task::spawn_blocking(move || parse_bundle(&payload, &options)).await??;
    info!("Loaded bundle {} ({} countries)", path.display(), store.len());
    Ok(store)
}

/// Load the dataset store from either input form
pub async fn load_dataset(input: &DatasetInput, options: &TabularOptions) -> DataResult<DatasetStore> {
    match input {
        DatasetInput::Bundle(path) => load_bundle(path, options).await,
        DatasetInput::Tabular { csv, projected } => {
            let projected = match projected {
                Some(path) => {
                    let payload = tokio::fs::read_to_string(path).await?;
                    Some(tokio::task::spawn_blocking(move || parse_projected(&payload)).await??)
                }
                None => None,
            };

            tokio::task::spawn_blocking({
                let csv = csv.clone();
                let options = options.clone();
                move || -> DataResult<DatasetStore> {
                    let dataset = TabularDataset::from_path(&csv, &options)?;
                    let mut builder = DatasetBuilder::new(options).tabular(dataset);
                    if let Some(points) = projected {
                        builder = builder.projected(points);
                    }
                    Ok(builder.build())
                }
            })
            .await?
        }
    }
}
