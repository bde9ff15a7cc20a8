//! Precomputed projected (PCA) coordinates

use std::collections::BTreeMap;

use cs_core::{CountryKey, ProjectedPoint};
use serde::Deserialize;
use tracing::warn;

use crate::DataResult;

/// A coordinate pair as written by the projection step
#[derive(Debug, Deserialize)]
pub(crate) struct RawPoint {
    x: Option<f64>,
    y: Option<f64>,
}

impl RawPoint {
    pub(crate) fn into_point(self) -> Option<ProjectedPoint> {
        match (self.x, self.y) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some(ProjectedPoint::new(x, y)),
            _ => None,
        }
    }
}

/// Parse `{ "<country>": { "x": .., "y": .. } }`.
///
/// Entries without two finite coordinates are dropped.
pub fn parse_projected(payload: &str) -> DataResult<BTreeMap<CountryKey, ProjectedPoint>> {
    let raw: BTreeMap<String, RawPoint> = serde_json::from_str(payload)?;
    Ok(collect_points(raw))
}

pub(crate) fn collect_points(raw: BTreeMap<String, RawPoint>) -> BTreeMap<CountryKey, ProjectedPoint> {
    raw.into_iter()
        .filter_map(|(country, point)| match point.into_point() {
            Some(point) => Some((CountryKey::new(country), point)),
            None => {
                warn!("Dropping projected coordinates for '{}': not a finite pair", country);
                None
            }
        })
        .collect()
}
