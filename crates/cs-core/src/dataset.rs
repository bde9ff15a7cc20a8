//! Shared dataset store
//!
//! Holds every country's current indicator snapshot, its historical series and
//! its projected (PCA) coordinates. Built once at load time and shared
//! read-only between the coordinator and the views.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Indicator name -> value. Absent values are simply not present.
pub type IndicatorValues = BTreeMap<String, f64>;

/// Country display name used as the join key across every input
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountryKey(String);

impl CountryKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CountryKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for CountryKey {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Precomputed 2D projection of a country's features
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPoint {
    pub x: f64,
    pub y: f64,
}

impl ProjectedPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Everything known about one country
#[derive(Debug, Clone, PartialEq)]
pub struct CountryRecord {
    pub name: CountryKey,

    /// Values for the snapshot year
    pub current: IndicatorValues,

    /// Projected coordinates, if the country took part in the projection
    pub projected: Option<ProjectedPoint>,

    /// Year -> indicator values
    pub history: BTreeMap<i32, IndicatorValues>,
}

impl CountryRecord {
    pub fn new(name: CountryKey) -> Self {
        Self {
            name,
            current: IndicatorValues::new(),
            projected: None,
            history: BTreeMap::new(),
        }
    }

    /// Current snapshot value of an indicator
    pub fn value(&self, indicator: &str) -> Option<f64> {
        self.current.get(indicator).copied()
    }

    /// Historical value of an indicator for one year
    pub fn history_value(&self, year: i32, indicator: &str) -> Option<f64> {
        self.history.get(&year)?.get(indicator).copied()
    }
}

/// Read-only store of all country records
#[derive(Debug, Clone, Default)]
pub struct DatasetStore {
    indicators: Vec<String>,
    records: BTreeMap<CountryKey, CountryRecord>,
}

impl DatasetStore {
    /// Create a store from the indicator list and the records
    pub fn new(indicators: Vec<String>, records: impl IntoIterator<Item = CountryRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|record| (record.name.clone(), record))
            .collect();
        Self { indicators, records }
    }

    /// Indicator names in their source order
    pub fn indicators(&self) -> &[String] {
        &self.indicators
    }

    pub fn has_indicator(&self, indicator: &str) -> bool {
        self.indicators.iter().any(|i| i == indicator)
    }

    /// Look up a record by its key
    pub fn get(&self, key: &CountryKey) -> Option<&CountryRecord> {
        self.records.get(key)
    }

    /// Look up a record by a raw country name
    pub fn resolve(&self, name: &str) -> Option<&CountryRecord> {
        self.records.get(&CountryKey::new(name))
    }

    pub fn contains(&self, key: &CountryKey) -> bool {
        self.records.contains_key(key)
    }

    /// All records ordered by country name
    pub fn records(&self) -> impl Iterator<Item = &CountryRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Projected coordinates of every record that has them
    pub fn projected_points(&self) -> Vec<(CountryKey, ProjectedPoint)> {
        self.records
            .values()
            .filter_map(|record| record.projected.map(|p| (record.name.clone(), p)))
            .collect()
    }
}
