//! Assembles the dataset store from the loaded inputs

use std::collections::BTreeMap;

use cs_core::{CountryKey, CountryRecord, DatasetStore, ProjectedPoint};
use tracing::{debug, info, warn};

use crate::config::TabularOptions;
use crate::sources::TabularDataset;

/// Builds a [`DatasetStore`] from a tabular dataset and projected coordinates
pub struct DatasetBuilder {
    options: TabularOptions,
    indicators: Vec<String>,
    records: BTreeMap<CountryKey, CountryRecord>,
    projected: BTreeMap<CountryKey, ProjectedPoint>,
}

impl DatasetBuilder {
    pub fn new(options: TabularOptions) -> Self {
        Self {
            options,
            indicators: Vec::new(),
            records: BTreeMap::new(),
            projected: BTreeMap::new(),
        }
    }

    /// Add every kept row as history, and the snapshot year rows as current data
    pub fn tabular(mut self, dataset: TabularDataset) -> Self {
        self.indicators = dataset.indicators;

        for row in dataset.rows {
            if !self.options.keeps(&row.country) {
                continue;
            }
            let key = CountryKey::new(row.country);
            let record = self
                .records
                .entry(key.clone())
                .or_insert_with(|| CountryRecord::new(key));

            if row.year == self.options.snapshot_year {
                record.current.extend(row.values.iter().map(|(k, v)| (k.clone(), *v)));
            }
            record.history.entry(row.year).or_default().extend(row.values);
        }
        self
    }

    /// Attach projected coordinates
    pub fn projected(mut self, projected: BTreeMap<CountryKey, ProjectedPoint>) -> Self {
        self.projected = projected;
        self
    }

    /// Append an indicator name not yet known
    pub fn indicator(mut self, indicator: impl Into<String>) -> Self {
        let indicator = indicator.into();
        if !self.indicators.contains(&indicator) {
            self.indicators.push(indicator);
        }
        self
    }

    /// Insert a fully formed record, replacing any previous one
    pub fn record(mut self, record: CountryRecord) -> Self {
        self.records.insert(record.name.clone(), record);
        self
    }

    /// Countries without a single numeric value are left out, so they resolve
    /// to nothing and render as unknown
    pub fn build(mut self) -> DatasetStore {
        let before = self.records.len();
        self.records.retain(|_, record| carries_data(record));
        if self.records.len() < before {
            debug!("Dropped {} countries without any values", before - self.records.len());
        }

        let mut orphans = 0usize;
        for (key, point) in std::mem::take(&mut self.projected) {
            match self.records.get_mut(&key) {
                Some(record) => record.projected = Some(point),
                None => orphans += 1,
            }
        }
        if orphans > 0 {
            warn!("{} projected points have no matching country record", orphans);
        }

        info!(
            "Built dataset with {} countries and {} indicators",
            self.records.len(),
            self.indicators.len()
        );
        DatasetStore::new(self.indicators, self.records.into_values())
    }
}

fn carries_data(record: &CountryRecord) -> bool {
    !record.current.is_empty() || record.history.values().any(|values| !values.is_empty())
}
