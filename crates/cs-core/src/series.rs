//! Time series shaping for the line chart

use std::collections::BTreeMap;

use crate::dataset::{CountryRecord, DatasetStore};

/// One point of a yearly series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub year: i32,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(year: i32, value: f64) -> Self {
        Self { year, value }
    }
}

/// A single country's series for `indicator`, ascending by year.
///
/// Years without a finite value are skipped.
pub fn single_series(record: &CountryRecord, indicator: &str) -> Vec<SeriesPoint> {
    let mut points: Vec<SeriesPoint> = record
        .history
        .iter()
        .filter_map(|(&year, values)| {
            values
                .get(indicator)
                .copied()
                .filter(|v| v.is_finite())
                .map(|value| SeriesPoint::new(year, value))
        })
        .collect();

    points.sort_by_key(|p| p.year);
    points
}

/// Mean of every country's value per year, ascending by year.
///
/// Years with no numeric contributor are omitted rather than reported as zero.
pub fn average_series(store: &DatasetStore, indicator: &str) -> Vec<SeriesPoint> {
    let mut by_year: BTreeMap<i32, (f64, usize)> = BTreeMap::new();

    for record in store.records() {
        for (&year, values) in &record.history {
            if let Some(value) = values.get(indicator).copied().filter(|v| v.is_finite()) {
                let entry = by_year.entry(year).or_insert((0.0, 0));
                entry.0 += value;
                entry.1 += 1;
            }
        }
    }

    by_year
        .into_iter()
        .filter(|(_, (_, count))| *count > 0)
        .map(|(year, (sum, count))| SeriesPoint::new(year, sum / count as f64))
        .collect()
}

/// Largest value of a series
pub fn max_value(points: &[SeriesPoint]) -> Option<f64> {
    points
        .iter()
        .map(|p| p.value)
        .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
}

/// First and last year of an ascending series
pub fn year_extent(points: &[SeriesPoint]) -> Option<(i32, i32)> {
    Some((points.first()?.year, points.last()?.year))
}
