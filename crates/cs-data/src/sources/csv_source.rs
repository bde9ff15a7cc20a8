use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use cs_core::IndicatorValues;
use tracing::{debug, warn};

use crate::config::TabularOptions;
use crate::{DataError, DataResult};

/// One country/year row of the tabular dataset
#[derive(Debug, Clone, PartialEq)]
pub struct TabularRow {
    pub country: String,
    pub year: i32,
    /// Numeric indicator values present in this row
    pub values: IndicatorValues,
}

/// The indicator table: one row per country and year
#[derive(Debug, Clone, Default)]
pub struct TabularDataset {
    /// Indicator columns in file order
    pub indicators: Vec<String>,
    pub rows: Vec<TabularRow>,
}

impl TabularDataset {
    /// Read a CSV file
    pub fn from_path(path: &Path, options: &TabularOptions) -> DataResult<Self> {
        let file = File::open(path)?;
        Self::from_reader(file, options)
    }

    /// Read CSV data with a header row
    pub fn from_reader<R: Read>(reader: R, options: &TabularOptions) -> DataResult<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        // Get headers
        let headers = csv_reader.headers()?.clone();
        let country_idx = column_index(&headers, &options.country_column)?;
        let year_idx = column_index(&headers, &options.year_column)?;

        let records = csv_reader.records().collect::<Result<Vec<_>, _>>()?;

        // Detect indicator columns
        let indicator_columns: Vec<(usize, String)> = headers
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != country_idx && *idx != year_idx)
            .filter(|(idx, _)| is_numeric_column(&records, *idx, options))
            .map(|(idx, name)| (idx, name.to_string()))
            .collect();
        debug!("Detected {} indicator columns", indicator_columns.len());

        let mut rows = Vec::with_capacity(records.len());
        let mut skipped = 0usize;

        for record in &records {
            let country = record.get(country_idx).map(str::trim).unwrap_or("");
            let year = record.get(year_idx).and_then(|raw| parse_year(raw, options));

            let year = match year {
                Some(year) if !country.is_empty() => year,
                _ => {
                    skipped += 1;
                    continue;
                }
            };

            let values = indicator_columns
                .iter()
                .filter_map(|(idx, name)| {
                    let value = options.nulls.parse_number(record.get(*idx)?)?;
                    Some((name.clone(), value))
                })
                .collect();

            rows.push(TabularRow {
                country: country.to_string(),
                year,
                values,
            });
        }

        if skipped > 0 {
            warn!("Skipped {} rows without a country name or year", skipped);
        }

        Ok(Self {
            indicators: indicator_columns.into_iter().map(|(_, name)| name).collect(),
            rows,
        })
    }
}

fn column_index(headers: &StringRecord, name: &str) -> DataResult<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| DataError::MissingColumn(name.to_string()))
}

/// A column is an indicator when it has at least one number and every
/// non-null cell parses as one
fn is_numeric_column(records: &[StringRecord], idx: usize, options: &TabularOptions) -> bool {
    let mut seen_number = false;
    for record in records {
        let Some(raw) = record.get(idx) else { continue };
        if options.nulls.is_null(raw) {
            continue;
        }
        if options.nulls.parse_number(raw).is_none() {
            return false;
        }
        seen_number = true;
    }
    seen_number
}

/// Years may be written as `2020` or `2020.0`
fn parse_year(raw: &str, options: &TabularOptions) -> Option<i32> {
    let value = options.nulls.parse_number(raw)?;
    (value.fract() == 0.0 && value.abs() < i32::MAX as f64).then_some(value as i32)
}
