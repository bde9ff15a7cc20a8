//! Combined data bundle
//!
//! A single JSON document carrying the indicator list, the current snapshot,
//! the yearly series and the projected coordinates:
//!
//! ```json
//! {
//!   "indicators": ["gdp_per_capita_current_us"],
//!   "current_data": {"Chile": {"gdp_per_capita_current_us": 13231.7}},
//!   "time_series": {"Chile": {"2019": {"gdp_per_capita_current_us": 14896.5}}},
//!   "pca_data": {"Chile": {"x": 1.2, "y": -0.4}}
//! }
//! ```
//!
//! `time_series` is keyed by calendar year. Payloads keyed by row position
//! (`"0"`, `"1"`, ...) are read as those years, so exporters must write the
//! year itself. Countries without a single numeric value are left out.

use std::collections::BTreeMap;

use cs_core::{CountryKey, CountryRecord, DatasetStore, IndicatorValues};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::projected::{collect_points, RawPoint};
use crate::builder::DatasetBuilder;
use crate::config::TabularOptions;
use crate::DataResult;

#[derive(Debug, Deserialize)]
struct RawBundle {
    #[serde(default)]
    indicators: Vec<String>,
    #[serde(default)]
    current_data: BTreeMap<String, BTreeMap<String, Value>>,
    #[serde(default)]
    time_series: BTreeMap<String, BTreeMap<String, BTreeMap<String, Value>>>,
    #[serde(default)]
    pca_data: BTreeMap<String, RawPoint>,
}

/// Only finite JSON numbers count as values
fn numeric_values(raw: BTreeMap<String, Value>) -> IndicatorValues {
    raw.into_iter()
        .filter_map(|(indicator, value)| {
            let value = value.as_f64().filter(|v| v.is_finite())?;
            Some((indicator, value))
        })
        .collect()
}

/// Parse a bundle into a dataset store.
///
/// The country allow-list of `options` applies; its snapshot year does not,
/// since the bundle already carries the snapshot.
pub fn parse_bundle(payload: &str, options: &TabularOptions) -> DataResult<DatasetStore> {
    let raw: RawBundle = serde_json::from_str(payload)?;
    let mut records: BTreeMap<CountryKey, CountryRecord> = BTreeMap::new();

    for (country, values) in raw.current_data {
        let key = CountryKey::new(country);
        let record = records.entry(key.clone()).or_insert_with(|| CountryRecord::new(key));
        record.current = numeric_values(values);
    }

    for (country, years) in raw.time_series {
        let key = CountryKey::new(country);
        let record = records.entry(key.clone()).or_insert_with(|| CountryRecord::new(key));
        for (year, values) in years {
            match year.trim().parse::<i32>() {
                Ok(year) => {
                    record.history.insert(year, numeric_values(values));
                }
                Err(_) => warn!("Ignoring non-year key '{}' in series of '{}'", year, record.name),
            }
        }
    }

    let mut builder = DatasetBuilder::new(options.clone());
    for indicator in raw.indicators {
        builder = builder.indicator(indicator);
    }
    for record in records.into_values().filter(|r| options.keeps(r.name.as_str())) {
        builder = builder.record(record);
    }

    Ok(builder.projected(collect_points(raw.pca_data)).build())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUNDLE: &str = r#"{
        "indicators": ["gdp", "population"],
        "current_data": {
            "Chile": {"gdp": 13231.7, "population": 19116209},
            "Peru": {"gdp": "n/a"}
        },
        "time_series": {
            "Chile": {"2019": {"gdp": 14896.5}, "2020": {"gdp": 13231.7}, "index": {"gdp": 1}},
            "Peru": {"2019": {"gdp": 6977.7}},
            "Cuba": {"2019": {"gdp": null}},
            "Narnia": {}
        },
        "pca_data": {
            "Chile": {"x": 1.2, "y": -0.4},
            "Peru": {"x": 0.3, "y": 0.9}
        }
    }"#;

    #[test]
    fn test_parse_bundle() {
        let store = parse_bundle(BUNDLE, &TabularOptions::default()).unwrap();

        assert_eq!(store.indicators(), ["gdp", "population"]);
        assert_eq!(store.len(), 2);

        let chile = store.resolve("Chile").unwrap();
        assert_eq!(chile.value("population"), Some(19116209.0));
        assert_eq!(chile.history.keys().copied().collect::<Vec<_>>(), vec![2019, 2020]);
        assert!(chile.projected.is_some());

        let peru = store.resolve("Peru").unwrap();
        assert_eq!(peru.value("gdp"), None);
        assert_eq!(peru.history_value(2019, "gdp"), Some(6977.7));
    }

    #[test]
    fn test_countries_without_values_do_not_resolve() {
        let store = parse_bundle(BUNDLE, &TabularOptions::default()).unwrap();

        assert!(store.resolve("Narnia").is_none());
        assert!(store.resolve("Cuba").is_none());
        assert!(!store.contains(&CountryKey::new("Narnia")));
    }

    #[test]
    fn test_bundle_respects_country_filter() {
        let options = TabularOptions {
            countries: vec!["Peru".into()],
            ..TabularOptions::default()
        };
        let store = parse_bundle(BUNDLE, &options).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.resolve("Chile").is_none());
    }
}
