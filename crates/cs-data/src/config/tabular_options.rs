//! Options for reading the tabular indicator dataset

use serde::{Deserialize, Serialize};

use super::NullConfig;

/// How the tabular dataset is interpreted
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TabularOptions {
    /// Column holding the country display name
    pub country_column: String,

    /// Column holding the year
    pub year_column: String,

    /// Year whose rows form the current snapshot
    pub snapshot_year: i32,

    /// Countries to keep. Empty keeps every country.
    pub countries: Vec<String>,

    /// Cells treated as missing
    pub nulls: NullConfig,
}

impl Default for TabularOptions {
    fn default() -> Self {
        Self {
            country_column: "country_name".to_string(),
            year_column: "year".to_string(),
            snapshot_year: 2020,
            countries: Vec::new(),
            nulls: NullConfig::default(),
        }
    }
}

impl TabularOptions {
    /// Whether rows for `country` are kept
    pub fn keeps(&self, country: &str) -> bool {
        self.countries.is_empty() || self.countries.iter().any(|c| c == country)
    }
}
