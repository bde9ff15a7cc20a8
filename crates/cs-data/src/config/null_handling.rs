//! Null value handling for data loading

use serde::{Deserialize, Serialize};

/// Null value configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NullConfig {
    /// Patterns to treat as null
    pub patterns: Vec<String>,

    /// Whether to trim whitespace before checking
    pub trim_whitespace: bool,

    /// Case sensitive matching
    pub case_sensitive: bool,
}

impl Default for NullConfig {
    fn default() -> Self {
        Self {
            patterns: vec![
                String::new(), // Empty string
                "-".to_string(),
                "N/A".to_string(),
                "NA".to_string(),
                "null".to_string(),
                "None".to_string(),
                "NaN".to_string(),
                "..".to_string(),
            ],
            trim_whitespace: true,
            case_sensitive: false,
        }
    }
}

impl NullConfig {
    /// Check if a value should be treated as null
    pub fn is_null(&self, value: &str) -> bool {
        let test_value = if self.trim_whitespace { value.trim() } else { value };

        self.patterns.iter().any(|pattern| {
            if self.case_sensitive {
                test_value == pattern
            } else {
                test_value.eq_ignore_ascii_case(pattern)
            }
        })
    }

    /// Parse a cell as a number.
    ///
    /// Null patterns, non-numeric text and non-finite numbers are all absent.
    pub fn parse_number(&self, value: &str) -> Option<f64> {
        if self.is_null(value) {
            return None;
        }
        value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
    }
}
