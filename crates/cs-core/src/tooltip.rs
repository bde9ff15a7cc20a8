//! Tooltip content built from a country record

use serde::{Deserialize, Serialize};

use crate::dataset::CountryRecord;

/// How a tooltip value is printed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueFormat {
    /// One decimal followed by `%`
    Percent,
    /// `$` followed by one decimal
    Currency,
    /// Thousands separators, optional unit suffix
    Grouped { suffix: Option<String> },
    /// Value as is, optional unit suffix
    Raw { suffix: Option<String> },
}

impl ValueFormat {
    pub fn format(&self, value: f64) -> String {
        match self {
            ValueFormat::Percent => format!("{value:.1}%"),
            ValueFormat::Currency => format!("${value:.1}"),
            ValueFormat::Grouped { suffix } => with_suffix(group_thousands(value), suffix),
            ValueFormat::Raw { suffix } => with_suffix(format!("{value}"), suffix),
        }
    }
}

fn with_suffix(text: String, suffix: &Option<String>) -> String {
    match suffix {
        Some(suffix) => format!("{text} {suffix}"),
        None => text,
    }
}

/// `1234567.5` -> `1,234,567.5`, at most three decimals
fn group_thousands(value: f64) -> String {
    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let digits = int_part.as_bytes();
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 4);
    // No "-0" for values that round to zero
    if value < 0.0 && value.abs() >= 0.0005 {
        grouped.push('-');
    }
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*digit as char);
    }
    if !frac_part.is_empty() {
        grouped.push('.');
        grouped.push_str(frac_part);
    }
    grouped
}

/// One configured tooltip row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipField {
    pub indicator: String,
    pub label: String,
    pub format: ValueFormat,
}

impl TooltipField {
    pub fn new(indicator: &str, label: &str, format: ValueFormat) -> Self {
        Self {
            indicator: indicator.to_string(),
            label: label.to_string(),
            format,
        }
    }

    /// The agricultural and rural development fields shown by default
    pub fn defaults() -> Vec<TooltipField> {
        vec![
            Self::new("access_to_electricity__of_population", "Access to electricity", ValueFormat::Percent),
            Self::new(
                "agricultural_irrigated_land__of_total_agricultural_land",
                "Agricultural irrigated land",
                ValueFormat::Percent,
            ),
            Self::new(
                "average_precipitation_in_depth_mm_per_year",
                "Average precipitation",
                ValueFormat::Raw { suffix: Some("mm/year".into()) },
            ),
            Self::new(
                "employment_in_agriculture__of_total_employment_modeled_ilo_estimate",
                "Employment in agriculture",
                ValueFormat::Percent,
            ),
            Self::new("gdp_per_capita_current_us", "GDP per capita", ValueFormat::Currency),
            Self::new("land_area_sq_km", "Land area", ValueFormat::Grouped { suffix: Some("km²".into()) }),
            Self::new("population_total", "Population", ValueFormat::Grouped { suffix: None }),
        ]
    }
}

/// A formatted label/value line
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipRow {
    pub label: String,
    pub value: String,
}

/// What the tooltip overlay shows
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipContent {
    pub title: String,
    pub rows: Vec<TooltipRow>,
}

impl TooltipContent {
    /// Format `fields` from the record's current snapshot
    pub fn from_record(record: &CountryRecord, fields: &[TooltipField]) -> Self {
        let rows = fields
            .iter()
            .map(|field| TooltipRow {
                label: field.label.clone(),
                value: record
                    .value(&field.indicator)
                    .map(|v| field.format.format(v))
                    .unwrap_or_else(|| "N/A".to_string()),
            })
            .collect();

        Self {
            title: record.name.to_string(),
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::CountryKey;

    #[test]
    fn test_value_formats() {
        assert_eq!(ValueFormat::Percent.format(97.345), "97.3%");
        assert_eq!(ValueFormat::Currency.format(1530.06), "$1530.1");
        assert_eq!(ValueFormat::Raw { suffix: Some("mm/year".into()) }.format(1522.0), "1522 mm/year");
        assert_eq!(ValueFormat::Grouped { suffix: None }.format(38928341.0), "38,928,341");
        assert_eq!(ValueFormat::Grouped { suffix: Some("km²".into()) }.format(652860.0), "652,860 km²");
    }

    #[test]
    fn test_group_thousands_edges() {
        assert_eq!(group_thousands(999.0), "999");
        assert_eq!(group_thousands(1000.0), "1,000");
        assert_eq!(group_thousands(-1234.5), "-1,234.5");
        assert_eq!(group_thousands(0.0), "0");
    }

    #[test]
    fn test_missing_fields_render_na() {
        let mut record = CountryRecord::new(CountryKey::new("Kenya"));
        record.current.insert("population_total".into(), 53771300.0);

        let content = TooltipContent::from_record(&record, &TooltipField::defaults());
        assert_eq!(content.title, "Kenya");
        assert_eq!(content.rows.len(), 7);
        assert_eq!(content.rows[0].value, "N/A");
        assert_eq!(content.rows[6].value, "53,771,300");
    }
}
