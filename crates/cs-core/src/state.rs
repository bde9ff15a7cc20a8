//! Selection state and the context handed to views

use crate::dataset::CountryKey;

/// What the line chart should display
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartMode {
    /// One country's series
    Single(CountryKey),
    /// Mean over all countries per year
    Average,
}

/// Selected country and indicator
///
/// Owned by the coordinator. Views only ever see it by reference.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    pub selected_country: Option<CountryKey>,
    pub selected_indicator: Option<String>,
}

impl SelectionState {
    pub fn new(selected_indicator: Option<String>) -> Self {
        Self {
            selected_country: None,
            selected_indicator,
        }
    }

    /// Chart mode derived from the selected country
    pub fn mode(&self) -> ChartMode {
        match &self.selected_country {
            Some(country) => ChartMode::Single(country.clone()),
            None => ChartMode::Average,
        }
    }
}

/// Context passed to views while drawing
///
/// Views get data and selection changes from the coordinator, never from here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerContext {
    /// Frame time in seconds, used to drive transitions
    pub time: f64,
}
