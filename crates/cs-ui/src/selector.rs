//! Indicator selector for the top bar

use egui::{ComboBox, Ui};
use tracing::debug;

/// Readable label for a snake_case indicator column name
///
/// `gdp_per_capita_current_us` becomes `Gdp per capita current us`; doubled
/// underscores, left behind by stripped punctuation, collapse to one space.
pub fn humanize_indicator(indicator: &str) -> String {
    let words: Vec<&str> = indicator.split('_').filter(|w| !w.is_empty()).collect();
    let label = words.join(" ");

    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Combo box over `indicators`. Returns the indicator picked this frame.
pub fn indicator_selector(ui: &mut Ui, indicators: &[String], selected: Option<&str>) -> Option<String> {
    let mut picked = None;
    let selected_text = selected.map(humanize_indicator).unwrap_or_else(|| "Select an indicator".to_string());

    ComboBox::from_id_source("indicator_selector")
        .selected_text(selected_text)
        .width(320.0)
        .show_ui(ui, |ui| {
            for indicator in indicators {
                let is_selected = selected == Some(indicator.as_str());
                if ui.selectable_label(is_selected, humanize_indicator(indicator)).clicked() && !is_selected {
                    debug!(%indicator, "Indicator picked");
                    picked = Some(indicator.clone());
                }
            }
        });

    picked
}
