use cs_core::{CountryKey, Interaction};
use egui::{Context, RichText, TopBottomPanel};

use crate::selector::indicator_selector;

/// What the top bar shows
pub struct TopBarState<'a> {
    pub indicators: &'a [String],
    pub selected_indicator: Option<&'a str>,
    pub selected_country: Option<&'a CountryKey>,
    /// Right-aligned status text, e.g. load progress
    pub status: &'a str,
}

/// Render the top bar. Returns the interactions it produced this frame.
pub fn top_bar(ctx: &Context, state: &TopBarState<'_>) -> Vec<Interaction> {
    let mut interactions = Vec::new();

    TopBottomPanel::top("top_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.heading("Country Scope");
            ui.separator();

            ui.label("Indicator:");
            if let Some(indicator) = indicator_selector(ui, state.indicators, state.selected_indicator) {
                interactions.push(Interaction::IndicatorChanged(indicator));
            }

            ui.separator();
            match state.selected_country {
                Some(country) => {
                    ui.label(RichText::new(country.as_str()).strong());
                    if ui
                        .button("Show average")
                        .on_hover_text("Back to the average over all countries (Esc)")
                        .clicked()
                    {
                        interactions.push(Interaction::ClearCountry);
                    }
                }
                None => {
                    let label = match state.selected_indicator {
                        Some(_) => "All countries".to_string(),
                        None => "Pick an indicator, then click a country".to_string(),
                    };
                    ui.label(RichText::new(label).weak());
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(RichText::new(state.status).weak());
            });
        });
    });

    interactions
}

/// Centered message while the inputs load
pub fn status_screen(ui: &mut egui::Ui, title: &str, message: &str) {
    ui.vertical_centered(|ui| {
        ui.add_space(100.0);
        ui.heading(title);
        ui.add_space(10.0);
        ui.spinner();
        ui.add_space(20.0);
        ui.label(message);
    });
}
