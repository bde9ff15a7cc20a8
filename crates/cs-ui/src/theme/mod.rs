use egui::{Color32, Context, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals};
use std::collections::BTreeMap;

/// Theme configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub dark_mode: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self { dark_mode: false }
    }
}

/// Apply the dashboard theme
pub fn apply_theme(ctx: &Context, theme: &Theme) {
    let mut style = Style::default();
    let mut visuals = if theme.dark_mode { dark_visuals() } else { light_visuals() };

    // Selection and highlighting
    visuals.selection.bg_fill = accent_color().linear_multiply(0.3);
    visuals.selection.stroke = Stroke::new(1.0, accent_color());
    visuals.hyperlink_color = accent_color();

    // Shadows
    visuals.window_shadow.extrusion = 8.0;
    visuals.popup_shadow.extrusion = 4.0;

    // Apply spacing
    style.spacing.item_spacing = egui::vec2(8.0, 4.0);
    style.spacing.button_padding = egui::vec2(8.0, 4.0);
    style.spacing.menu_margin = egui::Margin::same(8.0);

    // Font sizes
    let mut font_sizes = BTreeMap::new();
    font_sizes.insert(TextStyle::Small, FontId::new(11.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Body, FontId::new(13.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Button, FontId::new(13.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Heading, FontId::new(18.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Monospace, FontId::new(12.0, FontFamily::Monospace));
    style.text_styles = font_sizes;

    ctx.set_style(style);
    ctx.set_visuals(visuals);
}

fn dark_visuals() -> Visuals {
    let mut visuals = Visuals::dark();

    let bg_color = Color32::from_rgb(23, 23, 23);
    let panel_bg = Color32::from_rgb(31, 31, 31);
    let widget_bg = Color32::from_rgb(40, 40, 40);
    let text_color = Color32::from_rgb(220, 220, 220);

    visuals.window_fill = panel_bg;
    visuals.panel_fill = panel_bg;
    visuals.extreme_bg_color = bg_color;
    visuals.faint_bg_color = widget_bg;

    visuals.widgets.inactive.bg_fill = widget_bg;
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, text_color);
    visuals.widgets.inactive.rounding = Rounding::same(4.0);
    visuals.widgets.hovered.bg_fill = Color32::from_rgb(50, 50, 50);
    visuals.widgets.hovered.rounding = Rounding::same(4.0);
    visuals.widgets.active.bg_fill = Color32::from_rgb(60, 60, 60);
    visuals.widgets.active.bg_stroke = Stroke::new(1.0, accent_color());
    visuals.widgets.active.rounding = Rounding::same(4.0);

    visuals
}

fn light_visuals() -> Visuals {
    let mut visuals = Visuals::light();

    // Country fills are light grey and white, so panels stay plain white
    visuals.panel_fill = Color32::WHITE;
    visuals.window_fill = Color32::WHITE;
    visuals.faint_bg_color = Color32::from_rgb(245, 245, 245);

    visuals.widgets.inactive.rounding = Rounding::same(4.0);
    visuals.widgets.hovered.rounding = Rounding::same(4.0);
    visuals.widgets.active.rounding = Rounding::same(4.0);

    visuals
}

/// Get the accent color for the theme
pub fn accent_color() -> Color32 {
    Color32::from_rgb(70, 130, 180)
}
