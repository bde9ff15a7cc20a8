//! Mark colors shared by the views

use egui::Color32;

/// Country with data
pub const LAND: Color32 = Color32::from_rgb(0xcc, 0xcc, 0xcc);

/// Country missing from the dataset
pub const NO_DATA: Color32 = Color32::WHITE;

/// Hovered marks in every view
pub const HIGHLIGHT: Color32 = Color32::from_rgb(255, 165, 0);

/// Scatter points, chart line and markers
pub const STEELBLUE: Color32 = Color32::from_rgb(70, 130, 180);

pub const OUTLINE: Color32 = Color32::BLACK;

/// Axis lines and tick labels
pub const AXIS: Color32 = Color32::from_gray(90);

/// Tooltip panel fill, translucent white
pub const TOOLTIP_FILL: Color32 = Color32::from_rgba_premultiplied(242, 242, 242, 242);
