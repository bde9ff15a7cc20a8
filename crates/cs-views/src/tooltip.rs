//! Tooltip overlay pinned to the top-right corner of the window

use cs_core::{TooltipContent, TooltipSurface};
use egui::{Align2, Area, Frame, Grid, Id, Order, RichText, Rounding, Vec2};

use crate::colors;

/// Distance from the window corner in points
pub const TOOLTIP_INSET: f32 = 20.0;

#[derive(Debug, Default)]
pub struct TooltipView {
    content: Option<TooltipContent>,
}

impl TooltipView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> Option<&TooltipContent> {
        self.content.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.content.is_some()
    }

    pub fn ui(&self, ctx: &egui::Context) {
        let Some(content) = &self.content else {
            return;
        };

        Area::new(Id::new("country_tooltip"))
            .order(Order::Tooltip)
            .anchor(Align2::RIGHT_TOP, Vec2::new(-TOOLTIP_INSET, TOOLTIP_INSET))
            .interactable(false)
            .show(ctx, |ui| {
                Frame::popup(ui.style())
                    .fill(colors::TOOLTIP_FILL)
                    .rounding(Rounding::same(4.0))
                    .show(ui, |ui| {
                        ui.label(RichText::new(&content.title).strong().size(15.0).color(colors::OUTLINE));
                        ui.add_space(4.0);
                        Grid::new("country_tooltip_rows").num_columns(2).show(ui, |ui| {
                            for row in &content.rows {
                                ui.label(RichText::new(format!("{}:", row.label)).strong().color(colors::OUTLINE));
                                ui.label(RichText::new(&row.value).color(colors::OUTLINE));
                                ui.end_row();
                            }
                        });
                    });
            });
    }
}

impl TooltipSurface for TooltipView {
    fn show(&mut self, content: TooltipContent) {
        self.content = Some(content);
    }

    fn hide(&mut self) {
        self.content = None;
    }
}
