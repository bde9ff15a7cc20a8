//! Mark styles and pointer tracking shared by the map and scatter views

use cs_core::{CountryKey, MarkHandlers};
use egui::{Color32, Stroke};

use crate::colors;

/// Fill and outline of a map polygon
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolygonStyle {
    pub fill: Color32,
    pub stroke: Stroke,
}

impl PolygonStyle {
    /// Idle look: grey when the country has data, white otherwise
    pub fn baseline(known: bool) -> Self {
        Self {
            fill: if known { colors::LAND } else { colors::NO_DATA },
            stroke: Stroke::new(0.5, colors::OUTLINE),
        }
    }

    pub fn highlighted() -> Self {
        Self {
            fill: colors::HIGHLIGHT,
            stroke: Stroke::new(2.0, colors::OUTLINE),
        }
    }
}

/// Fill and size of a scatter or chart marker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointStyle {
    pub fill: Color32,
    pub radius: f32,
}

impl PointStyle {
    pub const BASELINE: Self = Self {
        fill: colors::STEELBLUE,
        radius: 5.0,
    };

    pub const HIGHLIGHTED: Self = Self {
        fill: colors::HIGHLIGHT,
        radius: 8.0,
    };
}

/// Turns per-frame hit results into strictly paired hover/hover-end calls
#[derive(Debug, Default)]
pub struct HoverTracker {
    current: Option<CountryKey>,
}

impl HoverTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key the pointer is currently over
    pub fn current(&self) -> Option<&CountryKey> {
        self.current.as_ref()
    }

    /// Record the mark under the pointer this frame.
    ///
    /// Leaving a mark always ends its hover before the next one starts.
    pub fn update(&mut self, hit: Option<&CountryKey>, handlers: &mut MarkHandlers) {
        if self.current.as_ref() == hit {
            return;
        }

        if let Some(previous) = self.current.take() {
            (handlers.on_hover_end)(&previous);
        }
        if let Some(key) = hit {
            (handlers.on_hover)(key);
            self.current = Some(key.clone());
        }
    }

    /// End any hover in progress, e.g. when the pointer leaves the surface
    pub fn clear(&mut self, handlers: &mut MarkHandlers) {
        self.update(None, handlers);
    }
}
