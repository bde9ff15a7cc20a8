//! Scatterplot of the projected (PCA) coordinates

use ahash::AHashMap;
use cs_core::{CountryKey, HighlightTarget, LinearScale, MarkHandlers, ProjectedPoint};
use egui::{Align2, FontId, Pos2, Rect, Sense, Shape, Stroke, Ui, Vec2};

use crate::colors;
use crate::marks::{HoverTracker, PointStyle};

/// Plot area inset in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 20.0,
            bottom: 30.0,
            left: 40.0,
        }
    }
}

/// Hover and click tolerance beyond a point's radius
const HIT_TOLERANCE: f32 = 2.0;
const TICK_COUNT: usize = 10;
const TICK_LENGTH: f32 = 6.0;

struct ScatterMark {
    key: CountryKey,
    /// Surface-local centre
    pos: Pos2,
    highlighted: bool,
}

impl ScatterMark {
    fn style(&self) -> PointStyle {
        if self.highlighted {
            PointStyle::HIGHLIGHTED
        } else {
            PointStyle::BASELINE
        }
    }
}

pub struct ScatterView {
    size: Vec2,
    margins: Margins,
    title: String,
    marks: Vec<ScatterMark>,
    by_key: AHashMap<CountryKey, usize>,
    scales: Option<(LinearScale, LinearScale)>,
    handlers: MarkHandlers,
    hover: HoverTracker,
}

impl ScatterView {
    pub fn new(size: Vec2, handlers: MarkHandlers) -> Self {
        Self {
            size,
            margins: Margins::default(),
            title: "PCA Visualization".to_string(),
            marks: Vec::new(),
            by_key: AHashMap::new(),
            scales: None,
            handlers,
            hover: HoverTracker::new(),
        }
    }

    /// Lay out one circle per point, scaled to the data extent
    pub fn render(&mut self, points: &[(CountryKey, ProjectedPoint)]) {
        self.marks.clear();
        self.by_key.clear();

        let Margins { top, right, bottom, left } = self.margins;
        let x_scale = LinearScale::from_extent(points.iter().map(|(_, p)| p.x), (left, self.size.x - right));
        let y_scale = LinearScale::from_extent(points.iter().map(|(_, p)| p.y), (self.size.y - bottom, top));
        let (Some(x_scale), Some(y_scale)) = (x_scale, y_scale) else {
            self.scales = None;
            return;
        };

        for (key, point) in points {
            self.by_key.insert(key.clone(), self.marks.len());
            self.marks.push(ScatterMark {
                key: key.clone(),
                pos: Pos2::new(x_scale.map(point.x), y_scale.map(point.y)),
                highlighted: false,
            });
        }
        self.scales = Some((x_scale, y_scale));
    }

    pub fn is_rendered(&self) -> bool {
        self.scales.is_some()
    }

    /// Point nearest to a surface-local position, within its radius plus tolerance
    pub fn mark_at(&self, pos: Pos2) -> Option<&CountryKey> {
        self.marks
            .iter()
            .filter_map(|mark| {
                let distance = mark.pos.distance(pos);
                (distance <= mark.style().radius + HIT_TOLERANCE).then_some((distance, mark))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, mark)| &mark.key)
    }

    pub fn style_of(&self, key: &CountryKey) -> Option<PointStyle> {
        self.by_key.get(key).map(|&idx| self.marks[idx].style())
    }

    /// Surface-local centre of the point for `key`
    pub fn position_of(&self, key: &CountryKey) -> Option<Pos2> {
        self.by_key.get(key).map(|&idx| self.marks[idx].pos)
    }

    pub fn styles(&self) -> Vec<PointStyle> {
        self.marks.iter().map(ScatterMark::style).collect()
    }

    pub fn ui(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(self.size, Sense::click());
        if self.scales.is_none() {
            return;
        }

        self.paint(ui, rect);

        let hit = response
            .hover_pos()
            .and_then(|pos| self.mark_at(pos - rect.min.to_vec2()))
            .cloned();
        self.hover.update(hit.as_ref(), &mut self.handlers);

        if response.clicked() {
            if let Some(key) = &hit {
                (self.handlers.on_click)(key);
            }
        }
    }

    fn paint(&self, ui: &Ui, rect: Rect) {
        let Some((x_scale, y_scale)) = self.scales else {
            return;
        };
        let painter = ui.painter_at(rect);
        let origin = rect.min.to_vec2();
        let axis_stroke = Stroke::new(1.0, colors::AXIS);
        let font = FontId::proportional(10.0);

        // Bottom axis
        let axis_y = self.size.y - self.margins.bottom;
        painter.line_segment(
            [Pos2::new(x_scale.range.0, axis_y) + origin, Pos2::new(x_scale.range.1, axis_y) + origin],
            axis_stroke,
        );
        for tick in x_scale.ticks(TICK_COUNT) {
            let x = x_scale.map(tick);
            let base = Pos2::new(x, axis_y) + origin;
            painter.line_segment([base, base + Vec2::new(0.0, TICK_LENGTH)], axis_stroke);
            painter.text(
                base + Vec2::new(0.0, TICK_LENGTH + 1.0),
                Align2::CENTER_TOP,
                tick_label(tick),
                font.clone(),
                colors::AXIS,
            );
        }

        // Left axis
        let axis_x = self.margins.left;
        painter.line_segment(
            [Pos2::new(axis_x, y_scale.range.0) + origin, Pos2::new(axis_x, y_scale.range.1) + origin],
            axis_stroke,
        );
        for tick in y_scale.ticks(TICK_COUNT) {
            let y = y_scale.map(tick);
            let base = Pos2::new(axis_x, y) + origin;
            painter.line_segment([base, base - Vec2::new(TICK_LENGTH, 0.0)], axis_stroke);
            painter.text(
                base - Vec2::new(TICK_LENGTH + 2.0, 0.0),
                Align2::RIGHT_CENTER,
                tick_label(tick),
                font.clone(),
                colors::AXIS,
            );
        }

        painter.text(
            Pos2::new(self.size.x / 2.0, self.margins.top) + origin,
            Align2::CENTER_BOTTOM,
            &self.title,
            FontId::proportional(14.0),
            ui.visuals().text_color(),
        );

        // Highlighted points on top
        let ordered = self
            .marks
            .iter()
            .filter(|m| !m.highlighted)
            .chain(self.marks.iter().filter(|m| m.highlighted));
        let shapes: Vec<Shape> = ordered
            .map(|mark| {
                let style = mark.style();
                Shape::circle_filled(mark.pos + origin, style.radius, style.fill)
            })
            .collect();
        painter.extend(shapes);
    }
}

impl HighlightTarget for ScatterView {
    fn set_highlight(&mut self, key: &CountryKey, on: bool) {
        if let Some(&idx) = self.by_key.get(key) {
            self.marks[idx].highlighted = on;
        }
    }
}

/// Shortest decimal rendering of a tick value
fn tick_label(value: f64) -> String {
    let label = format!("{:.2}", value);
    let label = label.trim_end_matches('0').trim_end_matches('.');
    match label {
        "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points() -> Vec<(CountryKey, ProjectedPoint)> {
        vec![
            ("Chile".into(), ProjectedPoint::new(-2.0, 1.0)),
            ("Peru".into(), ProjectedPoint::new(2.0, -1.0)),
            ("Cuba".into(), ProjectedPoint::new(0.0, 0.0)),
        ]
    }

    fn rendered() -> ScatterView {
        let mut view = ScatterView::new(Vec2::new(400.0, 400.0), MarkHandlers::noop());
        view.render(&points());
        view
    }

    #[test]
    fn test_points_span_plot_area() {
        let view = rendered();
        assert_eq!(view.position_of(&"Chile".into()), Some(Pos2::new(40.0, 20.0)));
        assert_eq!(view.position_of(&"Peru".into()), Some(Pos2::new(380.0, 370.0)));
        assert_eq!(view.position_of(&"Cuba".into()), Some(Pos2::new(210.0, 195.0)));
    }

    #[test]
    fn test_hit_test_uses_radius_and_tolerance() {
        let view = rendered();
        let cuba = CountryKey::new("Cuba");
        assert_eq!(view.mark_at(Pos2::new(216.0, 195.0)), Some(&cuba));
        assert_eq!(view.mark_at(Pos2::new(218.0, 195.0)), None);
    }

    #[test]
    fn test_highlight_restores_baseline() {
        let mut view = rendered();
        let baseline = view.styles();
        let chile = CountryKey::new("Chile");

        view.set_highlight(&chile, true);
        assert_eq!(view.style_of(&chile), Some(PointStyle::HIGHLIGHTED));
        assert_eq!(view.style_of(&"Peru".into()), Some(PointStyle::BASELINE));

        view.set_highlight(&chile, false);
        assert_eq!(view.styles(), baseline);
    }

    #[test]
    fn test_empty_points_render_nothing() {
        let mut view = ScatterView::new(Vec2::new(400.0, 400.0), MarkHandlers::noop());
        view.render(&[]);
        assert!(!view.is_rendered());
    }

    #[test]
    fn test_tick_labels() {
        assert_eq!(tick_label(2.0), "2");
        assert_eq!(tick_label(-0.5), "-0.5");
        assert_eq!(tick_label(0.25), "0.25");
        assert_eq!(tick_label(-0.0), "0");
    }
}
