//! Yearly line chart for one country or the all-country average
//!
//! Every render starts an eased transition from whatever is on screen to the
//! new series, so switching country or indicator never jump-cuts.

use cs_core::scale::lerp;
use cs_core::series::{max_value, year_extent};
use cs_core::{
    average_series, single_series, ChartMode, DatasetStore, SelectionListener, SelectionState, SeriesPoint,
    ViewerContext,
};
use egui::{Align2, RichText, Ui, Vec2};
use egui_plot::{Line, MarkerShape, Plot, PlotBounds, PlotPoint, PlotPoints, Points, Text};
use tracing::debug;

use crate::colors;

const MARKER_RADIUS: f32 = 4.0;
const HOVERED_MARKER_RADIUS: f32 = 6.0;

/// Domains and point positions drawn in one frame
#[derive(Debug, Clone, PartialEq)]
pub struct ChartFrame {
    /// `[year, value]` pairs
    pub points: Vec<[f64; 2]>,
    pub x_domain: (f64, f64),
    pub y_domain: (f64, f64),
}

impl Default for ChartFrame {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            x_domain: (0.0, 1.0),
            y_domain: (0.0, 1.0),
        }
    }
}

impl ChartFrame {
    /// Target frame for `series`; an empty series keeps `previous_x`
    pub fn for_series(series: &[SeriesPoint], previous_x: (f64, f64)) -> Self {
        Self {
            points: series.iter().map(|p| [p.year as f64, p.value]).collect(),
            x_domain: x_domain(series).unwrap_or(previous_x),
            y_domain: y_domain(series),
        }
    }

    /// Frame between `self` and `target` at eased progress `t`.
    ///
    /// New points grow out of the last point drawn so far, or out of the
    /// baseline when nothing was drawn. Surplus points collapse into the
    /// target's last point, or onto the baseline when the target is empty.
    pub fn interpolate(&self, target: &ChartFrame, t: f64) -> ChartFrame {
        let points = match target.points.last() {
            None => self
                .points
                .iter()
                .map(|p| [p[0], lerp(p[1], target.y_domain.0, t)])
                .collect(),
            Some(&target_last) => {
                let count = self.points.len().max(target.points.len());
                (0..count)
                    .map(|i| {
                        let end = target.points.get(i).copied().unwrap_or(target_last);
                        let start = self
                            .points
                            .get(i)
                            .or(self.points.last())
                            .copied()
                            .unwrap_or([end[0], target.y_domain.0]);
                        [lerp(start[0], end[0], t), lerp(start[1], end[1], t)]
                    })
                    .collect()
            }
        };

        ChartFrame {
            points,
            x_domain: (
                lerp(self.x_domain.0, target.x_domain.0, t),
                lerp(self.x_domain.1, target.x_domain.1, t),
            ),
            y_domain: (
                lerp(self.y_domain.0, target.y_domain.0, t),
                lerp(self.y_domain.1, target.y_domain.1, t),
            ),
        }
    }
}

/// Exact year extent; a single year is widened by one on each side
fn x_domain(series: &[SeriesPoint]) -> Option<(f64, f64)> {
    let (first, last) = year_extent(series)?;
    if first == last {
        Some((first as f64 - 1.0, last as f64 + 1.0))
    } else {
        Some((first as f64, last as f64))
    }
}

/// `[0, max * 1.1]`, or `[0, 1]` when there is nothing positive to show
fn y_domain(series: &[SeriesPoint]) -> (f64, f64) {
    match max_value(series).map(|max| max * 1.1) {
        Some(upper) if upper > 0.0 => (0.0, upper),
        Some(upper) if upper < 0.0 => (upper, 0.0),
        _ => (0.0, 1.0),
    }
}

/// Cubic ease-in-out on `[0, 1]`
pub fn ease_in_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

struct Transition {
    from: ChartFrame,
    /// Set on the first frame painted after the render
    started: Option<f64>,
}

pub struct LineChartView {
    size: Vec2,
    /// Transition length in seconds
    duration: f64,
    title: String,
    indicator: String,
    series: Vec<SeriesPoint>,
    target: ChartFrame,
    displayed: ChartFrame,
    transition: Option<Transition>,
    rendered: bool,
}

impl LineChartView {
    pub fn new(size: Vec2, duration: f64) -> Self {
        Self {
            size,
            duration,
            title: String::new(),
            indicator: String::new(),
            series: Vec::new(),
            target: ChartFrame::default(),
            displayed: ChartFrame::default(),
            transition: None,
            rendered: false,
        }
    }

    /// Show `indicator` for one country or averaged over all of them
    pub fn render(&mut self, store: &DatasetStore, indicator: &str, mode: &ChartMode) {
        let (series, title) = match mode {
            ChartMode::Single(country) => (
                store.get(country).map(|r| single_series(r, indicator)).unwrap_or_default(),
                format!("{} for {}", indicator, country),
            ),
            ChartMode::Average => (
                average_series(store, indicator),
                format!("Average {} Across All Countries", indicator),
            ),
        };
        debug!("Line chart '{}' with {} points", title, series.len());

        let target = ChartFrame::for_series(&series, self.target.x_domain);
        self.transition = Some(Transition {
            from: self.displayed.clone(),
            started: None,
        });
        self.title = title;
        self.indicator = indicator.to_string();
        self.series = series;
        self.target = target;
        self.rendered = true;
    }

    pub fn is_rendered(&self) -> bool {
        self.rendered
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Indicator on the y axis
    pub fn indicator(&self) -> &str {
        &self.indicator
    }

    pub fn series(&self) -> &[SeriesPoint] {
        &self.series
    }

    /// Frame the current transition settles on
    pub fn target(&self) -> &ChartFrame {
        &self.target
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Frame to draw at `time` seconds; finishes the transition once it has run its course
    pub fn advance(&mut self, time: f64) -> &ChartFrame {
        let frame = match &mut self.transition {
            None => self.target.clone(),
            Some(transition) => {
                let started = *transition.started.get_or_insert(time);
                let progress = if self.duration > 0.0 {
                    (time - started) / self.duration
                } else {
                    1.0
                };

                if progress >= 1.0 {
                    self.transition = None;
                    self.target.clone()
                } else {
                    transition.from.interpolate(&self.target, ease_in_out_cubic(progress))
                }
            }
        };
        self.displayed = frame;
        &self.displayed
    }

    pub fn ui(&mut self, ctx: &ViewerContext, ui: &mut Ui) {
        if !self.rendered {
            ui.allocate_space(self.size);
            return;
        }

        ui.vertical_centered(|ui| {
            ui.label(RichText::new(&self.title).size(16.0));
        });
        let frame = self.advance(ctx.time).clone();
        if self.is_animating() {
            ui.ctx().request_repaint();
        }

        let plot = Plot::new("line_chart")
            .width(self.size.x)
            .height(self.size.y)
            .x_axis_label("Year")
            .y_axis_label(self.indicator.clone())
            .auto_bounds(egui::Vec2b::new(false, false))
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .show_x(false)
            .show_y(false);

        plot.show(ui, |plot_ui| {
            plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                [frame.x_domain.0, frame.y_domain.0],
                [frame.x_domain.1, frame.y_domain.1],
            ));

            if frame.points.is_empty() {
                return;
            }

            plot_ui.line(
                Line::new(PlotPoints::new(frame.points.clone()))
                    .color(colors::STEELBLUE)
                    .width(2.0),
            );
            plot_ui.points(
                Points::new(PlotPoints::new(frame.points.clone()))
                    .radius(MARKER_RADIUS)
                    .shape(MarkerShape::Circle)
                    .filled(true)
                    .color(colors::STEELBLUE),
            );

            // Hovered marker: nearest in screen space within the enlarged radius
            let Some(pointer) = plot_ui.response().hover_pos() else {
                return;
            };
            let hovered = frame
                .points
                .iter()
                .map(|p| (p, plot_ui.screen_from_plot(PlotPoint::new(p[0], p[1])).distance(pointer)))
                .filter(|(_, distance)| *distance <= HOVERED_MARKER_RADIUS)
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(p, _)| *p);

            if let Some(point) = hovered {
                plot_ui.points(
                    Points::new(vec![point])
                        .radius(HOVERED_MARKER_RADIUS)
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .color(colors::HIGHLIGHT),
                );
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(point[0], point[1]),
                        RichText::new(format!("Year: {:.0}\nValue: {:.2}", point[0], point[1])).small(),
                    )
                    .anchor(Align2::LEFT_BOTTOM),
                );
            }
        });
    }
}

impl SelectionListener for LineChartView {
    fn on_selection_change(&mut self, store: &DatasetStore, selection: &SelectionState) {
        if let Some(indicator) = &selection.selected_indicator {
            self.render(store, indicator, &selection.mode());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cs_core::{CountryKey, CountryRecord, IndicatorValues};

    fn record(name: &str, history: &[(i32, f64)]) -> CountryRecord {
        let mut record = CountryRecord::new(name.into());
        for &(year, value) in history {
            let mut values = IndicatorValues::new();
            values.insert("gdp".into(), value);
            record.history.insert(year, values);
        }
        record
    }

    fn store() -> DatasetStore {
        DatasetStore::new(
            vec!["gdp".into()],
            vec![
                record("Chile", &[(2005, 30.0), (2003, 100.0), (2004, 20.0)]),
                record("Peru", &[(2003, 50.0), (2004, 40.0)]),
            ],
        )
    }

    fn chart() -> LineChartView {
        LineChartView::new(Vec2::new(800.0, 400.0), 0.75)
    }

    #[test]
    fn test_single_series_ascending() {
        let mut chart = chart();
        chart.render(&store(), "gdp", &ChartMode::Single(CountryKey::new("Chile")));

        let years: Vec<f64> = chart.target().points.iter().map(|p| p[0]).collect();
        assert_eq!(years, vec![2003.0, 2004.0, 2005.0]);
        assert_eq!(chart.title(), "gdp for Chile");
        assert_eq!(chart.target().x_domain, (2003.0, 2005.0));
    }

    #[test]
    fn test_average_mode() {
        let mut chart = chart();
        chart.render(&store(), "gdp", &ChartMode::Average);

        assert_eq!(chart.title(), "Average gdp Across All Countries");
        assert_eq!(
            chart.series(),
            &[
                SeriesPoint::new(2003, 75.0),
                SeriesPoint::new(2004, 30.0),
                SeriesPoint::new(2005, 30.0),
            ]
        );
    }

    #[test]
    fn test_y_domain_recomputed() {
        let mut chart = chart();
        let store = store();

        chart.render(&store, "gdp", &ChartMode::Single("Chile".into()));
        assert!((chart.target().y_domain.1 - 110.0).abs() < 1e-9);

        chart.render(&store, "gdp", &ChartMode::Single("Peru".into()));
        assert!((chart.target().y_domain.1 - 55.0).abs() < 1e-9);
        assert_eq!(chart.target().y_domain.0, 0.0);
    }

    #[test]
    fn test_domain_edge_cases() {
        let single = [SeriesPoint::new(2010, 4.0)];
        let frame = ChartFrame::for_series(&single, (0.0, 1.0));
        assert_eq!(frame.x_domain, (2009.0, 2011.0));

        let empty = ChartFrame::for_series(&[], (1990.0, 2000.0));
        assert_eq!(empty.x_domain, (1990.0, 2000.0));
        assert_eq!(empty.y_domain, (0.0, 1.0));
    }

    #[test]
    fn test_transition_eases_to_target() {
        let mut chart = chart();
        let store = store();
        chart.render(&store, "gdp", &ChartMode::Single("Peru".into()));
        chart.advance(0.0);
        chart.advance(1.0);
        assert!(!chart.is_animating());

        chart.render(&store, "gdp", &ChartMode::Single("Chile".into()));
        let start = chart.advance(10.0).clone();
        assert_eq!(start.points.len(), 3);
        // The new third point grows out of Peru's last point
        assert_eq!(start.points[2], [2004.0, 40.0]);

        let midway = chart.advance(10.375).clone();
        assert!(midway.y_domain.1 > 55.0 && midway.y_domain.1 < 110.0);
        assert!(chart.is_animating());

        let end = chart.advance(10.75).clone();
        assert_eq!(&end, chart.target());
        assert!(!chart.is_animating());
    }

    #[test]
    fn test_switch_to_empty_series_collapses_to_baseline() {
        let mut chart = chart();
        let mut store_records: Vec<CountryRecord> = store().records().cloned().collect();
        store_records.push(CountryRecord::new("Cuba".into()));
        let store = DatasetStore::new(vec!["gdp".into()], store_records);

        chart.render(&store, "gdp", &ChartMode::Single("Peru".into()));
        chart.advance(0.0);
        chart.advance(1.0);

        chart.render(&store, "gdp", &ChartMode::Single("Cuba".into()));
        let start = chart.advance(5.0).clone();
        assert_eq!(start.points, vec![[2003.0, 50.0], [2004.0, 40.0]]);
        assert!(chart.is_animating());

        let midway = chart.advance(5.375).clone();
        assert_eq!(midway.points.len(), 2);
        assert!(midway.points[0][1] > 0.0 && midway.points[0][1] < 50.0);
        assert_eq!(midway.points[0][0], 2003.0);

        let end = chart.advance(5.75).clone();
        assert!(end.points.is_empty());
        assert!(!chart.is_animating());
    }

    #[test]
    fn test_axis_indicator_follows_render() {
        let mut chart = chart();
        chart.render(&store(), "gdp", &ChartMode::Average);
        assert_eq!(chart.indicator(), "gdp");
    }

    #[test]
    fn test_ease_endpoints() {
        assert_eq!(ease_in_out_cubic(0.0), 0.0);
        assert_eq!(ease_in_out_cubic(0.5), 0.5);
        assert_eq!(ease_in_out_cubic(1.0), 1.0);
    }

    #[test]
    fn test_selection_without_indicator_does_not_render() {
        let mut chart = chart();
        chart.on_selection_change(&store(), &SelectionState::default());
        assert!(!chart.is_rendered());
    }
}
