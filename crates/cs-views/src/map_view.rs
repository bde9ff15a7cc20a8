//! Choropleth world map
//!
//! Country outlines are projected once at render time. Fills are triangulated
//! for painting; the bounding boxes go into an R-tree so the pointer can be
//! resolved to a polygon without scanning every country.

use ahash::AHashMap;
use cs_core::{CountryKey, DatasetStore, HighlightTarget, MarkHandlers};
use cs_data::GeometryFeature;
use egui::epaint::Mesh;
use egui::{Pos2, Rect, Sense, Shape, Ui, Vec2};
use geo::{BoundingRect, Contains, Coord, LineString, MapCoords, Point, Polygon, TriangulateEarcut};
use rstar::primitives::{GeomWithData, Rectangle};
use rstar::RTree;
use tracing::info;

use crate::marks::{HoverTracker, PolygonStyle};
use crate::projection::EqualEarth;

/// Bounding box of one polygon, tagged with its index
type PolygonEnvelope = GeomWithData<Rectangle<[f64; 2]>, usize>;

struct MapPolygon {
    key: Option<CountryKey>,
    /// Key resolves in the dataset
    known: bool,
    /// Outline in surface-local pixels
    outline: Polygon<f64>,
    triangles: Vec<[Pos2; 3]>,
    highlighted: bool,
}

impl MapPolygon {
    fn style(&self) -> PolygonStyle {
        if self.highlighted {
            PolygonStyle::highlighted()
        } else {
            PolygonStyle::baseline(self.known)
        }
    }

    fn paint(&self, shapes: &mut Vec<Shape>, origin: Vec2) {
        let style = self.style();

        let mut mesh = Mesh::default();
        for triangle in &self.triangles {
            let base = mesh.vertices.len() as u32;
            for vertex in triangle {
                mesh.colored_vertex(*vertex + origin, style.fill);
            }
            mesh.add_triangle(base, base + 1, base + 2);
        }
        shapes.push(Shape::mesh(mesh));

        for ring in std::iter::once(self.outline.exterior()).chain(self.outline.interiors()) {
            shapes.push(Shape::closed_line(ring_points(ring, origin), style.stroke));
        }
    }
}

fn ring_points(ring: &LineString<f64>, origin: Vec2) -> Vec<Pos2> {
    let mut points: Vec<Pos2> = ring.coords().map(|c| Pos2::new(c.x as f32, c.y as f32) + origin).collect();
    // Closed rings repeat their first point
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    points
}

/// World map of country polygons
pub struct MapView {
    size: Vec2,
    projection: EqualEarth,
    polygons: Vec<MapPolygon>,
    by_key: AHashMap<CountryKey, Vec<usize>>,
    index: RTree<PolygonEnvelope>,
    handlers: MarkHandlers,
    hover: HoverTracker,
}

impl MapView {
    pub fn new(size: Vec2, handlers: MarkHandlers) -> Self {
        Self {
            size,
            projection: EqualEarth::centered(size.x, size.y),
            polygons: Vec::new(),
            by_key: AHashMap::new(),
            index: RTree::new(),
            handlers,
            hover: HoverTracker::new(),
        }
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Build the projected polygons, replacing anything drawn before
    pub fn render(&mut self, features: &[GeometryFeature], store: &DatasetStore) {
        let projection = self.projection;
        self.polygons.clear();
        self.by_key.clear();

        for feature in features {
            let known = feature.key.as_ref().map_or(false, |key| store.contains(key));

            for polygon in feature.geometry.0.iter() {
                let outline = polygon.map_coords(|Coord { x, y }| {
                    let (x, y) = projection.project(x, y);
                    Coord { x, y }
                });
                let triangles = outline
                    .earcut_triangles()
                    .into_iter()
                    .map(|t| [to_pos(t.v1()), to_pos(t.v2()), to_pos(t.v3())])
                    .collect();

                if let Some(key) = &feature.key {
                    self.by_key.entry(key.clone()).or_default().push(self.polygons.len());
                }
                self.polygons.push(MapPolygon {
                    key: feature.key.clone(),
                    known,
                    outline,
                    triangles,
                    highlighted: false,
                });
            }
        }

        let envelopes = self
            .polygons
            .iter()
            .enumerate()
            .filter_map(|(idx, polygon)| {
                let bounds = polygon.outline.bounding_rect()?;
                let rect = Rectangle::from_corners([bounds.min().x, bounds.min().y], [bounds.max().x, bounds.max().y]);
                Some(GeomWithData::new(rect, idx))
            })
            .collect();
        self.index = RTree::bulk_load(envelopes);

        let unknown = self.polygons.iter().filter(|p| !p.known).count();
        info!(
            "Map rendered {} polygons for {} features ({} without data)",
            self.polygons.len(),
            features.len(),
            unknown
        );
    }

    /// Whether outlines have been rendered
    pub fn is_rendered(&self) -> bool {
        !self.polygons.is_empty()
    }

    /// Key of the topmost polygon under a surface-local position
    pub fn mark_at(&self, pos: Pos2) -> Option<&CountryKey> {
        let point = Point::new(pos.x as f64, pos.y as f64);
        let topmost = self
            .index
            .locate_all_at_point(&[point.x(), point.y()])
            .map(|envelope| envelope.data)
            .filter(|&idx| self.polygons[idx].outline.contains(&point))
            .max()?;
        self.polygons[topmost].key.as_ref()
    }

    /// Current style of the first polygon carrying `key`
    pub fn style_of(&self, key: &CountryKey) -> Option<PolygonStyle> {
        let idx = *self.by_key.get(key)?.first()?;
        Some(self.polygons[idx].style())
    }

    /// Current style of every polygon in paint order
    pub fn styles(&self) -> Vec<PolygonStyle> {
        self.polygons.iter().map(MapPolygon::style).collect()
    }

    pub fn ui(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(self.size, Sense::click());
        if self.polygons.is_empty() {
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
        let origin = rect.min.to_vec2();
        let mut shapes = Vec::with_capacity(self.polygons.len() * 2);

        // Highlighted outlines go last so their heavier stroke stays visible
        for polygon in self.polygons.iter().filter(|p| !p.highlighted) {
            polygon.paint(&mut shapes, origin);
        }
        for polygon in self.polygons.iter().filter(|p| p.highlighted) {
            polygon.paint(&mut shapes, origin);
        }

        ui.painter_at(rect).extend(shapes);
    }
}

impl HighlightTarget for MapView {
    fn set_highlight(&mut self, key: &CountryKey, on: bool) {
        let Some(indices) = self.by_key.get(key) else {
            return;
        };
        for &idx in indices {
            self.polygons[idx].highlighted = on;
        }
    }
}

fn to_pos(coord: Coord<f64>) -> Pos2 {
    Pos2::new(coord.x as f32, coord.y as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cs_core::CountryRecord;
    use geo::{polygon, MultiPolygon};

    fn square(lon: f64, lat: f64) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![polygon![
            (x: lon, y: lat),
            (x: lon + 10.0, y: lat),
            (x: lon + 10.0, y: lat + 10.0),
            (x: lon, y: lat + 10.0),
            (x: lon, y: lat),
        ]])
    }

    fn rendered_map() -> MapView {
        let features = vec![
            GeometryFeature { key: Some("Chile".into()), geometry: square(-75.0, -40.0) },
            GeometryFeature { key: Some("Chile".into()), geometry: square(-80.0, -60.0) },
            GeometryFeature { key: Some("Atlantis".into()), geometry: square(-30.0, 30.0) },
            GeometryFeature { key: None, geometry: square(100.0, 0.0) },
        ];
        let store = DatasetStore::new(vec!["gdp".into()], vec![CountryRecord::new("Chile".into())]);

        let mut map = MapView::new(Vec2::new(800.0, 500.0), MarkHandlers::noop());
        map.render(&features, &store);
        map
    }

    #[test]
    fn test_baseline_fill_follows_store() {
        let map = rendered_map();
        assert!(map.is_rendered());
        assert_eq!(map.style_of(&"Chile".into()), Some(PolygonStyle::baseline(true)));
        assert_eq!(map.style_of(&"Atlantis".into()), Some(PolygonStyle::baseline(false)));
    }

    #[test]
    fn test_highlight_covers_every_polygon_and_restores() {
        let mut map = rendered_map();
        let baseline = map.styles();
        let chile = CountryKey::new("Chile");

        map.set_highlight(&chile, true);
        let highlighted = map.styles();
        assert_eq!(highlighted[0], PolygonStyle::highlighted());
        assert_eq!(highlighted[1], PolygonStyle::highlighted());
        assert_eq!(highlighted[2], baseline[2]);

        map.set_highlight(&chile, false);
        assert_eq!(map.styles(), baseline);
    }

    #[test]
    fn test_highlight_unknown_key_is_noop() {
        let mut map = rendered_map();
        let baseline = map.styles();
        map.set_highlight(&"Narnia".into(), true);
        assert_eq!(map.styles(), baseline);
    }

    #[test]
    fn test_mark_at_resolves_keys() {
        let map = rendered_map();
        let projection = EqualEarth::centered(800.0, 500.0);

        let inside_chile = projection.project_pos(-70.0, -35.0);
        assert_eq!(map.mark_at(inside_chile), Some(&CountryKey::new("Chile")));

        let unnamed = projection.project_pos(105.0, 5.0);
        assert_eq!(map.mark_at(unnamed), None);

        let ocean = projection.project_pos(0.0, -80.0);
        assert_eq!(map.mark_at(ocean), None);
    }
}
