//! Equal Earth map projection

use egui::Pos2;

const A1: f64 = 1.340264;
const A2: f64 = -0.081106;
const A3: f64 = 0.000893;
const A4: f64 = 0.003796;

/// Equal Earth projection with a uniform scale and a screen-space translation.
///
/// Screen y grows downwards, so northern latitudes land above the centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EqualEarth {
    pub scale: f64,
    pub translate: (f64, f64),
}

impl EqualEarth {
    pub const DEFAULT_SCALE: f64 = 180.0;

    pub fn new(scale: f64, translate: (f64, f64)) -> Self {
        Self { scale, translate }
    }

    /// Default scale, centred on a surface of the given size
    pub fn centered(width: f32, height: f32) -> Self {
        Self::new(Self::DEFAULT_SCALE, (width as f64 / 2.0, height as f64 / 2.0))
    }

    /// Unit-sphere projection of longitude/latitude in degrees
    pub fn raw(lon: f64, lat: f64) -> (f64, f64) {
        let m = 3f64.sqrt() / 2.0;
        let lambda = lon.to_radians();
        let l = (m * lat.to_radians().sin()).asin();
        let l2 = l * l;
        let l6 = l2 * l2 * l2;

        let x = lambda * l.cos() / (m * (A1 + 3.0 * A2 * l2 + l6 * (7.0 * A3 + 9.0 * A4 * l2)));
        let y = l * (A1 + A2 * l2 + l6 * (A3 + A4 * l2));
        (x, y)
    }

    /// Surface-local coordinates of a longitude/latitude pair
    pub fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        let (x, y) = Self::raw(lon, lat);
        (self.translate.0 + self.scale * x, self.translate.1 - self.scale * y)
    }

    pub fn project_pos(&self, lon: f64, lat: f64) -> Pos2 {
        let (x, y) = self.project(lon, lat);
        Pos2::new(x as f32, y as f32)
    }
}
