//! Linear scales mapping data values onto surface pixels

/// Continuous linear mapping from a data domain to a pixel range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f32, f32),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f32, f32)) -> Self {
        Self { domain, range }
    }

    /// Scale whose domain is the extent of `values`.
    ///
    /// Non-finite values are ignored. Returns `None` when nothing is left.
    pub fn from_extent(values: impl IntoIterator<Item = f64>, range: (f32, f32)) -> Option<Self> {
        let (min, max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
                None => Some((v, v)),
            })?;
        Some(Self::new((min, max), range))
    }

    /// Map a domain value to the range
    pub fn map(&self, value: f64) -> f32 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        let t = if span == 0.0 { 0.5 } else { (value - d0) / span };
        r0 + (r1 - r0) * t as f32
    }

    /// Map a range value back to the domain
    pub fn invert(&self, pixel: f32) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = r1 - r0;
        let t = if span == 0.0 { 0.5 } else { ((pixel - r0) / span) as f64 };
        d0 + (d1 - d0) * t
    }

    /// Roughly `count` evenly spaced round values inside the domain
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = if self.domain.0 <= self.domain.1 {
            self.domain
        } else {
            (self.domain.1, self.domain.0)
        };

        if count == 0 || !lo.is_finite() || !hi.is_finite() {
            return Vec::new();
        }
        if lo == hi {
            return vec![lo];
        }

        let step = tick_step(lo, hi, count);
        let first = (lo / step).ceil() as i64;
        let last = (hi / step).floor() as i64;
        (first..=last).map(|i| i as f64 * step).collect()
    }
}

/// Step of 1, 2 or 5 times a power of ten closest to `(hi - lo) / count`
fn tick_step(lo: f64, hi: f64, count: usize) -> f64 {
    let raw = (hi - lo) / count as f64;
    let power = 10f64.powf(raw.log10().floor());
    let error = raw / power;

    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };

    factor * power
}

/// Linear interpolation between two values
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_and_invert() {
        let scale = LinearScale::new((0.0, 10.0), (40.0, 380.0));
        assert_eq!(scale.map(0.0), 40.0);
        assert_eq!(scale.map(10.0), 380.0);
        assert!((scale.invert(210.0) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_inverted_range() {
        // Vertical axes grow upwards
        let scale = LinearScale::new((0.0, 1.0), (370.0, 20.0));
        assert_eq!(scale.map(1.0), 20.0);
        assert_eq!(scale.map(0.0), 370.0);
    }

    #[test]
    fn test_from_extent_ignores_non_finite() {
        let scale = LinearScale::from_extent(vec![3.0, f64::NAN, -2.0, 7.5], (0.0, 1.0)).unwrap();
        assert_eq!(scale.domain, (-2.0, 7.5));
        assert!(LinearScale::from_extent(vec![f64::NAN], (0.0, 1.0)).is_none());
    }

    #[test]
    fn test_degenerate_domain_maps_to_middle() {
        let scale = LinearScale::new((4.0, 4.0), (0.0, 100.0));
        assert_eq!(scale.map(4.0), 50.0);
    }

    #[test]
    fn test_nice_ticks() {
        let scale = LinearScale::new((0.0, 55.0), (0.0, 1.0));
        assert_eq!(scale.ticks(10), vec![0.0, 5.0, 10.0, 15.0, 20.0, 25.0, 30.0, 35.0, 40.0, 45.0, 50.0, 55.0]);

        let scale = LinearScale::new((-3.2, 4.1), (0.0, 1.0));
        assert_eq!(scale.ticks(5), vec![-2.0, 0.0, 2.0, 4.0]);
    }
}
