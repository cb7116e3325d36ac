//! Precision models and the scale estimators used to pick a grid for
//! snap-rounding.

use serde::{Deserialize, Serialize};

use super::{Envelope, Geometry};
use crate::math::Coord;

/// Number of decimal digits of precision an `f64` can safely carry through
/// overlay computations.
pub const MAX_ROBUST_DIGITS: i32 = 14;

/// The numeric domain coordinates are computed in.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PrecisionModel {
    /// Full double precision.
    #[default]
    Floating,
    /// Coordinates lie on a grid with resolution `1 / scale`.
    Fixed { scale: f64 },
}

impl PrecisionModel {
    #[must_use]
    pub fn fixed(scale: f64) -> Self {
        Self::Fixed { scale }
    }

    #[must_use]
    pub fn is_floating(&self) -> bool {
        matches!(self, Self::Floating)
    }

    /// The grid scale, or `None` for floating precision.
    #[must_use]
    pub fn scale(&self) -> Option<f64> {
        match self {
            Self::Floating => None,
            Self::Fixed { scale } => Some(*scale),
        }
    }

    /// Grid cell size (`0` for floating precision).
    #[must_use]
    pub fn grid_size(&self) -> f64 {
        match self {
            Self::Floating => 0.0,
            Self::Fixed { scale } => 1.0 / scale,
        }
    }

    /// Rounds a value to the model's grid, half-up.
    #[must_use]
    pub fn make_precise(&self, v: f64) -> f64 {
        match *self {
            Self::Floating => v,
            Self::Fixed { scale } => {
                if scale < 1.0 {
                    let grid = 1.0 / scale;
                    (v / grid + 0.5).floor() * grid
                } else {
                    (v * scale + 0.5).floor() / scale
                }
            }
        }
    }

    #[must_use]
    pub fn make_precise_coord(&self, c: &Coord) -> Coord {
        Coord::new(self.make_precise(c.x), self.make_precise(c.y))
    }
}

/// Largest absolute bounding ordinate of an envelope.
#[must_use]
pub fn max_bound_magnitude(env: &Envelope) -> f64 {
    env.max_magnitude()
}

/// Scale that keeps `max_digits` significant digits for values up to
/// `magnitude`.
#[must_use]
pub fn safe_scale(magnitude: f64, max_digits: i32) -> f64 {
    if magnitude <= 0.0 || !magnitude.is_finite() {
        return 10f64.powi(max_digits);
    }
    #[allow(clippy::cast_possible_truncation)]
    let mag_digits = magnitude.log10().ceil() as i32;
    10f64.powi(max_digits - mag_digits)
}

/// Safe scale for one or two geometries, based on their bounding
/// magnitude.
#[must_use]
pub fn safe_scale_of(a: &Geometry, b: Option<&Geometry>, max_digits: i32) -> f64 {
    let mut magnitude = max_bound_magnitude(&a.envelope());
    if let Some(b) = b {
        magnitude = magnitude.max(max_bound_magnitude(&b.envelope()));
    }
    safe_scale(magnitude, max_digits)
}

/// Number of decimal places in the shortest round-tripping decimal form
/// of `v`.
fn number_of_decimals(v: f64) -> i32 {
    let s = format!("{v}");
    match s.find('.') {
        Some(dot) => i32::try_from(s.len() - dot - 1).unwrap_or(i32::MAX),
        None => 0,
    }
}

/// Scale implied by the decimal places actually present in a geometry's
/// coordinates.
#[must_use]
pub fn inherent_scale(g: &Geometry) -> f64 {
    let digits = g
        .coords()
        .iter()
        .flat_map(|c| [number_of_decimals(c.x), number_of_decimals(c.y)])
        .max()
        .unwrap_or(0);
    10f64.powi(digits)
}

/// The inherent scale of the inputs if it is no finer than the safe scale,
/// otherwise the safe scale.
#[must_use]
pub fn robust_scale(a: &Geometry, b: Option<&Geometry>, max_digits: i32) -> f64 {
    let mut inherent = inherent_scale(a);
    if let Some(b) = b {
        inherent = inherent.max(inherent_scale(b));
    }
    let safe = safe_scale_of(a, b, max_digits);
    if inherent > 0.0 && inherent <= safe {
        inherent
    } else {
        safe
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{LineString, Polygon};
    use approx::assert_relative_eq;

    #[test]
    fn make_precise_rounds_half_up() {
        let pm = PrecisionModel::fixed(10.0);
        assert_relative_eq!(pm.make_precise(1.25), 1.3);
        assert_relative_eq!(pm.make_precise(-1.25), -1.2);
        assert_relative_eq!(pm.make_precise(1.24), 1.2);
        assert_relative_eq!(PrecisionModel::Floating.make_precise(1.2345), 1.2345);
    }

    #[test]
    fn make_precise_coarse_grid() {
        let pm = PrecisionModel::fixed(0.01);
        assert_relative_eq!(pm.make_precise(149.0), 100.0);
        assert_relative_eq!(pm.make_precise(150.0), 200.0);
        assert_relative_eq!(pm.grid_size(), 100.0);
    }

    #[test]
    fn safe_scale_tracks_magnitude() {
        assert_relative_eq!(safe_scale(0.0, MAX_ROBUST_DIGITS), 1e14);
        assert_relative_eq!(safe_scale(1.0, MAX_ROBUST_DIGITS), 1e14);
        assert_relative_eq!(safe_scale(10.0, MAX_ROBUST_DIGITS), 1e13);
        assert_relative_eq!(safe_scale(1234.5, MAX_ROBUST_DIGITS), 1e10);
    }

    #[test]
    fn inherent_scale_counts_decimals() {
        let g = Geometry::LineString(LineString::from_xy(&[(1.5, 2.0), (3.25, 4.0)]));
        assert_relative_eq!(inherent_scale(&g), 100.0);
        let ints = Geometry::from(Polygon::rect(0.0, 0.0, 10.0, 10.0));
        assert_relative_eq!(inherent_scale(&ints), 1.0);
    }

    #[test]
    fn robust_scale_prefers_inherent() {
        let a = Geometry::LineString(LineString::from_xy(&[(1.5, 2.0), (3.25, 4.0)]));
        assert_relative_eq!(robust_scale(&a, None, MAX_ROBUST_DIGITS), 100.0);
        let fine = Geometry::LineString(LineString::from_xy(&[(0.1, 0.2), (1000.0, 0.3)]));
        let b = Geometry::LineString(LineString::from_xy(&[(1.0 / 3.0, 0.0), (2.0, 0.0)]));
        // 1/3 has 16 decimals, finer than the safe scale for magnitude 1000.
        assert_relative_eq!(robust_scale(&fine, Some(&b), MAX_ROBUST_DIGITS), 1e11);
    }

    #[test]
    fn serde_round_trip() {
        let pm = PrecisionModel::fixed(1000.0);
        let json = serde_json::to_string(&pm).unwrap_or_default();
        let back: PrecisionModel = serde_json::from_str(&json).unwrap_or_default();
        assert_eq!(back, pm);
    }
}
