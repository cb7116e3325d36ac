pub mod distance_2d;
pub mod intersect_2d;
pub mod orientation;
pub mod polygon_2d;

use std::cmp::Ordering;

/// 2D coordinate type.
pub type Coord = nalgebra::Point2<f64>;

/// Global geometric tolerance for floating-point comparisons in tests and
/// heuristics. Topological decisions never use it.
pub const TOLERANCE: f64 = 1e-10;

/// Shorthand constructor for a [`Coord`].
#[must_use]
pub fn coord(x: f64, y: f64) -> Coord {
    Coord::new(x, y)
}

/// Total lexicographic order on coordinates (x first, then y).
#[must_use]
pub fn compare_xy(a: &Coord, b: &Coord) -> Ordering {
    a.x.total_cmp(&b.x).then_with(|| a.y.total_cmp(&b.y))
}

/// Hashable identity of a coordinate, used to key graph nodes and hot pixels.
///
/// `-0.0` and `0.0` map to the same key so that exact equality of coordinates
/// and key equality agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CoordKey(u64, u64);

impl From<&Coord> for CoordKey {
    fn from(c: &Coord) -> Self {
        Self(canonical_bits(c.x), canonical_bits(c.y))
    }
}

fn canonical_bits(v: f64) -> u64 {
    if v == 0.0 {
        0.0_f64.to_bits()
    } else {
        v.to_bits()
    }
}

/// Quadrant of the direction from `p0` to `p1`, numbered counter-clockwise
/// starting at the positive x axis (0 = NE, 1 = NW, 2 = SW, 3 = SE).
///
/// Directions lying on an axis belong to the quadrant that starts at that
/// axis.
#[must_use]
pub fn quadrant(p0: &Coord, p1: &Coord) -> u8 {
    let dx = p1.x - p0.x;
    let dy = p1.y - p0.y;
    if dx >= 0.0 {
        if dy >= 0.0 {
            0
        } else {
            3
        }
    } else if dy >= 0.0 {
        1
    } else {
        2
    }
}

/// Removes consecutive duplicate coordinates.
#[must_use]
pub fn remove_repeated(points: &[Coord]) -> Vec<Coord> {
    let mut out: Vec<Coord> = Vec::with_capacity(points.len());
    for p in points {
        if out.last() != Some(p) {
            out.push(*p);
        }
    }
    out
}
