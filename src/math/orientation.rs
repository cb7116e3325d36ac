//! Orientation predicate with a floating-point filter and a double-double
//! fallback for near-collinear configurations.

use super::Coord;

/// Relative error bound used by the floating-point filter.
const DP_SAFE_EPSILON: f64 = 1e-15;

/// Orientation of a point relative to a directed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// The point lies to the right of the line.
    Clockwise,
    /// The point lies on the line.
    Collinear,
    /// The point lies to the left of the line.
    CounterClockwise,
}

impl Orientation {
    /// Returns `-1`, `0` or `1`.
    #[must_use]
    pub fn signum(self) -> i8 {
        match self {
            Self::Clockwise => -1,
            Self::Collinear => 0,
            Self::CounterClockwise => 1,
        }
    }

    fn from_sign(sign: i8) -> Self {
        match sign.cmp(&0) {
            std::cmp::Ordering::Less => Self::Clockwise,
            std::cmp::Ordering::Equal => Self::Collinear,
            std::cmp::Ordering::Greater => Self::CounterClockwise,
        }
    }
}

/// Returns the orientation of `q` relative to the directed segment `p1 → p2`.
#[must_use]
pub fn orientation_index(p1: &Coord, p2: &Coord, q: &Coord) -> Orientation {
    if let Some(sign) = orientation_filter(p1, p2, q) {
        return Orientation::from_sign(sign);
    }
    let dx1 = DoubleDouble::diff(p2.x, p1.x);
    let dy1 = DoubleDouble::diff(p2.y, p1.y);
    let dx2 = DoubleDouble::diff(q.x, p2.x);
    let dy2 = DoubleDouble::diff(q.y, p2.y);
    let det = dx1.mul(dy2).sub(dy1.mul(dx2));
    Orientation::from_sign(det.signum())
}

/// Fast determinant evaluation; `None` when the sign cannot be trusted.
fn orientation_filter(pa: &Coord, pb: &Coord, pc: &Coord) -> Option<i8> {
    let detleft = (pa.x - pc.x) * (pb.y - pc.y);
    let detright = (pa.y - pc.y) * (pb.x - pc.x);
    let det = detleft - detright;

    let detsum = if detleft > 0.0 {
        if detright <= 0.0 {
            return Some(sign_of(det));
        }
        detleft + detright
    } else if detleft < 0.0 {
        if detright >= 0.0 {
            return Some(sign_of(det));
        }
        -detleft - detright
    } else {
        return Some(sign_of(det));
    };

    let errbound = DP_SAFE_EPSILON * detsum;
    if det >= errbound || -det >= errbound {
        return Some(sign_of(det));
    }
    None
}

fn sign_of(v: f64) -> i8 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

/// Unevaluated sum `hi + lo` carrying roughly 106 bits of mantissa.
#[derive(Debug, Clone, Copy)]
struct DoubleDouble {
    hi: f64,
    lo: f64,
}

impl DoubleDouble {
    /// Exact difference `a - b`.
    fn diff(a: f64, b: f64) -> Self {
        let (hi, lo) = two_sum(a, -b);
        Self { hi, lo }
    }

    fn mul(self, other: Self) -> Self {
        let (p, e) = two_prod(self.hi, other.hi);
        let e = e + (self.hi * other.lo + self.lo * other.hi);
        let (hi, lo) = quick_two_sum(p, e);
        Self { hi, lo }
    }

    fn sub(self, other: Self) -> Self {
        let (s, e) = two_sum(self.hi, -other.hi);
        let e = e + (self.lo - other.lo);
        let (hi, lo) = quick_two_sum(s, e);
        Self { hi, lo }
    }

    fn signum(self) -> i8 {
        if self.hi != 0.0 {
            sign_of(self.hi)
        } else {
            sign_of(self.lo)
        }
    }
}

fn two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    let bb = s - a;
    let err = (a - (s - bb)) + (b - bb);
    (s, err)
}

fn quick_two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    let err = b - (s - a);
    (s, err)
}

fn two_prod(a: f64, b: f64) -> (f64, f64) {
    let p = a * b;
    let err = a.mul_add(b, -p);
    (p, err)
}
