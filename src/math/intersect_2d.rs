use super::distance_2d::coord_to_segment;
use super::orientation::{orientation_index, Orientation};
use super::Coord;

/// Result of intersecting two closed line segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentIntersection {
    /// The segments are disjoint.
    None,
    /// The segments meet in a single point.
    ///
    /// `proper` is `true` when the point lies in the interior of both
    /// segments and is not a vertex of either.
    Point { point: Coord, proper: bool },
    /// The segments are collinear and overlap along `start..end`.
    Collinear { start: Coord, end: Coord },
}

impl SegmentIntersection {
    /// Returns `true` unless the segments are disjoint.
    #[must_use]
    pub fn has_intersection(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Returns `true` for a single-point crossing interior to both segments.
    #[must_use]
    pub fn is_proper(&self) -> bool {
        matches!(self, Self::Point { proper: true, .. })
    }

    /// Number of intersection points (0, 1 or 2).
    #[must_use]
    pub fn count(&self) -> usize {
        match self {
            Self::None => 0,
            Self::Point { .. } => 1,
            Self::Collinear { .. } => 2,
        }
    }

    /// Returns the intersection points.
    #[must_use]
    pub fn points(&self) -> Vec<Coord> {
        match *self {
            Self::None => Vec::new(),
            Self::Point { point, .. } => vec![point],
            Self::Collinear { start, end } => vec![start, end],
        }
    }

    /// Returns `true` if some intersection point is not an endpoint of the
    /// segment `a0 → a1` or not an endpoint of `b0 → b1`.
    #[must_use]
    pub fn is_interior(&self, a0: &Coord, a1: &Coord, b0: &Coord, b1: &Coord) -> bool {
        self.points().iter().any(|p| {
            let on_a_end = p == a0 || p == a1;
            let on_b_end = p == b0 || p == b1;
            !on_a_end || !on_b_end
        })
    }
}

/// Computes the intersection of segments `p1 → p2` and `q1 → q2`.
///
/// Endpoint and collinearity decisions are made with the robust orientation
/// predicate, so the classification is consistent under permutation of the
/// inputs. Only the coordinates of proper crossings are computed with
/// floating-point arithmetic.
#[must_use]
pub fn segment_intersection(p1: &Coord, p2: &Coord, q1: &Coord, q2: &Coord) -> SegmentIntersection {
    if !envelopes_intersect(p1, p2, q1, q2) {
        return SegmentIntersection::None;
    }

    let pq1 = orientation_index(p1, p2, q1).signum();
    let pq2 = orientation_index(p1, p2, q2).signum();
    if (pq1 > 0 && pq2 > 0) || (pq1 < 0 && pq2 < 0) {
        return SegmentIntersection::None;
    }

    let qp1 = orientation_index(q1, q2, p1).signum();
    let qp2 = orientation_index(q1, q2, p2).signum();
    if (qp1 > 0 && qp2 > 0) || (qp1 < 0 && qp2 < 0) {
        return SegmentIntersection::None;
    }

    if pq1 == 0 && pq2 == 0 && qp1 == 0 && qp2 == 0 {
        return collinear_intersection(p1, p2, q1, q2);
    }

    if pq1 == 0 || pq2 == 0 || qp1 == 0 || qp2 == 0 {
        // An endpoint lies on the other segment. Prefer shared vertices so
        // that the reported point is exactly an input vertex.
        let point = if p1 == q1 || p1 == q2 {
            *p1
        } else if p2 == q1 || p2 == q2 {
            *p2
        } else if pq1 == 0 {
            *q1
        } else if pq2 == 0 {
            *q2
        } else if qp1 == 0 {
            *p1
        } else {
            *p2
        };
        return SegmentIntersection::Point {
            point,
            proper: false,
        };
    }

    let point = proper_intersection(p1, p2, q1, q2);
    SegmentIntersection::Point {
        point,
        proper: true,
    }
}

/// Returns `true` if `q` lies in the bounding box of `p1 → p2`.
#[must_use]
pub fn in_segment_envelope(p1: &Coord, p2: &Coord, q: &Coord) -> bool {
    q.x >= p1.x.min(p2.x) && q.x <= p1.x.max(p2.x) && q.y >= p1.y.min(p2.y) && q.y <= p1.y.max(p2.y)
}

fn envelopes_intersect(p1: &Coord, p2: &Coord, q1: &Coord, q2: &Coord) -> bool {
    let min_q = q1.x.min(q2.x);
    let max_q = q1.x.max(q2.x);
    let min_p = p1.x.min(p2.x);
    let max_p = p1.x.max(p2.x);
    if min_p > max_q || max_p < min_q {
        return false;
    }
    let min_q = q1.y.min(q2.y);
    let max_q = q1.y.max(q2.y);
    let min_p = p1.y.min(p2.y);
    let max_p = p1.y.max(p2.y);
    !(min_p > max_q || max_p < min_q)
}

fn collinear_intersection(p1: &Coord, p2: &Coord, q1: &Coord, q2: &Coord) -> SegmentIntersection {
    let q1_in_p = in_segment_envelope(p1, p2, q1);
    let q2_in_p = in_segment_envelope(p1, p2, q2);
    let p1_in_q = in_segment_envelope(q1, q2, p1);
    let p2_in_q = in_segment_envelope(q1, q2, p2);

    let overlap = |start: Coord, end: Coord, touch_only: bool| {
        if start == end && touch_only {
            SegmentIntersection::Point {
                point: start,
                proper: false,
            }
        } else {
            SegmentIntersection::Collinear { start, end }
        }
    };

    if q1_in_p && q2_in_p {
        return overlap(*q1, *q2, false);
    }
    if p1_in_q && p2_in_q {
        return overlap(*p1, *p2, false);
    }
    if q1_in_p && p1_in_q {
        return overlap(*q1, *p1, !q2_in_p && !p2_in_q);
    }
    if q1_in_p && p2_in_q {
        return overlap(*q1, *p2, !q2_in_p && !p1_in_q);
    }
    if q2_in_p && p1_in_q {
        return overlap(*q2, *p1, !q1_in_p && !p2_in_q);
    }
    if q2_in_p && p2_in_q {
        return overlap(*q2, *p2, !q1_in_p && !p1_in_q);
    }
    SegmentIntersection::None
}

/// Computes the crossing point of two properly intersecting segments.
///
/// The computation is done in coordinates centred on the overlap of the
/// segment envelopes to limit cancellation. A point that falls outside both
/// envelopes (possible for nearly parallel segments) is replaced by the
/// segment endpoint nearest to the other segment.
fn proper_intersection(p1: &Coord, p2: &Coord, q1: &Coord, q2: &Coord) -> Coord {
    let candidate = line_intersection(p1, p2, q1, q2);
    match candidate {
        Some(pt)
            if in_segment_envelope(p1, p2, &pt) && in_segment_envelope(q1, q2, &pt) =>
        {
            pt
        }
        _ => nearest_endpoint(p1, p2, q1, q2),
    }
}

/// Intersection of the infinite lines through `p1 p2` and `q1 q2`, or
/// `None` if they are parallel.
#[must_use]
pub fn line_intersection(p1: &Coord, p2: &Coord, q1: &Coord, q2: &Coord) -> Option<Coord> {
    let min_x = p1.x.min(p2.x).max(q1.x.min(q2.x));
    let max_x = p1.x.max(p2.x).min(q1.x.max(q2.x));
    let min_y = p1.y.min(p2.y).max(q1.y.min(q2.y));
    let max_y = p1.y.max(p2.y).min(q1.y.max(q2.y));
    let mid_x = (min_x + max_x) / 2.0;
    let mid_y = (min_y + max_y) / 2.0;

    let (p1x, p1y) = (p1.x - mid_x, p1.y - mid_y);
    let (p2x, p2y) = (p2.x - mid_x, p2.y - mid_y);
    let (q1x, q1y) = (q1.x - mid_x, q1.y - mid_y);
    let (q2x, q2y) = (q2.x - mid_x, q2.y - mid_y);

    let px = p1y - p2y;
    let py = p2x - p1x;
    let pw = p1x * p2y - p2x * p1y;

    let qx = q1y - q2y;
    let qy = q2x - q1x;
    let qw = q1x * q2y - q2x * q1y;

    let x = py * qw - qy * pw;
    let y = qx * pw - px * qw;
    let w = px * qy - qx * py;

    let xi = x / w;
    let yi = y / w;
    if !xi.is_finite() || !yi.is_finite() {
        return None;
    }
    Some(Coord::new(xi + mid_x, yi + mid_y))
}

fn nearest_endpoint(p1: &Coord, p2: &Coord, q1: &Coord, q2: &Coord) -> Coord {
    let candidates = [
        (*p1, coord_to_segment(p1, q1, q2)),
        (*p2, coord_to_segment(p2, q1, q2)),
        (*q1, coord_to_segment(q1, p1, p2)),
        (*q2, coord_to_segment(q2, p1, p2)),
    ];
    let mut best = candidates[0];
    for c in &candidates[1..] {
        if c.1 < best.1 {
            best = *c;
        }
    }
    best.0
}

/// Returns `true` if `p` lies on the closed segment `a → b`.
#[must_use]
pub fn point_on_segment(p: &Coord, a: &Coord, b: &Coord) -> bool {
    in_segment_envelope(a, b, p) && orientation_index(a, b, p) == Orientation::Collinear
}
