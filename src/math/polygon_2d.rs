use super::orientation::{orientation_index, Orientation};
use super::{compare_xy, Coord};

/// Location of a point relative to a geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    Interior,
    Boundary,
    Exterior,
}

/// Computes the signed area of a ring (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise. The ring may be
/// given closed or open.
#[must_use]
pub fn signed_area_2d(points: &[Coord]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    // Shift to the first vertex to limit cancellation for large ordinates.
    let x0 = points[0].x;
    let y0 = points[0].y;
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        let (xi, yi) = (points[i].x - x0, points[i].y - y0);
        let (xj, yj) = (points[j].x - x0, points[j].y - y0);
        sum += xi * yj - xj * yi;
    }
    sum * 0.5
}

/// Returns `true` if a closed ring is oriented counter-clockwise.
///
/// Uses the orientation at the highest vertex, which is robust for rings
/// with collinear runs and flat tops. Rings with fewer than three distinct
/// points are reported as not counter-clockwise.
#[must_use]
pub fn is_ccw(ring: &[Coord]) -> bool {
    // Number of distinct points, ignoring the closing point.
    let n = ring.len().saturating_sub(1);
    if n < 3 {
        return false;
    }

    // Find the (first) highest point.
    let mut hi_index = 0;
    for i in 1..=n {
        if ring[i].y > ring[hi_index].y {
            hi_index = i;
        }
    }
    let hi = ring[hi_index];

    // Walk backwards to the previous distinct point.
    let mut i_prev = hi_index;
    loop {
        i_prev = if i_prev == 0 { n - 1 } else { i_prev - 1 };
        if ring[i_prev] != hi || i_prev == hi_index {
            break;
        }
    }
    // Walk forwards to the next distinct point.
    let mut i_next = hi_index;
    loop {
        i_next = (i_next + 1) % n;
        if ring[i_next] != hi || i_next == hi_index {
            break;
        }
    }
    let prev = ring[i_prev];
    let next = ring[i_next];

    if prev == hi || next == hi || prev == next {
        return false;
    }

    match orientation_index(&prev, &hi, &next) {
        Orientation::CounterClockwise => true,
        Orientation::Clockwise => false,
        // Flat top: the ring is CCW if the walk arrives from the right.
        Orientation::Collinear => prev.x > next.x,
    }
}

/// Counts crossings of a rightward horizontal ray from a point, following
/// the half-open rule for vertices so that each crossing is counted once.
#[derive(Debug, Clone, Copy)]
pub struct RayCrossingCounter {
    p: Coord,
    crossings: usize,
    on_segment: bool,
}

impl RayCrossingCounter {
    /// Creates a counter for the point `p`.
    #[must_use]
    pub fn new(p: Coord) -> Self {
        Self {
            p,
            crossings: 0,
            on_segment: false,
        }
    }

    /// Accounts for the segment `p1 → p2`.
    pub fn count_segment(&mut self, p1: &Coord, p2: &Coord) {
        let p = self.p;
        if p1.x < p.x && p2.x < p.x {
            return;
        }
        if p == *p2 {
            self.on_segment = true;
            return;
        }
        // Horizontal segment at the height of the point.
        if p1.y == p.y && p2.y == p.y {
            let min_x = p1.x.min(p2.x);
            let max_x = p1.x.max(p2.x);
            if p.x >= min_x && p.x <= max_x {
                self.on_segment = true;
            }
            return;
        }
        if (p1.y > p.y && p2.y <= p.y) || (p2.y > p.y && p1.y <= p.y) {
            let mut orient = orientation_index(p1, p2, &p).signum();
            if orient == 0 {
                self.on_segment = true;
                return;
            }
            if p2.y < p1.y {
                orient = -orient;
            }
            if orient > 0 {
                self.crossings += 1;
            }
        }
    }

    /// Returns `true` once the point has been found on a counted segment.
    #[must_use]
    pub fn is_on_segment(&self) -> bool {
        self.on_segment
    }

    /// Location implied by the segments counted so far.
    #[must_use]
    pub fn location(&self) -> Location {
        if self.on_segment {
            Location::Boundary
        } else if self.crossings % 2 == 1 {
            Location::Interior
        } else {
            Location::Exterior
        }
    }
}

/// Locates a point relative to a closed ring.
#[must_use]
pub fn locate_in_ring(p: &Coord, ring: &[Coord]) -> Location {
    let mut counter = RayCrossingCounter::new(*p);
    for w in ring.windows(2) {
        counter.count_segment(&w[0], &w[1]);
        if counter.is_on_segment() {
            break;
        }
    }
    counter.location()
}

/// Rotates a closed ring so it starts at its lexicographically smallest
/// vertex. The returned ring is closed.
#[must_use]
pub fn rotate_to_canonical_start(ring: &[Coord]) -> Vec<Coord> {
    if ring.len() < 2 {
        return ring.to_vec();
    }
    let open = &ring[..ring.len() - 1];
    let mut best = 0;
    for (i, pt) in open.iter().enumerate().skip(1) {
        if compare_xy(pt, &open[best]).is_lt() {
            best = i;
        }
    }
    let mut rotated = Vec::with_capacity(ring.len());
    rotated.extend_from_slice(&open[best..]);
    rotated.extend_from_slice(&open[..best]);
    rotated.push(open[best]);
    rotated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{coord, TOLERANCE};

    fn square_ccw() -> Vec<Coord> {
        vec![
            coord(0.0, 0.0),
            coord(1.0, 0.0),
            coord(1.0, 1.0),
            coord(0.0, 1.0),
            coord(0.0, 0.0),
        ]
    }

    #[test]
    fn signed_area_ccw_square() {
        let area = signed_area_2d(&square_ccw());
        assert!((area - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_cw_square() {
        let mut pts = square_ccw();
        pts.reverse();
        let area = signed_area_2d(&pts);
        assert!((area + 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_degenerate() {
        assert!((signed_area_2d(&[coord(0.0, 0.0)])).abs() < TOLERANCE);
        assert!((signed_area_2d(&[])).abs() < TOLERANCE);
    }

    #[test]
    fn ccw_detection() {
        let ring = square_ccw();
        assert!(is_ccw(&ring));
        let mut cw = ring.clone();
        cw.reverse();
        assert!(!is_ccw(&cw));
    }

    #[test]
    fn ccw_with_flat_top() {
        let ring = vec![
            coord(0.0, 0.0),
            coord(4.0, 0.0),
            coord(4.0, 2.0),
            coord(2.0, 2.0),
            coord(0.0, 2.0),
            coord(0.0, 0.0),
        ];
        assert!(is_ccw(&ring));
        let mut cw = ring.clone();
        cw.reverse();
        assert!(!is_ccw(&cw));
    }

    #[test]
    fn locate_in_ring_classifies() {
        let ring = square_ccw();
        assert_eq!(locate_in_ring(&coord(0.5, 0.5), &ring), Location::Interior);
        assert_eq!(locate_in_ring(&coord(1.0, 0.5), &ring), Location::Boundary);
        assert_eq!(locate_in_ring(&coord(0.0, 0.0), &ring), Location::Boundary);
        assert_eq!(locate_in_ring(&coord(2.0, 0.5), &ring), Location::Exterior);
        assert_eq!(locate_in_ring(&coord(-1.0, 0.0), &ring), Location::Exterior);
    }

    #[test]
    fn canonical_start_rotation() {
        let ring = vec![
            coord(1.0, 1.0),
            coord(0.0, 1.0),
            coord(0.0, 0.0),
            coord(1.0, 0.0),
            coord(1.0, 1.0),
        ];
        let rotated = rotate_to_canonical_start(&ring);
        assert_eq!(rotated[0], coord(0.0, 0.0));
        assert_eq!(rotated[rotated.len() - 1], coord(0.0, 0.0));
        assert_eq!(rotated.len(), ring.len());
    }
}
