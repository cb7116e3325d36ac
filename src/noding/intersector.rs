use crate::math::intersect_2d::segment_intersection;
use crate::math::Coord;

use super::segment_string::NodeList;

/// Receives candidate segment pairs from a noder's overlap search.
///
/// Segment `i0` of string `s0` spans `strings[s0][i0..=i0 + 1]`.
pub trait SegmentIntersector {
    fn process_intersections(
        &mut self,
        strings: &[Vec<Coord>],
        s0: usize,
        i0: usize,
        s1: usize,
        i1: usize,
    );

    /// Lets an intersector stop the search early.
    fn is_done(&self) -> bool {
        false
    }
}

/// Returns `true` if two segments of the same string share a vertex by
/// construction (consecutive segments, or the first and last segment of
/// a closed string).
#[must_use]
pub fn is_adjacent(pts: &[Coord], i0: usize, i1: usize) -> bool {
    if i0.abs_diff(i1) == 1 {
        return true;
    }
    let closed = pts.len() > 1 && pts.first() == pts.last();
    if closed {
        let max_seg = pts.len() - 2;
        if (i0 == 0 && i1 == max_seg) || (i1 == 0 && i0 == max_seg) {
            return true;
        }
    }
    false
}

/// Records every non-trivial intersection as a node on both segment
/// strings.
#[derive(Debug)]
pub struct IntersectionAdder {
    pub nodes: Vec<NodeList>,
    pub interior_intersections: usize,
}

impl IntersectionAdder {
    #[must_use]
    pub fn new(string_count: usize) -> Self {
        Self {
            nodes: vec![NodeList::new(); string_count],
            interior_intersections: 0,
        }
    }
}

impl SegmentIntersector for IntersectionAdder {
    fn process_intersections(
        &mut self,
        strings: &[Vec<Coord>],
        s0: usize,
        i0: usize,
        s1: usize,
        i1: usize,
    ) {
        if s0 == s1 && i0 == i1 {
            return;
        }
        let (a, b) = (&strings[s0], &strings[s1]);
        let (a0, a1, b0, b1) = (&a[i0], &a[i0 + 1], &b[i1], &b[i1 + 1]);
        let isect = segment_intersection(a0, a1, b0, b1);
        if !isect.has_intersection() {
            return;
        }
        // Adjacent segments of one string always meet at their shared
        // vertex.
        if s0 == s1 && isect.count() == 1 && is_adjacent(a, i0, i1) {
            return;
        }
        if isect.is_interior(a0, a1, b0, b1) {
            self.interior_intersections += 1;
        }
        for p in isect.points() {
            self.nodes[s0].add(a, p, i0);
            self.nodes[s1].add(b, p, i1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::coord;

    #[test]
    fn adjacency_wraps_for_closed_strings() {
        let ring = [coord(0.0, 0.0), coord(1.0, 0.0), coord(1.0, 1.0), coord(0.0, 0.0)];
        assert!(is_adjacent(&ring, 0, 1));
        assert!(is_adjacent(&ring, 0, 2));
        let open = [coord(0.0, 0.0), coord(1.0, 0.0), coord(1.0, 1.0), coord(0.0, 1.0)];
        assert!(!is_adjacent(&open, 0, 2));
    }

    #[test]
    fn crossing_adds_nodes_to_both() {
        let strings = vec![
            vec![coord(0.0, 0.0), coord(2.0, 2.0)],
            vec![coord(0.0, 2.0), coord(2.0, 0.0)],
        ];
        let mut adder = IntersectionAdder::new(2);
        adder.process_intersections(&strings, 0, 0, 1, 0);
        assert_eq!(adder.interior_intersections, 1);
        assert_eq!(adder.nodes[0].len(), 1);
        assert_eq!(adder.nodes[1].len(), 1);
    }
}
