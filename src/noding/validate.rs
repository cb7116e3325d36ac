use crate::error::TopologyError;
use crate::math::intersect_2d::segment_intersection;
use crate::math::Coord;

use super::intersector::SegmentIntersector;
use super::mc_noder::McIndex;

/// Finds the first place where two noded strings meet anywhere other than
/// at shared end points.
#[derive(Debug, Default)]
struct NodingIntersectionFinder {
    found: Option<Coord>,
}

impl SegmentIntersector for NodingIntersectionFinder {
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
        if isect.has_intersection() && isect.is_interior(a0, a1, b0, b1) {
            self.found = isect.points().first().copied();
            return;
        }

        if s0 != s1 {
            let a_start = i0 == 0;
            let a_end = i0 + 2 == a.len();
            let b_start = i1 == 0;
            let b_end = i1 + 2 == b.len();
            let vertex_pairs = [
                (a0, a_start, b0, b_start),
                (a0, a_start, b1, b_end),
                (a1, a_end, b0, b_start),
                (a1, a_end, b1, b_end),
            ];
            for (p, p_is_end, q, q_is_end) in vertex_pairs {
                if p == q && !(p_is_end && q_is_end) {
                    self.found = Some(*p);
                    return;
                }
            }
        }
    }

    fn is_done(&self) -> bool {
        self.found.is_some()
    }
}

/// Checks that a set of noded strings is fully noded.
///
/// # Errors
///
/// Returns [`TopologyError::NonNodedIntersection`] at the first interior
/// intersection or interior-vertex contact found.
pub fn check_noding(strings: &[Vec<Coord>]) -> Result<(), TopologyError> {
    let index = McIndex::new(strings, 0.0);
    let mut finder = NodingIntersectionFinder::default();
    index.compute_overlaps(&mut finder);
    match finder.found {
        Some(at) => Err(TopologyError::NonNodedIntersection { at }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::coord;

    #[test]
    fn noded_strings_pass() {
        let strings = vec![
            vec![coord(0.0, 0.0), coord(1.0, 1.0)],
            vec![coord(1.0, 1.0), coord(2.0, 0.0)],
            vec![coord(0.0, 2.0), coord(1.0, 1.0)],
        ];
        assert!(check_noding(&strings).is_ok());
    }

    #[test]
    fn crossing_is_reported() {
        let strings = vec![
            vec![coord(0.0, 0.0), coord(2.0, 2.0)],
            vec![coord(0.0, 2.0), coord(2.0, 0.0)],
        ];
        let err = check_noding(&strings);
        assert!(matches!(
            err,
            Err(TopologyError::NonNodedIntersection { at }) if at == coord(1.0, 1.0)
        ));
    }

    #[test]
    fn interior_vertex_touch_is_reported() {
        let strings = vec![
            vec![coord(0.0, 0.0), coord(1.0, 1.0), coord(2.0, 0.0)],
            vec![coord(1.0, 1.0), coord(1.0, 3.0)],
        ];
        assert!(check_noding(&strings).is_err());
    }
}
