//! Monotone chains: maximal runs of segments whose directions all fall in
//! one quadrant. The envelope of any sub-run is the envelope of its two
//! end points, which makes overlap search between chains a cheap binary
//! subdivision.

use crate::geometry::Envelope;
use crate::math::{quadrant, Coord};

/// A monotone run `start..=end` of vertex indices within one segment
/// string.
#[derive(Debug, Clone)]
pub struct MonotoneChain {
    /// Index of the owning segment string.
    pub string: usize,
    pub start: usize,
    pub end: usize,
    env: Envelope,
}

impl MonotoneChain {
    #[must_use]
    pub fn envelope(&self) -> &Envelope {
        &self.env
    }

    /// Envelope expanded by `tolerance`.
    #[must_use]
    pub fn envelope_with_tolerance(&self, tolerance: f64) -> Envelope {
        if tolerance > 0.0 {
            self.env.expanded_by(tolerance)
        } else {
            self.env
        }
    }

    /// Calls `visit(i, j)` for every pair of segments `pts[i..=i+1]` of this
    /// chain and `other_pts[j..=j+1]` of `other` whose envelopes, grown by
    /// `tolerance`, intersect.
    pub fn compute_overlaps(
        &self,
        pts: &[Coord],
        other: &MonotoneChain,
        other_pts: &[Coord],
        tolerance: f64,
        visit: &mut impl FnMut(usize, usize),
    ) {
        overlaps_rec(
            pts,
            self.start,
            self.end,
            other_pts,
            other.start,
            other.end,
            tolerance,
            visit,
        );
    }
}

#[allow(clippy::too_many_arguments)]
fn overlaps_rec(
    p: &[Coord],
    start0: usize,
    end0: usize,
    q: &[Coord],
    start1: usize,
    end1: usize,
    tolerance: f64,
    visit: &mut impl FnMut(usize, usize),
) {
    let env0 = Envelope::from_points(&p[start0], &p[end0]).expanded_by(tolerance);
    let env1 = Envelope::from_points(&q[start1], &q[end1]);
    if !env0.intersects(&env1) {
        return;
    }
    if end0 - start0 == 1 && end1 - start1 == 1 {
        visit(start0, start1);
        return;
    }
    let mid0 = (start0 + end0) / 2;
    let mid1 = (start1 + end1) / 2;
    if start0 < mid0 {
        if start1 < mid1 {
            overlaps_rec(p, start0, mid0, q, start1, mid1, tolerance, visit);
        }
        if mid1 < end1 {
            overlaps_rec(p, start0, mid0, q, mid1, end1, tolerance, visit);
        }
    }
    if mid0 < end0 {
        if start1 < mid1 {
            overlaps_rec(p, mid0, end0, q, start1, mid1, tolerance, visit);
        }
        if mid1 < end1 {
            overlaps_rec(p, mid0, end0, q, mid1, end1, tolerance, visit);
        }
    }
}

/// Splits a coordinate sequence into monotone chains.
#[must_use]
pub fn build_chains(pts: &[Coord], string: usize) -> Vec<MonotoneChain> {
    let mut chains = Vec::new();
    if pts.len() < 2 {
        return chains;
    }
    let mut start = 0;
    loop {
        let end = find_chain_end(pts, start);
        chains.push(MonotoneChain {
            string,
            start,
            end,
            env: Envelope::from_points(&pts[start], &pts[end]),
        });
        start = end;
        if start >= pts.len() - 1 {
            break;
        }
    }
    chains
}

/// Index of the last vertex of the chain starting at `start`. Zero-length
/// segments never end a chain.
fn find_chain_end(pts: &[Coord], start: usize) -> usize {
    let last_index = pts.len() - 1;
    let mut safe_start = start;
    while safe_start < last_index && pts[safe_start] == pts[safe_start + 1] {
        safe_start += 1;
    }
    if safe_start >= last_index {
        return last_index;
    }
    let chain_quad = quadrant(&pts[safe_start], &pts[safe_start + 1]);
    let mut last = start + 1;
    while last <= last_index {
        if pts[last - 1] != pts[last] && quadrant(&pts[last - 1], &pts[last]) != chain_quad {
            break;
        }
        last += 1;
    }
    last - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::coord;

    #[test]
    fn zigzag_splits_at_direction_changes() {
        let pts = [
            coord(0.0, 0.0),
            coord(1.0, 1.0),
            coord(2.0, 3.0),
            coord(3.0, 1.0),
            coord(4.0, 0.0),
            coord(5.0, 2.0),
        ];
        let chains = build_chains(&pts, 0);
        let spans: Vec<_> = chains.iter().map(|c| (c.start, c.end)).collect();
        assert_eq!(spans, vec![(0, 2), (2, 4), (4, 5)]);
    }

    #[test]
    fn repeated_points_stay_in_chain() {
        let pts = [coord(0.0, 0.0), coord(0.0, 0.0), coord(1.0, 1.0), coord(1.0, 1.0), coord(2.0, 2.0)];
        let chains = build_chains(&pts, 3);
        assert_eq!(chains.len(), 1);
        assert_eq!((chains[0].start, chains[0].end, chains[0].string), (0, 4, 3));
    }

    #[test]
    fn overlaps_find_crossing_segments() {
        let a = [coord(0.0, 0.0), coord(1.0, 1.0), coord(2.0, 2.0), coord(3.0, 3.0)];
        let b = [coord(0.0, 3.0), coord(1.0, 2.0), coord(2.0, 1.0), coord(3.0, 0.0)];
        let ca = &build_chains(&a, 0)[0];
        let cb = &build_chains(&b, 1)[0];
        let mut pairs = Vec::new();
        ca.compute_overlaps(&a, cb, &b, 0.0, &mut |i, j| pairs.push((i, j)));
        // The diagonals cross inside segment 1 of each chain.
        assert!(pairs.contains(&(1, 1)));
        assert!(!pairs.contains(&(0, 0)));
    }
}
