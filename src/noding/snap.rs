//! Snapping noder: vertices and intersection points within a tolerance of
//! an already-seen point are replaced by that point.

use std::collections::HashMap;

use tracing::debug;

use crate::math::distance_2d::{coord_to_segment, distance};
use crate::math::intersect_2d::segment_intersection;
use crate::math::{remove_repeated, Coord, CoordKey};

use super::intersector::{is_adjacent, SegmentIntersector};
use super::mc_noder::McIndex;
use super::segment_string::{NodeList, SegmentString};

/// Grid-hashed set of snap targets.
///
/// A point snaps to the nearest stored point within the tolerance;
/// otherwise it is stored and returned unchanged, so earlier points win.
#[derive(Debug)]
pub struct SnapPointIndex {
    tolerance: f64,
    cells: HashMap<(i64, i64), Vec<Coord>>,
    exact: HashMap<CoordKey, Coord>,
}

impl SnapPointIndex {
    #[must_use]
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            cells: HashMap::new(),
            exact: HashMap::new(),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn cell_of(&self, p: &Coord) -> (i64, i64) {
        (
            (p.x / self.tolerance).floor() as i64,
            (p.y / self.tolerance).floor() as i64,
        )
    }

    /// Returns the snap target for `p`, registering `p` if none is near.
    pub fn snap(&mut self, p: &Coord) -> Coord {
        if self.tolerance <= 0.0 {
            return *self.exact.entry(CoordKey::from(p)).or_insert(*p);
        }
        let (cx, cy) = self.cell_of(p);
        let mut best: Option<(f64, Coord)> = None;
        for dx in -1..=1 {
            for dy in -1..=1 {
                let Some(bucket) = self.cells.get(&(cx + dx, cy + dy)) else {
                    continue;
                };
                for q in bucket {
                    let d = distance(p, q);
                    if d <= self.tolerance && best.map_or(true, |(bd, _)| d < bd) {
                        best = Some((d, *q));
                    }
                }
            }
        }
        if let Some((_, q)) = best {
            return q;
        }
        self.cells.entry((cx, cy)).or_default().push(*p);
        *p
    }
}

/// Adds snapped intersection nodes and near-vertex nodes.
struct SnappingIntersectionAdder<'a> {
    tolerance: f64,
    index: &'a mut SnapPointIndex,
    nodes: Vec<NodeList>,
}

impl SnappingIntersectionAdder<'_> {
    #[allow(clippy::too_many_arguments)]
    fn process_near_vertex(
        &mut self,
        strings: &[Vec<Coord>],
        src: usize,
        src_index: usize,
        p: &Coord,
        s: usize,
        seg_index: usize,
        p0: &Coord,
        p1: &Coord,
    ) {
        if distance(p, p0) < self.tolerance || distance(p, p1) < self.tolerance {
            return;
        }
        if coord_to_segment(p, p0, p1) < self.tolerance {
            self.nodes[s].add(&strings[s], *p, seg_index);
            self.nodes[src].add(&strings[src], *p, src_index);
        }
    }
}

impl SegmentIntersector for SnappingIntersectionAdder<'_> {
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
        let (a0, a1, b0, b1) = (a[i0], a[i0 + 1], b[i1], b[i1 + 1]);

        let adjacent = s0 == s1 && is_adjacent(a, i0, i1);
        if !adjacent {
            let isect = segment_intersection(&a0, &a1, &b0, &b1);
            if isect.count() == 1 {
                if let Some(p) = isect.points().first() {
                    let snapped = self.index.snap(p);
                    self.nodes[s0].add(a, snapped, i0);
                    self.nodes[s1].add(b, snapped, i1);
                }
            }
        }

        self.process_near_vertex(strings, s0, i0, &a0, s1, i1, &b0, &b1);
        self.process_near_vertex(strings, s0, i0, &a1, s1, i1, &b0, &b1);
        self.process_near_vertex(strings, s1, i1, &b0, s0, i0, &a0, &a1);
        self.process_near_vertex(strings, s1, i1, &b1, s0, i0, &a0, &a1);
    }
}

/// Nodes `strings` by snapping within `tolerance`. The result is not
/// guaranteed to be fully noded.
#[must_use]
pub fn node_snapping<D: Clone>(strings: &[SegmentString<D>], tolerance: f64) -> Vec<SegmentString<D>> {
    let mut index = SnapPointIndex::new(tolerance);

    let mut snapped: Vec<Vec<Coord>> = Vec::with_capacity(strings.len());
    let mut data: Vec<&D> = Vec::with_capacity(strings.len());
    for ss in strings {
        let pts: Vec<Coord> = ss.pts.iter().map(|p| index.snap(p)).collect();
        let pts = remove_repeated(&pts);
        if pts.len() >= 2 {
            snapped.push(pts);
            data.push(&ss.data);
        }
    }

    let mc = McIndex::new(&snapped, 2.0 * tolerance);
    let mut adder = SnappingIntersectionAdder {
        tolerance,
        index: &mut index,
        nodes: vec![NodeList::new(); snapped.len()],
    };
    mc.compute_overlaps(&mut adder);

    let mut out = Vec::new();
    for ((pts, nodes), d) in snapped.iter().zip(adder.nodes).zip(data) {
        for piece in nodes.split(pts) {
            out.push(SegmentString::new(piece, d.clone()));
        }
    }
    debug!(tolerance, input = strings.len(), output = out.len(), "snapping noder");
    out
}
