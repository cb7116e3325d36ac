//! Snap-rounding noder. Intersection points and vertices are rounded to a
//! fixed grid; every segment passing through a node pixel is routed through
//! the pixel centre. The output is fully noded with all coordinates on the
//! grid.

use std::collections::HashMap;

use tracing::debug;

use crate::geometry::{Envelope, PrecisionModel};
use crate::index::{StrTree, DEFAULT_NODE_CAPACITY};
use crate::math::distance_2d::{coord_to_segment, distance};
use crate::math::intersect_2d::segment_intersection;
use crate::math::orientation::orientation_index;
use crate::math::{remove_repeated, Coord, CoordKey};

use super::intersector::SegmentIntersector;
use super::mc_noder::McIndex;
use super::segment_string::{NodeList, SegmentString};

/// Pixel half-width in scaled units.
const HALF: f64 = 0.5;

/// Fraction of a pixel within which a vertex counts as near a segment.
const NEARNESS_FACTOR: f64 = 100.0;

/// A grid cell around a rounded point. The left and bottom sides belong to
/// the pixel, the top and right sides do not.
#[derive(Debug, Clone)]
struct HotPixel {
    pt: Coord,
    hpx: f64,
    hpy: f64,
    is_node: bool,
}

impl HotPixel {
    fn new(pt: Coord, scale: f64) -> Self {
        Self {
            pt,
            hpx: (pt.x * scale + 0.5).floor(),
            hpy: (pt.y * scale + 0.5).floor(),
            is_node: false,
        }
    }

    fn intersects_point(&self, p: &Coord, scale: f64) -> bool {
        let x = p.x * scale;
        let y = p.y * scale;
        x < self.hpx + HALF && x >= self.hpx - HALF && y < self.hpy + HALF && y >= self.hpy - HALF
    }

    fn intersects_segment(&self, p0: &Coord, p1: &Coord, scale: f64) -> bool {
        let (mut p, mut q) = (
            Coord::new(p0.x * scale, p0.y * scale),
            Coord::new(p1.x * scale, p1.y * scale),
        );
        if p.x > q.x {
            std::mem::swap(&mut p, &mut q);
        }

        let max_x = self.hpx + HALF;
        let min_x = self.hpx - HALF;
        let max_y = self.hpy + HALF;
        let min_y = self.hpy - HALF;
        if p.x.min(q.x) >= max_x
            || p.x.max(q.x) < min_x
            || p.y.min(q.y) >= max_y
            || p.y.max(q.y) < min_y
        {
            return false;
        }
        // Axis-parallel segments reaching this far cross the interior or
        // the closed sides.
        if p.x == q.x || p.y == q.y {
            return true;
        }

        let orient = |cx: f64, cy: f64| orientation_index(&p, &q, &Coord::new(cx, cy)).signum();
        let upward = p.y < q.y;

        let ul = orient(min_x, max_y);
        if ul == 0 {
            return !upward;
        }
        let ur = orient(max_x, max_y);
        if ur == 0 {
            return upward;
        }
        if ul != ur {
            return true;
        }
        let ll = orient(min_x, min_y);
        if ll == 0 || ll != ul {
            return true;
        }
        let lr = orient(max_x, min_y);
        if lr == 0 {
            return !upward;
        }
        ll != lr || lr != ur
    }
}

/// Collects interior intersection points and vertices lying very near
/// other segments, computed on the unrounded input.
struct SnapRoundingIntersectionFinder {
    nearness: f64,
    points: Vec<Coord>,
}

impl SnapRoundingIntersectionFinder {
    fn process_near_vertex(&mut self, p: &Coord, p0: &Coord, p1: &Coord) {
        if distance(p, p0) < self.nearness || distance(p, p1) < self.nearness {
            return;
        }
        if coord_to_segment(p, p0, p1) < self.nearness {
            self.points.push(*p);
        }
    }
}

impl SegmentIntersector for SnapRoundingIntersectionFinder {
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
        let (a0, a1) = (strings[s0][i0], strings[s0][i0 + 1]);
        let (b0, b1) = (strings[s1][i1], strings[s1][i1 + 1]);
        let isect = segment_intersection(&a0, &a1, &b0, &b1);
        if isect.has_intersection() && isect.is_interior(&a0, &a1, &b0, &b1) {
            self.points.extend(isect.points());
            return;
        }
        self.process_near_vertex(&a0, &b0, &b1);
        self.process_near_vertex(&a1, &b0, &b1);
        self.process_near_vertex(&b0, &a0, &a1);
        self.process_near_vertex(&b1, &a0, &a1);
    }
}

/// Hot pixels keyed by their rounded point, with a tree over the pixel
/// squares. The set of pixels is fixed once built; only node flags change
/// while snapping.
struct HotPixelIndex {
    scale: f64,
    pixels: Vec<HotPixel>,
    by_point: HashMap<CoordKey, usize>,
    tree: StrTree<usize>,
}

impl HotPixelIndex {
    fn build(pm: &PrecisionModel, scale: f64, nodes: &[Coord], vertices: &[Coord]) -> Self {
        let mut pixels: Vec<HotPixel> = Vec::new();
        let mut by_point: HashMap<CoordKey, usize> = HashMap::new();
        let mut add = |p: &Coord, is_node: bool| {
            let rounded = pm.make_precise_coord(p);
            let idx = *by_point.entry(CoordKey::from(&rounded)).or_insert_with(|| {
                pixels.push(HotPixel::new(rounded, scale));
                pixels.len() - 1
            });
            if is_node {
                pixels[idx].is_node = true;
            }
        };
        for p in nodes {
            add(p, true);
        }
        for p in vertices {
            add(p, false);
        }

        let half = HALF / scale;
        let entries = pixels
            .iter()
            .enumerate()
            .map(|(i, px)| (Envelope::from_points(&px.pt, &px.pt).expanded_by(half), i))
            .collect();
        let tree = StrTree::new(DEFAULT_NODE_CAPACITY, entries);
        Self {
            scale,
            pixels,
            by_point,
            tree,
        }
    }

    /// Routes segment `seg_index` of a rounded string through every node
    /// pixel (and every pixel not containing a segment end) it crosses.
    fn snap_segment(&mut self, p0: &Coord, p1: &Coord, rounded: &[Coord], nodes: &mut NodeList, seg_index: usize) {
        let env = Envelope::from_points(p0, p1);
        for idx in self.tree.query(&env) {
            let px = &mut self.pixels[idx];
            if !px.is_node
                && (px.intersects_point(p0, self.scale) || px.intersects_point(p1, self.scale))
            {
                continue;
            }
            if px.intersects_segment(p0, p1, self.scale) {
                nodes.add(rounded, px.pt, seg_index);
                px.is_node = true;
            }
        }
    }

    fn is_node_at(&self, p: &Coord) -> bool {
        self.by_point
            .get(&CoordKey::from(p))
            .is_some_and(|&i| self.pixels[i].is_node)
    }
}

/// Nodes `strings` by snap-rounding to the grid of the fixed model `pm`.
///
/// Strings that collapse to a single point are dropped.
#[must_use]
pub fn node_snap_rounding<D: Clone>(strings: &[SegmentString<D>], pm: &PrecisionModel) -> Vec<SegmentString<D>> {
    let Some(scale) = pm.scale() else {
        return strings.to_vec();
    };
    let input: Vec<Vec<Coord>> = strings.iter().map(|s| s.pts.clone()).collect();

    let nearness = 1.0 / scale / NEARNESS_FACTOR;
    let mut finder = SnapRoundingIntersectionFinder {
        nearness,
        points: Vec::new(),
    };
    McIndex::new(&input, nearness).compute_overlaps(&mut finder);

    let vertices: Vec<Coord> = input.iter().flatten().copied().collect();
    let mut pixels = HotPixelIndex::build(pm, scale, &finder.points, &vertices);

    let mut snapped: Vec<(Vec<Coord>, NodeList, &D)> = Vec::new();
    for (pts, ss) in input.iter().zip(strings) {
        let rounded = remove_repeated(&pts.iter().map(|p| pm.make_precise_coord(p)).collect::<Vec<_>>());
        if rounded.len() < 2 {
            continue;
        }
        let mut nodes = NodeList::new();
        let mut snap_index = 0;
        for w in pts.windows(2) {
            let curr = rounded[snap_index];
            if pm.make_precise_coord(&w[1]) == curr {
                continue;
            }
            pixels.snap_segment(&w[0], &w[1], &rounded, &mut nodes, snap_index);
            snap_index += 1;
        }
        snapped.push((rounded, nodes, &ss.data));
    }

    // Interior vertices that landed on a node pixel become nodes too.
    for (rounded, nodes, _) in &mut snapped {
        for i in 1..rounded.len() - 1 {
            if pixels.is_node_at(&rounded[i]) {
                nodes.add(rounded, rounded[i], i);
            }
        }
    }

    let mut out = Vec::new();
    for (rounded, nodes, data) in snapped {
        for piece in nodes.split(&rounded) {
            out.push(SegmentString::new(piece, data.clone()));
        }
    }
    debug!(
        scale,
        intersections = finder.points.len(),
        pixels = pixels.pixels.len(),
        output = out.len(),
        "snap-rounding noder"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::coord;

    #[test]
    fn pixel_sides_are_half_open() {
        let px = HotPixel::new(coord(1.0, 1.0), 1.0);
        assert!(px.intersects_point(&coord(0.5, 0.5), 1.0));
        assert!(px.intersects_point(&coord(1.49, 1.49), 1.0));
        assert!(!px.intersects_point(&coord(1.5, 1.0), 1.0));
        assert!(!px.intersects_point(&coord(1.0, 1.5), 1.0));
    }

    #[test]
    fn pixel_segment_crossings() {
        let px = HotPixel::new(coord(0.0, 0.0), 1.0);
        assert!(px.intersects_segment(&coord(-2.0, -1.0), &coord(2.0, 1.0), 1.0));
        assert!(px.intersects_segment(&coord(-2.0, 0.2), &coord(2.0, 0.2), 1.0));
        assert!(!px.intersects_segment(&coord(-2.0, 2.0), &coord(2.0, 1.0), 1.0));
        // Passing exactly through the excluded upper-right corner, upwards
        // from outside.
        assert!(!px.intersects_segment(&coord(0.5, 0.5), &coord(1.5, 1.5), 1.0));
    }

    #[test]
    fn crossing_lines_share_rounded_node() {
        let strings = vec![
            SegmentString::new(vec![coord(0.0, 0.0), coord(10.0, 3.0)], 0),
            SegmentString::new(vec![coord(0.0, 3.0), coord(10.0, 0.0)], 1),
        ];
        let noded = node_snap_rounding(&strings, &PrecisionModel::fixed(1.0));
        assert_eq!(noded.len(), 4);
        for s in &noded {
            for p in &s.pts {
                assert_eq!(p.x, p.x.round());
                assert_eq!(p.y, p.y.round());
            }
        }
        let node = coord(5.0, 2.0);
        assert_eq!(noded.iter().filter(|s| s.pts.contains(&node)).count(), 4);
    }

    #[test]
    fn collapsed_string_is_dropped() {
        let strings = vec![SegmentString::new(vec![coord(0.1, 0.1), coord(0.2, 0.2)], ())];
        assert!(node_snap_rounding(&strings, &PrecisionModel::fixed(1.0)).is_empty());
    }
}
