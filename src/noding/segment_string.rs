use std::cmp::Ordering;

use crate::math::{remove_repeated, Coord};

/// A sequence of segments carrying caller data through noding.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentString<D> {
    pub pts: Vec<Coord>,
    pub data: D,
}

impl<D> SegmentString<D> {
    #[must_use]
    pub fn new(pts: Vec<Coord>, data: D) -> Self {
        Self { pts, data }
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.pts.len() > 1 && self.pts.first() == self.pts.last()
    }
}

/// A node recorded on a segment string: a coordinate on segment
/// `segment_index`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentNode {
    pub coord: Coord,
    pub segment_index: usize,
    /// `false` when the node coincides with the segment's start vertex.
    pub interior: bool,
}

/// The nodes found on one segment string.
#[derive(Debug, Clone, Default)]
pub struct NodeList {
    nodes: Vec<SegmentNode>,
}

impl NodeList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SegmentNode> {
        self.nodes.iter()
    }

    /// Records `coord` as a node on segment `segment_index` of `pts`.
    ///
    /// A node equal to the segment's end vertex is attributed to the next
    /// segment, so every node has one canonical segment index.
    pub fn add(&mut self, pts: &[Coord], coord: Coord, segment_index: usize) {
        let mut index = segment_index;
        if index + 1 < pts.len() && coord == pts[index + 1] {
            index += 1;
        }
        let interior = coord != pts[index];
        if self
            .nodes
            .iter()
            .any(|n| n.segment_index == index && n.coord == coord)
        {
            return;
        }
        self.nodes.push(SegmentNode {
            coord,
            segment_index: index,
            interior,
        });
    }

    /// Splits `pts` at the recorded nodes (plus its end points and any
    /// `A-B-A` collapse vertices).
    ///
    /// Repeated points are removed from the pieces, and pieces with fewer
    /// than two distinct points are dropped.
    #[must_use]
    pub fn split(mut self, pts: &[Coord]) -> Vec<Vec<Coord>> {
        if pts.len() < 2 {
            return Vec::new();
        }
        let last = pts.len() - 1;
        self.add(pts, pts[0], 0);
        self.add(pts, pts[last], last - 1);
        for i in 0..pts.len().saturating_sub(2) {
            if pts[i] == pts[i + 2] {
                self.add(pts, pts[i + 1], i + 1);
            }
        }

        self.nodes.sort_by(|a, b| compare_nodes(pts, a, b));
        self.nodes
            .dedup_by(|b, a| a.segment_index == b.segment_index && a.coord == b.coord);

        let mut pieces = Vec::new();
        for w in self.nodes.windows(2) {
            let piece = remove_repeated(&split_points(pts, &w[0], &w[1]));
            if piece.len() >= 2 {
                pieces.push(piece);
            }
        }
        pieces
    }
}

fn compare_nodes(pts: &[Coord], a: &SegmentNode, b: &SegmentNode) -> Ordering {
    a.segment_index.cmp(&b.segment_index).then_with(|| {
        let origin = pts[a.segment_index];
        let da = (a.coord - origin).norm_squared();
        let db = (b.coord - origin).norm_squared();
        da.total_cmp(&db)
    })
}

fn split_points(pts: &[Coord], n0: &SegmentNode, n1: &SegmentNode) -> Vec<Coord> {
    let mut out = vec![n0.coord];
    for p in &pts[n0.segment_index + 1..=n1.segment_index.min(pts.len() - 1)] {
        out.push(*p);
    }
    let last_seg_start = pts[n1.segment_index];
    if n1.interior || n1.coord != last_seg_start {
        out.push(n1.coord);
    }
    out
}
