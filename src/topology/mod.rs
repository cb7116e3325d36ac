//! Half-edge planar graph built from noded, merged edges.
//!
//! The graph owns every half-edge in a [`SlotMap`] arena and hands out
//! typed [`HalfEdgeId`]s; `sym` and `onext` links are ids rather than
//! references, so the whole cyclic structure is released in one drop.

pub mod edge;
pub mod label;

use std::cmp::Ordering;
use std::collections::HashMap;

use slotmap::SlotMap;
use tracing::debug;

use crate::math::orientation::orientation_index;
use crate::math::{quadrant, Coord, CoordKey};

pub use edge::{merge_edges, Edge, EdgeSource};
pub use label::{EdgeRole, OverlayLabel, Side};

slotmap::new_key_type! {
    /// Unique identifier for a half-edge in an overlay graph.
    pub struct HalfEdgeId;
}

/// Per half-edge state. Link fields are filled in while building; the
/// result flags are written by the labeller and the result builders.
#[derive(Debug, Clone)]
struct HalfEdgeData {
    orig: Coord,
    dir_pt: Coord,
    edge: usize,
    forward: bool,
    sym: HalfEdgeId,
    onext: HalfEdgeId,
    in_result_area: bool,
    in_result_line: bool,
    visited: bool,
    next_result: Option<HalfEdgeId>,
    next_result_max: Option<HalfEdgeId>,
    edge_ring: Option<usize>,
    max_edge_ring: Option<usize>,
}

impl HalfEdgeData {
    fn new(orig: Coord, dir_pt: Coord, edge: usize, forward: bool) -> Self {
        Self {
            orig,
            dir_pt,
            edge,
            forward,
            sym: HalfEdgeId::default(),
            onext: HalfEdgeId::default(),
            in_result_area: false,
            in_result_line: false,
            visited: false,
            next_result: None,
            next_result_max: None,
            edge_ring: None,
            max_edge_ring: None,
        }
    }
}

/// Geometry and label shared by the two halves of an edge.
#[derive(Debug, Clone)]
struct EdgePair {
    pts: Vec<Coord>,
    label: OverlayLabel,
}

/// Planar graph of labelled half-edge pairs.
#[derive(Debug, Default)]
pub struct OverlayGraph {
    half_edges: SlotMap<HalfEdgeId, HalfEdgeData>,
    pairs: Vec<EdgePair>,
    /// All half-edges; each forward half directly followed by its sym.
    order: Vec<HalfEdgeId>,
    /// One outgoing half-edge per node, in first-seen order.
    nodes: Vec<HalfEdgeId>,
}

impl OverlayGraph {
    /// Builds the graph from edges with at least two distinct points.
    /// Outgoing half-edges at each node are linked counter-clockwise.
    #[must_use]
    pub fn new(edges: Vec<(Vec<Coord>, OverlayLabel)>) -> Self {
        let mut graph = Self::default();
        let mut stars: Vec<Vec<HalfEdgeId>> = Vec::new();
        let mut node_index: HashMap<CoordKey, usize> = HashMap::new();

        for (pts, label) in edges {
            let n = pts.len();
            let idx = graph.pairs.len();
            let fwd = graph
                .half_edges
                .insert(HalfEdgeData::new(pts[0], pts[1], idx, true));
            let bwd = graph
                .half_edges
                .insert(HalfEdgeData::new(pts[n - 1], pts[n - 2], idx, false));
            graph.half_edges[fwd].sym = bwd;
            graph.half_edges[bwd].sym = fwd;
            graph.pairs.push(EdgePair { pts, label });
            graph.order.push(fwd);
            graph.order.push(bwd);

            for he in [fwd, bwd] {
                let key = CoordKey::from(&graph.half_edges[he].orig);
                let slot = *node_index.entry(key).or_insert_with(|| {
                    stars.push(Vec::new());
                    graph.nodes.push(he);
                    stars.len() - 1
                });
                stars[slot].push(he);
            }
        }

        for mut star in stars {
            star.sort_by(|&a, &b| graph.compare_angular(a, b));
            for (i, &he) in star.iter().enumerate() {
                graph.half_edges[he].onext = star[(i + 1) % star.len()];
            }
        }
        debug!(
            edges = graph.pairs.len(),
            nodes = graph.nodes.len(),
            "overlay graph built"
        );
        graph
    }

    /// Angular order of two half-edges leaving the same node, starting
    /// from the positive x axis and increasing counter-clockwise.
    fn compare_angular(&self, a: HalfEdgeId, b: HalfEdgeId) -> Ordering {
        let ea = &self.half_edges[a];
        let eb = &self.half_edges[b];
        if ea.dir_pt == eb.dir_pt {
            return Ordering::Equal;
        }
        let qa = quadrant(&ea.orig, &ea.dir_pt);
        let qb = quadrant(&eb.orig, &eb.dir_pt);
        qa.cmp(&qb)
            .then_with(|| orientation_index(&eb.orig, &eb.dir_pt, &ea.dir_pt).signum().cmp(&0))
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.pairs.len()
    }

    /// Every half-edge, forward halves directly followed by their syms.
    #[must_use]
    pub fn half_edges(&self) -> &[HalfEdgeId] {
        &self.order
    }

    /// One representative outgoing half-edge per node.
    #[must_use]
    pub fn node_edges(&self) -> &[HalfEdgeId] {
        &self.nodes
    }

    #[must_use]
    pub fn orig(&self, e: HalfEdgeId) -> Coord {
        self.half_edges[e].orig
    }

    #[must_use]
    pub fn dest(&self, e: HalfEdgeId) -> Coord {
        self.orig(self.sym(e))
    }

    #[must_use]
    pub fn sym(&self, e: HalfEdgeId) -> HalfEdgeId {
        self.half_edges[e].sym
    }

    /// Next outgoing half-edge counter-clockwise around the origin.
    #[must_use]
    pub fn onext(&self, e: HalfEdgeId) -> HalfEdgeId {
        self.half_edges[e].onext
    }

    #[must_use]
    pub fn is_forward(&self, e: HalfEdgeId) -> bool {
        self.half_edges[e].forward
    }

    /// Number of half-edges leaving the origin of `e`.
    #[must_use]
    pub fn degree(&self, e: HalfEdgeId) -> usize {
        self.star(e).count()
    }

    /// Outgoing half-edges at the origin of `e`, starting with `e`.
    pub fn star(&self, e: HalfEdgeId) -> impl Iterator<Item = HalfEdgeId> + '_ {
        let mut curr = Some(e);
        std::iter::from_fn(move || {
            let out = curr?;
            let next = self.onext(out);
            curr = (next != e).then_some(next);
            Some(out)
        })
    }

    #[must_use]
    pub fn label(&self, e: HalfEdgeId) -> &OverlayLabel {
        &self.pairs[self.half_edges[e].edge].label
    }

    pub fn label_mut(&mut self, e: HalfEdgeId) -> &mut OverlayLabel {
        let idx = self.half_edges[e].edge;
        &mut self.pairs[idx].label
    }

    /// Coordinates of the underlying edge in its stored direction.
    #[must_use]
    pub fn edge_coords(&self, e: HalfEdgeId) -> &[Coord] {
        &self.pairs[self.half_edges[e].edge].pts
    }

    /// Appends the coordinates of `e` in its own direction, skipping the
    /// origin when it repeats the last point of `out`.
    pub fn append_coords(&self, e: HalfEdgeId, out: &mut Vec<Coord>) {
        let pts = self.edge_coords(e);
        let mut push = |p: &Coord| {
            if out.last() != Some(p) {
                out.push(*p);
            }
        };
        if self.is_forward(e) {
            pts.iter().for_each(&mut push);
        } else {
            pts.iter().rev().for_each(&mut push);
        }
    }

    // --- result flags ---

    #[must_use]
    pub fn is_in_result_area(&self, e: HalfEdgeId) -> bool {
        self.half_edges[e].in_result_area
    }

    pub fn mark_in_result_area(&mut self, e: HalfEdgeId) {
        self.half_edges[e].in_result_area = true;
    }

    /// Clears the result-area flag of both halves when both are set, which
    /// happens for edges with result area on both sides.
    pub fn unmark_result_area_both(&mut self, e: HalfEdgeId) {
        let s = self.sym(e);
        if self.half_edges[e].in_result_area && self.half_edges[s].in_result_area {
            self.half_edges[e].in_result_area = false;
            self.half_edges[s].in_result_area = false;
        }
    }

    #[must_use]
    pub fn is_in_result_line(&self, e: HalfEdgeId) -> bool {
        self.half_edges[e].in_result_line
    }

    pub fn mark_in_result_line(&mut self, e: HalfEdgeId) {
        let s = self.sym(e);
        self.half_edges[e].in_result_line = true;
        self.half_edges[s].in_result_line = true;
    }

    #[must_use]
    pub fn is_in_result(&self, e: HalfEdgeId) -> bool {
        self.is_in_result_area(e) || self.is_in_result_line(e)
    }

    #[must_use]
    pub fn is_in_result_either(&self, e: HalfEdgeId) -> bool {
        self.is_in_result(e) || self.is_in_result(self.sym(e))
    }

    #[must_use]
    pub fn is_visited(&self, e: HalfEdgeId) -> bool {
        self.half_edges[e].visited
    }

    pub fn mark_visited_both(&mut self, e: HalfEdgeId) {
        let s = self.sym(e);
        self.half_edges[e].visited = true;
        self.half_edges[s].visited = true;
    }

    #[must_use]
    pub fn next_result(&self, e: HalfEdgeId) -> Option<HalfEdgeId> {
        self.half_edges[e].next_result
    }

    pub fn set_next_result(&mut self, e: HalfEdgeId, next: HalfEdgeId) {
        self.half_edges[e].next_result = Some(next);
    }

    #[must_use]
    pub fn next_result_max(&self, e: HalfEdgeId) -> Option<HalfEdgeId> {
        self.half_edges[e].next_result_max
    }

    pub fn set_next_result_max(&mut self, e: HalfEdgeId, next: HalfEdgeId) {
        self.half_edges[e].next_result_max = Some(next);
    }

    #[must_use]
    pub fn edge_ring(&self, e: HalfEdgeId) -> Option<usize> {
        self.half_edges[e].edge_ring
    }

    pub fn set_edge_ring(&mut self, e: HalfEdgeId, ring: usize) {
        self.half_edges[e].edge_ring = Some(ring);
    }

    #[must_use]
    pub fn max_edge_ring(&self, e: HalfEdgeId) -> Option<usize> {
        self.half_edges[e].max_edge_ring
    }

    pub fn set_max_edge_ring(&mut self, e: HalfEdgeId, ring: usize) {
        self.half_edges[e].max_edge_ring = Some(ring);
    }

    /// Half-edges currently marked as result area boundary.
    #[must_use]
    pub fn result_area_edges(&self) -> Vec<HalfEdgeId> {
        self.order
            .iter()
            .copied()
            .filter(|&e| self.is_in_result_area(e))
            .collect()
    }
}
