//! Extracts the linear part of an overlay result.
//!
//! Edges are selected by their effective locations, excluding edges that
//! already bound the result area. Selected edges are joined through nodes
//! of degree two into maximal lines.

use crate::geometry::LineString;
use crate::math::polygon_2d::Location;
use crate::math::Coord;
use crate::topology::{HalfEdgeId, OverlayGraph, OverlayLabel};

use super::select::{is_result_of_op, OverlayOp};

pub(crate) struct LineBuilder {
    op: OverlayOp,
    has_result_area: bool,
    area_index: Option<usize>,
    allow_collapse_lines: bool,
    allow_mixed_result: bool,
}

impl LineBuilder {
    pub(crate) fn new(op: OverlayOp, has_result_area: bool, area_index: Option<usize>, strict: bool) -> Self {
        Self {
            op,
            has_result_area,
            area_index,
            allow_collapse_lines: !strict,
            allow_mixed_result: !strict,
        }
    }

    pub(crate) fn build(&self, graph: &mut OverlayGraph) -> Vec<LineString> {
        self.mark_result_lines(graph);
        let mut lines = Vec::new();
        // Lines starting at a node of degree other than two, then the
        // remaining closed cycles.
        let edges = graph.half_edges().to_vec();
        for &e in &edges {
            if graph.is_in_result_line(e) && !graph.is_visited(e) && degree_of_lines(graph, e) != 2 {
                lines.push(build_line(graph, e));
            }
        }
        for &e in &edges {
            if graph.is_in_result_line(e) && !graph.is_visited(e) {
                lines.push(build_line(graph, e));
            }
        }
        lines
    }

    fn mark_result_lines(&self, graph: &mut OverlayGraph) {
        let edges = graph.half_edges().to_vec();
        for e in edges {
            if graph.is_in_result_either(e) {
                continue;
            }
            if self.is_result_line(graph.label(e)) {
                graph.mark_in_result_line(e);
            }
        }
    }

    fn is_result_line(&self, lbl: &OverlayLabel) -> bool {
        if lbl.is_boundary_singleton() {
            return false;
        }
        if !self.allow_collapse_lines && lbl.is_boundary_collapse() {
            return false;
        }
        if lbl.is_interior_collapse() {
            return false;
        }
        if self.op != OverlayOp::Intersection {
            if lbl.is_collapse_and_not_part_interior() {
                return false;
            }
            // Lines inside the result area are covered by it.
            if self.has_result_area && self.area_index.is_some_and(|i| lbl.is_line_in_area(i)) {
                return false;
            }
        }
        if self.allow_mixed_result && self.op == OverlayOp::Intersection && lbl.is_boundary_touch() {
            return true;
        }
        is_result_of_op(self.op, effective_location(lbl, 0), effective_location(lbl, 1))
    }
}

/// Lines and collapses count as interior to their own operand.
fn effective_location(lbl: &OverlayLabel, index: usize) -> Option<Location> {
    if lbl.is_collapse(index) || lbl.is_line(index) {
        Some(Location::Interior)
    } else {
        lbl.line_location(index)
    }
}

fn degree_of_lines(graph: &OverlayGraph, node: HalfEdgeId) -> usize {
    graph.star(node).filter(|&e| graph.is_in_result_line(e)).count()
}

fn next_line_edge_unvisited(graph: &OverlayGraph, node: HalfEdgeId) -> Option<HalfEdgeId> {
    graph
        .star(node)
        .skip(1)
        .chain(std::iter::once(node))
        .find(|&e| !graph.is_visited(e) && graph.is_in_result_line(e))
}

/// Follows result line edges from `start` until a node of degree other
/// than two, or back to the start. The line keeps the stored direction
/// of its first edge.
fn build_line(graph: &mut OverlayGraph, start: HalfEdgeId) -> LineString {
    let mut pts: Vec<Coord> = vec![graph.orig(start)];
    let forward = graph.is_forward(start);
    let mut e = start;
    loop {
        graph.mark_visited_both(e);
        graph.append_coords(e, &mut pts);
        let node = graph.sym(e);
        if degree_of_lines(graph, node) != 2 {
            break;
        }
        match next_line_edge_unvisited(graph, node) {
            Some(next) => e = next,
            None => break,
        }
    }
    if !forward {
        pts.reverse();
    }
    LineString(pts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::coord;

    fn line_label(index: usize, other: Location) -> OverlayLabel {
        let mut lbl = OverlayLabel::new();
        lbl.init_line(index);
        lbl.set_location_all(1 - index, other);
        lbl.set_location_line(index, Some(Location::Interior));
        lbl
    }

    #[test]
    fn chains_through_degree_two_nodes() {
        let lbl = line_label(0, Location::Exterior);
        let mut g = OverlayGraph::new(vec![
            (vec![coord(0.0, 0.0), coord(1.0, 0.0)], lbl),
            (vec![coord(1.0, 0.0), coord(2.0, 1.0)], lbl),
            (vec![coord(2.0, 1.0), coord(3.0, 1.0)], lbl),
        ]);
        let lines = LineBuilder::new(OverlayOp::Union, false, None, false).build(&mut g);
        assert_eq!(lines.len(), 1);
        assert_eq!(
            lines[0].coords(),
            &[coord(0.0, 0.0), coord(1.0, 0.0), coord(2.0, 1.0), coord(3.0, 1.0)]
        );
    }

    #[test]
    fn branching_node_splits_lines() {
        let lbl = line_label(0, Location::Exterior);
        let o = coord(0.0, 0.0);
        let mut g = OverlayGraph::new(vec![
            (vec![o, coord(1.0, 0.0)], lbl),
            (vec![o, coord(0.0, 1.0)], lbl),
            (vec![o, coord(-1.0, -1.0)], lbl),
        ]);
        let lines = LineBuilder::new(OverlayOp::Union, false, None, false).build(&mut g);
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn closed_cycle_becomes_one_ring() {
        let lbl = line_label(0, Location::Exterior);
        let mut g = OverlayGraph::new(vec![
            (vec![coord(0.0, 0.0), coord(1.0, 0.0), coord(1.0, 1.0)], lbl),
            (vec![coord(1.0, 1.0), coord(0.0, 1.0), coord(0.0, 0.0)], lbl),
        ]);
        let lines = LineBuilder::new(OverlayOp::Union, false, None, false).build(&mut g);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].is_closed());
        assert_eq!(lines[0].coords().len(), 5);
    }

    #[test]
    fn intersection_drops_exterior_line() {
        let mut g = OverlayGraph::new(vec![(
            vec![coord(0.0, 0.0), coord(1.0, 0.0)],
            line_label(0, Location::Exterior),
        )]);
        let lines = LineBuilder::new(OverlayOp::Intersection, false, None, false).build(&mut g);
        assert!(lines.is_empty());
    }
}
