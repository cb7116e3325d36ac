use crate::math::Coord;
use crate::topology::{HalfEdgeId, OverlayGraph, OverlayLabel};

/// Nodes where the operands meet without sharing any result edge. Only
/// meaningful for intersection.
pub(crate) fn build_intersection_points(graph: &OverlayGraph, strict: bool) -> Vec<Coord> {
    graph
        .node_edges()
        .iter()
        .copied()
        .filter(|&node| is_result_point(graph, node, !strict))
        .map(|node| graph.orig(node))
        .collect()
}

fn is_result_point(graph: &OverlayGraph, node: HalfEdgeId, allow_collapse_lines: bool) -> bool {
    let mut edge_of = [false; 2];
    for e in graph.star(node) {
        if graph.is_in_result(e) {
            return false;
        }
        let lbl = graph.label(e);
        for (i, seen) in edge_of.iter_mut().enumerate() {
            *seen |= is_edge_of(lbl, i, allow_collapse_lines);
        }
    }
    edge_of[0] && edge_of[1]
}

fn is_edge_of(lbl: &OverlayLabel, index: usize, allow_collapse_lines: bool) -> bool {
    if !allow_collapse_lines && lbl.is_boundary_collapse() {
        return false;
    }
    lbl.is_boundary(index) || lbl.is_line(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::coord;
    use crate::math::polygon_2d::Location;

    #[test]
    fn touching_lines_meet_at_a_point() {
        let mut a = OverlayLabel::new();
        a.init_line(0);
        a.set_location_all(1, Location::Exterior);
        let mut b = OverlayLabel::new();
        b.init_line(1);
        b.set_location_all(0, Location::Exterior);
        let g = OverlayGraph::new(vec![
            (vec![coord(0.0, 0.0), coord(1.0, 1.0)], a),
            (vec![coord(1.0, 1.0), coord(2.0, 0.0)], b),
        ]);
        assert_eq!(build_intersection_points(&g, false), vec![coord(1.0, 1.0)]);
    }
}
