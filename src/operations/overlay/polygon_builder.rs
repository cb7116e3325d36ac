//! Assembles result polygons from the half-edges marked as result area.
//!
//! Result edges are first linked into maximal rings, which may touch
//! themselves at nodes. Each maximal ring is then relinked into minimal
//! rings that turn as sharply as possible at every node; minimal rings
//! are simple. Clockwise minimal rings are shells, counter-clockwise ones
//! holes.

use crate::error::TopologyError;
use crate::geometry::{Envelope, LineString, Polygon};
use crate::math::polygon_2d::{is_ccw, locate_in_ring, Location};
use crate::math::Coord;
use crate::topology::{HalfEdgeId, OverlayGraph};

#[derive(Debug)]
struct MinimalRing {
    pts: Vec<Coord>,
    env: Envelope,
    is_hole: bool,
    shell: Option<usize>,
    holes: Vec<usize>,
}

/// Builds the polygons bounded by the result-area half-edges of `graph`.
pub(crate) fn build_polygons(graph: &mut OverlayGraph) -> Result<Vec<Polygon>, TopologyError> {
    let result_edges = graph.result_area_edges();
    for &e in &result_edges {
        link_result_area_max_ring_at_node(graph, e)?;
    }
    let max_rings = build_maximal_rings(graph, &result_edges)?;

    let mut rings: Vec<MinimalRing> = Vec::new();
    let mut shells: Vec<usize> = Vec::new();
    let mut free_holes: Vec<usize> = Vec::new();
    for (id, &start) in max_rings.iter().enumerate() {
        let min_rings = build_minimal_rings(graph, id, start, &mut rings)?;
        assign_shells_and_holes(&mut rings, &min_rings, &mut shells, &mut free_holes)?;
    }
    place_free_holes(&mut rings, &shells, &free_holes)?;

    Ok(shells
        .iter()
        .map(|&s| {
            let holes = rings[s]
                .holes
                .iter()
                .map(|&h| LineString(rings[h].pts.clone()))
                .collect();
            Polygon::new(LineString(rings[s].pts.clone()), holes)
        })
        .collect())
}

/// Links the first unlinked incoming result edge found counter-clockwise
/// after `node_edge` to the next outgoing result edge.
fn link_result_area_max_ring_at_node(graph: &mut OverlayGraph, node_edge: HalfEdgeId) -> Result<(), TopologyError> {
    let end_out = graph.onext(node_edge);
    let mut curr_out = end_out;
    let mut curr_result_in: Option<HalfEdgeId> = None;
    let mut linking = false;
    loop {
        if curr_result_in.is_some_and(|e| graph.next_result_max(e).is_some()) {
            return Ok(());
        }
        if linking {
            if graph.is_in_result_area(curr_out) {
                if let Some(incoming) = curr_result_in {
                    graph.set_next_result_max(incoming, curr_out);
                }
                linking = false;
            }
        } else {
            let curr_in = graph.sym(curr_out);
            if graph.is_in_result_area(curr_in) {
                curr_result_in = Some(curr_in);
                linking = true;
            }
        }
        curr_out = graph.onext(curr_out);
        if curr_out == end_out {
            break;
        }
    }
    if linking {
        return Err(TopologyError::NoOutgoingEdge {
            at: graph.orig(node_edge),
        });
    }
    Ok(())
}

fn build_maximal_rings(graph: &mut OverlayGraph, result_edges: &[HalfEdgeId]) -> Result<Vec<HalfEdgeId>, TopologyError> {
    let mut starts = Vec::new();
    for &e in result_edges {
        if graph.is_in_result_area(e)
            && graph.label(e).is_boundary_either()
            && graph.max_edge_ring(e).is_none()
        {
            attach_max_ring(graph, e, starts.len())?;
            starts.push(e);
        }
    }
    Ok(starts)
}

fn attach_max_ring(graph: &mut OverlayGraph, start: HalfEdgeId, id: usize) -> Result<(), TopologyError> {
    let mut e = start;
    loop {
        if graph.max_edge_ring(e) == Some(id) {
            return Err(TopologyError::EdgeVisitedTwice { at: graph.orig(e) });
        }
        let Some(next) = graph.next_result_max(e) else {
            return Err(TopologyError::RingEdgeMissing { at: graph.dest(e) });
        };
        graph.set_max_edge_ring(e, id);
        e = next;
        if e == start {
            return Ok(());
        }
    }
}

fn next_max(graph: &OverlayGraph, e: HalfEdgeId) -> Result<HalfEdgeId, TopologyError> {
    graph
        .next_result_max(e)
        .ok_or(TopologyError::RingEdgeMissing { at: graph.dest(e) })
}

fn build_minimal_rings(
    graph: &mut OverlayGraph,
    max_id: usize,
    start: HalfEdgeId,
    rings: &mut Vec<MinimalRing>,
) -> Result<Vec<usize>, TopologyError> {
    let mut e = start;
    loop {
        link_min_ring_edges_at_node(graph, e, max_id)?;
        e = next_max(graph, e)?;
        if e == start {
            break;
        }
    }

    let mut out = Vec::new();
    loop {
        if graph.edge_ring(e).is_none() {
            out.push(build_minimal_ring(graph, e, rings)?);
        }
        e = next_max(graph, e)?;
        if e == start {
            break;
        }
    }
    Ok(out)
}

/// Pairs each incoming edge of the maximal ring at this node with the
/// nearest outgoing edge of the same ring clockwise from it.
fn link_min_ring_edges_at_node(graph: &mut OverlayGraph, node_edge: HalfEdgeId, max_id: usize) -> Result<(), TopologyError> {
    let end_out = node_edge;
    let mut curr_max_out = Some(end_out);
    let mut curr_out = graph.onext(end_out);
    loop {
        let curr_in = graph.sym(curr_out);
        if graph.max_edge_ring(curr_in) == Some(max_id) && graph.next_result(curr_in).is_some() {
            return Ok(());
        }
        curr_max_out = match curr_max_out {
            None => (graph.max_edge_ring(curr_out) == Some(max_id)).then_some(curr_out),
            Some(out) if graph.max_edge_ring(curr_in) == Some(max_id) => {
                graph.set_next_result(curr_in, out);
                None
            }
            keep => keep,
        };
        curr_out = graph.onext(curr_out);
        if curr_out == end_out {
            break;
        }
    }
    if curr_max_out.is_some() {
        return Err(TopologyError::UnmatchedEdge {
            at: graph.orig(node_edge),
        });
    }
    Ok(())
}

fn build_minimal_ring(graph: &mut OverlayGraph, start: HalfEdgeId, rings: &mut Vec<MinimalRing>) -> Result<usize, TopologyError> {
    let id = rings.len();
    let mut pts: Vec<Coord> = Vec::new();
    let mut e = start;
    loop {
        if graph.edge_ring(e) == Some(id) {
            return Err(TopologyError::EdgeVisitedTwice { at: graph.orig(e) });
        }
        graph.append_coords(e, &mut pts);
        graph.set_edge_ring(e, id);
        let Some(next) = graph.next_result(e) else {
            return Err(TopologyError::RingEdgeMissing { at: graph.dest(e) });
        };
        e = next;
        if e == start {
            break;
        }
    }
    if let (Some(&first), Some(&last)) = (pts.first(), pts.last()) {
        if first != last {
            pts.push(first);
        }
    }
    rings.push(MinimalRing {
        env: Envelope::from_coords(&pts),
        is_hole: is_ccw(&pts),
        pts,
        shell: None,
        holes: Vec::new(),
    });
    Ok(id)
}

/// A maximal ring yields at most one shell; its holes belong to that
/// shell. Holes of a ring without a shell are placed later.
fn assign_shells_and_holes(
    rings: &mut [MinimalRing],
    min_rings: &[usize],
    shells: &mut Vec<usize>,
    free_holes: &mut Vec<usize>,
) -> Result<(), TopologyError> {
    let mut ring_shells = min_rings.iter().copied().filter(|&r| !rings[r].is_hole);
    let shell = ring_shells.next();
    if let Some(extra) = ring_shells.next() {
        return Err(TopologyError::MultipleShells {
            at: rings[extra].pts[0],
        });
    }
    let Some(shell) = shell else {
        free_holes.extend_from_slice(min_rings);
        return Ok(());
    };
    for &r in min_rings {
        if rings[r].is_hole {
            rings[r].shell = Some(shell);
            rings[shell].holes.push(r);
        }
    }
    shells.push(shell);
    Ok(())
}

fn place_free_holes(rings: &mut [MinimalRing], shells: &[usize], free_holes: &[usize]) -> Result<(), TopologyError> {
    for &hole in free_holes {
        if rings[hole].shell.is_some() {
            continue;
        }
        let Some(shell) = find_containing_shell(rings, hole, shells) else {
            return Err(TopologyError::UnassignedHole {
                at: rings[hole].pts[0],
            });
        };
        rings[hole].shell = Some(shell);
        rings[shell].holes.push(hole);
    }
    Ok(())
}

/// The smallest shell containing the hole, tested with a hole vertex that
/// is not also a shell vertex.
fn find_containing_shell(rings: &[MinimalRing], hole: usize, shells: &[usize]) -> Option<usize> {
    let test = &rings[hole];
    let mut best: Option<usize> = None;
    for &s in shells {
        let shell = &rings[s];
        if shell.env == test.env || !shell.env.covers(&test.env) {
            continue;
        }
        let Some(pt) = test.pts.iter().find(|p| !shell.pts.contains(p)) else {
            continue;
        };
        if locate_in_ring(pt, &shell.pts) == Location::Exterior {
            continue;
        }
        if best.map_or(true, |b| rings[b].env.covers(&shell.env)) {
            best = Some(s);
        }
    }
    best
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Geometry;
    use crate::math::coord;
    use crate::math::polygon_2d::signed_area_2d;
    use crate::noding::Noder;
    use crate::operations::overlay::edge_noding::node_edges;
    use crate::operations::overlay::input::InputGeometry;
    use crate::operations::overlay::labeller::OverlayLabeller;
    use crate::operations::overlay::select::OverlayOp;
    use approx::assert_relative_eq;

    fn polygons(a: &Geometry, b: &Geometry, op: OverlayOp) -> Vec<Polygon> {
        let input = InputGeometry::new(a, Some(b)).unwrap();
        let noded = node_edges(a, Some(b), &Noder::Floating { validate: true }).unwrap();
        let mut graph = OverlayGraph::new(
            noded
                .edges
                .into_iter()
                .map(|e| {
                    let lbl = e.create_label();
                    (e.into_coords(), lbl)
                })
                .collect(),
        );
        let mut labeller = OverlayLabeller::new(&mut graph, &input);
        labeller.compute_labelling().unwrap();
        labeller.mark_result_area_edges(op);
        labeller.unmark_duplicate_edges_from_result_area();
        build_polygons(&mut graph).unwrap()
    }

    #[test]
    fn intersection_of_overlapping_squares() {
        let a = Geometry::Polygon(Polygon::rect(0.0, 0.0, 10.0, 10.0));
        let b = Geometry::Polygon(Polygon::rect(5.0, 5.0, 15.0, 15.0));
        let polys = polygons(&a, &b, OverlayOp::Intersection);
        assert_eq!(polys.len(), 1);
        assert_relative_eq!(polys[0].area(), 25.0);
        // Shells come out clockwise.
        assert!(signed_area_2d(polys[0].exterior().coords()) < 0.0);
        assert_eq!(polys[0].envelope(), Envelope::from_points(&coord(5.0, 5.0), &coord(10.0, 10.0)));
    }

    #[test]
    fn difference_of_nested_square_leaves_free_hole() {
        let a = Geometry::Polygon(Polygon::rect(0.0, 0.0, 10.0, 10.0));
        let b = Geometry::Polygon(Polygon::rect(2.0, 2.0, 4.0, 4.0));
        let polys = polygons(&a, &b, OverlayOp::Difference);
        assert_eq!(polys.len(), 1);
        assert_eq!(polys[0].interiors().len(), 1);
        assert!(is_ccw(polys[0].interiors()[0].coords()));
        assert_relative_eq!(polys[0].area(), 96.0);
    }

    #[test]
    fn squares_touching_at_a_corner_stay_separate() {
        let a = Geometry::Polygon(Polygon::rect(0.0, 0.0, 1.0, 1.0));
        let b = Geometry::Polygon(Polygon::rect(1.0, 1.0, 2.0, 2.0));
        let polys = polygons(&a, &b, OverlayOp::Union);
        assert_eq!(polys.len(), 2);
        for p in &polys {
            assert_relative_eq!(p.area(), 1.0);
            assert!(p.interiors().is_empty());
        }
    }

    #[test]
    fn union_forming_a_hole_through_a_self_touching_ring() {
        // A U-shape closed off by a bar that touches it at two corners.
        let u = Geometry::Polygon(Polygon::new(
            LineString::from_xy(&[
                (0.0, 0.0),
                (3.0, 0.0),
                (3.0, 3.0),
                (2.0, 3.0),
                (2.0, 1.0),
                (1.0, 1.0),
                (1.0, 3.0),
                (0.0, 3.0),
                (0.0, 0.0),
            ]),
            Vec::new(),
        ));
        let bar = Geometry::Polygon(Polygon::rect(0.0, 3.0, 3.0, 4.0));
        let polys = polygons(&u, &bar, OverlayOp::Union);
        assert_eq!(polys.len(), 1);
        assert_eq!(polys[0].interiors().len(), 1);
        assert_relative_eq!(polys[0].area(), 10.0);
    }
}
