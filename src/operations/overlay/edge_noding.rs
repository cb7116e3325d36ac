use tracing::debug;

use crate::error::TopologyError;
use crate::geometry::{Geometry, LineString};
use crate::math::polygon_2d::is_ccw;
use crate::math::{remove_repeated, Coord};
use crate::noding::{Noder, SegmentString};
use crate::topology::{merge_edges, Edge, EdgeSource};

/// Noded, merged edges of the operands, plus which operands kept any edge.
pub(crate) struct NodedEdges {
    pub edges: Vec<Edge>,
    pub has_edges: [bool; 2],
}

/// Extracts the linework of both operands, nodes it and merges coincident
/// edges. Point components contribute nothing.
pub(crate) fn node_edges(
    a: &Geometry,
    b: Option<&Geometry>,
    noder: &Noder,
) -> Result<NodedEdges, TopologyError> {
    let mut strings: Vec<SegmentString<EdgeSource>> = Vec::new();
    add_geometry(&mut strings, a, 0);
    if let Some(b) = b {
        add_geometry(&mut strings, b, 1);
    }

    let noded = noder.node(&strings)?;
    let mut has_edges = [false; 2];
    let mut edges = Vec::with_capacity(noded.len());
    for ss in noded {
        if is_collapsed(&ss.pts) {
            continue;
        }
        has_edges[ss.data.index] = true;
        edges.push(Edge::new(ss.pts, &ss.data));
    }
    let noded_count = edges.len();
    let edges = merge_edges(edges)?;
    debug!(
        input = strings.len(),
        noded = noded_count,
        merged = edges.len(),
        "overlay edges"
    );
    Ok(NodedEdges { edges, has_edges })
}

fn add_geometry(out: &mut Vec<SegmentString<EdgeSource>>, g: &Geometry, index: usize) {
    for poly in g.polygons() {
        add_ring(out, poly.exterior(), false, index);
        for hole in poly.interiors() {
            add_ring(out, hole, true, index);
        }
    }
    for line in g.line_strings() {
        let pts = remove_repeated(line.coords());
        if pts.len() >= 2 {
            out.push(SegmentString::new(pts, EdgeSource::line(index)));
        }
    }
}

/// Adds a ring oriented so that the depth delta is `+1` when the operand's
/// interior lies on the right: clockwise shells and counter-clockwise holes.
fn add_ring(out: &mut Vec<SegmentString<EdgeSource>>, ring: &LineString, is_hole: bool, index: usize) {
    let pts = remove_repeated(ring.coords());
    if pts.len() < 2 {
        return;
    }
    let ccw = is_ccw(&pts);
    let oriented = if is_hole { ccw } else { !ccw };
    let depth_delta = if oriented { 1 } else { -1 };
    out.push(SegmentString::new(pts, EdgeSource::ring(index, depth_delta, is_hole)));
}

fn is_collapsed(pts: &[Coord]) -> bool {
    let n = pts.len();
    n < 2 || pts[0] == pts[1] || (n > 2 && pts[n - 1] == pts[n - 2])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Polygon;
    use crate::math::coord;

    #[test]
    fn overlapping_squares_share_noded_edges() {
        let a = Geometry::Polygon(Polygon::rect(0.0, 0.0, 2.0, 2.0));
        let b = Geometry::Polygon(Polygon::rect(1.0, 1.0, 3.0, 3.0));
        let noded = node_edges(&a, Some(&b), &Noder::Floating { validate: true }).unwrap();
        assert_eq!(noded.has_edges, [true, true]);
        assert_eq!(noded.edges.len(), 6);
    }

    #[test]
    fn ring_depth_follows_orientation() {
        // Counter-clockwise shell: interior on the left.
        let a = Geometry::Polygon(Polygon::rect(0.0, 0.0, 1.0, 1.0));
        let mut strings = Vec::new();
        add_geometry(&mut strings, &a, 0);
        assert_eq!(strings.len(), 1);
        assert_eq!(strings[0].data.depth_delta, -1);
        assert!(!strings[0].data.is_hole);
    }

    #[test]
    fn shared_edge_of_adjacent_squares_is_merged() {
        let a = Geometry::Polygon(Polygon::rect(0.0, 0.0, 1.0, 1.0));
        let b = Geometry::Polygon(Polygon::rect(1.0, 0.0, 2.0, 1.0));
        let noded = node_edges(&a, Some(&b), &Noder::Floating { validate: true }).unwrap();
        // The left ring is also cut at its start vertex; the shared edge
        // is stored once.
        assert_eq!(noded.edges.len(), 4);
        let shared = noded
            .edges
            .iter()
            .find(|e| e.coords() == [coord(1.0, 0.0), coord(1.0, 1.0)])
            .unwrap()
            .create_label();
        assert!(shared.is_boundary_both());
    }
}
