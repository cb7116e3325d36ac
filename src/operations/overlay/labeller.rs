//! Completes the labels of an overlay graph and marks the result area.
//!
//! Boundary edges carry full side locations from construction. The passes
//! below fill in the rest: side locations propagate around nodes, line
//! locations propagate along connected linear edges, collapses take the
//! location implied by their ring role, and whatever is still unknown is
//! located against the operand directly.

use std::collections::VecDeque;

use crate::error::TopologyError;
use crate::math::polygon_2d::Location;
use crate::topology::{HalfEdgeId, OverlayGraph, Side};

use super::input::InputGeometry;
use super::select::{is_result_of_op, OverlayOp};

pub(crate) struct OverlayLabeller<'g, 'a> {
    graph: &'g mut OverlayGraph,
    input: &'g InputGeometry<'a>,
    edges: Vec<HalfEdgeId>,
}

impl<'g, 'a> OverlayLabeller<'g, 'a> {
    pub(crate) fn new(graph: &'g mut OverlayGraph, input: &'g InputGeometry<'a>) -> Self {
        let edges = graph.half_edges().to_vec();
        Self {
            graph,
            input,
            edges,
        }
    }

    /// Runs all labelling passes.
    pub(crate) fn compute_labelling(&mut self) -> Result<(), TopologyError> {
        let nodes = self.graph.node_edges().to_vec();
        for node in nodes {
            self.propagate_area_locations(node, 0)?;
            if self.input.has_edges(1) {
                self.propagate_area_locations(node, 1)?;
            }
        }
        self.label_connected_linear_edges();
        self.label_collapsed_edges();
        self.label_connected_linear_edges();
        self.label_disconnected_edges();
        Ok(())
    }

    /// Walks counter-clockwise around a node, carrying the side location
    /// of an areal operand across every edge. Non-boundary edges receive
    /// the location of the face they lie in.
    fn propagate_area_locations(&mut self, node: HalfEdgeId, index: usize) -> Result<(), TopologyError> {
        if !self.input.is_area(index) || self.graph.degree(node) == 1 {
            return Ok(());
        }
        let Some(start) = self
            .graph
            .star(node)
            .find(|&e| self.graph.label(e).is_boundary(index))
        else {
            return Ok(());
        };

        let mut curr_loc = self.location(start, index, Side::Left);
        let mut e = self.graph.onext(start);
        loop {
            if self.graph.label(e).is_boundary(index) {
                if self.location(e, index, Side::Right) != curr_loc {
                    return Err(TopologyError::SideLocationConflict {
                        input: index,
                        at: self.graph.orig(e),
                    });
                }
                curr_loc = self.location(e, index, Side::Left);
            } else {
                self.graph.label_mut(e).set_location_line(index, curr_loc);
            }
            e = self.graph.onext(e);
            if e == start {
                break;
            }
        }
        Ok(())
    }

    fn location(&self, e: HalfEdgeId, index: usize, side: Side) -> Option<Location> {
        self.graph
            .label(e)
            .location(index, side, self.graph.is_forward(e))
    }

    fn label_connected_linear_edges(&mut self) {
        self.propagate_linear_locations(0);
        if self.input.has_edges(1) {
            self.propagate_linear_locations(1);
        }
    }

    /// Spreads known line locations to connected linear edges whose
    /// location is still unknown. For a linear operand only the exterior
    /// location spreads.
    fn propagate_linear_locations(&mut self, index: usize) {
        let mut stack: VecDeque<HalfEdgeId> = self
            .edges
            .iter()
            .copied()
            .filter(|&e| {
                let lbl = self.graph.label(e);
                lbl.is_linear(index) && !lbl.is_line_location_unknown(index)
            })
            .collect();
        let is_input_line = self.input.is_line(index);

        while let Some(node) = stack.pop_front() {
            let line_loc = self.graph.label(node).line_location(index);
            if is_input_line && line_loc != Some(Location::Exterior) {
                continue;
            }
            let mut e = self.graph.onext(node);
            while e != node {
                if self.graph.label(e).is_line_location_unknown(index) {
                    self.graph.label_mut(e).set_location_line(index, line_loc);
                    stack.push_front(self.graph.sym(e));
                }
                e = self.graph.onext(e);
            }
        }
    }

    fn label_collapsed_edges(&mut self) {
        for &e in &self.edges {
            for index in 0..2 {
                let lbl = self.graph.label_mut(e);
                if lbl.is_line_location_unknown(index) && lbl.is_collapse(index) {
                    lbl.set_location_collapse(index);
                }
            }
        }
    }

    /// Locates edges with no topological path to a labelled edge. Both end
    /// points must be inside an areal operand for the edge to be interior.
    fn label_disconnected_edges(&mut self) {
        for &e in &self.edges {
            for index in 0..2 {
                if !self.graph.label(e).is_line_location_unknown(index) {
                    continue;
                }
                let loc = if self.input.is_area(index) {
                    let orig = self.input.locate_point_in_area(index, &self.graph.orig(e));
                    let dest = self.input.locate_point_in_area(index, &self.graph.dest(e));
                    if orig != Location::Exterior && dest != Location::Exterior {
                        Location::Interior
                    } else {
                        Location::Exterior
                    }
                } else {
                    Location::Exterior
                };
                self.graph.label_mut(e).set_location_all(index, loc);
            }
        }
    }

    /// Marks half-edges that bound an operand area and have the result
    /// area on their right.
    pub(crate) fn mark_result_area_edges(&mut self, op: OverlayOp) {
        for &e in &self.edges {
            let lbl = self.graph.label(e);
            let fwd = self.graph.is_forward(e);
            if lbl.is_boundary_either()
                && is_result_of_op(
                    op,
                    lbl.location_boundary_or_line(0, Side::Right, fwd),
                    lbl.location_boundary_or_line(1, Side::Right, fwd),
                )
            {
                self.graph.mark_in_result_area(e);
            }
        }
    }

    /// Edges with the result area on both sides lie inside the result and
    /// are dropped from its boundary.
    pub(crate) fn unmark_duplicate_edges_from_result_area(&mut self) {
        for &e in &self.edges {
            self.graph.unmark_result_area_both(e);
        }
    }
}
