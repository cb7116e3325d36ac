//! Topological labels carried by overlay graph edges.
//!
//! A label records, for each of the two inputs, how the edge relates to it
//! and where the edge's sides (and the edge itself) lie relative to that
//! input. Both half-edges of a pair share one label; side queries take the
//! half-edge's direction into account.

use crate::math::polygon_2d::Location;

/// How an edge was contributed by one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EdgeRole {
    /// The input contributed no edge here.
    NotPart,
    /// Part of a linear input.
    Line,
    /// Part of an area boundary, with interior on one side.
    Boundary,
    /// Area boundary edges that merged into a zero-width collapse.
    Collapse,
}

/// Side of a directed edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    On,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InputLabel {
    role: EdgeRole,
    is_hole: bool,
    left: Option<Location>,
    right: Option<Location>,
    line: Option<Location>,
}

impl Default for InputLabel {
    fn default() -> Self {
        Self {
            role: EdgeRole::NotPart,
            is_hole: false,
            left: None,
            right: None,
            line: None,
        }
    }
}

/// Label of an edge pair relative to both inputs (index 0 and 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverlayLabel {
    inputs: [InputLabel; 2],
}

impl OverlayLabel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the edge as an area boundary of input `index`, with the given
    /// side locations in the edge's forward direction.
    pub fn init_boundary(&mut self, index: usize, left: Location, right: Location, is_hole: bool) {
        self.inputs[index] = InputLabel {
            role: EdgeRole::Boundary,
            is_hole,
            left: Some(left),
            right: Some(right),
            line: Some(Location::Interior),
        };
    }

    pub fn init_collapse(&mut self, index: usize, is_hole: bool) {
        self.inputs[index] = InputLabel {
            role: EdgeRole::Collapse,
            is_hole,
            ..InputLabel::default()
        };
    }

    pub fn init_line(&mut self, index: usize) {
        self.inputs[index] = InputLabel {
            role: EdgeRole::Line,
            ..InputLabel::default()
        };
    }

    pub fn init_not_part(&mut self, index: usize) {
        self.inputs[index] = InputLabel::default();
    }

    #[must_use]
    pub fn role(&self, index: usize) -> EdgeRole {
        self.inputs[index].role
    }

    #[must_use]
    pub fn is_hole(&self, index: usize) -> bool {
        self.inputs[index].is_hole
    }

    #[must_use]
    pub fn is_boundary(&self, index: usize) -> bool {
        self.inputs[index].role == EdgeRole::Boundary
    }

    #[must_use]
    pub fn is_boundary_either(&self) -> bool {
        self.is_boundary(0) || self.is_boundary(1)
    }

    #[must_use]
    pub fn is_boundary_both(&self) -> bool {
        self.is_boundary(0) && self.is_boundary(1)
    }

    /// A boundary edge of exactly one input that is not part of the other.
    #[must_use]
    pub fn is_boundary_singleton(&self) -> bool {
        (self.role(0) == EdgeRole::Boundary && self.role(1) == EdgeRole::NotPart)
            || (self.role(1) == EdgeRole::Boundary && self.role(0) == EdgeRole::NotPart)
    }

    /// Boundary of both inputs, with the inputs' interiors on opposite
    /// sides.
    #[must_use]
    pub fn is_boundary_touch(&self) -> bool {
        self.is_boundary_both()
            && self.location(0, Side::Right, true) != self.location(1, Side::Right, true)
    }

    /// Not a boundary of both inputs and not part of any linear input.
    #[must_use]
    pub fn is_boundary_collapse(&self) -> bool {
        !self.is_line_any() && !self.is_boundary_both()
    }

    #[must_use]
    pub fn is_line(&self, index: usize) -> bool {
        self.inputs[index].role == EdgeRole::Line
    }

    #[must_use]
    pub fn is_line_any(&self) -> bool {
        self.is_line(0) || self.is_line(1)
    }

    #[must_use]
    pub fn is_collapse(&self, index: usize) -> bool {
        self.inputs[index].role == EdgeRole::Collapse
    }

    /// Line or collapse edge of input `index`.
    #[must_use]
    pub fn is_linear(&self, index: usize) -> bool {
        matches!(self.inputs[index].role, EdgeRole::Line | EdgeRole::Collapse)
    }

    #[must_use]
    pub fn is_not_part(&self, index: usize) -> bool {
        self.inputs[index].role == EdgeRole::NotPart
    }

    /// A collapse of some input lying in that input's interior.
    #[must_use]
    pub fn is_interior_collapse(&self) -> bool {
        (0..2).any(|i| self.is_collapse(i) && self.inputs[i].line == Some(Location::Interior))
    }

    /// A collapse of one input lying in the interior of the other, which
    /// contributed no edge here.
    #[must_use]
    pub fn is_collapse_and_not_part_interior(&self) -> bool {
        (self.is_collapse(0)
            && self.is_not_part(1)
            && self.inputs[1].line == Some(Location::Interior))
            || (self.is_collapse(1)
                && self.is_not_part(0)
                && self.inputs[0].line == Some(Location::Interior))
    }

    #[must_use]
    pub fn is_line_location_unknown(&self, index: usize) -> bool {
        self.inputs[index].line.is_none()
    }

    #[must_use]
    pub fn is_line_in_area(&self, index: usize) -> bool {
        self.inputs[index].line == Some(Location::Interior)
    }

    #[must_use]
    pub fn line_location(&self, index: usize) -> Option<Location> {
        self.inputs[index].line
    }

    /// Location of `side` for input `index`, seen from a half-edge that
    /// runs forward (`true`) or backward along the stored edge.
    #[must_use]
    pub fn location(&self, index: usize, side: Side, forward: bool) -> Option<Location> {
        let l = &self.inputs[index];
        match (side, forward) {
            (Side::Left, true) | (Side::Right, false) => l.left,
            (Side::Right, true) | (Side::Left, false) => l.right,
            (Side::On, _) => l.line,
        }
    }

    /// Side location for boundary edges, line location otherwise.
    #[must_use]
    pub fn location_boundary_or_line(&self, index: usize, side: Side, forward: bool) -> Option<Location> {
        if self.is_boundary(index) {
            self.location(index, side, forward)
        } else {
            self.line_location(index)
        }
    }

    pub fn set_location_line(&mut self, index: usize, loc: Option<Location>) {
        self.inputs[index].line = loc;
    }

    pub fn set_location_all(&mut self, index: usize, loc: Location) {
        let l = &mut self.inputs[index];
        l.left = Some(loc);
        l.right = Some(loc);
        l.line = Some(loc);
    }

    /// A collapsed hole lies in the interior of its shell; any other
    /// collapse lies outside the input.
    pub fn set_location_collapse(&mut self, index: usize) {
        let loc = if self.inputs[index].is_hole {
            Location::Interior
        } else {
            Location::Exterior
        };
        self.inputs[index].line = Some(loc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_sides_flip_with_direction() {
        let mut lbl = OverlayLabel::new();
        lbl.init_boundary(0, Location::Exterior, Location::Interior, false);
        assert_eq!(lbl.location(0, Side::Right, true), Some(Location::Interior));
        assert_eq!(lbl.location(0, Side::Right, false), Some(Location::Exterior));
        assert_eq!(lbl.location(0, Side::On, false), Some(Location::Interior));
        assert!(lbl.is_boundary_singleton());
        assert!(lbl.is_boundary_collapse());
    }

    #[test]
    fn touch_requires_opposite_interiors() {
        let mut lbl = OverlayLabel::new();
        lbl.init_boundary(0, Location::Exterior, Location::Interior, false);
        lbl.init_boundary(1, Location::Interior, Location::Exterior, false);
        assert!(lbl.is_boundary_touch());
        assert!(!lbl.is_boundary_collapse());
        lbl.init_boundary(1, Location::Exterior, Location::Interior, false);
        assert!(!lbl.is_boundary_touch());
    }

    #[test]
    fn collapse_location_depends_on_hole() {
        let mut lbl = OverlayLabel::new();
        lbl.init_collapse(0, true);
        lbl.init_collapse(1, false);
        assert!(lbl.is_line_location_unknown(0));
        lbl.set_location_collapse(0);
        lbl.set_location_collapse(1);
        assert_eq!(lbl.line_location(0), Some(Location::Interior));
        assert_eq!(lbl.line_location(1), Some(Location::Exterior));
        assert!(lbl.is_interior_collapse());
    }

    #[test]
    fn line_labels_are_linear() {
        let mut lbl = OverlayLabel::new();
        lbl.init_line(1);
        assert!(lbl.is_linear(1));
        assert!(lbl.is_line_any());
        assert!(!lbl.is_boundary_collapse());
        lbl.set_location_all(0, Location::Interior);
        assert!(lbl.is_line_in_area(0));
        assert_eq!(
            lbl.location_boundary_or_line(0, Side::Right, true),
            Some(Location::Interior)
        );
    }
}
