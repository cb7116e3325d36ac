use crate::geometry::Dimension;
use crate::math::polygon_2d::Location;

/// The Boolean operation computed by an overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayOp {
    Intersection,
    Union,
    Difference,
    SymDifference,
}

/// Decides whether a point with the given locations relative to the two
/// inputs lies in the result. Boundary counts as interior; an unknown
/// location counts as exterior.
///
/// | A        | B        | ∩    | ∪    | A − B | A ⊕ B |
/// |----------|----------|------|------|-------|-------|
/// | interior | interior | keep | keep | -     | -     |
/// | interior | exterior | -    | keep | keep  | keep  |
/// | exterior | interior | -    | keep | -     | keep  |
/// | exterior | exterior | -    | -    | -     | -     |
#[allow(clippy::match_same_arms)]
#[must_use]
pub fn is_result_of_op(op: OverlayOp, loc_a: Option<Location>, loc_b: Option<Location>) -> bool {
    let in_a = matches!(loc_a, Some(Location::Interior | Location::Boundary));
    let in_b = matches!(loc_b, Some(Location::Interior | Location::Boundary));
    match (op, in_a, in_b) {
        (OverlayOp::Intersection, true, true) => true,
        (OverlayOp::Intersection, _, _) => false,

        (OverlayOp::Union, false, false) => false,
        (OverlayOp::Union, _, _) => true,

        (OverlayOp::Difference, true, false) => true,
        (OverlayOp::Difference, _, _) => false,

        (OverlayOp::SymDifference, true, false) => true,
        (OverlayOp::SymDifference, false, true) => true,
        (OverlayOp::SymDifference, _, _) => false,
    }
}

/// Dimension of the result of `op` on inputs of the given dimensions,
/// where `None` stands for an empty input.
#[must_use]
pub fn result_dimension(
    op: OverlayOp,
    dim_a: Option<Dimension>,
    dim_b: Option<Dimension>,
) -> Option<Dimension> {
    match op {
        OverlayOp::Intersection => dim_a.min(dim_b),
        OverlayOp::Union | OverlayOp::SymDifference => dim_a.max(dim_b),
        OverlayOp::Difference => dim_a,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const I: Option<Location> = Some(Location::Interior);
    const B: Option<Location> = Some(Location::Boundary);
    const E: Option<Location> = Some(Location::Exterior);

    #[test]
    fn truth_table() {
        assert!(is_result_of_op(OverlayOp::Intersection, I, B));
        assert!(!is_result_of_op(OverlayOp::Intersection, I, E));
        assert!(is_result_of_op(OverlayOp::Union, E, I));
        assert!(!is_result_of_op(OverlayOp::Union, E, None));
        assert!(is_result_of_op(OverlayOp::Difference, I, E));
        assert!(!is_result_of_op(OverlayOp::Difference, I, I));
        assert!(is_result_of_op(OverlayOp::SymDifference, E, B));
        assert!(!is_result_of_op(OverlayOp::SymDifference, I, I));
        assert!(!is_result_of_op(OverlayOp::SymDifference, E, E));
    }

    #[test]
    fn empty_result_dimensions() {
        let (p, l, a) = (Some(Dimension::Point), Some(Dimension::Line), Some(Dimension::Area));
        assert_eq!(result_dimension(OverlayOp::Intersection, a, l), l);
        assert_eq!(result_dimension(OverlayOp::Union, p, a), a);
        assert_eq!(result_dimension(OverlayOp::Difference, l, a), l);
        assert_eq!(result_dimension(OverlayOp::SymDifference, None, p), p);
        assert_eq!(result_dimension(OverlayOp::Intersection, None, a), None);
    }
}
