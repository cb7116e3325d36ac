//! Checks applied to overlay operands and results outside the graph.

use crate::geometry::{Dimension, Envelope, Geometry, PrecisionModel};

use super::select::{result_dimension, OverlayOp};

/// Fraction by which a result area may exceed its theoretical bound.
const AREA_TOLERANCE: f64 = 0.1;

/// Whether the result of `op` is empty regardless of how the operands
/// interact.
pub(crate) fn is_empty_result(op: OverlayOp, a: &Geometry, b: Option<&Geometry>, pm: &PrecisionModel) -> bool {
    let Some(b) = b else {
        return a.is_empty();
    };
    match op {
        OverlayOp::Intersection => {
            a.is_empty() || b.is_empty() || is_env_disjoint(&a.envelope(), &b.envelope(), pm)
        }
        OverlayOp::Difference => a.is_empty(),
        OverlayOp::Union | OverlayOp::SymDifference => a.is_empty() && b.is_empty(),
    }
}

/// Envelope disjointness after rounding to the precision grid, so that
/// operands that only touch once rounded are not skipped.
fn is_env_disjoint(a: &Envelope, b: &Envelope, pm: &PrecisionModel) -> bool {
    if a.is_null() || b.is_null() {
        return true;
    }
    if pm.is_floating() {
        return !a.intersects(b);
    }
    let r = |v: f64| pm.make_precise(v);
    r(b.min_x) > r(a.max_x) || r(b.max_x) < r(a.min_x) || r(b.min_y) > r(a.max_y) || r(b.max_y) < r(a.min_y)
}

/// The empty geometry returned by `op` on operands of these dimensions.
pub(crate) fn create_empty_result(op: OverlayOp, a: &Geometry, b: Option<&Geometry>) -> Geometry {
    Geometry::empty(result_dimension(op, a.dimension(), b.and_then(Geometry::dimension)))
}

fn is_less(v1: f64, v2: f64) -> bool {
    v1 <= v2 * (1.0 + AREA_TOLERANCE)
}

fn is_greater(v1: f64, v2: f64) -> bool {
    v1 >= v2 * (1.0 - AREA_TOLERANCE)
}

/// Heuristic check that an areal result has an area compatible with the
/// operand areas. Catches gross failures of floating noding that still
/// produce a valid-looking graph.
pub(crate) fn is_result_area_consistent(op: OverlayOp, a: &Geometry, b: Option<&Geometry>, result: &Geometry) -> bool {
    let Some(b) = b else {
        return true;
    };
    if a.dimension() != Some(Dimension::Area) || b.dimension() != Some(Dimension::Area) {
        return true;
    }
    let area_result = result.area();
    let area_a = a.area();
    let area_b = b.area();
    match op {
        OverlayOp::Intersection => is_less(area_result, area_a) && is_less(area_result, area_b),
        OverlayOp::Difference => {
            is_less(area_result, area_a) && area_result >= area_a - area_b - AREA_TOLERANCE * area_a
        }
        OverlayOp::SymDifference => is_less(area_result, area_a + area_b),
        OverlayOp::Union => {
            is_less(area_a, area_result) && is_less(area_b, area_result) && is_greater(area_result, area_a - area_b)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{LineString, Polygon};

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Geometry {
        Geometry::Polygon(Polygon::rect(x0, y0, x1, y1))
    }

    #[test]
    fn disjoint_intersection_is_empty() {
        let a = rect(0.0, 0.0, 1.0, 1.0);
        let b = rect(2.0, 0.0, 3.0, 1.0);
        assert!(is_empty_result(OverlayOp::Intersection, &a, Some(&b), &PrecisionModel::Floating));
        assert!(!is_empty_result(OverlayOp::Union, &a, Some(&b), &PrecisionModel::Floating));
        assert!(!is_empty_result(OverlayOp::Difference, &a, Some(&b), &PrecisionModel::Floating));
    }

    #[test]
    fn rounding_can_make_envelopes_touch() {
        let a = rect(0.0, 0.0, 1.0, 1.0);
        let b = rect(1.2, 0.0, 3.0, 1.0);
        assert!(is_empty_result(OverlayOp::Intersection, &a, Some(&b), &PrecisionModel::Floating));
        assert!(!is_empty_result(OverlayOp::Intersection, &a, Some(&b), &PrecisionModel::fixed(1.0)));
    }

    #[test]
    fn empty_result_takes_operation_dimension() {
        let area = rect(0.0, 0.0, 1.0, 1.0);
        let line = Geometry::LineString(LineString::from_xy(&[(5.0, 5.0), (6.0, 6.0)]));
        assert_eq!(
            create_empty_result(OverlayOp::Intersection, &area, Some(&line)),
            Geometry::empty(Some(Dimension::Line))
        );
        assert_eq!(
            create_empty_result(OverlayOp::Union, &area, Some(&line)),
            Geometry::empty(Some(Dimension::Area))
        );
        assert_eq!(
            create_empty_result(OverlayOp::Difference, &line, Some(&area)),
            Geometry::empty(Some(Dimension::Line))
        );
    }

    #[test]
    fn area_consistency() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(5.0, 5.0, 15.0, 15.0);
        let good_union = rect(0.0, 0.0, 15.0, 15.0);
        assert!(is_result_area_consistent(OverlayOp::Union, &a, Some(&b), &good_union));
        let tiny = rect(0.0, 0.0, 1.0, 1.0);
        assert!(!is_result_area_consistent(OverlayOp::Union, &a, Some(&b), &tiny));
        assert!(is_result_area_consistent(OverlayOp::Intersection, &a, Some(&b), &tiny));
        assert!(!is_result_area_consistent(OverlayOp::Difference, &a, Some(&b), &good_union));
        assert!(is_result_area_consistent(OverlayOp::Union, &a, None, &tiny));
    }
}
