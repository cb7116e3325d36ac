//! Overlays involving point operands. These need no graph: points are
//! rounded, deduplicated and located against the other operand.

use std::collections::HashSet;

use crate::error::Result;
use crate::geometry::{Dimension, Geometry, PrecisionModel};
use crate::math::polygon_2d::Location;
use crate::math::{Coord, CoordKey};

use super::locate::{AreaLocator, LineLocator, PointLocator};
use super::select::{result_dimension, OverlayOp};

/// Rounded points of `g` with duplicates removed, in input order.
fn rounded_points(g: &Geometry, pm: &PrecisionModel) -> Vec<Coord> {
    let mut seen = HashSet::new();
    g.points()
        .iter()
        .map(|p| pm.make_precise_coord(p))
        .filter(|p| seen.insert(CoordKey::from(p)))
        .collect()
}

fn point_result(points: Vec<Coord>) -> Geometry {
    Geometry::from_components(Vec::new(), Vec::new(), points)
        .unwrap_or_else(|| Geometry::empty(Some(Dimension::Point)))
}

/// Overlay of two point operands.
pub(crate) fn overlay_points(op: OverlayOp, a: &Geometry, b: &Geometry, pm: &PrecisionModel) -> Geometry {
    let pts_a = rounded_points(a, pm);
    let pts_b = rounded_points(b, pm);
    let keys_a: HashSet<CoordKey> = pts_a.iter().map(CoordKey::from).collect();
    let keys_b: HashSet<CoordKey> = pts_b.iter().map(CoordKey::from).collect();
    let only = |pts: &[Coord], other: &HashSet<CoordKey>| -> Vec<Coord> {
        pts.iter()
            .copied()
            .filter(|p| !other.contains(&CoordKey::from(p)))
            .collect()
    };

    let result = match op {
        OverlayOp::Intersection => pts_a
            .iter()
            .copied()
            .filter(|p| keys_b.contains(&CoordKey::from(p)))
            .collect(),
        OverlayOp::Union => {
            let mut out = pts_a.clone();
            out.extend(only(&pts_b, &keys_a));
            out
        }
        OverlayOp::Difference => only(&pts_a, &keys_b),
        OverlayOp::SymDifference => {
            let mut out = only(&pts_a, &keys_b);
            out.extend(only(&pts_b, &keys_a));
            out
        }
    };
    point_result(result)
}

/// Overlay of a point operand with a linear or areal one.
///
/// When the result keeps the non-point operand, that operand is first
/// unioned by `self_union` so its output is noded and on the precision
/// grid.
pub(crate) fn overlay_mixed_points(
    op: OverlayOp,
    a: &Geometry,
    b: &Geometry,
    pm: &PrecisionModel,
    self_union: impl Fn(&Geometry) -> Result<Geometry>,
) -> Result<Geometry> {
    let point_is_rhs = a.dimension() != Some(Dimension::Point);
    let (points, non_point) = if point_is_rhs { (b, a) } else { (a, b) };
    let result_dim = result_dimension(op, a.dimension(), b.dimension());

    let prepared = if result_dim == Some(Dimension::Point) {
        non_point.clone()
    } else {
        self_union(non_point)?
    };
    let locator: Box<dyn PointLocator> = if prepared.dimension() == Some(Dimension::Area) {
        Box::new(AreaLocator::new(&prepared))
    } else {
        Box::new(LineLocator::new(&prepared))
    };
    let coords = rounded_points(points, pm);
    let find_points = |covered: bool| -> Vec<Coord> {
        coords
            .iter()
            .copied()
            .filter(|p| (locator.locate(p) != Location::Exterior) == covered)
            .collect()
    };

    Ok(match op {
        OverlayOp::Intersection => point_result(find_points(true)),
        OverlayOp::Union | OverlayOp::SymDifference => {
            let polygons = prepared.polygons().into_iter().cloned().collect();
            let lines = prepared.line_strings().into_iter().cloned().collect();
            Geometry::from_components(polygons, lines, find_points(false))
                .unwrap_or_else(|| Geometry::empty(result_dim))
        }
        OverlayOp::Difference if point_is_rhs => non_point.clone(),
        OverlayOp::Difference => point_result(find_points(false)),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::{LineString, Polygon};
    use crate::math::coord;

    fn multi(pts: &[(f64, f64)]) -> Geometry {
        Geometry::MultiPoint(pts.iter().map(|&(x, y)| coord(x, y)).collect())
    }

    #[test]
    fn point_set_operations() {
        let a = multi(&[(0.0, 0.0), (1.0, 1.0), (1.0, 1.0)]);
        let b = multi(&[(1.0, 1.0), (2.0, 2.0)]);
        let pm = PrecisionModel::Floating;
        assert_eq!(
            overlay_points(OverlayOp::Intersection, &a, &b, &pm),
            Geometry::Point(coord(1.0, 1.0))
        );
        assert_eq!(
            overlay_points(OverlayOp::Union, &a, &b, &pm),
            multi(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)])
        );
        assert_eq!(
            overlay_points(OverlayOp::SymDifference, &a, &b, &pm),
            multi(&[(0.0, 0.0), (2.0, 2.0)])
        );
        assert!(overlay_points(OverlayOp::Difference, &b, &multi(&[(1.0, 1.0), (2.0, 2.0)]), &pm).is_empty());
    }

    #[test]
    fn points_are_rounded_before_comparison() {
        let a = Geometry::Point(coord(1.04, 1.0));
        let b = Geometry::Point(coord(0.96, 1.0));
        let pm = PrecisionModel::fixed(10.0);
        assert_eq!(
            overlay_points(OverlayOp::Intersection, &a, &b, &pm),
            Geometry::Point(coord(1.0, 1.0))
        );
    }

    #[test]
    fn line_minus_point_is_the_line() {
        let line = Geometry::LineString(LineString::from_xy(&[(0.0, 0.0), (10.0, 0.0)]));
        let pt = Geometry::Point(coord(5.0, 0.0));
        let pm = PrecisionModel::Floating;
        let diff = overlay_mixed_points(OverlayOp::Difference, &line, &pt, &pm, |g| Ok(g.clone())).unwrap();
        assert_eq!(diff, line);
        let union = overlay_mixed_points(OverlayOp::Union, &line, &pt, &pm, |g| Ok(g.clone())).unwrap();
        assert_eq!(union, line);
        let inter = overlay_mixed_points(OverlayOp::Intersection, &pt, &line, &pm, |g| Ok(g.clone())).unwrap();
        assert_eq!(inter, pt);
    }

    #[test]
    fn exterior_points_join_the_area() {
        let square = Geometry::Polygon(Polygon::rect(0.0, 0.0, 1.0, 1.0));
        let pts = multi(&[(0.5, 0.5), (3.0, 3.0)]);
        let pm = PrecisionModel::Floating;
        let union = overlay_mixed_points(OverlayOp::Union, &pts, &square, &pm, |g| Ok(g.clone())).unwrap();
        let Geometry::GeometryCollection(parts) = union else {
            panic!("expected a collection");
        };
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[1], Geometry::Point(coord(3.0, 3.0)));
        let diff = overlay_mixed_points(OverlayOp::Difference, &pts, &square, &pm, |g| Ok(g.clone())).unwrap();
        assert_eq!(diff, Geometry::Point(coord(3.0, 3.0)));
    }
}
