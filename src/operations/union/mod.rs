//! Union of a single geometry or a collection of geometries.
//!
//! Components are unioned by dimension. Polygons are reduced with the
//! configured [`UnionStrategy`], lines are noded and dissolved by a robust
//! self-union, and points are deduplicated. The three partial results are
//! then combined, dropping points covered by lines or areas.

mod cascaded;

use std::collections::HashSet;

use tracing::instrument;

use crate::config::{OverlayConfig, UnionStrategy};
use crate::error::Result;
use crate::geometry::{Geometry, LineString, Polygon};
use crate::math::polygon_2d::Location;
use crate::math::{Coord, CoordKey};

use super::overlay::{AreaLocator, LineLocator, OverlayOp, PointLocator};
use super::robust::OverlayRobust;

use cascaded::{cascaded_union, sequential_union};

/// Unions all components of a geometry.
pub struct UnaryUnion<'a> {
    geom: &'a Geometry,
    config: OverlayConfig,
}

impl<'a> UnaryUnion<'a> {
    /// Creates a union of the components of `geom`.
    #[must_use]
    pub fn new(geom: &'a Geometry) -> Self {
        Self {
            geom,
            config: OverlayConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: OverlayConfig) -> Self {
        self.config = config;
        self
    }

    /// Executes the union.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is invalid or a pairwise union fails
    /// under every noding strategy.
    #[instrument(skip_all, fields(strategy = ?self.config.union_strategy))]
    pub fn execute(&self) -> Result<Geometry> {
        self.geom.validate()?;
        let polygons: Vec<Polygon> = self.geom.polygons().into_iter().cloned().collect();
        let lines: Vec<LineString> = self.geom.line_strings().into_iter().cloned().collect();
        let points = self.geom.points();

        let union_points = (!points.is_empty()).then(|| dedup_points(&points));
        let union_lines = if lines.is_empty() {
            None
        } else {
            let multi = Geometry::MultiLineString(lines);
            Some(
                OverlayRobust::unary(&multi)
                    .with_config(self.config.clone())
                    .result()?,
            )
        };
        let union_fn = |a: &Geometry, b: &Geometry| self.binary(a, b);
        let union_polygons = match self.config.union_strategy {
            UnionStrategy::Cascaded => cascaded_union(&polygons, &union_fn)?,
            UnionStrategy::Sequential => sequential_union(&polygons, &union_fn)?,
        };

        let union_la = match (union_lines, union_polygons) {
            (Some(l), Some(p)) => Some(self.binary(&l, &p)?),
            (l, p) => l.or(p),
        };
        let result = match (union_points, union_la) {
            (Some(pts), Some(la)) => Some(union_points_with(&pts, la)),
            (Some(pts), None) => Geometry::from_components(Vec::new(), Vec::new(), pts),
            (None, la) => la,
        };
        Ok(result.unwrap_or_else(|| Geometry::empty(self.geom.dimension())))
    }

    fn binary(&self, a: &Geometry, b: &Geometry) -> Result<Geometry> {
        OverlayRobust::new(a, b, OverlayOp::Union)
            .with_config(self.config.clone())
            .result()
    }
}

fn dedup_points(points: &[Coord]) -> Vec<Coord> {
    let mut seen = HashSet::new();
    points
        .iter()
        .copied()
        .filter(|p| seen.insert(CoordKey::from(p)))
        .collect()
}

/// Adds the points not covered by `other` to it.
fn union_points_with(points: &[Coord], other: Geometry) -> Geometry {
    let areas = AreaLocator::new(&other);
    let lines = LineLocator::new(&other);
    let exterior: Vec<Coord> = points
        .iter()
        .copied()
        .filter(|p| areas.locate(p) == Location::Exterior && lines.locate(p) == Location::Exterior)
        .collect();
    if exterior.is_empty() {
        return other;
    }
    let polygons = other.polygons().into_iter().cloned().collect();
    let lines = other.line_strings().into_iter().cloned().collect();
    Geometry::from_components(polygons, lines, exterior).unwrap_or(other)
}

/// Robust union of two geometries.
///
/// # Errors
///
/// See [`OverlayRobust::result`].
pub fn union(a: &Geometry, b: &Geometry) -> Result<Geometry> {
    OverlayRobust::new(a, b, OverlayOp::Union).result()
}

/// Union of all components of `geom` with default settings.
///
/// # Errors
///
/// See [`UnaryUnion::execute`].
pub fn unary_union(geom: &Geometry) -> Result<Geometry> {
    UnaryUnion::new(geom).execute()
}

/// Union of a list of geometries.
///
/// # Errors
///
/// See [`UnaryUnion::execute`].
pub fn union_all(geoms: &[Geometry], config: &OverlayConfig) -> Result<Geometry> {
    let collection = Geometry::GeometryCollection(geoms.to_vec());
    UnaryUnion::new(&collection).with_config(config.clone()).execute()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::geometry::Dimension;
    use crate::math::coord;

    #[test]
    fn grid_of_squares_becomes_one_square() {
        let g = Geometry::MultiPolygon(vec![
            Polygon::rect(0.0, 0.0, 1.0, 1.0),
            Polygon::rect(1.0, 0.0, 2.0, 1.0),
            Polygon::rect(0.0, 1.0, 1.0, 2.0),
            Polygon::rect(1.0, 1.0, 2.0, 2.0),
        ]);
        for strategy in [UnionStrategy::Cascaded, UnionStrategy::Sequential] {
            let config = OverlayConfig {
                union_strategy: strategy,
                ..OverlayConfig::default()
            };
            let u = UnaryUnion::new(&g).with_config(config).execute().unwrap();
            let Geometry::Polygon(p) = &u else {
                panic!("expected a polygon, got {u:?}");
            };
            assert!(p.interiors().is_empty());
            assert_relative_eq!(u.area(), 4.0);
            assert!(!u.coords().contains(&coord(1.0, 1.0)));
        }
    }

    #[test]
    fn overlapping_polygons() {
        let g = Geometry::MultiPolygon(vec![
            Polygon::rect(0.0, 0.0, 2.0, 2.0),
            Polygon::rect(1.0, 1.0, 3.0, 3.0),
        ]);
        let u = unary_union(&g).unwrap();
        assert!(matches!(u, Geometry::Polygon(_)));
        assert_relative_eq!(u.area(), 7.0);
    }

    #[test]
    fn lines_are_noded_and_dissolved() {
        let g = Geometry::MultiLineString(vec![
            LineString::from_xy(&[(0.0, 0.0), (2.0, 0.0)]),
            LineString::from_xy(&[(1.0, 0.0), (3.0, 0.0)]),
        ]);
        let u = unary_union(&g).unwrap();
        assert_eq!(u.dimension(), Some(Dimension::Line));
        assert_relative_eq!(u.length(), 3.0);
    }

    #[test]
    fn covered_points_are_dropped() {
        let g = Geometry::GeometryCollection(vec![
            Geometry::Polygon(Polygon::rect(0.0, 0.0, 1.0, 1.0)),
            Geometry::Point(coord(0.5, 0.5)),
            Geometry::Point(coord(1.0, 0.5)),
            Geometry::Point(coord(5.0, 5.0)),
            Geometry::Point(coord(5.0, 5.0)),
        ]);
        let u = unary_union(&g).unwrap();
        let Geometry::GeometryCollection(parts) = u else {
            panic!("expected a collection");
        };
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[1], Geometry::Point(coord(5.0, 5.0)));
    }

    #[test]
    fn points_only() {
        let g = Geometry::MultiPoint(vec![coord(1.0, 1.0), coord(1.0, 1.0), coord(2.0, 2.0)]);
        let u = unary_union(&g).unwrap();
        assert_eq!(u, Geometry::MultiPoint(vec![coord(1.0, 1.0), coord(2.0, 2.0)]));
    }

    #[test]
    fn empty_input_keeps_dimension() {
        let g = Geometry::empty(Some(Dimension::Area));
        let u = unary_union(&g).unwrap();
        assert!(u.is_empty());
        assert_eq!(u.dimension(), Some(Dimension::Area));
    }

    #[test]
    fn union_all_of_list() {
        let geoms = vec![
            Geometry::Polygon(Polygon::rect(0.0, 0.0, 1.0, 1.0)),
            Geometry::Polygon(Polygon::rect(1.0, 0.0, 2.0, 1.0)),
        ];
        let u = union_all(&geoms, &OverlayConfig::default()).unwrap();
        assert_relative_eq!(u.area(), 2.0);
    }
}
