//! Overlay of two geometries on a labelled half-edge graph.
//!
//! The operands are noded together, merged into an [`OverlayGraph`],
//! labelled with their locations relative to each operand, and the edges
//! selected by the operation are assembled into polygons, lines and
//! points. Point operands bypass the graph.

mod edge_noding;
mod input;
mod labeller;
mod line_builder;
mod locate;
mod point_builder;
mod points;
mod polygon_builder;
mod result;
mod select;

use tracing::{debug, instrument};

use crate::config::OverlayConfig;
use crate::error::{OperationError, OverlayError, Result, TopologyError};
use crate::geometry::{Dimension, Geometry, LineString, PrecisionModel};
use crate::noding::Noder;
use crate::topology::OverlayGraph;

use edge_noding::node_edges;
use input::InputGeometry;
use labeller::OverlayLabeller;
use line_builder::LineBuilder;
use point_builder::build_intersection_points;
use points::{overlay_mixed_points, overlay_points};
use polygon_builder::build_polygons;
use result::{create_empty_result, is_empty_result, is_result_area_consistent};

pub use locate::{AreaLocator, LineLocator, PointLocator};
pub use select::{is_result_of_op, result_dimension, OverlayOp};

/// A configured overlay of one or two geometries.
///
/// With a single operand the overlay is a self-union: the geometry is
/// noded against itself and dissolved.
///
/// # Examples
///
/// ```
/// use geolis_overlay::geometry::{Geometry, Polygon};
/// use geolis_overlay::operations::overlay::{OverlayNg, OverlayOp};
///
/// let a = Geometry::Polygon(Polygon::rect(0.0, 0.0, 10.0, 10.0));
/// let b = Geometry::Polygon(Polygon::rect(5.0, 5.0, 15.0, 15.0));
/// let result = OverlayNg::new(&a, &b, OverlayOp::Intersection).result().unwrap();
/// assert_eq!(result.area(), 25.0);
/// ```
#[derive(Debug, Clone)]
pub struct OverlayNg<'a> {
    a: &'a Geometry,
    b: Option<&'a Geometry>,
    op: OverlayOp,
    pm: PrecisionModel,
    noder: Option<Noder>,
    strict: bool,
    area_result_only: bool,
    validate_noding: bool,
    check_area: bool,
}

impl<'a> OverlayNg<'a> {
    /// Creates an overlay of `a` and `b` in floating precision.
    #[must_use]
    pub fn new(a: &'a Geometry, b: &'a Geometry, op: OverlayOp) -> Self {
        Self::with_operands(a, Some(b), op)
    }

    /// Creates a self-union of `a`.
    #[must_use]
    pub fn unary(a: &'a Geometry) -> Self {
        Self::with_operands(a, None, OverlayOp::Union)
    }

    fn with_operands(a: &'a Geometry, b: Option<&'a Geometry>, op: OverlayOp) -> Self {
        let config = OverlayConfig::default();
        Self {
            a,
            b,
            op,
            pm: PrecisionModel::Floating,
            noder: None,
            strict: config.strict_mode,
            area_result_only: config.area_result_only,
            validate_noding: config.validate_floating_noding,
            check_area: config.check_area_consistency,
        }
    }

    /// Applies the result flags and checks of `config`.
    #[must_use]
    pub fn with_config(mut self, config: &OverlayConfig) -> Self {
        self.strict = config.strict_mode;
        self.area_result_only = config.area_result_only;
        self.validate_noding = config.validate_floating_noding;
        self.check_area = config.check_area_consistency;
        self
    }

    /// Sets the precision model of the result. A fixed model implies
    /// snap-rounding unless a noder is given explicitly.
    #[must_use]
    pub fn with_precision(mut self, pm: PrecisionModel) -> Self {
        self.pm = pm;
        self
    }

    /// Overrides the noder implied by the precision model.
    #[must_use]
    pub fn with_noder(mut self, noder: Noder) -> Self {
        self.noder = Some(noder);
        self
    }

    /// In strict mode collapsed lines and lower-dimension intersection
    /// components are left out of the result.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Emits only the areal part of the result.
    #[must_use]
    pub fn area_result_only(mut self, area_only: bool) -> Self {
        self.area_result_only = area_only;
        self
    }

    /// A copy of these settings applied to other operands.
    fn derive<'b>(&self, a: &'b Geometry, b: Option<&'b Geometry>, op: OverlayOp) -> OverlayNg<'b> {
        OverlayNg {
            a,
            b,
            op,
            pm: self.pm,
            noder: self.noder,
            strict: self.strict,
            area_result_only: self.area_result_only,
            validate_noding: self.validate_noding,
            check_area: self.check_area,
        }
    }

    fn noder(&self) -> Noder {
        self.noder
            .unwrap_or_else(|| Noder::for_precision(&self.pm, self.validate_noding))
    }

    /// Computes the overlay.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::Geometry`] for non-finite coordinates, open
    /// rings or mixed-dimension collections, and
    /// [`OverlayError::Topology`] when the noder cannot produce a
    /// consistent subdivision.
    #[instrument(skip_all, fields(op = ?self.op, noder = ?self.noder()))]
    pub fn result(&self) -> Result<Geometry> {
        self.a.validate()?;
        if let Some(b) = self.b {
            b.validate()?;
        }
        let input = InputGeometry::new(self.a, self.b)?;

        if is_empty_result(self.op, self.a, self.b, &self.pm) {
            debug!("empty result by envelope test");
            return Ok(create_empty_result(self.op, self.a, self.b));
        }

        match self.b {
            Some(b) if input.is_all_points() => Ok(overlay_points(self.op, self.a, b, &self.pm)),
            Some(b) if input.has_points() => overlay_mixed_points(self.op, self.a, b, &self.pm, |g| {
                self.derive(g, None, OverlayOp::Union).result()
            }),
            None if input.has_points() => Ok(overlay_points(
                OverlayOp::Union,
                self.a,
                &Geometry::empty(Some(Dimension::Point)),
                &self.pm,
            )),
            _ => self.compute_edge_overlay(input),
        }
    }

    fn compute_edge_overlay(&self, mut input: InputGeometry<'_>) -> Result<Geometry> {
        let noder = self.noder();
        let noded = node_edges(self.a, self.b, &noder)?;
        input.set_collapsed(0, !noded.has_edges[0]);
        input.set_collapsed(1, !noded.has_edges[1]);

        let mut graph = OverlayGraph::new(
            noded
                .edges
                .into_iter()
                .map(|e| {
                    let label = e.create_label();
                    (e.into_coords(), label)
                })
                .collect(),
        );
        debug!(
            edges = graph.edge_count(),
            nodes = graph.node_edges().len(),
            "overlay graph"
        );

        let mut labeller = OverlayLabeller::new(&mut graph, &input);
        labeller.compute_labelling()?;
        labeller.mark_result_area_edges(self.op);
        labeller.unmark_duplicate_edges_from_result_area();

        let result = self.extract_result(&mut graph, &input)?;

        let floating = matches!(noder, Noder::Floating { .. });
        if floating && self.check_area && !is_result_area_consistent(self.op, self.a, self.b, &result) {
            return Err(TopologyError::InconsistentArea.into());
        }
        Ok(result)
    }

    fn extract_result(&self, graph: &mut OverlayGraph, input: &InputGeometry<'_>) -> Result<Geometry> {
        let allow_mixed = !self.strict;

        let polygons = build_polygons(graph)?;
        let has_result_area = !polygons.is_empty();

        let allow_lines = !has_result_area
            || allow_mixed
            || matches!(self.op, OverlayOp::Union | OverlayOp::SymDifference);
        let lines = if allow_lines && !self.area_result_only {
            LineBuilder::new(self.op, has_result_area, input.area_index(), self.strict).build(graph)
        } else {
            Vec::new()
        };

        let has_components = has_result_area || !lines.is_empty();
        let points = if self.op == OverlayOp::Intersection
            && (!has_components || allow_mixed)
            && !self.area_result_only
        {
            build_intersection_points(graph, self.strict)
        } else {
            Vec::new()
        };

        debug!(
            polygons = polygons.len(),
            lines = lines.len(),
            points = points.len(),
            "overlay result"
        );
        Ok(Geometry::from_components(polygons, lines, points)
            .unwrap_or_else(|| create_empty_result(self.op, self.a, self.b)))
    }

    /// The noded and merged linework of the operands, without labelling.
    ///
    /// # Errors
    ///
    /// Returns an error if the inputs are invalid or noding fails.
    pub fn noded_edges(&self) -> Result<Geometry> {
        self.a.validate()?;
        if let Some(b) = self.b {
            b.validate()?;
        }
        let noded = node_edges(self.a, self.b, &self.noder())?;
        Ok(Geometry::MultiLineString(
            noded
                .edges
                .into_iter()
                .map(|e| LineString::new(e.into_coords()))
                .collect(),
        ))
    }
}

/// Overlays two geometries in floating precision.
///
/// # Errors
///
/// See [`OverlayNg::result`].
pub fn overlay(a: &Geometry, b: &Geometry, op: OverlayOp) -> Result<Geometry> {
    OverlayNg::new(a, b, op).result()
}

/// Overlays two geometries with the given precision model.
///
/// # Errors
///
/// See [`OverlayNg::result`].
pub fn overlay_with(a: &Geometry, b: &Geometry, op: OverlayOp, pm: PrecisionModel) -> Result<Geometry> {
    OverlayNg::new(a, b, op).with_precision(pm).result()
}

/// Rounds a geometry onto the grid of `pm`, dissolving any parts that
/// collapse or come to overlap.
///
/// # Errors
///
/// Returns [`OperationError::Failed`] when the rounded linework cannot be
/// assembled, which indicates an invalid input.
pub fn reduce_precision(g: &Geometry, pm: PrecisionModel) -> Result<Geometry> {
    let area_only = g.dimension() == Some(Dimension::Area);
    OverlayNg::unary(g)
        .with_precision(pm)
        .area_result_only(area_only)
        .result()
        .map_err(|err| match err {
            OverlayError::Topology(e) => {
                OperationError::Failed(format!("precision reduction failed, possible invalid input: {e}")).into()
            }
            other => other,
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::geometry::Polygon;
    use crate::math::coord;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Geometry {
        Geometry::Polygon(Polygon::rect(x0, y0, x1, y1))
    }

    #[test]
    fn overlapping_squares() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(5.0, 5.0, 15.0, 15.0);
        let inter = overlay(&a, &b, OverlayOp::Intersection).unwrap();
        assert!(matches!(inter, Geometry::Polygon(_)));
        assert_relative_eq!(inter.area(), 25.0);
        assert_eq!(inter.normalized(), rect(5.0, 5.0, 10.0, 10.0).normalized());

        let union = overlay(&a, &b, OverlayOp::Union).unwrap();
        assert_relative_eq!(union.area(), 175.0);
        let diff = overlay(&a, &b, OverlayOp::Difference).unwrap();
        assert_relative_eq!(diff.area(), 75.0);
        let sym = overlay(&a, &b, OverlayOp::SymDifference).unwrap();
        assert!(matches!(sym, Geometry::MultiPolygon(ref ps) if ps.len() == 2));
        assert_relative_eq!(sym.area(), 150.0);
    }

    #[test]
    fn line_clipped_by_polygon() {
        let square = rect(0.0, 0.0, 10.0, 10.0);
        let line = Geometry::LineString(LineString::from_xy(&[(-5.0, 5.0), (15.0, 5.0)]));
        let inter = overlay(&line, &square, OverlayOp::Intersection).unwrap();
        assert_eq!(
            inter,
            Geometry::LineString(LineString::from_xy(&[(0.0, 5.0), (10.0, 5.0)]))
        );
        let outside = overlay(&line, &square, OverlayOp::Difference).unwrap();
        assert!(matches!(outside, Geometry::MultiLineString(ref ls) if ls.len() == 2));
        assert_relative_eq!(outside.length(), 10.0);
    }

    #[test]
    fn touching_squares_intersect_in_a_line() {
        let a = rect(0.0, 0.0, 1.0, 1.0);
        let b = rect(1.0, 0.0, 2.0, 1.0);
        let inter = overlay(&a, &b, OverlayOp::Intersection).unwrap();
        assert_eq!(inter.dimension(), Some(Dimension::Line));
        assert_relative_eq!(inter.length(), 1.0);
    }

    #[test]
    fn crossing_lines_meet_at_a_point() {
        let a = Geometry::LineString(LineString::from_xy(&[(0.0, 0.0), (2.0, 2.0)]));
        let b = Geometry::LineString(LineString::from_xy(&[(0.0, 2.0), (2.0, 0.0)]));
        let inter = overlay(&a, &b, OverlayOp::Intersection).unwrap();
        assert_eq!(inter, Geometry::Point(coord(1.0, 1.0)));
        let union = overlay(&a, &b, OverlayOp::Union).unwrap();
        assert!(matches!(union, Geometry::MultiLineString(ref ls) if ls.len() == 4));
    }

    #[test]
    fn disjoint_intersection_is_typed_empty() {
        let a = rect(0.0, 0.0, 1.0, 1.0);
        let b = rect(5.0, 5.0, 6.0, 6.0);
        let inter = overlay(&a, &b, OverlayOp::Intersection).unwrap();
        assert!(inter.is_empty());
        assert_eq!(inter.dimension(), Some(Dimension::Area));
    }

    #[test]
    fn unary_union_dissolves_shared_edge() {
        let g = Geometry::MultiPolygon(vec![
            Polygon::rect(0.0, 0.0, 1.0, 1.0),
            Polygon::rect(1.0, 0.0, 2.0, 1.0),
        ]);
        let union = OverlayNg::unary(&g).result().unwrap();
        assert!(matches!(union, Geometry::Polygon(_)));
        assert_relative_eq!(union.area(), 2.0);
    }

    #[test]
    fn noded_edges_split_at_crossings() {
        let a = Geometry::LineString(LineString::from_xy(&[(0.0, 0.0), (2.0, 2.0)]));
        let b = Geometry::LineString(LineString::from_xy(&[(0.0, 2.0), (2.0, 0.0)]));
        let edges = OverlayNg::new(&a, &b, OverlayOp::Union).noded_edges().unwrap();
        assert!(matches!(edges, Geometry::MultiLineString(ref ls) if ls.len() == 4));
    }

    #[test]
    fn fixed_precision_rounds_result() {
        let a = rect(0.0, 0.0, 10.2, 10.2);
        let b = rect(5.4, 5.4, 15.0, 15.0);
        let inter = overlay_with(&a, &b, OverlayOp::Intersection, PrecisionModel::fixed(1.0)).unwrap();
        assert_relative_eq!(inter.area(), 25.0);
        assert!(inter.coords().iter().all(|c| c.x.fract() == 0.0 && c.y.fract() == 0.0));
    }

    #[test]
    fn reduce_precision_removes_sliver() {
        let g = Geometry::Polygon(Polygon::new(
            LineString::from_xy(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.1), (10.0, 0.0), (0.0, 0.0)]),
            Vec::new(),
        ));
        let reduced = reduce_precision(&g, PrecisionModel::fixed(1.0)).unwrap();
        assert_relative_eq!(reduced.area(), 100.0);
        assert_eq!(reduced.num_points(), 5);
    }

    #[test]
    fn collapsed_polygon_reduces_to_empty_area() {
        let g = rect(0.0, 0.0, 0.2, 0.2);
        let reduced = reduce_precision(&g, PrecisionModel::fixed(1.0)).unwrap();
        assert!(reduced.is_empty());
        assert_eq!(reduced.dimension(), Some(Dimension::Area));
    }

    #[test]
    fn invalid_coordinates_are_rejected() {
        let a = Geometry::Point(coord(f64::NAN, 0.0));
        let b = rect(0.0, 0.0, 1.0, 1.0);
        let err = overlay(&a, &b, OverlayOp::Union).unwrap_err();
        assert!(!err.is_topology());
    }
}
