pub mod envelope;
pub mod precision;

use std::cmp::Ordering;

use crate::error::GeometryError;
use crate::math::distance_2d::distance;
use crate::math::polygon_2d::{is_ccw, rotate_to_canonical_start, signed_area_2d};
use crate::math::{compare_xy, Coord};

pub use envelope::Envelope;
pub use precision::PrecisionModel;

/// Topological dimension of a geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    Point = 0,
    Line = 1,
    Area = 2,
}

/// An ordered sequence of coordinates. A closed line string (first point
/// equal to last) with at least four points is a ring.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineString(pub Vec<Coord>);

impl LineString {
    #[must_use]
    pub fn new(coords: Vec<Coord>) -> Self {
        Self(coords)
    }

    /// Builds a line string from `(x, y)` pairs.
    #[must_use]
    pub fn from_xy(pairs: &[(f64, f64)]) -> Self {
        Self(pairs.iter().map(|&(x, y)| Coord::new(x, y)).collect())
    }

    #[must_use]
    pub fn coords(&self) -> &[Coord] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        !self.0.is_empty() && self.0.first() == self.0.last()
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.0.windows(2).map(|w| distance(&w[0], &w[1])).sum()
    }

    #[must_use]
    pub fn envelope(&self) -> Envelope {
        Envelope::from_coords(&self.0)
    }

    /// Orients the line so that it reads from the smaller end.
    fn normalize(&mut self) {
        let n = self.0.len();
        for i in 0..n / 2 {
            match compare_xy(&self.0[i], &self.0[n - 1 - i]) {
                Ordering::Less => return,
                Ordering::Greater => {
                    self.0.reverse();
                    return;
                }
                Ordering::Equal => {}
            }
        }
    }

    /// Rotates a ring to its smallest vertex and orients it.
    fn normalize_ring(&mut self, clockwise: bool) {
        if self.0.len() < 4 || !self.is_closed() {
            return;
        }
        let mut ring = rotate_to_canonical_start(&self.0);
        if is_ccw(&ring) == clockwise {
            ring.reverse();
        }
        self.0 = ring;
    }
}

/// A polygon: one exterior ring and zero or more interior rings (holes).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    exterior: LineString,
    interiors: Vec<LineString>,
}

impl Polygon {
    #[must_use]
    pub fn new(exterior: LineString, interiors: Vec<LineString>) -> Self {
        Self {
            exterior,
            interiors,
        }
    }

    /// An empty polygon.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Axis-aligned rectangle.
    #[must_use]
    pub fn rect(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self::new(
            LineString::from_xy(&[
                (min_x, min_y),
                (max_x, min_y),
                (max_x, max_y),
                (min_x, max_y),
                (min_x, min_y),
            ]),
            Vec::new(),
        )
    }

    #[must_use]
    pub fn exterior(&self) -> &LineString {
        &self.exterior
    }

    #[must_use]
    pub fn interiors(&self) -> &[LineString] {
        &self.interiors
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exterior.is_empty()
    }

    /// Exterior ring followed by the holes.
    pub fn rings(&self) -> impl Iterator<Item = &LineString> {
        std::iter::once(&self.exterior).chain(self.interiors.iter())
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        let shell = signed_area_2d(self.exterior.coords()).abs();
        let holes: f64 = self
            .interiors
            .iter()
            .map(|h| signed_area_2d(h.coords()).abs())
            .sum();
        shell - holes
    }

    #[must_use]
    pub fn envelope(&self) -> Envelope {
        self.exterior.envelope()
    }

    fn normalize(&mut self) {
        self.exterior.normalize_ring(true);
        for hole in &mut self.interiors {
            hole.normalize_ring(false);
        }
        self.interiors
            .sort_by(|a, b| compare_coord_seq(a.coords(), b.coords()));
    }
}

/// A planar geometry value.
///
/// Empty geometries of point dimension are represented as an empty
/// [`Geometry::MultiPoint`].
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Coord),
    LineString(LineString),
    Polygon(Polygon),
    MultiPoint(Vec<Coord>),
    MultiLineString(Vec<LineString>),
    MultiPolygon(Vec<Polygon>),
    GeometryCollection(Vec<Geometry>),
}

impl From<Polygon> for Geometry {
    fn from(p: Polygon) -> Self {
        Self::Polygon(p)
    }
}

impl From<LineString> for Geometry {
    fn from(l: LineString) -> Self {
        Self::LineString(l)
    }
}

impl From<Coord> for Geometry {
    fn from(c: Coord) -> Self {
        Self::Point(c)
    }
}

impl Geometry {
    /// An empty geometry of the given dimension; `None` gives an empty
    /// collection.
    #[must_use]
    pub fn empty(dim: Option<Dimension>) -> Self {
        match dim {
            Some(Dimension::Point) => Self::MultiPoint(Vec::new()),
            Some(Dimension::Line) => Self::LineString(LineString::default()),
            Some(Dimension::Area) => Self::Polygon(Polygon::empty()),
            None => Self::GeometryCollection(Vec::new()),
        }
    }

    /// Assembles components into the least general geometry that holds them
    /// all. Returns `None` when there are no components.
    #[must_use]
    pub fn from_components(
        mut polygons: Vec<Polygon>,
        mut lines: Vec<LineString>,
        mut points: Vec<Coord>,
    ) -> Option<Self> {
        let kinds = usize::from(!polygons.is_empty())
            + usize::from(!lines.is_empty())
            + usize::from(!points.is_empty());
        match kinds {
            0 => None,
            1 if !polygons.is_empty() => Some(if polygons.len() == 1 {
                Self::Polygon(polygons.remove(0))
            } else {
                Self::MultiPolygon(polygons)
            }),
            1 if !lines.is_empty() => Some(if lines.len() == 1 {
                Self::LineString(lines.remove(0))
            } else {
                Self::MultiLineString(lines)
            }),
            1 => Some(if points.len() == 1 {
                Self::Point(points.remove(0))
            } else {
                Self::MultiPoint(points)
            }),
            _ => {
                let mut parts: Vec<Geometry> = Vec::new();
                parts.extend(polygons.into_iter().map(Self::Polygon));
                parts.extend(lines.into_iter().map(Self::LineString));
                parts.extend(points.into_iter().map(Self::Point));
                Some(Self::GeometryCollection(parts))
            }
        }
    }

    /// Topological dimension; `None` for an empty collection.
    #[must_use]
    pub fn dimension(&self) -> Option<Dimension> {
        match self {
            Self::Point(_) | Self::MultiPoint(_) => Some(Dimension::Point),
            Self::LineString(_) | Self::MultiLineString(_) => Some(Dimension::Line),
            Self::Polygon(_) | Self::MultiPolygon(_) => Some(Dimension::Area),
            Self::GeometryCollection(parts) => parts.iter().filter_map(Self::dimension).max(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Point(_) => false,
            Self::LineString(l) => l.is_empty(),
            Self::Polygon(p) => p.is_empty(),
            Self::MultiPoint(pts) => pts.is_empty(),
            Self::MultiLineString(ls) => ls.iter().all(LineString::is_empty),
            Self::MultiPolygon(ps) => ps.iter().all(Polygon::is_empty),
            Self::GeometryCollection(parts) => parts.iter().all(Self::is_empty),
        }
    }

    /// Every coordinate of the geometry, in component order.
    #[must_use]
    pub fn coords(&self) -> Vec<Coord> {
        let mut out = Vec::new();
        self.collect_coords(&mut out);
        out
    }

    fn collect_coords(&self, out: &mut Vec<Coord>) {
        match self {
            Self::Point(c) => out.push(*c),
            Self::LineString(l) => out.extend_from_slice(l.coords()),
            Self::Polygon(p) => p.rings().for_each(|r| out.extend_from_slice(r.coords())),
            Self::MultiPoint(pts) => out.extend_from_slice(pts),
            Self::MultiLineString(ls) => ls.iter().for_each(|l| out.extend_from_slice(l.coords())),
            Self::MultiPolygon(ps) => ps
                .iter()
                .flat_map(Polygon::rings)
                .for_each(|r| out.extend_from_slice(r.coords())),
            Self::GeometryCollection(parts) => parts.iter().for_each(|g| g.collect_coords(out)),
        }
    }

    #[must_use]
    pub fn num_points(&self) -> usize {
        self.coords().len()
    }

    #[must_use]
    pub fn envelope(&self) -> Envelope {
        match self {
            Self::Polygon(p) => p.envelope(),
            Self::LineString(l) => l.envelope(),
            _ => Envelope::from_coords(&self.coords()),
        }
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.polygons().iter().map(|p| p.area()).sum()
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        let lines: f64 = self.line_strings().iter().map(|l| l.length()).sum();
        let rings: f64 = self
            .polygons()
            .iter()
            .flat_map(|p| p.rings())
            .map(LineString::length)
            .sum();
        lines + rings
    }

    /// All polygon components, flattening collections.
    #[must_use]
    pub fn polygons(&self) -> Vec<&Polygon> {
        let mut out = Vec::new();
        self.visit(&mut |g| match g {
            Self::Polygon(p) if !p.is_empty() => out.push(p),
            Self::MultiPolygon(ps) => out.extend(ps.iter().filter(|p| !p.is_empty())),
            _ => {}
        });
        out
    }

    /// All line string components, flattening collections.
    #[must_use]
    pub fn line_strings(&self) -> Vec<&LineString> {
        let mut out = Vec::new();
        self.visit(&mut |g| match g {
            Self::LineString(l) if !l.is_empty() => out.push(l),
            Self::MultiLineString(ls) => out.extend(ls.iter().filter(|l| !l.is_empty())),
            _ => {}
        });
        out
    }

    /// All point components, flattening collections.
    #[must_use]
    pub fn points(&self) -> Vec<Coord> {
        let mut out = Vec::new();
        self.visit(&mut |g| match g {
            Self::Point(c) => out.push(*c),
            Self::MultiPoint(pts) => out.extend_from_slice(pts),
            _ => {}
        });
        out
    }

    fn visit<'a>(&'a self, f: &mut impl FnMut(&'a Geometry)) {
        if let Self::GeometryCollection(parts) = self {
            for part in parts {
                part.visit(f);
            }
        } else {
            f(self);
        }
    }

    /// Checks that every ordinate is finite and every ring is closed.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NonFinite`] or
    /// [`GeometryError::RingNotClosed`].
    pub fn validate(&self) -> Result<(), GeometryError> {
        if let Some(c) = self.coords().iter().find(|c| !c.x.is_finite() || !c.y.is_finite()) {
            return Err(GeometryError::NonFinite { x: c.x, y: c.y });
        }
        for poly in self.polygons() {
            for ring in poly.rings() {
                if !ring.is_closed() {
                    let first = ring.coords()[0];
                    let last = ring.coords()[ring.coords().len() - 1];
                    return Err(GeometryError::RingNotClosed {
                        x0: first.x,
                        y0: first.y,
                        x1: last.x,
                        y1: last.y,
                    });
                }
            }
        }
        Ok(())
    }

    /// Canonical form: shells clockwise, holes counter-clockwise, rings
    /// starting at their smallest vertex, lines read from their smaller
    /// end, and components of collections sorted.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut g = self.clone();
        g.normalize();
        g
    }

    fn normalize(&mut self) {
        match self {
            Self::Point(_) => {}
            Self::LineString(l) => l.normalize(),
            Self::Polygon(p) => p.normalize(),
            Self::MultiPoint(pts) => pts.sort_by(compare_xy),
            Self::MultiLineString(ls) => {
                ls.iter_mut().for_each(LineString::normalize);
                ls.sort_by(|a, b| compare_coord_seq(a.coords(), b.coords()));
            }
            Self::MultiPolygon(ps) => {
                ps.iter_mut().for_each(Polygon::normalize);
                ps.sort_by(compare_polygons);
            }
            Self::GeometryCollection(parts) => {
                parts.iter_mut().for_each(Self::normalize);
                parts.sort_by(|a, b| {
                    a.dimension()
                        .cmp(&b.dimension())
                        .then_with(|| compare_coord_seq(&a.coords(), &b.coords()))
                });
            }
        }
    }
}

fn compare_coord_seq(a: &[Coord], b: &[Coord]) -> Ordering {
    for (p, q) in a.iter().zip(b) {
        let ord = compare_xy(p, q);
        if ord.is_ne() {
            return ord;
        }
    }
    a.len().cmp(&b.len())
}

fn compare_polygons(a: &Polygon, b: &Polygon) -> Ordering {
    compare_coord_seq(a.exterior().coords(), b.exterior().coords()).then_with(|| {
        for (h, k) in a.interiors().iter().zip(b.interiors()) {
            let ord = compare_coord_seq(h.coords(), k.coords());
            if ord.is_ne() {
                return ord;
            }
        }
        a.interiors().len().cmp(&b.interiors().len())
    })
}
