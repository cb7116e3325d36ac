use crate::error::GeometryError;
use crate::geometry::{Dimension, Geometry};
use crate::math::polygon_2d::Location;
use crate::math::Coord;

use super::locate::{AreaLocator, PointLocator};

/// The one or two operands of an overlay, with point-in-area locators
/// for the areal ones.
#[derive(Debug)]
pub(crate) struct InputGeometry<'a> {
    geoms: [Option<&'a Geometry>; 2],
    locators: [Option<AreaLocator>; 2],
    collapsed: [bool; 2],
}

impl<'a> InputGeometry<'a> {
    /// Wraps the operands, rejecting collections that mix dimensions.
    pub(crate) fn new(a: &'a Geometry, b: Option<&'a Geometry>) -> Result<Self, GeometryError> {
        for g in std::iter::once(a).chain(b) {
            check_homogeneous(g)?;
        }
        let locator = |g: Option<&Geometry>| {
            g.filter(|g| g.dimension() == Some(Dimension::Area))
                .map(AreaLocator::new)
        };
        Ok(Self {
            geoms: [Some(a), b],
            locators: [locator(Some(a)), locator(b)],
            collapsed: [false; 2],
        })
    }

    pub(crate) fn dimension(&self, index: usize) -> Option<Dimension> {
        self.geoms[index].and_then(Geometry::dimension)
    }

    pub(crate) fn is_area(&self, index: usize) -> bool {
        self.dimension(index) == Some(Dimension::Area)
    }

    pub(crate) fn is_line(&self, index: usize) -> bool {
        self.dimension(index) == Some(Dimension::Line)
    }

    /// Index of the first areal operand.
    pub(crate) fn area_index(&self) -> Option<usize> {
        (0..2).find(|&i| self.is_area(i))
    }

    pub(crate) fn is_all_points(&self) -> bool {
        self.dimension(0) == Some(Dimension::Point)
            && self.geoms[1].is_some()
            && self.dimension(1) == Some(Dimension::Point)
    }

    pub(crate) fn has_points(&self) -> bool {
        self.dimension(0) == Some(Dimension::Point) || self.dimension(1) == Some(Dimension::Point)
    }

    /// Whether the operand is present and has coordinates.
    pub(crate) fn has_edges(&self, index: usize) -> bool {
        self.geoms[index].is_some_and(|g| !g.is_empty())
    }

    /// Records that noding removed every edge of an operand.
    pub(crate) fn set_collapsed(&mut self, index: usize, collapsed: bool) {
        self.collapsed[index] = collapsed;
    }

    /// Location of `p` in an areal operand. Collapsed or absent operands
    /// cover nothing.
    pub(crate) fn locate_point_in_area(&self, index: usize, p: &Coord) -> Location {
        if self.collapsed[index] {
            return Location::Exterior;
        }
        self.locators[index]
            .as_ref()
            .map_or(Location::Exterior, |loc| loc.locate(p))
    }
}

fn check_homogeneous(g: &Geometry) -> Result<(), GeometryError> {
    if let Geometry::GeometryCollection(parts) = g {
        let mut dims = parts.iter().filter(|p| !p.is_empty()).filter_map(Geometry::dimension);
        if let Some(first) = dims.next() {
            if dims.any(|d| d != first) {
                return Err(GeometryError::MixedDimension);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{LineString, Polygon};
    use crate::math::coord;

    #[test]
    fn mixed_collection_is_rejected() {
        let g = Geometry::GeometryCollection(vec![
            Geometry::Polygon(Polygon::rect(0.0, 0.0, 1.0, 1.0)),
            Geometry::LineString(LineString::from_xy(&[(0.0, 0.0), (1.0, 1.0)])),
        ]);
        assert!(matches!(
            InputGeometry::new(&g, None),
            Err(GeometryError::MixedDimension)
        ));
    }

    #[test]
    fn collapsed_operand_covers_nothing() {
        let a = Geometry::Polygon(Polygon::rect(0.0, 0.0, 2.0, 2.0));
        let b = Geometry::Point(coord(1.0, 1.0));
        let mut input = InputGeometry::new(&a, Some(&b)).unwrap_or_else(|e| panic!("{e}"));
        assert!(input.has_points());
        assert!(!input.is_all_points());
        assert_eq!(input.area_index(), Some(0));
        assert_eq!(input.locate_point_in_area(0, &coord(1.0, 1.0)), Location::Interior);
        input.set_collapsed(0, true);
        assert_eq!(input.locate_point_in_area(0, &coord(1.0, 1.0)), Location::Exterior);
        assert_eq!(input.locate_point_in_area(1, &coord(1.0, 1.0)), Location::Exterior);
    }
}
