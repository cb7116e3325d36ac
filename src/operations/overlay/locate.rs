//! Point locators used to classify graph components that are not
//! connected to any area boundary, and points in mixed overlays.

use crate::geometry::{Envelope, Geometry};
use crate::index::{StrTree, DEFAULT_NODE_CAPACITY};
use crate::math::intersect_2d::point_on_segment;
use crate::math::polygon_2d::{Location, RayCrossingCounter};
use crate::math::Coord;

/// Locates points relative to a geometry.
pub trait PointLocator {
    fn locate(&self, p: &Coord) -> Location;
}

/// Point-in-area locator over all polygon rings of a geometry.
///
/// Ring segments go into a bounding-box tree at construction; queries only
/// read it, so a locator can be shared across threads once built.
#[derive(Debug, Clone)]
pub struct AreaLocator {
    segments: StrTree<(Coord, Coord)>,
}

impl AreaLocator {
    #[must_use]
    pub fn new(geom: &Geometry) -> Self {
        let mut items = Vec::new();
        for poly in geom.polygons() {
            for ring in poly.rings() {
                for w in ring.coords().windows(2) {
                    items.push((Envelope::from_points(&w[0], &w[1]), (w[0], w[1])));
                }
            }
        }
        Self {
            segments: StrTree::new(DEFAULT_NODE_CAPACITY, items),
        }
    }
}

impl PointLocator for AreaLocator {
    fn locate(&self, p: &Coord) -> Location {
        let mut counter = RayCrossingCounter::new(*p);
        // Only segments reaching the rightward ray can be crossed.
        let ray = Envelope {
            min_x: p.x,
            min_y: p.y,
            max_x: f64::INFINITY,
            max_y: p.y,
        };
        self.segments
            .query_with(&ray, |_, (p0, p1)| counter.count_segment(p0, p1));
        counter.location()
    }
}

/// Locates points on the linear components of a geometry. Points on a
/// line are reported as interior; endpoints are not distinguished.
#[derive(Debug, Clone)]
pub struct LineLocator {
    segments: StrTree<(Coord, Coord)>,
}

impl LineLocator {
    #[must_use]
    pub fn new(geom: &Geometry) -> Self {
        let mut items = Vec::new();
        for line in geom.line_strings() {
            for w in line.coords().windows(2) {
                items.push((Envelope::from_points(&w[0], &w[1]), (w[0], w[1])));
            }
        }
        Self {
            segments: StrTree::new(DEFAULT_NODE_CAPACITY, items),
        }
    }
}

impl PointLocator for LineLocator {
    fn locate(&self, p: &Coord) -> Location {
        let probe = Envelope::from_points(p, p);
        let mut on_line = false;
        self.segments.query_with(&probe, |_, (p0, p1)| {
            on_line |= point_on_segment(p, p0, p1);
        });
        if on_line {
            Location::Interior
        } else {
            Location::Exterior
        }
    }
}
