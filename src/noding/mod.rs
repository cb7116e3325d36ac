//! Noders: split a set of segment strings at all their mutual
//! intersections.

pub mod intersector;
pub mod mc_noder;
pub mod segment_string;
pub mod snap;
pub mod snap_round;
pub mod validate;

use tracing::debug;

use crate::error::TopologyError;
use crate::geometry::PrecisionModel;
use crate::math::Coord;

pub use intersector::{IntersectionAdder, SegmentIntersector};
pub use mc_noder::McIndex;
pub use segment_string::{NodeList, SegmentNode, SegmentString};

/// Noding strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Noder {
    /// Exact floating-point noding, optionally checked for missed
    /// intersections.
    Floating { validate: bool },
    /// Snap vertices and intersections within `tolerance`.
    Snapping { tolerance: f64 },
    /// Snap-round onto the grid of a fixed precision model.
    SnapRounding { pm: PrecisionModel },
}

impl Noder {
    /// The noder a precision model implies when no override is given:
    /// floating precision nodes exactly (validated), fixed precision
    /// snap-rounds.
    #[must_use]
    pub fn for_precision(pm: &PrecisionModel, validate: bool) -> Self {
        if pm.is_floating() {
            Self::Floating { validate }
        } else {
            Self::SnapRounding { pm: *pm }
        }
    }

    /// Nodes `strings`, returning the split pieces with their data.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::NonNodedIntersection`] when floating noding
    /// with validation leaves an intersection unnoded.
    pub fn node<D: Clone>(
        &self,
        strings: &[SegmentString<D>],
    ) -> Result<Vec<SegmentString<D>>, TopologyError> {
        match self {
            Self::Floating { validate } => {
                let noded = node_floating(strings);
                if *validate {
                    let pts: Vec<Vec<Coord>> = noded.iter().map(|s| s.pts.clone()).collect();
                    validate::check_noding(&pts)?;
                }
                Ok(noded)
            }
            Self::Snapping { tolerance } => Ok(snap::node_snapping(strings, *tolerance)),
            Self::SnapRounding { pm } => Ok(snap_round::node_snap_rounding(strings, pm)),
        }
    }
}

/// Nodes with exact floating-point intersection points.
#[must_use]
pub fn node_floating<D: Clone>(strings: &[SegmentString<D>]) -> Vec<SegmentString<D>> {
    let input: Vec<Vec<Coord>> = strings.iter().map(|s| s.pts.clone()).collect();
    let mut adder = IntersectionAdder::new(input.len());
    McIndex::new(&input, 0.0).compute_overlaps(&mut adder);

    let interior = adder.interior_intersections;
    let mut out = Vec::new();
    for ((pts, nodes), ss) in input.iter().zip(adder.nodes).zip(strings) {
        for piece in nodes.split(pts) {
            out.push(SegmentString::new(piece, ss.data.clone()));
        }
    }
    debug!(
        input = strings.len(),
        output = out.len(),
        interior_intersections = interior,
        "floating noder"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::coord;

    fn square(x: f64, y: f64, size: f64, tag: u8) -> SegmentString<u8> {
        SegmentString::new(
            vec![
                coord(x, y),
                coord(x + size, y),
                coord(x + size, y + size),
                coord(x, y + size),
                coord(x, y),
            ],
            tag,
        )
    }

    #[test]
    fn overlapping_squares_are_noded_by_every_strategy() {
        let input = vec![square(0.0, 0.0, 2.0, 0), square(1.0, 1.0, 2.0, 1)];
        for noder in [
            Noder::Floating { validate: true },
            Noder::Snapping { tolerance: 1e-9 },
            Noder::SnapRounding {
                pm: PrecisionModel::fixed(1.0),
            },
        ] {
            let Ok(noded) = noder.node(&input) else {
                panic!("noding failed for {noder:?}");
            };
            // Each ring is cut at the two crossings and at its start vertex.
            let pieces_a = noded.iter().filter(|s| s.data == 0).count();
            let pieces_b = noded.iter().filter(|s| s.data == 1).count();
            assert_eq!(pieces_a, 3, "{noder:?}");
            assert_eq!(pieces_b, 3, "{noder:?}");
            let pts: Vec<Vec<Coord>> = noded.iter().map(|s| s.pts.clone()).collect();
            assert!(validate::check_noding(&pts).is_ok(), "{noder:?}");
        }
    }

    #[test]
    fn disjoint_strings_pass_through() {
        let input = vec![square(0.0, 0.0, 1.0, 0), square(5.0, 5.0, 1.0, 1)];
        let noded = node_floating(&input);
        assert_eq!(noded.len(), 2);
        assert_eq!(noded[0].pts, input[0].pts);
    }

    #[test]
    fn precision_selects_noder() {
        assert_eq!(
            Noder::for_precision(&PrecisionModel::Floating, true),
            Noder::Floating { validate: true }
        );
        assert!(matches!(
            Noder::for_precision(&PrecisionModel::fixed(10.0), true),
            Noder::SnapRounding { .. }
        ));
    }
}
