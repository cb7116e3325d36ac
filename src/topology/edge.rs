use std::cmp::Ordering;
use std::collections::HashMap;

use crate::error::TopologyError;
use crate::geometry::Dimension;
use crate::math::polygon_2d::Location;
use crate::math::{compare_xy, Coord, CoordKey};

use super::label::OverlayLabel;

/// Origin of a segment string fed to the noder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeSource {
    /// Input index (0 or 1).
    pub index: usize,
    pub dim: Dimension,
    /// `+1` when the input's interior is on the right of the string, `-1`
    /// when on the left, `0` for lines.
    pub depth_delta: i32,
    pub is_hole: bool,
}

impl EdgeSource {
    #[must_use]
    pub fn ring(index: usize, depth_delta: i32, is_hole: bool) -> Self {
        Self {
            index,
            dim: Dimension::Area,
            depth_delta,
            is_hole,
        }
    }

    #[must_use]
    pub fn line(index: usize) -> Self {
        Self {
            index,
            dim: Dimension::Line,
            depth_delta: 0,
            is_hole: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct EdgeInputInfo {
    dim: Option<Dimension>,
    depth_delta: i32,
    is_hole: bool,
}

/// A noded edge, possibly the merge of several coincident edges.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pts: Vec<Coord>,
    info: [EdgeInputInfo; 2],
}

impl Edge {
    #[must_use]
    pub fn new(pts: Vec<Coord>, source: &EdgeSource) -> Self {
        let mut info = [EdgeInputInfo::default(); 2];
        info[source.index] = EdgeInputInfo {
            dim: Some(source.dim),
            depth_delta: source.depth_delta,
            is_hole: source.is_hole,
        };
        Self { pts, info }
    }

    #[must_use]
    pub fn coords(&self) -> &[Coord] {
        &self.pts
    }

    #[must_use]
    pub fn into_coords(self) -> Vec<Coord> {
        self.pts
    }

    #[must_use]
    pub fn depth_delta(&self, index: usize) -> i32 {
        self.info[index].depth_delta
    }

    /// Whether the edge reads from its smaller end.
    ///
    /// # Errors
    ///
    /// Fails for closed two-point edges whose direction is undefined.
    pub fn direction(&self) -> Result<bool, TopologyError> {
        let n = self.pts.len();
        let ord = match compare_xy(&self.pts[0], &self.pts[n - 1]) {
            Ordering::Equal => compare_xy(&self.pts[1], &self.pts[n - 2]),
            ord => ord,
        };
        match ord {
            Ordering::Less => Ok(true),
            Ordering::Greater => Ok(false),
            Ordering::Equal => Err(TopologyError::UndefinedEdgeDirection { at: self.pts[0] }),
        }
    }

    fn is_shell(&self, index: usize) -> bool {
        self.info[index].dim == Some(Dimension::Area) && !self.info[index].is_hole
    }

    /// Folds a coincident edge into this one. Side depths add up (negated
    /// if the other edge runs the opposite way) and dimensions take the
    /// maximum.
    pub fn merge(&mut self, other: &Edge) {
        let same_dir = self.pts[0] == other.pts[0] && self.pts[1] == other.pts[1];
        let flip = if same_dir { 1 } else { -1 };
        for i in 0..2 {
            let is_hole = !(self.is_shell(i) || other.is_shell(i));
            let mine = &mut self.info[i];
            mine.is_hole = is_hole;
            mine.dim = mine.dim.max(other.info[i].dim);
            mine.depth_delta += flip * other.info[i].depth_delta;
        }
    }

    /// Builds the label implied by the merged source information.
    #[must_use]
    pub fn create_label(&self) -> OverlayLabel {
        let mut lbl = OverlayLabel::new();
        for (i, info) in self.info.iter().enumerate() {
            match info.dim {
                None | Some(Dimension::Point) => lbl.init_not_part(i),
                Some(Dimension::Line) => lbl.init_line(i),
                Some(Dimension::Area) => match info.depth_delta.signum() {
                    0 => lbl.init_collapse(i, info.is_hole),
                    1 => lbl.init_boundary(i, Location::Exterior, Location::Interior, info.is_hole),
                    _ => lbl.init_boundary(i, Location::Interior, Location::Exterior, info.is_hole),
                },
            }
        }
        lbl
    }
}

/// Merges coincident edges, keyed on their first segment in canonical
/// direction. Output order follows first occurrence.
///
/// # Errors
///
/// Returns a [`TopologyError`] if coincident edges differ in length or an
/// edge has no defined direction, both symptoms of incomplete noding.
pub fn merge_edges(edges: Vec<Edge>) -> Result<Vec<Edge>, TopologyError> {
    let mut merged: Vec<Edge> = Vec::with_capacity(edges.len());
    let mut by_key: HashMap<(CoordKey, CoordKey), usize> = HashMap::new();
    for edge in edges {
        let key = if edge.direction()? {
            (CoordKey::from(&edge.pts[0]), CoordKey::from(&edge.pts[1]))
        } else {
            let n = edge.pts.len();
            (CoordKey::from(&edge.pts[n - 1]), CoordKey::from(&edge.pts[n - 2]))
        };
        if let Some(&base) = by_key.get(&key) {
            if merged[base].pts.len() != edge.pts.len() {
                return Err(TopologyError::EdgeMergeMismatch { at: edge.pts[0] });
            }
            merged[base].merge(&edge);
        } else {
            by_key.insert(key, merged.len());
            merged.push(edge);
        }
    }
    Ok(merged)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::coord;
    use crate::topology::label::Side;

    fn seg(a: (f64, f64), b: (f64, f64), src: EdgeSource) -> Edge {
        Edge::new(vec![coord(a.0, a.1), coord(b.0, b.1)], &src)
    }

    #[test]
    fn shared_boundary_of_adjacent_shells() {
        // Two CW shells sharing the edge x = 1 traverse it in opposite
        // directions; each has its interior on the right.
        let a = seg((1.0, 0.0), (1.0, 1.0), EdgeSource::ring(0, 1, false));
        let b = seg((1.0, 1.0), (1.0, 0.0), EdgeSource::ring(1, 1, false));
        let merged = merge_edges(vec![a, b]).unwrap();
        assert_eq!(merged.len(), 1);
        let lbl = merged[0].create_label();
        assert!(lbl.is_boundary_both());
        assert!(lbl.is_boundary_touch());
        assert_eq!(lbl.location(0, Side::Right, true), Some(Location::Interior));
        assert_eq!(lbl.location(1, Side::Right, true), Some(Location::Exterior));
    }

    #[test]
    fn opposite_edges_of_one_input_collapse() {
        let a = seg((0.0, 0.0), (2.0, 0.0), EdgeSource::ring(0, 1, false));
        let b = seg((2.0, 0.0), (0.0, 0.0), EdgeSource::ring(0, 1, false));
        let merged = merge_edges(vec![a, b]).unwrap();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].depth_delta(0), 0);
        let lbl = merged[0].create_label();
        assert!(lbl.is_collapse(0));
        assert!(!lbl.is_hole(0));
    }

    #[test]
    fn line_and_boundary_merge_keeps_area_dimension() {
        let a = seg((0.0, 0.0), (2.0, 0.0), EdgeSource::ring(0, -1, true));
        let b = seg((0.0, 0.0), (2.0, 0.0), EdgeSource::line(1));
        let merged = merge_edges(vec![a, b]).unwrap();
        let lbl = merged[0].create_label();
        assert!(lbl.is_boundary(0));
        assert!(lbl.is_hole(0));
        assert!(lbl.is_line(1));
    }

    #[test]
    fn mismatched_lengths_are_a_noding_error() {
        let a = seg((0.0, 0.0), (2.0, 0.0), EdgeSource::line(0));
        let b = Edge::new(
            vec![coord(0.0, 0.0), coord(2.0, 0.0), coord(3.0, 1.0)],
            &EdgeSource::line(1),
        );
        assert!(matches!(
            merge_edges(vec![a, b]),
            Err(TopologyError::EdgeMergeMismatch { .. })
        ));
    }
}
