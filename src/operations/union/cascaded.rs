//! Cascaded polygon union.
//!
//! Polygons are packed into a bounding-box tree and unioned bottom-up,
//! node by node, so each binary union works on geometries that are close
//! together and small relative to the final result.

use tracing::debug;

use crate::error::Result;
use crate::geometry::{Dimension, Geometry, Polygon};
use crate::index::{Hierarchy, StrTree};

/// Children per tree node. Small nodes keep intermediate unions local.
const STRTREE_NODE_CAPACITY: usize = 4;

/// Unions `polygons` in tree order with `union_fn`. Returns `None` for no
/// input.
pub(crate) fn cascaded_union(
    polygons: &[Polygon],
    union_fn: &impl Fn(&Geometry, &Geometry) -> Result<Geometry>,
) -> Result<Option<Geometry>> {
    let items = polygons
        .iter()
        .enumerate()
        .map(|(i, p)| (p.envelope(), i))
        .collect();
    let tree = StrTree::new(STRTREE_NODE_CAPACITY, items);
    let Some(hierarchy) = tree.hierarchy() else {
        return Ok(None);
    };
    debug!(polygons = polygons.len(), "cascaded union");
    let reducer = Reducer {
        tree: &tree,
        polygons,
        union_fn,
    };
    reducer.union_tree(&hierarchy).map(Some)
}

/// Unions `polygons` one after another into a running result.
pub(crate) fn sequential_union(
    polygons: &[Polygon],
    union_fn: &impl Fn(&Geometry, &Geometry) -> Result<Geometry>,
) -> Result<Option<Geometry>> {
    let mut iter = polygons.iter();
    let Some(first) = iter.next() else {
        return Ok(None);
    };
    let mut acc = Geometry::Polygon(first.clone());
    for p in iter {
        acc = restrict_to_polygons(union_fn(&acc, &Geometry::Polygon(p.clone()))?);
    }
    Ok(Some(acc))
}

struct Reducer<'t, F> {
    tree: &'t StrTree<usize>,
    polygons: &'t [Polygon],
    union_fn: &'t F,
}

impl<F> Reducer<'_, F>
where
    F: Fn(&Geometry, &Geometry) -> Result<Geometry>,
{
    fn union_tree(&self, node: &Hierarchy) -> Result<Geometry> {
        match node {
            Hierarchy::Item(i) => Ok(Geometry::Polygon(self.polygons[*self.tree.item(*i)].clone())),
            Hierarchy::Node(children) => {
                let geoms = children
                    .iter()
                    .map(|c| self.union_tree(c))
                    .collect::<Result<Vec<_>>>()?;
                self.binary_union(&geoms)
            }
        }
    }

    fn binary_union(&self, geoms: &[Geometry]) -> Result<Geometry> {
        match geoms {
            [] => Ok(Geometry::empty(Some(Dimension::Area))),
            [g] => Ok(g.clone()),
            [g0, g1] => self.union_pair(g0, g1),
            _ => {
                let mid = geoms.len() / 2;
                let g0 = self.binary_union(&geoms[..mid])?;
                let g1 = self.binary_union(&geoms[mid..])?;
                self.union_pair(&g0, &g1)
            }
        }
    }

    fn union_pair(&self, g0: &Geometry, g1: &Geometry) -> Result<Geometry> {
        (self.union_fn)(g0, g1).map(restrict_to_polygons)
    }
}

/// Keeps only the polygonal part of a union. Robustness issues can leave
/// stray lines or points behind, which would break later unions.
fn restrict_to_polygons(g: Geometry) -> Geometry {
    if matches!(g, Geometry::Polygon(_) | Geometry::MultiPolygon(_)) {
        return g;
    }
    let polygons = g.polygons().into_iter().cloned().collect();
    Geometry::from_components(polygons, Vec::new(), Vec::new())
        .unwrap_or_else(|| Geometry::empty(Some(Dimension::Area)))
}
