//! Candidate-pair search over monotone chains held in a bounding-box tree.

use tracing::debug;

use crate::index::{build_chains, MonotoneChain, StrTree, DEFAULT_NODE_CAPACITY};
use crate::math::Coord;

use super::intersector::SegmentIntersector;

/// Monotone-chain index over a fixed set of coordinate strings.
pub struct McIndex<'a> {
    strings: &'a [Vec<Coord>],
    chains: Vec<MonotoneChain>,
    tree: StrTree<usize>,
    tolerance: f64,
}

impl<'a> McIndex<'a> {
    /// Builds chains for every string and loads them into the tree. Chain
    /// envelopes are grown by `tolerance`.
    #[must_use]
    pub fn new(strings: &'a [Vec<Coord>], tolerance: f64) -> Self {
        let chains: Vec<MonotoneChain> = strings
            .iter()
            .enumerate()
            .flat_map(|(i, pts)| build_chains(pts, i))
            .collect();
        let entries = chains
            .iter()
            .enumerate()
            .map(|(i, c)| (c.envelope_with_tolerance(tolerance), i))
            .collect();
        let tree = StrTree::new(DEFAULT_NODE_CAPACITY, entries);
        Self {
            strings,
            chains,
            tree,
            tolerance,
        }
    }

    #[must_use]
    pub fn chain_count(&self) -> usize {
        self.chains.len()
    }

    /// Feeds every pair of segments with overlapping envelopes to
    /// `intersector`. Each unordered pair of chains is visited once.
    pub fn compute_overlaps(&self, intersector: &mut impl SegmentIntersector) {
        let mut pairs = 0usize;
        for (i, chain) in self.chains.iter().enumerate() {
            let env = chain.envelope_with_tolerance(self.tolerance);
            let mut candidates = self.tree.query(&env);
            candidates.sort_unstable();
            for j in candidates.into_iter().filter(|&j| j > i) {
                let other = &self.chains[j];
                let (s0, s1) = (chain.string, other.string);
                chain.compute_overlaps(
                    &self.strings[s0],
                    other,
                    &self.strings[s1],
                    self.tolerance,
                    &mut |i0, i1| {
                        pairs += 1;
                        intersector.process_intersections(self.strings, s0, i0, s1, i1);
                    },
                );
                if intersector.is_done() {
                    return;
                }
            }
        }
        debug!(chains = self.chains.len(), pairs, "monotone chain overlap search");
    }
}
