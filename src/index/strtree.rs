//! Sort-Tile-Recursive packed bounding-box tree.
//!
//! The tree is bulk-loaded once in [`StrTree::new`] and is immutable
//! afterwards, so a built tree can be shared freely between readers.

use crate::geometry::Envelope;

/// Default maximum number of children per node.
pub const DEFAULT_NODE_CAPACITY: usize = 10;

#[derive(Debug, Clone)]
struct Node {
    env: Envelope,
    /// Item indices for leaf nodes, node indices otherwise.
    children: Vec<usize>,
    leaf: bool,
}

/// Shape of a built tree in terms of item indices, used to drive bottom-up
/// reductions such as cascaded union.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hierarchy {
    Item(usize),
    Node(Vec<Hierarchy>),
}

/// Packed R-tree over items with envelopes.
#[derive(Debug, Clone)]
pub struct StrTree<T> {
    items: Vec<(Envelope, T)>,
    nodes: Vec<Node>,
    root: Option<usize>,
}

impl<T> StrTree<T> {
    /// Builds a tree over `items` with at most `capacity` children per node.
    #[must_use]
    pub fn new(capacity: usize, items: Vec<(Envelope, T)>) -> Self {
        let capacity = capacity.max(2);
        let mut tree = Self {
            items,
            nodes: Vec::new(),
            root: None,
        };
        if tree.items.is_empty() {
            return tree;
        }

        let mut level: Vec<(Envelope, usize)> = tree
            .items
            .iter()
            .enumerate()
            .map(|(i, (env, _))| (*env, i))
            .collect();
        let mut leaf = true;
        loop {
            level = tree.pack(level, capacity, leaf);
            leaf = false;
            if level.len() <= 1 {
                break;
            }
        }
        tree.root = level.first().map(|&(_, idx)| idx);
        tree
    }

    /// Groups `entries` into nodes of at most `capacity` entries, tiling
    /// first by x then by y. Returns the new nodes as entries.
    fn pack(
        &mut self,
        mut entries: Vec<(Envelope, usize)>,
        capacity: usize,
        leaf: bool,
    ) -> Vec<(Envelope, usize)> {
        let node_count = entries.len().div_ceil(capacity);
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let slice_count = ((node_count as f64).sqrt().ceil() as usize).max(1);
        let slice_size = entries.len().div_ceil(slice_count);

        entries.sort_by(|a, b| centre_x(&a.0).total_cmp(&centre_x(&b.0)));

        let mut parents = Vec::with_capacity(node_count);
        for slice in entries.chunks_mut(slice_size) {
            slice.sort_by(|a, b| centre_y(&a.0).total_cmp(&centre_y(&b.0)));
            for group in slice.chunks(capacity) {
                let mut env = Envelope::null();
                for (e, _) in group {
                    env.expand_to_include_env(e);
                }
                let idx = self.nodes.len();
                self.nodes.push(Node {
                    env,
                    children: group.iter().map(|&(_, i)| i).collect(),
                    leaf,
                });
                parents.push((env, idx));
            }
        }
        parents
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn item(&self, index: usize) -> &T {
        &self.items[index].1
    }

    /// Calls `visit` with the index and value of every item whose envelope
    /// intersects `env`.
    pub fn query_with(&self, env: &Envelope, mut visit: impl FnMut(usize, &T)) {
        let Some(root) = self.root else {
            return;
        };
        let mut stack = vec![root];
        while let Some(n) = stack.pop() {
            let node = &self.nodes[n];
            if !node.env.intersects(env) {
                continue;
            }
            if node.leaf {
                for &i in &node.children {
                    let (item_env, item) = &self.items[i];
                    if item_env.intersects(env) {
                        visit(i, item);
                    }
                }
            } else {
                stack.extend(node.children.iter().copied());
            }
        }
    }

    /// Indices of the items whose envelopes intersect `env`.
    #[must_use]
    pub fn query(&self, env: &Envelope) -> Vec<usize> {
        let mut out = Vec::new();
        self.query_with(env, |i, _| out.push(i));
        out
    }

    /// The node structure of the tree, or `None` if it is empty.
    #[must_use]
    pub fn hierarchy(&self) -> Option<Hierarchy> {
        self.root.map(|r| self.node_hierarchy(r))
    }

    fn node_hierarchy(&self, n: usize) -> Hierarchy {
        let node = &self.nodes[n];
        if node.leaf {
            Hierarchy::Node(node.children.iter().map(|&i| Hierarchy::Item(i)).collect())
        } else {
            Hierarchy::Node(
                node.children
                    .iter()
                    .map(|&c| self.node_hierarchy(c))
                    .collect(),
            )
        }
    }
}

fn centre_x(env: &Envelope) -> f64 {
    env.centre().map_or(0.0, |c| c.x)
}

fn centre_y(env: &Envelope) -> f64 {
    env.centre().map_or(0.0, |c| c.y)
}
