pub mod monotone_chain;
pub mod strtree;

pub use monotone_chain::{build_chains, MonotoneChain};
pub use strtree::{Hierarchy, StrTree, DEFAULT_NODE_CAPACITY};
