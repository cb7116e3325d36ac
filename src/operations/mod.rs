pub mod overlay;
pub mod robust;
pub mod union;

pub use overlay::{overlay, overlay_with, reduce_precision, OverlayNg, OverlayOp};
pub use robust::{OverlayRobust, Strategy};
pub use union::{unary_union, union, union_all, UnaryUnion};
