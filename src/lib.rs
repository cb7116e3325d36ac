pub mod config;
pub mod error;
pub mod geometry;
pub mod index;
pub mod math;
pub mod noding;
pub mod operations;
pub mod topology;

pub use config::{OverlayConfig, UnionStrategy};
pub use error::{OverlayError, Result};
