use thiserror::Error;

use crate::math::Coord;

/// Top-level error type for overlay operations.
#[derive(Debug, Clone, Error)]
pub enum OverlayError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

impl OverlayError {
    /// Returns `true` if this error signals a robustness failure that a
    /// more robust noding strategy may recover from.
    #[must_use]
    pub fn is_topology(&self) -> bool {
        matches!(self, Self::Topology(_))
    }
}

/// Errors caused by the shape or content of the input geometries.
#[derive(Debug, Clone, Error)]
pub enum GeometryError {
    #[error("non-finite coordinate ({x}, {y})")]
    NonFinite { x: f64, y: f64 },

    #[error("mixed-dimension collection is not a valid overlay input")]
    MixedDimension,

    #[error("ring is not closed: first ({x0}, {y0}) last ({x1}, {y1})")]
    RingNotClosed { x0: f64, y0: f64, x1: f64, y1: f64 },
}

/// Errors raised when noding or graph construction cannot produce a
/// consistent planar subdivision at the current precision.
#[derive(Debug, Clone, Error)]
pub enum TopologyError {
    #[error("found non-noded intersection at {at}")]
    NonNodedIntersection { at: Coord },

    #[error("side location conflict for input {input} at {at}")]
    SideLocationConflict { input: usize, at: Coord },

    #[error("no outgoing result edge at {at}")]
    NoOutgoingEdge { at: Coord },

    #[error("ring edge missing at {at}")]
    RingEdgeMissing { at: Coord },

    #[error("edge visited twice during ring building at {at}")]
    EdgeVisitedTwice { at: Coord },

    #[error("unmatched edge during minimal ring linking at {at}")]
    UnmatchedEdge { at: Coord },

    #[error("found two shells in one maximal ring at {at}")]
    MultipleShells { at: Coord },

    #[error("unable to assign free hole to a shell at {at}")]
    UnassignedHole { at: Coord },

    #[error("result area inconsistent with overlay operation")]
    InconsistentArea,

    #[error("coincident edges of different sizes at {at}")]
    EdgeMergeMismatch { at: Coord },

    #[error("edge direction cannot be determined at {at}")]
    UndefinedEdgeDirection { at: Coord },
}

/// Errors related to the requested operation.
#[derive(Debug, Clone, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("operation failed: {0}")]
    Failed(String),
}

/// Convenience type alias for results using [`OverlayError`].
pub type Result<T> = std::result::Result<T, OverlayError>;
