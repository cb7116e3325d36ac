use serde::{Deserialize, Serialize};

use crate::geometry::precision::MAX_ROBUST_DIGITS;

/// Read-only tuning knobs for overlay and union.
///
/// Every field has a default, so a partial JSON/TOML document deserializes
/// into a complete configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Number of snapping attempts before falling back to snap-rounding.
    pub snap_tries: u32,
    /// Snap tolerance is the bounding magnitude of the inputs divided by
    /// this factor.
    pub snap_tolerance_factor: f64,
    /// Multiplier applied to the snap tolerance after each failed attempt.
    pub snap_tolerance_growth: f64,
    /// Decimal digits kept by the safe scale used for snap-rounding.
    pub max_robust_digits: i32,
    /// Check floating-precision noding for missed intersections.
    pub validate_floating_noding: bool,
    /// Check floating-precision area results against the input areas.
    pub check_area_consistency: bool,
    /// Suppress collapsed lines and lower-dimension intersection results.
    pub strict_mode: bool,
    /// Emit only the area part of results.
    pub area_result_only: bool,
    pub union_strategy: UnionStrategy,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            snap_tries: 5,
            snap_tolerance_factor: 1e12,
            snap_tolerance_growth: 10.0,
            max_robust_digits: MAX_ROBUST_DIGITS,
            validate_floating_noding: true,
            check_area_consistency: true,
            strict_mode: false,
            area_result_only: false,
            union_strategy: UnionStrategy::default(),
        }
    }
}

/// How a set of polygons is reduced to its union.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnionStrategy {
    /// Binary unions following a bounding-box tree, bottom-up.
    #[default]
    Cascaded,
    /// Left fold over the inputs.
    Sequential,
}
