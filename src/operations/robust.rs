//! Snap-if-needed overlay.
//!
//! An overlay is first computed with exact floating noding. If that fails
//! with a topology error, it is retried with snapping noders of growing
//! tolerance, then with both operands self-snapped, and finally with
//! snap-rounding at a safe scale. If every attempt fails, the error from
//! the floating attempt is returned.

use tracing::{debug, info, instrument, warn};

use crate::config::OverlayConfig;
use crate::error::Result;
use crate::geometry::precision::{max_bound_magnitude, safe_scale_of};
use crate::geometry::{Geometry, PrecisionModel};
use crate::noding::Noder;

use super::overlay::{OverlayNg, OverlayOp};

/// One rung of the retry ladder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Strategy {
    /// Exact floating-point noding with validation.
    Floating,
    /// Snapping noder applied to both operands together.
    Snapping { tolerance: f64 },
    /// Each operand self-unioned with the snapping noder, then overlaid
    /// with it.
    SnapBoth { tolerance: f64 },
    /// Snap-rounding onto a fixed grid.
    SnapRounding { scale: f64 },
}

/// An overlay that escalates through more robust noders on failure.
#[derive(Debug, Clone)]
pub struct OverlayRobust<'a> {
    a: &'a Geometry,
    b: Option<&'a Geometry>,
    op: OverlayOp,
    config: OverlayConfig,
}

impl<'a> OverlayRobust<'a> {
    #[must_use]
    pub fn new(a: &'a Geometry, b: &'a Geometry, op: OverlayOp) -> Self {
        Self {
            a,
            b: Some(b),
            op,
            config: OverlayConfig::default(),
        }
    }

    /// A robust self-union of `a`.
    #[must_use]
    pub fn unary(a: &'a Geometry) -> Self {
        Self {
            a,
            b: None,
            op: OverlayOp::Union,
            config: OverlayConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: OverlayConfig) -> Self {
        self.config = config;
        self
    }

    /// Initial snap tolerance, proportional to the largest ordinate
    /// magnitude of the operands.
    #[must_use]
    pub fn snap_tolerance(&self) -> f64 {
        let mut magnitude = max_bound_magnitude(&self.a.envelope());
        if let Some(b) = self.b {
            magnitude = magnitude.max(max_bound_magnitude(&b.envelope()));
        }
        magnitude / self.config.snap_tolerance_factor
    }

    /// Computes the overlay.
    ///
    /// # Errors
    ///
    /// Input errors are returned immediately. If every strategy fails with
    /// a topology error, the floating attempt's error is returned.
    pub fn result(&self) -> Result<Geometry> {
        self.run_with(|strategy| self.attempt(strategy))
    }

    /// Drives the retry ladder, calling `attempt` for each strategy in
    /// turn until one succeeds.
    ///
    /// # Errors
    ///
    /// As for [`OverlayRobust::result`].
    #[instrument(skip_all, fields(op = ?self.op))]
    pub fn run_with(&self, mut attempt: impl FnMut(Strategy) -> Result<Geometry>) -> Result<Geometry> {
        let first_err = match attempt(Strategy::Floating) {
            Ok(g) => return Ok(g),
            Err(e) if !e.is_topology() => return Err(e),
            Err(e) => e,
        };
        warn!(error = %first_err, "floating overlay failed, retrying with snapping");

        let mut tolerance = self.snap_tolerance();
        for _ in 0..self.config.snap_tries {
            for strategy in [Strategy::Snapping { tolerance }, Strategy::SnapBoth { tolerance }] {
                match attempt(strategy) {
                    Ok(g) => {
                        info!(?strategy, "overlay recovered");
                        return Ok(g);
                    }
                    Err(e) if !e.is_topology() => return Err(e),
                    Err(e) => debug!(?strategy, error = %e, "overlay attempt failed"),
                }
            }
            tolerance *= self.config.snap_tolerance_growth;
        }

        let scale = safe_scale_of(self.a, self.b, self.config.max_robust_digits);
        let strategy = Strategy::SnapRounding { scale };
        match attempt(strategy) {
            Ok(g) => {
                info!(?strategy, "overlay recovered");
                return Ok(g);
            }
            Err(e) if !e.is_topology() => return Err(e),
            Err(e) => warn!(error = %e, "snap-rounding overlay failed"),
        }
        Err(first_err)
    }

    fn overlay_ng<'b>(&self, a: &'b Geometry, b: Option<&'b Geometry>) -> OverlayNg<'b> {
        let ov = match b {
            Some(b) => OverlayNg::new(a, b, self.op),
            None => OverlayNg::unary(a),
        };
        ov.with_config(&self.config)
    }

    /// Runs one strategy of the ladder.
    ///
    /// # Errors
    ///
    /// Returns the error raised by the overlay under that strategy.
    pub fn attempt(&self, strategy: Strategy) -> Result<Geometry> {
        match strategy {
            Strategy::Floating => self
                .overlay_ng(self.a, self.b)
                .with_noder(Noder::Floating {
                    validate: self.config.validate_floating_noding,
                })
                .result(),
            Strategy::Snapping { tolerance } => self
                .overlay_ng(self.a, self.b)
                .with_noder(Noder::Snapping { tolerance })
                .result(),
            Strategy::SnapBoth { tolerance } => {
                let a = snap_self(self.a, tolerance)?;
                let b = self.b.map(|b| snap_self(b, tolerance)).transpose()?;
                self.overlay_ng(&a, b.as_ref())
                    .with_noder(Noder::Snapping { tolerance })
                    .result()
            }
            Strategy::SnapRounding { scale } => self
                .overlay_ng(self.a, self.b)
                .with_precision(PrecisionModel::fixed(scale))
                .result(),
        }
    }
}

/// Self-union with a snapping noder, which removes near-coincident
/// features within one operand.
fn snap_self(g: &Geometry, tolerance: f64) -> Result<Geometry> {
    OverlayNg::unary(g)
        .with_noder(Noder::Snapping { tolerance })
        .strict(true)
        .result()
}

/// Overlays two geometries through the retry ladder with default
/// settings.
///
/// # Errors
///
/// See [`OverlayRobust::result`].
pub fn overlay(a: &Geometry, b: &Geometry, op: OverlayOp) -> Result<Geometry> {
    OverlayRobust::new(a, b, op).result()
}

/// Overlays two geometries through the retry ladder.
///
/// # Errors
///
/// See [`OverlayRobust::result`].
pub fn overlay_with_config(a: &Geometry, b: &Geometry, op: OverlayOp, config: &OverlayConfig) -> Result<Geometry> {
    OverlayRobust::new(a, b, op).with_config(config.clone()).result()
}
