//! Floating origin for the render frame.
//!
//! Keeps the active [`SpatialTransform`] centred near a moving focus point so
//! render-space coordinates stay small wherever the focus is in the universe.

use glam::DVec3;
use log::{debug, info};

use crate::config::SpaceConfig;
use crate::position::Position;
use crate::spatial::{SpatialTransform, TransformError, ZoomTier};

#[derive(Debug, Clone)]
pub struct FloatingOrigin {
    config: SpaceConfig,
    transform: SpatialTransform,
    focus: Position,
    shifts: usize,
}

impl FloatingOrigin {
    pub fn new(tier: ZoomTier, focus: Position, config: SpaceConfig) -> Result<Self, TransformError> {
        let threshold = config.recenter_threshold;
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(TransformError::InvalidThreshold(threshold));
        }
        let transform = SpatialTransform::for_tier(tier, focus, &config)?;
        Ok(Self {
            config,
            transform,
            focus,
            shifts: 0,
        })
    }

    pub fn transform(&self) -> &SpatialTransform {
        &self.transform
    }

    pub fn focus(&self) -> Position {
        self.focus
    }

    pub fn tier(&self) -> ZoomTier {
        self.transform.tier()
    }

    /// Number of re-centers performed so far.
    pub fn shift_count(&self) -> usize {
        self.shifts
    }

    /// Distance of the focus from the render origin, in render units.
    pub fn focus_drift(&self) -> f64 {
        self.transform
            .to_render_space(&self.focus)
            .distance(self.transform.render_origin())
    }

    /// Moves the focus and re-centers once it drifts past the configured
    /// threshold. Returns true when the transform was rebuilt.
    pub fn update_focus(&mut self, focus: Position) -> bool {
        self.focus = focus;
        if self.focus_drift() > self.config.recenter_threshold {
            self.recenter();
            true
        } else {
            false
        }
    }

    /// Rebuilds the transform around the current focus.
    pub fn recenter(&mut self) {
        let previous = self.transform.world_origin();
        self.transform = self.transform.recentered(self.focus);
        self.shifts += 1;
        info!(
            "Render origin re-centered from {} to {} ({} shifts)",
            previous, self.focus, self.shifts
        );
    }

    /// Switches zoom tier, rebuilding the transform around the focus with the
    /// tier's configured scale. The rotation carries over.
    pub fn set_tier(&mut self, tier: ZoomTier) -> Result<(), TransformError> {
        if tier == self.transform.tier() {
            return Ok(());
        }
        let current = self.transform;
        self.transform = SpatialTransform::new(
            tier,
            current.render_origin(),
            self.config.render_radius,
            self.focus,
            DVec3::splat(self.config.tiers.get(tier)),
            current.rotation(),
        )?;
        debug!("Zoom tier changed from {:?} to {:?}", current.tier(), tier);
        Ok(())
    }
}
