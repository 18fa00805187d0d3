use glam::{DQuat, DVec3};
use thiserror::Error;

use crate::config::SpaceConfig;
use crate::position::Position;
use crate::spatial::ZoomTier;

/// Grid cells smaller than one sector are aligned from the local part alone.
pub const GRID_LOCAL_THRESHOLD: f64 = 1.0;

#[derive(Debug, Error, PartialEq)]
pub enum TransformError {
    #[error("world_to_render axis {axis} must be finite, non-zero and invertible, got {value}")]
    DegenerateScale { axis: usize, value: f64 },
    #[error("render radius must be finite and non-negative, got {0}")]
    InvalidRadius(f64),
    #[error("rotation must be a finite quaternion of non-zero length")]
    InvalidRotation,
    #[error("recenter threshold must be finite and positive, got {0}")]
    InvalidThreshold(f64),
}

/// Maps world positions of one zoom tier into a bounded render frame
/// centred on `world_origin`.
#[derive(Clone, Copy, Debug)]
pub struct SpatialTransform {
    tier: ZoomTier,
    render_origin: DVec3,
    render_radius: f64,
    world_origin: Position,
    world_to_render: DVec3,
    render_to_world: DVec3,
    rotation: DQuat,
}

impl SpatialTransform {
    pub fn new(
        tier: ZoomTier,
        render_origin: DVec3,
        render_radius: f64,
        world_origin: Position,
        world_to_render: DVec3,
        rotation: DQuat,
    ) -> Result<Self, TransformError> {
        if !render_radius.is_finite() || render_radius < 0.0 {
            return Err(TransformError::InvalidRadius(render_radius));
        }
        let render_to_world = DVec3::ONE / world_to_render;
        for axis in 0..3 {
            let value = world_to_render[axis];
            if !value.is_finite() || value == 0.0 || !render_to_world[axis].is_finite() {
                return Err(TransformError::DegenerateScale { axis, value });
            }
        }
        if !rotation.is_finite() || rotation.length_squared() == 0.0 {
            return Err(TransformError::InvalidRotation);
        }

        Ok(SpatialTransform {
            tier,
            render_origin,
            render_radius,
            world_origin,
            world_to_render,
            render_to_world,
            rotation: rotation.normalize(),
        })
    }

    /// Transform for `tier` centred on `world_origin`, using the configured
    /// uniform scale, render radius and no rotation.
    pub fn for_tier(
        tier: ZoomTier,
        world_origin: Position,
        config: &SpaceConfig,
    ) -> Result<Self, TransformError> {
        Self::new(
            tier,
            DVec3::ZERO,
            config.render_radius,
            world_origin,
            DVec3::splat(config.tiers.get(tier)),
            DQuat::IDENTITY,
        )
    }

    /// Same frame rebuilt around a new world origin.
    pub fn recentered(&self, world_origin: Position) -> Self {
        SpatialTransform {
            world_origin,
            ..*self
        }
    }

    pub fn tier(&self) -> ZoomTier {
        self.tier
    }

    pub fn render_origin(&self) -> DVec3 {
        self.render_origin
    }

    pub fn render_radius(&self) -> f64 {
        self.render_radius
    }

    pub fn world_origin(&self) -> Position {
        self.world_origin
    }

    pub fn world_to_render(&self) -> DVec3 {
        self.world_to_render
    }

    pub fn render_to_world(&self) -> DVec3 {
        self.render_to_world
    }

    pub fn rotation(&self) -> DQuat {
        self.rotation
    }

    pub fn to_render_space(&self, position: &Position) -> DVec3 {
        let relative = (*position - self.world_origin).combined();
        (self.rotation * relative) * self.world_to_render + self.render_origin
    }

    pub fn to_world_space(&self, render_point: DVec3) -> Position {
        let scaled = (render_point - self.render_origin) * self.render_to_world;
        let relative = self.rotation.inverse() * scaled;
        self.world_origin + Position::from_combined(relative)
    }

    /// Converts a world magnitude (a radius, a range) to render units.
    /// Uses the x-axis scalar.
    pub fn scale_distance(&self, distance: f64) -> f64 {
        distance * self.world_to_render.x
    }

    pub fn unscale_distance(&self, distance: f64) -> f64 {
        distance * self.render_to_world.x
    }

    /// Fractional per-axis offset in `[0, 1)` aligning a background grid of
    /// `cell_world_size` with the current world origin.
    ///
    /// Returns zero for a non-positive or non-finite cell size.
    pub fn grid_offset(&self, cell_world_size: f64) -> DVec3 {
        if !cell_world_size.is_finite() || cell_world_size <= 0.0 {
            return DVec3::ZERO;
        }
        let cell = DVec3::splat(cell_world_size);
        let local = self.world_origin.local();
        let within_cell = if cell_world_size < GRID_LOCAL_THRESHOLD {
            local.rem_euclid(cell)
        } else {
            // Reduce the sector first so large sectors keep the local fraction.
            (self.world_origin.sector().rem_euclid(cell) + local).rem_euclid(cell)
        };
        let offset = within_cell / cell;
        DVec3::new(wrap_unit(offset.x), wrap_unit(offset.y), wrap_unit(offset.z))
    }

    pub fn is_within_render_radius(&self, render_point: DVec3) -> bool {
        render_point.distance_squared(self.render_origin) <= self.render_radius * self.render_radius
    }

    pub fn is_visible(&self, position: &Position) -> bool {
        self.is_within_render_radius(self.to_render_space(position))
    }
}

fn wrap_unit(value: f64) -> f64 {
    if value >= 1.0 {
        0.0
    } else {
        value
    }
}
