use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::position::{Position, POSITION_TOLERANCE};

#[derive(Debug, Error, PartialEq)]
pub enum AreaError {
    #[error("circle radius must be finite and non-negative, got {0}")]
    InvalidRadius(f64),
    #[error("rectangle half extents must be finite and non-negative, got {0}")]
    InvalidExtents(DVec2),
}

/// Shape-specific parameters of an [`Area`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Shape {
    /// Everything within `radius` universe units of the origin.
    Circle { radius: f64 },
    /// Axis-aligned box centred on the origin; `half_extents` are the x and z
    /// half widths. The vertical axis is unbounded.
    Rectangle { half_extents: DVec2 },
}

impl Shape {
    fn validate(&self) -> Result<(), AreaError> {
        match *self {
            Shape::Circle { radius } => {
                if !radius.is_finite() || radius < 0.0 {
                    return Err(AreaError::InvalidRadius(radius));
                }
            }
            Shape::Rectangle { half_extents } => {
                if !half_extents.is_finite() || half_extents.min_element() < 0.0 {
                    return Err(AreaError::InvalidExtents(half_extents));
                }
            }
        }
        Ok(())
    }

    /// Offsets of the bounding envelope and nominal centre from the origin.
    fn deltas(&self) -> (Position, Position, Position) {
        let extent = match *self {
            Shape::Circle { radius } => DVec3::splat(radius),
            Shape::Rectangle { half_extents } => DVec3::new(half_extents.x, 0.0, half_extents.y),
        };
        // Padding keeps the sector-level envelope sound at exact boundaries.
        let padded = extent + DVec3::splat(POSITION_TOLERANCE);
        (
            Position::from_combined(-padded),
            Position::from_combined(padded),
            Position::ZERO,
        )
    }
}

/// Result of [`Area::proximity`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Proximity {
    /// Ranking metric; lower is closer.
    pub metric: f64,
    pub contains: bool,
}

/// A region of space anchored to a moving origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Area {
    origin: Position,
    minimum_delta: Position,
    maximum_delta: Position,
    center_delta: Position,
    shape: Shape,
}

impl Area {
    pub fn new(origin: Position, shape: Shape) -> Result<Self, AreaError> {
        shape.validate()?;
        let (minimum_delta, maximum_delta, center_delta) = shape.deltas();
        Ok(Area {
            origin,
            minimum_delta,
            maximum_delta,
            center_delta,
            shape,
        })
    }

    pub fn circle(origin: Position, radius: f64) -> Result<Self, AreaError> {
        Self::new(origin, Shape::Circle { radius })
    }

    pub fn rectangle(origin: Position, half_extents: DVec2) -> Result<Self, AreaError> {
        Self::new(origin, Shape::Rectangle { half_extents })
    }

    pub fn origin(&self) -> Position {
        self.origin
    }

    /// Moves the area with the object it tracks.
    pub fn set_origin(&mut self, origin: Position) {
        self.origin = origin;
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn set_shape(&mut self, shape: Shape) -> Result<(), AreaError> {
        *self = Self::new(self.origin, shape)?;
        Ok(())
    }

    pub fn minimum(&self) -> Position {
        self.origin + self.minimum_delta
    }

    pub fn maximum(&self) -> Position {
        self.origin + self.maximum_delta
    }

    pub fn center(&self) -> Position {
        self.origin + self.center_delta
    }

    /// Sector-level rejection on the horizontal axes. Never rejects a
    /// position the precise test would accept.
    pub fn broad_phase(&self, position: &Position) -> bool {
        let min = self.minimum().sector();
        let max = self.maximum().sector();
        let s = position.sector();
        s.x >= min.x && s.x <= max.x && s.z >= min.z && s.z <= max.z
    }

    pub fn contains(&self, position: &Position) -> bool {
        self.broad_phase(position) && self.contains_precise(position)
    }

    pub fn proximity(&self, position: &Position) -> Proximity {
        Proximity {
            metric: self.origin.distance(position),
            contains: self.contains(position),
        }
    }

    fn contains_precise(&self, position: &Position) -> bool {
        let center = self.center();
        match self.shape {
            Shape::Circle { radius } => position.distance(&center) <= radius,
            Shape::Rectangle { half_extents } => {
                let offset = (*position - center).combined();
                offset.x.abs() <= half_extents.x && offset.z.abs() <= half_extents.y
            }
        }
    }
}
