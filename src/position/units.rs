use thiserror::Error;

use super::Position;

/// Light years spanned by one universe unit (one sector edge).
pub const UNIVERSE_UNIT_LIGHT_YEARS: f64 = 10.0;

#[derive(Debug, Error, PartialEq)]
pub enum PositionError {
    #[error("travel speed must be a positive finite number, got {0}")]
    InvalidSpeed(f64),
}

pub fn to_light_years(distance: f64) -> f64 {
    distance * UNIVERSE_UNIT_LIGHT_YEARS
}

pub fn to_universe_units(light_years: f64) -> f64 {
    light_years / UNIVERSE_UNIT_LIGHT_YEARS
}

/// Elapsed time units needed to cover the distance between `from` and `to`
/// at `speed` universe units per time unit.
pub fn travel_time(from: &Position, to: &Position, speed: f64) -> Result<f64, PositionError> {
    if !speed.is_finite() || speed <= 0.0 {
        return Err(PositionError::InvalidSpeed(speed));
    }
    Ok(from.distance(to) / speed)
}
