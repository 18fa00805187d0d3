//! Dual-resolution universe coordinates.

#[allow(clippy::module_inception)]
pub mod position;
pub mod units;

pub use position::{normalized_sector, Position, LOCAL_EPSILON, POSITION_TOLERANCE};
pub use units::{to_light_years, to_universe_units, travel_time, PositionError, UNIVERSE_UNIT_LIGHT_YEARS};
