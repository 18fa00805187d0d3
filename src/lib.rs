pub mod address;
pub mod area;
pub mod config;
pub mod position;
pub mod spatial;

pub use address::{decode, encode, Address, AddressError};
pub use area::{Area, AreaError, Proximity, Shape};
pub use config::{ConfigError, SpaceConfig};
pub use position::{normalized_sector, travel_time, Position, PositionError};
pub use spatial::{FloatingOrigin, SpatialTransform, TransformError, ZoomTier};
