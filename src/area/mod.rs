//! Regions for range and trigger-zone queries.

#[allow(clippy::module_inception)]
pub mod area;

pub use area::{Area, AreaError, Proximity, Shape};
