//! Render-space mapping for the floating-origin frame.

pub mod origin;
pub mod tier;
pub mod transform;

pub use origin::FloatingOrigin;
pub use tier::ZoomTier;
pub use transform::{SpatialTransform, TransformError, GRID_LOCAL_THRESHOLD};
