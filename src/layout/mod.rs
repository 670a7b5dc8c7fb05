//! Layout engine for computing image frame placements
//!
//! This module takes a parameter set and an image count and produces a
//! `Placement` (center, rotation, stacking order) for each frame. It holds
//! no state and does no I/O.

pub mod engine;
pub mod params;
pub mod transform;
pub mod types;

pub use engine::{arrangement_bounds, canvas_bounds, fan_center, place, place_all};
pub use params::{LayoutParameters, ParameterOverrides, CANVAS_PADDING};
pub use transform::{FrameTransform, RotationTransform};
pub use types::*;
