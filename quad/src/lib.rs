//! Sampling geometry: points, sizes, rectangles, quadrilaterals and
//! projective transforms between quadrilaterals.

mod common;

pub use point::*;
pub mod point;

pub use hw::*;
pub mod hw;

pub use tlbr::*;
pub mod tlbr;

pub use quad::*;
pub mod quad;

pub use transform::*;
mod transform;
