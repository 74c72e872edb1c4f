//! Parametric solid kernel.
//!
//! Solids are boundary representations built by `truck-modeling` through a
//! [`Workplane`], posed with rigid placements and triangulated by
//! `truck-meshalgo` within a deflection [`Tolerance`].

mod solid;
mod tolerance;
mod workplane;

pub use solid::Solid;
pub use tolerance::Tolerance;
pub use workplane::Workplane;
