//! Interchangeable model construction algorithms.

mod organic;
mod precision;

pub use organic::OrganicStrategy;
pub use precision::PrecisionStrategy;

use crate::error::Result;
use crate::mesh::Mesh;
use crate::params::Parameters;

/// Produces a model from parameters and turns it into a mesh
pub trait ModelingStrategy {
    /// Human readable name used in logs and errors
    fn name(&self) -> &'static str;

    /// Build (or rebuild) the internal model
    fn build_model(&mut self, parameters: &Parameters) -> Result<()>;

    /// Mesh of the current model; fails with `Unbuilt` before `build_model`
    fn mesh(&self) -> Result<Mesh>;

    fn is_built(&self) -> bool;
}
