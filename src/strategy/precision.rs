use super::ModelingStrategy;
use crate::convert::solid_to_mesh;
use crate::error::{ModelError, Result};
use crate::kernel::{Solid, Tolerance, Workplane};
use crate::mesh::Mesh;
use crate::params::Parameters;

const DEFAULT_SIZE: f64 = 10.0;

/// Centered kernel box, tessellated with [`Tolerance::COARSE`]
#[derive(Debug, Clone, Default)]
pub struct PrecisionStrategy {
    model: Option<Solid>,
}

impl PrecisionStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built solid, if any
    pub fn model(&self) -> Option<&Solid> {
        self.model.as_ref()
    }
}

impl ModelingStrategy for PrecisionStrategy {
    fn name(&self) -> &'static str {
        "precision model"
    }

    fn build_model(&mut self, parameters: &Parameters) -> Result<()> {
        let solid = Workplane::xy().cuboid(
            parameters.get_or("length", DEFAULT_SIZE),
            parameters.get_or("width", DEFAULT_SIZE),
            parameters.get_or("height", DEFAULT_SIZE),
        )?;
        self.model = Some(solid);
        Ok(())
    }

    fn mesh(&self) -> Result<Mesh> {
        let solid = self
            .model
            .as_ref()
            .ok_or(ModelError::Unbuilt("precision model"))?;
        solid_to_mesh(solid, Tolerance::COARSE)
    }

    fn is_built(&self) -> bool {
        self.model.is_some()
    }
}
