//! Scene objects: a parameter bag plus a lazily built model.

mod primitive;
mod strategy_object;

pub use primitive::{
    Cube, CubeKind, Cylinder, CylinderKind, Primitive, PrimitiveKind, Pyramid, PyramidKind,
    Sphere, SphereKind,
};
pub use strategy_object::{OrganicObject, PrecisionObject, StrategyObject};

use std::fmt::Debug;

use crate::error::{ModelError, Result};
use crate::mesh::Mesh;
use crate::params::Parameters;

/// Anything that can be placed in a [`Scene`](crate::scene::Scene)
pub trait SceneObject: Debug {
    /// Short type name for logs
    fn kind(&self) -> &'static str {
        "object"
    }

    fn parameters(&self) -> &Parameters;

    fn parameters_mut(&mut self) -> &mut Parameters;

    /// Build the model from the current parameters
    fn build(&mut self) -> Result<()> {
        Err(ModelError::NotImplemented("build"))
    }

    /// Mesh of the model, building it first if needed
    fn mesh(&mut self) -> Result<Mesh> {
        Err(ModelError::NotImplemented("mesh"))
    }

    /// Merge `updates` into the parameters and rebuild
    fn manipulate(&mut self, updates: &Parameters) -> Result<()> {
        self.parameters_mut().merge(updates);
        self.build()
    }
}

/// Object that only carries parameters; it cannot build anything
#[derive(Debug, Clone, Default)]
pub struct BaseObject {
    parameters: Parameters,
}

impl BaseObject {
    pub fn new(parameters: Parameters) -> Self {
        Self { parameters }
    }
}

impl SceneObject for BaseObject {
    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn parameters_mut(&mut self) -> &mut Parameters {
        &mut self.parameters
    }
}
