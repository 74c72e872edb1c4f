use super::SceneObject;
use crate::error::Result;
use crate::kernel::Solid;
use crate::mesh::Mesh;
use crate::params::Parameters;
use crate::strategy::{ModelingStrategy, OrganicStrategy, PrecisionStrategy};

/// Object whose model comes from a [`ModelingStrategy`]
#[derive(Debug, Clone, Default)]
pub struct StrategyObject<S> {
    parameters: Parameters,
    strategy: S,
}

/// Noise-perturbed icosphere object
pub type OrganicObject = StrategyObject<OrganicStrategy>;

/// Kernel box object
pub type PrecisionObject = StrategyObject<PrecisionStrategy>;

impl<S: ModelingStrategy + Default> StrategyObject<S> {
    pub fn new() -> Self {
        Self::with_parameters(Parameters::new())
    }

    pub fn with_parameters(parameters: Parameters) -> Self {
        Self {
            parameters,
            strategy: S::default(),
        }
    }
}

impl<S> StrategyObject<S> {
    pub fn strategy(&self) -> &S {
        &self.strategy
    }
}

impl PrecisionObject {
    pub fn model(&self) -> Option<&Solid> {
        self.strategy.model()
    }
}

impl<S: ModelingStrategy + std::fmt::Debug> SceneObject for StrategyObject<S> {
    fn kind(&self) -> &'static str {
        self.strategy.name()
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn parameters_mut(&mut self) -> &mut Parameters {
        &mut self.parameters
    }

    fn build(&mut self) -> Result<()> {
        self.strategy.build_model(&self.parameters)
    }

    fn mesh(&mut self) -> Result<Mesh> {
        if !self.strategy.is_built() {
            log::debug!("lazily building {}", self.strategy.name());
            self.build()?;
        }
        self.strategy.mesh()
    }
}
