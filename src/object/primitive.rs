use std::fmt::Debug;
use std::marker::PhantomData;

use glam::DVec3;

use super::SceneObject;
use crate::convert::solid_to_mesh;
use crate::error::{ModelError, Result};
use crate::kernel::{Solid, Tolerance, Workplane};
use crate::mesh::Mesh;
use crate::params::Parameters;

/// Side of the degenerate top square that stands in for a pyramid apex
const APEX_SIZE: f64 = 0.001;

/// Per-shape construction of a primitive solid
pub trait PrimitiveKind: Debug {
    const NAME: &'static str;

    fn construct(parameters: &Parameters) -> Result<Solid>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CubeKind;

#[derive(Debug, Clone, Copy, Default)]
pub struct SphereKind;

#[derive(Debug, Clone, Copy, Default)]
pub struct CylinderKind;

#[derive(Debug, Clone, Copy, Default)]
pub struct PyramidKind;

impl PrimitiveKind for CubeKind {
    const NAME: &'static str = "cube";

    fn construct(parameters: &Parameters) -> Result<Solid> {
        Workplane::xy().cuboid(
            parameters.get_or("length", 10.0),
            parameters.get_or("width", 10.0),
            parameters.get_or("height", 10.0),
        )
    }
}

impl PrimitiveKind for SphereKind {
    const NAME: &'static str = "sphere";

    fn construct(parameters: &Parameters) -> Result<Solid> {
        Workplane::xy().sphere(parameters.get_or("radius", 5.0))
    }
}

impl PrimitiveKind for CylinderKind {
    const NAME: &'static str = "cylinder";

    fn construct(parameters: &Parameters) -> Result<Solid> {
        Workplane::xy().cylinder(
            parameters.get_or("height", 10.0),
            parameters.get_or("radius", 3.0),
        )
    }
}

impl PrimitiveKind for PyramidKind {
    const NAME: &'static str = "pyramid";

    /// Loft from a `base` square at z=0 to a tiny square at z=`height`
    fn construct(parameters: &Parameters) -> Result<Solid> {
        let base = parameters.get_or("base", 10.0);
        let height = parameters.get_or("height", 15.0);
        Workplane::xy()
            .rect(base, base)?
            .workplane(height)
            .rect(APEX_SIZE, APEX_SIZE)?
            .loft()
    }
}

/// Kernel primitive tessellated with [`Tolerance::FINE`]
#[derive(Debug, Clone)]
pub struct Primitive<K> {
    parameters: Parameters,
    model: Option<Solid>,
    kind: PhantomData<K>,
}

pub type Cube = Primitive<CubeKind>;
pub type Sphere = Primitive<SphereKind>;
pub type Cylinder = Primitive<CylinderKind>;
pub type Pyramid = Primitive<PyramidKind>;

impl<K: PrimitiveKind> Default for Primitive<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: PrimitiveKind> Primitive<K> {
    pub fn new() -> Self {
        Self::with_parameters(Parameters::new())
    }

    pub fn with_parameters(parameters: Parameters) -> Self {
        Self {
            parameters,
            model: None,
            kind: PhantomData,
        }
    }

    pub fn model(&self) -> Option<&Solid> {
        self.model.as_ref()
    }

    /// Mutable access to the built solid, for placement
    pub fn model_mut(&mut self) -> Option<&mut Solid> {
        self.model.as_mut()
    }

    fn built_model(&mut self) -> Result<&mut Solid> {
        if self.model.is_none() {
            self.build()?;
        }
        self.model.as_mut().ok_or(ModelError::Unbuilt(K::NAME))
    }

    /// Move the built solid; builds first if needed
    pub fn translate(&mut self, offset: DVec3) -> Result<()> {
        let model = self.built_model()?;
        *model = model.translate(offset);
        Ok(())
    }

    /// Rotate the built solid about its own center; builds first if needed
    pub fn rotate_about_center(&mut self, axis: DVec3, degrees: f64) -> Result<()> {
        let model = self.built_model()?;
        *model = model.rotate_about_center(axis, degrees)?;
        Ok(())
    }
}

impl<K: PrimitiveKind> SceneObject for Primitive<K> {
    fn kind(&self) -> &'static str {
        K::NAME
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn parameters_mut(&mut self) -> &mut Parameters {
        &mut self.parameters
    }

    fn build(&mut self) -> Result<()> {
        self.model = Some(K::construct(&self.parameters)?);
        Ok(())
    }

    fn mesh(&mut self) -> Result<Mesh> {
        let model = self.built_model()?;
        solid_to_mesh(model, Tolerance::FINE)
    }
}
