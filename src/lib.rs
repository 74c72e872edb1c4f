pub mod cli;
pub mod convert;
pub mod demo;
pub mod error;
pub mod export;
pub mod kernel;
pub mod loaders;
pub mod math;
pub mod mesh;
pub mod object;
pub mod params;
pub mod scene;
pub mod strategy;
pub mod viewer;

pub use error::{ModelError, Result};
pub use export::{StlExporter, StlFormat};
pub use mesh::Mesh;
pub use object::{
    BaseObject, Cube, Cylinder, OrganicObject, PrecisionObject, Pyramid, SceneObject, Sphere,
};
pub use params::Parameters;
pub use scene::{ObjectId, Scene, SceneMode};
pub use strategy::{ModelingStrategy, OrganicStrategy, PrecisionStrategy};
