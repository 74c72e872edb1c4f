use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{ModelError, Result};
use crate::export::StlExporter;
use crate::mesh::Mesh;
use crate::object::SceneObject;

/// Handle to an object inside a [`Scene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Informational tag describing how a scene's objects are modeled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SceneMode {
    Organic,
    #[default]
    Precision,
}

impl FromStr for SceneMode {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "organic" => Ok(SceneMode::Organic),
            "precision" => Ok(SceneMode::Precision),
            other => Err(ModelError::Config(format!(
                "invalid scene mode '{}', expected 'organic' or 'precision'",
                other
            ))),
        }
    }
}

impl fmt::Display for SceneMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneMode::Organic => f.write_str("organic"),
            SceneMode::Precision => f.write_str("precision"),
        }
    }
}

/// Ordered collection of objects exported together
#[derive(Debug, Default)]
pub struct Scene {
    mode: SceneMode,
    objects: Vec<(ObjectId, Box<dyn SceneObject>)>,
    next_id: u64,
}

impl Scene {
    pub fn new(mode: SceneMode) -> Self {
        Self {
            mode,
            objects: Vec::new(),
            next_id: 0,
        }
    }

    pub fn mode(&self) -> SceneMode {
        self.mode
    }

    /// Append an object; the same object may be added more than once
    pub fn add(&mut self, object: impl SceneObject + 'static) -> ObjectId {
        self.add_boxed(Box::new(object))
    }

    pub fn add_boxed(&mut self, object: Box<dyn SceneObject>) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        log::debug!("scene: added {} {}", object.kind(), id);
        self.objects.push((id, object));
        id
    }

    /// Take an object out of the scene
    pub fn remove(&mut self, id: ObjectId) -> Result<Box<dyn SceneObject>> {
        let index = self
            .objects
            .iter()
            .position(|(existing, _)| *existing == id)
            .ok_or(ModelError::ObjectNotFound(id))?;
        let (_, object) = self.objects.remove(index);
        log::debug!("scene: removed {} {}", object.kind(), id);
        Ok(object)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, id: ObjectId) -> Option<&dyn SceneObject> {
        self.objects
            .iter()
            .find(|(existing, _)| *existing == id)
            .map(|(_, object)| object.as_ref())
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut (dyn SceneObject + 'static)> {
        self.objects
            .iter_mut()
            .find(|(existing, _)| *existing == id)
            .map(|(_, object)| object.as_mut())
    }

    /// Objects in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &dyn SceneObject)> {
        self.objects.iter().map(|(id, object)| (*id, object.as_ref()))
    }

    /// Mesh of every object in insertion order, building lazily
    pub fn meshes(&mut self) -> Result<Vec<Mesh>> {
        self.objects
            .iter_mut()
            .map(|(_, object)| object.mesh())
            .collect()
    }

    /// Combine every object's mesh and write it as STL
    pub fn export_stl(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.export_with(&StlExporter::new(), path)
    }

    pub fn export_with(&mut self, exporter: &StlExporter, path: impl AsRef<Path>) -> Result<()> {
        let combined = StlExporter::combine_meshes(self.meshes()?)?;
        log::info!(
            "exporting {} scene: {} objects, {} triangles -> {}",
            self.mode,
            self.len(),
            combined.triangle_count(),
            path.as_ref().display()
        );
        exporter.export(&combined, path)
    }
}
