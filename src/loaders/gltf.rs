use anyhow::{Context, Result};
use glam::{DMat4, DVec3};
use std::path::Path;

use crate::mesh::Mesh;

/// Loads a glTF/GLB file and flattens every mesh primitive into one mesh
///
/// Node transforms are applied; non-triangle primitives are skipped.
pub fn load_gltf(path: impl AsRef<Path>) -> Result<Mesh> {
    let path = path.as_ref();
    let (gltf, buffers, _images) =
        gltf::import(path).context(format!("Failed to load glTF file: {:?}", path))?;

    log::debug!(
        "glTF {:?}: {} scenes, {} nodes, {} meshes",
        path,
        gltf.scenes().count(),
        gltf.nodes().count(),
        gltf.meshes().count()
    );

    let mut mesh = Mesh::empty();
    for scene in gltf.scenes() {
        for node in scene.nodes() {
            process_node(&node, &buffers, &DMat4::IDENTITY, &mut mesh)?;
        }
    }

    Ok(mesh)
}

/// Recursively accumulates node geometry in world space
fn process_node(
    node: &gltf::Node,
    buffers: &[gltf::buffer::Data],
    parent_transform: &DMat4,
    out: &mut Mesh,
) -> Result<()> {
    let local = glam::Mat4::from_cols_array_2d(&node.transform().matrix()).as_dmat4();
    let global = *parent_transform * local;

    if let Some(mesh) = node.mesh() {
        process_mesh(&mesh, buffers, &global, out)?;
    }

    for child in node.children() {
        process_node(&child, buffers, &global, out)?;
    }

    Ok(())
}

fn process_mesh(
    mesh: &gltf::Mesh,
    buffers: &[gltf::buffer::Data],
    transform: &DMat4,
    out: &mut Mesh,
) -> Result<()> {
    for primitive in mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            log::warn!(
                "skipping {:?} primitive in mesh {:?}",
                primitive.mode(),
                mesh.name()
            );
            continue;
        }

        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|d| &d.0[..]));
        let vertices: Vec<DVec3> = reader
            .read_positions()
            .context("Mesh primitive has no positions")?
            .map(|p| transform.transform_point3(glam::Vec3::from_array(p).as_dvec3()))
            .collect();

        let indices: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            // No indices - treat as triangle list
            None => (0..vertices.len() as u32).collect(),
        };
        let faces = indices
            .chunks_exact(3)
            .map(|t| [t[0], t[1], t[2]])
            .collect();

        out.append(Mesh::new(vertices, faces).context("Invalid glTF primitive indices")?);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Single triangle with the buffer embedded as a data URI, under a
    /// node translated by +2 on X
    const TRIANGLE_GLTF: &str = r#"{
      "asset": {"version": "2.0"},
      "scene": 0,
      "scenes": [{"nodes": [0]}],
      "nodes": [{"mesh": 0, "translation": [2.0, 0.0, 0.0]}],
      "meshes": [{"primitives": [{"attributes": {"POSITION": 0}}]}],
      "accessors": [{
        "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
        "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]
      }],
      "bufferViews": [{"buffer": 0, "byteLength": 36}],
      "buffers": [{
        "byteLength": 36,
        "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAA"
      }]
    }"#;

    #[test]
    fn test_node_transform_applied() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tri.gltf");
        std::fs::write(&path, TRIANGLE_GLTF).unwrap();

        let mesh = load_gltf(&path).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
        let bounds = mesh.bounds().unwrap();
        assert_eq!(bounds.min, DVec3::new(2.0, 0.0, 0.0));
        assert_eq!(bounds.max, DVec3::new(3.0, 1.0, 0.0));
    }

    #[test]
    fn test_missing_file() {
        assert!(load_gltf("does/not/exist.gltf").is_err());
    }
}
