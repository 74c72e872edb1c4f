//! Mesh file import for the viewer.
//!
//! Every loader flattens its input into a single [`Mesh`].

pub mod gltf;
pub mod obj;
pub mod off;
pub mod stl;

use anyhow::{Context, Result};
use std::path::Path;

use crate::error::ModelError;
use crate::mesh::Mesh;

pub use self::gltf::load_gltf;
pub use self::obj::load_obj;
pub use self::off::load_off;
pub use self::stl::load_stl;

/// File extensions accepted by [`load_mesh`]
pub const SUPPORTED_EXTENSIONS: &[&str] = &["stl", "obj", "off", "gltf", "glb"];

/// Load a mesh, choosing the loader from the file extension
pub fn load_mesh(path: impl AsRef<Path>) -> Result<Mesh> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let mesh = match extension.as_str() {
        "stl" => load_stl(path),
        "obj" => load_obj(path),
        "off" => load_off(path),
        "gltf" | "glb" => load_gltf(path),
        _ => Err(ModelError::format(
            path,
            format!(
                "unsupported extension '{}', expected one of {:?}",
                extension, SUPPORTED_EXTENSIONS
            ),
        )
        .into()),
    }
    .with_context(|| format!("Failed to load mesh: {:?}", path))?;

    log::info!(
        "loaded {:?}: {} vertices, {} triangles",
        path,
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Parse a whitespace separated float, naming the file on failure
pub(crate) fn parse_f64(path: &Path, token: Option<&str>, line: usize) -> Result<f64> {
    let token =
        token.ok_or_else(|| ModelError::format(path, format!("line {}: missing number", line)))?;
    token.parse::<f64>().map_err(|_| {
        ModelError::format(path, format!("line {}: invalid number '{}'", line, token)).into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn unsupported_extension_fails() {
        let err = load_mesh("model.ply").unwrap_err();
        assert!(err.root_cause().to_string().contains("unsupported extension"));
    }

    #[test]
    fn dispatches_on_uppercase_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("TRI.OFF");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "OFF\n3 1 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1 2").unwrap();
        drop(file);

        let mesh = load_mesh(&path).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
    }
}
