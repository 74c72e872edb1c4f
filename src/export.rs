//! STL export of combined scene meshes.
//!
//! Binary layout: 80-byte header, `u32` triangle count, then per triangle a
//! facet normal and three vertices as little-endian `f32` triples followed
//! by a `u16` attribute count.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use glam::DVec3;

use crate::error::{ModelError, Result};
use crate::mesh::{concatenate, Mesh};

/// Binary STL header size in bytes
pub const HEADER_SIZE: usize = 80;

const HEADER_TEXT: &[u8] = b"binary STL written by shape-scene";

/// STL dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StlFormat {
    #[default]
    Binary,
    Ascii,
}

/// Merges meshes and writes them as a single STL file
#[derive(Debug, Clone, Copy, Default)]
pub struct StlExporter {
    format: StlFormat,
}

impl StlExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(format: StlFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> StlFormat {
        self.format
    }

    /// Concatenate meshes with index offsetting; vertices are not welded
    pub fn combine_meshes(meshes: Vec<Mesh>) -> Result<Mesh> {
        if meshes.is_empty() {
            return Err(ModelError::EmptyInput("no meshes to combine"));
        }
        Ok(concatenate(meshes))
    }

    /// Write `mesh` to `path`, replacing any existing file
    pub fn export(&self, mesh: &Mesh, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ModelError::io(parent, e))?;
        }

        let file = File::create(path).map_err(|e| ModelError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        let written = match self.format {
            StlFormat::Binary => write_binary(mesh, &mut writer),
            StlFormat::Ascii => write_ascii(mesh, &mut writer),
        };
        written
            .and_then(|_| writer.flush())
            .map_err(|e| ModelError::io(path, e))?;

        log::info!(
            "wrote {} triangles to {} ({:?})",
            mesh.triangle_count(),
            path.display(),
            self.format
        );
        Ok(())
    }
}

fn write_binary<W: Write>(mesh: &Mesh, writer: &mut W) -> std::io::Result<()> {
    let mut header = [b' '; HEADER_SIZE];
    header[..HEADER_TEXT.len()].copy_from_slice(HEADER_TEXT);
    writer.write_all(&header)?;

    let count = u32::try_from(mesh.triangle_count()).map_err(|_| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "too many triangles for binary STL",
        )
    })?;
    writer.write_all(&count.to_le_bytes())?;

    for (normal, tri) in mesh.face_normals().into_iter().zip(mesh.triangles()) {
        write_vec3(writer, normal)?;
        for v in tri {
            write_vec3(writer, v)?;
        }
        writer.write_all(&0u16.to_le_bytes())?;
    }
    Ok(())
}

fn write_vec3<W: Write>(writer: &mut W, v: DVec3) -> std::io::Result<()> {
    for c in v.as_vec3().to_array() {
        writer.write_all(&c.to_le_bytes())?;
    }
    Ok(())
}

fn write_ascii<W: Write>(mesh: &Mesh, writer: &mut W) -> std::io::Result<()> {
    writeln!(writer, "solid shape_scene")?;
    for (n, tri) in mesh.face_normals().into_iter().zip(mesh.triangles()) {
        writeln!(writer, "  facet normal {:e} {:e} {:e}", n.x, n.y, n.z)?;
        writeln!(writer, "    outer loop")?;
        for v in tri {
            writeln!(writer, "      vertex {:e} {:e} {:e}", v.x, v.y, v.z)?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }
    writeln!(writer, "endsolid shape_scene")
}
