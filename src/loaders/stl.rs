use anyhow::Result;
use glam::DVec3;
use std::fs;
use std::path::Path;

use crate::error::ModelError;
use crate::export::HEADER_SIZE;
use crate::mesh::Mesh;

const TRIANGLE_SIZE: usize = 50;

/// Load an ASCII or binary STL file
///
/// Each facet gets its own three vertices, as in the file.
pub fn load_stl(path: impl AsRef<Path>) -> Result<Mesh> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| ModelError::io(path, e))?;

    if is_binary(&bytes) {
        parse_binary(path, &bytes)
    } else if bytes.trim_ascii_start().starts_with(b"solid") {
        parse_ascii(path, &String::from_utf8_lossy(&bytes))
    } else {
        Err(ModelError::format(path, "neither ASCII nor binary STL").into())
    }
}

/// Binary when the declared triangle count matches the file size exactly
fn is_binary(bytes: &[u8]) -> bool {
    if bytes.len() < HEADER_SIZE + 4 {
        return false;
    }
    let count = read_u32(&bytes[HEADER_SIZE..]) as usize;
    bytes.len() == HEADER_SIZE + 4 + count * TRIANGLE_SIZE
}

fn read_u32(buf: &[u8]) -> u32 {
    u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]])
}

fn read_vertex(buf: &[u8]) -> DVec3 {
    let c = |i: usize| f32::from_le_bytes([buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]) as f64;
    DVec3::new(c(0), c(4), c(8))
}

fn parse_binary(path: &Path, bytes: &[u8]) -> Result<Mesh> {
    let body = &bytes[HEADER_SIZE + 4..];
    let mut vertices = Vec::with_capacity(body.len() / TRIANGLE_SIZE * 3);
    let mut faces = Vec::with_capacity(body.len() / TRIANGLE_SIZE);

    for record in body.chunks_exact(TRIANGLE_SIZE) {
        // skip the stored normal
        let base = vertices.len() as u32;
        vertices.push(read_vertex(&record[12..24]));
        vertices.push(read_vertex(&record[24..36]));
        vertices.push(read_vertex(&record[36..48]));
        faces.push([base, base + 1, base + 2]);
    }

    Ok(Mesh::new(vertices, faces).map_err(|e| ModelError::format(path, e.to_string()))?)
}

fn parse_ascii(path: &Path, text: &str) -> Result<Mesh> {
    let mut vertices = Vec::new();
    let mut faces = Vec::new();
    let mut corners: Vec<DVec3> = Vec::with_capacity(3);

    for (number, line) in text.lines().enumerate() {
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("outer") => corners.clear(),
            Some("vertex") => {
                let mut coord = || super::parse_f64(path, tokens.next(), number + 1);
                corners.push(DVec3::new(coord()?, coord()?, coord()?));
            }
            Some("endloop") => {
                if corners.len() != 3 {
                    return Err(ModelError::format(
                        path,
                        format!("line {}: facet has {} vertices", number + 1, corners.len()),
                    )
                    .into());
                }
                let base = vertices.len() as u32;
                vertices.append(&mut corners);
                faces.push([base, base + 1, base + 2]);
            }
            Some("endsolid") => break,
            _ => {}
        }
    }

    Ok(Mesh::new(vertices, faces)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{StlExporter, StlFormat};

    fn quad() -> Mesh {
        Mesh::new(
            vec![
                DVec3::new(0.0, 0.0, 0.0),
                DVec3::new(2.0, 0.0, 0.0),
                DVec3::new(2.0, 3.0, 0.0),
                DVec3::new(0.0, 3.0, 1.5),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        )
        .unwrap()
    }

    #[test]
    fn test_binary_round_trip_unwelds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quad.stl");
        StlExporter::new().export(&quad(), &path).unwrap();

        let mesh = load_stl(&path).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.bounds(), quad().bounds());
    }

    #[test]
    fn test_ascii_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quad.stl");
        StlExporter::with_format(StlFormat::Ascii)
            .export(&quad(), &path)
            .unwrap();

        let mesh = load_stl(&path).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertices()[5], DVec3::new(0.0, 3.0, 1.5));
    }

    #[test]
    fn test_binary_header_starting_with_solid() {
        let mut bytes = vec![b' '; HEADER_SIZE];
        bytes[..5].copy_from_slice(b"solid");
        bytes.extend_from_slice(&0u32.to_le_bytes());
        assert!(is_binary(&bytes));
    }

    #[test]
    fn test_garbage_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.stl");
        std::fs::write(&path, b"not a mesh").unwrap();
        assert!(load_stl(&path).is_err());
    }

    #[test]
    fn test_bad_vertex_reports_line() {
        let text = "solid x\nfacet normal 0 0 1\nouter loop\nvertex 0 0 zz\n";
        let err = parse_ascii(Path::new("x.stl"), text).unwrap_err();
        assert!(err.to_string().contains("line 4"));
    }
}
