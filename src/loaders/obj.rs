use anyhow::Result;
use glam::DVec3;
use std::fs;
use std::path::Path;

use super::parse_f64;
use crate::error::ModelError;
use crate::mesh::Mesh;

/// Load the geometry of a Wavefront OBJ file
///
/// Only `v` and `f` records are read. Polygons are fan-triangulated and
/// negative (relative) indices are resolved.
pub fn load_obj(path: impl AsRef<Path>) -> Result<Mesh> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| ModelError::io(path, e))?;
    parse_obj(path, &text)
}

fn parse_obj(path: &Path, text: &str) -> Result<Mesh> {
    let mut vertices: Vec<DVec3> = Vec::new();
    let mut faces = Vec::new();

    for (number, line) in text.lines().enumerate() {
        let number = number + 1;
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("v") => {
                let mut coord = || parse_f64(path, tokens.next(), number);
                vertices.push(DVec3::new(coord()?, coord()?, coord()?));
            }
            Some("f") => {
                let polygon = tokens
                    .map(|t| resolve_index(path, t, vertices.len(), number))
                    .collect::<Result<Vec<u32>>>()?;
                if polygon.len() < 3 {
                    return Err(ModelError::format(
                        path,
                        format!("line {}: face needs at least 3 vertices", number),
                    )
                    .into());
                }
                faces.extend((1..polygon.len() - 1).map(|i| [polygon[0], polygon[i], polygon[i + 1]]));
            }
            _ => {}
        }
    }

    Ok(Mesh::new(vertices, faces)?)
}

/// Resolve `i`, `i/t`, `i/t/n` or `i//n` to a zero-based vertex index
fn resolve_index(path: &Path, token: &str, count: usize, line: usize) -> Result<u32> {
    let invalid = || ModelError::format(path, format!("line {}: invalid face index '{}'", line, token));
    let raw: i64 = token
        .split('/')
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(invalid)?;

    let index = match raw {
        0 => return Err(invalid().into()),
        r if r > 0 => r - 1,
        r => count as i64 + r,
    };
    if index < 0 || index as usize >= count {
        return Err(invalid().into());
    }
    Ok(index as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUBE_FACE: &str = "\
# one quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vn 0 0 1
f 1/1/1 2/2/1 3/3/1 4/4/1
";

    #[test]
    fn test_quad_is_fanned() {
        let mesh = parse_obj(Path::new("q.obj"), CUBE_FACE).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.faces(), &[[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn test_negative_indices() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n";
        let mesh = parse_obj(Path::new("n.obj"), text).unwrap();
        assert_eq!(mesh.faces(), &[[0, 1, 2]]);
    }

    #[test]
    fn test_out_of_range_index() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 4\n";
        assert!(parse_obj(Path::new("bad.obj"), text).is_err());
    }
}
