use anyhow::Result;
use glam::DVec3;
use std::fs;
use std::path::Path;

use super::parse_f64;
use crate::error::ModelError;
use crate::mesh::Mesh;

/// Load an Object File Format (OFF) mesh
pub fn load_off(path: impl AsRef<Path>) -> Result<Mesh> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| ModelError::io(path, e))?;
    parse_off(path, &text)
}

fn parse_off(path: &Path, text: &str) -> Result<Mesh> {
    // Non-empty lines with comments stripped, keeping 1-based line numbers
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.split('#').next().unwrap_or("").trim()))
        .filter(|(_, l)| !l.is_empty());

    let (number, header) = lines
        .next()
        .ok_or_else(|| ModelError::format(path, "empty file"))?;
    let counts_inline = header.strip_prefix("OFF").ok_or_else(|| {
        ModelError::format(path, format!("line {}: missing OFF header", number))
    })?;

    let (number, counts) = if counts_inline.trim().is_empty() {
        lines
            .next()
            .ok_or_else(|| ModelError::format(path, "missing element counts"))?
    } else {
        (number, counts_inline.trim())
    };
    let mut counts = counts.split_whitespace();
    let vertex_count = parse_f64(path, counts.next(), number)? as usize;
    let face_count = parse_f64(path, counts.next(), number)? as usize;

    let mut vertices = Vec::with_capacity(vertex_count);
    for _ in 0..vertex_count {
        let (number, line) = lines
            .next()
            .ok_or_else(|| ModelError::format(path, "truncated vertex list"))?;
        let mut tokens = line.split_whitespace();
        let mut coord = || parse_f64(path, tokens.next(), number);
        vertices.push(DVec3::new(coord()?, coord()?, coord()?));
    }

    let mut faces = Vec::with_capacity(face_count);
    for _ in 0..face_count {
        let (number, line) = lines
            .next()
            .ok_or_else(|| ModelError::format(path, "truncated face list"))?;
        let mut tokens = line.split_whitespace();
        let n = parse_f64(path, tokens.next(), number)? as usize;
        let polygon = (0..n)
            .map(|_| parse_f64(path, tokens.next(), number).map(|v| v as u32))
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

    Ok(Mesh::new(vertices, faces)?)
}
