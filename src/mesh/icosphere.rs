use std::collections::HashMap;

use glam::DVec3;

use super::Mesh;
use crate::error::{ModelError, Result};

/// Highest subdivision level accepted (20 * 4^8 = 1,310,720 faces)
pub const MAX_SUBDIVISIONS: u32 = 8;

const ICOSAHEDRON_FACES: [[u32; 3]; 20] = [
    [0, 1, 2],
    [3, 2, 1],
    [3, 4, 5],
    [3, 8, 4],
    [0, 6, 7],
    [0, 9, 6],
    [4, 10, 11],
    [6, 11, 10],
    [2, 5, 9],
    [11, 9, 5],
    [1, 7, 8],
    [10, 8, 7],
    [3, 5, 2],
    [3, 1, 8],
    [0, 2, 9],
    [0, 7, 1],
    [6, 9, 11],
    [6, 10, 7],
    [4, 11, 5],
    [4, 8, 10],
];

/// Geodesic sphere: an icosahedron split `subdivisions` times, every vertex
/// projected onto the sphere of `radius`
///
/// Produces `10 * 4^n + 2` vertices and `20 * 4^n` faces.
pub fn icosphere(subdivisions: u32, radius: f64) -> Result<Mesh> {
    if !radius.is_finite() || radius <= 0.0 {
        return Err(ModelError::mesh(format!(
            "icosphere radius must be positive: {}",
            radius
        )));
    }
    if subdivisions > MAX_SUBDIVISIONS {
        return Err(ModelError::mesh(format!(
            "icosphere subdivisions must be at most {}: {}",
            MAX_SUBDIVISIONS, subdivisions
        )));
    }

    let phi = (1.0 + 5.0_f64.sqrt()) * 0.5;
    let (a, b) = (1.0, 1.0 / phi);

    let mut vertices: Vec<DVec3> = [
        [0.0, b, -a],
        [b, a, 0.0],
        [-b, a, 0.0],
        [0.0, b, a],
        [0.0, -b, a],
        [-a, 0.0, b],
        [0.0, -b, -a],
        [a, 0.0, -b],
        [a, 0.0, b],
        [-a, 0.0, -b],
        [b, -a, 0.0],
        [-b, -a, 0.0],
    ]
    .iter()
    .map(|v| DVec3::from_array(*v).normalize())
    .collect();

    // The table above winds inward; flip to counter-clockwise from outside
    let mut faces: Vec<[u32; 3]> = ICOSAHEDRON_FACES
        .iter()
        .map(|&[i, j, k]| [i, k, j])
        .collect();

    for _ in 0..subdivisions {
        faces = subdivide(&mut vertices, &faces);
    }

    vertices.iter_mut().for_each(|v| *v *= radius);
    Mesh::new(vertices, faces)
}

fn subdivide(vertices: &mut Vec<DVec3>, faces: &[[u32; 3]]) -> Vec<[u32; 3]> {
    let mut midpoints: HashMap<(u32, u32), u32> = HashMap::with_capacity(faces.len() * 3 / 2);
    let mut split = Vec::with_capacity(faces.len() * 4);

    for &[v0, v1, v2] in faces {
        let m01 = midpoint(v0, v1, vertices, &mut midpoints);
        let m12 = midpoint(v1, v2, vertices, &mut midpoints);
        let m20 = midpoint(v2, v0, vertices, &mut midpoints);

        split.push([v0, m01, m20]);
        split.push([v1, m12, m01]);
        split.push([v2, m20, m12]);
        split.push([m01, m12, m20]);
    }

    split
}

fn midpoint(
    a: u32,
    b: u32,
    vertices: &mut Vec<DVec3>,
    midpoints: &mut HashMap<(u32, u32), u32>,
) -> u32 {
    let key = if a < b { (a, b) } else { (b, a) };
    *midpoints.entry(key).or_insert_with(|| {
        let mid = ((vertices[a as usize] + vertices[b as usize]) * 0.5).normalize();
        vertices.push(mid);
        (vertices.len() - 1) as u32
    })
}
