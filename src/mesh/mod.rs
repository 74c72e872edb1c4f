//! Indexed triangle meshes and the operations the modeling layer needs on
//! them: concatenation, rigid transforms, bounds and normals.

mod icosphere;

pub use icosphere::icosphere;

use glam::DVec3;

use crate::error::{ModelError, Result};
use crate::math::Aabb;

/// Triangulated surface: vertex positions plus index triples
///
/// Faces use counter-clockwise winding seen from outside.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    vertices: Vec<DVec3>,
    faces: Vec<[u32; 3]>,
}

impl Mesh {
    /// Build a mesh, rejecting faces that reference missing vertices
    pub fn new(vertices: Vec<DVec3>, faces: Vec<[u32; 3]>) -> Result<Self> {
        let count = vertices.len();
        if let Some(face) = faces
            .iter()
            .find(|face| face.iter().any(|&i| i as usize >= count))
        {
            return Err(ModelError::mesh(format!(
                "face {:?} references a vertex outside 0..{}",
                face, count
            )));
        }
        Ok(Self { vertices, faces })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    pub fn vertices_mut(&mut self) -> &mut [DVec3] {
        &mut self.vertices
    }

    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Corner positions of every face, in face order
    pub fn triangles(&self) -> impl Iterator<Item = [DVec3; 3]> + '_ {
        self.faces.iter().map(move |&[a, b, c]| {
            [
                self.vertices[a as usize],
                self.vertices[b as usize],
                self.vertices[c as usize],
            ]
        })
    }

    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(&self.vertices)
    }

    /// Area-weighted centroid of the surface
    ///
    /// Falls back to the vertex average when every face is degenerate.
    pub fn centroid(&self) -> DVec3 {
        let (weighted, total_area) = self.triangles().fold(
            (DVec3::ZERO, 0.0),
            |(sum, area), [a, b, c]| {
                let tri_area = (b - a).cross(c - a).length() * 0.5;
                (sum + (a + b + c) / 3.0 * tri_area, area + tri_area)
            },
        );

        if total_area > f64::EPSILON {
            weighted / total_area
        } else if self.vertices.is_empty() {
            DVec3::ZERO
        } else {
            self.vertices.iter().copied().sum::<DVec3>() / self.vertices.len() as f64
        }
    }

    /// Unit normal of each face; degenerate faces get a zero vector
    pub fn face_normals(&self) -> Vec<DVec3> {
        self.triangles()
            .map(|[a, b, c]| (b - a).cross(c - a).normalize_or_zero())
            .collect()
    }

    /// Area-weighted vertex normals
    pub fn vertex_normals(&self) -> Vec<DVec3> {
        let mut normals = vec![DVec3::ZERO; self.vertices.len()];
        for (face, [a, b, c]) in self.faces.iter().zip(self.triangles()) {
            let n = (b - a).cross(c - a);
            for &i in face {
                normals[i as usize] += n;
            }
        }
        normals.iter_mut().for_each(|n| *n = n.normalize_or_zero());
        normals
    }

    pub fn translate(&mut self, offset: DVec3) {
        self.vertices.iter_mut().for_each(|v| *v += offset);
    }

    /// Copy of this mesh with every vertex scaled about the origin
    pub fn scaled(&self, factor: f64) -> Mesh {
        Mesh {
            vertices: self.vertices.iter().map(|v| *v * factor).collect(),
            faces: self.faces.clone(),
        }
    }

    /// Append another mesh, offsetting its indices; coincident vertices are kept
    pub fn append(&mut self, other: Mesh) {
        let offset = self.vertices.len() as u32;
        self.vertices.extend(other.vertices);
        self.faces.extend(
            other
                .faces
                .into_iter()
                .map(|[a, b, c]| [a + offset, b + offset, c + offset]),
        );
    }
}

/// Union several meshes into one without welding shared vertices
pub fn concatenate(meshes: impl IntoIterator<Item = Mesh>) -> Mesh {
    meshes.into_iter().fold(Mesh::empty(), |mut acc, mesh| {
        acc.append(mesh);
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_triangle() -> Mesh {
        Mesh::new(
            vec![DVec3::ZERO, DVec3::X, DVec3::Y],
            vec![[0, 1, 2]],
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_out_of_range_index() {
        let result = Mesh::new(vec![DVec3::ZERO, DVec3::X], vec![[0, 1, 2]]);
        assert!(matches!(result, Err(ModelError::Mesh(_))));
    }

    #[test]
    fn test_concatenate_offsets_indices() {
        let mut second = unit_triangle();
        second.translate(DVec3::Z);

        let combined = concatenate([unit_triangle(), second]);

        assert_eq!(combined.vertex_count(), 6);
        assert_eq!(combined.triangle_count(), 2);
        assert_eq!(combined.faces()[1], [3, 4, 5]);
        assert_eq!(combined.vertices()[3], DVec3::Z);
    }

    #[test]
    fn test_concatenate_keeps_coincident_vertices() {
        let combined = concatenate([unit_triangle(), unit_triangle()]);
        assert_eq!(combined.vertex_count(), 6);
        assert_eq!(combined.vertices()[0], combined.vertices()[3]);
    }

    #[test]
    fn test_face_normal_points_along_z() {
        let normals = unit_triangle().face_normals();
        assert_relative_eq!(normals[0].z, 1.0);
    }

    #[test]
    fn test_vertex_normals_are_unit_length() {
        let normals = icosphere(1, 1.0).unwrap().vertex_normals();
        for n in normals {
            assert_relative_eq!(n.length(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_centroid_of_triangle() {
        let c = unit_triangle().centroid();
        assert_relative_eq!(c.x, 1.0 / 3.0);
        assert_relative_eq!(c.y, 1.0 / 3.0);
    }

    #[test]
    fn test_scaled_keeps_faces() {
        let mesh = unit_triangle();
        let outline = mesh.scaled(2.0);
        assert_eq!(outline.faces(), mesh.faces());
        assert_eq!(outline.vertices()[1], DVec3::new(2.0, 0.0, 0.0));
    }
}
