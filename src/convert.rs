use glam::DVec3;
use truck_meshalgo::prelude::PolygonMesh;

use crate::error::{ModelError, Result};
use crate::kernel::{Solid, Tolerance};
use crate::mesh::Mesh;

/// Tessellate a solid and hand the result to the mesh engine
pub fn solid_to_mesh(solid: &Solid, tolerance: Tolerance) -> Result<Mesh> {
    let polygon = solid.tessellate(tolerance)?;
    let mesh = polygon_to_mesh(&polygon)?;
    log::debug!(
        "tessellated solid: {} points, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    if mesh.is_empty() {
        return Err(ModelError::kernel("tessellation produced no triangles"));
    }
    Ok(mesh)
}

/// Kernel points become mesh vertices; polygons are split into triangles
fn polygon_to_mesh(polygon: &PolygonMesh) -> Result<Mesh> {
    let faces = polygon
        .faces()
        .triangle_iter()
        .map(|[a, b, c]| [a.pos as u32, b.pos as u32, c.pos as u32])
        .collect();
    mesh_from_points(
        polygon.positions().iter().map(|p| [p.x, p.y, p.z]),
        faces,
    )
}

/// Build a mesh from any point representation convertible to `DVec3`
pub fn mesh_from_points<P: Into<DVec3>>(
    points: impl IntoIterator<Item = P>,
    faces: Vec<[u32; 3]>,
) -> Result<Mesh> {
    Mesh::new(points.into_iter().map(Into::into).collect(), faces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::Workplane;
    use std::collections::HashMap;

    /// Every undirected edge is shared by exactly two faces
    fn is_closed(mesh: &Mesh) -> bool {
        let mut edges: HashMap<(u32, u32), usize> = HashMap::new();
        for &[a, b, c] in mesh.faces() {
            for (u, v) in [(a, b), (b, c), (c, a)] {
                *edges.entry((u.min(v), u.max(v))).or_default() += 1;
            }
        }
        edges.values().all(|&n| n == 2)
    }

    #[test]
    fn test_array_and_vector_points_agree() {
        let faces = vec![[0, 1, 2]];
        let from_arrays = mesh_from_points(
            [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            faces.clone(),
        )
        .unwrap();
        let from_vectors = mesh_from_points([DVec3::ZERO, DVec3::X, DVec3::Y], faces).unwrap();
        assert_eq!(from_arrays, from_vectors);
    }

    #[test]
    fn test_box_mesh_is_twelve_closed_triangles() {
        let solid = Workplane::xy().cuboid(1.0, 1.0, 1.0).unwrap();
        let mesh = solid_to_mesh(&solid, Tolerance::FINE).unwrap();
        assert_eq!(mesh.triangle_count(), 12);
        assert!(is_closed(&mesh));
        for v in mesh.vertices() {
            assert!((v.abs() - DVec3::splat(0.5)).abs().max_element() < 1e-9);
        }
    }

    #[test]
    fn test_cylinder_mesh_is_closed() {
        let cylinder = Workplane::xy().cylinder(4.0, 1.0).unwrap();
        assert!(is_closed(&solid_to_mesh(&cylinder, Tolerance::FINE).unwrap()));
    }

    #[test]
    fn test_finer_tolerance_adds_triangles() {
        let solid = Workplane::xy().sphere(10.0).unwrap();
        let coarse = solid_to_mesh(&solid, Tolerance::COARSE).unwrap();
        let fine = solid_to_mesh(&solid, Tolerance::FINE).unwrap();
        assert!(fine.triangle_count() > coarse.triangle_count());
    }

    #[test]
    fn test_invalid_tolerance_rejected() {
        let solid = Workplane::xy().sphere(1.0).unwrap();
        assert!(solid_to_mesh(&solid, Tolerance::new(0.0)).is_err());
    }

    #[test]
    fn test_large_sphere_respects_deflection() {
        let radius = 1_000.0;
        let tolerance = Tolerance::FINE;
        let solid = Workplane::xy().sphere(radius).unwrap();
        let mesh = solid_to_mesh(&solid, tolerance).unwrap();

        let worst = mesh
            .triangles()
            .map(|[a, b, c]| radius - ((a + b + c) / 3.0).length())
            .fold(0.0_f64, f64::max);
        assert!(
            worst <= tolerance.deflection(),
            "centroid deviation {} exceeds {}",
            worst,
            tolerance.deflection()
        );
    }
}
