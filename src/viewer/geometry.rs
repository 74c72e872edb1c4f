//! CPU-side vertex data uploaded by the renderer.

use glam::DVec3;
use std::collections::HashSet;

use crate::mesh::Mesh;

/// Outline scale relative to the model
pub const OUTLINE_SCALE: f64 = 1.02;

const OUTLINE_COLOR: [f32; 3] = [0.0, 0.0, 0.0];

/// Shaded mesh vertex
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl MeshVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Unlit colored line vertex
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl LineVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Positions with smooth normals; vertices without faces point up
pub fn mesh_vertices(mesh: &Mesh) -> Vec<MeshVertex> {
    mesh.vertices()
        .iter()
        .zip(mesh.vertex_normals())
        .map(|(p, n)| MeshVertex {
            position: p.as_vec3().to_array(),
            normal: if n == DVec3::ZERO { DVec3::Z } else { n }.as_vec3().to_array(),
        })
        .collect()
}

pub fn triangle_indices(mesh: &Mesh) -> Vec<u32> {
    mesh.faces().iter().flatten().copied().collect()
}

/// Black wireframe of the mesh scaled about the origin
///
/// Returns line vertices and a line-list index buffer with shared edges
/// listed once.
pub fn outline(mesh: &Mesh) -> (Vec<LineVertex>, Vec<u32>) {
    let scaled = mesh.scaled(OUTLINE_SCALE);
    let vertices = scaled
        .vertices()
        .iter()
        .map(|p| LineVertex {
            position: p.as_vec3().to_array(),
            color: OUTLINE_COLOR,
        })
        .collect();

    let mut seen = HashSet::new();
    let mut indices = Vec::new();
    for &[a, b, c] in scaled.faces() {
        for (u, v) in [(a, b), (b, c), (c, a)] {
            if seen.insert((u.min(v), u.max(v))) {
                indices.extend([u, v]);
            }
        }
    }
    (vertices, indices)
}

/// X (red), Y (green) and Z (blue) axes from `origin`
pub fn axes(origin: DVec3, length: f64) -> Vec<LineVertex> {
    let o = origin.as_vec3().to_array();
    [
        (DVec3::X, [1.0, 0.0, 0.0]),
        (DVec3::Y, [0.0, 1.0, 0.0]),
        (DVec3::Z, [0.0, 0.0, 1.0]),
    ]
    .into_iter()
    .flat_map(|(axis, color)| {
        [
            LineVertex { position: o, color },
            LineVertex {
                position: (origin + axis * length).as_vec3().to_array(),
                color,
            },
        ]
    })
    .collect()
}
