//! Triangle meshes with per-vertex colors.
//!
//! Only boxes are needed: the columns and the glass cube. A box is built from
//! six independent faces (24 vertices, 12 triangles) so each face keeps its
//! own flat normal.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::color::lerp;

/// Vertex layout shared with the mesh render pipeline.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    /// Linear RGBA.
    pub color: [f32; 4],
}

/// Indexed triangle list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

/// Face normal plus the two in-plane axes, ordered so `u × v = normal`.
const BOX_FACES: [(Vec3, Vec3, Vec3); 6] = [
    (Vec3::X, Vec3::NEG_Z, Vec3::Y),
    (Vec3::NEG_X, Vec3::Z, Vec3::Y),
    (Vec3::Y, Vec3::X, Vec3::NEG_Z),
    (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    (Vec3::Z, Vec3::X, Vec3::Y),
    (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
];

impl Mesh {
    /// Box of the given dimensions centered at the origin, filled with one color.
    pub fn cuboid(width: f32, height: f32, depth: f32, color: [f32; 4]) -> Self {
        let half = Vec3::new(width, height, depth) * 0.5;
        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        for (normal, u, v) in BOX_FACES {
            let base = vertices.len() as u32;
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let corner = (normal + u * su + v * sv) * half;
                vertices.push(MeshVertex {
                    position: corner.to_array(),
                    normal: normal.to_array(),
                    color,
                });
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self { vertices, indices }
    }

    /// Recolor every vertex by its height within the mesh: `bottom` at the
    /// lowest vertex, `top` at the highest, linear in between. Alpha is kept.
    pub fn with_vertical_gradient(mut self, bottom: Vec3, top: Vec3) -> Self {
        let (min_y, max_y) = self.vertical_extent();
        let span = max_y - min_y;
        for vertex in &mut self.vertices {
            let t = if span > 0.0 {
                (vertex.position[1] - min_y) / span
            } else {
                0.0
            };
            let rgb = lerp(bottom, top, t);
            vertex.color = [rgb.x, rgb.y, rgb.z, vertex.color[3]];
        }
        self
    }

    /// Move every vertex by `offset`.
    pub fn translated(mut self, offset: Vec3) -> Self {
        for vertex in &mut self.vertices {
            vertex.position = (Vec3::from(vertex.position) + offset).to_array();
        }
        self
    }

    /// Copy of this mesh with `transform` applied. Normals are rotated and
    /// renormalized, which is exact for rigid transforms.
    pub fn transformed(&self, transform: Mat4) -> Self {
        let vertices = self
            .vertices
            .iter()
            .map(|v| MeshVertex {
                position: transform.transform_point3(Vec3::from(v.position)).to_array(),
                normal: transform
                    .transform_vector3(Vec3::from(v.normal))
                    .normalize_or_zero()
                    .to_array(),
                color: v.color,
            })
            .collect();
        Self {
            vertices,
            indices: self.indices.clone(),
        }
    }

    /// Append another mesh, rebasing its indices.
    pub fn append(&mut self, other: &Mesh) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    /// Lowest and highest Y over all vertices, `(0, 0)` when empty.
    pub fn vertical_extent(&self) -> (f32, f32) {
        if self.vertices.is_empty() {
            return (0.0, 0.0);
        }
        self.vertices
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v.position[1]), hi.max(v.position[1]))
            })
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}
