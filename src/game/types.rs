//! Shared Types Module
//!
//! Vertex layout and mesh container shared by every generated shape
//! (buildings, roads, stairs, corridor).

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use static_assertions::const_assert_eq;

// ============================================================================
// GPU VERTEX TYPES
// ============================================================================

/// Vertex for buildings, roads and the treasure area
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coord: [f32; 2],
}

// position + normal + tex_coord, tightly packed for vertex buffer upload
const_assert_eq!(std::mem::size_of::<Vertex>(), 32);

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3, tex_coord: [f32; 2]) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            tex_coord,
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

// ============================================================================
// MESH STRUCTURE
// ============================================================================

/// A triangle mesh with vertices and indices
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge(&mut self, other: &Mesh) {
        let base_idx = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|i| i + base_idx));
    }

    /// Append a quad as two triangles `(0, 1, 2)` and `(0, 2, 3)`.
    ///
    /// Corners are given counter-clockwise when seen from the side `normal`
    /// points to.
    pub fn push_quad(&mut self, corners: [Vec3; 4], normal: Vec3, tex_coords: [[f32; 2]; 4]) {
        let base = self.vertices.len() as u32;
        for (corner, uv) in corners.iter().zip(tex_coords) {
            self.vertices.push(Vertex::new(*corner, normal, uv));
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Triangles in draw order, as vertex triples.
    pub fn triangles(&self) -> impl Iterator<Item = [&Vertex; 3]> {
        self.indices.chunks_exact(3).map(|tri| {
            [
                &self.vertices[tri[0] as usize],
                &self.vertices[tri[1] as usize],
                &self.vertices[tri[2] as usize],
            ]
        })
    }

    /// Raw vertex bytes for buffer upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw index bytes for buffer upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Smallest box containing every vertex, `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = self.vertices.first()?.position();
        Some(self.vertices.iter().fold((first, first), |(min, max), v| {
            (min.min(v.position()), max.max(v.position()))
        }))
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Copy of a mesh built along local +X, moved to `origin` and pointed
    /// along `+X` (`direction > 0`) or `-X` (`direction < 0`).
    ///
    /// Mirroring flips the triangle winding, so each triangle is reversed to
    /// keep front faces on the normal side.
    pub fn placed_along_x(&self, origin: Vec3, direction: f32) -> Mesh {
        let sign = if direction < 0.0 { -1.0 } else { 1.0 };
        let vertices = self
            .vertices
            .iter()
            .map(|v| {
                let p = v.position();
                let n = Vec3::from_array(v.normal);
                Vertex::new(
                    Vec3::new(origin.x + sign * p.x, origin.y + p.y, origin.z + p.z),
                    Vec3::new(sign * n.x, n.y, n.z),
                    v.tex_coord,
                )
            })
            .collect();

        let mut indices = self.indices.clone();
        if sign < 0.0 {
            for tri in indices.chunks_exact_mut(3) {
                tri.swap(1, 2);
            }
        }
        Mesh { vertices, indices }
    }
}

/// Texture coordinates covering the whole bitmap, matching `push_quad`
/// corner order (bottom-left, bottom-right, top-right, top-left).
pub const FULL_QUAD_UV: [[f32; 2]; 4] = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

/// Degenerate texture coordinates for untextured faces.
pub const NO_UV: [[f32; 2]; 4] = [[0.0, 0.0]; 4];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_quad_indices() {
        let mut mesh = Mesh::new();
        let corners = [Vec3::ZERO, Vec3::X, Vec3::X + Vec3::Y, Vec3::Y];
        mesh.push_quad(corners, Vec3::Z, FULL_QUAD_UV);
        mesh.push_quad(corners, Vec3::Z, FULL_QUAD_UV);

        assert_eq!(mesh.vertices.len(), 8);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7]);
        assert_eq!(mesh.triangle_count(), 4);
    }

    #[test]
    fn test_merge_offsets_indices() {
        let mut a = Mesh::new();
        a.push_quad([Vec3::ZERO; 4], Vec3::Y, NO_UV);
        let b = a.clone();
        a.merge(&b);
        assert_eq!(a.indices[6..], [4, 5, 6, 4, 6, 7]);
    }

    #[test]
    fn test_byte_views() {
        let mut mesh = Mesh::new();
        mesh.push_quad([Vec3::ZERO; 4], Vec3::Y, NO_UV);
        assert_eq!(mesh.vertex_bytes().len(), 4 * 32);
        assert_eq!(mesh.index_bytes().len(), 6 * 4);
    }

    #[test]
    fn test_placed_along_negative_x_mirrors() {
        let mut mesh = Mesh::new();
        mesh.push_quad(
            [Vec3::ZERO, Vec3::X, Vec3::X + Vec3::Y, Vec3::Y],
            Vec3::X,
            NO_UV,
        );
        let placed = mesh.placed_along_x(Vec3::new(10.0, -1.0, 5.0), -1.0);

        assert_eq!(placed.vertices[1].position, [9.0, -1.0, 5.0]);
        assert_eq!(placed.vertices[0].normal, [-1.0, 0.0, 0.0]);
        assert_eq!(placed.indices[..3], [0, 2, 1]);

        let forward = mesh.placed_along_x(Vec3::ZERO, 1.0);
        assert_eq!(forward, mesh);
    }

    #[test]
    fn test_bounds() {
        let mut mesh = Mesh::new();
        assert!(mesh.bounds().is_none());
        mesh.push_quad(
            [
                Vec3::new(-1.0, 0.0, 2.0),
                Vec3::new(3.0, 0.0, 2.0),
                Vec3::new(3.0, 5.0, 2.0),
                Vec3::new(-1.0, 5.0, 2.0),
            ],
            Vec3::Z,
            FULL_QUAD_UV,
        );
        let (min, max) = mesh.bounds().unwrap();
        assert_eq!(min, Vec3::new(-1.0, 0.0, 2.0));
        assert_eq!(max, Vec3::new(3.0, 5.0, 2.0));
    }
}
