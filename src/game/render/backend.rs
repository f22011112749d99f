//! Rendering Backend Seam
//!
//! The generator produces meshes and bitmaps; drawing them is left to an
//! implementation of [`RenderingBackend`]. [`RecordingBackend`] is a headless
//! implementation that only keeps statistics, used by the demo binary and
//! tests.

use std::collections::BTreeMap;

use image::RgbaImage;

use crate::error::Result;
use crate::game::city::TextureClass;
use crate::game::types::Mesh;
use crate::player::CameraState;

/// Identifies an uploaded mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MeshId {
    /// Building at this index of the renderable list
    Building(usize),
    Roads,
    Stairs,
    Corridor,
}

/// Identifies an uploaded bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TextureId {
    Facade(TextureClass),
    Road,
    Corridor,
}

/// Consumer of generated geometry and camera state.
pub trait RenderingBackend {
    fn upload_mesh(&mut self, id: MeshId, mesh: &Mesh) -> Result<()>;

    fn upload_texture(&mut self, id: TextureId, image: &RgbaImage) -> Result<()>;

    /// Draw one frame from the given point of view.
    fn submit_frame(&mut self, camera: &CameraState) -> Result<()>;
}

/// Sizes of one uploaded mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MeshBufferStats {
    pub vertex_count: u32,
    pub index_count: u32,
    pub byte_size: usize,
}

/// Backend that records what it receives instead of drawing it.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub meshes: BTreeMap<MeshId, MeshBufferStats>,
    pub textures: BTreeMap<TextureId, (u32, u32)>,
    pub frames: Vec<CameraState>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes that would live in vertex and index buffers.
    pub fn total_buffer_bytes(&self) -> usize {
        self.meshes.values().map(|m| m.byte_size).sum()
    }

    pub fn total_triangles(&self) -> u32 {
        self.meshes.values().map(|m| m.index_count / 3).sum()
    }
}

impl RenderingBackend for RecordingBackend {
    fn upload_mesh(&mut self, id: MeshId, mesh: &Mesh) -> Result<()> {
        let stats = MeshBufferStats {
            vertex_count: mesh.vertices.len() as u32,
            index_count: mesh.indices.len() as u32,
            byte_size: mesh.vertex_bytes().len() + mesh.index_bytes().len(),
        };
        self.meshes.insert(id, stats);
        Ok(())
    }

    fn upload_texture(&mut self, id: TextureId, image: &RgbaImage) -> Result<()> {
        self.textures.insert(id, image.dimensions());
        Ok(())
    }

    fn submit_frame(&mut self, camera: &CameraState) -> Result<()> {
        self.frames.push(*camera);
        Ok(())
    }
}
