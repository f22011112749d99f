//! Game Render Module
//!
//! The boundary between the generated city and whatever draws it.

pub mod backend;

pub use backend::{MeshBufferStats, MeshId, RecordingBackend, RenderingBackend, TextureId};
