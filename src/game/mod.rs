//! Game Module
//!
//! City generation and the pieces it hands to a renderer, built on top of
//! the engine's physics, world and player modules.

pub mod city;
pub mod config;
pub mod render;
pub mod types;

pub use city::{Building, City, StairsModel, TextureClass, TreasureCorridor, generate_city};
pub use city::{synthesize_corridor_texture, synthesize_facade, synthesize_road_texture};
pub use config::{CityConfig, StairsConfig};
pub use render::{MeshId, RecordingBackend, RenderingBackend, TextureId};
pub use types::{Mesh, Vertex};
