//! City Generation
//!
//! Procedural city: building lattice, facades, roads, and the stairs and
//! corridor leading to the hidden treasure.
//!
//! # Submodules
//!
//! - [`layout`] - Plot lattice and treasure selection
//! - [`building`] - Height, tint, texture class and cuboid of one building
//! - [`facade`] - Window bitmaps
//! - [`roads`] - Road strips and the asphalt texture
//! - [`stairs`] - Staircase geometry and floor surfaces
//! - [`corridor`] - Underground corridor and treasure chamber
//! - [`world`] - Assembly of everything into a [`City`]

pub mod building;
pub mod corridor;
pub mod facade;
pub mod layout;
pub mod roads;
pub mod stairs;
pub mod world;

pub use building::{Building, TextureClass, generate_cuboid};
pub use corridor::{TreasureCorridor, synthesize_corridor_texture};
pub use facade::{
    Brightness, WindowGrid, spread_glow, synthesize_all, synthesize_facade, synthesize_facade_sized,
};
pub use layout::{CityLayout, generate_layout, is_on_outer_ring, plot_corners};
pub use roads::{RoadOrientation, RoadStrip, road_layout, synthesize_road_texture};
pub use stairs::StairsModel;
pub use world::{City, generate_city};
