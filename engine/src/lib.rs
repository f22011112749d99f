//! RandCity Engine Library
//!
//! Procedural city generation and first-person movement. The library produces
//! meshes, bitmaps and collision data; drawing them is left to an
//! implementation of [`game::RenderingBackend`].
//!
//! # Modules
//!
//! - [`world`] - Grid configuration and the seeded random source
//! - [`physics`] - Boxes, restricted areas and floor surfaces
//! - [`player`] - Movement controller with sliding collision and the treasure event
//! - [`game`] - City generators, configuration and the rendering seam
//! - [`error`] - Error type shared by all of the above
//!
//! # Example
//!
//! ```ignore
//! use randcity_engine::game::{CityConfig, RecordingBackend, generate_city};
//! use randcity_engine::player::{MoveDirection, PlayerMovementController};
//!
//! let city = generate_city(&CityConfig::default(), Some(42))?;
//! let mut backend = RecordingBackend::new();
//! city.upload(&mut backend)?;
//!
//! let mut controller = PlayerMovementController::new(city.walk_world());
//! controller.on_treasure_found(|eye| println!("treasure at {eye}"));
//! let outcome = controller.step(MoveDirection::Forward);
//! if !outcome.free {
//!     // bumped into a building or the city edge
//! }
//! ```

pub mod error;
pub mod physics;
pub mod player;
pub mod world;

// Game-specific modules (located in src/game/ directory)
#[path = "../../src/game/mod.rs"]
pub mod game;

pub use error::{CityError, Result};
// Re-export world types for convenience
pub use world::{CityRng, GridConfig, clamp_to_map};
// Re-export player types
pub use player::{MoveOutcome, PlayerMovementController, PlayerZone};
