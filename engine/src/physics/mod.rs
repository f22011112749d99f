//! Physics module
//!
//! Collision volumes and walkable surfaces for the first-person walk through
//! the generated city. There is no dynamics here: the player moves by explicit
//! deltas and the world only answers containment queries.
//!
//! # Unit System
//!
//! World units are arbitrary but shared by buildings, roads and the grid. With
//! the default configuration a building plot is 48 units wide and the eye sits
//! 10 units above the floor.
//!
//! # Submodules
//!
//! - [`types`] - Core mathematical types re-exported from glam
//! - [`collision`] - Boxes, restricted areas and their index
//! - [`surfaces`] - Floor surfaces used for height snapping

pub mod collision;
pub mod surfaces;
pub mod types;

// Re-export commonly used types at the physics module level
pub use collision::{Aabb, Axis, RestrictedArea, RestrictedAreaIndex};
pub use surfaces::{FloorSurface, PlanRect, floor_under};
pub use types::Vec3;
