//! Player Module
//!
//! First-person movement through the generated city.
//!
//! # Components
//!
//! - [`PlayerMovementController`] - Discrete-step movement with sliding collision
//!   - Snaps the eye onto stairs and corridor floors
//!   - Raises a one-shot event when the treasure is reached
//! - [`WalkWorld`] - Collision volumes and floors the controller moves through
//! - [`CameraState`] - Eye, target and up vector for the rendering backend

pub mod movement_controller;

pub use movement_controller::{
    CameraState, MoveDirection, MoveOutcome, PlayerMovementController, PlayerState, PlayerZone,
    WalkReport, WalkWorld, MOVE_STEP, START_EYE,
};
