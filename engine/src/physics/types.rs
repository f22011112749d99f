//! Physics type re-exports from glam
//!
//! The collision and movement code only ever needs 3D vectors.

pub use glam::Vec3;
