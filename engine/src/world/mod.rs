//! World Module
//!
//! City-wide configuration and the seeded random source.
//!
//! ## Default World
//! A flat 1024 x 1024 city. Walking past the edge is blocked, there is no
//! wrapping.

pub mod grid;
pub mod rng;

pub use grid::{GridConfig, clamp_to_map};
pub use rng::CityRng;
