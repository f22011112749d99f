//! Walkable floor surfaces
//!
//! A floor surface is a horizontal rectangle at a fixed height. While the
//! player's (x, z) lies inside one, the eye height is snapped onto it. Stairs
//! produce one surface per step, the treasure corridor adds one more.
//!
//! Underground surfaces carry a ceiling: they only catch a player whose feet
//! are already below it, so walking above them on the ground changes nothing.

use glam::Vec3;

/// Rectangle on the XZ plane, half-open on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanRect {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl PlanRect {
    pub fn new(min_x: f32, max_x: f32, min_z: f32, max_z: f32) -> Self {
        Self {
            min_x,
            max_x,
            min_z,
            max_z,
        }
    }

    pub fn contains(&self, x: f32, z: f32) -> bool {
        x >= self.min_x && x < self.max_x && z >= self.min_z && z < self.max_z
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn depth(&self) -> f32 {
        self.max_z - self.min_z
    }
}

/// A horizontal band the player can stand on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloorSurface {
    /// Height of the floor
    pub height: f32,
    /// Start of the band along the stairs' descent, relative to their origin
    pub depth_start: f32,
    /// End of the band (exclusive)
    pub depth_end: f32,
    /// World-space footprint
    pub area: PlanRect,
    /// The surface only catches a player whose feet are below this height,
    /// `f32::INFINITY` for surfaces open to the sky
    pub ceiling: f32,
}

impl FloorSurface {
    /// True when the planar position of `p` lies on this surface.
    pub fn contains_xz(&self, p: Vec3) -> bool {
        self.area.contains(p.x, p.z)
    }

    /// True when feet at height `feet_y` are under the ceiling.
    pub fn admits(&self, feet_y: f32) -> bool {
        feet_y < self.ceiling
    }
}

/// First surface (in list order) under the planar position of `p` that
/// admits feet at `feet_y`.
pub fn floor_under(surfaces: &[FloorSurface], p: Vec3, feet_y: f32) -> Option<&FloorSurface> {
    surfaces.iter().find(|s| s.contains_xz(p) && s.admits(feet_y))
}
