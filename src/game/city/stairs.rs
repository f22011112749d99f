//! Stairs Generator
//!
//! A straight staircase descending from ground level. Step `i` has its tread
//! at `y = -i * step_height` spanning depth `[i * d, (i + 1) * d]` and a riser
//! at depth `(i + 1) * d` dropping to the next tread. The player height is
//! snapped through the parallel list of floor surfaces.
//!
//! Models are generated in local space (descent along +X, centred on Z = 0)
//! and moved into the world with [`StairsModel::place`].

use glam::Vec3;

use crate::error::{CityError, Result};
use crate::game::types::Mesh;
use crate::physics::{FloorSurface, PlanRect};

/// Staircase geometry and its walkable surfaces.
#[derive(Debug, Clone, PartialEq)]
pub struct StairsModel {
    pub step_count: u32,
    pub step_height: f32,
    pub step_depth: f32,
    pub width: f32,
    pub mesh: Mesh,
    /// One surface per step, top step first
    pub floor_surfaces: Vec<FloorSurface>,
    /// Top of the first step's leading edge
    pub origin: Vec3,
    /// +1.0 when descending towards +X, -1.0 towards -X
    pub direction: f32,
}

impl StairsModel {
    /// Build a staircase in local space.
    ///
    /// # Arguments
    ///
    /// * `step_count` - Number of steps, at least 1
    /// * `step_height` - Drop of each step
    /// * `step_depth` - Run of each step
    /// * `width` - Lateral size of the steps
    pub fn generate(step_count: u32, step_height: f32, step_depth: f32, width: f32) -> Result<Self> {
        if step_count < 1 || step_height <= 0.0 || step_depth <= 0.0 || width <= 0.0 {
            return Err(CityError::invalid(format!(
                "stairs need at least one step and positive sizes \
                 (steps {step_count}, height {step_height}, depth {step_depth}, width {width})"
            )));
        }

        let half_width = width / 2.0;
        let mut mesh = Mesh::new();
        let mut floor_surfaces = Vec::with_capacity(step_count as usize);

        for i in 0..step_count {
            let start = i as f32 * step_depth;
            let end = (i + 1) as f32 * step_depth;
            let up = -(i as f32) * step_height;
            let down = up - step_height;

            // Tread
            mesh.push_quad(
                [
                    Vec3::new(start, up, half_width),
                    Vec3::new(end, up, half_width),
                    Vec3::new(end, up, -half_width),
                    Vec3::new(start, up, -half_width),
                ],
                Vec3::Y,
                [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]],
            );
            // Riser, facing down the stairs
            mesh.push_quad(
                [
                    Vec3::new(end, down, half_width),
                    Vec3::new(end, down, -half_width),
                    Vec3::new(end, up, -half_width),
                    Vec3::new(end, up, half_width),
                ],
                Vec3::X,
                [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]],
            );

            floor_surfaces.push(FloorSurface {
                height: up,
                depth_start: start,
                depth_end: end,
                area: PlanRect::new(start, end, -half_width, half_width),
                ceiling: f32::INFINITY,
            });
        }

        Ok(Self {
            step_count,
            step_height,
            step_depth,
            width,
            mesh,
            floor_surfaces,
            origin: Vec3::ZERO,
            direction: 1.0,
        })
    }

    /// A staircase with no steps. It has no geometry and no surfaces.
    pub fn empty() -> Self {
        Self {
            step_count: 0,
            step_height: 0.0,
            step_depth: 0.0,
            width: 0.0,
            mesh: Mesh::new(),
            floor_surfaces: Vec::new(),
            origin: Vec3::ZERO,
            direction: 1.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.step_count == 0
    }

    /// Move a local model into the world.
    ///
    /// `origin` becomes the top of the first step; the stairs descend along +X
    /// when `direction` is positive and along -X otherwise.
    pub fn place(&self, origin: Vec3, direction: f32) -> StairsModel {
        let sign = if direction < 0.0 { -1.0 } else { 1.0 };
        let floor_surfaces = self
            .floor_surfaces
            .iter()
            .map(|s| {
                let (a, b) = (origin.x + sign * s.area.min_x, origin.x + sign * s.area.max_x);
                FloorSurface {
                    height: origin.y + s.height,
                    area: PlanRect::new(a.min(b), a.max(b), origin.z + s.area.min_z, origin.z + s.area.max_z),
                    ..*s
                }
            })
            .collect();

        StairsModel {
            mesh: self.mesh.placed_along_x(origin, sign),
            floor_surfaces,
            origin,
            direction: sign,
            ..self.clone()
        }
    }

    /// Distance travelled down the stairs from the leading edge.
    pub fn depth_of(&self, x: f32) -> f32 {
        (x - self.origin.x) * self.direction
    }

    /// Surface under `(x, z)`, selected by depth band `[start, end)`.
    pub fn surface_at(&self, x: f32, z: f32) -> Option<&FloorSurface> {
        let half_width = self.width / 2.0;
        if z < self.origin.z - half_width || z >= self.origin.z + half_width {
            return None;
        }
        let depth = self.depth_of(x);
        self.floor_surfaces
            .iter()
            .find(|s| depth >= s.depth_start && depth < s.depth_end)
    }

    /// Floor height under `(x, z)`, if it lies on a step.
    pub fn floor_height_at(&self, x: f32, z: f32) -> Option<f32> {
        self.surface_at(x, z).map(|s| s.height)
    }

    /// Height of the floor at the bottom of the last step.
    pub fn bottom_height(&self) -> f32 {
        self.origin.y - self.step_count as f32 * self.step_height
    }

    /// Horizontal length of all steps.
    pub fn total_run(&self) -> f32 {
        self.step_count as f32 * self.step_depth
    }
}
