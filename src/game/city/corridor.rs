//! Treasure Corridor
//!
//! Underground passage from the bottom of the stairs to the treasure chamber.
//! The corridor keeps the stairs' direction and width; its floor sits at the
//! height of the last step's bottom and the chamber occupies its final
//! `plot_width` units.
//!
//! Walls face inward and are shaded by a horizontal gradient that darkens
//! towards the chamber.

use glam::Vec3;
use image::{Rgba, RgbaImage};

use crate::error::Result;
use crate::game::city::stairs::StairsModel;
use crate::game::types::Mesh;
use crate::physics::{Aabb, FloorSurface, PlanRect};

/// Gap between the corridor ceiling and the ground above it
const CEILING_GAP: f32 = 2.0;

/// Gradient texture width in texels
pub const GRADIENT_WIDTH: u32 = 256;
/// Gradient texture height in texels
pub const GRADIENT_HEIGHT: u32 = 2;

/// Corridor geometry, walkable floor and treasure chamber.
#[derive(Debug, Clone, PartialEq)]
pub struct TreasureCorridor {
    pub mesh: Mesh,
    pub floor: FloorSurface,
    /// Entering this box wins the game
    pub treasure_volume: Aabb,
    /// Length from the bottom of the stairs to the far wall
    pub length: f32,
    pub width: f32,
    pub height: f32,
}

impl TreasureCorridor {
    /// Corridor continuing `stairs` for `corridor_length + chamber_length`.
    ///
    /// # Arguments
    ///
    /// * `stairs` - Placed staircase the corridor starts from
    /// * `corridor_length` - Length of the passage before the chamber
    /// * `chamber_length` - Length of the treasure chamber at the far end
    pub fn generate(stairs: &StairsModel, corridor_length: f32, chamber_length: f32) -> Result<Self> {
        let start = stairs.total_run();
        let length = corridor_length + chamber_length;
        let end = start + length;
        let width = stairs.width;
        let half_width = width / 2.0;
        let floor_y = -(stairs.step_count as f32) * stairs.step_height;
        let ceiling_y = -CEILING_GAP.min(stairs.step_height);
        let height = ceiling_y - floor_y;

        let local = corridor_mesh(start, end, half_width, floor_y, ceiling_y);
        let mesh = local.placed_along_x(stairs.origin, stairs.direction);

        let to_world_x = |depth: f32| stairs.origin.x + stairs.direction * depth;
        let (a, b) = (to_world_x(start), to_world_x(end));
        let floor = FloorSurface {
            height: stairs.origin.y + floor_y,
            depth_start: start,
            depth_end: end,
            area: PlanRect::new(
                a.min(b),
                a.max(b),
                stairs.origin.z - half_width,
                stairs.origin.z + half_width,
            ),
            // reachable from the stairs only, never from the ground above
            ceiling: stairs.origin.y,
        };

        let (c, d) = (to_world_x(end - chamber_length), to_world_x(end));
        let treasure_volume = Aabb::new(
            Vec3::new(c.min(d), stairs.origin.y + floor_y, stairs.origin.z - half_width),
            Vec3::new(c.max(d), stairs.origin.y, stairs.origin.z + half_width),
        )?;

        Ok(Self {
            mesh,
            floor,
            treasure_volume,
            length,
            width,
            height,
        })
    }
}

/// Inward-facing walls in local space: two sides, the far end, floor and
/// ceiling. The entrance stays open.
fn corridor_mesh(start: f32, end: f32, half_width: f32, floor_y: f32, ceiling_y: f32) -> Mesh {
    let along = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];
    let mut mesh = Mesh::new();

    // Side at -Z, facing +Z
    mesh.push_quad(
        [
            Vec3::new(start, floor_y, -half_width),
            Vec3::new(end, floor_y, -half_width),
            Vec3::new(end, ceiling_y, -half_width),
            Vec3::new(start, ceiling_y, -half_width),
        ],
        Vec3::Z,
        along,
    );
    // Side at +Z, facing -Z
    mesh.push_quad(
        [
            Vec3::new(end, floor_y, half_width),
            Vec3::new(start, floor_y, half_width),
            Vec3::new(start, ceiling_y, half_width),
            Vec3::new(end, ceiling_y, half_width),
        ],
        Vec3::NEG_Z,
        [[1.0, 1.0], [0.0, 1.0], [0.0, 0.0], [1.0, 0.0]],
    );
    // Far wall, facing back to the stairs
    mesh.push_quad(
        [
            Vec3::new(end, floor_y, -half_width),
            Vec3::new(end, floor_y, half_width),
            Vec3::new(end, ceiling_y, half_width),
            Vec3::new(end, ceiling_y, -half_width),
        ],
        Vec3::NEG_X,
        [[1.0, 1.0]; 4],
    );
    // Floor
    mesh.push_quad(
        [
            Vec3::new(start, floor_y, half_width),
            Vec3::new(end, floor_y, half_width),
            Vec3::new(end, floor_y, -half_width),
            Vec3::new(start, floor_y, -half_width),
        ],
        Vec3::Y,
        along,
    );
    // Ceiling
    mesh.push_quad(
        [
            Vec3::new(start, ceiling_y, -half_width),
            Vec3::new(end, ceiling_y, -half_width),
            Vec3::new(end, ceiling_y, half_width),
            Vec3::new(start, ceiling_y, half_width),
        ],
        Vec3::NEG_Y,
        along,
    );
    mesh
}

/// 256 x 2 gradient from white (left) to black (right).
pub fn synthesize_corridor_texture() -> RgbaImage {
    RgbaImage::from_fn(GRADIENT_WIDTH, GRADIENT_HEIGHT, |x, _| {
        let level = (GRADIENT_WIDTH - 1 - x) as u8;
        Rgba([level, level, level, 255])
    })
}
