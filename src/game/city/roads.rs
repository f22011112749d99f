//! Road Network
//!
//! Flat road strips at ground level and the shared asphalt texture.
//!
//! Two main roads of `main_road_width` cross at the origin. Regular roads run
//! between the plots on both sides, in both orientations. Every strip spans
//! the whole city and samples the same bitmap: `u` across the road, `v` along
//! it (one texel per world unit with the default sizes).

use glam::Vec3;
use image::{Rgba, RgbaImage};

use crate::error::{CityError, Result};
use crate::game::types::Mesh;
use crate::physics::PlanRect;
use crate::world::GridConfig;

/// Asphalt grey
const BACKGROUND: Rgba<u8> = Rgba([30, 30, 30, 255]);
/// Road marking grey
const MARKING: Rgba<u8> = Rgba([160, 160, 160, 255]);
/// Edge lines are `1 / LINE_DIVISOR` of the texture width
const LINE_DIVISOR: u32 = 16;
/// Half height of a gap in the dashed centre line, in texels
const DASH_GAP: i64 = 2;
/// Texture texels per unit of road width
const TEXELS_PER_WIDTH_UNIT: f32 = 10.0;

/// Direction a road strip runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoadOrientation {
    /// Runs along Z, positioned by its X coordinate
    AlongZ,
    /// Runs along X, positioned by its Z coordinate
    AlongX,
}

/// One road spanning the city.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadStrip {
    pub orientation: RoadOrientation,
    /// Centre coordinate on the axis perpendicular to the road
    pub offset: f32,
    pub width: f32,
}

impl RoadStrip {
    /// Area covered by the strip on the ground.
    pub fn plan_rect(&self, half_grid: f32) -> PlanRect {
        let half = self.width / 2.0;
        match self.orientation {
            RoadOrientation::AlongZ => PlanRect::new(self.offset - half, self.offset + half, -half_grid, half_grid),
            RoadOrientation::AlongX => PlanRect::new(-half_grid, half_grid, self.offset - half, self.offset + half),
        }
    }

    /// Upward-facing textured quad.
    pub fn mesh(&self, half_grid: f32) -> Mesh {
        let r = self.plan_rect(half_grid);
        let mut mesh = Mesh::new();
        match self.orientation {
            RoadOrientation::AlongZ => mesh.push_quad(
                [
                    Vec3::new(r.min_x, 0.0, r.max_z),
                    Vec3::new(r.max_x, 0.0, r.max_z),
                    Vec3::new(r.max_x, 0.0, r.min_z),
                    Vec3::new(r.min_x, 0.0, r.min_z),
                ],
                Vec3::Y,
                [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]],
            ),
            RoadOrientation::AlongX => mesh.push_quad(
                [
                    Vec3::new(r.min_x, 0.0, r.max_z),
                    Vec3::new(r.max_x, 0.0, r.max_z),
                    Vec3::new(r.max_x, 0.0, r.min_z),
                    Vec3::new(r.min_x, 0.0, r.min_z),
                ],
                Vec3::Y,
                [[1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]],
            ),
        }
        mesh
    }
}

/// Every road of the city: the two main roads first, then the regular roads
/// from the centre outwards.
pub fn road_layout(grid: &GridConfig) -> Vec<RoadStrip> {
    let main = grid.main_road_width();
    let mut roads = vec![
        RoadStrip {
            orientation: RoadOrientation::AlongZ,
            offset: 0.0,
            width: main,
        },
        RoadStrip {
            orientation: RoadOrientation::AlongX,
            offset: 0.0,
            width: main,
        },
    ];

    let mut offset = grid.road_spacing + grid.half_main_road_excess();
    while offset <= grid.half_grid() {
        for signed in [offset, -offset] {
            for orientation in [RoadOrientation::AlongZ, RoadOrientation::AlongX] {
                roads.push(RoadStrip {
                    orientation,
                    offset: signed,
                    width: grid.road_width,
                });
            }
        }
        offset += grid.road_spacing;
    }
    roads
}

/// All road strips merged into one mesh.
pub fn road_mesh(roads: &[RoadStrip], grid: &GridConfig) -> Mesh {
    let mut mesh = Mesh::new();
    for road in roads {
        mesh.merge(&road.mesh(grid.half_grid()));
    }
    mesh
}

/// Asphalt bitmap shared by every road.
///
/// Width is `road_width * 10` texels, height `grid_size` texels (one per unit
/// along the road). Two solid edge lines, a dashed centre line, and no markings
/// where another road crosses.
pub fn synthesize_road_texture(grid: &GridConfig) -> Result<RgbaImage> {
    let width = (grid.road_width * TEXELS_PER_WIDTH_UNIT) as u32;
    let height = grid.grid_size as u32;
    if width < LINE_DIVISOR || height == 0 {
        return Err(CityError::invalid(format!(
            "road texture of {width}x{height} texels is too small for markings"
        )));
    }

    let mut image = RgbaImage::from_pixel(width, height, BACKGROUND);
    let line = width / LINE_DIVISOR;
    let (w, h) = (width as i64, height as i64);

    // edge lines
    fill_rect(&mut image, 0, 0, line as i64, h, MARKING);
    fill_rect(&mut image, w - line as i64, 0, w, h, MARKING);

    // centre line, then its gaps
    let middle_left = (width / 2 - width / (LINE_DIVISOR * 2)) as i64;
    let middle_right = (width / 2 + width / (LINE_DIVISOR * 2)) as i64;
    fill_rect(&mut image, middle_left, 0, middle_right, h, MARKING);

    let spacing = grid.road_spacing as i64;
    let road = grid.road_width as i64;
    let main = grid.main_road_width() as i64;
    let plot = spacing - road;
    let half = grid.half_grid() as i64;

    let mut i = 0;
    while i <= h {
        if i == half {
            i += main - road;
        }
        for gap_center in [i + plot / 2, i + plot / 4, i + plot / 4 * 3] {
            fill_rect(&mut image, middle_left, gap_center - DASH_GAP, middle_right, gap_center + DASH_GAP, BACKGROUND);
        }
        i += spacing;
    }

    // crossings
    let mut i = plot;
    while i <= h {
        if i + road == half {
            fill_rect(&mut image, 0, i, w, i + main, BACKGROUND);
            i += main - road;
        } else {
            fill_rect(&mut image, 0, i, w, i + road, BACKGROUND);
        }
        i += spacing;
    }

    Ok(image)
}

/// Fill `[left, right) x [top, bottom)`, clipped to the image.
fn fill_rect(image: &mut RgbaImage, left: i64, top: i64, right: i64, bottom: i64, color: Rgba<u8>) {
    let left = left.clamp(0, image.width() as i64) as u32;
    let right = right.clamp(0, image.width() as i64) as u32;
    let top = top.clamp(0, image.height() as i64) as u32;
    let bottom = bottom.clamp(0, image.height() as i64) as u32;
    for y in top..bottom {
        for x in left..right {
            image.put_pixel(x, y, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_road_layout() {
        let grid = GridConfig::default();
        let roads = road_layout(&grid);
        // 2 main roads + 7 offsets * 2 signs * 2 orientations
        assert_eq!(roads.len(), 30);
        assert_eq!(roads[0].width, 32.0);
        assert_eq!(roads[2].offset, 72.0);
        assert_eq!(roads[2].width, 16.0);
        assert!(roads.iter().any(|r| r.offset == -456.0));
    }

    #[test]
    fn test_roads_sit_between_plots() {
        let grid = GridConfig::default();
        for road in road_layout(&grid).iter().skip(2) {
            let edge = road.offset.abs() - grid.half_road_width();
            // plots start at 16 and repeat every 64, 48 wide
            assert_eq!((edge - 16.0).rem_euclid(64.0), 48.0);
        }
    }

    #[test]
    fn test_road_mesh_faces_up() {
        let grid = GridConfig::default();
        let mesh = road_mesh(&road_layout(&grid), &grid);
        assert_eq!(mesh.triangle_count(), 60);
        for [a, b, c] in mesh.triangles() {
            let face = (b.position() - a.position()).cross(c.position() - a.position());
            assert!(face.y > 0.0);
            assert_eq!(a.position[1], 0.0);
        }
    }

    #[test]
    fn test_road_texture_markings() {
        let grid = GridConfig::default();
        let image = synthesize_road_texture(&grid).unwrap();
        assert_eq!(image.dimensions(), (160, 1024));

        // edge line, asphalt, centre line on a plain stretch
        assert_eq!(*image.get_pixel(5, 5), MARKING);
        assert_eq!(*image.get_pixel(40, 5), BACKGROUND);
        assert_eq!(*image.get_pixel(80, 5), MARKING);
        assert_eq!(*image.get_pixel(155, 5), MARKING);

        // gap in the centre line at a quarter of the first plot span
        assert_eq!(*image.get_pixel(80, 12), BACKGROUND);

        // crossing road: rows 48..64 have no markings
        assert_eq!(*image.get_pixel(5, 50), BACKGROUND);
        // main road crossing is twice as long
        assert_eq!(*image.get_pixel(5, 520), BACKGROUND);
    }
}
