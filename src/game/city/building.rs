//! Building Factory
//!
//! Turns one plot of the lattice into a [`Building`]: rolled height, tinted
//! grey colour, facade texture class and a five-faced cuboid mesh.
//!
//! Side faces share a single facade bitmap. Each side samples its own quarter
//! of the bitmap horizontally, so neighbouring walls never show the same
//! windows. The roof is untextured (all-zero texture coordinates).

use std::fmt;

use glam::Vec3;

use crate::error::Result;
use crate::game::config::CityConfig;
use crate::game::types::{Mesh, NO_UV};
use crate::physics::{RestrictedArea, RestrictedAreaIndex};
use crate::world::CityRng;

/// Channel ceiling for colours expressed in percent.
const COLOR_CEILING: i32 = 100;

/// Largest random tint added to (or removed from) one channel.
const MAX_TINT: i32 = 9;

// ============================================================================
// TEXTURE CLASSES
// ============================================================================

/// Facade style and variant index.
///
/// Buildings sharing a class share the same bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TextureClass {
    /// Random lit windows with a soft glow around them
    Fuzzy(u8),
    /// Horizontal bands of lit windows
    Linear(u8),
}

impl TextureClass {
    /// Flat index in `[0, 2 * classes_per_style)`: fuzzy classes first.
    pub fn index(self, classes_per_style: u8) -> usize {
        match self {
            TextureClass::Fuzzy(i) => i as usize,
            TextureClass::Linear(i) => classes_per_style as usize + i as usize,
        }
    }

    /// Every class for the given number of variants per style, in index order.
    pub fn all(classes_per_style: u8) -> impl Iterator<Item = TextureClass> {
        (0..classes_per_style)
            .map(TextureClass::Fuzzy)
            .chain((0..classes_per_style).map(TextureClass::Linear))
    }

    pub fn is_fuzzy(self) -> bool {
        matches!(self, TextureClass::Fuzzy(_))
    }
}

impl fmt::Display for TextureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureClass::Fuzzy(i) => write!(f, "fuzzy-{i}"),
            TextureClass::Linear(i) => write!(f, "linear-{i}"),
        }
    }
}

// ============================================================================
// BUILDING
// ============================================================================

/// One generated building. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct Building {
    /// (x, z) corner of the plot with the lowest coordinates
    pub top_left: (f32, f32),
    /// Center of the plot at ground level
    pub center: Vec3,
    pub height: f32,
    /// RGBA, every channel in `[0, 1]`
    pub color: [f32; 4],
    pub texture_class: TextureClass,
    pub mesh: Mesh,
}

impl Building {
    /// Roll a building for the plot whose lowest corner is `top_left`.
    ///
    /// Draws, in order: height, grey level, tint, texture class.
    pub fn generate(config: &CityConfig, top_left: (f32, f32), rng: &mut CityRng) -> Result<Self> {
        let grid = &config.grid;
        let (x, z) = top_left;
        let center = Vec3::new(x + grid.half_plot_width(), 0.0, z + grid.half_plot_width());

        let height = rng.int_between(config.min_height, config.max_height)? as f32;
        let color = roll_color(config, rng)?;
        let texture_class = roll_texture_class(config, rng)?;

        let margin = grid.building_margin;
        let width = grid.building_width();
        let mesh = generate_cuboid(Vec3::new(x + margin, 0.0, z + margin), Vec3::new(width, height, width));

        Ok(Self {
            top_left,
            center,
            height,
            color,
            texture_class,
            mesh,
        })
    }

    /// Exclusion box around the building walls.
    pub fn restricted_area(&self, index: usize, config: &CityConfig) -> Result<RestrictedArea> {
        let margin = config.grid.building_margin;
        RestrictedArea::from_footprint(
            index,
            (self.top_left.0 + margin, self.top_left.1 + margin),
            config.grid.building_width(),
            self.height,
            config.restricted_margin,
        )
    }
}

impl RestrictedAreaIndex {
    /// One area per building, in building order.
    ///
    /// The treasure building is never part of the renderable list, so it never
    /// gets an area.
    pub fn from_buildings(buildings: &[Building], config: &CityConfig) -> Result<Self> {
        let areas = buildings
            .iter()
            .enumerate()
            .map(|(i, b)| b.restricted_area(i, config))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(areas))
    }
}

/// Grey base with a slight blue, red or yellow tint.
///
/// A percentage roll picks the tint: below 33 blue, below 66 red, below 99
/// yellow, otherwise plain grey. Yellow is obtained by lowering blue.
pub fn roll_color(config: &CityConfig, rng: &mut CityRng) -> Result<[f32; 4]> {
    let grey = rng.int_between(config.min_color, config.max_color)?;
    let roll = rng.percent();
    let (mut red, green, mut blue) = (grey, grey, grey);

    if roll < 33 {
        blue = (blue + rng.int_between(0, MAX_TINT)?).min(COLOR_CEILING);
    } else if roll < 66 {
        red = (red + rng.int_between(0, MAX_TINT)?).min(COLOR_CEILING);
    } else if roll < 99 {
        blue = (blue - rng.int_between(0, MAX_TINT)?).max(0);
    }

    let ceiling = COLOR_CEILING as f32;
    Ok([red as f32 / ceiling, green as f32 / ceiling, blue as f32 / ceiling, 1.0])
}

pub fn roll_texture_class(config: &CityConfig, rng: &mut CityRng) -> Result<TextureClass> {
    let fuzzy = rng.chance(config.fuzzy_chance);
    let variant = rng.index_below(config.classes_per_style as usize)? as u8;
    Ok(if fuzzy {
        TextureClass::Fuzzy(variant)
    } else {
        TextureClass::Linear(variant)
    })
}

// ============================================================================
// GEOMETRY
// ============================================================================

/// Cuboid without a bottom face: front, right, back, left, top.
///
/// Side `k` (in that order) maps to the horizontal texture range
/// `[k/4, (k+1)/4]`; the top face carries zero texture coordinates.
///
/// # Arguments
///
/// * `min` - Corner with the lowest coordinates (sits on the ground)
/// * `size` - Extent along X, Y and Z
pub fn generate_cuboid(min: Vec3, size: Vec3) -> Mesh {
    let max = min + size;
    let (x0, y0, z0) = (min.x, min.y, min.z);
    let (x1, y1, z1) = (max.x, max.y, max.z);

    let sides = [
        // Front (+Z)
        (
            [
                Vec3::new(x0, y0, z1),
                Vec3::new(x1, y0, z1),
                Vec3::new(x1, y1, z1),
                Vec3::new(x0, y1, z1),
            ],
            Vec3::Z,
        ),
        // Right (+X)
        (
            [
                Vec3::new(x1, y0, z1),
                Vec3::new(x1, y0, z0),
                Vec3::new(x1, y1, z0),
                Vec3::new(x1, y1, z1),
            ],
            Vec3::X,
        ),
        // Back (-Z)
        (
            [
                Vec3::new(x1, y0, z0),
                Vec3::new(x0, y0, z0),
                Vec3::new(x0, y1, z0),
                Vec3::new(x1, y1, z0),
            ],
            Vec3::NEG_Z,
        ),
        // Left (-X)
        (
            [
                Vec3::new(x0, y0, z0),
                Vec3::new(x0, y0, z1),
                Vec3::new(x0, y1, z1),
                Vec3::new(x0, y1, z0),
            ],
            Vec3::NEG_X,
        ),
    ];

    let mut mesh = Mesh::new();
    for (k, (corners, normal)) in sides.into_iter().enumerate() {
        mesh.push_quad(corners, normal, quarter_uv(k));
    }

    let top = [
        Vec3::new(x0, y1, z1),
        Vec3::new(x1, y1, z1),
        Vec3::new(x1, y1, z0),
        Vec3::new(x0, y1, z0),
    ];
    mesh.push_quad(top, Vec3::Y, NO_UV);
    mesh
}

/// Texture coordinates of the `k`-th horizontal quarter of a bitmap.
fn quarter_uv(k: usize) -> [[f32; 2]; 4] {
    let u0 = k as f32 / 4.0;
    let u1 = (k + 1) as f32 / 4.0;
    [[u0, 1.0], [u1, 1.0], [u1, 0.0], [u0, 0.0]]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cuboid_has_five_faces() {
        let mesh = generate_cuboid(Vec3::new(16.0, 0.0, 16.0), Vec3::new(48.0, 100.0, 48.0));
        assert_eq!(mesh.vertices.len(), 20);
        assert_eq!(mesh.indices.len(), 30);
        assert_eq!(mesh.triangle_count(), 10);

        let (min, max) = mesh.bounds().unwrap();
        assert_eq!(min, Vec3::new(16.0, 0.0, 16.0));
        assert_eq!(max, Vec3::new(64.0, 100.0, 64.0));
        // no face points down
        assert!(mesh.vertices.iter().all(|v| v.normal[1] >= 0.0));
    }

    #[test]
    fn test_cuboid_quarters_and_untextured_roof() {
        let mesh = generate_cuboid(Vec3::ZERO, Vec3::ONE);
        for k in 0..4 {
            let us: Vec<f32> = mesh.vertices[k * 4..k * 4 + 4].iter().map(|v| v.tex_coord[0]).collect();
            let lo = us.iter().cloned().fold(f32::MAX, f32::min);
            let hi = us.iter().cloned().fold(f32::MIN, f32::max);
            assert_eq!(lo, k as f32 * 0.25);
            assert_eq!(hi, (k + 1) as f32 * 0.25);
        }
        assert!(mesh.vertices[16..].iter().all(|v| v.tex_coord == [0.0, 0.0]));
    }

    #[test]
    fn test_cuboid_winding_matches_normals() {
        let mesh = generate_cuboid(Vec3::ZERO, Vec3::new(2.0, 3.0, 4.0));
        for [a, b, c] in mesh.triangles() {
            let face = (b.position() - a.position()).cross(c.position() - a.position());
            assert!(face.dot(Vec3::from_array(a.normal)) > 0.0);
        }
    }

    #[test]
    fn test_building_fields() {
        let config = CityConfig::default();
        let mut rng = CityRng::new(11);
        let b = Building::generate(&config, (16.0, -64.0), &mut rng).unwrap();

        assert_eq!(b.center, Vec3::new(40.0, 0.0, -40.0));
        assert!((80.0..=200.0).contains(&b.height));
        assert_eq!(b.height.fract(), 0.0);
        assert!(b.color.iter().all(|c| (0.0..=1.0).contains(c)));
        assert_eq!(b.color[3], 1.0);
        assert_eq!(b.mesh.triangle_count(), 10);
    }

    #[test]
    fn test_color_stays_in_range_at_ceiling() {
        let config = CityConfig {
            min_color: 100,
            max_color: 100,
            ..Default::default()
        };
        let mut rng = CityRng::new(5);
        for _ in 0..500 {
            let color = roll_color(&config, &mut rng).unwrap();
            assert!(color.iter().all(|c| (0.0..=1.0).contains(c)));
            assert_eq!(color[1], 1.0);
        }
    }

    #[test]
    fn test_texture_class_style_split() {
        let always_fuzzy = CityConfig {
            fuzzy_chance: 100,
            ..Default::default()
        };
        let never_fuzzy = CityConfig {
            fuzzy_chance: 0,
            ..Default::default()
        };
        let mut rng = CityRng::new(8);
        for _ in 0..200 {
            let class = roll_texture_class(&always_fuzzy, &mut rng).unwrap();
            assert!(matches!(class, TextureClass::Fuzzy(i) if i < 8));
            let class = roll_texture_class(&never_fuzzy, &mut rng).unwrap();
            assert!(matches!(class, TextureClass::Linear(i) if i < 8));
        }
    }

    #[test]
    fn test_texture_class_index() {
        let all: Vec<_> = TextureClass::all(3).collect();
        assert_eq!(all.len(), 6);
        for (i, class) in all.iter().enumerate() {
            assert_eq!(class.index(3), i);
        }
        assert_eq!(TextureClass::Linear(2).to_string(), "linear-2");
    }

    #[test]
    fn test_restricted_areas_follow_building_order() {
        let config = CityConfig::default();
        let mut rng = CityRng::new(2);
        let buildings = vec![
            Building::generate(&config, (16.0, 16.0), &mut rng).unwrap(),
            Building::generate(&config, (-64.0, 16.0), &mut rng).unwrap(),
        ];
        let index = RestrictedAreaIndex::from_buildings(&buildings, &config).unwrap();
        assert_eq!(index.len(), 2);

        let second = index.iter().nth(1).unwrap();
        assert_eq!(second.building, 1);
        assert_eq!(second.bounds.min, Vec3::new(-66.0, 0.0, 14.0));
        assert_eq!(second.bounds.max.y, buildings[1].height);
    }
}
