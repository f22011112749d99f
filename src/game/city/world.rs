//! City Assembly
//!
//! Runs every generator once and bundles the results into a [`City`].
//!
//! Generation order is fixed but does not matter for the result: buildings,
//! facades and the treasure draw each use their own fork of the root seed.

use std::collections::BTreeMap;

use glam::Vec3;
use image::RgbaImage;
use log::info;

use crate::error::{CityError, Result};
use crate::game::city::building::{Building, TextureClass};
use crate::game::city::corridor::{TreasureCorridor, synthesize_corridor_texture};
use crate::game::city::facade::synthesize_all;
use crate::game::city::layout::generate_layout;
use crate::game::city::roads::{RoadStrip, road_layout, road_mesh, synthesize_road_texture};
use crate::game::city::stairs::StairsModel;
use crate::game::config::CityConfig;
use crate::game::render::{MeshId, RenderingBackend, TextureId};
use crate::game::types::Mesh;
use crate::physics::{Aabb, RestrictedAreaIndex};
use crate::player::WalkWorld;
use crate::world::CityRng;

/// A fully generated city.
#[derive(Debug, Clone)]
pub struct City {
    pub config: CityConfig,
    /// Root seed; the same seed and config rebuild the same city
    pub seed: u64,
    /// Renderable buildings, treasure plot excluded
    pub buildings: Vec<Building>,
    /// Building removed to make room for the stairs
    pub treasure_plot: Building,
    pub treasure_anchor: Vec3,
    pub restricted_areas: RestrictedAreaIndex,
    pub stairs: StairsModel,
    pub corridor: TreasureCorridor,
    pub treasure_volume: Aabb,
    pub roads: Vec<RoadStrip>,
    pub road_mesh: Mesh,
    /// One bitmap per texture class, in class index order
    pub facades: Vec<(TextureClass, RgbaImage)>,
    pub road_texture: RgbaImage,
    pub corridor_texture: RgbaImage,
}

/// Generate a city. With `seed == None` a seed is drawn from OS entropy and
/// logged so the city can be reproduced.
pub fn generate_city(config: &CityConfig, seed: Option<u64>) -> Result<City> {
    config.validate()?;
    let rng = match seed {
        Some(seed) => CityRng::new(seed),
        None => {
            let rng = CityRng::from_entropy();
            info!("no seed given, using {}", rng.seed());
            rng
        }
    };

    let layout = generate_layout(config, &rng)?;
    let restricted_areas = RestrictedAreaIndex::from_buildings(&layout.buildings, config)?;

    let (origin, direction) = stairs_placement(config, &layout.treasure);
    let stairs = StairsModel::generate(
        config.stairs.step_count,
        config.stairs.step_height,
        config.stairs.step_depth,
        config.grid.building_width(),
    )?
    .place(origin, direction);
    let corridor = TreasureCorridor::generate(&stairs, config.corridor_length, config.grid.plot_width())?;
    let half_grid = config.grid.half_grid();
    let chamber = corridor.treasure_volume;
    let inside = |v: f32| (-half_grid..=half_grid).contains(&v);
    if ![chamber.min.x, chamber.max.x, chamber.min.z, chamber.max.z].into_iter().all(inside) {
        return Err(CityError::GenerationInvariantViolation(format!(
            "treasure chamber {:?}..{:?} lies outside the city (half extent {half_grid})",
            chamber.min, chamber.max
        )));
    }

    let roads = road_layout(&config.grid);
    let road_mesh = road_mesh(&roads, &config.grid);

    let city = City {
        config: config.clone(),
        seed: rng.seed(),
        treasure_anchor: layout.treasure_anchor(),
        treasure_volume: corridor.treasure_volume,
        buildings: layout.buildings,
        treasure_plot: layout.treasure,
        restricted_areas,
        stairs,
        corridor,
        roads,
        road_mesh,
        facades: synthesize_all(config, &rng)?,
        road_texture: synthesize_road_texture(&config.grid)?,
        corridor_texture: synthesize_corridor_texture(),
    };

    info!(
        "city {}: {} buildings, treasure plot at {}, chamber centre {}",
        city.seed,
        city.buildings.len(),
        city.treasure_anchor,
        city.treasure_volume.center()
    );
    Ok(city)
}

/// Top of the stairs and descent direction for the treasure plot.
///
/// The stairs start on the plot's outer edge and descend towards the city
/// centre along X, so the corridor behind them stays inside the city.
fn stairs_placement(config: &CityConfig, treasure: &Building) -> (Vec3, f32) {
    let grid = &config.grid;
    let left = treasure.top_left.0 + grid.building_margin;
    let right = left + grid.building_width();
    if treasure.center.x > 0.0 {
        (Vec3::new(right, 0.0, treasure.center.z), -1.0)
    } else {
        (Vec3::new(left, 0.0, treasure.center.z), 1.0)
    }
}

impl City {
    /// Bitmap used by buildings of `class`.
    pub fn facade(&self, class: TextureClass) -> Option<&RgbaImage> {
        self.facades.iter().find(|(c, _)| *c == class).map(|(_, image)| image)
    }

    /// Number of buildings using each texture class.
    pub fn texture_histogram(&self) -> BTreeMap<TextureClass, usize> {
        let mut histogram: BTreeMap<TextureClass, usize> =
            TextureClass::all(self.config.classes_per_style).map(|c| (c, 0)).collect();
        for building in &self.buildings {
            *histogram.entry(building.texture_class).or_default() += 1;
        }
        histogram
    }

    /// Collision and floor data for a [`crate::player::PlayerMovementController`].
    pub fn walk_world(&self) -> WalkWorld {
        WalkWorld {
            restricted_areas: self.restricted_areas.clone(),
            stairs: self.stairs.clone(),
            floors: vec![self.corridor.floor],
            treasure_volume: Some(self.treasure_volume),
            half_grid: self.config.grid.half_grid(),
            eye_height: self.config.eye_height,
            max_spawn_attempts: self.config.max_spawn_attempts,
        }
    }

    /// Waypoints from the main road crossing to the treasure chamber, using
    /// only road centre lines above ground.
    ///
    /// Down the main road to the road next to the treasure row, along it to
    /// the road on the stairs side of the plot, onto the top step, then down
    /// the stairs and corridor. Waypoints are meant to be walked X then Z.
    pub fn treasure_route(&self) -> Vec<Vec3> {
        let grid = &self.config.grid;
        let anchor = self.treasure_anchor;
        let to_road = grid.half_plot_width() + grid.half_road_width();
        let road_z = anchor.z - anchor.z.signum() * to_road;
        let road_x = self.stairs.origin.x - self.stairs.direction * grid.half_road_width();

        vec![
            Vec3::new(0.0, 0.0, road_z),
            Vec3::new(road_x, 0.0, road_z),
            Vec3::new(road_x, 0.0, anchor.z),
            Vec3::new(self.treasure_volume.center().x, 0.0, anchor.z),
        ]
    }

    /// Hand every mesh and bitmap to `backend`.
    pub fn upload<B: RenderingBackend + ?Sized>(&self, backend: &mut B) -> Result<()> {
        for (class, image) in &self.facades {
            backend.upload_texture(TextureId::Facade(*class), image)?;
        }
        backend.upload_texture(TextureId::Road, &self.road_texture)?;
        backend.upload_texture(TextureId::Corridor, &self.corridor_texture)?;

        for (i, building) in self.buildings.iter().enumerate() {
            backend.upload_mesh(MeshId::Building(i), &building.mesh)?;
        }
        backend.upload_mesh(MeshId::Roads, &self.road_mesh)?;
        backend.upload_mesh(MeshId::Stairs, &self.stairs.mesh)?;
        backend.upload_mesh(MeshId::Corridor, &self.corridor.mesh)?;
        Ok(())
    }
}
