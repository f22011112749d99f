//! City Layout Generator
//!
//! Fills the lattice with buildings and chooses the treasure plot.
//!
//! Plots are generated quadrant-symmetric: for every positive offset pair
//! `(x, z)` the four mirrored plots are created together. With the default
//! grid that gives 8 offsets per half-axis and 4 x 8 x 8 = 256 buildings.
//!
//! The treasure plot is drawn uniformly, rejecting plots on the outer ring of
//! the city, and then removed from the building list.

use glam::Vec3;
use log::{debug, warn};

use crate::error::{CityError, Result};
use crate::game::city::building::Building;
use crate::game::config::CityConfig;
use crate::world::{CityRng, GridConfig};

/// Stream id offset for per-building forks
const BUILDING_STREAM: u64 = 0x1000_0000;
/// Stream id for the treasure draw
const TREASURE_STREAM: u64 = 0x3000_0000;

/// Tolerance when comparing plot centres to the outer ring
const RING_EPSILON: f32 = 1e-3;

/// Buildings of the city plus the plot promoted to treasure.
#[derive(Debug, Clone)]
pub struct CityLayout {
    /// Renderable buildings, treasure excluded
    pub buildings: Vec<Building>,
    /// The building whose plot hides the treasure
    pub treasure: Building,
}

impl CityLayout {
    /// Centre of the treasure plot at ground level.
    pub fn treasure_anchor(&self) -> Vec3 {
        self.treasure.center
    }
}

/// Lowest corners of every plot, in generation order.
pub fn plot_corners(grid: &GridConfig) -> Vec<(f32, f32)> {
    let offsets = grid.plot_offsets();
    let plot = grid.plot_width();
    let mut corners = Vec::with_capacity(offsets.len() * offsets.len() * 4);
    for &x in &offsets {
        for &z in &offsets {
            corners.push((x, z));
            corners.push((-x - plot, z));
            corners.push((x, -z - plot));
            corners.push((-x - plot, -z - plot));
        }
    }
    corners
}

/// True when a plot centre lies on the outermost ring of plots.
pub fn is_on_outer_ring(grid: &GridConfig, center: Vec3) -> bool {
    let ring = grid.max_center_coordinate();
    (center.x.abs() - ring).abs() < RING_EPSILON || (center.z.abs() - ring).abs() < RING_EPSILON
}

/// One building per plot. Building `i` draws from `rng.fork(i)`.
pub fn generate_buildings(config: &CityConfig, rng: &CityRng) -> Result<Vec<Building>> {
    plot_corners(&config.grid)
        .into_iter()
        .enumerate()
        .map(|(i, corner)| {
            let mut building_rng = rng.fork(BUILDING_STREAM + i as u64);
            Building::generate(config, corner, &mut building_rng)
        })
        .collect()
}

/// Index of the treasure building, rejecting the outer ring.
///
/// Gives up after `config.max_treasure_attempts` draws.
pub fn pick_treasure(config: &CityConfig, buildings: &[Building], rng: &mut CityRng) -> Result<usize> {
    if buildings.is_empty() {
        return Err(CityError::GenerationInvariantViolation(
            "no building to promote to treasure".into(),
        ));
    }
    for attempt in 1..=config.max_treasure_attempts {
        let candidate = rng.index_below(buildings.len())?;
        if !is_on_outer_ring(&config.grid, buildings[candidate].center) {
            debug!("treasure plot {candidate} chosen after {attempt} draw(s)");
            return Ok(candidate);
        }
    }
    warn!(
        "every treasure draw landed on the outer ring ({} attempts)",
        config.max_treasure_attempts
    );
    Err(CityError::GenerationInvariantViolation(format!(
        "no treasure plot off the outer ring after {} attempts",
        config.max_treasure_attempts
    )))
}

/// Generate every building and promote one to treasure.
pub fn generate_layout(config: &CityConfig, rng: &CityRng) -> Result<CityLayout> {
    let mut buildings = generate_buildings(config, rng)?;
    let mut treasure_rng = rng.fork(TREASURE_STREAM);
    let index = pick_treasure(config, &buildings, &mut treasure_rng)?;
    let treasure = buildings.remove(index);
    Ok(CityLayout { buildings, treasure })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_plot_count() {
        let corners = plot_corners(&GridConfig::default());
        assert_eq!(corners.len(), 256);
        assert_eq!(corners[0], (16.0, 16.0));
        assert_eq!(corners[1], (-64.0, 16.0));
        assert_eq!(corners[2], (16.0, -64.0));
        assert_eq!(corners[3], (-64.0, -64.0));
    }

    #[test]
    fn test_plots_do_not_overlap_roads() {
        let grid = GridConfig::default();
        for (x, z) in plot_corners(&grid) {
            // the main road occupies |coord| < 16
            assert!(x >= 16.0 || x + grid.plot_width() <= -16.0);
            assert!(z >= 16.0 || z + grid.plot_width() <= -16.0);
            assert!(x >= -512.0 && x + grid.plot_width() <= 512.0);
        }
    }

    #[test]
    fn test_outer_ring_detection() {
        let grid = GridConfig::default();
        assert!(is_on_outer_ring(&grid, Vec3::new(488.0, 0.0, 40.0)));
        assert!(is_on_outer_ring(&grid, Vec3::new(40.0, 0.0, -488.0)));
        assert!(!is_on_outer_ring(&grid, Vec3::new(424.0, 0.0, -424.0)));
    }

    #[test]
    fn test_layout_removes_exactly_one() {
        let config = CityConfig::default();
        let layout = generate_layout(&config, &CityRng::new(3)).unwrap();
        assert_eq!(layout.buildings.len(), 255);
        assert!(!is_on_outer_ring(&config.grid, layout.treasure_anchor()));
        assert!(layout.buildings.iter().all(|b| b.top_left != layout.treasure.top_left));
    }

    #[test]
    fn test_single_ring_grid_fails() {
        // one plot per half-axis: every plot is on the outer ring
        let config = CityConfig {
            grid: GridConfig::new(128.0, 64.0, 16.0).unwrap(),
            max_treasure_attempts: 50,
            ..Default::default()
        };
        let err = generate_layout(&config, &CityRng::new(1)).unwrap_err();
        assert!(matches!(err, CityError::GenerationInvariantViolation(_)));
    }
}
