//! Grid Configuration Module
//!
//! Road lattice and plot geometry of the city. Every layout constant is derived
//! from a handful of base values so the invariants hold by construction:
//!
//! - `plot_width = road_spacing - road_width`
//! - the two main roads are `main_road_scale` times wider and centred on the
//!   middle axes
//!
//! ## Default City
//! 1024 x 1024 units, roads every 64 units, 16 units wide (main roads 32).
//! Bounds run from -512 to +512 on X and Z.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{CityError, Result};

/// Largest accepted city side. Road textures get one texel row per unit.
pub const MAX_GRID_SIZE: f32 = 16384.0;

/// Largest accepted regular road width
pub const MAX_ROAD_WIDTH: f32 = 256.0;

/// Most plots accepted along one positive half-axis
pub const MAX_PLOTS_PER_HALF_AXIS: usize = 64;

/// Grid and road configuration for the city layout.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Full side length of the square city
    pub grid_size: f32,
    /// Distance between two road centerlines
    pub road_spacing: f32,
    /// Width of a regular road
    pub road_width: f32,
    /// Main roads are this many times wider than regular roads
    pub main_road_scale: f32,
    /// Empty margin kept on each side of a building inside its plot
    pub building_margin: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            grid_size: 1024.0,
            road_spacing: 64.0,
            road_width: 16.0,
            main_road_scale: 2.0,
            building_margin: 0.0,
        }
    }
}

impl GridConfig {
    /// Create a grid with custom sizes and no building margin.
    pub fn new(grid_size: f32, road_spacing: f32, road_width: f32) -> Result<Self> {
        let config = Self {
            grid_size,
            road_spacing,
            road_width,
            ..Default::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot produce a lattice.
    pub fn validate(&self) -> Result<()> {
        let sizes = [
            self.grid_size,
            self.road_spacing,
            self.road_width,
            self.main_road_scale,
            self.building_margin,
        ];
        if sizes.iter().any(|v| !v.is_finite()) {
            return Err(CityError::invalid("grid sizes must be finite numbers"));
        }
        if self.grid_size <= 0.0 || self.road_spacing <= 0.0 || self.road_width <= 0.0 {
            return Err(CityError::invalid(
                "grid_size, road_spacing and road_width must be positive",
            ));
        }
        if self.grid_size > MAX_GRID_SIZE || self.road_width > MAX_ROAD_WIDTH {
            return Err(CityError::invalid(format!(
                "grid_size ({}) and road_width ({}) are capped at {MAX_GRID_SIZE} and {MAX_ROAD_WIDTH}",
                self.grid_size, self.road_width
            )));
        }
        let plots = self.plot_count_estimate();
        if plots > MAX_PLOTS_PER_HALF_AXIS {
            return Err(CityError::invalid(format!(
                "road_spacing {} gives {plots} plots per half-axis, at most {MAX_PLOTS_PER_HALF_AXIS} are supported",
                self.road_spacing
            )));
        }
        if self.road_width >= self.road_spacing {
            return Err(CityError::invalid(format!(
                "road_width ({}) leaves no room for plots with road_spacing {}",
                self.road_width, self.road_spacing
            )));
        }
        if self.main_road_scale < 1.0 {
            return Err(CityError::invalid("main_road_scale must be at least 1.0"));
        }
        if self.building_margin < 0.0 || self.building_margin * 2.0 >= self.plot_width() {
            return Err(CityError::invalid(format!(
                "building_margin ({}) does not fit in a plot of width {}",
                self.building_margin,
                self.plot_width()
            )));
        }
        Ok(())
    }

    /// Half the side length: positions are valid in `[-half_grid, +half_grid]`.
    pub fn half_grid(&self) -> f32 {
        self.grid_size / 2.0
    }

    pub fn half_road_width(&self) -> f32 {
        self.road_width / 2.0
    }

    pub fn main_road_width(&self) -> f32 {
        self.road_width * self.main_road_scale
    }

    /// Extra half-width of a main road compared to a regular one.
    pub fn half_main_road_excess(&self) -> f32 {
        (self.main_road_width() - self.road_width) / 2.0
    }

    /// Side of the square between roads. Spacing is measured between road
    /// centers, so one full road width is subtracted.
    pub fn plot_width(&self) -> f32 {
        self.road_spacing - self.road_width
    }

    pub fn half_plot_width(&self) -> f32 {
        self.plot_width() / 2.0
    }

    /// Width of the building itself once the margin is removed.
    pub fn building_width(&self) -> f32 {
        self.plot_width() - self.building_margin * 2.0
    }

    /// Offset of the first plot corner from the middle axis.
    pub fn first_offset(&self) -> f32 {
        self.half_road_width() + self.half_main_road_excess()
    }

    /// Plot corner offsets along one positive half-axis.
    ///
    /// The bound is inclusive: a plot starting exactly on the half extent is
    /// still generated.
    pub fn plot_offsets(&self) -> Vec<f32> {
        let mut offsets = Vec::new();
        let mut offset = self.first_offset();
        while offset <= self.half_grid() {
            offsets.push(offset);
            offset += self.road_spacing;
        }
        offsets
    }

    /// Plots per half-axis computed without walking the lattice, so it stays
    /// cheap for any spacing.
    fn plot_count_estimate(&self) -> usize {
        let room = self.half_grid() - self.first_offset();
        if room < 0.0 {
            0
        } else {
            (room / self.road_spacing).floor() as usize + 1
        }
    }

    /// Number of plots along one positive half-axis.
    pub fn plots_per_half_axis(&self) -> usize {
        self.plot_offsets().len()
    }

    /// Absolute plot-center coordinate of the outermost ring.
    pub fn max_center_coordinate(&self) -> f32 {
        self.half_grid() - self.half_plot_width()
    }

    /// True when `pos` lies within the city on X and Z.
    pub fn contains_xz(&self, pos: Vec3) -> bool {
        let bounds = self.half_grid();
        pos.x.abs() <= bounds && pos.z.abs() <= bounds
    }

    /// Clamp a position to the city boundaries.
    ///
    /// Clamps X and Z to [-half_grid, +half_grid]; Y is preserved.
    pub fn clamp_to_map(&self, pos: Vec3) -> Vec3 {
        clamp_to_map(pos, self.half_grid())
    }
}

/// Standalone function to clamp a position to map boundaries.
pub fn clamp_to_map(pos: Vec3, bounds: f32) -> Vec3 {
    Vec3::new(
        pos.x.clamp(-bounds, bounds),
        pos.y,
        pos.z.clamp(-bounds, bounds),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GridConfig::default();
        assert_eq!(config.half_grid(), 512.0);
        assert_eq!(config.plot_width(), 48.0);
        assert_eq!(config.half_plot_width(), 24.0);
        assert_eq!(config.main_road_width(), 32.0);
        assert_eq!(config.half_main_road_excess(), 8.0);
        assert_eq!(config.first_offset(), 16.0);
        assert_eq!(config.max_center_coordinate(), 488.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_plot_width_invariant() {
        let config = GridConfig::new(600.0, 50.0, 10.0).unwrap();
        assert_eq!(config.plot_width(), config.road_spacing - config.road_width);
        assert_eq!(config.main_road_width(), 2.0 * config.road_width);
    }

    #[test]
    fn test_plot_offsets_default() {
        let offsets = GridConfig::default().plot_offsets();
        assert_eq!(offsets.len(), 8);
        assert_eq!(offsets[0], 16.0);
        assert_eq!(offsets[7], 464.0);
    }

    #[test]
    fn test_plot_offsets_inclusive_bound() {
        // first offset 10 + 2 * 40 = 90 lands exactly on the half extent
        let config = GridConfig::new(180.0, 40.0, 10.0).unwrap();
        assert_eq!(config.first_offset(), 10.0);
        assert_eq!(config.plot_offsets(), vec![10.0, 50.0, 90.0]);
    }

    #[test]
    fn test_invalid_configs_rejected() {
        assert!(GridConfig::new(0.0, 64.0, 16.0).is_err());
        assert!(GridConfig::new(1024.0, 16.0, 16.0).is_err());
        assert!(GridConfig::new(1024.0, 64.0, -1.0).is_err());

        let mut margin = GridConfig::default();
        margin.building_margin = 30.0;
        assert!(margin.validate().is_err());
    }

    #[test]
    fn test_oversized_lattices_rejected() {
        // would otherwise walk billions of offsets
        let dense = GridConfig {
            grid_size: 1e8,
            road_spacing: 0.002,
            road_width: 0.001,
            ..Default::default()
        };
        assert!(matches!(dense.validate(), Err(CityError::InvalidArgument(_))));

        let too_many = GridConfig {
            grid_size: 4096.0,
            road_spacing: 8.0,
            road_width: 2.0,
            ..Default::default()
        };
        assert!(too_many.validate().is_err());

        let nan = GridConfig {
            grid_size: f32::NAN,
            ..Default::default()
        };
        assert!(nan.validate().is_err());

        let wide_road = GridConfig::new(16384.0, 1024.0, 512.0);
        assert!(wide_road.is_err());
    }

    #[test]
    fn test_plot_count_estimate_matches_offsets() {
        for config in [
            GridConfig::default(),
            GridConfig::new(180.0, 40.0, 10.0).unwrap(),
            GridConfig::new(600.0, 50.0, 10.0).unwrap(),
            GridConfig::new(128.0, 64.0, 16.0).unwrap(),
        ] {
            assert_eq!(config.plot_count_estimate(), config.plots_per_half_axis());
        }
    }

    #[test]
    fn test_clamp_to_map() {
        let config = GridConfig::default();
        let clamped = config.clamp_to_map(Vec3::new(600.0, 25.0, -700.0));
        assert_eq!(clamped, Vec3::new(512.0, 25.0, -512.0));
        assert!(config.contains_xz(Vec3::new(512.0, 0.0, -512.0)));
        assert!(!config.contains_xz(Vec3::new(512.5, 0.0, 0.0)));
    }
}
