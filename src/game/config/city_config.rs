//! City Configuration
//!
//! Every tunable of the generator and of the walk in one place. `Default`
//! reproduces the classic 1024 x 1024 city with 256 buildings.
//!
//! Configs can be loaded from JSON; missing fields fall back to their default,
//! and the result is validated before use.

use serde::{Deserialize, Serialize};

use crate::error::{CityError, Result};
use crate::world::GridConfig;

/// Dimensions of the staircase leading down to the treasure corridor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StairsConfig {
    /// Number of steps (at least 1)
    pub step_count: u32,
    /// Drop of each step
    pub step_height: f32,
    /// Run of each step along the descent
    pub step_depth: f32,
}

impl Default for StairsConfig {
    fn default() -> Self {
        Self {
            step_count: 8,
            step_height: 6.0,
            step_depth: 6.0,
        }
    }
}

impl StairsConfig {
    /// Total height lost from the top step to the corridor floor.
    pub fn total_drop(&self) -> f32 {
        self.step_count as f32 * self.step_height
    }

    /// Horizontal length covered by all steps.
    pub fn total_run(&self) -> f32 {
        self.step_count as f32 * self.step_depth
    }
}

/// Central configuration for city generation and player movement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CityConfig {
    /// Road lattice and plot geometry
    pub grid: GridConfig,
    /// Lowest building height (inclusive)
    pub min_height: i32,
    /// Highest building height (inclusive)
    pub max_height: i32,
    /// Lowest grey level, in percent of full brightness
    pub min_color: i32,
    /// Highest grey level, in percent of full brightness
    pub max_color: i32,
    /// Percentage of buildings using a fuzzy facade
    pub fuzzy_chance: i32,
    /// Distinct facade bitmaps per style
    pub classes_per_style: u8,
    /// Sparser lighting for every generated facade
    pub low_density_facades: bool,
    /// Distance kept between the player and building walls
    pub restricted_margin: f32,
    /// Eye height above the floor the player stands on
    pub eye_height: f32,
    /// Staircase below the treasure plot
    pub stairs: StairsConfig,
    /// Corridor length past the stairs, excluding the treasure chamber
    pub corridor_length: f32,
    /// Cap on the treasure rejection loop
    pub max_treasure_attempts: u32,
    /// Cap on random spawn attempts
    pub max_spawn_attempts: u32,
}

impl Default for CityConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            min_height: 80,
            max_height: 200,
            min_color: 50,
            max_color: 90,
            fuzzy_chance: 60,
            classes_per_style: 8,
            low_density_facades: false,
            restricted_margin: 2.0,
            eye_height: 10.0,
            stairs: StairsConfig::default(),
            corridor_length: 256.0,
            max_treasure_attempts: 1000,
            max_spawn_attempts: 1000,
        }
    }
}

impl CityConfig {
    /// Parse a JSON document and validate it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: CityConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Pretty JSON representation, suitable for `from_json_str`.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.grid.validate()?;

        if self.min_height <= 0 || self.max_height < self.min_height {
            return Err(CityError::invalid(format!(
                "building heights must satisfy 0 < min <= max (got {}..={})",
                self.min_height, self.max_height
            )));
        }
        if self.min_color < 0 || self.max_color > 100 || self.max_color < self.min_color {
            return Err(CityError::invalid(format!(
                "colour range must lie within 0..=100 (got {}..={})",
                self.min_color, self.max_color
            )));
        }
        if !(0..=100).contains(&self.fuzzy_chance) {
            return Err(CityError::invalid(format!(
                "fuzzy_chance is a percentage (got {})",
                self.fuzzy_chance
            )));
        }
        if self.classes_per_style == 0 {
            return Err(CityError::invalid("classes_per_style must be at least 1"));
        }
        if self.restricted_margin < 0.0 {
            return Err(CityError::invalid("restricted_margin cannot be negative"));
        }
        if self.eye_height <= 0.0 {
            return Err(CityError::invalid("eye_height must be positive"));
        }
        // the corridor is entered from a tread below ground level
        if self.stairs.step_count < 2 || self.stairs.step_height <= 0.0 || self.stairs.step_depth <= 0.0 {
            return Err(CityError::invalid(format!(
                "stairs need at least two steps of positive size (got {:?})",
                self.stairs
            )));
        }
        if self.stairs.total_run() > self.grid.building_width() {
            return Err(CityError::invalid(format!(
                "stairs run ({}) does not fit on a building plot ({})",
                self.stairs.total_run(),
                self.grid.building_width()
            )));
        }
        if !(self.corridor_length >= 0.0 && self.corridor_length.is_finite()) {
            return Err(CityError::invalid("corridor_length must be a finite, non-negative length"));
        }
        if self.max_treasure_attempts == 0 || self.max_spawn_attempts == 0 {
            return Err(CityError::invalid("attempt caps must be at least 1"));
        }
        Ok(())
    }

    /// Total number of texture classes (both styles).
    pub fn texture_class_count(&self) -> usize {
        self.classes_per_style as usize * 2
    }

    /// Mean building height, used to size facade bitmaps.
    pub fn average_height(&self) -> i32 {
        (self.min_height + self.max_height) / 2
    }

    /// Number of window columns before jitter: one window per 4 units of wall.
    pub fn base_windows_x(&self) -> i32 {
        ((self.grid.building_width() / 4.0) as i32).max(1)
    }

    /// Number of window rows before jitter: one floor per 6 units of height.
    pub fn base_windows_y(&self) -> i32 {
        (self.average_height() / 6).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_classic_city() {
        let config = CityConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.texture_class_count(), 16);
        assert_eq!(config.average_height(), 140);
        assert_eq!(config.base_windows_x(), 12);
        assert_eq!(config.base_windows_y(), 23);
        assert_eq!(config.stairs.total_drop(), 48.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = CityConfig::from_json_str(
            r#"{ "min_height": 20, "max_height": 40, "grid": { "road_spacing": 80.0 } }"#,
        )
        .unwrap();
        assert_eq!(config.min_height, 20);
        assert_eq!(config.grid.road_spacing, 80.0);
        assert_eq!(config.grid.road_width, 16.0);
        assert_eq!(config.classes_per_style, 8);
    }

    #[test]
    fn test_json_round_trip() {
        let config = CityConfig {
            fuzzy_chance: 10,
            ..Default::default()
        };
        let json = config.to_json_string().unwrap();
        assert_eq!(CityConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let bad = [
            CityConfig { max_height: 10, ..Default::default() },
            CityConfig { max_color: 120, ..Default::default() },
            CityConfig { classes_per_style: 0, ..Default::default() },
            CityConfig { fuzzy_chance: 101, ..Default::default() },
            CityConfig {
                stairs: StairsConfig { step_count: 0, ..Default::default() },
                ..Default::default()
            },
            CityConfig {
                stairs: StairsConfig { step_count: 1, ..Default::default() },
                ..Default::default()
            },
            CityConfig { corridor_length: f32::INFINITY, ..Default::default() },
        ];
        for config in bad {
            assert!(matches!(config.validate(), Err(CityError::InvalidArgument(_))));
        }
    }

    #[test]
    fn test_oversized_grid_json_rejected() {
        let err = CityConfig::from_json_str(
            r#"{ "grid": { "grid_size": 1e8, "road_spacing": 0.002, "road_width": 0.001 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, CityError::InvalidArgument(_)));
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let err = CityConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, CityError::Config(_)));
    }
}
