//! City Generation Tests
//!
//! End-to-end properties of `generate_city`: determinism, building count,
//! treasure placement, colours and facades.

use glam::Vec3;
use randcity_engine::game::city::{is_on_outer_ring, synthesize_facade};
use randcity_engine::game::{CityConfig, TextureClass, generate_city};
use randcity_engine::physics::RestrictedArea;
use randcity_engine::world::{CityRng, GridConfig};
use randcity_engine::CityError;
use test_case::test_case;

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_same_seed_same_city() {
    let config = CityConfig::default();
    let a = generate_city(&config, Some(2024)).unwrap();
    let b = generate_city(&config, Some(2024)).unwrap();

    assert_eq!(a.seed, 2024);
    assert_eq!(a.buildings, b.buildings);
    assert_eq!(a.treasure_anchor, b.treasure_anchor);
    assert_eq!(a.treasure_volume, b.treasure_volume);
    assert_eq!(a.stairs, b.stairs);
    assert_eq!(a.facades, b.facades);
}

#[test]
fn test_different_seeds_differ() {
    let config = CityConfig::default();
    let a = generate_city(&config, Some(1)).unwrap();
    let b = generate_city(&config, Some(2)).unwrap();
    assert_ne!(a.buildings, b.buildings);
}

#[test]
fn test_random_seed_is_reported() {
    let config = CityConfig::default();
    let city = generate_city(&config, None).unwrap();
    let again = generate_city(&config, Some(city.seed)).unwrap();
    assert_eq!(city.buildings, again.buildings);
}

// ============================================================================
// Layout
// ============================================================================

#[test]
fn test_default_city_has_256_plots() {
    let city = generate_city(&CityConfig::default(), Some(7)).unwrap();
    // 4 quadrants x 8 x 8 plots, one promoted to treasure
    assert_eq!(city.buildings.len() + 1, 256);
    assert_eq!(city.restricted_areas.len(), city.buildings.len());
}

#[test_case(768.0, 64.0, 16.0 ; "smaller lattice")]
#[test_case(1024.0, 64.0, 16.0 ; "default lattice")]
#[test_case(2048.0, 128.0, 32.0 ; "coarse lattice")]
fn test_plot_count_matches_offsets(grid_size: f32, spacing: f32, road: f32) {
    let grid = GridConfig::new(grid_size, spacing, road).unwrap();
    let per_axis = grid.plots_per_half_axis();
    let config = CityConfig {
        grid,
        ..Default::default()
    };
    let city = generate_city(&config, Some(3)).unwrap();
    assert_eq!(city.buildings.len() + 1, 4 * per_axis * per_axis);
}

#[test]
fn test_treasure_never_on_outer_ring() {
    let config = CityConfig::default();
    for seed in 0..200 {
        let city = generate_city(&config, Some(seed)).unwrap();
        let anchor = city.treasure_anchor;
        assert!(!is_on_outer_ring(&config.grid, anchor), "seed {seed}: {anchor}");
        assert!(anchor.x.abs() < 488.0 && anchor.z.abs() < 488.0);
    }
}

#[test]
fn test_treasure_plot_has_no_restricted_area() {
    let config = CityConfig::default();
    for seed in 0..20 {
        let city = generate_city(&config, Some(seed)).unwrap();
        let hit = city
            .restricted_areas
            .first_overlapping(city.treasure_anchor + Vec3::new(0.0, 1.0, 0.0));
        assert!(hit.is_none(), "seed {seed}: treasure plot is blocked");
        assert!(city.buildings.iter().all(|b| b.center != city.treasure_anchor));
    }
}

#[test]
fn test_every_building_is_blocked() {
    let city = generate_city(&CityConfig::default(), Some(11)).unwrap();
    for (i, building) in city.buildings.iter().enumerate() {
        let inside = building.center + Vec3::new(0.0, building.height / 2.0, 0.0);
        let area: &RestrictedArea = city.restricted_areas.first_overlapping(inside).unwrap();
        assert_eq!(area.building, i);
    }
}

// ============================================================================
// Buildings
// ============================================================================

#[test]
fn test_colors_and_heights_in_range() {
    let config = CityConfig::default();
    for seed in 0..10 {
        let city = generate_city(&config, Some(seed)).unwrap();
        for building in &city.buildings {
            assert!(building.color.iter().all(|c| (0.0..=1.0).contains(c)));
            assert!((80.0..=200.0).contains(&building.height));
            // the green channel is never tinted
            assert!((0.5..=0.9).contains(&building.color[1]));
        }
    }
}

#[test]
fn test_both_styles_appear() {
    let city = generate_city(&CityConfig::default(), Some(99)).unwrap();
    let fuzzy = city.buildings.iter().filter(|b| b.texture_class.is_fuzzy()).count();
    let linear = city.buildings.len() - fuzzy;
    // 60 % fuzzy on average over 255 buildings
    assert!(fuzzy > linear);
    assert!(linear > 50);
}

// ============================================================================
// Facades
// ============================================================================

#[test_case(TextureClass::Fuzzy(0), false)]
#[test_case(TextureClass::Fuzzy(5), true)]
#[test_case(TextureClass::Linear(2), false)]
#[test_case(TextureClass::Linear(7), true)]
fn test_facade_is_deterministic(class: TextureClass, low_density: bool) {
    let a = synthesize_facade(class, low_density, &mut CityRng::new(31)).unwrap();
    let b = synthesize_facade(class, low_density, &mut CityRng::new(31)).unwrap();
    let c = synthesize_facade(class, low_density, &mut CityRng::new(32)).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_streams_are_independent() {
    // a different colour range changes the tints only
    let base = CityConfig::default();
    let muted = CityConfig {
        min_color: 60,
        max_color: 70,
        ..Default::default()
    };
    let a = generate_city(&base, Some(8)).unwrap();
    let b = generate_city(&muted, Some(8)).unwrap();

    assert_eq!(a.facades, b.facades);
    assert_eq!(a.treasure_anchor, b.treasure_anchor);
    for (x, y) in a.buildings.iter().zip(&b.buildings) {
        assert_eq!(x.height, y.height);
    }
}

// ============================================================================
// Configuration errors
// ============================================================================

#[test]
fn test_invalid_config_is_rejected() {
    let config = CityConfig {
        min_color: 90,
        max_color: 50,
        ..Default::default()
    };
    let err = generate_city(&config, Some(1)).unwrap_err();
    assert!(matches!(err, CityError::InvalidArgument(_)));
}

#[test]
fn test_degenerate_lattice_fails_treasure_pick() {
    let config = CityConfig {
        grid: GridConfig::new(128.0, 64.0, 16.0).unwrap(),
        max_treasure_attempts: 10,
        ..Default::default()
    };
    let err = generate_city(&config, Some(1)).unwrap_err();
    assert!(matches!(err, CityError::GenerationInvariantViolation(_)));
}

#[test]
fn test_corridor_past_city_edge_fails() {
    // the chamber would end beyond the opposite edge of the city
    let config = CityConfig {
        corridor_length: 2000.0,
        ..Default::default()
    };
    for seed in [1, 8, 42] {
        let err = generate_city(&config, Some(seed)).unwrap_err();
        assert!(matches!(err, CityError::GenerationInvariantViolation(_)));
    }
}

#[test]
fn test_oversized_grid_fails_fast() {
    let json = r#"{ "grid": { "grid_size": 1e8, "road_spacing": 0.002, "road_width": 0.001 } }"#;
    let err = CityConfig::from_json_str(json).unwrap_err();
    assert!(matches!(err, CityError::InvalidArgument(_)));
}
