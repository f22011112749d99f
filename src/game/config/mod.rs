//! Config Module
//!
//! Centralized configuration for city generation and movement parameters.

pub mod city_config;

pub use city_config::{CityConfig, StairsConfig};
