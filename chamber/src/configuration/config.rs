//! Configuration types for loading chamber scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scenario. A scenario consists of:
//!
//! - [`EngineConfig`]     – step cadence, time dilation, collisions, worker pool
//! - [`ParametersConfig`] – physical constants and the minimum distance clamp
//! - [`FactoryConfig`]    – optional randomized particle generation
//! - [`BodyConfig`]       – optional explicit initial particles
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//! Every section and field falls back to its default when omitted:
//!
//! ```yaml
//! engine:
//!   update_rate: 60.0       # physics steps per wall-clock second
//!   simulation_rate: 1.0    # simulated seconds per wall-clock second
//!   allow_collision: true   # merge overlapping particles
//!   thread_count: 100       # force task workers
//!
//! parameters:
//!   G: 6.674e-11            # gravitational constant
//!   ke: 8.99e9              # coulomb constant
//!   min_distance: 0.0       # 0 -> coincident pairs merge or skip the step
//!
//! factory:
//!   count: 50
//!   seed: 42                # omit for a random run
//!   mass: [0.1, 1.0e14]
//!   charge: [0.0, 0.0]
//!   radius: [0.5, 5.0]
//!   position: { min: [0.0, 0.0], max: [800.0, 800.0] }
//!   velocity: { min: [-50.0, -50.0], max: [50.0, 50.0] }
//!
//! bodies:
//!   - x: [ 100.0, 100.0 ]
//!     v: [   0.0,   0.0 ]
//!     m: 1.0e12
//!     q: 0.0
//!     radius: 4.0
//! ```

use serde::Deserialize;

use crate::simulation::engine::{DEFAULT_THREAD_COUNT, DEFAULT_UPDATE_RATE};
use crate::simulation::params::{G, KE};

/// Step loop and worker pool configuration
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct EngineConfig {
    pub update_rate: f64, // physics steps per wall-clock second
    pub simulation_rate: f64, // time dilation multiplier
    pub allow_collision: bool, // merge overlapping particles
    pub thread_count: usize, // size of the force task pool
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            update_rate: DEFAULT_UPDATE_RATE,
            simulation_rate: 1.0,
            allow_collision: true,
            thread_count: DEFAULT_THREAD_COUNT,
        }
    }
}

/// Physical constants for a scenario
#[allow(non_snake_case)]
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ParametersConfig {
    pub G: f64, // gravitational constant
    pub ke: f64, // coulomb constant
    pub min_distance: f64, // separation clamp, 0 disables clamping
}

impl Default for ParametersConfig {
    fn default() -> Self {
        Self {
            G,
            ke: KE,
            min_distance: 0.0,
        }
    }
}

/// Axis-aligned box given by two corners
#[derive(Deserialize, Debug, Clone)]
pub struct AreaConfig {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

/// Randomized particle generation
#[derive(Deserialize, Debug, Clone)]
pub struct FactoryConfig {
    pub count: usize, // number of particles to build
    pub seed: Option<u64>, // fixed seed for reproducible runs
    pub mass: [f64; 2], // inclusive [min, max], kg
    pub charge: [f64; 2], // inclusive [min, max], C
    pub radius: [f64; 2], // inclusive [min, max], m
    pub position: AreaConfig,
    pub velocity: AreaConfig,
}

/// Configuration for a single particle's initial state
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    pub x: [f64; 2], // initial position
    pub v: [f64; 2], // initial velocity
    pub m: f64, // mass, must be positive
    #[serde(default)]
    pub q: f64, // charge
    pub radius: f64, // collision radius
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub parameters: ParametersConfig,
    pub factory: Option<FactoryConfig>,
    #[serde(default)]
    pub bodies: Vec<BodyConfig>,
}

impl ScenarioConfig {
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }
}
