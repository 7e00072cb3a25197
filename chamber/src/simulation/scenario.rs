//! Build a ready-to-run chamber from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a `Chamber` holding:
//! - engine settings (`Engine`)
//! - physical parameters (`Parameters`)
//! - the explicit bodies followed by any factory-generated particles

use crate::configuration::config::{BodyConfig, FactoryConfig, ScenarioConfig};
use crate::error::Result;
use crate::simulation::chamber::Chamber;
use crate::simulation::engine::Engine;
use crate::simulation::factory::{FactoryRanges, ParticleFactory};
use crate::simulation::params::Parameters;
use crate::simulation::states::{Particle, ParticleIds};
use crate::simulation::vector::Vec2;

/// Validate `cfg` and assemble a stopped chamber with its initial particles
pub fn build_scenario(cfg: &ScenarioConfig) -> Result<Chamber> {
    // Engine (runtime) from EngineConfig
    let e_cfg = &cfg.engine;
    let engine = Engine {
        update_rate: e_cfg.update_rate,
        simulation_rate: e_cfg.simulation_rate,
        allow_collision: e_cfg.allow_collision,
        thread_count: e_cfg.thread_count,
    };

    // Parameters (runtime) from ParametersConfig
    let p_cfg = &cfg.parameters;
    let parameters = Parameters {
        G: p_cfg.G,
        ke: p_cfg.ke,
        min_distance: p_cfg.min_distance,
    };

    let ids = ParticleIds::new();

    // Bodies: map `BodyConfig` -> runtime `Particle`
    let mut particles = cfg
        .bodies
        .iter()
        .map(|bc: &BodyConfig| {
            Particle::new(
                &ids,
                Vec2::new(bc.x[0], bc.x[1]),
                Vec2::new(bc.v[0], bc.v[1]),
                bc.m,
                bc.q,
                bc.radius,
            )
        })
        .collect::<Result<Vec<_>>>()?;

    if let Some(f_cfg) = &cfg.factory {
        let mut factory = ParticleFactory::new(factory_ranges(f_cfg), f_cfg.seed)?;
        particles.extend(factory.build_many(&ids, f_cfg.count)?);
    }

    log::info!(
        "scenario: {} explicit + {} generated particles, {} workers",
        cfg.bodies.len(),
        particles.len() - cfg.bodies.len(),
        engine.thread_count
    );

    let mut chamber = Chamber::with_ids(&engine, parameters, ids)?;
    chamber.add_particles(particles);
    Ok(chamber)
}

fn factory_ranges(cfg: &FactoryConfig) -> FactoryRanges {
    FactoryRanges {
        mass: (cfg.mass[0], cfg.mass[1]),
        charge: (cfg.charge[0], cfg.charge[1]),
        radius: (cfg.radius[0], cfg.radius[1]),
        position: (Vec2::from(cfg.position.min), Vec2::from(cfg.position.max)),
        velocity: (Vec2::from(cfg.velocity.min), Vec2::from(cfg.velocity.max)),
    }
}
