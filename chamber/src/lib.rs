pub mod error;
pub mod simulation;
pub mod configuration;
pub mod benchmark;

pub use error::{Result, SimError};

pub use simulation::vector::{Polar, Vec2};
pub use simulation::states::{Particle, ParticleId, ParticleIds, Snapshot};
pub use simulation::forces::{Coulomb, ForceTask, Interaction, InteractionSet, NewtonianGravity, ParticleUpdate};
pub use simulation::chamber::{Chamber, ChamberHandle, RunningChamber, StepReport};
pub use simulation::engine::Engine;
pub use simulation::params::Parameters;
pub use simulation::factory::{FactoryRanges, ParticleFactory};
pub use simulation::scenario::build_scenario;

pub use configuration::config::{AreaConfig, BodyConfig, EngineConfig, FactoryConfig, ParametersConfig, ScenarioConfig};

pub use benchmark::benchmark::bench_step;
