//! Error types for the chamber engine.

use thiserror::Error;

use crate::simulation::states::ParticleId;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid particle: {0}")]
    InvalidParticle(String),

    #[error("invalid range for {name}: min {min} > max {max}")]
    InvalidRange { name: &'static str, min: f64, max: f64 },

    #[error("particles {focus} and {other} share a position, force is undefined")]
    Coincident { focus: ParticleId, other: ParticleId },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("force task panicked: {0}")]
    TaskPanicked(String),

    #[error("worker pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("scenario error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
