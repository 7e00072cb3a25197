//! Random initial particles
//!
//! Every attribute is sampled uniformly and independently from an inclusive
//! range; x and y are sampled separately. A range whose bounds are equal
//! (the usual case being an uncharged `[0, 0]` charge range) yields that
//! constant instead of sampling.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Result, SimError};
use crate::simulation::states::{Particle, ParticleIds};
use crate::simulation::vector::Vec2;

/// Inclusive `(min, max)` bounds for each generated attribute
#[derive(Debug, Clone)]
pub struct FactoryRanges {
    pub mass: (f64, f64),
    pub charge: (f64, f64),
    pub radius: (f64, f64),
    pub position: (Vec2, Vec2),
    pub velocity: (Vec2, Vec2),
}

impl Default for FactoryRanges {
    fn default() -> Self {
        Self {
            mass: (0.1, 1.0e14),
            charge: (0.0, 0.0),
            radius: (0.5, 5.0),
            position: (Vec2::new(0.0, 0.0), Vec2::new(800.0, 800.0)),
            velocity: (Vec2::new(-50.0, -50.0), Vec2::new(50.0, 50.0)),
        }
    }
}

pub struct ParticleFactory {
    ranges: FactoryRanges,
    rng: StdRng,
}

impl ParticleFactory {
    /// Factory with a reproducible sequence when `seed` is given
    pub fn new(ranges: FactoryRanges, seed: Option<u64>) -> Result<Self> {
        let r = &ranges;
        check("mass", r.mass)?;
        check("charge", r.charge)?;
        check("radius", r.radius)?;
        check("position.x", (r.position.0.x, r.position.1.x))?;
        check("position.y", (r.position.0.y, r.position.1.y))?;
        check("velocity.x", (r.velocity.0.x, r.velocity.1.x))?;
        check("velocity.y", (r.velocity.0.y, r.velocity.1.y))?;
        if r.mass.0 <= 0.0 {
            return Err(SimError::InvalidConfig(format!("mass range must be positive, got min {}", r.mass.0)));
        }
        if r.radius.0 < 0.0 {
            return Err(SimError::InvalidConfig(format!("radius range must be non-negative, got min {}", r.radius.0)));
        }

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Ok(Self { ranges, rng })
    }

    /// One particle with an id from `ids`
    pub fn build(&mut self, ids: &ParticleIds) -> Result<Particle> {
        let r = &self.ranges;
        let rng = &mut self.rng;

        let position = Vec2::new(
            sample(rng, r.position.0.x, r.position.1.x),
            sample(rng, r.position.0.y, r.position.1.y),
        );
        let velocity = Vec2::new(
            sample(rng, r.velocity.0.x, r.velocity.1.x),
            sample(rng, r.velocity.0.y, r.velocity.1.y),
        );
        let mass = sample(rng, r.mass.0, r.mass.1);
        let charge = sample(rng, r.charge.0, r.charge.1);
        let radius = sample(rng, r.radius.0, r.radius.1);

        Particle::new(ids, position, velocity, mass, charge, radius)
    }

    pub fn build_many(&mut self, ids: &ParticleIds, count: usize) -> Result<Vec<Particle>> {
        (0..count).map(|_| self.build(ids)).collect()
    }
}

fn check(name: &'static str, (min, max): (f64, f64)) -> Result<()> {
    if !(min.is_finite() && max.is_finite()) || min > max {
        return Err(SimError::InvalidRange { name, min, max });
    }
    Ok(())
}

fn sample(rng: &mut StdRng, min: f64, max: f64) -> f64 {
    if min == max {
        min
    } else {
        rng.random_range(min..=max)
    }
}
