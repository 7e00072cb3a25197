//! Core state types for the particle chamber.
//!
//! - `ParticleId` / `ParticleIds`: identity and the per-chamber id source
//! - `Particle`: kinematic and physical state of one body
//! - `Snapshot`: deep-copied view handed to readers outside the control thread

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::{Result, SimError};
use crate::simulation::vector::Vec2;

/// Unique particle identity within one chamber
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParticleId(pub u64);

impl fmt::Display for ParticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic id source. Clones share the same counter, so every particle
/// built for a chamber (including merge products) draws from one sequence.
#[derive(Debug, Clone)]
pub struct ParticleIds {
    next: Arc<AtomicU64>,
}

impl ParticleIds {
    pub fn new() -> Self {
        Self {
            next: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn next_id(&self) -> ParticleId {
        ParticleId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ParticleIds {
    fn default() -> Self {
        Self::new()
    }
}

/// A single body in the chamber
///
/// Equality and hashing only look at the id. Position and velocity are
/// public because the scheduler integrates them in place; mass, charge and
/// radius are fixed after construction so the mass > 0 invariant holds.
#[derive(Debug, Clone)]
pub struct Particle {
    id: ParticleId,
    pub position: Vec2, // m
    pub velocity: Vec2, // m/s
    mass: f64, // kg
    charge: f64, // C
    radius: f64, // m, collision and display size
}

impl Particle {
    pub fn new(
        ids: &ParticleIds,
        position: Vec2,
        velocity: Vec2,
        mass: f64,
        charge: f64,
        radius: f64,
    ) -> Result<Self> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(SimError::InvalidParticle(format!("mass must be positive, got {mass}")));
        }
        if !(radius.is_finite() && radius >= 0.0) {
            return Err(SimError::InvalidParticle(format!("radius must be non-negative, got {radius}")));
        }
        if !charge.is_finite() {
            return Err(SimError::InvalidParticle(format!("charge must be finite, got {charge}")));
        }
        if !(position.iter().all(|c| c.is_finite()) && velocity.iter().all(|c| c.is_finite())) {
            return Err(SimError::InvalidParticle("position and velocity must be finite".into()));
        }

        Ok(Self {
            id: ids.next_id(),
            position,
            velocity,
            mass,
            charge,
            radius,
        })
    }

    /// Particle with zero initial velocity
    pub fn at_rest(ids: &ParticleIds, position: Vec2, mass: f64, charge: f64, radius: f64) -> Result<Self> {
        Self::new(ids, position, Vec2::zeros(), mass, charge, radius)
    }

    pub fn id(&self) -> ParticleId {
        self.id
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn charge(&self) -> f64 {
        self.charge
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Semi-implicit Euler kick: v += a * dt
    pub fn update_velocity(&mut self, acceleration: Vec2, dt: f64) {
        self.velocity += acceleration * dt;
    }

    /// Drift with the current velocity: x += v * dt
    pub fn update_position(&mut self, dt: f64) {
        self.position += self.velocity * dt;
    }

    /// Merge two particles into a new one with a fresh id.
    ///
    /// Position and velocity are the plain mean of the two inputs; mass,
    /// charge and radius add up. Radius summation is not area-conserving.
    pub fn combine(&self, other: &Particle, ids: &ParticleIds) -> Particle {
        Particle {
            id: ids.next_id(),
            position: (self.position + other.position) * 0.5,
            velocity: (self.velocity + other.velocity) * 0.5,
            mass: self.mass + other.mass,
            charge: self.charge + other.charge,
            radius: self.radius + other.radius,
        }
    }
}

impl PartialEq for Particle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Particle {}

impl Hash for Particle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Particle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{id: {}, mass: {:.6}, charge: {:.6}, position: [{:.6}, {:.6}], velocity: [{:.6}, {:.6}]}}",
            self.id.0,
            self.mass,
            self.charge,
            self.position.x,
            self.position.y,
            self.velocity.x,
            self.velocity.y,
        )
    }
}

/// Read-only copy of the chamber for renderers and reporters
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub seconds_since_update: f64, // wall-clock time since the last applied step
    pub particles: Vec<Particle>, // deep copies, ascending id
}

impl Snapshot {
    /// Copies with positions drifted forward by `seconds_since_update`,
    /// for drawing between physics steps.
    pub fn extrapolated(&self) -> Vec<Particle> {
        self.particles
            .iter()
            .cloned()
            .map(|mut p| {
                p.update_position(self.seconds_since_update);
                p
            })
            .collect()
    }

    pub fn total_mass(&self) -> f64 {
        self.particles.iter().map(|p| p.mass).sum()
    }

    pub fn total_momentum(&self) -> Vec2 {
        self.particles
            .iter()
            .fold(Vec2::zeros(), |acc, p| acc + p.velocity * p.mass)
    }
}
