//! Force / collision evaluation for one focus particle
//!
//! Defines the pairwise interaction trait with Newtonian gravity and
//! Coulomb terms, and the per-particle task the scheduler fans out to its
//! worker pool: net acceleration plus the set of particles the focus touches.

use crate::error::{Result, SimError};
use crate::simulation::params::Parameters;
use crate::simulation::states::{Particle, ParticleId};
use crate::simulation::vector::{Polar, Vec2};

/// Collection of pairwise acceleration terms (gravity, electrostatics, ...)
/// Each term implements [`Interaction`] and their contributions are summed
/// into a single acceleration vector per pair
pub struct InteractionSet {
    terms: Vec<Box<dyn Interaction + Send + Sync>>,
}

impl InteractionSet {
    /// Create an empty interaction set
    pub fn new() -> Self {
        Self {
            terms: Vec::new(),
        }
    }

    /// Gravity and Coulomb terms with the constants from `params`
    pub fn from_parameters(params: &Parameters) -> Self {
        Self::new()
            .with(NewtonianGravity { G: params.G })
            .with(Coulomb { ke: params.ke })
    }

    /// Add an interaction term
    pub fn with<T>(mut self, term: T) -> Self
    where
        T: Interaction + Send + Sync + 'static,
    {
        self.terms.push(Box::new(term));
        self
    }

    /// Sum of all terms for the pair (`focus`, `other`)
    pub fn pair_acceleration(&self, focus: &Particle, other: &Particle, distance: f64, angle: f64) -> Vec2 {
        self.terms
            .iter()
            .fold(Vec2::zeros(), |acc, term| acc + term.acceleration(focus, other, distance, angle))
    }
}

impl Default for InteractionSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Acceleration that `other` imparts on `focus`
/// `distance` is the separation, `angle` the direction from focus to other
pub trait Interaction {
    fn acceleration(&self, focus: &Particle, other: &Particle, distance: f64, angle: f64) -> Vec2;
}

/// Newton's law of gravitation, always toward the other particle
#[allow(non_snake_case)]
pub struct NewtonianGravity {
    pub G: f64,
}

impl Interaction for NewtonianGravity {
    fn acceleration(&self, focus: &Particle, other: &Particle, distance: f64, angle: f64) -> Vec2 {
        // F = G m_f m_o / r^2, a = F / m_f
        let force = self.G * focus.mass() * other.mass() / (distance * distance);
        Vec2::from_polar(force / focus.mass(), angle)
    }
}

/// Coulomb's law
///
/// The raw force `ke q_f q_o / r^2` is positive for like charges. Its sign is
/// inverted before it is laid along `angle` (which points at the other
/// particle), so like charges push apart and opposite charges pull together.
pub struct Coulomb {
    pub ke: f64,
}

impl Interaction for Coulomb {
    fn acceleration(&self, focus: &Particle, other: &Particle, distance: f64, angle: f64) -> Vec2 {
        let force = self.ke * focus.charge() * other.charge() / (distance * distance);
        Vec2::from_polar(-force / focus.mass(), angle)
    }
}

/// Result of one force task, consumed once by the scheduler
#[derive(Debug, Clone)]
pub struct ParticleUpdate {
    pub focus: ParticleId,
    pub acceleration: Vec2, // net, m/s^2
    pub collisions: Vec<ParticleId>, // ascending
}

/// `a` and `b` touch when their circles overlap or are tangent, but not when
/// one lies strictly inside the other without contact
pub fn colliding(a: &Particle, b: &Particle, distance: f64) -> bool {
    (a.radius() - b.radius()).abs() <= distance && distance <= a.radius() + b.radius()
}

/// Settings shared by every task of one step
pub struct ForceTask<'a> {
    pub interactions: &'a InteractionSet,
    pub min_distance: f64,
    pub allow_collision: bool,
}

impl ForceTask<'_> {
    /// Net acceleration on `focus` from every other particle in `particles`,
    /// plus the ids it collides with.
    ///
    /// A pair at zero separation has no defined force. With `min_distance`
    /// set the separation is clamped for the force terms. Otherwise a pair
    /// that is about to merge contributes no force this step, and any other
    /// such pair is reported as [`SimError::Coincident`].
    pub fn evaluate(&self, focus: &Particle, particles: &[Particle]) -> Result<ParticleUpdate> {
        let mut acceleration = Vec2::zeros();
        let mut collisions = Vec::new();

        for other in particles.iter().filter(|p| p.id() != focus.id()) {
            let distance = focus.position.distance(&other.position);
            let collides = self.allow_collision && colliding(focus, other, distance);

            let effective = if self.min_distance > 0.0 {
                distance.max(self.min_distance)
            } else if distance > 0.0 && distance.is_finite() {
                distance
            } else if collides {
                collisions.push(other.id());
                continue;
            } else {
                return Err(SimError::Coincident {
                    focus: focus.id(),
                    other: other.id(),
                });
            };

            let angle = focus.position.angle_to(&other.position);
            acceleration += self.interactions.pair_acceleration(focus, other, effective, angle);

            if collides {
                collisions.push(other.id());
            }
        }

        collisions.sort_unstable();

        Ok(ParticleUpdate {
            focus: focus.id(),
            acceleration,
            collisions,
        })
    }
}
