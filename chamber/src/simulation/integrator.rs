//! Semi-implicit Euler integration of one step's force results
//!
//! Velocity is kicked with the step's acceleration first, then the position
//! drifts with the new velocity.

use std::collections::BTreeMap;

use super::forces::ParticleUpdate;
use super::states::{Particle, ParticleId};

/// Apply each update to its focus particle with timestep `dt`
/// Updates whose focus is no longer in `particles` are ignored
pub fn euler_integrator(particles: &mut BTreeMap<ParticleId, Particle>, updates: &[ParticleUpdate], dt: f64) {
    for update in updates {
        if let Some(p) = particles.get_mut(&update.focus) {
            // Kick: v_n+1 = v_n + dt * a_n
            p.update_velocity(update.acceleration, dt);
            // Drift: x_n+1 = x_n + dt * v_n+1
            p.update_position(dt);
        }
    }
}
