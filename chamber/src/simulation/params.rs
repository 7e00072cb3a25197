//! Physical parameters for the force evaluation
//!
//! `Parameters` holds:
//! - Newton's gravitational constant `G`,
//! - Coulomb's constant `ke`,
//! - an optional minimum interaction distance (`min_distance`)

/// Newton's gravitational constant, m^3 kg^-1 s^-2
pub const G: f64 = 6.674e-11;

/// Coulomb's constant, N m^2 C^-2
pub const KE: f64 = 8.99e9;

#[allow(non_snake_case)]
#[derive(Debug, Clone)]
pub struct Parameters {
    pub G: f64, // gravitational constant
    pub ke: f64, // coulomb constant
    pub min_distance: f64, // clamp for close pairs, 0 leaves coincident pairs to the collision test
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            G,
            ke: KE,
            min_distance: 0.0,
        }
    }
}
