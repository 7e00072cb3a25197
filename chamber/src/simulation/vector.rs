//! 2D vector primitive
//!
//! `Vec2` is the nalgebra `Vector2<f64>`: a `Copy` value with exact
//! component equality, addition and scalar multiplication out of the box.
//! [`Polar`] adds the two operations the engine needs on top of that.

use nalgebra::Vector2;

pub type Vec2 = Vector2<f64>;

/// Polar construction and point distance for [`Vec2`]
pub trait Polar {
    /// `(r cos θ, r sin θ)`
    fn from_polar(radius: f64, theta: f64) -> Self;

    /// Euclidean norm of `self - other`
    fn distance(&self, other: &Self) -> f64;

    /// Angle of the vector pointing from `self` to `other`
    fn angle_to(&self, other: &Self) -> f64;
}

impl Polar for Vec2 {
    fn from_polar(radius: f64, theta: f64) -> Self {
        let (sin, cos) = theta.sin_cos();
        Vec2::new(radius * cos, radius * sin)
    }

    fn distance(&self, other: &Self) -> f64 {
        (self - other).norm()
    }

    fn angle_to(&self, other: &Self) -> f64 {
        let d = other - self;
        d.y.atan2(d.x)
    }
}
