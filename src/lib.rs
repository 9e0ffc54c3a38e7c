//! Arena Shooter - entity simulation core for a 3D arena shooter
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (entities, interaction, spawning, game state)
//! - `renderer`: Renderer boundary (instance records, camera matrices)
//! - `persistence`: Save/load (legacy text format and versioned JSON envelope)
//! - `tuning`: Data-driven game balance
//! - `logging`: Native logger initialisation

pub mod error;
#[cfg(not(target_arch = "wasm32"))]
pub mod logging;
pub mod persistence;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use error::SimError;
pub use tuning::Tuning;

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Time multiplier applied by fast-forward (and divided by slow-motion)
    pub const TIME_COEF: f32 = 10.0;
    /// Far clip distance and default world boundary radius
    pub const MAX_DISTANCE: f32 = 300.0;

    /// Gap between a shooter's hull and a freshly fired light projectile
    pub const LIGHT_SHOT_OFFSET: f32 = 0.2;
    /// Gap between the player's hull and a freshly fired heavy projectile
    pub const HEAVY_SHOT_OFFSET: f32 = 2.0;

    /// Vertical look limit (radians)
    pub const MAX_PITCH: f32 = std::f32::consts::FRAC_PI_2;

    /// Tolerance for "approximately unit length" direction vectors
    pub const UNIT_TOLERANCE: f32 = 1.0e-3;
}

/// Unit vector on the ground plane for a heading angle.
///
/// Angle 0 faces +Z, positive angles turn toward +X.
#[inline]
pub fn heading_to_vec(angle: f32) -> Vec3 {
    Vec3::new(angle.sin(), 0.0, angle.cos())
}

/// Unit vector for a heading and pitch pair
#[inline]
pub fn look_to_vec(heading: f32, pitch: f32) -> Vec3 {
    Vec3::new(pitch.cos() * heading.sin(), pitch.sin(), pitch.cos() * heading.cos())
}

/// Normalize a vector, leaving the zero vector untouched
#[inline]
pub fn unit_or_zero(v: Vec3) -> Vec3 {
    let len = v.length();
    if len > 0.0 { v / len } else { Vec3::ZERO }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_heading_to_vec() {
        let forward = heading_to_vec(0.0);
        assert!((forward - Vec3::Z).length() < 1e-6);

        let right = heading_to_vec(FRAC_PI_2);
        assert!((right - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn test_look_to_vec_is_unit() {
        for &(h, p) in &[(0.0, 0.0), (1.0, 0.5), (-2.0, -1.2), (3.0, FRAC_PI_2)] {
            assert!((look_to_vec(h, p).length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_unit_or_zero() {
        assert_eq!(unit_or_zero(Vec3::ZERO), Vec3::ZERO);
        let v = unit_or_zero(Vec3::new(3.0, 0.0, 4.0));
        assert!((v.length() - 1.0).abs() < 1e-6);
    }
}
