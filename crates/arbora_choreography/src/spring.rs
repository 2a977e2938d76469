//! Damped springs.
//!
//! Semi-implicit Euler: velocity first, then position with the new velocity.
//! Retargeting only changes the force, never the velocity, so interrupted
//! transitions stay smooth.

use arbora_shared::constants::MAX_FRAME_DT;
use arbora_shared::Vec3;
use serde::{Deserialize, Serialize};

/// Spring stiffness and damping.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpringParams {
    /// Restoring force per unit displacement.
    pub stiffness: f32,
    /// Resisting force per unit velocity.
    pub damping: f32,
}

impl SpringParams {
    /// Position spring: settles in ~1.2 s with no visible overshoot.
    pub const POSITION: Self = Self {
        stiffness: 30.0,
        damping: 11.0,
    };

    /// Scale spring: slightly snappier than position.
    pub const SCALE: Self = Self {
        stiffness: 40.0,
        damping: 12.6,
    };

    /// Critically damped spring for a stiffness.
    #[must_use]
    pub fn critically_damped(stiffness: f32) -> Self {
        Self {
            stiffness,
            damping: 2.0 * stiffness.sqrt(),
        }
    }

    /// Damping ratio ζ; 1.0 is critical.
    #[must_use]
    pub fn damping_ratio(&self) -> f32 {
        self.damping / (2.0 * self.stiffness.sqrt())
    }

    /// Whether one integration step of `dt` stays bounded.
    ///
    /// The semi-implicit Euler update decays only while
    /// `k·dt² + 2·c·dt < 4` and `c·dt < 2`; outside that region positions
    /// grow every step until they overflow.
    #[must_use]
    pub fn is_stable_at(&self, dt: f32) -> bool {
        let (k, c) = (self.stiffness, self.damping);
        k.is_finite()
            && c.is_finite()
            && k >= 0.0
            && c >= 0.0
            && k * dt * dt + 2.0 * c * dt < 4.0
            && c * dt < 2.0
    }

    /// Advances a 3D spring toward `target`.
    #[inline]
    pub fn step_vec3(&self, position: &mut Vec3, velocity: &mut Vec3, target: Vec3, dt: f32) {
        let accel = (*position - target) * -self.stiffness - *velocity * self.damping;
        *velocity += accel * dt;
        *position += *velocity * dt;
    }

    /// Advances a scalar spring toward `target`.
    #[inline]
    pub fn step_scalar(&self, value: &mut f32, velocity: &mut f32, target: f32, dt: f32) {
        let accel = -self.stiffness * (*value - target) - self.damping * *velocity;
        *velocity += accel * dt;
        *value += *velocity * dt;
    }
}

/// Clamps a measured frame time to a stable integration step.
///
/// Negative or non-finite input becomes zero.
#[inline]
#[must_use]
pub fn clamp_dt(dt: f32) -> f32 {
    if dt.is_finite() {
        dt.clamp(0.0, MAX_FRAME_DT)
    } else {
        0.0
    }
}
