//! # Galaxy Formation
//!
//! Uniform samples inside a spherical shell, squashed vertically into a
//! flattened disk.
//!
//! Polar angle uses `acos(2u - 1)` so samples do not bunch at the poles;
//! radius uses the cube root of a uniform variate between `inner³` and
//! `outer³` so the shell volume fills evenly.

use std::f32::consts::TAU;

use arbora_shared::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{FormationError, FormationResult};

/// Shell dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalaxyShell {
    /// Inner radius of the shell.
    pub inner_radius: f32,
    /// Outer radius of the shell.
    pub outer_radius: f32,
    /// Multiplier applied to y after sampling.
    pub vertical_compression: f32,
}

impl Default for GalaxyShell {
    fn default() -> Self {
        Self {
            inner_radius: 8.0,
            outer_radius: 22.0,
            vertical_compression: 0.5,
        }
    }
}

impl GalaxyShell {
    /// Checks the shell is usable.
    ///
    /// # Errors
    ///
    /// Returns the first invalid parameter.
    pub fn validate(&self) -> FormationResult<()> {
        if self.inner_radius < 0.0 {
            return Err(FormationError::NonPositive {
                name: "galaxy.inner_radius",
                value: self.inner_radius,
            });
        }
        if self.inner_radius >= self.outer_radius {
            return Err(FormationError::InvertedShell {
                inner: self.inner_radius,
                outer: self.outer_radius,
            });
        }
        if self.vertical_compression <= 0.0 {
            return Err(FormationError::NonPositive {
                name: "galaxy.vertical_compression",
                value: self.vertical_compression,
            });
        }
        Ok(())
    }

    /// Draws one galaxy target. Successive calls give independent samples.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        let inner3 = self.inner_radius.powi(3);
        let outer3 = self.outer_radius.powi(3);
        let radius = (inner3 + rng.gen::<f32>() * (outer3 - inner3))
            .cbrt()
            .clamp(self.inner_radius, self.outer_radius);

        let theta = rng.gen::<f32>() * TAU;
        let phi = (2.0 * rng.gen::<f32>() - 1.0).clamp(-1.0, 1.0).acos();

        Vec3::new(
            radius * phi.sin() * theta.cos(),
            radius * phi.cos() * self.vertical_compression,
            radius * phi.sin() * theta.sin(),
        )
    }

    /// Undoes the vertical compression and returns the distance to the origin.
    #[must_use]
    pub fn shell_radius(&self, point: Vec3) -> f32 {
        Vec3::new(point.x, point.y / self.vertical_compression, point.z).length()
    }
}
