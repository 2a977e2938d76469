//! # Tree Formation
//!
//! A cone of height `H` and base radius `R`, centred on the origin.
//!
//! The normalized index is raised to a power below one, which pushes more
//! elements toward the wide base where there is more surface to cover.

use std::f32::consts::TAU;

use arbora_shared::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::class::{AngularPlacement, ElementClass, GOLDEN_ANGLE};
use crate::error::{FormationError, FormationResult};
use crate::seed::FormationSeed;

/// Cone dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeShape {
    /// Height from base to tip.
    pub height: f32,
    /// Radius at the base.
    pub base_radius: f32,
    /// Exponent applied to the normalized index, in (0, 1].
    pub density_power: f32,
}

impl Default for TreeShape {
    fn default() -> Self {
        Self {
            height: 14.0,
            base_radius: 6.0,
            density_power: 0.8,
        }
    }
}

impl TreeShape {
    /// Checks the shape is usable.
    ///
    /// # Errors
    ///
    /// Returns the first invalid parameter.
    pub fn validate(&self) -> FormationResult<()> {
        if self.height <= 0.0 {
            return Err(FormationError::NonPositive {
                name: "tree.height",
                value: self.height,
            });
        }
        if self.base_radius <= 0.0 {
            return Err(FormationError::NonPositive {
                name: "tree.base_radius",
                value: self.base_radius,
            });
        }
        if !(self.density_power > 0.0 && self.density_power <= 1.0) {
            return Err(FormationError::DensityPower(self.density_power));
        }
        Ok(())
    }

    /// Tree target for element `index` of `total` in `class`.
    ///
    /// Pure: identical arguments always give the identical position.
    #[must_use]
    pub fn target(&self, seed: FormationSeed, class: ElementClass, index: usize, total: usize) -> Vec3 {
        let total = total.max(1);
        let u = (index.min(total - 1) as f32 + 0.5) / total as f32;
        let t = u.powf(self.density_power);

        let y = self.height * (1.0 - t) - self.height * 0.5;
        let mut radius = self.base_radius * t * class.radial_scale();

        let angle = match class.placement() {
            AngularPlacement::Random => {
                let mut rng = seed.derive(class.tag()).derive(index as u64).rng();
                // sqrt keeps the fill uniform over the disc area.
                radius *= rng.gen::<f32>().sqrt();
                rng.gen::<f32>() * TAU
            }
            AngularPlacement::GoldenAngle => index as f32 * GOLDEN_ANGLE,
            AngularPlacement::Spiral { turns } => t * turns * TAU,
        };

        Vec3::new(radius * angle.cos(), y, radius * angle.sin())
    }
}
