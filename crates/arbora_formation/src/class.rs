//! Element classes and how each one is placed on the tree.

use serde::{Deserialize, Serialize};

/// Golden angle in radians (π·(3−√5)).
pub const GOLDEN_ANGLE: f32 = 2.399_963_2;

/// How elements of a class are spread around the tree axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AngularPlacement {
    /// Independent random angle per element, filling the cone volume.
    Random,
    /// Golden-angle steps for an even spread.
    GoldenAngle,
    /// Archimedean spiral with the given number of turns.
    Spiral {
        /// Full turns from tip to base.
        turns: f32,
    },
}

/// Decorative element class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementClass {
    /// Small glowing particles, the bulk of the scene.
    Ambient,
    /// Gift boxes.
    Box,
    /// Gem ornaments.
    Gem,
    /// Ribbon segments winding around the tree.
    Ribbon,
    /// Photo cards; the usual focus candidates.
    PhotoCard,
}

impl ElementClass {
    /// All classes in setup order.
    pub const ALL: [Self; 5] = [Self::Ambient, Self::Box, Self::Gem, Self::Ribbon, Self::PhotoCard];

    /// Angular placement on the tree.
    #[must_use]
    pub const fn placement(self) -> AngularPlacement {
        match self {
            Self::Ambient => AngularPlacement::Random,
            Self::Box | Self::Gem => AngularPlacement::GoldenAngle,
            Self::Ribbon => AngularPlacement::Spiral { turns: 7.0 },
            Self::PhotoCard => AngularPlacement::Spiral { turns: 3.0 },
        }
    }

    /// Radius multiplier relative to the cone surface.
    #[must_use]
    pub const fn radial_scale(self) -> f32 {
        match self {
            Self::Ambient | Self::Gem => 1.0,
            Self::Box => 0.9,
            Self::Ribbon => 1.1,
            Self::PhotoCard => 1.25,
        }
    }

    /// Resting scale.
    #[must_use]
    pub const fn base_scale(self) -> f32 {
        match self {
            Self::Ambient => 0.08,
            Self::Box => 0.45,
            Self::Gem => 0.3,
            Self::Ribbon => 0.2,
            Self::PhotoCard => 0.9,
        }
    }

    /// Stable tag for seed derivation.
    #[must_use]
    pub const fn tag(self) -> u64 {
        match self {
            Self::Ambient => 1,
            Self::Box => 2,
            Self::Gem => 3,
            Self::Ribbon => 4,
            Self::PhotoCard => 5,
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ambient => "ambient",
            Self::Box => "box",
            Self::Gem => "gem",
            Self::Ribbon => "ribbon",
            Self::PhotoCard => "photo_card",
        }
    }
}
