//! # Formation Error Types

use thiserror::Error;

/// Invalid formation parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormationError {
    /// A length that must be positive was not.
    #[error("{name} must be positive, got {value}")]
    NonPositive {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: f32,
    },

    /// The galaxy shell's inner radius is not below its outer radius.
    #[error("galaxy shell inverted: inner {inner} >= outer {outer}")]
    InvertedShell {
        /// Inner radius.
        inner: f32,
        /// Outer radius.
        outer: f32,
    },

    /// Density power outside (0, 1].
    #[error("density power must be in (0, 1], got {0}")]
    DensityPower(f32),
}

/// Result type for formation operations.
pub type FormationResult<T> = Result<T, FormationError>;
