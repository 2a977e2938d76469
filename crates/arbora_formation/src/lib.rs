//! # ARBORA Formation
//!
//! Procedural target positions for every decorative element.
//!
//! ## Formations
//!
//! - **Tree**: a cone, denser toward the base; angular placement depends on
//!   the element class (random, golden angle, or spiral)
//! - **Galaxy**: a flattened spherical shell, sampled uniformly
//!
//! ## Determinism Guarantee
//!
//! Given the same [`FormationSeed`], the generator produces exactly the same
//! targets on any platform, any time.
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut gen = FormationGenerator::new(FormationConfig::default())?;
//! let cards = gen.generate_class(ElementClass::PhotoCard, 24);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod class;
pub mod error;
pub mod galaxy;
pub mod generator;
pub mod seed;
pub mod tree;

pub use class::{AngularPlacement, ElementClass, GOLDEN_ANGLE};
pub use error::{FormationError, FormationResult};
pub use galaxy::GalaxyShell;
pub use generator::{FormationConfig, FormationGenerator, FormationTargets};
pub use seed::FormationSeed;
pub use tree::TreeShape;
