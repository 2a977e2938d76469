//! # ARBORA Choreography
//!
//! Spring animation for every decorative element, and the smoothed camera.
//!
//! ## Frame path
//!
//! 1. [`ParticleChoreographer::step`] with the frame's formation and focus
//! 2. [`CameraDirector::update`] toward [`CameraDirector::target_for`]
//! 3. [`ParticleChoreographer::write_instances`] into the renderer's buffer
//!
//! Nothing here allocates per frame or returns an error.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod arena;
pub mod camera;
pub mod choreographer;
pub mod instance;
pub mod spring;

pub use arena::{ElementId, ParticleArena, ParticleRecord, VisualRef};
pub use camera::{CameraConfig, CameraDirector};
pub use choreographer::{ChoreographyConfig, FocusTarget, ParticleChoreographer};
pub use instance::InstanceData;
pub use spring::{clamp_dt, SpringParams};
