//! # ARBORA Shared
//!
//! Common types used by input, formation, choreography and the installation.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on:
//! - a rendering backend
//! - a hand-tracking library
//!
//! If you need renderer types, put them behind the collaborator traits in `arbora`.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod math;
pub mod mode;

pub use constants::{
    DOUBLE_PRESS_WINDOW_SECS, LANDMARK_COUNT, MAX_FRAME_DT, MAX_ORBIT_PITCH, PINCH_THRESHOLD,
    TARGET_FRAME_TIME_SECS,
};
pub use math::{Vec2, Vec3};
pub use mode::{Formation, OrbitRotation, SceneMode};
