//! # Installation Constants
//!
//! Values every crate agrees on. Tunable thresholds live in the TOML
//! configuration; these are the defaults and hard limits.

// =============================================================================
// HAND LANDMARKS
// =============================================================================

/// Number of landmarks in one tracked hand.
pub const LANDMARK_COUNT: usize = 21;

/// Wrist landmark.
pub const WRIST: usize = 0;
/// Thumb tip landmark.
pub const THUMB_TIP: usize = 4;
/// Index finger middle knuckle (PIP).
pub const INDEX_PIP: usize = 6;
/// Index finger tip.
pub const INDEX_TIP: usize = 8;
/// Middle finger base knuckle (MCP) - used as the palm center.
pub const MIDDLE_MCP: usize = 9;
/// Middle finger middle knuckle (PIP).
pub const MIDDLE_PIP: usize = 10;
/// Middle finger tip.
pub const MIDDLE_TIP: usize = 12;
/// Ring finger middle knuckle (PIP).
pub const RING_PIP: usize = 14;
/// Ring finger tip.
pub const RING_TIP: usize = 16;
/// Pinky middle knuckle (PIP).
pub const PINKY_PIP: usize = 18;
/// Pinky tip.
pub const PINKY_TIP: usize = 20;

/// Palm center landmark used for the hand position.
pub const PALM_CENTER: usize = MIDDLE_MCP;

/// Thumb-to-index distance (normalized frame units) under which a pinch registers.
pub const PINCH_THRESHOLD: f32 = 0.06;

// =============================================================================
// TIMING
// =============================================================================

/// Frame budget at 60 Hz, in seconds.
pub const TARGET_FRAME_TIME_SECS: f32 = 1.0 / 60.0;

/// Largest integration step; longer frames are clamped to keep springs stable.
pub const MAX_FRAME_DT: f32 = 0.033;

/// Two presses closer than this toggle the formation.
pub const DOUBLE_PRESS_WINDOW_SECS: f64 = 0.3;

// =============================================================================
// ORBIT
// =============================================================================

/// Orbit pitch limit in radians (keeps the camera off the poles).
pub const MAX_ORBIT_PITCH: f32 = 1.2;
