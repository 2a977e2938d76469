//! # ARBORA Input
//!
//! Everything between the viewer and the interaction controller:
//!
//! ```text
//! ┌───────────────┐   raw frames   ┌──────────────┐   GestureState
//! │ LandmarkSource│ ─────────────> │ HandTracker  │ ───────────────┐
//! └───────────────┘ capture thread └──────────────┘                │
//!                                                                  v
//! ┌───────────────┐  PointerInput  ┌──────────────┐  PointerAction  controller
//! │ window events │ ─────────────> │PointerTracker│ ─────────────────>
//! └───────────────┘                └──────────────┘
//! ```
//!
//! ## Guarantees
//!
//! - The classifier never panics and never sees unvalidated data
//! - Tracking failures surface as [`InputError`] once, at enable time
//! - Pointer input works with or without tracking

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod classifier;
pub mod error;
pub mod landmark;
pub mod pointer;
pub mod pose;
pub mod tracking;

pub use classifier::{ClassifierConfig, Gesture, GestureClassifier, GestureState};
pub use error::{InputError, InputResult};
pub use landmark::{Landmark, LandmarkFrame, RawLandmarks};
pub use pointer::{PointerAction, PointerConfig, PointerInput, PointerTracker};
pub use pose::SyntheticHand;
pub use tracking::{HandTracker, LandmarkSource, ScriptedSource, SourcePoll, TrackerConfig};
