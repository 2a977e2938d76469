//! # ARBORA
//!
//! Gesture-driven installation: thousands of decorative elements move between
//! a tree and a galaxy, and a single element can be pulled into focus.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              INSTALLATION                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────────┐     ┌─────────────────┐     ┌─────────────────┐    │
//! │  │  arbora_input   │     │   controller    │     │ arbora_formation│    │
//! │  │                 │────>│                 │     │                 │    │
//! │  │  • Tracker      │     │  • Edges        │     │  • Tree cone    │    │
//! │  │  • Classifier   │     │  • Focus        │     │  • Galaxy shell │    │
//! │  │  • Pointer      │     │  • Orbit        │     │  • Seeded       │    │
//! │  └─────────────────┘     └────────┬────────┘     └────────┬────────┘    │
//! │                                   │ SceneContext          │ targets     │
//! │                                   v                       v             │
//! │                          ┌──────────────────────────────────────┐       │
//! │                          │         arbora_choreography          │       │
//! │                          │  • Springs  • Camera  • InstanceData │       │
//! │                          └──────────────────────────────────────┘       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `config`: TOML configuration and validation
//! - `controller`: gesture/pointer state machine
//! - `scene`: frame orchestration and timing
//! - `assets`: visual loading with placeholder fallback

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod assets;
pub mod config;
pub mod context;
pub mod controller;
pub mod error;
pub mod scene;

// Re-export the subsystems
pub use arbora_choreography as choreography;
pub use arbora_formation as formation;
pub use arbora_input as input;
pub use arbora_shared as shared;

// Re-export commonly used types
pub use assets::{AssetReport, DirectoryAssets, VisualAssetLoader};
pub use config::{ElementCounts, InstallationConfig, InteractionConfig};
pub use context::{
    FocusClearReason, FocusSelection, FocusSource, SceneContext, SceneEvent, TransitionCause,
};
pub use controller::{FocusCandidates, InteractionController, PointerSender};
pub use error::{InstallationError, InstallationResult};
pub use scene::{FrameStats, Installation, ScreenPicker, SessionStats};
