//! # Input Error Types
//!
//! All errors that can occur while ingesting hand-tracking input.

use thiserror::Error;

/// Errors that can occur in the input layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// The tracking library could not start (camera permission, model load).
    #[error("hand tracking unavailable: {reason}")]
    TrackingUnavailable {
        /// Reason reported by the tracking collaborator.
        reason: String,
    },

    /// A landmark frame had too few points.
    #[error("malformed landmark frame: expected {expected} points, got {actual}")]
    MalformedFrame {
        /// Points required.
        expected: usize,
        /// Points received.
        actual: usize,
    },

    /// A landmark coordinate was NaN or infinite.
    #[error("non-finite coordinate at landmark {0}")]
    NonFiniteLandmark(usize),

    /// Tracking was enabled twice without a disable in between.
    #[error("hand tracking already running")]
    AlreadyRunning,
}

/// Result type for input operations.
pub type InputResult<T> = Result<T, InputError>;
