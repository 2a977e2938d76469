//! # Installation Error Types
//!
//! Only setup can fail. Once the frame loop runs, failures degrade instead.

use std::path::PathBuf;

use arbora_formation::FormationError;
use arbora_input::InputError;
use thiserror::Error;

/// Errors that can occur while setting up the installation.
#[derive(Error, Debug)]
pub enum InstallationError {
    /// Configuration did not parse or failed validation.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Hand tracking could not start.
    #[error(transparent)]
    Tracking(#[from] InputError),

    /// A visual asset could not be loaded.
    #[error("failed to load asset {name}: {reason}")]
    AssetLoad {
        /// Asset identifier.
        name: String,
        /// What went wrong.
        reason: String,
    },
}

impl From<FormationError> for InstallationError {
    fn from(err: FormationError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<toml::de::Error> for InstallationError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type for installation setup.
pub type InstallationResult<T> = Result<T, InstallationError>;
