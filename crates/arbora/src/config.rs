//! # Installation Configuration
//!
//! One TOML file, one section per subsystem. Every section has defaults, so a
//! partial file (or none at all) is valid:
//!
//! ```toml
//! [elements]
//! photo_cards = 20
//!
//! [interaction]
//! focus_timeout_secs = 10.0
//!
//! [formation.galaxy]
//! outer_radius = 26.0
//! ```

use std::path::Path;

use arbora_choreography::{CameraConfig, ChoreographyConfig, SpringParams};
use arbora_formation::{ElementClass, FormationConfig};
use arbora_input::{ClassifierConfig, PointerConfig, TrackerConfig};
use arbora_shared::constants::MAX_FRAME_DT;
use arbora_shared::Formation;
use serde::{Deserialize, Serialize};

use crate::error::{InstallationError, InstallationResult};

/// Number of elements per class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementCounts {
    /// Ambient particles.
    pub ambient: usize,
    /// Gift boxes.
    pub boxes: usize,
    /// Gem ornaments.
    pub gems: usize,
    /// Ribbon segments.
    pub ribbon: usize,
    /// Photo cards.
    pub photo_cards: usize,
}

impl Default for ElementCounts {
    fn default() -> Self {
        Self {
            ambient: 4000,
            boxes: 60,
            gems: 80,
            ribbon: 300,
            photo_cards: 24,
        }
    }
}

impl ElementCounts {
    /// Count for one class.
    #[must_use]
    pub const fn count(&self, class: ElementClass) -> usize {
        match class {
            ElementClass::Ambient => self.ambient,
            ElementClass::Box => self.boxes,
            ElementClass::Gem => self.gems,
            ElementClass::Ribbon => self.ribbon,
            ElementClass::PhotoCard => self.photo_cards,
        }
    }

    /// Total number of records.
    #[must_use]
    pub fn total(&self) -> usize {
        ElementClass::ALL.iter().map(|&c| self.count(c)).sum()
    }
}

/// Controller behaviour.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Formation shown at startup.
    pub initial_formation: Formation,
    /// A selection older than this is dropped.
    pub focus_timeout_secs: f64,
    /// Orbit radians per unit of normalized drag.
    pub drag_sensitivity: f32,
    /// Maximum screen distance for a hit, in normalized units.
    pub hit_radius: f32,
    /// Vertical field of view used to project elements for hit-testing.
    pub fov_y_degrees: f32,
    /// Classes that can be focused.
    pub focusable: Vec<ElementClass>,
    /// Pointer events buffered between window thread and tick.
    pub pointer_queue: usize,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            initial_formation: Formation::Tree,
            focus_timeout_secs: 8.0,
            drag_sensitivity: 3.0,
            hit_radius: 0.12,
            fov_y_degrees: 50.0,
            focusable: vec![ElementClass::PhotoCard],
            pointer_queue: 256,
        }
    }
}

/// Root configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallationConfig {
    /// Element counts.
    pub elements: ElementCounts,
    /// Formation shapes and seed.
    pub formation: FormationConfig,
    /// Springs and sway.
    pub choreography: ChoreographyConfig,
    /// Camera smoothing and distances.
    pub camera: CameraConfig,
    /// Controller behaviour.
    pub interaction: InteractionConfig,
    /// Gesture thresholds.
    pub classifier: ClassifierConfig,
    /// Pointer thresholds.
    pub pointer: PointerConfig,
    /// Capture pipeline.
    pub tracker: TrackerConfig,
}

impl InstallationConfig {
    /// Reads and validates a TOML file.
    ///
    /// # Errors
    ///
    /// [`InstallationError::Io`] if the file cannot be read,
    /// [`InstallationError::Config`] if it does not parse or validate.
    pub fn load(path: impl AsRef<Path>) -> InstallationResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| InstallationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parses and validates TOML text.
    ///
    /// # Errors
    ///
    /// [`InstallationError::Config`] on parse or validation failure.
    pub fn from_toml_str(text: &str) -> InstallationResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes to TOML.
    ///
    /// # Errors
    ///
    /// [`InstallationError::Config`] if a value cannot be represented.
    pub fn to_toml_string(&self) -> InstallationResult<String> {
        toml::to_string_pretty(self).map_err(|e| InstallationError::Config(e.to_string()))
    }

    /// Checks every section.
    ///
    /// # Errors
    ///
    /// [`InstallationError::Config`] naming the first bad value.
    pub fn validate(&self) -> InstallationResult<()> {
        self.formation.validate()?;

        check_spring("choreography.position_spring", self.choreography.position_spring)?;
        check_spring("choreography.scale_spring", self.choreography.scale_spring)?;
        check_positive("choreography.focus_scale", self.choreography.focus_scale)?;
        check_non_negative("choreography.sway_amplitude", self.choreography.sway_amplitude)?;
        check_non_negative("choreography.sway_settle_radius", self.choreography.sway_settle_radius)?;
        check_positive("choreography.settle_epsilon", self.choreography.settle_epsilon)?;

        check_positive("camera.smoothing", self.camera.smoothing)?;
        check_positive("camera.tree_distance", self.camera.tree_distance)?;
        check_positive("camera.galaxy_distance", self.camera.galaxy_distance)?;
        check_non_negative("camera.hand_reach", self.camera.hand_reach)?;
        check_positive("camera.focus_distance", self.camera.focus_distance)?;

        let ix = &self.interaction;
        if !(ix.focus_timeout_secs.is_finite() && ix.focus_timeout_secs > 0.0) {
            return Err(InstallationError::Config(format!(
                "interaction.focus_timeout_secs must be positive, got {}",
                ix.focus_timeout_secs
            )));
        }
        check_positive("interaction.hit_radius", ix.hit_radius)?;
        if !(ix.fov_y_degrees > 0.0 && ix.fov_y_degrees < 180.0) {
            return Err(InstallationError::Config(format!(
                "interaction.fov_y_degrees must be in (0, 180), got {}",
                ix.fov_y_degrees
            )));
        }
        if ix.pointer_queue == 0 {
            return Err(InstallationError::Config(
                "interaction.pointer_queue must be at least 1".to_owned(),
            ));
        }

        check_positive("classifier.pinch_threshold", self.classifier.pinch_threshold)?;
        if self.tracker.channel_capacity == 0 {
            return Err(InstallationError::Config(
                "tracker.channel_capacity must be at least 1".to_owned(),
            ));
        }
        if u32::try_from(self.elements.total()).is_err() {
            return Err(InstallationError::Config(format!(
                "too many elements: {}",
                self.elements.total()
            )));
        }
        Ok(())
    }
}

fn check_positive(name: &str, value: f32) -> InstallationResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(InstallationError::Config(format!("{name} must be positive, got {value}")))
    }
}

fn check_non_negative(name: &str, value: f32) -> InstallationResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(InstallationError::Config(format!("{name} must not be negative, got {value}")))
    }
}

fn check_spring(name: &str, spring: SpringParams) -> InstallationResult<()> {
    check_non_negative(&format!("{name}.stiffness"), spring.stiffness)?;
    check_non_negative(&format!("{name}.damping"), spring.damping)?;
    if spring.is_stable_at(MAX_FRAME_DT) {
        Ok(())
    } else {
        Err(InstallationError::Config(format!(
            "{name} (stiffness {}, damping {}) diverges at a {MAX_FRAME_DT} s step; \
             need stiffness*dt^2 + 2*damping*dt < 4",
            spring.stiffness, spring.damping
        )))
    }
}
