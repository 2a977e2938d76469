//! Scene modes and orbit state.

use serde::{Deserialize, Serialize};

use crate::constants::MAX_ORBIT_PITCH;

/// Global target arrangement for all decorative elements.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Formation {
    /// Cone-shaped tree.
    #[default]
    Tree,
    /// Flattened spherical shell.
    Galaxy,
}

impl Formation {
    /// The other formation.
    #[inline]
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Tree => Self::Galaxy,
            Self::Galaxy => Self::Tree,
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Tree => "tree",
            Self::Galaxy => "galaxy",
        }
    }
}

/// Observable scene mode.
///
/// `Focus` is layered over a formation: while an element is focused the
/// formation underneath is preserved and returns when focus clears.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SceneMode {
    /// Tree formation, nothing focused.
    Tree,
    /// Galaxy formation, nothing focused.
    Galaxy,
    /// A single element is focused.
    Focus,
}

impl SceneMode {
    /// Combines a formation with the focus flag.
    #[must_use]
    pub const fn from_parts(formation: Formation, focused: bool) -> Self {
        if focused {
            return Self::Focus;
        }
        match formation {
            Formation::Tree => Self::Tree,
            Formation::Galaxy => Self::Galaxy,
        }
    }
}

/// Accumulated orbit angles in radians.
///
/// `x` is pitch, `y` is yaw. Persists across formation changes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OrbitRotation {
    /// Pitch (rotation about the horizontal axis).
    pub x: f32,
    /// Yaw (rotation about the vertical axis).
    pub y: f32,
}

impl OrbitRotation {
    /// Adds a delta, clamping pitch to keep the camera off the poles.
    pub fn accumulate(&mut self, pitch: f32, yaw: f32) {
        self.x = (self.x + pitch).clamp(-MAX_ORBIT_PITCH, MAX_ORBIT_PITCH);
        self.y += yaw;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_round_trip() {
        assert_eq!(Formation::Tree.toggled(), Formation::Galaxy);
        assert_eq!(Formation::Tree.toggled().toggled(), Formation::Tree);
    }

    #[test]
    fn test_focus_overrides_formation() {
        assert_eq!(SceneMode::from_parts(Formation::Galaxy, true), SceneMode::Focus);
        assert_eq!(SceneMode::from_parts(Formation::Galaxy, false), SceneMode::Galaxy);
    }

    #[test]
    fn test_orbit_pitch_is_clamped() {
        let mut orbit = OrbitRotation::default();
        orbit.accumulate(10.0, 0.5);
        assert_eq!(orbit.x, MAX_ORBIT_PITCH);
        assert_eq!(orbit.y, 0.5);
    }

    #[test]
    fn test_formation_serde_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            formation: Formation,
        }
        let parsed: Wrapper = toml::from_str("formation = \"galaxy\"").unwrap();
        assert_eq!(parsed.formation, Formation::Galaxy);
    }
}
