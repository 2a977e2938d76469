//! # Camera Director
//!
//! Exponentially smoothed camera that always looks at the origin.
//!
//! ```text
//! tracking && Galaxy ──► hand point  ─┐
//! otherwise          ──► orbit point ─┴─► position += (target − position)·(1 − e^(−λΔt))
//! ```
//!
//! The blend factor depends on Δt, so the camera moves the same distance per
//! second at 30 Hz or 144 Hz.

use arbora_shared::{Formation, OrbitRotation, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Camera tuning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Smoothing rate λ in 1/s.
    pub smoothing: f32,
    /// Orbit distance in the tree formation.
    pub tree_distance: f32,
    /// Orbit distance in the galaxy formation.
    pub galaxy_distance: f32,
    /// Lateral reach of the hand-driven camera at full deflection.
    pub hand_reach: f32,
    /// Distance from the camera at which a focused element is held.
    pub focus_distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            smoothing: 3.0,
            tree_distance: 26.0,
            galaxy_distance: 44.0,
            hand_reach: 20.0,
            focus_distance: 8.0,
        }
    }
}

/// Smoothed camera.
#[derive(Clone, Debug)]
pub struct CameraDirector {
    config: CameraConfig,
    position: Vec3,
}

impl CameraDirector {
    /// Camera at rest on the default orbit point of `formation`.
    #[must_use]
    pub fn new(config: CameraConfig, formation: Formation) -> Self {
        let mut camera = Self {
            config,
            position: Vec3::ZERO,
        };
        camera.position = camera.orbit_point(formation, OrbitRotation::default());
        camera
    }

    /// Orbit distance for a formation.
    #[must_use]
    pub const fn base_distance(&self, formation: Formation) -> f32 {
        match formation {
            Formation::Tree => self.config.tree_distance,
            Formation::Galaxy => self.config.galaxy_distance,
        }
    }

    /// Point on the orbit sphere for a pitch/yaw.
    #[must_use]
    pub fn orbit_point(&self, formation: Formation, orbit: OrbitRotation) -> Vec3 {
        let d = self.base_distance(formation);
        let (pitch, yaw) = (orbit.x, orbit.y);
        Vec3::new(
            d * pitch.cos() * yaw.sin(),
            d * pitch.sin(),
            d * pitch.cos() * yaw.cos(),
        )
    }

    /// Point steered by a hand position in [-1, 1]², kept at galaxy distance.
    #[must_use]
    pub fn hand_point(&self, hand: Vec2) -> Vec3 {
        let d = self.config.galaxy_distance;
        let reach = self.config.hand_reach;
        let dir = Vec3::new(hand.x * reach, hand.y * reach, d).normalize_or_zero();
        dir * d
    }

    /// Target for this frame.
    #[must_use]
    pub fn target_for(&self, formation: Formation, orbit: OrbitRotation, hand: Option<Vec2>) -> Vec3 {
        match (formation, hand) {
            (Formation::Galaxy, Some(hand)) => self.hand_point(hand),
            _ => self.orbit_point(formation, orbit),
        }
    }

    /// Moves toward `target`. Negative or non-finite `dt` leaves the camera in place.
    pub fn update(&mut self, dt: f32, target: Vec3) {
        if !dt.is_finite() || dt <= 0.0 || !target.is_finite() {
            return;
        }
        let alpha = 1.0 - (-self.config.smoothing * dt).exp();
        self.position += (target - self.position) * alpha;
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Look-at point. Always the origin.
    #[must_use]
    pub const fn look_at(&self) -> Vec3 {
        Vec3::ZERO
    }

    /// Point `distance` in front of the camera along its view direction.
    #[must_use]
    pub fn focus_point(&self, distance: f32) -> Vec3 {
        let forward = (self.look_at() - self.position).normalize_or_zero();
        self.position + forward * distance
    }

    /// Focus point at the configured distance.
    #[must_use]
    pub fn default_focus_point(&self) -> Vec3 {
        self.focus_point(self.config.focus_distance)
    }

    /// Active tuning.
    #[must_use]
    pub const fn config(&self) -> &CameraConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_on_orbit() {
        let cam = CameraDirector::new(CameraConfig::default(), Formation::Tree);
        assert_eq!(cam.position(), Vec3::new(0.0, 0.0, 26.0));
    }

    #[test]
    fn test_tree_closer_than_galaxy() {
        let cam = CameraDirector::new(CameraConfig::default(), Formation::Tree);
        let orbit = OrbitRotation::default();
        assert!(
            cam.orbit_point(Formation::Tree, orbit).length()
                < cam.orbit_point(Formation::Galaxy, orbit).length()
        );
    }

    #[test]
    fn test_smoothing_is_frame_rate_independent() {
        let target = Vec3::new(0.0, 10.0, 44.0);
        let mut slow = CameraDirector::new(CameraConfig::default(), Formation::Tree);
        let mut fast = slow.clone();
        for _ in 0..30 {
            slow.update(1.0 / 30.0, target);
        }
        for _ in 0..120 {
            fast.update(1.0 / 120.0, target);
        }
        assert!(slow.position().distance(fast.position()) < 1e-3);
    }

    #[test]
    fn test_hand_only_steers_galaxy() {
        let cam = CameraDirector::new(CameraConfig::default(), Formation::Galaxy);
        let orbit = OrbitRotation::default();
        let hand = Some(Vec2::new(1.0, 0.0));
        let steered = cam.target_for(Formation::Galaxy, orbit, hand);
        assert!(steered.x > 0.0);
        assert!((steered.length() - 44.0).abs() < 1e-3);
        assert_eq!(
            cam.target_for(Formation::Tree, orbit, hand),
            cam.orbit_point(Formation::Tree, orbit)
        );
    }

    #[test]
    fn test_focus_point_between_camera_and_origin() {
        let cam = CameraDirector::new(CameraConfig::default(), Formation::Tree);
        let p = cam.focus_point(8.0);
        assert!((p.z - 18.0).abs() < 1e-4);
        assert!((p.distance(cam.position()) - 8.0).abs() < 1e-4);
    }

    #[test]
    fn test_bad_dt_ignored() {
        let mut cam = CameraDirector::new(CameraConfig::default(), Formation::Tree);
        let before = cam.position();
        cam.update(f32::NAN, Vec3::ZERO);
        cam.update(-1.0, Vec3::ZERO);
        assert_eq!(cam.position(), before);
    }
}
