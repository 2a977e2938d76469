//! Landmark value types.
//!
//! The tracking library hands us loosely typed point lists. Everything past
//! [`LandmarkFrame::from_raw`] works on validated data only.

use arbora_shared::constants::LANDMARK_COUNT;

use crate::error::{InputError, InputResult};

/// Raw landmark points as delivered by the tracking collaborator.
pub type RawLandmarks = Vec<[f32; 3]>;

/// A tracked point on a hand, in normalized image coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    /// Horizontal position (0 = left edge of the image).
    pub x: f32,
    /// Vertical position (0 = top edge of the image).
    pub y: f32,
    /// Depth relative to the wrist.
    pub z: f32,
}

impl Landmark {
    /// Creates a landmark.
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to another landmark.
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// Exactly 21 validated landmarks for one hand.
#[derive(Clone, Debug, PartialEq)]
pub struct LandmarkFrame {
    points: [Landmark; LANDMARK_COUNT],
}

impl LandmarkFrame {
    /// Wraps an already-valid landmark array.
    #[must_use]
    pub const fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    /// Validates raw points. Points past the 21st are ignored.
    ///
    /// # Errors
    ///
    /// [`InputError::MalformedFrame`] for short frames,
    /// [`InputError::NonFiniteLandmark`] for NaN/inf coordinates.
    pub fn from_raw(raw: &[[f32; 3]]) -> InputResult<Self> {
        if raw.len() < LANDMARK_COUNT {
            return Err(InputError::MalformedFrame {
                expected: LANDMARK_COUNT,
                actual: raw.len(),
            });
        }

        let mut points = [Landmark::default(); LANDMARK_COUNT];
        for (i, (slot, p)) in points.iter_mut().zip(raw).enumerate() {
            if !p.iter().all(|c| c.is_finite()) {
                return Err(InputError::NonFiniteLandmark(i));
            }
            *slot = Landmark::new(p[0], p[1], p[2]);
        }

        Ok(Self { points })
    }

    /// Returns a landmark by index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 21`; callers use the named constants.
    #[inline]
    #[must_use]
    pub fn point(&self, index: usize) -> Landmark {
        self.points[index]
    }

    /// All landmarks.
    #[must_use]
    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.points
    }
}
