//! Synthetic hand poses.
//!
//! Builds plausible 21-point frames for the scripted tracking source, the
//! headless demo, and tests. Geometry follows an upright right hand facing
//! the camera.

use arbora_shared::constants::{
    INDEX_PIP, INDEX_TIP, LANDMARK_COUNT, MIDDLE_PIP, MIDDLE_TIP, PINKY_PIP, PINKY_TIP, RING_PIP,
    RING_TIP, THUMB_TIP,
};

use crate::landmark::RawLandmarks;

/// Knuckle height above the palm center.
const KNUCKLE_RISE: f32 = 0.08;
/// Extended tip height above the palm center.
const EXTENDED_RISE: f32 = 0.18;
/// Curled tip height above the palm center (still below the knuckle).
const CURLED_RISE: f32 = 0.02;

/// Horizontal offsets of index, middle, ring, pinky from the palm center.
const FINGER_OFFSETS: [f32; 4] = [-0.045, -0.015, 0.015, 0.045];

/// (tip, middle knuckle, base knuckle) per finger.
const FINGER_JOINTS: [(usize, usize, usize); 4] = [
    (INDEX_TIP, INDEX_PIP, INDEX_PIP - 1),
    (MIDDLE_TIP, MIDDLE_PIP, MIDDLE_PIP - 1),
    (RING_TIP, RING_PIP, RING_PIP - 1),
    (PINKY_TIP, PINKY_PIP, PINKY_PIP - 1),
];

/// A hand pose that can be rendered to raw landmarks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SyntheticHand {
    /// Palm center x in normalized image coordinates.
    pub palm_x: f32,
    /// Palm center y in normalized image coordinates.
    pub palm_y: f32,
    /// Extended flags for index, middle, ring, pinky.
    pub extended: [bool; 4],
    /// Thumb tip placed on the index tip.
    pub pinching: bool,
}

impl SyntheticHand {
    /// A hand with the given fingers extended, centred in frame.
    #[must_use]
    pub const fn with_fingers(extended: [bool; 4]) -> Self {
        Self {
            palm_x: 0.5,
            palm_y: 0.6,
            extended,
            pinching: false,
        }
    }

    /// All four fingers extended.
    #[must_use]
    pub const fn open() -> Self {
        Self::with_fingers([true; 4])
    }

    /// All four fingers curled.
    #[must_use]
    pub const fn fist() -> Self {
        Self::with_fingers([false; 4])
    }

    /// Index only.
    #[must_use]
    pub const fn pointing() -> Self {
        Self::with_fingers([true, false, false, false])
    }

    /// Same pose with thumb and index tips touching.
    #[must_use]
    pub const fn pinching(mut self) -> Self {
        self.pinching = true;
        self
    }

    /// Same pose moved to another palm position.
    #[must_use]
    pub const fn at(mut self, x: f32, y: f32) -> Self {
        self.palm_x = x;
        self.palm_y = y;
        self
    }

    /// Renders the pose to 21 raw points.
    #[must_use]
    pub fn to_raw(&self) -> RawLandmarks {
        let (px, py) = (self.palm_x, self.palm_y);
        let mut points = vec![[px, py, 0.0]; LANDMARK_COUNT];

        for (i, &(tip, pip, mcp)) in FINGER_JOINTS.iter().enumerate() {
            let x = px + FINGER_OFFSETS[i];
            let rise = if self.extended[i] { EXTENDED_RISE } else { CURLED_RISE };
            points[mcp] = [x, py, 0.0];
            points[pip] = [x, py - KNUCKLE_RISE, 0.0];
            points[pip + 1] = [x, py - (KNUCKLE_RISE + rise) * 0.5, 0.0];
            points[tip] = [x, py - rise, 0.0];
        }

        points[THUMB_TIP] = if self.pinching {
            let index = points[INDEX_TIP];
            [index[0] + 0.02, index[1], 0.0]
        } else {
            [px - 0.15, py - 0.02, 0.0]
        };

        points
    }
}
