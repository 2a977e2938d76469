//! # Gesture Classifier
//!
//! Maps one landmark frame to a gesture from a five-letter alphabet.
//!
//! ## Rules (in order)
//!
//! 1. No frame → `None`
//! 2. Thumb tip within the pinch threshold of the index tip → `Pinch`
//! 3. Count extended fingers (tip above its middle knuckle):
//!    - only the index → `Pointing`
//!    - three or more → `Open`
//!    - at most one → `Fist`
//!    - anything else → `None`
//!
//! The tip-above-knuckle test assumes an upright hand facing the camera.
//! A sideways or inverted hand classifies unreliably.

use arbora_shared::constants::{
    INDEX_PIP, INDEX_TIP, MIDDLE_PIP, MIDDLE_TIP, PALM_CENTER, PINCH_THRESHOLD, PINKY_PIP,
    PINKY_TIP, RING_PIP, RING_TIP, THUMB_TIP,
};
use arbora_shared::Vec2;
use serde::{Deserialize, Serialize};

use crate::landmark::LandmarkFrame;

/// Discrete gesture alphabet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Gesture {
    /// No hand, or an unrecognized finger pattern.
    #[default]
    None,
    /// All fingers curled.
    Fist,
    /// Three or more fingers extended.
    Open,
    /// Thumb tip touching index tip.
    Pinch,
    /// Only the index finger extended.
    Pointing,
}

impl Gesture {
    /// String representation for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Fist => "fist",
            Self::Open => "open",
            Self::Pinch => "pinch",
            Self::Pointing => "pointing",
        }
    }
}

/// Per-tick classification result.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GestureState {
    /// Classified gesture.
    pub gesture: Gesture,
    /// Palm center, mirrored, in [-1, 1] with +y up. `None` without a hand.
    pub hand_position: Option<Vec2>,
    /// Thumb-to-index distance, reported continuously for proportional feedback.
    pub pinch_distance: f32,
    /// True when a hand is present in the frame.
    pub is_tracking: bool,
}

/// Classifier thresholds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Pinch distance in normalized frame units.
    pub pinch_threshold: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            pinch_threshold: PINCH_THRESHOLD,
        }
    }
}

/// Finger tip / middle-knuckle pairs for index, middle, ring, pinky.
const FINGERS: [(usize, usize); 4] = [
    (INDEX_TIP, INDEX_PIP),
    (MIDDLE_TIP, MIDDLE_PIP),
    (RING_TIP, RING_PIP),
    (PINKY_TIP, PINKY_PIP),
];

/// Stateless gesture classifier.
#[derive(Clone, Copy, Debug, Default)]
pub struct GestureClassifier {
    config: ClassifierConfig,
}

impl GestureClassifier {
    /// Creates a classifier with the given thresholds.
    #[must_use]
    pub const fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Classifies a validated frame.
    #[must_use]
    pub fn classify(&self, frame: Option<&LandmarkFrame>) -> GestureState {
        let Some(frame) = frame else {
            return GestureState::default();
        };

        let pinch_distance = frame.point(THUMB_TIP).distance(frame.point(INDEX_TIP));
        let palm = frame.point(PALM_CENTER);
        let hand_position = Some(Vec2::new(1.0 - 2.0 * palm.x, 1.0 - 2.0 * palm.y));

        let gesture = if pinch_distance < self.config.pinch_threshold {
            Gesture::Pinch
        } else {
            Self::finger_pattern(frame)
        };

        GestureState {
            gesture,
            hand_position,
            pinch_distance,
            is_tracking: true,
        }
    }

    /// Validates and classifies raw points. Malformed input yields `None`.
    #[must_use]
    pub fn classify_raw(&self, raw: Option<&[[f32; 3]]>) -> GestureState {
        let frame = raw.and_then(|points| LandmarkFrame::from_raw(points).ok());
        self.classify(frame.as_ref())
    }

    fn finger_pattern(frame: &LandmarkFrame) -> Gesture {
        let mut extended = [false; 4];
        for (flag, &(tip, knuckle)) in extended.iter_mut().zip(FINGERS.iter()) {
            *flag = frame.point(tip).y < frame.point(knuckle).y;
        }
        let count = extended.iter().filter(|&&e| e).count();

        if extended == [true, false, false, false] {
            Gesture::Pointing
        } else if count >= 3 {
            Gesture::Open
        } else if count <= 1 {
            Gesture::Fist
        } else {
            Gesture::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::SyntheticHand;

    fn classify(hand: SyntheticHand) -> GestureState {
        GestureClassifier::default().classify_raw(Some(&hand.to_raw()))
    }

    #[test]
    fn test_pinch_takes_precedence() {
        // Open hand with thumb on index tip is still a pinch.
        let state = classify(SyntheticHand::open().pinching());
        assert_eq!(state.gesture, Gesture::Pinch);
        assert!(state.pinch_distance < PINCH_THRESHOLD);

        let state = classify(SyntheticHand::fist().pinching());
        assert_eq!(state.gesture, Gesture::Pinch);
    }

    #[test]
    fn test_finger_patterns() {
        assert_eq!(classify(SyntheticHand::open()).gesture, Gesture::Open);
        assert_eq!(classify(SyntheticHand::fist()).gesture, Gesture::Fist);
        assert_eq!(classify(SyntheticHand::pointing()).gesture, Gesture::Pointing);
        assert_eq!(
            classify(SyntheticHand::with_fingers([false, true, true, true])).gesture,
            Gesture::Open
        );
    }

    #[test]
    fn test_single_non_index_finger_is_fist() {
        let state = classify(SyntheticHand::with_fingers([false, false, true, false]));
        assert_eq!(state.gesture, Gesture::Fist);
    }

    #[test]
    fn test_two_fingers_is_unknown() {
        let state = classify(SyntheticHand::with_fingers([true, true, false, false]));
        assert_eq!(state.gesture, Gesture::None);
        assert!(state.is_tracking);
    }

    #[test]
    fn test_degenerate_input() {
        let classifier = GestureClassifier::default();
        assert_eq!(classifier.classify(None), GestureState::default());
        assert_eq!(classifier.classify_raw(None).gesture, Gesture::None);

        let short = vec![[0.5, 0.5, 0.0]; 20];
        let state = classifier.classify_raw(Some(&short));
        assert_eq!(state.gesture, Gesture::None);
        assert!(!state.is_tracking);
    }

    #[test]
    fn test_hand_position_is_mirrored() {
        let hand = SyntheticHand::open().at(0.25, 0.25);
        let [px, py, _] = hand.to_raw()[PALM_CENTER];
        let pos = classify(hand).hand_position.unwrap();
        assert!((pos.x - (1.0 - 2.0 * px)).abs() < 1e-6);
        assert!((pos.y - (1.0 - 2.0 * py)).abs() < 1e-6);
        // Left of the image is the viewer's right.
        assert!(pos.x > 0.0 && pos.y > 0.0);
    }

    #[test]
    fn test_pinch_distance_reported_continuously() {
        let state = classify(SyntheticHand::open());
        assert_eq!(state.gesture, Gesture::Open);
        assert!(state.pinch_distance > PINCH_THRESHOLD);
    }
}
