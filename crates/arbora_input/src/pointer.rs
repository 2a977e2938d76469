//! Pointer/touch interpretation.
//!
//! Turns raw window-level press/move/release events into the three actions
//! the installation understands: click, drag, and double press. Positions are
//! in the same normalized [-1, 1] space as the tracked hand (+y up), so hit
//! testing treats both channels alike.

use arbora_shared::constants::DOUBLE_PRESS_WINDOW_SECS;
use arbora_shared::Vec2;
use serde::{Deserialize, Serialize};

/// Raw pointer event from the window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerInput {
    /// Mouse button or finger down.
    Press {
        /// Position.
        pos: Vec2,
        /// Event time in seconds.
        time: f64,
    },
    /// Pointer moved (button state irrelevant).
    Move {
        /// Position.
        pos: Vec2,
    },
    /// Mouse button or finger up.
    Release {
        /// Position.
        pos: Vec2,
    },
}

/// Interpreted pointer action.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerAction {
    /// Press and release without dragging.
    Click {
        /// Release position.
        pos: Vec2,
    },
    /// Movement while pressed, past the drag threshold.
    Drag {
        /// Horizontal delta since the last move.
        dx: f32,
        /// Vertical delta since the last move.
        dy: f32,
    },
    /// Second press inside the double-press window.
    DoublePress,
}

/// Pointer thresholds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerConfig {
    /// Maximum gap between presses for a double press (seconds).
    pub double_press_secs: f64,
    /// Movement from the press point before a press becomes a drag.
    pub drag_threshold: f32,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            double_press_secs: DOUBLE_PRESS_WINDOW_SECS,
            drag_threshold: 0.01,
        }
    }
}

/// Press/drag/double-press state machine.
#[derive(Clone, Debug, Default)]
pub struct PointerTracker {
    config: PointerConfig,
    /// Button currently held.
    down: bool,
    /// Where the current press started.
    press_pos: Vec2,
    /// Last observed position.
    last_pos: Vec2,
    /// Current press has moved past the drag threshold.
    dragging: bool,
    /// Current press completed a double press; its release is not a click.
    swallow_release: bool,
    /// Time of the last press that could start a double press.
    last_press_time: Option<f64>,
}

impl PointerTracker {
    /// Creates a tracker with the given thresholds.
    #[must_use]
    pub fn new(config: PointerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Returns true while the pointer is pressed.
    #[must_use]
    pub const fn is_down(&self) -> bool {
        self.down
    }

    /// Feeds one raw event.
    pub fn handle(&mut self, input: PointerInput) -> Option<PointerAction> {
        match input {
            PointerInput::Press { pos, time } => {
                self.down = true;
                self.dragging = false;
                self.press_pos = pos;
                self.last_pos = pos;

                let is_double = self
                    .last_press_time
                    .is_some_and(|prev| time - prev >= 0.0 && time - prev < self.config.double_press_secs);

                if is_double {
                    // A third press starts a fresh pair.
                    self.last_press_time = None;
                    self.swallow_release = true;
                    Some(PointerAction::DoublePress)
                } else {
                    self.last_press_time = Some(time);
                    self.swallow_release = false;
                    None
                }
            }
            PointerInput::Move { pos } => {
                let delta = Vec2::new(pos.x - self.last_pos.x, pos.y - self.last_pos.y);
                self.last_pos = pos;
                if !self.down {
                    return None;
                }
                if !self.dragging && pos.distance(self.press_pos) > self.config.drag_threshold {
                    self.dragging = true;
                }
                self.dragging.then_some(PointerAction::Drag {
                    dx: delta.x,
                    dy: delta.y,
                })
            }
            PointerInput::Release { pos } => {
                let was_down = std::mem::replace(&mut self.down, false);
                self.last_pos = pos;
                if !was_down || self.dragging || self.swallow_release {
                    return None;
                }
                Some(PointerAction::Click { pos })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(tracker: &mut PointerTracker, x: f32, time: f64) -> Option<PointerAction> {
        tracker.handle(PointerInput::Press {
            pos: Vec2::new(x, 0.0),
            time,
        })
    }

    fn release(tracker: &mut PointerTracker, x: f32) -> Option<PointerAction> {
        tracker.handle(PointerInput::Release {
            pos: Vec2::new(x, 0.0),
        })
    }

    #[test]
    fn test_click() {
        let mut tracker = PointerTracker::default();
        assert_eq!(press(&mut tracker, 0.2, 0.0), None);
        assert!(tracker.is_down());
        assert_eq!(
            release(&mut tracker, 0.2),
            Some(PointerAction::Click {
                pos: Vec2::new(0.2, 0.0)
            })
        );
        assert!(!tracker.is_down());
    }

    #[test]
    fn test_double_press() {
        let mut tracker = PointerTracker::default();
        press(&mut tracker, 0.0, 0.0);
        release(&mut tracker, 0.0);
        assert_eq!(press(&mut tracker, 0.0, 0.2), Some(PointerAction::DoublePress));
        // The completing release is not a click.
        assert_eq!(release(&mut tracker, 0.0), None);
        // A third press does not double again.
        assert_eq!(press(&mut tracker, 0.0, 0.35), None);
    }

    #[test]
    fn test_slow_presses_are_not_double() {
        let mut tracker = PointerTracker::default();
        press(&mut tracker, 0.0, 0.0);
        release(&mut tracker, 0.0);
        assert_eq!(press(&mut tracker, 0.0, 0.5), None);
    }

    #[test]
    fn test_drag_emits_deltas_and_suppresses_click() {
        let mut tracker = PointerTracker::default();
        press(&mut tracker, 0.0, 0.0);
        let action = tracker.handle(PointerInput::Move {
            pos: Vec2::new(0.1, 0.05),
        });
        match action {
            Some(PointerAction::Drag { dx, dy }) => {
                assert!((dx - 0.1).abs() < 1e-6);
                assert!((dy - 0.05).abs() < 1e-6);
            }
            other => panic!("expected drag, got {other:?}"),
        }
        assert_eq!(release(&mut tracker, 0.1), None);
    }

    #[test]
    fn test_hover_is_not_drag() {
        let mut tracker = PointerTracker::default();
        let action = tracker.handle(PointerInput::Move {
            pos: Vec2::new(0.5, 0.5),
        });
        assert_eq!(action, None);
    }
}
