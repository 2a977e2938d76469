//! Shared scene state.
//!
//! Owned by the controller and written only inside its tick. Everything else
//! reads it.

use arbora_choreography::ElementId;
use arbora_input::{Gesture, GestureState};
use arbora_shared::{Formation, OrbitRotation, SceneMode, Vec2};

/// Which channel made a selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusSource {
    /// Hand pinch. Cleared when the pinch is released.
    Pinch,
    /// Mouse click or tap. Cleared by another click or the timeout.
    Pointer,
}

/// The single focused element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FocusSelection {
    /// Selected element.
    pub id: ElementId,
    /// Controller time of the selection, in seconds.
    pub selected_at: f64,
    /// Channel that made it.
    pub source: FocusSource,
}

/// Why a selection ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusClearReason {
    /// The pinch that made it was released.
    PinchReleased,
    /// Held longer than the focus timeout.
    Timeout,
    /// Click on empty space.
    Dismissed,
    /// A double press switched formations.
    DoublePress,
    /// Another element was selected.
    Replaced,
}

/// What triggered a formation change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionCause {
    /// Rising edge of a gesture.
    Gesture(Gesture),
    /// Pointer double press.
    DoublePress,
}

/// Observable outcome of a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SceneEvent {
    /// Formation switched.
    FormationChanged {
        /// Previous formation.
        from: Formation,
        /// New formation.
        to: Formation,
        /// Trigger.
        cause: TransitionCause,
    },
    /// An element was selected.
    FocusSet {
        /// Selected element.
        id: ElementId,
        /// Channel.
        source: FocusSource,
    },
    /// The selection ended.
    FocusCleared {
        /// Element that was selected.
        id: ElementId,
        /// Why.
        reason: FocusClearReason,
    },
    /// A hand appeared.
    TrackingRestored,
    /// The hand disappeared.
    TrackingLost,
}

/// Formation, focus, orbit and the latest gesture.
#[derive(Clone, Debug, Default)]
pub struct SceneContext {
    pub(crate) formation: Formation,
    pub(crate) focus: Option<FocusSelection>,
    pub(crate) orbit: OrbitRotation,
    pub(crate) gesture: GestureState,
}

impl SceneContext {
    /// Context starting in `formation`.
    #[must_use]
    pub fn new(formation: Formation) -> Self {
        Self {
            formation,
            ..Self::default()
        }
    }

    /// Observable mode: `Focus` whenever something is selected.
    #[must_use]
    pub fn mode(&self) -> SceneMode {
        SceneMode::from_parts(self.formation, self.focus.is_some())
    }

    /// Global formation, preserved underneath focus.
    #[must_use]
    pub const fn formation(&self) -> Formation {
        self.formation
    }

    /// Current selection.
    #[must_use]
    pub const fn focus(&self) -> Option<FocusSelection> {
        self.focus
    }

    /// Accumulated orbit.
    #[must_use]
    pub const fn orbit(&self) -> OrbitRotation {
        self.orbit
    }

    /// Last classified gesture.
    #[must_use]
    pub const fn gesture(&self) -> &GestureState {
        &self.gesture
    }

    /// Hand point steering the camera: only while tracking in Galaxy.
    #[must_use]
    pub fn camera_hand(&self) -> Option<Vec2> {
        match self.formation {
            Formation::Galaxy if self.gesture.is_tracking => self.gesture.hand_position,
            _ => None,
        }
    }
}
