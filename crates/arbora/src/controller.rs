//! # Interaction Controller
//!
//! Turns gestures and pointer actions into scene transitions.
//!
//! ```text
//!            ┌──────── Fist ↑ (unfocused) ────────┐
//!            v                                    │
//!       ┌─────────┐    Open ↑ (unfocused)    ┌─────────┐
//!       │  Tree   │ ───────────────────────> │ Galaxy  │ ◄── drag orbits
//!       └─────────┘ <─── double press ─────> └─────────┘     hand steers camera
//!            │                                    │
//!            └──── Pinch ↑ / click on element ────┘
//!                              │
//!                              v
//!                   Focus (formation kept underneath)
//!                   ends on pinch release, timeout,
//!                   empty click or double press
//! ```
//!
//! `↑` is a rising edge: the gesture differs from the previous tick's.
//! Holding a fist for a hundred ticks is one transition, not a hundred.
//!
//! Pointer events may arrive from any thread through [`PointerSender`], but
//! they are applied only inside [`InteractionController::tick`], so the scene
//! context has a single writer.

use arbora_choreography::ElementId;
use arbora_input::{
    Gesture, GestureClassifier, GestureState, HandTracker, InputError, LandmarkFrame,
    LandmarkSource, PointerAction, PointerInput, PointerTracker,
};
use arbora_shared::{Formation, Vec2};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use tracing::{debug, info, warn};

use crate::config::{InstallationConfig, InteractionConfig};
use crate::context::{
    FocusClearReason, FocusSelection, FocusSource, SceneContext, SceneEvent, TransitionCause,
};

/// Hit-test supplied by whoever knows where elements appear on screen.
pub trait FocusCandidates {
    /// Element nearest to `point` (normalized [-1, 1]², +y up), if any is
    /// close enough to select.
    fn nearest(&self, point: Vec2) -> Option<ElementId>;
}

impl<F> FocusCandidates for F
where
    F: Fn(Vec2) -> Option<ElementId>,
{
    fn nearest(&self, point: Vec2) -> Option<ElementId> {
        self(point)
    }
}

/// Cloneable handle for queueing pointer events from a window thread.
#[derive(Clone, Debug)]
pub struct PointerSender {
    tx: Sender<PointerInput>,
}

impl PointerSender {
    /// Queues an event. Returns false if the queue is full and the event was dropped.
    pub fn send(&self, input: PointerInput) -> bool {
        queue_pointer(&self.tx, input)
    }
}

fn queue_pointer(tx: &Sender<PointerInput>, input: PointerInput) -> bool {
    match tx.try_send(input) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            debug!("Pointer queue full, dropping {:?}", input);
            false
        }
        Err(TrySendError::Disconnected(_)) => false,
    }
}

/// Gesture and pointer state machine.
pub struct InteractionController {
    config: InteractionConfig,
    classifier: GestureClassifier,
    pointer: PointerTracker,
    tracker: HandTracker,
    pointer_tx: Sender<PointerInput>,
    pointer_rx: Receiver<PointerInput>,
    context: SceneContext,
    previous_gesture: Gesture,
    was_tracking: bool,
    fallback: bool,
}

impl InteractionController {
    /// Creates a controller with tracking off.
    #[must_use]
    pub fn new(config: &InstallationConfig) -> Self {
        let (pointer_tx, pointer_rx) = bounded(config.interaction.pointer_queue.max(1));
        Self {
            classifier: GestureClassifier::new(config.classifier),
            pointer: PointerTracker::new(config.pointer),
            tracker: HandTracker::new(config.tracker),
            pointer_tx,
            pointer_rx,
            context: SceneContext::new(config.interaction.initial_formation),
            previous_gesture: Gesture::None,
            was_tracking: false,
            fallback: false,
            config: config.interaction.clone(),
        }
    }

    /// Starts hand tracking on `source`.
    ///
    /// Failure is not an error for the caller: it is logged, pointer input
    /// carries on alone and [`fallback_active`](Self::fallback_active) turns true.
    pub fn enable_tracking<S: LandmarkSource>(&mut self, source: S) {
        match self.tracker.enable(source) {
            Ok(()) => self.fallback = false,
            Err(InputError::AlreadyRunning) => {
                debug!("Hand tracking already running");
            }
            Err(err) => {
                self.fallback = true;
                warn!("Hand tracking unavailable, using pointer input: {}", err);
            }
        }
    }

    /// Stops hand tracking without waiting for the capture thread.
    ///
    /// The source is released once its in-flight capture returns. Safe to
    /// call repeatedly and from the tick.
    pub fn disable_tracking(&mut self) {
        self.tracker.disable();
    }

    /// True when tracking failed to start and pointer input is the only channel.
    #[must_use]
    pub const fn fallback_active(&self) -> bool {
        self.fallback
    }

    /// True while a capture thread runs.
    #[must_use]
    pub fn tracking_running(&self) -> bool {
        self.tracker.is_running()
    }

    /// Queues a pointer event for the next tick.
    pub fn push_pointer(&self, input: PointerInput) -> bool {
        queue_pointer(&self.pointer_tx, input)
    }

    /// Handle for queueing pointer events from elsewhere.
    #[must_use]
    pub fn pointer_sender(&self) -> PointerSender {
        PointerSender {
            tx: self.pointer_tx.clone(),
        }
    }

    /// Scene state.
    #[must_use]
    pub const fn context(&self) -> &SceneContext {
        &self.context
    }

    /// Active tuning.
    #[must_use]
    pub const fn config(&self) -> &InteractionConfig {
        &self.config
    }

    /// Landmark frames rejected at the boundary so far.
    #[must_use]
    pub fn malformed_frames(&self) -> u64 {
        self.tracker.malformed_frames()
    }

    /// One tick: reads the newest tracked frame and the pointer queue.
    ///
    /// `now` is controller time in seconds and must not go backwards.
    pub fn tick(&mut self, now: f64, candidates: &dyn FocusCandidates) -> Vec<SceneEvent> {
        let state = self.classifier.classify(self.tracker.poll());
        self.apply(now, state, candidates)
    }

    /// One tick with an explicit frame instead of the tracker's.
    pub fn tick_frame(
        &mut self,
        now: f64,
        frame: Option<&LandmarkFrame>,
        candidates: &dyn FocusCandidates,
    ) -> Vec<SceneEvent> {
        let state = self.classifier.classify(frame);
        self.apply(now, state, candidates)
    }

    fn apply(&mut self, now: f64, state: GestureState, candidates: &dyn FocusCandidates) -> Vec<SceneEvent> {
        let mut events = Vec::new();

        if state.is_tracking != self.was_tracking {
            if state.is_tracking {
                info!("Hand detected");
                events.push(SceneEvent::TrackingRestored);
            } else {
                info!("Hand lost");
                events.push(SceneEvent::TrackingLost);
            }
        }

        if let Some(sel) = self.context.focus {
            if now - sel.selected_at >= self.config.focus_timeout_secs {
                self.clear_focus(FocusClearReason::Timeout, &mut events);
            }
        }

        self.apply_gesture(now, &state, candidates, &mut events);

        while let Ok(input) = self.pointer_rx.try_recv() {
            if let Some(action) = self.pointer.handle(input) {
                self.apply_pointer(now, action, candidates, &mut events);
            }
        }

        self.previous_gesture = state.gesture;
        self.was_tracking = state.is_tracking;
        self.context.gesture = state;
        events
    }

    fn apply_gesture(
        &mut self,
        now: f64,
        state: &GestureState,
        candidates: &dyn FocusCandidates,
        events: &mut Vec<SceneEvent>,
    ) {
        let gesture = state.gesture;
        let previous = self.previous_gesture;

        if previous == Gesture::Pinch && gesture != Gesture::Pinch {
            if let Some(FocusSelection {
                source: FocusSource::Pinch,
                ..
            }) = self.context.focus
            {
                self.clear_focus(FocusClearReason::PinchReleased, events);
            }
        }

        if gesture == previous {
            return;
        }

        let unfocused = self.context.focus.is_none();
        match gesture {
            Gesture::Fist if unfocused => {
                self.set_formation(Formation::Tree, TransitionCause::Gesture(gesture), events);
            }
            Gesture::Open if unfocused => {
                self.set_formation(Formation::Galaxy, TransitionCause::Gesture(gesture), events);
            }
            Gesture::Pinch => {
                if let Some(id) = state.hand_position.and_then(|p| candidates.nearest(p)) {
                    self.set_focus(id, now, FocusSource::Pinch, events);
                }
            }
            _ => {}
        }
    }

    fn apply_pointer(
        &mut self,
        now: f64,
        action: PointerAction,
        candidates: &dyn FocusCandidates,
        events: &mut Vec<SceneEvent>,
    ) {
        match action {
            PointerAction::DoublePress => {
                self.clear_focus(FocusClearReason::DoublePress, events);
                let next = self.context.formation.toggled();
                self.set_formation(next, TransitionCause::DoublePress, events);
            }
            PointerAction::Click { pos } => match candidates.nearest(pos) {
                Some(id) => self.set_focus(id, now, FocusSource::Pointer, events),
                None => self.clear_focus(FocusClearReason::Dismissed, events),
            },
            PointerAction::Drag { dx, dy } => {
                if self.context.formation == Formation::Galaxy {
                    let s = self.config.drag_sensitivity;
                    self.context.orbit.accumulate(dy * s, -dx * s);
                }
            }
        }
    }

    fn set_formation(&mut self, to: Formation, cause: TransitionCause, events: &mut Vec<SceneEvent>) {
        let from = self.context.formation;
        if from == to {
            return;
        }
        self.context.formation = to;
        info!("Formation transition: {} -> {} ({:?})", from.name(), to.name(), cause);
        events.push(SceneEvent::FormationChanged { from, to, cause });
    }

    fn set_focus(&mut self, id: ElementId, now: f64, source: FocusSource, events: &mut Vec<SceneEvent>) {
        if let Some(current) = self.context.focus {
            if current.id == id {
                // Re-selecting refreshes the timeout and takes over the source.
                self.context.focus = Some(FocusSelection {
                    id,
                    selected_at: now,
                    source,
                });
                return;
            }
            self.clear_focus(FocusClearReason::Replaced, events);
        }
        self.context.focus = Some(FocusSelection {
            id,
            selected_at: now,
            source,
        });
        info!("Focus set on element {} ({:?})", id.0, source);
        events.push(SceneEvent::FocusSet { id, source });
    }

    fn clear_focus(&mut self, reason: FocusClearReason, events: &mut Vec<SceneEvent>) {
        if let Some(sel) = self.context.focus.take() {
            info!("Focus cleared on element {} ({:?})", sel.id.0, reason);
            events.push(SceneEvent::FocusCleared { id: sel.id, reason });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use arbora_input::{ScriptedSource, SyntheticHand};
    use arbora_shared::{OrbitRotation, SceneMode};

    fn controller() -> InteractionController {
        InteractionController::new(&InstallationConfig::default())
    }

    fn frame(hand: SyntheticHand) -> LandmarkFrame {
        LandmarkFrame::from_raw(&hand.to_raw()).unwrap()
    }

    fn nothing(_: Vec2) -> Option<ElementId> {
        None
    }

    fn card(_: Vec2) -> Option<ElementId> {
        Some(ElementId(7))
    }

    #[test]
    fn test_open_then_fist() {
        let mut c = controller();
        let open = frame(SyntheticHand::open());
        let events = c.tick_frame(0.0, Some(&open), &nothing);
        assert!(events.contains(&SceneEvent::FormationChanged {
            from: Formation::Tree,
            to: Formation::Galaxy,
            cause: TransitionCause::Gesture(Gesture::Open),
        }));
        let fist = frame(SyntheticHand::fist());
        c.tick_frame(0.1, Some(&fist), &nothing);
        assert_eq!(c.context().formation(), Formation::Tree);
    }

    #[test]
    fn test_fist_ignored_while_focused() {
        let mut c = controller();
        c.push_pointer(PointerInput::Press { pos: Vec2::ZERO, time: 0.0 });
        c.push_pointer(PointerInput::Release { pos: Vec2::ZERO });
        c.tick_frame(0.0, None, &card);
        assert_eq!(c.context().mode(), SceneMode::Focus);

        let open = frame(SyntheticHand::open());
        c.tick_frame(0.1, Some(&open), &card);
        assert_eq!(c.context().formation(), Formation::Tree);
        assert_eq!(c.context().mode(), SceneMode::Focus);
    }

    #[test]
    fn test_pinch_focus_released_with_pinch() {
        let mut c = controller();
        let pinch = frame(SyntheticHand::open().pinching());
        let events = c.tick_frame(0.0, Some(&pinch), &card);
        assert!(events.contains(&SceneEvent::FocusSet {
            id: ElementId(7),
            source: FocusSource::Pinch,
        }));
        c.tick_frame(0.1, Some(&pinch), &card);
        assert_eq!(c.context().focus().map(|f| f.id), Some(ElementId(7)));

        let events = c.tick_frame(0.2, None, &card);
        assert!(events.contains(&SceneEvent::FocusCleared {
            id: ElementId(7),
            reason: FocusClearReason::PinchReleased,
        }));
        assert_eq!(c.context().formation(), Formation::Tree);
    }

    #[test]
    fn test_pinch_on_empty_space_does_nothing() {
        let mut c = controller();
        let pinch = frame(SyntheticHand::open().pinching());
        c.tick_frame(0.0, Some(&pinch), &nothing);
        assert_eq!(c.context().focus(), None);
    }

    #[test]
    fn test_pointer_focus_times_out() {
        let mut c = controller();
        c.push_pointer(PointerInput::Press { pos: Vec2::ZERO, time: 0.0 });
        c.push_pointer(PointerInput::Release { pos: Vec2::ZERO });
        c.tick_frame(0.0, None, &card);
        c.tick_frame(7.9, None, &card);
        assert!(c.context().focus().is_some());
        let events = c.tick_frame(8.0, None, &card);
        assert!(events.contains(&SceneEvent::FocusCleared {
            id: ElementId(7),
            reason: FocusClearReason::Timeout,
        }));
    }

    #[test]
    fn test_click_on_empty_space_clears() {
        let mut c = controller();
        c.push_pointer(PointerInput::Press { pos: Vec2::ZERO, time: 0.0 });
        c.push_pointer(PointerInput::Release { pos: Vec2::ZERO });
        c.tick_frame(0.0, None, &card);
        c.push_pointer(PointerInput::Press { pos: Vec2::ZERO, time: 1.0 });
        c.push_pointer(PointerInput::Release { pos: Vec2::ZERO });
        c.tick_frame(1.0, None, &nothing);
        assert_eq!(c.context().focus(), None);
    }

    #[test]
    fn test_drag_orbits_only_in_galaxy() {
        let mut c = controller();
        let drag = |c: &mut InteractionController, t: f64| {
            c.push_pointer(PointerInput::Press { pos: Vec2::ZERO, time: t });
            c.push_pointer(PointerInput::Move { pos: Vec2::new(0.2, 0.1) });
            c.push_pointer(PointerInput::Release { pos: Vec2::new(0.2, 0.1) });
        };
        drag(&mut c, 0.0);
        c.tick_frame(0.0, None, &nothing);
        assert_eq!(c.context().orbit(), OrbitRotation::default());

        let open = frame(SyntheticHand::open());
        c.tick_frame(1.0, Some(&open), &nothing);
        drag(&mut c, 2.0);
        c.tick_frame(2.0, Some(&open), &nothing);
        let orbit = c.context().orbit();
        assert!((orbit.x - 0.3).abs() < 1e-5);
        assert!((orbit.y + 0.6).abs() < 1e-5);
    }

    #[test]
    fn test_fallback_on_init_failure() {
        let mut c = controller();
        let source = ScriptedSource::new(Vec::new(), Duration::ZERO).failing("no camera");
        c.enable_tracking(source);
        assert!(c.fallback_active());
        assert!(!c.tracking_running());

        c.push_pointer(PointerInput::Press { pos: Vec2::ZERO, time: 0.0 });
        c.push_pointer(PointerInput::Release { pos: Vec2::ZERO });
        c.push_pointer(PointerInput::Press { pos: Vec2::ZERO, time: 0.1 });
        c.push_pointer(PointerInput::Release { pos: Vec2::ZERO });
        c.tick(0.1, &nothing);
        assert_eq!(c.context().formation(), Formation::Galaxy);
    }
}
