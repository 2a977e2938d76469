//! # Installation Frame Loop
//!
//! ```text
//! Frame N:
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │ 1. INPUT                                                            │
//! │    ├─ Drain capture channel (newest hand frame)                     │
//! │    ├─ Classify gesture                                              │
//! │    └─ Apply gesture edges + queued pointer actions to SceneContext  │
//! │                                                                     │
//! │ 2. ANIMATE                                                          │
//! │    ├─ Focus target = point in front of the camera                   │
//! │    ├─ Spring step for every record                                  │
//! │    └─ Camera smoothing toward orbit / hand target                   │
//! │                                                                     │
//! │ 3. PUBLISH                                                          │
//! │    └─ Refill InstanceData buffer for the renderer                   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::f32::consts::TAU;
use std::time::{Duration, Instant};

use arbora_choreography::{
    clamp_dt, CameraDirector, ElementId, FocusTarget, InstanceData, ParticleArena,
    ParticleChoreographer, ParticleRecord,
};
use arbora_formation::{ElementClass, FormationGenerator};
use arbora_input::{LandmarkFrame, LandmarkSource, PointerInput};
use arbora_shared::{Vec2, Vec3};
use rand::Rng;
use tracing::{info, warn};

use crate::assets::{resolve_visual, AssetReport, VisualAssetLoader};
use crate::config::InstallationConfig;
use crate::context::{SceneContext, SceneEvent};
use crate::controller::{FocusCandidates, InteractionController};
use crate::error::InstallationResult;

/// Target frame time for 60 FPS.
pub const TARGET_FRAME_TIME: Duration = Duration::from_micros(16_666);

/// Frame time above which a warning is logged.
pub const MAX_FRAME_TIME: Duration = Duration::from_millis(33);

/// Sub-seed purpose for sway phases and speeds.
const SWAY_STREAM: u64 = 0x5A1A_0000;

/// Projects elements through the current camera for hit-testing.
pub struct ScreenPicker<'a> {
    choreographer: &'a ParticleChoreographer,
    focusable: &'a [ElementClass],
    eye: Vec3,
    forward: Vec3,
    right: Vec3,
    up: Vec3,
    tan_half_fov: f32,
    hit_radius: f32,
}

impl<'a> ScreenPicker<'a> {
    /// Picker for the camera's current pose.
    #[must_use]
    pub fn new(
        camera: &CameraDirector,
        choreographer: &'a ParticleChoreographer,
        focusable: &'a [ElementClass],
        fov_y_degrees: f32,
        hit_radius: f32,
    ) -> Self {
        let eye = camera.position();
        let forward = (camera.look_at() - eye).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward);
        Self {
            choreographer,
            focusable,
            eye,
            forward,
            right,
            up,
            tan_half_fov: (fov_y_degrees.to_radians() * 0.5).tan(),
            hit_radius,
        }
    }

    /// Normalized screen position of a world point, or `None` behind the camera.
    #[must_use]
    pub fn project(&self, point: Vec3) -> Option<Vec2> {
        let rel = point - self.eye;
        let depth = rel.dot(self.forward);
        if depth <= f32::EPSILON {
            return None;
        }
        let scale = 1.0 / (depth * self.tan_half_fov);
        Some(Vec2::new(rel.dot(self.right) * scale, rel.dot(self.up) * scale))
    }
}

impl FocusCandidates for ScreenPicker<'_> {
    fn nearest(&self, point: Vec2) -> Option<ElementId> {
        let mut best: Option<(ElementId, f32)> = None;
        for (id, rec) in self.choreographer.arena().iter() {
            if !self.focusable.contains(&rec.class) {
                continue;
            }
            let Some(screen) = self.project(rec.position) else {
                continue;
            };
            let d = screen.distance(point);
            if d <= self.hit_radius && best.map_or(true, |(_, bd)| d < bd) {
                best = Some((id, d));
            }
        }
        best.map(|(id, _)| id)
    }
}

/// Timing and activity for one frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameStats {
    /// Frame number.
    pub frame: u64,
    /// Clamped simulation step in seconds.
    pub dt: f32,
    /// Total frame time in microseconds.
    pub total_us: u64,
    /// Spring and camera time in microseconds.
    pub animate_us: u64,
}

/// Fraction of records that must be settled for a transition to count as done.
pub const SETTLED_FRACTION: f32 = 0.95;

/// Session summary: frame budget, transitions and how long they take to land.
///
/// A formation change starts a settle timer that runs on simulation time until
/// [`SETTLED_FRACTION`] of the records reach their targets. A change arriving
/// mid-flight restarts it.
#[derive(Clone, Debug, Default)]
pub struct SessionStats {
    /// Frames recorded.
    pub frames: u64,
    /// Frames slower than [`TARGET_FRAME_TIME`].
    pub frames_over_budget: u64,
    /// Slowest frame in microseconds.
    pub max_frame_us: u64,
    /// Sum of animation times.
    pub animate_us_sum: u64,
    /// Formation changes.
    pub transitions: u64,
    /// Transitions that settled.
    pub settled_transitions: u64,
    /// Sum of settle times in seconds.
    pub settle_secs_sum: f64,
    /// Slowest settle in seconds.
    pub settle_secs_max: f32,
    /// Elements selected.
    pub focus_selections: u64,
    /// Times the hand was lost.
    pub tracking_drops: u64,
    settling: Option<f32>,
}

impl SessionStats {
    /// Empty summary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a frame and the events it produced.
    ///
    /// `settled` is only evaluated while a transition is in flight.
    pub fn record(&mut self, stats: FrameStats, events: &[SceneEvent], settled: impl FnOnce() -> f32) {
        self.frames += 1;
        self.animate_us_sum += stats.animate_us;
        self.max_frame_us = self.max_frame_us.max(stats.total_us);
        if stats.total_us > TARGET_FRAME_TIME.as_micros() as u64 {
            self.frames_over_budget += 1;
        }

        for event in events {
            match event {
                SceneEvent::FormationChanged { .. } => {
                    self.transitions += 1;
                    self.settling = Some(0.0);
                }
                SceneEvent::FocusSet { .. } => self.focus_selections += 1,
                SceneEvent::TrackingLost => self.tracking_drops += 1,
                _ => {}
            }
        }

        if let Some(elapsed) = self.settling.as_mut() {
            *elapsed += stats.dt;
            let elapsed = *elapsed;
            if settled() >= SETTLED_FRACTION {
                self.settling = None;
                self.settled_transitions += 1;
                self.settle_secs_sum += f64::from(elapsed);
                self.settle_secs_max = self.settle_secs_max.max(elapsed);
            }
        }
    }

    /// Whether a transition is still landing.
    #[must_use]
    pub const fn is_settling(&self) -> bool {
        self.settling.is_some()
    }

    /// Mean settle time in seconds.
    #[must_use]
    pub fn avg_settle_secs(&self) -> f64 {
        if self.settled_transitions == 0 {
            return 0.0;
        }
        self.settle_secs_sum / self.settled_transitions as f64
    }

    /// Returns the fraction of frames over budget.
    #[must_use]
    pub fn over_budget_ratio(&self) -> f64 {
        if self.frames == 0 {
            return 0.0;
        }
        self.frames_over_budget as f64 / self.frames as f64
    }

    /// Logs a summary of the session.
    pub fn log_summary(&self) {
        if self.frames == 0 {
            info!("No frames recorded");
            return;
        }
        info!(
            "Frames: {} | animate avg {:.3} ms | max frame {:.3} ms | over budget {:.1}%",
            self.frames,
            self.animate_us_sum as f64 / self.frames as f64 / 1000.0,
            self.max_frame_us as f64 / 1000.0,
            self.over_budget_ratio() * 100.0
        );
        info!(
            "Transitions: {} ({} settled, avg {:.2} s, max {:.2} s) | selections {} | tracking drops {}",
            self.transitions,
            self.settled_transitions,
            self.avg_settle_secs(),
            self.settle_secs_max,
            self.focus_selections,
            self.tracking_drops
        );
    }
}

/// Where a frame's hand input comes from.
enum HandInput<'a> {
    /// Newest frame from the capture thread.
    Tracker,
    /// Supplied directly by the caller.
    Frame(Option<&'a LandmarkFrame>),
}

/// The running installation.
///
/// Owns the controller, the choreographer, the camera and the instance buffer.
pub struct Installation {
    controller: InteractionController,
    choreographer: ParticleChoreographer,
    camera: CameraDirector,
    instances: Vec<InstanceData>,
    focusable: Vec<ElementClass>,
    fov_y_degrees: f32,
    hit_radius: f32,
    clock: f64,
    frame_count: u64,
    stats: SessionStats,
    assets: AssetReport,
}

impl Installation {
    /// Builds every record and resolves its visual.
    ///
    /// # Errors
    ///
    /// [`InstallationError::Config`](crate::InstallationError::Config) if the
    /// configuration does not validate.
    pub fn new(config: &InstallationConfig, loader: &mut dyn VisualAssetLoader) -> InstallationResult<Self> {
        config.validate()?;

        let mut generator = FormationGenerator::new(config.formation)?;
        let initial = config.interaction.initial_formation;
        let mut arena = ParticleArena::with_capacity(config.elements.total());
        let mut sway = config.formation.seed.derive(SWAY_STREAM).rng();
        let mut assets = AssetReport::default();

        for class in ElementClass::ALL {
            let count = config.elements.count(class);
            for (i, targets) in generator.generate_class(class, count).into_iter().enumerate() {
                let visual = resolve_visual(loader, class, i, &mut assets);
                let phase = sway.gen::<f32>() * TAU;
                let speed = sway.gen_range(0.6..1.6);
                arena.spawn(ParticleRecord::new(class, targets, initial, visual, phase, speed));
            }
        }

        info!(
            "Installation ready: {} elements ({} placeholders), starting in {}",
            arena.len(),
            assets.placeholders,
            initial.name()
        );

        let instances = Vec::with_capacity(arena.len());
        Ok(Self {
            controller: InteractionController::new(config),
            choreographer: ParticleChoreographer::new(arena, config.choreography, initial),
            camera: CameraDirector::new(config.camera, initial),
            instances,
            focusable: config.interaction.focusable.clone(),
            fov_y_degrees: config.interaction.fov_y_degrees,
            hit_radius: config.interaction.hit_radius,
            clock: 0.0,
            frame_count: 0,
            stats: SessionStats::new(),
            assets,
        })
    }

    /// Starts hand tracking. See [`InteractionController::enable_tracking`].
    pub fn enable_tracking<S: LandmarkSource>(&mut self, source: S) {
        self.controller.enable_tracking(source);
    }

    /// Stops hand tracking.
    pub fn disable_tracking(&mut self) {
        self.controller.disable_tracking();
    }

    /// Queues a pointer event for the next frame.
    pub fn push_pointer(&self, input: PointerInput) -> bool {
        self.controller.push_pointer(input)
    }

    /// Runs one frame with input from the hand tracker.
    pub fn frame(&mut self, dt: f32) -> Vec<SceneEvent> {
        self.run_frame(dt, HandInput::Tracker)
    }

    /// Runs one frame with an explicit hand frame, bypassing the tracker.
    pub fn frame_with_hand(&mut self, dt: f32, hand: Option<&LandmarkFrame>) -> Vec<SceneEvent> {
        self.run_frame(dt, HandInput::Frame(hand))
    }

    fn run_frame(&mut self, dt: f32, hand: HandInput<'_>) -> Vec<SceneEvent> {
        let frame_start = Instant::now();
        if dt.is_finite() && dt > 0.0 {
            self.clock += f64::from(dt);
        }

        // 1. INPUT
        let picker = ScreenPicker::new(
            &self.camera,
            &self.choreographer,
            &self.focusable,
            self.fov_y_degrees,
            self.hit_radius,
        );
        let events = match hand {
            HandInput::Tracker => self.controller.tick(self.clock, &picker),
            HandInput::Frame(frame) => self.controller.tick_frame(self.clock, frame, &picker),
        };

        // 2. ANIMATE
        let animate_start = Instant::now();
        let step = clamp_dt(dt);
        let ctx = self.controller.context();
        let focus = ctx.focus().map(|sel| FocusTarget {
            id: sel.id,
            position: self.camera.default_focus_point(),
        });
        self.choreographer.step(step, ctx.formation(), focus);
        let target = self.camera.target_for(ctx.formation(), ctx.orbit(), ctx.camera_hand());
        self.camera.update(step, target);
        let animate_us = animate_start.elapsed().as_micros() as u64;

        // 3. PUBLISH
        self.choreographer.write_instances(&mut self.instances);

        let stats = FrameStats {
            frame: self.frame_count,
            dt: step,
            total_us: frame_start.elapsed().as_micros() as u64,
            animate_us,
        };
        self.end_frame(stats, &events);
        events
    }

    fn end_frame(&mut self, stats: FrameStats, events: &[SceneEvent]) {
        self.frame_count += 1;
        let choreographer = &self.choreographer;
        self.stats.record(stats, events, || choreographer.settled_fraction());

        if stats.total_us > MAX_FRAME_TIME.as_micros() as u64 {
            warn!(
                "Frame {} exceeded budget: {:.2}ms (target: {:.2}ms)",
                stats.frame,
                stats.total_us as f64 / 1000.0,
                TARGET_FRAME_TIME.as_micros() as f64 / 1000.0
            );
        }
    }

    /// Scene state.
    #[must_use]
    pub const fn context(&self) -> &SceneContext {
        self.controller.context()
    }

    /// Controller.
    #[must_use]
    pub const fn controller(&self) -> &InteractionController {
        &self.controller
    }

    /// Choreographer.
    #[must_use]
    pub const fn choreographer(&self) -> &ParticleChoreographer {
        &self.choreographer
    }

    /// Camera.
    #[must_use]
    pub const fn camera(&self) -> &CameraDirector {
        &self.camera
    }

    /// Hit-test through the current camera.
    #[must_use]
    pub fn picker(&self) -> ScreenPicker<'_> {
        ScreenPicker::new(
            &self.camera,
            &self.choreographer,
            &self.focusable,
            self.fov_y_degrees,
            self.hit_radius,
        )
    }

    /// Instance rows written by the last frame.
    #[must_use]
    pub fn instances(&self) -> &[InstanceData] {
        &self.instances
    }

    /// Session summary so far.
    #[must_use]
    pub const fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// How many visuals loaded and how many fell back.
    #[must_use]
    pub const fn asset_report(&self) -> AssetReport {
        self.assets
    }

    /// Frames run so far.
    #[inline]
    #[must_use]
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Installation time in seconds.
    #[must_use]
    pub const fn clock(&self) -> f64 {
        self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{FocusSource, TransitionCause};
    use arbora_choreography::CameraConfig;
    use arbora_shared::Formation;

    fn changed() -> SceneEvent {
        SceneEvent::FormationChanged {
            from: Formation::Tree,
            to: Formation::Galaxy,
            cause: TransitionCause::DoublePress,
        }
    }

    fn frame(dt: f32, total_us: u64) -> FrameStats {
        FrameStats {
            dt,
            total_us,
            ..FrameStats::default()
        }
    }

    #[test]
    fn test_settle_time_measured_from_transition() {
        let mut stats = SessionStats::new();
        stats.record(frame(0.1, 5_000), &[changed()], || 0.1);
        for _ in 0..9 {
            stats.record(frame(0.1, 5_000), &[], || 0.5);
        }
        assert!(stats.is_settling());
        stats.record(frame(0.1, 5_000), &[], || 0.97);

        assert!(!stats.is_settling());
        assert_eq!(stats.transitions, 1);
        assert_eq!(stats.settled_transitions, 1);
        assert!((stats.avg_settle_secs() - 1.1).abs() < 1e-4);
    }

    #[test]
    fn test_settled_fraction_only_read_in_flight() {
        let mut stats = SessionStats::new();
        let mut reads = 0;
        for _ in 0..5 {
            stats.record(frame(0.016, 20_000), &[], || {
                reads += 1;
                1.0
            });
        }
        assert_eq!(reads, 0);
        assert_eq!(stats.frames_over_budget, 5);

        stats.record(frame(0.016, 1_000), &[changed(), changed()], || {
            reads += 1;
            1.0
        });
        assert_eq!(reads, 1);
        assert_eq!(stats.transitions, 2);
        assert_eq!(stats.settled_transitions, 1);
        assert!((stats.over_budget_ratio() - 5.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_counts_selections_and_drops() {
        let mut stats = SessionStats::new();
        let events = [
            SceneEvent::FocusSet {
                id: ElementId(3),
                source: FocusSource::Pointer,
            },
            SceneEvent::TrackingLost,
            SceneEvent::TrackingRestored,
            SceneEvent::TrackingLost,
        ];
        stats.record(frame(0.016, 1_000), &events, || 1.0);
        assert_eq!(stats.focus_selections, 1);
        assert_eq!(stats.tracking_drops, 2);
        assert_eq!(stats.transitions, 0);
    }

    #[test]
    fn test_origin_projects_to_center() {
        let camera = CameraDirector::new(CameraConfig::default(), Formation::Tree);
        let ch = ParticleChoreographer::new(ParticleArena::default(), Default::default(), Formation::Tree);
        let picker = ScreenPicker::new(&camera, &ch, &[], 50.0, 0.1);
        let center = picker.project(Vec3::ZERO).unwrap();
        assert!(center.x.abs() < 1e-6 && center.y.abs() < 1e-6);
        // Right of the origin appears right of center, above appears above.
        assert!(picker.project(Vec3::new(1.0, 0.0, 0.0)).unwrap().x > 0.0);
        assert!(picker.project(Vec3::new(0.0, 1.0, 0.0)).unwrap().y > 0.0);
        assert_eq!(picker.project(Vec3::new(0.0, 0.0, 40.0)), None);
    }
}
