//! # Particle Choreographer
//!
//! Drives every record toward its current target with damped springs.
//!
//! ```text
//! formation ──┐
//! focus ──────┼──► target ──► spring(position) ──► display ──► InstanceData
//! record ─────┘         └──► spring(scale)    ──┘   (+ sway)
//! ```
//!
//! Sway is added to the displayed position only. The physics state never sees
//! it, so a settled record stays on its fixed point.

use std::f64::consts::TAU;

use arbora_formation::ElementClass;
use arbora_shared::constants::MAX_FRAME_DT;
use arbora_shared::{Formation, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::arena::{ElementId, ParticleArena, ParticleRecord};
use crate::instance::InstanceData;
use crate::spring::{clamp_dt, SpringParams};

/// Largest change of a record's sway weight per second.
const SWAY_FADE_RATE: f32 = 1.5;

/// Choreography tuning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChoreographyConfig {
    /// Position spring.
    pub position_spring: SpringParams,
    /// Scale spring.
    pub scale_spring: SpringParams,
    /// Scale of the focused element.
    pub focus_scale: f32,
    /// Peak sway displacement for ambient particles.
    pub sway_amplitude: f32,
    /// Distance to target inside which ambient sway fades in.
    pub sway_settle_radius: f32,
    /// Distance to target under which a record counts as settled.
    pub settle_epsilon: f32,
}

impl Default for ChoreographyConfig {
    fn default() -> Self {
        Self {
            position_spring: SpringParams::POSITION,
            scale_spring: SpringParams::SCALE,
            focus_scale: 2.5,
            sway_amplitude: 0.12,
            sway_settle_radius: 0.05,
            settle_epsilon: 0.05,
        }
    }
}

/// Focus override for one element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FocusTarget {
    /// Focused element.
    pub id: ElementId,
    /// Where it should sit, usually in front of the camera.
    pub position: Vec3,
}

/// Spring-driven animator for all records.
pub struct ParticleChoreographer {
    arena: ParticleArena,
    config: ChoreographyConfig,
    formation: Formation,
    focus: Option<FocusTarget>,
    clock: f64,
}

impl ParticleChoreographer {
    /// Wraps a populated arena. Records keep their current state.
    ///
    /// A spring that would diverge at the largest frame step is replaced by
    /// its default.
    #[must_use]
    pub fn new(arena: ParticleArena, mut config: ChoreographyConfig, formation: Formation) -> Self {
        if !config.position_spring.is_stable_at(MAX_FRAME_DT) {
            warn!(
                "Position spring {:?} diverges at {} s steps, using default",
                config.position_spring, MAX_FRAME_DT
            );
            config.position_spring = SpringParams::POSITION;
        }
        if !config.scale_spring.is_stable_at(MAX_FRAME_DT) {
            warn!(
                "Scale spring {:?} diverges at {} s steps, using default",
                config.scale_spring, MAX_FRAME_DT
            );
            config.scale_spring = SpringParams::SCALE;
        }
        Self {
            arena,
            config,
            formation,
            focus: None,
            clock: 0.0,
        }
    }

    /// Advances every record by `dt` seconds.
    ///
    /// At most one element is focused; passing a different id (or `None`)
    /// returns the previous one to its formation target in this same step.
    pub fn step(&mut self, dt: f32, formation: Formation, focus: Option<FocusTarget>) {
        let dt = clamp_dt(dt);
        let focus = focus.filter(|f| self.arena.contains(f.id));

        if focus.map(|f| f.id) != self.focus.map(|f| f.id) {
            debug!(
                from = ?self.focus.map(|f| f.id.0),
                to = ?focus.map(|f| f.id.0),
                "Focus target changed"
            );
        }
        self.formation = formation;
        self.focus = focus;
        self.clock += f64::from(dt);

        let pos_spring = self.config.position_spring;
        let scale_spring = self.config.scale_spring;
        let focus_scale = self.config.focus_scale;
        let sway_radius = self.config.sway_settle_radius;
        let max_fade = SWAY_FADE_RATE * dt;

        for (i, rec) in self.arena.records_mut().iter_mut().enumerate() {
            let focused = focus.filter(|f| f.id.index() == i);
            let (target, target_scale) = match focused {
                Some(f) => (f.position, focus_scale),
                None => (rec.targets.for_formation(formation), rec.base_scale),
            };
            pos_spring.step_vec3(&mut rec.position, &mut rec.velocity, target, dt);
            scale_spring.step_scalar(&mut rec.scale, &mut rec.scale_velocity, target_scale, dt);

            let fade = if focused.is_some() || rec.class != ElementClass::Ambient || sway_radius <= 0.0 {
                0.0
            } else {
                // Full sway on target, none at the edge of the radius.
                (1.0 - rec.position.distance(target) / sway_radius).clamp(0.0, 1.0)
            };
            rec.sway_weight += (fade - rec.sway_weight).clamp(-max_fade, max_fade);
        }
    }

    /// Target a record is currently pulled toward.
    #[must_use]
    pub fn current_target(&self, id: ElementId) -> Option<Vec3> {
        let rec = self.arena.get(id)?;
        Some(self.target_of(id, rec))
    }

    fn target_of(&self, id: ElementId, rec: &ParticleRecord) -> Vec3 {
        match self.focus {
            Some(f) if f.id == id => f.position,
            _ => rec.targets.for_formation(self.formation),
        }
    }

    fn display_of(&self, id: ElementId, rec: &ParticleRecord) -> Vec3 {
        let focused = self.focus.is_some_and(|f| f.id == id);
        if focused || rec.class != ElementClass::Ambient || rec.sway_weight <= 0.0 {
            return rec.position;
        }
        let a = (self.clock * f64::from(rec.sway_speed) + f64::from(rec.phase)).rem_euclid(TAU) as f32;
        let amp = self.config.sway_amplitude * rec.sway_weight;
        rec.position + Vec3::new(a.sin() * amp, (a * 0.7).cos() * amp * 0.5, (a * 1.3).sin() * amp * 0.5)
    }

    /// Position handed to the renderer: physics position plus ambient sway.
    #[must_use]
    pub fn display_position(&self, id: ElementId) -> Option<Vec3> {
        let rec = self.arena.get(id)?;
        Some(self.display_of(id, rec))
    }

    /// Fraction of records within `settle_epsilon` of their target.
    #[must_use]
    pub fn settled_fraction(&self) -> f32 {
        if self.arena.is_empty() {
            return 1.0;
        }
        let eps2 = self.config.settle_epsilon * self.config.settle_epsilon;
        let settled = self
            .arena
            .iter()
            .filter(|(id, rec)| rec.position.distance_squared(self.target_of(*id, rec)) <= eps2)
            .count();
        settled as f32 / self.arena.len() as f32
    }

    /// Refills `out` with one row per record, in id order.
    ///
    /// Reuses the buffer's capacity; after the first frame this does not
    /// allocate.
    pub fn write_instances(&self, out: &mut Vec<InstanceData>) {
        out.clear();
        out.reserve(self.arena.len());
        out.extend(self.arena.iter().map(|(id, rec)| {
            InstanceData::new(
                self.display_of(id, rec).to_array(),
                rec.scale,
                rec.visual.code(),
                rec.class.tag() as u32,
                self.focus.is_some_and(|f| f.id == id),
            )
        }));
    }

    /// Currently focused element.
    #[must_use]
    pub fn focused(&self) -> Option<ElementId> {
        self.focus.map(|f| f.id)
    }

    /// Formation of the last step.
    #[must_use]
    pub const fn formation(&self) -> Formation {
        self.formation
    }

    /// Record storage.
    #[must_use]
    pub const fn arena(&self) -> &ParticleArena {
        &self.arena
    }

    /// Active tuning.
    #[must_use]
    pub const fn config(&self) -> &ChoreographyConfig {
        &self.config
    }

    /// Record count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Whether there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }
}
