//! Particle records.
//!
//! One flat `Vec` owned by the choreographer. Records are created at setup and
//! never removed while the scene runs; ids are indices.

use arbora_formation::{ElementClass, FormationTargets};
use arbora_shared::{Formation, Vec3};

/// Stable handle to a particle record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

impl ElementId {
    /// Index into the arena.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// What the renderer draws for a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisualRef {
    /// Handle of a loaded asset.
    Asset(u32),
    /// Built-in stand-in tinted by the given colour index.
    Placeholder(u32),
}

impl VisualRef {
    const PLACEHOLDER_BIT: u32 = 0x8000_0000;

    /// Packed code for the instance buffer. Placeholders set the high bit.
    #[inline]
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::Asset(handle) => handle & !Self::PLACEHOLDER_BIT,
            Self::Placeholder(tint) => tint | Self::PLACEHOLDER_BIT,
        }
    }

    /// Whether this is a stand-in.
    #[must_use]
    pub const fn is_placeholder(self) -> bool {
        matches!(self, Self::Placeholder(_))
    }
}

/// Animation state of one element.
#[derive(Clone, Debug)]
pub struct ParticleRecord {
    /// Element class.
    pub class: ElementClass,
    /// Cached formation targets.
    pub targets: FormationTargets,
    /// Current position.
    pub position: Vec3,
    /// Current velocity.
    pub velocity: Vec3,
    /// Current scale.
    pub scale: f32,
    /// Scale velocity.
    pub scale_velocity: f32,
    /// Resting scale.
    pub base_scale: f32,
    /// Sway phase offset.
    pub phase: f32,
    /// Sway angular speed.
    pub sway_speed: f32,
    /// Sway strength in [0, 1], eased toward the settle fade each step.
    pub sway_weight: f32,
    /// Render reference.
    pub visual: VisualRef,
}

impl ParticleRecord {
    /// Creates a record at rest on its `initial` formation target.
    #[must_use]
    pub fn new(
        class: ElementClass,
        targets: FormationTargets,
        initial: Formation,
        visual: VisualRef,
        phase: f32,
        sway_speed: f32,
    ) -> Self {
        let base_scale = class.base_scale();
        Self {
            class,
            targets,
            position: targets.for_formation(initial),
            velocity: Vec3::ZERO,
            scale: base_scale,
            scale_velocity: 0.0,
            base_scale,
            phase,
            sway_speed,
            sway_weight: if class == ElementClass::Ambient { 1.0 } else { 0.0 },
            visual,
        }
    }
}

/// Flat storage for all records.
#[derive(Debug, Default)]
pub struct ParticleArena {
    records: Vec<ParticleRecord>,
}

impl ParticleArena {
    /// Empty arena with room for `capacity` records.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
        }
    }

    /// Adds a record and returns its id.
    pub fn spawn(&mut self, record: ParticleRecord) -> ElementId {
        let id = ElementId(self.records.len() as u32);
        self.records.push(record);
        id
    }

    /// Record by id.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&ParticleRecord> {
        self.records.get(id.index())
    }

    /// Mutable record by id.
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut ParticleRecord> {
        self.records.get_mut(id.index())
    }

    /// Whether `id` refers to a record.
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        id.index() < self.records.len()
    }

    /// All records in id order.
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &ParticleRecord)> {
        self.records
            .iter()
            .enumerate()
            .map(|(i, r)| (ElementId(i as u32), r))
    }

    /// Raw record slice.
    #[must_use]
    pub fn records(&self) -> &[ParticleRecord] {
        &self.records
    }

    pub(crate) fn records_mut(&mut self) -> &mut [ParticleRecord] {
        &mut self.records
    }

    /// Record count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the arena is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Removes every record. Only valid between scenes.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets() -> FormationTargets {
        FormationTargets {
            tree: Vec3::new(0.0, 1.0, 0.0),
            galaxy: Vec3::new(10.0, 0.0, 0.0),
        }
    }

    #[test]
    fn test_spawn_ids_are_sequential() {
        let mut arena = ParticleArena::with_capacity(2);
        let rec = ParticleRecord::new(
            ElementClass::Gem,
            targets(),
            Formation::Tree,
            VisualRef::Asset(1),
            0.0,
            1.0,
        );
        assert_eq!(arena.spawn(rec.clone()), ElementId(0));
        assert_eq!(arena.spawn(rec), ElementId(1));
        assert!(arena.contains(ElementId(1)));
        assert!(!arena.contains(ElementId(2)));
    }

    #[test]
    fn test_record_starts_on_initial_target() {
        let rec = ParticleRecord::new(
            ElementClass::Box,
            targets(),
            Formation::Galaxy,
            VisualRef::Placeholder(3),
            0.0,
            1.0,
        );
        assert_eq!(rec.position, Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(rec.scale, ElementClass::Box.base_scale());
    }

    #[test]
    fn test_placeholder_code_sets_high_bit() {
        assert_eq!(VisualRef::Asset(5).code(), 5);
        assert_eq!(VisualRef::Placeholder(5).code(), 0x8000_0005);
        assert!(VisualRef::Placeholder(0).is_placeholder());
    }
}
