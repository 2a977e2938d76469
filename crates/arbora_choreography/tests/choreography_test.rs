//! Choreography integration tests: formation toggles, focus hand-off, camera.

use arbora_choreography::{
    CameraConfig, CameraDirector, ChoreographyConfig, ElementId, FocusTarget, ParticleArena,
    ParticleChoreographer, ParticleRecord, VisualRef,
};
use arbora_formation::{ElementClass, FormationConfig, FormationGenerator, FormationTargets};
use arbora_shared::{Formation, OrbitRotation, Vec3};

const DT: f32 = 1.0 / 60.0;

fn scene(class: ElementClass, count: usize) -> (ParticleChoreographer, Vec<FormationTargets>) {
    let mut generator = FormationGenerator::new(FormationConfig::default()).unwrap();
    let targets = generator.generate_class(class, count);
    let mut arena = ParticleArena::with_capacity(count);
    for (i, t) in targets.iter().enumerate() {
        arena.spawn(ParticleRecord::new(
            class,
            *t,
            Formation::Tree,
            VisualRef::Asset(i as u32),
            i as f32,
            1.2,
        ));
    }
    (
        ParticleChoreographer::new(arena, ChoreographyConfig::default(), Formation::Tree),
        targets,
    )
}

fn run(ch: &mut ParticleChoreographer, frames: usize, formation: Formation, focus: Option<FocusTarget>) {
    for _ in 0..frames {
        ch.step(DT, formation, focus);
    }
}

#[test]
fn test_round_trip_returns_to_tree() {
    let (mut ch, targets) = scene(ElementClass::Gem, 64);

    // Interrupt transitions mid-flight several times.
    for formation in [Formation::Galaxy, Formation::Tree, Formation::Galaxy, Formation::Tree] {
        run(&mut ch, 20, formation, None);
    }
    run(&mut ch, 300, Formation::Tree, None);

    for (id, rec) in ch.arena().iter() {
        let expected = targets[id.index()];
        assert!(rec.position.distance(expected.tree) < 1e-2, "element {} off tree", id.0);
        // Galaxy targets never change.
        assert_eq!(rec.targets.galaxy, expected.galaxy);
    }
    assert_eq!(ch.settled_fraction(), 1.0);
}

#[test]
fn test_galaxy_settles_within_two_seconds() {
    let (mut ch, _) = scene(ElementClass::Box, 40);
    run(&mut ch, 120, Formation::Galaxy, None);
    assert!(ch.settled_fraction() > 0.95, "settled {}", ch.settled_fraction());
}

#[test]
fn test_focus_exclusivity() {
    let (mut ch, targets) = scene(ElementClass::PhotoCard, 4);
    let spot = Vec3::new(0.0, 0.0, 18.0);

    let first = FocusTarget { id: ElementId(0), position: spot };
    run(&mut ch, 90, Formation::Tree, Some(first));
    assert!(ch.arena().records()[0].position.distance(spot) < 0.1);

    let second = FocusTarget { id: ElementId(1), position: spot };
    ch.step(DT, Formation::Tree, Some(second));
    assert_eq!(ch.focused(), Some(ElementId(1)));
    // Previous override is gone on the very next frame.
    assert_eq!(ch.current_target(ElementId(0)), Some(targets[0].tree));

    let mut buf = Vec::new();
    ch.write_instances(&mut buf);
    assert_eq!(buf.iter().filter(|row| row.is_focused()).count(), 1);
    assert!(buf[1].is_focused());

    run(&mut ch, 240, Formation::Tree, Some(second));
    let rec = &ch.arena().records()[0];
    assert!(rec.position.distance(targets[0].tree) < 1e-2);
    assert!((rec.scale - rec.base_scale).abs() < 1e-2);
}

#[test]
fn test_camera_follows_formation_distance() {
    let mut cam = CameraDirector::new(CameraConfig::default(), Formation::Tree);
    let orbit = OrbitRotation::default();
    for _ in 0..600 {
        let target = cam.target_for(Formation::Galaxy, orbit, None);
        cam.update(DT, target);
    }
    assert!((cam.position().length() - 44.0).abs() < 0.01);
    assert_eq!(cam.look_at(), Vec3::ZERO);
}
