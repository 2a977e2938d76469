//! # Formation Tests
//!
//! Verifies the setup-time contract: deterministic trees, bounded galaxies.

use arbora_formation::{
    ElementClass, FormationConfig, FormationGenerator, FormationSeed, GalaxyShell, TreeShape,
};

/// Test: identical (index, total) give identical tree positions across generators.
#[test]
fn test_tree_is_deterministic_across_generators() {
    let a = FormationGenerator::new(FormationConfig::default()).unwrap();
    let b = FormationGenerator::new(FormationConfig::default()).unwrap();

    for class in ElementClass::ALL {
        for index in (0..400).step_by(37) {
            assert_eq!(a.tree_target(class, index, 400), b.tree_target(class, index, 400));
        }
    }
}

/// Test: a different seed moves only the randomly placed class.
#[test]
fn test_seed_only_affects_random_placement() {
    let a = FormationGenerator::new(FormationConfig::default()).unwrap();
    let b = FormationGenerator::new(FormationConfig {
        seed: FormationSeed::new(1234),
        ..FormationConfig::default()
    })
    .unwrap();

    assert_ne!(
        a.tree_target(ElementClass::Ambient, 10, 100),
        b.tree_target(ElementClass::Ambient, 10, 100)
    );
    assert_eq!(
        a.tree_target(ElementClass::Gem, 10, 100),
        b.tree_target(ElementClass::Gem, 10, 100)
    );
}

/// Test: every galaxy sample respects the shell and the compression.
#[test]
fn test_galaxy_bounds_for_custom_shell() {
    let shell = GalaxyShell {
        inner_radius: 3.0,
        outer_radius: 4.0,
        vertical_compression: 0.5,
    };
    let mut generator = FormationGenerator::new(FormationConfig {
        galaxy: shell,
        ..FormationConfig::default()
    })
    .unwrap();

    let mut max_y: f32 = 0.0;
    for _ in 0..3000 {
        let p = generator.galaxy_target();
        let r = shell.shell_radius(p);
        assert!((3.0 - 1e-3..=4.0 + 1e-3).contains(&r), "radius {r} outside shell");
        max_y = max_y.max(p.y.abs());
    }
    assert!(max_y <= 2.0 + 1e-3, "compression not applied: {max_y}");
    assert!(max_y > 1.5, "samples never approached the poles: {max_y}");
}

/// Test: photo cards sit outside the ornaments at the same height.
#[test]
fn test_cards_float_outside_surface() {
    let shape = TreeShape::default();
    let seed = FormationSeed::default();
    let card = shape.target(seed, ElementClass::PhotoCard, 5, 20);
    let t = 0.5 - card.y / shape.height;
    let r = (card.x * card.x + card.z * card.z).sqrt();
    assert!(r > shape.base_radius * t);
}

/// Test: invalid configuration is rejected before any generation.
#[test]
fn test_invalid_config_rejected() {
    let config = FormationConfig {
        tree: TreeShape {
            height: -1.0,
            ..TreeShape::default()
        },
        ..FormationConfig::default()
    };
    assert!(FormationGenerator::new(config).is_err());
}
