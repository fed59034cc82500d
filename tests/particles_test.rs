use rand::{SeedableRng, rngs::StdRng};
use yeti_scene::{
    config::{FallMode, ParticleConfig},
    data_structures::particles::ParticleField,
};

use crate::common::test_utils::assert_close;
mod common;

fn field(config: &ParticleConfig) -> ParticleField {
    ParticleField::new(config, &mut StdRng::seed_from_u64(11))
}

#[test]
fn should_spawn_inside_the_volume() {
    let config = ParticleConfig::default();
    let field = field(&config);

    assert_eq!(field.len(), 5000);
    for p in field.particles() {
        let [x, y, z] = p.position;
        assert!(x.abs() <= 100.0 && z.abs() <= 100.0);
        assert!((10.0..=110.0).contains(&y));
        assert!((0.05..=0.2).contains(&p.fall_speed));
        assert!((0.1..=0.4).contains(&p.size));
    }
}

#[test]
fn should_use_the_bound_for_collapsed_ranges() {
    let config = ParticleConfig {
        count: 50,
        min_size: 0.25,
        max_size: 0.25,
        min_speed: 0.1,
        max_speed: 0.1,
        ..ParticleConfig::default()
    };
    let field = field(&config);

    assert_eq!(field.len(), 50);
    for p in field.particles() {
        assert_eq!(p.size, 0.25);
        assert_eq!(p.fall_speed, 0.1);
    }
}

#[test]
fn should_keep_the_count_constant() {
    let config = ParticleConfig::default();
    let mut field = field(&config);

    for i in 0..2000 {
        field.advance(1.0 / 60.0, i as f32 / 60.0);
    }
    assert_eq!(field.len(), 5000);
    assert!(field.respawned() > 0);
    for p in field.particles() {
        assert!(p.position[1] >= config.ground_threshold);
        assert!(p.position.iter().all(|c| c.is_finite()));
    }
}

#[test]
fn should_respawn_below_the_ground_threshold() {
    let config = ParticleConfig::default();
    let mut field = field(&config);
    let before = *field.get(42).expect("particle 42");
    let [x, _, z] = before.position;

    field.set_position(42, [x, -10.0, z]);
    field.advance(1.0 / 60.0, 0.0);

    let after = field.get(42).expect("particle 42");
    assert!((100.0..=120.0).contains(&after.position[1]), "{:?}", after.position);
    assert!(after.position[0].abs() <= 100.0 && after.position[2].abs() <= 100.0);
    assert_eq!(after.fall_speed, before.fall_speed);
    assert_eq!(after.size, before.size);
    assert_eq!(field.respawned(), 1);
}

#[test]
fn should_fall_by_speed_per_tick() {
    let config = ParticleConfig::default();
    let mut field = field(&config);
    let before = field.particles().to_vec();

    // a long pause still moves one step per tick
    field.advance(0.5, 1.0);
    for (b, a) in before.iter().zip(field.particles()) {
        assert_close(b.position[1] - a.position[1], b.fall_speed);
    }
}

#[test]
fn should_scale_the_fall_with_delta_when_normalized() {
    let config = ParticleConfig {
        fall_mode: FallMode::Normalized { reference_hz: 60.0 },
        ..ParticleConfig::default()
    };
    let mut field = field(&config);
    let before = field.particles().to_vec();

    field.advance(1.0 / 30.0, 0.0);
    for (b, a) in before.iter().zip(field.particles()) {
        assert!((b.position[1] - a.position[1] - 2.0 * b.fall_speed).abs() < 1e-3);
    }
}

#[test]
fn should_drift_with_the_wind() {
    let config = ParticleConfig::default();
    let mut field = field(&config);
    let before = *field.get(0).expect("particle 0");

    field.advance(1.0 / 60.0, 0.0);
    let after = field.get(0).expect("particle 0");
    // phase 0 at time 0: sin(0) in x, cos(0) in z
    assert_close(after.position[0], before.position[0]);
    assert_close(after.position[2] - before.position[2], config.drift_z);
}

#[test]
fn should_bump_the_version_on_every_change() {
    let config = ParticleConfig::default();
    let mut field = field(&config);
    let v = field.version();

    field.advance(1.0 / 60.0, 0.0);
    assert_eq!(field.version(), v + 1);
    field.set_position(0, [0.0, 50.0, 0.0]);
    assert_eq!(field.version(), v + 2);
    field.set_position(999_999, [0.0, 50.0, 0.0]);
    assert_eq!(field.version(), v + 2);
    assert_eq!(field.as_bytes().len(), 5000 * std::mem::size_of::<[f32; 5]>());
}
