use std::f32::consts::PI;

use yeti_scene::{
    AnimationScheduler, FrameClock, Renderer, SurfaceSize, data_structures::model::MaterialId,
};

use crate::common::test_utils::{RecordingRenderer, assert_close, scheduler};
mod common;

const DT: f32 = 1.0 / 60.0;

fn intensity(scheduler: &AnimationScheduler<RecordingRenderer>, id: MaterialId) -> f32 {
    scheduler
        .scene()
        .materials
        .get(id)
        .expect("material")
        .emissive_intensity
}

#[test]
fn should_pose_everything_at_time_zero() {
    let mut scheduler = scheduler();
    scheduler.start();
    scheduler.tick(DT, 0.0);

    let handles = scheduler.handles().clone();
    let graph = &scheduler.scene().graph;
    let root = &graph[handles.creature.root];
    assert_close(root.local.position.y, -2.0);
    assert_close(root.local.rotation.y, PI * 0.1);
    for arm in handles.creature.arms {
        assert_close(graph[arm].local.rotation.x, -0.5);
    }

    let camera = &scheduler.scene().camera;
    assert_close(camera.position.x, 0.0);
    assert_close(camera.position.y, 5.0);
    assert_close(camera.position.z, 20.0);
    assert_close(camera.target.y, 3.0);

    assert_close(intensity(&scheduler, handles.creature.eye_material), 2.5);
    assert_close(intensity(&scheduler, handles.moon_material), 0.3);
    assert_eq!(scheduler.renderer().renders(), 1);
    assert_eq!(scheduler.ticks(), 1);
}

#[test]
fn should_peak_the_eyes_together() {
    let mut scheduler = scheduler();
    scheduler.start();
    scheduler.tick(DT, PI / 6.0);

    let eye = scheduler.handles().creature.eye_material;
    assert_close(intensity(&scheduler, eye), 3.0);
    let graph = &scheduler.scene().graph;
    for name in ["eye_left", "eye_right"] {
        let id = graph.find(name).expect("eye");
        assert_eq!(graph[id].material(), Some(eye));
    }
}

#[test]
fn should_stay_within_bounds_over_time() {
    let mut scheduler = scheduler();
    let handles = scheduler.handles().clone();
    let nodes = scheduler.scene().graph.len();
    scheduler.start();

    let mut previous_y = -2.0_f32;
    for i in 0..600 {
        scheduler.tick(DT, i as f32 * DT);
        let scene = scheduler.scene();
        let root = &scene.graph[handles.creature.root];

        let y = root.local.position.y;
        assert!((y + 2.0).abs() <= 0.05 + 1e-5);
        assert!((y - previous_y).abs() < 0.01, "breathing jumped at tick {i}");
        previous_y = y;
        assert!((root.local.rotation.y - PI * 0.1).abs() <= 0.1 + 1e-5);

        let eye = intensity(&scheduler, handles.creature.eye_material);
        assert!((2.0 - 1e-5..=3.0 + 1e-5).contains(&eye));
        let moon = intensity(&scheduler, handles.moon_material);
        assert!((0.2 - 1e-5..=0.4 + 1e-5).contains(&moon));

        for banner in &handles.banners {
            let local = scene.graph[banner.node].local;
            assert!(local.rotation.y.abs() <= 0.15 + 1e-5);
            assert!(local.rotation.z.abs() <= 0.05 + 1e-5);
            assert!((local.position.y + 4.5).abs() <= 0.1 + 1e-5);
        }

        let camera = scene.camera.position;
        assert_close(camera.y, 5.0);
        assert!(camera.x.abs() <= 10.0 + 1e-4);
        assert!((15.0 - 1e-4..=25.0 + 1e-4).contains(&camera.z));
    }

    let renderer = scheduler.renderer();
    assert_eq!(renderer.renders(), 600);
    assert!(renderer.node_counts().iter().all(|n| *n == nodes));
    assert!(renderer.particle_versions().windows(2).all(|w| w[0] < w[1]));
    assert_eq!(scheduler.scene().particles.len(), 5000);
}

#[test]
fn should_update_world_transforms_before_rendering() {
    let mut scheduler = scheduler();
    scheduler.start();
    scheduler.tick(DT, 1.0);

    let root = scheduler.handles().creature.root;
    let expected = -2.0 + (1.5_f32).sin() * 0.05;
    let world = scheduler.scene().graph.world_position(root);
    assert_close(world.x, 0.0);
    assert_close(world.y, expected);
    assert_close(world.z, 8.0);
}

#[test]
fn should_ignore_ticks_before_start() {
    let mut scheduler = scheduler();
    let root = scheduler.handles().creature.root;
    let before = scheduler.scene().graph[root].local;
    let version = scheduler.scene().particles.version();

    scheduler.tick(DT, 2.0);

    assert!(!scheduler.is_running());
    assert_eq!(scheduler.ticks(), 0);
    assert_eq!(scheduler.renderer().renders(), 0);
    assert_eq!(scheduler.scene().graph[root].local, before);
    assert_eq!(scheduler.scene().particles.version(), version);
}

#[test]
fn should_start_only_once() {
    let mut scheduler = scheduler();
    scheduler.start();
    scheduler.start();
    scheduler.tick(DT, 0.0);

    assert!(scheduler.is_running());
    assert_eq!(scheduler.renderer().renders(), 1);
}

#[test]
fn should_resize_without_rebuilding() {
    let mut scheduler = scheduler();
    let nodes = scheduler.scene().graph.len();
    let camera = scheduler.scene().camera.position;

    scheduler.resize(SurfaceSize::new(800, 600));
    assert_close(scheduler.scene().projection.aspect(), 800.0 / 600.0);
    assert_eq!(scheduler.renderer().size(), SurfaceSize::new(800, 600));

    scheduler.resize(SurfaceSize::new(1600, 900));
    assert_close(scheduler.scene().projection.aspect(), 16.0 / 9.0);
    assert_eq!(scheduler.renderer().size(), SurfaceSize::new(1600, 900));

    scheduler.resize(SurfaceSize::new(0, 900));
    assert_close(scheduler.scene().projection.aspect(), 16.0 / 9.0);
    assert_eq!(scheduler.renderer().resizes().len(), 2);

    assert_eq!(scheduler.scene().graph.len(), nodes);
    assert_eq!(scheduler.scene().camera.position, camera);
    assert_eq!(scheduler.renderer().renders(), 0);
}

#[test]
fn should_expose_debug_handles() {
    let scheduler = scheduler();
    let debug = scheduler.debug();

    assert_eq!(debug.scene_root, debug.graph.root());
    assert_eq!(debug.creature_root, scheduler.handles().creature.root);
    assert_eq!(debug.graph[debug.creature_root].name, "yeti");
    assert_eq!(debug.camera.position, scheduler.scene().camera.position);
}

#[test]
fn should_measure_time_from_reset() {
    let mut clock = FrameClock::new();
    clock.reset();
    let (delta, elapsed) = clock.tick();
    assert!(delta >= 0.0);
    assert_eq!(elapsed, delta);

    let (_, later) = clock.tick();
    assert!(later >= elapsed);
    assert_eq!(clock.elapsed(), later);
}

#[test]
fn should_sway_arms_and_phase_banners_at_a_later_time() {
    let t = 1.3_f32;
    let mut scheduler = scheduler();
    scheduler.start();
    scheduler.tick(DT, t);

    let handles = scheduler.handles().clone();
    let graph = &scheduler.scene().graph;

    let pitch = -0.5 + (0.8 * t).sin() * 0.2;
    let [left, right] = handles.creature.arms.map(|arm| graph[arm].local.rotation.x);
    assert_close(left, pitch);
    assert_close(right, pitch);
    assert_eq!(left, right);

    for name in ["shoulder_left", "shoulder_right"] {
        let shoulder = graph.find(name).expect("shoulder");
        assert_eq!(graph[shoulder].local.rotation.x, 0.0, "{name}");
    }

    let yaws: Vec<f32> = handles
        .banners
        .iter()
        .map(|b| graph[b.node].local.rotation.y)
        .collect();
    for (i, yaw) in yaws.iter().enumerate() {
        assert_close(*yaw, (t + i as f32).sin() * 0.15);
    }
    for i in 0..yaws.len() {
        for j in i + 1..yaws.len() {
            assert!((yaws[i] - yaws[j]).abs() > 1e-3, "banners {i} and {j} move in step");
        }
    }
}
