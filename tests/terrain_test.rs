use rand::{SeedableRng, rngs::StdRng};
use yeti_scene::{
    config::SceneConfig,
    data_structures::terrain::{TerrainBuilder, base_height},
};

use crate::common::test_utils::{assemble, assert_close};
mod common;

#[test]
fn should_be_flat_at_the_origin_before_peaks() {
    let config = SceneConfig::default();
    assert_close(base_height(&config.terrain, 0.0, 0.0), 0.0);
    assert!(base_height(&config.terrain, 15.7, 0.0).abs() <= config.terrain.amplitude);
}

#[test]
fn should_only_add_peaks_near_the_centre() {
    let config = SceneConfig::default();
    let builder = TerrainBuilder::new(&config.terrain, &config.rocks);
    let ground = builder.ground_geometry(&mut StdRng::seed_from_u64(3));

    let segments = config.terrain.segments as usize;
    assert_eq!(ground.vertex_count(), (segments + 1) * (segments + 1));

    for v in &ground.vertices {
        let [x, y, z] = v.position;
        let base = base_height(&config.terrain, x, z);
        if (x * x + z * z).sqrt() < config.terrain.peak_radius {
            assert!(y >= base && y <= base + config.terrain.peak_height);
        } else {
            assert_eq!(y, base);
        }
    }
}

#[test]
fn should_recompute_normals_after_displacement() {
    let config = SceneConfig::default();
    let builder = TerrainBuilder::new(&config.terrain, &config.rocks);
    let ground = builder.ground_geometry(&mut StdRng::seed_from_u64(3));

    for v in &ground.vertices {
        let [x, y, z] = v.normal;
        assert_close((x * x + y * y + z * z).sqrt(), 1.0);
        assert!(y > 0.0, "normal {:?} points away from the sky", v.normal);
    }
}

#[test]
fn should_scatter_rocks_in_a_ring() {
    let config = SceneConfig::default();
    let (scene, handles) = assemble();
    let rocks = &config.rocks;

    assert_eq!(handles.terrain.rocks.len(), rocks.count);
    for id in &handles.terrain.rocks {
        let local = scene.graph[*id].local;
        let radius = (local.position.x.powi(2) + local.position.z.powi(2)).sqrt();
        assert!(radius >= rocks.min_radius - 1e-3 && radius <= rocks.max_radius + 1e-3);
        assert!(local.position.y >= rocks.min_height && local.position.y <= rocks.max_height);
        assert!(local.scale.x >= rocks.min_scale && local.scale.x <= rocks.max_scale);
        assert_eq!(local.scale.x, local.scale.y);
        assert_eq!(local.scale.y, local.scale.z);
    }
}
