use std::sync::Arc;

use yeti_scene::{
    SurfaceSize,
    config::hex,
    data_structures::{model::Material, scene_graph::Renderable},
    pipelines::light::LightUniform,
    render::DrawList,
    resources::{MaterialUniform, to_linear},
};

use crate::common::test_utils::{assemble, assert_close};
mod common;

#[test]
fn should_cap_the_pixel_ratio() {
    assert_eq!(
        SurfaceSize::from_physical((2000, 1000), 3.0, 2.0),
        SurfaceSize::new(1333, 667)
    );
    assert_eq!(
        SurfaceSize::from_physical((1920, 1080), 1.5, 2.0),
        SurfaceSize::new(1920, 1080)
    );
    assert_eq!(
        SurfaceSize::from_physical((800, 600), 0.0, 2.0),
        SurfaceSize::new(800, 600)
    );
    assert!(SurfaceSize::new(0, 10).is_empty());
}

#[test]
fn should_collect_every_drawable_node() {
    let (scene, _) = assemble();
    let list = DrawList::collect(&scene);

    let meshes = scene
        .graph
        .iter()
        .filter(|(_, n)| matches!(n.renderable, Some(Renderable::Mesh { .. })))
        .count();
    assert_eq!(list.mesh_count(), meshes);
    assert_eq!(list.instances().len(), meshes);
    assert_eq!(list.points.len(), 1);
    // four banners and two eye glows
    assert_eq!(list.transparent.len(), 6);
}

#[test]
fn should_batch_shared_geometry() {
    let (scene, _) = assemble();
    let list = DrawList::collect(&scene);
    let batches = list.opaque_batches();

    let sizes: Vec<u32> = batches.iter().map(|b| b.instances.len() as u32).collect();
    assert!(sizes.contains(&30), "rocks are not batched: {sizes:?}");
    assert!(sizes.contains(&6), "claws are not batched: {sizes:?}");

    let mut next = 0;
    for batch in &batches {
        assert_eq!(batch.instances.start, next);
        next = batch.instances.end;
    }
    assert_eq!(next as usize, list.opaque.len());

    for batch in list.transparent_batches() {
        assert!(batch.instances.start >= list.opaque.len() as u32);
        assert!(batch.instances.end as usize <= list.mesh_count());
    }
}

#[test]
fn should_draw_transparent_meshes_back_to_front() {
    let (scene, _) = assemble();
    let list = DrawList::collect(&scene);

    assert!(list.transparent.windows(2).all(|w| w[0].depth >= w[1].depth));
    for item in &list.transparent {
        let material = scene.materials.get(item.material).expect("material");
        assert!(material.is_transparent());
    }
    for batch in list.opaque_batches() {
        let first = &list.opaque[batch.instances.start as usize];
        assert!(Arc::ptr_eq(&first.geometry, &batch.geometry));
    }
}

#[test]
fn should_pack_lights_and_fog() {
    let (scene, _) = assemble();
    let uniform = LightUniform::from_scene(&scene.lights, &scene.fog);

    assert!(uniform.is_shadowed());
    assert_close(uniform.fog_density(), 0.02);
    let ambient = to_linear(hex(0x3a4a5a)).map(|c| c * 0.5);
    for (actual, expected) in uniform.ambient().into_iter().zip(ambient) {
        assert_close(actual, expected);
    }

    let unlit = LightUniform::from_scene(&[], &scene.fog);
    assert!(!unlit.is_shadowed());
    assert_eq!(unlit.ambient(), [0.0; 3]);
}

#[test]
fn should_premultiply_emissive_intensity() {
    let material = Material::standard("glow", [1.0; 3])
        .emissive([1.0, 0.0, 0.0], 2.5)
        .opacity(1.5);
    let uniform = MaterialUniform::from_material(&material);

    assert_eq!(uniform.emissive(), [2.5, 0.0, 0.0]);
    assert_eq!(uniform.opacity(), 1.0);
}

#[test]
fn should_convert_to_linear_colour() {
    assert_eq!(to_linear([0.0, 1.0, 0.0]), [0.0, 1.0, 0.0]);
    assert_close(to_linear([0.5; 3])[0], 0.21404);
    assert_close(to_linear([0.04; 3])[0], 0.04 / 12.92);
}
