use yeti_scene::{
    SceneAssembler,
    data_structures::{model::Pulse, scene_graph::Renderable},
    scene::LightKind,
};

use crate::common::test_utils::{assemble, test_config};
mod common;

#[test]
fn should_assemble_every_part() {
    let (scene, handles) = assemble();
    let graph = &scene.graph;

    assert!(graph.find("terrain").is_some());
    assert_eq!(handles.terrain.rocks.len(), 30);
    let rocks = graph.iter().filter(|(_, n)| n.name.starts_with("rock_")).count();
    assert_eq!(rocks, 30);

    let yeti = graph.find("yeti").expect("creature root");
    assert_eq!(yeti, handles.creature.root);
    assert_eq!(graph.iter().filter(|(_, n)| n.name == "yeti").count(), 1);

    for i in 0..4 {
        assert!(graph.find(&format!("banner_{i}")).is_some(), "banner_{i} missing");
    }
    assert_eq!(scene.textures.len(), 4);
    assert_eq!(scene.particles.len(), 5000);

    let moon = graph.find("moon").expect("moon");
    assert!(matches!(graph[moon].renderable, Some(Renderable::Mesh { .. })));
    let moon_material = scene.materials.get(handles.moon_material).expect("moon material");
    assert_eq!(moon_material.pulse, Some(Pulse::Moon));

    assert!(matches!(graph[handles.snow].renderable, Some(Renderable::Points { .. })));
}

#[test]
fn should_light_with_ambient_moonlight_and_rim() {
    let (scene, _) = assemble();

    assert_eq!(scene.lights.len(), 3);
    let ambient = scene
        .lights
        .iter()
        .filter(|l| matches!(l.kind, LightKind::Ambient))
        .count();
    assert_eq!(ambient, 1);
    assert_eq!(scene.lights.iter().filter(|l| l.casts_shadow()).count(), 1);

    let moonlight = scene.shadow_light().expect("a shadow casting light");
    assert_eq!(moonlight.name, "moonlight");
    assert!(moonlight.shadow_view_proj().is_some());
    assert_eq!(scene.fog.density, 0.02);
}

#[test]
fn should_keep_a_single_rooted_tree() {
    let (scene, _) = assemble();
    let graph = &scene.graph;
    let root = graph.root();

    for (id, node) in graph.iter() {
        if id == root {
            assert!(graph.parent(id).is_none());
            continue;
        }
        let parent = graph.parent(id).expect("every other node has a parent");
        let listed = graph.children(parent).iter().filter(|c| **c == id).count();
        assert_eq!(listed, 1, "{} listed {listed} times by its parent", node.name);
        assert!(graph.is_descendant_of(id, root));
    }
    assert_eq!(graph.descendants(root).count(), graph.len() - 1);
}

#[test]
fn should_cast_and_receive_shadows() {
    let (scene, handles) = assemble();
    let graph = &scene.graph;

    assert!(graph[handles.terrain.ground].receive_shadow);
    assert!(handles.terrain.rocks.iter().all(|r| graph[*r].cast_shadow));
    for name in ["torso", "head", "arm_left", "hand_right", "leg_left"] {
        let id = graph.find(name).unwrap_or_else(|| panic!("{name} missing"));
        let casts = graph[id].cast_shadow
            || graph.descendants(id).any(|d| graph[d].cast_shadow);
        assert!(casts, "{name} casts no shadow");
    }
}

#[test]
fn should_assemble_identically_for_the_same_seed() {
    let config = test_config();
    let (a, _) = SceneAssembler::new(&config).assemble(800, 600);
    let (b, _) = SceneAssembler::new(&config).assemble(800, 600);

    assert_eq!(a.graph.len(), b.graph.len());
    for ((_, x), (_, y)) in a.graph.iter().zip(b.graph.iter()) {
        assert_eq!(x.name, y.name);
        assert_eq!(x.local, y.local);
    }
    assert_eq!(a.particles.particles(), b.particles.particles());
}

#[test]
fn should_scatter_rocks_differently_for_another_seed() {
    let mut config = test_config();
    let (a, handles) = SceneAssembler::new(&config).assemble(800, 600);
    config.seed += 1;
    let (b, _) = SceneAssembler::new(&config).assemble(800, 600);

    let moved = handles
        .terrain
        .rocks
        .iter()
        .filter(|r| a.graph[**r].local != b.graph[**r].local)
        .count();
    assert!(moved > 0);
}
