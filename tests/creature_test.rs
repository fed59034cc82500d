use std::sync::Arc;

use yeti_scene::data_structures::{
    model::{Pulse, Side},
    scene_graph::{NodeId, SceneGraph},
};

use crate::common::test_utils::{assemble, assert_close};
mod common;

fn node(graph: &SceneGraph, name: &str) -> NodeId {
    graph.find(name).unwrap_or_else(|| panic!("no node named {name}"))
}

#[test]
fn should_mirror_paired_parts() {
    let (scene, _) = assemble();
    let graph = &scene.graph;

    for part in ["shoulder", "eye", "eye_glow", "brow", "arm", "upper_arm", "forearm", "hand", "leg"] {
        let left = &graph[node(graph, &format!("{part}_left"))];
        let right = &graph[node(graph, &format!("{part}_right"))];

        assert_close(left.local.position.x, -right.local.position.x);
        assert_close(left.local.position.y, right.local.position.y);
        assert_close(left.local.position.z, right.local.position.z);
        assert_eq!(left.local.scale, right.local.scale);
        assert_eq!(left.material(), right.material(), "{part}");
        match (left.renderable.as_ref(), right.renderable.as_ref()) {
            (None, None) => {}
            (Some(l), Some(r)) => {
                let (l, r) = (l.geometry().expect("mesh"), r.geometry().expect("mesh"));
                assert!(Arc::ptr_eq(l, r), "{part} sides use different geometry");
            }
            _ => panic!("{part} is drawn on one side only"),
        }
    }
}

#[test]
fn should_share_one_pulsing_eye_material() {
    let (scene, handles) = assemble();
    let graph = &scene.graph;

    let left = graph[node(graph, "eye_left")].material();
    let right = graph[node(graph, "eye_right")].material();
    assert_eq!(left, Some(handles.creature.eye_material));
    assert_eq!(right, Some(handles.creature.eye_material));

    let eye = scene.materials.get(handles.creature.eye_material).expect("eye material");
    assert_eq!(eye.pulse, Some(Pulse::Eye));
    assert_eq!(scene.materials.find_pulse(Pulse::Eye), Some(handles.creature.eye_material));
}

#[test]
fn should_hang_hands_from_arm_groups() {
    let (scene, handles) = assemble();
    let graph = &scene.graph;
    let creature = &handles.creature;

    for side in Side::BOTH {
        let arm = creature.arm(side);
        let hand = creature.hand(side);
        assert_eq!(graph.parent(arm), Some(creature.root));
        assert!(graph.is_descendant_of(hand, arm));
        assert_eq!(graph[hand].name, format!("hand_{}", side.label()));

        let claws = graph
            .children(hand)
            .iter()
            .filter(|c| graph[**c].name.starts_with("claw_"))
            .count();
        assert_eq!(claws, 3);
    }
}

#[test]
fn should_only_sway_arm_groups() {
    let (scene, handles) = assemble();
    let graph = &scene.graph;
    let root = handles.creature.root;

    let swaying: Vec<&str> = graph
        .children(root)
        .iter()
        .map(|c| &graph[*c])
        .filter(|n| n.local.position.x.abs() > 2.75)
        .map(|n| n.name.as_str())
        .collect();
    assert_eq!(swaying, ["arm_left", "arm_right"]);
    for arm in handles.creature.arms {
        assert_close(graph[arm].local.rotation.x, -0.5);
    }
}

#[test]
fn should_stand_at_the_configured_pose() {
    let (scene, handles) = assemble();
    let root = &scene.graph[handles.creature.root];

    assert_close(root.local.position.x, 0.0);
    assert_close(root.local.position.y, -2.0);
    assert_close(root.local.position.z, 8.0);
    assert_close(root.local.rotation.y, std::f32::consts::PI * 0.1);
}

#[test]
fn should_cast_shadows_from_every_opaque_part() {
    let (scene, handles) = assemble();
    let graph = &scene.graph;

    let mut opaque = 0;
    for id in graph.descendants(handles.creature.root) {
        let part = &graph[id];
        let Some(material) = part.material() else {
            continue;
        };
        if scene.materials.get(material).expect("material").is_transparent() {
            continue;
        }
        assert!(part.cast_shadow, "{} casts no shadow", part.name);
        opaque += 1;
    }
    assert!(opaque > 0);

    for name in ["eye_left", "eye_right", "mouth"] {
        assert!(graph[node(graph, name)].cast_shadow, "{name}");
    }
}
