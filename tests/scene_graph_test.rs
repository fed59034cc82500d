use std::f32::consts::FRAC_PI_2;

use yeti_scene::data_structures::{
    instance::Instance,
    scene_graph::{SceneGraph, SceneNode},
};

use crate::common::test_utils::assert_close;
mod common;

#[test]
fn should_compose_world_transforms_down_the_tree() {
    let mut graph = SceneGraph::new();
    let parent = graph.add_child(
        graph.root(),
        SceneNode::group("parent")
            .with_transform(Instance::at(1.0, 2.0, 3.0).with_rotation(0.0, FRAC_PI_2, 0.0)),
    );
    let child = graph.add_child(parent, SceneNode::group("child").with_transform(Instance::at(1.0, 0.0, 0.0)));
    graph.update_world_transforms();

    let p = graph.world_position(child);
    // a quarter turn about y takes +x to -z
    assert_close(p.x, 1.0);
    assert_close(p.y, 2.0);
    assert_close(p.z, 2.0);

    graph[parent].local.position.y = 5.0;
    graph.update_world_transforms();
    assert_close(graph.world_position(child).y, 5.0);
}

#[test]
fn should_walk_descendants_depth_first() {
    let mut graph = SceneGraph::new();
    let root = graph.root();
    let a = graph.add_child(root, SceneNode::group("a"));
    let b = graph.add_child(a, SceneNode::group("b"));
    let c = graph.add_child(root, SceneNode::group("c"));
    let d = graph.add_child(b, SceneNode::group("d"));

    let order: Vec<_> = graph.descendants(root).collect();
    assert_eq!(order, [a, b, d, c]);
    assert!(graph.is_descendant_of(d, a));
    assert!(!graph.is_descendant_of(c, a));
    assert!(!graph.is_descendant_of(a, a));
    assert_eq!(graph.find("d"), Some(d));
    assert_eq!(graph.find("missing"), None);
    assert_eq!(graph.len(), 5);
}

#[test]
fn should_reset_links_of_inserted_nodes() {
    let mut graph = SceneGraph::new();
    let a = graph.add_child(graph.root(), SceneNode::group("a"));
    graph.add_child(a, SceneNode::group("b"));

    let copy = graph[a].clone();
    let moved = graph.add_child(graph.root(), copy);
    assert!(graph.children(moved).is_empty());
    assert_eq!(graph.parent(moved), Some(graph.root()));
    assert_eq!(graph.children(graph.root()).len(), 2);
}
