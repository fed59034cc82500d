use yeti_scene::pointer::{PointerPosition, PointerTracker};

use crate::common::test_utils::assert_close;
mod common;

#[test]
fn should_map_the_centre_to_the_origin() {
    let mut pointer = PointerTracker::new();
    pointer.on_pointer_move(400.0, 300.0, 800, 600);
    assert_eq!(pointer.position(), PointerPosition { x: 0.0, y: 0.0 });
}

#[test]
fn should_flip_the_vertical_axis() {
    let mut pointer = PointerTracker::new();

    pointer.on_pointer_move(0.0, 0.0, 800, 600);
    assert_eq!(pointer.position(), PointerPosition { x: -1.0, y: 1.0 });

    pointer.on_pointer_move(800.0, 600.0, 800, 600);
    assert_eq!(pointer.position(), PointerPosition { x: 1.0, y: -1.0 });

    pointer.on_pointer_move(200.0, 450.0, 800, 600);
    assert_close(pointer.position().x, -0.5);
    assert_close(pointer.position().y, -0.5);
}

#[test]
fn should_track_touches_and_claim_drags() {
    let mut pointer = PointerTracker::new();

    pointer.on_touch_start(600.0, 150.0, 800, 600);
    assert_close(pointer.position().x, 0.5);
    assert_close(pointer.position().y, 0.5);

    assert!(pointer.on_touch_move(400.0, 300.0, 800, 600));
    assert_eq!(pointer.position(), PointerPosition { x: 0.0, y: 0.0 });
}

#[test]
fn should_ignore_events_on_an_empty_viewport() {
    let mut pointer = PointerTracker::new();
    pointer.on_pointer_move(600.0, 150.0, 800, 600);
    let before = pointer.position();

    pointer.on_pointer_move(10.0, 10.0, 0, 600);
    pointer.on_pointer_move(10.0, 10.0, 800, 0);
    assert_eq!(pointer.position(), before);
}
