use std::collections::HashSet;

use yeti_scene::{
    data_structures::model::Pulse,
    resources::{banner, label::LabelFont},
};

use crate::common::test_utils::{assemble, scheduler};
mod common;

const WIDTH: u32 = 256;
const HEIGHT: u32 = 128;

#[test]
fn should_hang_two_banners_from_each_hand() {
    let (scene, handles) = assemble();
    let graph = &scene.graph;
    let [left, right] = handles.creature.hands;

    let parents: Vec<_> = handles.banners.iter().map(|b| graph.parent(b.node)).collect();
    assert_eq!(parents, [Some(left), Some(left), Some(right), Some(right)]);

    let textures: HashSet<_> = handles.banners.iter().map(|b| b.texture).collect();
    assert_eq!(textures.len(), 4);
    assert_eq!(scene.textures.len(), 4);
}

#[test]
fn should_highlight_only_the_first_banner() {
    let (scene, handles) = assemble();

    for (i, b) in handles.banners.iter().enumerate() {
        let material = scene.materials.get(b.material).expect("banner material");
        let expected = if i == 0 { 1.0 } else { 0.3 };
        assert_eq!(material.emissive_intensity, expected, "banner {i}");
        assert_eq!(material.texture, Some(b.texture));
        assert_eq!(material.pulse, Some(Pulse::Banner));
        assert!(material.double_sided);
        assert!(material.is_transparent());
    }
}

#[test]
fn should_alternate_front_and_back_offsets() {
    let (scene, handles) = assemble();
    let z: Vec<f32> = handles
        .banners
        .iter()
        .map(|b| scene.graph[b.node].local.position.z)
        .collect();
    assert_eq!(z, [1.0, -1.0, 1.0, -1.0]);
}

#[test]
fn should_keep_textures_while_animating() {
    let mut scheduler = scheduler();
    let before = scheduler.handles().banners.clone().map(|b| b.texture);
    scheduler.start();
    for i in 0..120 {
        scheduler.tick(1.0 / 60.0, i as f32 / 60.0);
    }

    assert!(scheduler.renderer().texture_counts().iter().all(|n| *n == 4));
    let after = scheduler.handles().banners.clone().map(|b| b.texture);
    assert_eq!(before, after);
}

#[test]
fn should_rasterize_an_opaque_image() {
    let image = banner::rasterize("ABOUT ME", 0x66ccff, WIDTH, HEIGHT);
    assert_eq!(image.dimensions(), (WIDTH, HEIGHT));
    assert!(image.pixels().all(|p| p.0[3] == 255));
}

#[test]
fn should_paint_the_gradient_between_border_and_text() {
    let image = banner::rasterize("ABOUT ME", 0x66ccff, WIDTH, HEIGHT);
    // halfway across: midway between 0x0b1d2a and 0x112a3e
    let [r, g, b, _] = image.get_pixel(WIDTH / 2, 25).0;
    for (actual, expected) in [(r, 14), (g, 36), (b, 52)] {
        assert!(actual.abs_diff(expected) <= 1, "{actual} vs {expected}");
    }

    let left = image.get_pixel(20, 25).0;
    let right = image.get_pixel(WIDTH - 21, 25).0;
    assert!(left[2] < right[2], "gradient should brighten to the right");
}

#[test]
fn should_stroke_the_border_in_the_accent_colour() {
    let image = banner::rasterize("PROJECTS", 0x66ccff, WIDTH, HEIGHT);
    assert_eq!(image.get_pixel(4, HEIGHT / 2).0, [0x66, 0xcc, 0xff, 255]);
    assert_eq!(image.get_pixel(WIDTH / 2, 4).0, [0x66, 0xcc, 0xff, 255]);
}

#[test]
fn should_outline_the_label_in_white() {
    let image = banner::rasterize("CONTACT", 0xff6699, WIDTH, HEIGHT);
    assert!(image.pixels().any(|p| p.0 == [255, 255, 255, 255]));

    let blank = banner::rasterize("", 0xff6699, WIDTH, HEIGHT);
    assert!(!blank.pixels().any(|p| p.0 == [255, 255, 255, 255]));
}

#[test]
fn should_fit_long_labels_into_the_banner() {
    let label = "A VERY LONG BANNER LABEL";
    let mut font = LabelFont::new();
    let (natural, _) = font.measure(label, 20.0);
    assert!(natural > WIDTH as f32 * 0.9);

    let image = banner::rasterize(label, 0x66ff99, WIDTH, HEIGHT);
    assert_eq!(image.dimensions(), (WIDTH, HEIGHT));
    // the outermost columns stay clear of label ink
    for y in 0..HEIGHT {
        for x in [2, WIDTH - 3] {
            assert_ne!(image.get_pixel(x, y).0, [255, 255, 255, 255], "({x}, {y})");
        }
    }
}
