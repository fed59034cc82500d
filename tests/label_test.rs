use image::GrayImage;
use yeti_scene::resources::label::LabelFont;

const FONT_PX: f32 = 20.0;

fn inked_columns(mask: &GrayImage) -> Vec<u32> {
    (0..mask.width())
        .filter(|&x| (0..mask.height()).any(|y| mask.get_pixel(x, y).0[0] > 0))
        .collect()
}

#[test]
fn should_measure_longer_text_wider() {
    let mut font = LabelFont::new();
    let (short, height) = font.measure("ABOUT", FONT_PX);
    let (long, _) = font.measure("ABOUT ME", FONT_PX);

    assert!(short > 0.0);
    assert!(long > short);
    assert!(height >= FONT_PX);
}

#[test]
fn should_measure_an_empty_label_as_zero_width() {
    let mut font = LabelFont::new();
    let (width, _) = font.measure("", FONT_PX);
    assert_eq!(width, 0.0);
}

#[test]
fn should_centre_the_label_in_the_mask() {
    let mut font = LabelFont::new();
    let mut mask = GrayImage::new(256, 128);
    let used = font.draw_centred(&mut mask, "CONTACT", FONT_PX, 230.0);
    assert_eq!(used, FONT_PX);

    let columns = inked_columns(&mask);
    let (first, last) = (columns[0], columns[columns.len() - 1]);
    let centre = (first + last) as f32 / 2.0;
    assert!((centre - 128.0).abs() < 4.0, "ink centred at {centre}");

    let rows: Vec<u32> = (0..128)
        .filter(|&y| (0..256).any(|x| mask.get_pixel(x, y).0[0] > 0))
        .collect();
    assert!(rows[0] > 40 && rows[rows.len() - 1] < 88, "rows {rows:?}");
    assert!(mask.pixels().any(|p| p.0[0] == 255));
}

#[test]
fn should_shrink_labels_wider_than_the_limit() {
    let mut font = LabelFont::new();
    let mut mask = GrayImage::new(256, 128);
    let label = "A VERY LONG BANNER LABEL";
    let used = font.draw_centred(&mut mask, label, 40.0, 200.0);
    assert!(used < 40.0);

    let (width, _) = font.measure(label, used);
    assert!(width <= 200.5, "{width}");
    let columns = inked_columns(&mask);
    assert!(columns[0] >= 26 && columns[columns.len() - 1] <= 229, "{columns:?}");
}

#[test]
fn should_draw_nothing_for_an_empty_label() {
    let mut font = LabelFont::new();
    let mut mask = GrayImage::new(64, 32);
    font.draw_centred(&mut mask, "", FONT_PX, 60.0);
    assert!(mask.pixels().all(|p| p.0[0] == 0));
}
