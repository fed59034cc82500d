//! Banner label text, shaped and rasterised with `cosmic-text` from a bold
//! face bundled into the binary.

use cosmic_text::{
    Attrs, Buffer, Color, Family, FontSystem, Metrics, Shaping, SwashCache, Weight, fontdb,
};
use image::GrayImage;

const FONT_DATA: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");
const FAMILY: &str = "DejaVu Sans";
const LINE_HEIGHT: f32 = 1.2;

/// A font system holding only the bundled label face, plus its glyph cache.
pub struct LabelFont {
    font_system: FontSystem,
    cache: SwashCache,
}

impl LabelFont {
    pub fn new() -> Self {
        let mut db = fontdb::Database::new();
        db.load_font_data(FONT_DATA.to_vec());
        log::debug!("label font: {} faces loaded", db.len());
        Self {
            font_system: FontSystem::new_with_locale_and_db("en-US".into(), db),
            cache: SwashCache::new(),
        }
    }

    fn layout(&mut self, text: &str, font_px: f32) -> Buffer {
        let font_px = font_px.max(1.0);
        let fs = &mut self.font_system;
        let mut buffer = Buffer::new(fs, Metrics::new(font_px, font_px * LINE_HEIGHT));
        buffer.set_size(fs, None, None);
        let attrs = Attrs::new().family(Family::Name(FAMILY)).weight(Weight::BOLD);
        buffer.set_text(fs, text, &attrs, Shaping::Advanced);
        buffer.shape_until_scroll(fs, false);
        buffer
    }

    /// Width and line height in pixels of `text` set on one line at `font_px`.
    pub fn measure(&mut self, text: &str, font_px: f32) -> (f32, f32) {
        extent(&self.layout(text, font_px))
    }

    /// Adds the coverage of `text` to `mask`, centred, at `font_px` or smaller
    /// so it fits `max_width`. Returns the font size drawn with.
    pub fn draw_centred(
        &mut self,
        mask: &mut GrayImage,
        text: &str,
        font_px: f32,
        max_width: f32,
    ) -> f32 {
        let mut font_px = font_px;
        let mut buffer = self.layout(text, font_px);
        let (width, _) = extent(&buffer);
        if width > max_width && width > 0.0 {
            font_px *= max_width / width;
            buffer = self.layout(text, font_px);
        }

        let (width, height) = extent(&buffer);
        let (w, h) = (mask.width() as i32, mask.height() as i32);
        let x0 = ((w as f32 - width) / 2.0).round() as i32;
        let y0 = ((h as f32 - height) / 2.0).round() as i32;
        let white = Color::rgb(255, 255, 255);
        buffer.draw(&mut self.font_system, &mut self.cache, white, |x, y, gw, gh, colour| {
            let coverage = colour.a();
            if coverage == 0 {
                return;
            }
            for py in (y + y0)..(y + y0 + gh as i32) {
                for px in (x + x0)..(x + x0 + gw as i32) {
                    if px < 0 || py < 0 || px >= w || py >= h {
                        continue;
                    }
                    let dst = mask.get_pixel_mut(px as u32, py as u32);
                    dst.0[0] = dst.0[0].max(coverage);
                }
            }
        });
        font_px
    }
}

impl Default for LabelFont {
    fn default() -> Self {
        Self::new()
    }
}

fn extent(buffer: &Buffer) -> (f32, f32) {
    buffer.layout_runs().fold((0.0_f32, 0.0_f32), |(w, h), run| {
        (w.max(run.line_w), h.max(run.line_top + run.line_height))
    })
}
