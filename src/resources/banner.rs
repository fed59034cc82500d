//! Glowing signage: banner textures are rasterised on the CPU once, then
//! hung under the creature's hands as double-sided emissive panels.
//!
//! The raster imitates a 2D canvas drawing: a horizontal gradient between two
//! dark tones, a thick accent-coloured border with a soft glow, and the label
//! centred, filled in the accent colour over a blurred halo and outlined in
//! white.

use std::sync::Arc;

use image::{GrayImage, Luma, Rgb as Px, RgbImage, RgbaImage, imageops};

use crate::{
    config::{BannerConfig, BannerSpec, Rgb, hex},
    data_structures::{
        instance::Instance,
        model::{Geometry, Material, MaterialId, MaterialLibrary, Pulse, TextureId, TextureLibrary},
        scene_graph::{NodeId, SceneGraph, SceneNode},
    },
    resources::{label::LabelFont, mesh},
};

const GRADIENT_FROM: u32 = 0x0b1d2a;
const GRADIENT_TO: u32 = 0x112a3e;
/// Canvas measurements at the reference width of 1024 pixels.
const REFERENCE_WIDTH: f32 = 1024.0;
const BORDER_INSET: f32 = 20.0;
const BORDER_WIDTH: f32 = 12.0;
const BORDER_BLUR: f32 = 20.0;
const FONT_PX: f32 = 80.0;
const TEXT_BLUR: f32 = 15.0;

/// A banner hung in the scene.
#[derive(Clone, Debug)]
pub struct Banner {
    pub label: String,
    pub accent: Rgb,
    pub node: NodeId,
    pub material: MaterialId,
    pub texture: TextureId,
}

pub struct BannerFactory<'a> {
    config: &'a BannerConfig,
    plane: Arc<Geometry>,
}

impl<'a> BannerFactory<'a> {
    pub fn new(config: &'a BannerConfig) -> Self {
        Self {
            config,
            plane: mesh::quad(config.plane_width, config.plane_height).shared(),
        }
    }

    /// Draws the banner texture for `label` in the `accent` colour.
    pub fn rasterize(&self, label: &str, accent: u32) -> RgbaImage {
        rasterize(label, accent, self.config.raster_width, self.config.raster_height)
    }

    /// Bakes the texture for `spec`, registers its material, and attaches a
    /// banner node under `attach`. `index` selects the front/back offset and
    /// whether the banner starts highlighted.
    pub fn create(
        &self,
        graph: &mut SceneGraph,
        materials: &mut MaterialLibrary,
        textures: &mut TextureLibrary,
        attach: NodeId,
        index: usize,
        spec: &BannerSpec,
    ) -> Banner {
        let config = self.config;
        let name = format!("banner_{index}");
        let texture = textures.add(name.clone(), self.rasterize(spec.label, spec.colour));

        let accent = hex(spec.colour);
        let intensity = if index == 0 {
            config.highlight_intensity
        } else {
            config.emissive_intensity
        };
        let material = materials.add(
            Material::standard(name.clone(), [1.0; 3])
                .texture(texture)
                .emissive(accent, intensity)
                .roughness(0.3)
                .metalness(0.1)
                .opacity(config.opacity)
                .double_sided()
                .pulse(Pulse::Banner),
        );

        let z = config.depth_offsets[index % config.depth_offsets.len()];
        let local = Instance::at(0.0, config.hang_height, z).with_rotation(config.pitch, 0.0, 0.0);
        let node = graph.add_child(
            attach,
            SceneNode::mesh(name, self.plane.clone(), material)
                .with_transform(local)
                .casting_shadow(),
        );
        log::debug!("banner {index} ({}) attached under node {}", spec.label, attach.index());

        Banner {
            label: spec.label.to_string(),
            accent,
            node,
            material,
            texture,
        }
    }
}

/// Rasterises one banner at `width` x `height`. Canvas measurements scale with
/// the width so smaller rasters keep the same proportions.
pub fn rasterize(label: &str, accent: u32, width: u32, height: u32) -> RgbaImage {
    let (width, height) = (width.max(1), height.max(1));
    let k = width as f32 / REFERENCE_WIDTH;
    let accent = to_px(accent);

    let from = to_px(GRADIENT_FROM);
    let to = to_px(GRADIENT_TO);
    let span = (width - 1).max(1) as f32;
    let mut canvas = RgbImage::from_fn(width, height, |x, _| lerp_px(from, to, x as f32 / span));

    let border = border_mask(width, height, BORDER_INSET * k, BORDER_WIDTH * k);
    composite(&mut canvas, &imageops::blur(&border, shadow_sigma(BORDER_BLUR * k)), accent);
    composite(&mut canvas, &border, accent);

    let text = text_mask(label, width, height, FONT_PX * k);
    composite(&mut canvas, &imageops::blur(&text, shadow_sigma(TEXT_BLUR * k)), accent);
    composite(&mut canvas, &text, accent);
    composite(&mut canvas, &outline(&text), [255.0; 3]);

    RgbaImage::from_fn(width, height, |x, y| {
        let Px([r, g, b]) = *canvas.get_pixel(x, y);
        image::Rgba([r, g, b, 255])
    })
}

/// A canvas shadow blur of `b` pixels corresponds to a gaussian of sigma `b / 2`.
fn shadow_sigma(blur: f32) -> f32 {
    (blur / 2.0).max(0.5)
}

fn to_px(rgb: u32) -> [f32; 3] {
    [
        ((rgb >> 16) & 0xff) as f32,
        ((rgb >> 8) & 0xff) as f32,
        (rgb & 0xff) as f32,
    ]
}

fn lerp_px(a: [f32; 3], b: [f32; 3], t: f32) -> Px<u8> {
    Px(std::array::from_fn(|i| (a[i] + (b[i] - a[i]) * t).round() as u8))
}

/// Source-over blend of a solid colour through a coverage mask.
fn composite(canvas: &mut RgbImage, coverage: &GrayImage, colour: [f32; 3]) {
    for (dst, cov) in canvas.pixels_mut().zip(coverage.pixels()) {
        let alpha = cov.0[0] as f32 / 255.0;
        if alpha == 0.0 {
            continue;
        }
        for (c, &src) in dst.0.iter_mut().zip(colour.iter()) {
            *c = (*c as f32 + (src - *c as f32) * alpha).round() as u8;
        }
    }
}

/// A rectangle stroked with a line of width `line` centred on an outline inset by `inset`.
fn border_mask(width: u32, height: u32, inset: f32, line: f32) -> GrayImage {
    let half = line / 2.0;
    let (w, h) = (width as f32, height as f32);
    GrayImage::from_fn(width, height, |x, y| {
        let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
        let outer = px >= inset - half && px <= w - inset + half && py >= inset - half && py <= h - inset + half;
        let inner = px > inset + half && px < w - inset - half && py > inset + half && py < h - inset - half;
        Luma([if outer && !inner { 255 } else { 0 }])
    })
}

fn text_mask(label: &str, width: u32, height: u32, font_px: f32) -> GrayImage {
    let mut mask = GrayImage::new(width, height);
    let drawn = LabelFont::new().draw_centred(&mut mask, label, font_px, width as f32 * 0.9);
    if drawn < font_px {
        log::debug!("banner label {label:?} shrunk to {drawn:.1}px to fit");
    }
    mask
}

/// A two pixel line straddling the coverage edge of `mask`.
fn outline(mask: &GrayImage) -> GrayImage {
    let (w, h) = mask.dimensions();
    let covered = |x: i64, y: i64| {
        x >= 0 && y >= 0 && x < w as i64 && y < h as i64 && mask.get_pixel(x as u32, y as u32).0[0] > 0
    };
    GrayImage::from_fn(w, h, |x, y| {
        let (x, y) = (x as i64, y as i64);
        let here = covered(x, y);
        let edge = [(1, 0), (-1, 0), (0, 1), (0, -1)]
            .iter()
            .any(|(dx, dy)| covered(x + dx, y + dy) != here);
        Luma([if edge { 255 } else { 0 }])
    })
}
