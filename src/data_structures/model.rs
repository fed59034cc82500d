//! Geometry and material definitions shared by scene nodes.
//!
//! Geometries are immutable once built and handed out as `Arc<Geometry>`, so a
//! single claw or shoulder mesh can back many nodes. Materials live in a
//! [`MaterialLibrary`] and are addressed by [`MaterialId`]: two eyes refer to the
//! same id, and the animation scheduler mutates the library entry in place.

use std::sync::Arc;

use crate::config::Rgb;

pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
}

impl Vertex for ModelVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<ModelVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 5]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// A triangle mesh on the CPU side.
#[derive(Clone, Debug, PartialEq)]
pub struct Geometry {
    pub name: String,
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u32>,
}

impl Geometry {
    pub fn new(name: impl Into<String>, vertices: Vec<ModelVertex>, indices: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            vertices,
            indices,
        }
    }

    /// Freezes the geometry so it can be shared read-only between nodes.
    pub fn shared(self) -> Arc<Geometry> {
        Arc::new(self)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Index into the scene's baked texture list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub usize);

/// Index into a [`MaterialLibrary`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub usize);

/// Which materials the animation scheduler is allowed to touch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pulse {
    /// Shared by both creature eyes.
    Eye,
    Moon,
    Banner,
}

/// Lit materials respond to the scene lights, unlit ones output their colour as is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shading {
    Lit,
    Unlit,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: String,
    pub colour: Rgb,
    pub emissive: Rgb,
    pub emissive_intensity: f32,
    pub roughness: f32,
    pub metalness: f32,
    pub opacity: f32,
    pub double_sided: bool,
    pub shading: Shading,
    pub texture: Option<TextureId>,
    pub pulse: Option<Pulse>,
}

impl Material {
    /// An opaque lit surface without emission.
    pub fn standard(name: impl Into<String>, colour: Rgb) -> Self {
        Self {
            name: name.into(),
            colour,
            emissive: [0.0; 3],
            emissive_intensity: 1.0,
            roughness: 1.0,
            metalness: 0.0,
            opacity: 1.0,
            double_sided: false,
            shading: Shading::Lit,
            texture: None,
            pulse: None,
        }
    }

    /// An unlit surface, used for glow overlays.
    pub fn basic(name: impl Into<String>, colour: Rgb) -> Self {
        Self {
            shading: Shading::Unlit,
            ..Self::standard(name, colour)
        }
    }

    pub fn roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness;
        self
    }

    pub fn metalness(mut self, metalness: f32) -> Self {
        self.metalness = metalness;
        self
    }

    pub fn emissive(mut self, colour: Rgb, intensity: f32) -> Self {
        self.emissive = colour;
        self.emissive_intensity = intensity;
        self
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn double_sided(mut self) -> Self {
        self.double_sided = true;
        self
    }

    pub fn texture(mut self, texture: TextureId) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn pulse(mut self, pulse: Pulse) -> Self {
        self.pulse = Some(pulse);
        self
    }

    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }
}

#[derive(Clone, Debug, Default)]
pub struct MaterialLibrary {
    materials: Vec<Material>,
}

impl MaterialLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() - 1)
    }

    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0)
    }

    pub fn get_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        self.materials.get_mut(id.0)
    }

    /// First material carrying the given pulse tag.
    pub fn find_pulse(&self, pulse: Pulse) -> Option<MaterialId> {
        self.materials
            .iter()
            .position(|m| m.pulse == Some(pulse))
            .map(MaterialId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (MaterialId, &Material)> {
        self.materials
            .iter()
            .enumerate()
            .map(|(i, m)| (MaterialId(i), m))
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

/// Raster images baked at construction time, uploaded to the GPU once each.
#[derive(Clone, Debug, Default)]
pub struct TextureLibrary {
    images: Vec<(String, image::RgbaImage)>,
}

impl TextureLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: impl Into<String>, image: image::RgbaImage) -> TextureId {
        self.images.push((name.into(), image));
        TextureId(self.images.len() - 1)
    }

    pub fn get(&self, id: TextureId) -> Option<&image::RgbaImage> {
        self.images.get(id.0).map(|(_, img)| img)
    }

    pub fn name(&self, id: TextureId) -> Option<&str> {
        self.images.get(id.0).map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (TextureId, &image::RgbaImage)> {
        self.images
            .iter()
            .enumerate()
            .map(|(i, (_, img))| (TextureId(i), img))
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Left/right selector for mirrored body parts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    /// `-1.0` for the left side, `1.0` for the right.
    pub fn sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}
