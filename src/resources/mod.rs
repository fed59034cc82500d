//! Procedural resources and their GPU counterparts.
//!
//! - `mesh` builds the primitive geometries every scene part is made of
//! - `label` shapes and rasterises banner label text
//! - `banner` rasterises banner images and hangs the banners from the creature
//!
//! [`GpuResources`] uploads what the scene holds on the CPU side. Geometry and
//! banner images are uploaded once and kept for the lifetime of the renderer;
//! material uniforms are rewritten only when a material changed since the
//! previous frame.

use std::{collections::HashMap, sync::Arc};

use anyhow::{Context as _, Result};
use wgpu::util::DeviceExt;

use crate::{
    config::Rgb,
    data_structures::{
        model::{Geometry, Material, MaterialId, Shading, TextureId},
        scene_graph::Renderable,
        texture::{self, Texture},
    },
    scene::Scene,
};

pub mod banner;
pub mod label;
pub mod mesh;

/// Converts an sRGB colour to the linear space the shaders light in.
pub fn to_linear(colour: Rgb) -> Rgb {
    colour.map(|c| {
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    })
}

pub struct GpuMesh {
    pub name: String,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_elements: u32,
    // Keeps the geometry alive so its address cannot be reused as a cache key.
    _geometry: Arc<Geometry>,
}

impl GpuMesh {
    pub fn new(device: &wgpu::Device, geometry: &Arc<Geometry>) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Vertex Buffer", geometry.name)),
            contents: bytemuck::cast_slice(&geometry.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Index Buffer", geometry.name)),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            name: geometry.name.clone(),
            vertex_buffer,
            index_buffer,
            num_elements: geometry.indices.len() as u32,
            _geometry: geometry.clone(),
        }
    }
}

/// Material parameters as the shaders read them.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    // rgb, opacity
    colour: [f32; 4],
    // rgb pre-multiplied by intensity
    emissive: [f32; 4],
    // roughness, metalness, lit, padding
    params: [f32; 4],
}

impl MaterialUniform {
    pub fn from_material(material: &Material) -> Self {
        let [r, g, b] = to_linear(material.colour);
        let emissive = to_linear(material.emissive).map(|c| c * material.emissive_intensity);
        let lit = match material.shading {
            Shading::Lit => 1.0,
            Shading::Unlit => 0.0,
        };
        Self {
            colour: [r, g, b, material.opacity.clamp(0.0, 1.0)],
            emissive: [emissive[0], emissive[1], emissive[2], 0.0],
            params: [material.roughness, material.metalness, lit, 0.0],
        }
    }

    pub fn emissive(&self) -> [f32; 3] {
        [self.emissive[0], self.emissive[1], self.emissive[2]]
    }

    pub fn opacity(&self) -> f32 {
        self.colour[3]
    }
}

pub struct GpuMaterial {
    pub uniform: MaterialUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub transparent: bool,
    pub double_sided: bool,
}

pub fn material_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
        label: Some("material_bind_group_layout"),
    })
}

/// GPU-side mirror of a scene's geometry, textures and materials.
pub struct GpuResources {
    pub material_layout: wgpu::BindGroupLayout,
    meshes: HashMap<usize, GpuMesh>,
    textures: HashMap<TextureId, Texture>,
    materials: Vec<GpuMaterial>,
    white: Texture,
    sampler: wgpu::Sampler,
}

impl GpuResources {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        Self {
            material_layout: material_layout(device),
            meshes: HashMap::new(),
            textures: HashMap::new(),
            materials: Vec::new(),
            white: Texture::create_white(device, queue),
            sampler: texture::create_default_sampler(device),
        }
    }

    /// Brings the GPU copies up to date with `scene`.
    ///
    /// Banner images are uploaded the first time they are seen and never
    /// again. Material bind groups are created for new materials; existing
    /// ones only get their uniform rewritten when it changed.
    pub fn prepare(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, scene: &Scene) -> Result<()> {
        for (id, img) in scene.textures.iter() {
            if self.textures.contains_key(&id) {
                continue;
            }
            let name = scene.textures.name(id).unwrap_or("texture");
            let texture = Texture::from_image(device, queue, img, name)
                .with_context(|| format!("uploading texture {name}"))?;
            log::debug!("uploaded {name} ({}x{})", img.width(), img.height());
            self.textures.insert(id, texture);
        }

        for (id, material) in scene.materials.iter() {
            let uniform = MaterialUniform::from_material(material);
            // ids are dense and iterated in order, so a new id is always the next slot
            if id.0 < self.materials.len() {
                let gpu = &mut self.materials[id.0];
                if gpu.uniform != uniform {
                    gpu.uniform = uniform;
                    queue.write_buffer(&gpu.buffer, 0, bytemuck::cast_slice(&[uniform]));
                }
            } else {
                let gpu = self.create_material(device, material, uniform)?;
                self.materials.push(gpu);
            }
        }

        for (_, node) in scene.graph.iter() {
            if let Some(Renderable::Mesh { geometry, .. }) = &node.renderable {
                self.meshes
                    .entry(Arc::as_ptr(geometry) as usize)
                    .or_insert_with(|| GpuMesh::new(device, geometry));
            }
        }
        Ok(())
    }

    fn create_material(
        &self,
        device: &wgpu::Device,
        material: &Material,
        uniform: MaterialUniform,
    ) -> Result<GpuMaterial> {
        let texture = match material.texture {
            Some(id) => self
                .textures
                .get(&id)
                .with_context(|| format!("material {} uses missing texture {}", material.name, id.0))?,
            None => &self.white,
        };
        let sampler = texture.sampler.as_ref().unwrap_or(&self.sampler);
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Material Buffer", material.name)),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &self.material_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
            label: Some(&format!("{} Material Bind Group", material.name)),
        });
        Ok(GpuMaterial {
            uniform,
            buffer,
            bind_group,
            transparent: material.is_transparent(),
            double_sided: material.double_sided,
        })
    }

    pub fn mesh(&self, geometry: &Arc<Geometry>) -> Option<&GpuMesh> {
        self.meshes.get(&(Arc::as_ptr(geometry) as usize))
    }

    pub fn material(&self, id: MaterialId) -> Option<&GpuMaterial> {
        self.materials.get(id.0)
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }
}
