use wgpu::util::DeviceExt;

use crate::{
    data_structures::texture::Texture,
    resources::to_linear,
    scene::{Fog, Light, LightKind, Scene},
};

/// Number of directional lights the scene shader evaluates.
pub const MAX_DIRECTIONAL: usize = 2;

/// Depth offset subtracted before the shadow comparison.
const SHADOW_BIAS: f32 = 0.002;

pub struct LightResources {
    pub uniform: LightUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
    pub shadow_map: Texture,
}

impl LightResources {
    pub fn new(device: &wgpu::Device, scene: &Scene) -> Self {
        let uniform = LightUniform::from_scene(&scene.lights, &scene.fog);
        let buffer = mk_buffer(device, uniform);
        let map_size = shadow_map_size(&scene.lights);
        let shadow_map = Texture::create_shadow_map(device, map_size);
        let bind_group_layout = mk_bind_group_layout(device);
        let bind_group = mk_bind_group(device, &bind_group_layout, &buffer, &shadow_map);
        log::info!("shadow map {map_size}x{map_size}");
        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
            shadow_map,
        }
    }

    pub fn update(&mut self, queue: &wgpu::Queue, scene: &Scene) {
        let uniform = LightUniform::from_scene(&scene.lights, &scene.fog);
        if bytemuck::bytes_of(&uniform) != bytemuck::bytes_of(&self.uniform) {
            self.uniform = uniform;
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
        }
    }
}

/// Lights and fog packed for the scene shader.
///
/// Ambient lights are summed. The first [`MAX_DIRECTIONAL`] directional
/// lights each take a slot; a slot whose `direction.w` is `1.0` is shadowed
/// through `view_proj` and the shadow map.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    view_proj: [[f32; 4]; 4],
    ambient: [f32; 4],
    directions: [[f32; 4]; MAX_DIRECTIONAL],
    colours: [[f32; 4]; MAX_DIRECTIONAL],
    // rgb, density
    fog: [f32; 4],
    // texel size, shadowed, bias, padding
    shadow: [f32; 4],
}

impl LightUniform {
    pub fn from_scene(lights: &[Light], fog: &Fog) -> Self {
        use cgmath::{InnerSpace, SquareMatrix};

        let mut uniform = Self {
            view_proj: cgmath::Matrix4::identity().into(),
            ambient: [0.0; 4],
            directions: [[0.0; 4]; MAX_DIRECTIONAL],
            colours: [[0.0; 4]; MAX_DIRECTIONAL],
            fog: [0.0; 4],
            shadow: [0.0; 4],
        };
        let mut slot = 0;
        for light in lights {
            let [r, g, b] = to_linear(light.colour);
            let radiance = [r * light.intensity, g * light.intensity, b * light.intensity];
            match light.kind {
                LightKind::Ambient => {
                    for (acc, c) in uniform.ambient.iter_mut().zip(radiance) {
                        *acc += c;
                    }
                }
                LightKind::Directional { position, shadow } => {
                    if slot == MAX_DIRECTIONAL {
                        log::warn!("light {} ignored, only {MAX_DIRECTIONAL} directional lights are shaded", light.name);
                        continue;
                    }
                    let dir = if position.magnitude2() > 0.0 {
                        position.normalize()
                    } else {
                        cgmath::Vector3::unit_y()
                    };
                    let shadowed = match (shadow, light.shadow_view_proj()) {
                        (Some(frustum), Some(view_proj)) if uniform.shadow[1] == 0.0 => {
                            uniform.view_proj = view_proj.into();
                            uniform.shadow = [1.0 / frustum.map_size.max(1) as f32, 1.0, SHADOW_BIAS, 0.0];
                            1.0
                        }
                        _ => 0.0,
                    };
                    uniform.directions[slot] = [dir.x, dir.y, dir.z, shadowed];
                    uniform.colours[slot] = [radiance[0], radiance[1], radiance[2], 0.0];
                    slot += 1;
                }
            }
        }
        let [r, g, b] = to_linear(fog.colour);
        uniform.fog = [r, g, b, fog.density];
        uniform
    }

    pub fn is_shadowed(&self) -> bool {
        self.shadow[1] > 0.0
    }

    pub fn ambient(&self) -> [f32; 3] {
        [self.ambient[0], self.ambient[1], self.ambient[2]]
    }

    pub fn fog_density(&self) -> f32 {
        self.fog[3]
    }
}

fn shadow_map_size(lights: &[Light]) -> u32 {
    lights
        .iter()
        .find_map(|l| match l.kind {
            LightKind::Directional {
                shadow: Some(frustum),
                ..
            } => Some(frustum.map_size),
            _ => None,
        })
        // an unshadowed scene still binds a (never written) map
        .unwrap_or(1)
}

pub fn mk_buffer(device: &wgpu::Device, light_uniform: LightUniform) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Light Buffer"),
        contents: bytemuck::cast_slice(&[light_uniform]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
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
                    sample_type: wgpu::TextureSampleType::Depth,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                count: None,
            },
        ],
        label: Some("light_bind_group_layout"),
    })
}

pub fn mk_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
    shadow_map: &Texture,
) -> wgpu::BindGroup {
    let sampler = match &shadow_map.sampler {
        Some(sampler) => sampler.clone(),
        None => device.create_sampler(&wgpu::SamplerDescriptor {
            compare: Some(wgpu::CompareFunction::LessEqual),
            ..Default::default()
        }),
    };
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&shadow_map.view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(&sampler),
            },
        ],
        label: Some("light_bind_group"),
    })
}
