use crate::{
    data_structures::{model::Vertex, particles::Particle, texture::Texture},
    pipelines::basic::mk_render_pipeline,
};

/// Snowflakes as camera-facing quads.
///
/// There is no per-vertex buffer: the shader derives the six corners of each
/// quad from the vertex index and reads centre and size from the particle
/// instance buffer, so a field is drawn with `draw(0..6, 0..count)`.
pub fn mk_particle_pipeline(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
    bind_group_layouts: &[&wgpu::BindGroupLayout],
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Particle Pipeline Layout"),
        bind_group_layouts: &bind_group_layouts.iter().copied().map(Some).collect::<Vec<_>>(),
        immediate_size: 0,
    });
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Particle Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("particles.wgsl").into()),
    };
    mk_render_pipeline(
        device,
        "Particle Pipeline",
        &layout,
        color_format,
        Some(wgpu::BlendState::ALPHA_BLENDING),
        Some(Texture::DEPTH_FORMAT),
        false,
        None,
        &[Particle::desc()],
        shader,
    )
}
