//! Render pipelines and their shaders.
//!
//! Every colour pipeline uses the same three bind groups: camera (0), lights
//! with the shadow map (1) and material (2). The shadow pipeline only binds a
//! camera-shaped uniform holding the light's view-projection.

pub mod basic;
pub mod light;
pub mod particles;
pub mod shadow;
pub mod transparent;

/// All pipelines a frame needs, built once per surface format.
pub struct Pipelines {
    pub basic: wgpu::RenderPipeline,
    pub basic_double_sided: wgpu::RenderPipeline,
    pub transparent: wgpu::RenderPipeline,
    pub transparent_double_sided: wgpu::RenderPipeline,
    pub particles: wgpu::RenderPipeline,
    pub shadow: wgpu::RenderPipeline,
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        camera_layout: &wgpu::BindGroupLayout,
        light_layout: &wgpu::BindGroupLayout,
        material_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let layouts = [camera_layout, light_layout, material_layout];
        let back = Some(wgpu::Face::Back);
        Self {
            basic: basic::mk_basic_pipeline(device, color_format, &layouts, back),
            basic_double_sided: basic::mk_basic_pipeline(device, color_format, &layouts, None),
            transparent: transparent::mk_transparent_pipeline(device, color_format, &layouts, back),
            transparent_double_sided: transparent::mk_transparent_pipeline(
                device,
                color_format,
                &layouts,
                None,
            ),
            particles: particles::mk_particle_pipeline(device, color_format, &layouts),
            shadow: shadow::mk_shadow_pipeline(device, camera_layout),
        }
    }

    pub fn mesh(&self, transparent: bool, double_sided: bool) -> &wgpu::RenderPipeline {
        match (transparent, double_sided) {
            (false, false) => &self.basic,
            (false, true) => &self.basic_double_sided,
            (true, false) => &self.transparent,
            (true, true) => &self.transparent_double_sided,
        }
    }
}
