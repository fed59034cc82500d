//! The wgpu renderer.
//!
//! [`Context`] owns the surface, device and queue together with every GPU
//! resource a frame needs. Each [`Renderer::render`] call draws two passes:
//! the shadow-casting light's depth map, then the colour pass with opaque
//! batches, transparent batches back to front, and the snow last.

use std::{iter, sync::Arc};

use anyhow::Context as _;
use cgmath::Point3;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::{
    camera::CameraUniform,
    data_structures::{instance::InstanceRaw, texture::Texture},
    pipelines::{Pipelines, light::LightResources},
    render::{Batch, DrawList, Renderer, SurfaceSize},
    resources::{GpuResources, to_linear},
    scene::{LightKind, Scene},
};

/// A camera uniform with its buffer and bind group.
pub struct CameraResources {
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl CameraResources {
    fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, label: &str) -> Self {
        let uniform = CameraUniform::new();
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Buffer")),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some(&format!("{label} Bind Group")),
        });
        Self {
            uniform,
            buffer,
            bind_group,
        }
    }

    fn write(&mut self, queue: &wgpu::Queue, uniform: CameraUniform) {
        self.uniform = uniform;
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}

pub fn camera_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("camera_bind_group_layout"),
    })
}

/// A vertex buffer that grows to the next power of two when it runs out of room.
struct GrowableBuffer {
    buffer: wgpu::Buffer,
    capacity: u64,
    label: &'static str,
}

impl GrowableBuffer {
    fn new(device: &wgpu::Device, capacity: u64, label: &'static str) -> Self {
        let capacity = capacity.max(256);
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: capacity,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self {
            buffer,
            capacity,
            label,
        }
    }

    fn write(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, bytes: &[u8]) {
        let len = bytes.len() as u64;
        if len > self.capacity {
            log::debug!("growing {} to {} bytes", self.label, len.next_power_of_two());
            *self = Self::new(device, len.next_power_of_two(), self.label);
        }
        if len > 0 {
            queue.write_buffer(&self.buffer, 0, bytes);
        }
    }
}

pub struct Context {
    pub(crate) window: Arc<Window>,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    depth_texture: Texture,
    camera: CameraResources,
    shadow_camera: CameraResources,
    light: LightResources,
    resources: GpuResources,
    pipelines: Pipelines,
    instances: GrowableBuffer,
    particles: GrowableBuffer,
    particle_version: u64,
    is_surface_configured: bool,
}

impl Context {
    pub async fn new(window: Arc<Window>, size: SurfaceSize, scene: &Scene) -> anyhow::Result<Self> {
        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..wgpu::InstanceDescriptor::new_without_display_handle()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("creating the render surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no GPU adapter can present to this surface")?;
        log::info!("device and queue");
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                // WebGL doesn't support all of wgpu's features
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
            })
            .await
            .context("requesting a device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        // Colours are written in linear space and rely on an sRGB surface for the conversion.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("the surface reports no texture formats")?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps
                .present_modes
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let camera_layout = camera_layout(&device);
        let camera = CameraResources::new(&device, &camera_layout, "Camera");
        let shadow_camera = CameraResources::new(&device, &camera_layout, "Shadow Camera");
        let light = LightResources::new(&device, scene);
        let resources = GpuResources::new(&device, &queue);
        let pipelines = Pipelines::new(
            &device,
            config.format,
            &camera_layout,
            &light.bind_group_layout,
            &resources.material_layout,
        );

        let depth_texture =
            Texture::create_depth_texture(&device, [config.width, config.height], "depth_texture");
        let instances = GrowableBuffer::new(
            &device,
            (scene.graph.len() * std::mem::size_of::<InstanceRaw>()) as u64,
            "Instance Buffer",
        );
        let particles = GrowableBuffer::new(
            &device,
            scene.particles.as_bytes().len() as u64,
            "Particle Buffer",
        );

        let mut ctx = Self {
            window,
            surface,
            device,
            queue,
            config,
            depth_texture,
            camera,
            shadow_camera,
            light,
            resources,
            pipelines,
            instances,
            particles,
            particle_version: 0,
            is_surface_configured: false,
        };
        if !size.is_empty() {
            ctx.resize(size);
        }
        Ok(ctx)
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    fn configure(&mut self) {
        self.surface.configure(&self.device, &self.config);
        self.depth_texture = Texture::create_depth_texture(
            &self.device,
            [self.config.width, self.config.height],
            "depth_texture",
        );
        self.is_surface_configured = true;
    }

    fn upload(&mut self, scene: &Scene, draws: &DrawList) -> anyhow::Result<()> {
        self.resources.prepare(&self.device, &self.queue, scene)?;
        self.light.update(&self.queue, scene);

        let mut uniform = self.camera.uniform;
        uniform.update_view_proj(&scene.camera, &scene.projection);
        self.camera.write(&self.queue, uniform);

        if let Some((view_proj, light)) = scene
            .shadow_light()
            .and_then(|l| l.shadow_view_proj().map(|vp| (vp, l)))
        {
            let position = match light.kind {
                LightKind::Directional { position, .. } => Point3::new(position.x, position.y, position.z),
                LightKind::Ambient => Point3::new(0.0, 0.0, 0.0),
            };
            self.shadow_camera
                .write(&self.queue, CameraUniform::from_matrix(view_proj, position));
        }

        let instances = draws.instances();
        self.instances
            .write(&self.device, &self.queue, bytemuck::cast_slice(&instances));

        if scene.particles.version() != self.particle_version {
            self.particles
                .write(&self.device, &self.queue, scene.particles.as_bytes());
            self.particle_version = scene.particles.version();
        }
        Ok(())
    }

    fn draw_batches<'a>(
        &'a self,
        pass: &mut wgpu::RenderPass<'_>,
        batches: impl Iterator<Item = &'a Batch>,
        shadow_pass: bool,
    ) {
        // (transparent, double sided) of the bound pipeline
        let mut current: Option<(bool, bool)> = None;
        for batch in batches {
            let Some(mesh) = self.resources.mesh(&batch.geometry) else {
                log::warn!("geometry {} was never uploaded", batch.geometry.name);
                continue;
            };
            if !shadow_pass {
                let Some(material) = self.resources.material(batch.material) else {
                    log::warn!("material {} was never uploaded", batch.material.0);
                    continue;
                };
                let key = (material.transparent, material.double_sided);
                if current != Some(key) {
                    pass.set_pipeline(self.pipelines.mesh(key.0, key.1));
                    current = Some(key);
                }
                pass.set_bind_group(2, &material.bind_group, &[]);
            }
            pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            pass.set_vertex_buffer(1, self.instances.buffer.slice(..));
            pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..mesh.num_elements, 0, batch.instances.clone());
        }
    }
}

impl Renderer for Context {
    fn render(&mut self, scene: &Scene) -> anyhow::Result<()> {
        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        let draws = DrawList::collect(scene);
        self.upload(scene, &draws)?;
        let opaque = draws.opaque_batches();
        let transparent = draws.transparent_batches();

        let output = match self.surface.get_current_texture() {
            wgpu::CurrentSurfaceTexture::Success(output)
            | wgpu::CurrentSurfaceTexture::Suboptimal(output) => output,
            // Reconfigure the surface if it's lost or outdated
            wgpu::CurrentSurfaceTexture::Lost | wgpu::CurrentSurfaceTexture::Outdated => {
                log::warn!("surface lost, reconfiguring");
                self.configure();
                return Ok(());
            }
            wgpu::CurrentSurfaceTexture::Timeout => {
                log::warn!("timed out acquiring the next frame");
                return Ok(());
            }
            e => return Err(anyhow::anyhow!("{e:?}")).context("acquiring the next frame"),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        if self.light.uniform.is_shadowed() {
            let mut shadow_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Shadow Pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.light.shadow_map.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
                multiview_mask: None,
            });
            shadow_pass.set_pipeline(&self.pipelines.shadow);
            shadow_pass.set_bind_group(0, &self.shadow_camera.bind_group, &[]);
            self.draw_batches(
                &mut shadow_pass,
                opaque.iter().chain(transparent.iter()).filter(|b| b.cast_shadow),
                true,
            );
        }

        {
            let [r, g, b] = to_linear(scene.clear_colour);
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
                multiview_mask: None,
            });

            render_pass.set_bind_group(0, &self.camera.bind_group, &[]);
            render_pass.set_bind_group(1, &self.light.bind_group, &[]);
            self.draw_batches(&mut render_pass, opaque.iter(), false);
            self.draw_batches(&mut render_pass, transparent.iter(), false);

            let count = scene.particles.len() as u32;
            for (_, material) in &draws.points {
                let Some(material) = self.resources.material(*material) else {
                    continue;
                };
                if count == 0 {
                    continue;
                }
                render_pass.set_pipeline(&self.pipelines.particles);
                render_pass.set_bind_group(2, &material.bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.particles.buffer.slice(..));
                render_pass.draw(0..6, 0..count);
            }
        }

        self.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn resize(&mut self, size: SurfaceSize) {
        if size.is_empty() {
            return;
        }
        self.config.width = size.width;
        self.config.height = size.height;
        self.configure();
        log::info!("surface resized to {}x{}", size.width, size.height);
    }

    fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.config.width, self.config.height)
    }
}
