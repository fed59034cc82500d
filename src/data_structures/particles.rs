//! The snowstorm: a fixed-size particle buffer advanced in place every frame.
//!
//! A field never grows or shrinks after construction. Particles that fall
//! below the ground threshold are recycled to a fresh position high above the
//! scene, so advancing the field performs no allocation.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    config::{FallMode, ParticleConfig},
    data_structures::{model::Vertex, uniform},
};

/// One snowflake, laid out for direct upload as a per-instance vertex.
///
/// `fall_speed` and `size` are fixed at spawn; only `position` changes.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Particle {
    pub position: [f32; 3],
    pub size: f32,
    pub fall_speed: f32,
}

impl Vertex for Particle {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Particle>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32,
                },
            ],
        }
    }
}

pub struct ParticleField {
    particles: Vec<Particle>,
    config: ParticleConfig,
    rng: StdRng,
    /// Bumped on every mutation; renderers re-upload when it differs from what they hold.
    version: u64,
    respawned: u64,
}

impl ParticleField {
    /// Spawns `config.count` particles uniformly in the spawn volume.
    ///
    /// The field keeps its own generator, seeded from `rng`, for respawns.
    pub fn new(config: &ParticleConfig, rng: &mut impl Rng) -> Self {
        let h = config.half_extent;
        let particles = (0..config.count)
            .map(|_| Particle {
                position: [
                    (rng.r#gen::<f32>() - 0.5) * 2.0 * h,
                    uniform(rng, config.spawn_min_height, config.spawn_max_height),
                    (rng.r#gen::<f32>() - 0.5) * 2.0 * h,
                ],
                fall_speed: uniform(rng, config.min_speed, config.max_speed),
                size: uniform(rng, config.min_size, config.max_size),
            })
            .collect::<Vec<_>>();
        log::debug!("particles: spawned {}", particles.len());
        Self {
            particles,
            config: config.clone(),
            rng: StdRng::seed_from_u64(rng.r#gen()),
            version: 1,
            respawned: 0,
        }
    }

    /// Moves every particle one step: down by its fall speed, sideways by the
    /// wind at `elapsed`, and back to the top if it passed the ground.
    pub fn advance(&mut self, delta: f32, elapsed: f32) {
        let Self {
            particles,
            config,
            rng,
            ..
        } = self;
        let step = match config.fall_mode {
            FallMode::PerTick => 1.0,
            FallMode::Normalized { reference_hz } => delta.max(0.0) * reference_hz,
        };
        let h = config.half_extent;
        let mut respawned = 0;
        for (i, p) in particles.iter_mut().enumerate() {
            let phase = i as f32;
            p.position[1] -= p.fall_speed * step;
            p.position[0] += (elapsed * config.wind_frequency_x + phase).sin() * config.drift_x;
            p.position[2] += (elapsed * config.wind_frequency_z + phase).cos() * config.drift_z;

            if p.position[1] < config.ground_threshold {
                p.position = [
                    (rng.r#gen::<f32>() - 0.5) * 2.0 * h,
                    uniform(rng, config.respawn_min_height, config.respawn_max_height),
                    (rng.r#gen::<f32>() - 0.5) * 2.0 * h,
                ];
                respawned += 1;
            }
        }
        self.respawned += respawned;
        self.version += 1;
    }

    /// Places one particle, for tests that need a known starting point.
    /// Speed and size are untouched.
    #[doc(hidden)]
    pub fn set_position(&mut self, index: usize, position: [f32; 3]) {
        match self.particles.get_mut(index) {
            Some(p) => {
                p.position = position;
                self.version += 1;
            }
            None => log::warn!(
                "particles: index {index} out of range ({} particles)",
                self.particles.len()
            ),
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn get(&self, index: usize) -> Option<&Particle> {
        self.particles.get(index)
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Total number of recycles since construction.
    pub fn respawned(&self) -> u64 {
        self.respawned
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.particles)
    }
}
