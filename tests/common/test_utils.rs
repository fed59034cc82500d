#![allow(dead_code)]

use yeti_scene::{
    AnimationScheduler, Renderer, Scene, SceneAssembler, SceneConfig, SceneHandles, SurfaceSize,
};

/// Stands in for the GPU: records what it was asked to draw.
pub(crate) struct RecordingRenderer {
    size: SurfaceSize,
    renders: u32,
    resizes: Vec<SurfaceSize>,
    particle_versions: Vec<u64>,
    texture_counts: Vec<usize>,
    node_counts: Vec<usize>,
}

impl RecordingRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: SurfaceSize::new(width, height),
            renders: 0,
            resizes: Vec::new(),
            particle_versions: Vec::new(),
            texture_counts: Vec::new(),
            node_counts: Vec::new(),
        }
    }

    pub fn renders(&self) -> u32 {
        self.renders
    }

    pub fn resizes(&self) -> &[SurfaceSize] {
        &self.resizes
    }

    pub fn particle_versions(&self) -> &[u64] {
        &self.particle_versions
    }

    pub fn texture_counts(&self) -> &[usize] {
        &self.texture_counts
    }

    pub fn node_counts(&self) -> &[usize] {
        &self.node_counts
    }
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, scene: &Scene) -> anyhow::Result<()> {
        self.renders += 1;
        self.particle_versions.push(scene.particles.version());
        self.texture_counts.push(scene.textures.len());
        self.node_counts.push(scene.graph.len());
        Ok(())
    }

    fn resize(&mut self, size: SurfaceSize) {
        self.size = size;
        self.resizes.push(size);
    }

    fn size(&self) -> SurfaceSize {
        self.size
    }
}

/// Default scene with small banner rasters, so assembling stays fast.
pub(crate) fn test_config() -> SceneConfig {
    let mut config = SceneConfig::with_seed(7);
    config.banners.raster_width = 256;
    config.banners.raster_height = 128;
    config
}

pub(crate) fn assemble() -> (Scene, SceneHandles) {
    SceneAssembler::new(&test_config()).assemble(1280, 720)
}

pub(crate) fn scheduler() -> AnimationScheduler<RecordingRenderer> {
    let config = test_config();
    let (scene, handles) = SceneAssembler::new(&config).assemble(1280, 720);
    AnimationScheduler::new(scene, handles, RecordingRenderer::new(1280, 720), &config)
}

pub(crate) fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-4,
        "expected {expected}, got {actual}"
    );
}
