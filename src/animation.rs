//! The per-frame update.
//!
//! [`AnimationScheduler`] owns the assembled scene and a [`Renderer`]. Every
//! tick it mutates the scene in a fixed order and then renders exactly once:
//!
//! 1. breathing (creature root height)
//! 2. head sway (creature root yaw)
//! 3. eye pulse (the shared eye material)
//! 4. limb sway (root children far from the centre plane, i.e. the arm groups)
//! 5. banner motion
//! 6. particle advancement
//! 7. camera orbit
//! 8. moon pulse
//!
//! Every animated quantity is a pure function of elapsed time, so ticks never
//! accumulate drift. The scheduler never adds or removes nodes.

use instant::Instant;

use crate::{
    camera::Camera,
    config::{AnimationConfig, CreatureConfig, OrbitConfig, SceneConfig},
    data_structures::{
        model::{MaterialId, MaterialLibrary, Pulse},
        scene_graph::{NodeId, SceneGraph},
    },
    render::{Renderer, SurfaceSize},
    scene::{Scene, SceneHandles},
};

/// Produces `(delta, elapsed)` pairs in seconds from a monotonic clock.
///
/// Elapsed time is the running sum of deltas, so it only advances when the
/// clock is ticked.
#[derive(Debug)]
pub struct FrameClock {
    last: Instant,
    elapsed: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            elapsed: 0.0,
        }
    }

    pub fn tick(&mut self) -> (f32, f32) {
        let now = Instant::now();
        let delta = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        self.elapsed += delta;
        (delta, self.elapsed)
    }

    /// Restarts the delta measurement without touching elapsed time.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only views for external inspection. Nothing in the scheduler depends on them.
#[derive(Clone, Copy)]
pub struct DebugHandles<'a> {
    pub graph: &'a SceneGraph,
    pub scene_root: NodeId,
    pub creature_root: NodeId,
    pub camera: &'a Camera,
}

pub struct AnimationScheduler<R: Renderer> {
    scene: Scene,
    handles: SceneHandles,
    renderer: R,
    animation: AnimationConfig,
    creature: CreatureConfig,
    orbit: OrbitConfig,
    banner_height: f32,
    eye_material: Option<MaterialId>,
    running: bool,
    ticks: u64,
}

impl<R: Renderer> AnimationScheduler<R> {
    pub fn new(scene: Scene, handles: SceneHandles, renderer: R, config: &SceneConfig) -> Self {
        let eye_material = scene.materials.find_pulse(Pulse::Eye);
        if eye_material.is_none() {
            log::warn!("no material is tagged as an eye; the eye pulse is disabled");
        }
        Self {
            scene,
            handles,
            renderer,
            animation: config.animation.clone(),
            creature: config.creature.clone(),
            orbit: config.orbit.clone(),
            banner_height: config.banners.hang_height,
            eye_material,
            running: false,
            ticks: 0,
        }
    }

    /// Begins the loop. Ticks before this call are ignored.
    pub fn start(&mut self) {
        if self.running {
            log::warn!("animation scheduler started twice");
            return;
        }
        log::info!("animation scheduler started");
        self.running = true;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Runs one full update-and-render cycle at `elapsed` seconds, `delta`
    /// seconds after the previous tick.
    pub fn tick(&mut self, delta: f32, elapsed: f32) {
        if !self.running {
            log::warn!("tick at {elapsed:.3}s before the scheduler was started");
            return;
        }
        let t = elapsed;
        let a = &self.animation;
        let c = &self.creature;
        let root = self.handles.creature.root;
        let graph = &mut self.scene.graph;

        let node = &mut graph[root];
        node.local.position.y = c.position[1] + (t * a.breath_frequency).sin() * a.breath_amplitude;
        node.local.rotation.y = c.base_yaw + (t * a.sway_frequency).sin() * a.sway_amplitude;

        if let Some(eye) = self.eye_material {
            let pulse = (t * a.eye_frequency).sin() * 0.5 + 0.5;
            set_intensity(&mut self.scene.materials, eye, Pulse::Eye, a.eye_base + a.eye_range * pulse);
        }

        let sway = (t * a.arm_frequency).sin() * a.arm_amplitude;
        for i in 0..graph.children(root).len() {
            let child = graph.children(root)[i];
            let node = &mut graph[child];
            if node.local.position.x.abs() > c.limb_sway_threshold {
                node.local.rotation.x = c.arm_pitch + sway;
            }
        }

        for (i, banner) in self.handles.banners.iter().enumerate() {
            let phase = i as f32;
            let local = &mut graph[banner.node].local;
            local.rotation.y = (t * a.banner_yaw_frequency + phase).sin() * a.banner_yaw_amplitude;
            local.rotation.z = (t * a.banner_roll_frequency + phase).sin() * a.banner_roll_amplitude;
            local.position.y = self.banner_height
                + (t * a.banner_float_frequency + phase).sin() * a.banner_float_amplitude;
        }

        self.scene.particles.advance(delta, t);

        let o = &self.orbit;
        let theta = t * o.rate;
        self.scene.camera.position = (
            theta.sin() * o.radius_x,
            o.height,
            o.center_z + theta.cos() * o.radius_z,
        )
            .into();
        let [lx, ly, lz] = o.look_at;
        self.scene.camera.look_at((lx, ly, lz));

        let moon = a.moon_base + (t * a.moon_frequency).sin() * a.moon_amplitude;
        set_intensity(&mut self.scene.materials, self.handles.moon_material, Pulse::Moon, moon);

        self.scene.graph.update_world_transforms();
        if let Err(e) = self.renderer.render(&self.scene) {
            log::error!("Unable to render {e:#}");
        }
        self.ticks += 1;
    }

    /// Applies a viewport change: new aspect ratio and surface size, nothing else.
    pub fn resize(&mut self, size: SurfaceSize) {
        if size.is_empty() {
            log::warn!("ignoring resize to {}x{}", size.width, size.height);
            return;
        }
        self.scene.projection.resize(size.width, size.height);
        self.renderer.resize(size);
    }

    pub fn debug(&self) -> DebugHandles<'_> {
        DebugHandles {
            graph: &self.scene.graph,
            scene_root: self.scene.graph.root(),
            creature_root: self.handles.creature.root,
            camera: &self.scene.camera,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn handles(&self) -> &SceneHandles {
        &self.handles
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Completed update-and-render cycles.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

/// Sets the emissive intensity of `id`, which must carry the `expected` pulse tag.
fn set_intensity(materials: &mut MaterialLibrary, id: MaterialId, expected: Pulse, intensity: f32) {
    match materials.get_mut(id) {
        Some(m) if m.pulse == Some(expected) => m.emissive_intensity = intensity,
        Some(m) => log::warn!("material {} is not tagged {expected:?}; left unchanged", m.name),
        None => log::warn!("material {} does not exist", id.0),
    }
}
