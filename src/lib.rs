//! yeti-scene
//!
//! A procedurally built, continuously animated 3D scene for a portfolio page:
//! a yeti made of primitive volumes stands on displaced snowy terrain under a
//! glowing moon, holding four emissive banners, while a snowstorm drifts
//! through the frame and the camera slowly orbits. Runs natively and on the
//! web through wgpu.
//!
//! High-level modules
//! - `config`: every tunable constant, gathered in [`config::SceneConfig`]
//! - `data_structures`: transforms, geometry, materials, the scene graph,
//!   terrain and particles
//! - `resources`: primitive meshes, banner rasterisation and GPU uploads
//! - `creature`: the yeti rig
//! - `scene`: assembles everything into one [`scene::Scene`]
//! - `animation`: the per-frame scheduler and frame clock
//! - `camera`: camera, projection and their uniform
//! - `render`: the [`render::Renderer`] seam and draw batching
//! - `pipelines`: wgpu pipelines and shaders
//! - `context`: the wgpu renderer
//! - `pointer`: pointer tracking in normalized device coordinates
//! - `flow`: the winit event loop tying it all together
//!

pub mod animation;
pub mod camera;
pub mod config;
pub mod context;
pub mod creature;
pub mod data_structures;
pub mod flow;
pub mod pipelines;
pub mod pointer;
pub mod render;
pub mod resources;
pub mod scene;

// Re-exports commonly used types for convenience in downstream code.
pub use animation::{AnimationScheduler, FrameClock};
pub use config::SceneConfig;
pub use flow::run;
pub use render::{Renderer, SurfaceSize};
pub use scene::{Scene, SceneAssembler, SceneHandles};
