//! Scene data: transforms, geometry, materials, the scene graph, and the
//! procedural terrain and particle builders.
//!
//! - `instance` holds per-node transformation data and its GPU layout
//! - `model` contains geometry and material definitions
//! - `scene_graph` is the arena-backed node hierarchy
//! - `terrain` displaces the ground and scatters rocks
//! - `particles` owns the snowstorm buffer and its advancement rule
//! - `texture` wraps GPU textures

use rand::Rng;

pub mod instance;
pub mod model;
pub mod particles;
pub mod scene_graph;
pub mod terrain;
pub mod texture;

/// Maps one unit sample onto `min..max`. An empty range yields `min`.
pub(crate) fn uniform<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    min + rng.r#gen::<f32>() * (max - min)
}
