//! Render composition and pipeline batching.
//!
//! The [`Renderer`] trait is the seam between the CPU-side scene and whatever
//! draws it: the wgpu [`Context`](crate::context::Context) in the application,
//! a recording stub in tests. [`DrawList`] sorts the scene's renderable nodes
//! into the batches the pipelines consume:
//!
//! - opaque meshes, grouped so nodes sharing geometry and material are drawn
//!   as one instanced call
//! - transparent meshes, back to front from the camera
//! - point fields, drawn as camera-facing sprites

use std::{ops::Range, sync::Arc};

use cgmath::{EuclideanSpace, InnerSpace};

use crate::{
    data_structures::{
        instance::InstanceRaw,
        model::{Geometry, MaterialId},
        scene_graph::{NodeId, Renderable},
    },
    scene::Scene,
};

/// Physical pixel size of the render surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Surface size for a viewport of `physical` pixels reported at
    /// `scale_factor`, with the pixel ratio capped at `max_ratio`.
    pub fn from_physical(physical: (u32, u32), scale_factor: f64, max_ratio: f64) -> Self {
        let scale_factor = if scale_factor > 0.0 { scale_factor } else { 1.0 };
        let ratio = scale_factor.min(max_ratio) / scale_factor;
        Self {
            width: (physical.0 as f64 * ratio).round() as u32,
            height: (physical.1 as f64 * ratio).round() as u32,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Anything that can turn a [`Scene`] into a frame.
pub trait Renderer {
    /// Draws one frame. The scene's world transforms must be current.
    fn render(&mut self, scene: &Scene) -> anyhow::Result<()>;

    /// Resizes the render surface. Called out of band, between ticks.
    fn resize(&mut self, size: SurfaceSize);

    fn size(&self) -> SurfaceSize;
}

/// One mesh node ready to draw.
#[derive(Clone, Debug)]
pub struct DrawItem {
    pub node: NodeId,
    pub geometry: Arc<Geometry>,
    pub material: MaterialId,
    pub instance: InstanceRaw,
    pub cast_shadow: bool,
    /// Distance from the camera to the node's origin.
    pub depth: f32,
}

/// A run of consecutive instances sharing geometry and material.
#[derive(Clone, Debug)]
pub struct Batch {
    pub geometry: Arc<Geometry>,
    pub material: MaterialId,
    /// Range into [`DrawList::instances`].
    pub instances: Range<u32>,
    pub cast_shadow: bool,
}

#[derive(Clone, Debug, Default)]
pub struct DrawList {
    pub opaque: Vec<DrawItem>,
    pub transparent: Vec<DrawItem>,
    pub points: Vec<(NodeId, MaterialId)>,
}

impl DrawList {
    pub fn collect(scene: &Scene) -> Self {
        let eye = scene.camera.position.to_vec();
        let mut list = DrawList::default();
        for (id, node) in scene.graph.iter() {
            let (geometry, material) = match &node.renderable {
                None => continue,
                Some(Renderable::Points { material }) => {
                    list.points.push((id, *material));
                    continue;
                }
                Some(Renderable::Mesh { geometry, material }) => (geometry, *material),
            };
            let Some(m) = scene.materials.get(material) else {
                log::warn!("node {} references missing material {}", node.name, material.0);
                continue;
            };
            let world = node.world();
            let item = DrawItem {
                node: id,
                geometry: geometry.clone(),
                material,
                instance: InstanceRaw::new(world, node.receive_shadow),
                cast_shadow: node.cast_shadow,
                depth: (world.w.truncate() - eye).magnitude(),
            };
            if m.is_transparent() {
                list.transparent.push(item);
            } else {
                list.opaque.push(item);
            }
        }
        list.opaque
            .sort_by_key(|i| (Arc::as_ptr(&i.geometry) as usize, i.material, i.cast_shadow));
        list.transparent.sort_by(|a, b| b.depth.total_cmp(&a.depth));
        list
    }

    /// Instance data for every mesh, opaque first, in batch order.
    pub fn instances(&self) -> Vec<InstanceRaw> {
        self.opaque
            .iter()
            .chain(self.transparent.iter())
            .map(|i| i.instance)
            .collect()
    }

    pub fn opaque_batches(&self) -> Vec<Batch> {
        batch(&self.opaque, 0)
    }

    pub fn transparent_batches(&self) -> Vec<Batch> {
        batch(&self.transparent, self.opaque.len() as u32)
    }

    pub fn mesh_count(&self) -> usize {
        self.opaque.len() + self.transparent.len()
    }
}

fn batch(items: &[DrawItem], offset: u32) -> Vec<Batch> {
    let mut batches: Vec<Batch> = Vec::new();
    for (i, item) in items.iter().enumerate() {
        let index = offset + i as u32;
        match batches.last_mut() {
            Some(last)
                if Arc::ptr_eq(&last.geometry, &item.geometry)
                    && last.material == item.material
                    && last.cast_shadow == item.cast_shadow =>
            {
                last.instances.end = index + 1;
            }
            _ => batches.push(Batch {
                geometry: item.geometry.clone(),
                material: item.material,
                instances: index..index + 1,
                cast_shadow: item.cast_shadow,
            }),
        }
    }
    batches
}
