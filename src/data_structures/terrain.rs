//! Ground mesh displacement and rock scattering.

use std::f32::consts::{PI, TAU};

use rand::Rng;

use crate::{
    config::{RockConfig, TerrainConfig},
    data_structures::{
        instance::Instance,
        model::{Geometry, Material, MaterialLibrary},
        scene_graph::{NodeId, SceneGraph, SceneNode},
        uniform,
    },
    resources::mesh,
};

/// Nodes produced by [`TerrainBuilder::build`].
#[derive(Clone, Debug)]
pub struct Terrain {
    pub ground: NodeId,
    pub rocks: Vec<NodeId>,
}

/// The deterministic part of the ground height: a product of two sinusoids.
pub fn base_height(config: &TerrainConfig, x: f32, z: f32) -> f32 {
    (x * config.frequency).sin() * (z * config.frequency).cos() * config.amplitude
}

pub struct TerrainBuilder<'a> {
    terrain: &'a TerrainConfig,
    rocks: &'a RockConfig,
}

impl<'a> TerrainBuilder<'a> {
    pub fn new(terrain: &'a TerrainConfig, rocks: &'a RockConfig) -> Self {
        Self { terrain, rocks }
    }

    /// Builds the displaced ground grid with normals recomputed once, after every height edit.
    pub fn ground_geometry(&self, rng: &mut impl Rng) -> Geometry {
        let config = self.terrain;
        let mut geometry = mesh::plane_grid(config.size, config.size, config.segments);
        for v in geometry.vertices.iter_mut() {
            let [x, _, z] = v.position;
            let mut y = base_height(config, x, z);
            if (x * x + z * z).sqrt() < config.peak_radius {
                y += rng.r#gen::<f32>() * config.peak_height;
            }
            v.position[1] = y;
        }
        mesh::compute_vertex_normals(&mut geometry);
        geometry.name = "terrain".into();
        geometry
    }

    pub fn build(
        &self,
        graph: &mut SceneGraph,
        materials: &mut MaterialLibrary,
        parent: NodeId,
        rng: &mut impl Rng,
    ) -> Terrain {
        let ground_material = materials.add(
            Material::standard("terrain", self.terrain.colour)
                .roughness(self.terrain.roughness)
                .metalness(0.1),
        );
        let geometry = self.ground_geometry(rng);
        log::debug!(
            "terrain: {} vertices, {} triangles",
            geometry.vertex_count(),
            geometry.triangle_count()
        );
        let ground = graph.add_child(
            parent,
            SceneNode::mesh("terrain", geometry.shared(), ground_material)
                .with_transform(Instance::at(0.0, self.terrain.base_height, 0.0))
                .receiving_shadow(),
        );

        let rock_geometry = mesh::dodecahedron(1.0).shared();
        let rock_material = materials.add(Material::standard("rock", self.rocks.colour).roughness(1.0));
        let config = self.rocks;
        let rocks = (0..config.count)
            .map(|i| {
                let angle = rng.r#gen::<f32>() * TAU;
                let radius = uniform(rng, config.min_radius, config.max_radius);
                let height = uniform(rng, config.min_height, config.max_height);
                let scale = uniform(rng, config.min_scale, config.max_scale);
                let local = Instance::at(angle.cos() * radius, height, angle.sin() * radius)
                    .with_uniform_scale(scale)
                    .with_rotation(
                        rng.r#gen::<f32>() * PI,
                        rng.r#gen::<f32>() * PI,
                        rng.r#gen::<f32>() * PI,
                    );
                graph.add_child(
                    parent,
                    SceneNode::mesh(format!("rock_{i}"), rock_geometry.clone(), rock_material)
                        .with_transform(local)
                        .casting_shadow(),
                )
            })
            .collect::<Vec<_>>();
        log::debug!("terrain: scattered {} rocks", rocks.len());

        Terrain { ground, rocks }
    }
}
