//! Scene assembly: one graph holding the moon, the terrain, the yeti with its
//! banners and the snowstorm, plus the lights, fog and camera that frame them.

use cgmath::{Deg, Matrix4, Point3, Vector3, ortho};
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    camera::{Camera, OPENGL_TO_WGPU_MATRIX, Projection},
    config::{Rgb, SceneConfig, hex},
    creature::{Creature, CreatureBuilder},
    data_structures::{
        instance::Instance,
        model::{Material, MaterialId, MaterialLibrary, Pulse, TextureLibrary},
        particles::ParticleField,
        scene_graph::{NodeId, SceneGraph, SceneNode},
        terrain::{Terrain, TerrainBuilder},
    },
    resources::{
        banner::{Banner, BannerFactory},
        mesh,
    },
};

const MOON_COLOUR: u32 = 0x9fcfff;
const MOON_RADIUS: f32 = 3.0;
const MOON_POSITION: [f32; 3] = [25.0, 35.0, -30.0];
const CAMERA_START: [f32; 3] = [0.0, 5.0, 15.0];
const SHADOW_NEAR: f32 = 0.5;
const SHADOW_FAR: f32 = 500.0;

/// Exponential squared fog: `factor = 1 - exp(-(density * distance)^2)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fog {
    pub colour: Rgb,
    pub density: f32,
}

/// Orthographic frustum the shadow-casting light renders its depth map with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowFrustum {
    pub extent: f32,
    pub near: f32,
    pub far: f32,
    pub map_size: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LightKind {
    Ambient,
    /// Parallel light shining from `position` towards the origin.
    Directional {
        position: Vector3<f32>,
        shadow: Option<ShadowFrustum>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Light {
    pub name: String,
    pub colour: Rgb,
    pub intensity: f32,
    pub kind: LightKind,
}

impl Light {
    pub fn casts_shadow(&self) -> bool {
        matches!(self.kind, LightKind::Directional { shadow: Some(_), .. })
    }

    /// View-projection of a shadow-casting light, `None` for every other light.
    pub fn shadow_view_proj(&self) -> Option<Matrix4<f32>> {
        let LightKind::Directional {
            position,
            shadow: Some(frustum),
        } = self.kind
        else {
            return None;
        };
        let e = frustum.extent;
        let view = Matrix4::look_at_rh(
            Point3::new(position.x, position.y, position.z),
            Point3::new(0.0, 0.0, 0.0),
            Vector3::unit_y(),
        );
        let proj = ortho(-e, e, -e, e, frustum.near, frustum.far);
        Some(OPENGL_TO_WGPU_MATRIX * proj * view)
    }
}

/// Everything a renderer needs to draw a frame.
pub struct Scene {
    pub graph: SceneGraph,
    pub materials: MaterialLibrary,
    pub textures: TextureLibrary,
    pub lights: Vec<Light>,
    pub particles: ParticleField,
    pub camera: Camera,
    pub projection: Projection,
    pub fog: Fog,
    pub clear_colour: Rgb,
}

impl Scene {
    pub fn shadow_light(&self) -> Option<&Light> {
        self.lights.iter().find(|l| l.casts_shadow())
    }
}

/// Nodes and materials the animation scheduler drives.
#[derive(Clone, Debug)]
pub struct SceneHandles {
    pub terrain: Terrain,
    pub creature: Creature,
    pub banners: [Banner; 4],
    pub moon: NodeId,
    pub moon_material: MaterialId,
    pub snow: NodeId,
}

pub struct SceneAssembler<'a> {
    config: &'a SceneConfig,
}

impl<'a> SceneAssembler<'a> {
    pub fn new(config: &'a SceneConfig) -> Self {
        Self { config }
    }

    /// Builds the whole scene for a viewport of `width` x `height` pixels.
    ///
    /// Every random draw comes from one generator seeded with `config.seed`,
    /// so two assemblies with the same config are identical.
    pub fn assemble(&self, width: u32, height: u32) -> (Scene, SceneHandles) {
        let config = self.config;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut graph = SceneGraph::new();
        let mut materials = MaterialLibrary::new();
        let mut textures = TextureLibrary::new();
        let root = graph.root();

        let moon_material = materials.add(
            Material::standard("moon", hex(MOON_COLOUR))
                .emissive(hex(MOON_COLOUR), config.animation.moon_base)
                .pulse(Pulse::Moon),
        );
        let [mx, my, mz] = MOON_POSITION;
        let moon = graph.add_child(
            root,
            SceneNode::mesh("moon", mesh::sphere(MOON_RADIUS, 32, 32).shared(), moon_material)
                .with_transform(Instance::at(mx, my, mz)),
        );

        let terrain = TerrainBuilder::new(&config.terrain, &config.rocks).build(
            &mut graph,
            &mut materials,
            root,
            &mut rng,
        );

        let creature = CreatureBuilder::new(&config.creature).build(&mut graph, &mut materials, root);

        let factory = BannerFactory::new(&config.banners);
        let banners: [Banner; 4] = std::array::from_fn(|i| {
            let hand = creature.hands[(i / 2).min(creature.hands.len() - 1)];
            factory.create(
                &mut graph,
                &mut materials,
                &mut textures,
                hand,
                i,
                &config.banners.banners[i],
            )
        });
        log::info!("banners: baked {} textures", textures.len());

        let particles = ParticleField::new(&config.particles, &mut rng);
        let snow_material = materials.add(
            Material::basic("snow", [1.0; 3]).opacity(config.particles.opacity),
        );
        let snow = graph.add_child(root, SceneNode::points("snow", snow_material));

        graph.update_world_transforms();

        let render = &config.render;
        let lights = vec![
            Light {
                name: "ambient".into(),
                colour: hex(0x3a4a5a),
                intensity: 0.5,
                kind: LightKind::Ambient,
            },
            Light {
                name: "moonlight".into(),
                colour: hex(MOON_COLOUR),
                intensity: 1.5,
                kind: LightKind::Directional {
                    position: Vector3::new(15.0, 25.0, 10.0),
                    shadow: Some(ShadowFrustum {
                        extent: render.shadow_extent,
                        near: SHADOW_NEAR,
                        far: SHADOW_FAR,
                        map_size: render.shadow_map_size,
                    }),
                },
            },
            Light {
                name: "rim".into(),
                colour: [1.0; 3],
                intensity: 0.8,
                kind: LightKind::Directional {
                    position: Vector3::new(-15.0, 15.0, -15.0),
                    shadow: None,
                },
            },
        ];

        let orbit = &config.orbit;
        let [lx, ly, lz] = orbit.look_at;
        let camera = Camera::new(CAMERA_START, (lx, ly, lz));
        let projection = Projection::new(width, height, Deg(orbit.fovy_degrees), orbit.znear, orbit.zfar);

        log::info!(
            "scene: {} nodes, {} materials, {} particles, {} lights",
            graph.len(),
            materials.len(),
            particles.len(),
            lights.len()
        );

        let scene = Scene {
            graph,
            materials,
            textures,
            lights,
            particles,
            camera,
            projection,
            fog: Fog {
                colour: render.fog_colour,
                density: render.fog_density,
            },
            clear_colour: render.clear_colour,
        };
        let handles = SceneHandles {
            terrain,
            creature,
            banners,
            moon,
            moon_material,
            snow,
        };
        (scene, handles)
    }
}
