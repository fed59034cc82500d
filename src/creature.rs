//! The yeti: a rig assembled from primitive volumes.
//!
//! There is no skeleton. Each arm is a chain of nodes (arm group, upper arm,
//! forearm, hand) where every link is the child of the previous one, so a
//! rotation on the arm group swings everything below it, including whatever
//! is later hung from the hand.
//!
//! Left/right pairs are built by [`CreatureBuilder::mirrored`] from a single
//! shared geometry and material and a side sign that flips x offsets and the
//! asymmetric rotations.

use std::{f32::consts::FRAC_PI_6, sync::Arc};

use crate::{
    config::{CreatureConfig, hex},
    data_structures::{
        instance::Instance,
        model::{Geometry, Material, MaterialId, MaterialLibrary, Pulse, Side},
        scene_graph::{NodeId, SceneGraph, SceneNode},
    },
    resources::mesh,
};

const HORN_COLOUR: u32 = 0x8a9ba8;
const MOUTH_COLOUR: u32 = 0x330000;
const CLAW_COLOUR: u32 = 0xaaaaaa;
const EYE_GLOW_OPACITY: f32 = 0.3;
const CLAW_SPACING: f32 = 0.2;

/// Handles into a built creature.
#[derive(Clone, Debug)]
pub struct Creature {
    pub root: NodeId,
    /// Arm groups, the joints the scheduler sways. Indexed like [`Side::BOTH`].
    pub arms: [NodeId; 2],
    /// Banner attachment points. Indexed like [`Side::BOTH`].
    pub hands: [NodeId; 2],
    /// The single material both eyes share.
    pub eye_material: MaterialId,
}

impl Creature {
    pub fn hand(&self, side: Side) -> NodeId {
        self.hands[side_index(side)]
    }

    pub fn arm(&self, side: Side) -> NodeId {
        self.arms[side_index(side)]
    }
}

fn side_index(side: Side) -> usize {
    match side {
        Side::Left => 0,
        Side::Right => 1,
    }
}

/// A mesh part: the geometry/material pair shared by every node built from it.
#[derive(Clone)]
struct Part {
    geometry: Arc<Geometry>,
    material: MaterialId,
}

impl Part {
    fn new(geometry: Geometry, material: MaterialId) -> Self {
        Self {
            geometry: geometry.shared(),
            material,
        }
    }

    fn node(&self, name: impl Into<String>, local: Instance) -> SceneNode {
        SceneNode::mesh(name, self.geometry.clone(), self.material).with_transform(local)
    }
}

pub struct CreatureBuilder<'a> {
    config: &'a CreatureConfig,
}

impl<'a> CreatureBuilder<'a> {
    pub fn new(config: &'a CreatureConfig) -> Self {
        Self { config }
    }

    /// Builds the creature under `parent` and returns its handles.
    pub fn build(
        &self,
        graph: &mut SceneGraph,
        materials: &mut MaterialLibrary,
        parent: NodeId,
    ) -> Creature {
        let config = self.config;
        let [x, y, z] = config.position;
        let root = graph.add_child(
            parent,
            SceneNode::group("yeti")
                .with_transform(Instance::at(x, y, z).with_rotation(0.0, config.base_yaw, 0.0)),
        );

        let fur = materials.add(
            Material::standard("fur", config.fur_colour)
                .roughness(0.9)
                .metalness(0.1),
        );
        let eye_material = materials.add(
            Material::standard("eye", config.eye_colour)
                .emissive(config.eye_colour, config.eye_intensity)
                .roughness(0.1)
                .pulse(Pulse::Eye),
        );
        let glow = materials.add(Material::basic("eye_glow", config.eye_colour).opacity(EYE_GLOW_OPACITY));
        let horn = materials.add(Material::standard("horn", hex(HORN_COLOUR)));
        let mouth = materials.add(Material::standard("mouth", hex(MOUTH_COLOUR)));
        let claw = materials.add(Material::standard("claw", hex(CLAW_COLOUR)));

        let torso = Part::new(mesh::cylinder(2.2, 2.8, 5.0, 16), fur);
        graph.add_child(root, torso.node("torso", Instance::at(0.0, 4.0, 0.0)).casting_shadow());

        let shoulder = Part::new(mesh::sphere(1.2, 16, 16), fur);
        Self::mirrored(graph, root, "shoulder", |s| {
            shoulder
                .node("", Instance::at(s * 2.5, 5.5, 0.0))
                .casting_shadow()
        });

        let chest = Part::new(mesh::sphere(2.3, 24, 24), fur);
        graph.add_child(
            root,
            chest
                .node("chest", Instance::at(0.0, 5.2, 1.5).with_scale(1.0, 1.0, 0.7))
                .casting_shadow(),
        );

        let head = Part::new(mesh::sphere(1.8, 32, 32), fur);
        graph.add_child(root, head.node("head", Instance::at(0.0, 7.5, 0.0)).casting_shadow());

        let jaw = Part::new(mesh::cuboid(2.0, 0.8, 1.2), fur);
        graph.add_child(root, jaw.node("jaw", Instance::at(0.0, 6.2, 1.0)).casting_shadow());

        let eye = Part::new(mesh::sphere(0.18, 16, 16), eye_material);
        Self::mirrored(graph, root, "eye", |s| {
            eye.node("", Instance::at(s * 0.6, 7.6, 1.5)).casting_shadow()
        });
        let eye_glow = Part::new(mesh::sphere(0.25, 16, 16), glow);
        Self::mirrored(graph, root, "eye_glow", |s| {
            eye_glow.node("", Instance::at(s * 0.6, 7.6, 1.5))
        });

        let brow = Part::new(mesh::cone(0.2, 0.8, 8), horn);
        Self::mirrored(graph, root, "brow", |s| {
            brow.node("", Instance::at(s * 0.8, 8.0, 1.0).with_rotation(-0.3, 0.0, s * 0.3))
                .casting_shadow()
        });

        let mouth = Part::new(mesh::cuboid(1.2, 0.2, 0.4), mouth);
        graph.add_child(root, mouth.node("mouth", Instance::at(0.0, 6.8, 1.6)).casting_shadow());

        let arm_parts = ArmParts {
            upper: Part::new(mesh::capsule(0.7, 3.5, 8, 16), fur),
            forearm: Part::new(mesh::capsule(0.6, 3.0, 8, 16), fur),
            hand: Part::new(mesh::cuboid(1.0, 1.2, 0.8), fur),
            claw: Part::new(mesh::cone(0.1, 0.5, 6), claw),
        };
        let [(left_arm, left_hand), (right_arm, right_hand)] =
            Side::BOTH.map(|side| self.arm(graph, root, &arm_parts, side));

        let leg = Part::new(mesh::capsule(0.8, 3.0, 8, 16), fur);
        Self::mirrored(graph, root, "leg", |s| {
            leg.node("", Instance::at(s * 1.5, 1.5, 0.0)).casting_shadow()
        });

        log::info!(
            "creature: {} nodes under root {}",
            graph.descendants(root).count(),
            root.index()
        );

        Creature {
            root,
            arms: [left_arm, right_arm],
            hands: [left_hand, right_hand],
            eye_material,
        }
    }

    /// Adds a left then a right node under `parent`, built by `make` from the
    /// side sign and named `{name}_{side}`.
    fn mirrored(
        graph: &mut SceneGraph,
        parent: NodeId,
        name: &str,
        make: impl Fn(f32) -> SceneNode,
    ) -> [NodeId; 2] {
        Side::BOTH.map(|side| {
            let mut node = make(side.sign());
            node.name = format!("{name}_{}", side.label());
            graph.add_child(parent, node)
        })
    }

    /// Builds one arm chain and returns its group and hand nodes.
    fn arm(
        &self,
        graph: &mut SceneGraph,
        root: NodeId,
        parts: &ArmParts,
        side: Side,
    ) -> (NodeId, NodeId) {
        let s = side.sign();
        let label = side.label();
        let group = graph.add_child(
            root,
            SceneNode::group(format!("arm_{label}")).with_transform(
                Instance::at(s * 3.0, 5.5, 0.0).with_rotation(self.config.arm_pitch, 0.0, 0.0),
            ),
        );
        let upper = graph.add_child(
            group,
            parts
                .upper
                .node(format!("upper_arm_{label}"), Instance::new().with_rotation(0.0, 0.0, s * 0.3))
                .casting_shadow(),
        );
        let forearm = graph.add_child(
            upper,
            parts
                .forearm
                .node(
                    format!("forearm_{label}"),
                    Instance::at(0.0, -3.2, 0.0).with_rotation(0.0, 0.0, s * 0.4),
                )
                .casting_shadow(),
        );
        let hand = graph.add_child(
            forearm,
            parts
                .hand
                .node(
                    format!("hand_{label}"),
                    Instance::at(0.0, -4.5, 0.0).with_rotation(0.0, 0.0, s * 0.2),
                )
                .casting_shadow(),
        );

        let n = self.config.claws_per_hand;
        let centre = n.saturating_sub(1) as f32 / 2.0;
        for i in 0..n {
            let x = (i as f32 - centre) * CLAW_SPACING;
            graph.add_child(
                hand,
                parts.claw.node(
                    format!("claw_{label}_{i}"),
                    Instance::at(x, -0.8, 0.4).with_rotation(FRAC_PI_6, 0.0, 0.0),
                )
                .casting_shadow(),
            );
        }

        (group, hand)
    }
}

struct ArmParts {
    upper: Part,
    forearm: Part,
    hand: Part,
    claw: Part,
}
