//! Scene graph and hierarchical scene organization.
//!
//! Nodes live in one arena and reference each other by [`NodeId`]. A node is
//! only ever created through [`SceneGraph::add_child`], which makes the tree
//! shape structural: every node but the root has exactly one parent, and a
//! parent is always stored before its children. World transforms are
//! therefore propagated by a single forward pass over the arena.

use std::{
    ops::{Index, IndexMut},
    sync::Arc,
};

use cgmath::{Matrix4, SquareMatrix, Vector3};

use crate::data_structures::{
    instance::Instance,
    model::{Geometry, MaterialId},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// What a node draws, if anything.
#[derive(Clone, Debug)]
pub enum Renderable {
    Mesh {
        geometry: Arc<Geometry>,
        material: MaterialId,
    },
    /// The scene's particle field, drawn as camera-facing sprites.
    Points { material: MaterialId },
}

impl Renderable {
    pub fn material(&self) -> MaterialId {
        match self {
            Renderable::Mesh { material, .. } | Renderable::Points { material } => *material,
        }
    }

    pub fn geometry(&self) -> Option<&Arc<Geometry>> {
        match self {
            Renderable::Mesh { geometry, .. } => Some(geometry),
            Renderable::Points { .. } => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SceneNode {
    pub name: String,
    pub local: Instance,
    pub renderable: Option<Renderable>,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    world: Matrix4<f32>,
}

impl SceneNode {
    /// A transform-only node.
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            local: Instance::new(),
            renderable: None,
            cast_shadow: false,
            receive_shadow: false,
            parent: None,
            children: Vec::new(),
            world: Matrix4::identity(),
        }
    }

    pub fn mesh(name: impl Into<String>, geometry: Arc<Geometry>, material: MaterialId) -> Self {
        Self {
            renderable: Some(Renderable::Mesh { geometry, material }),
            ..Self::group(name)
        }
    }

    pub fn points(name: impl Into<String>, material: MaterialId) -> Self {
        Self {
            renderable: Some(Renderable::Points { material }),
            ..Self::group(name)
        }
    }

    pub fn with_transform(mut self, local: Instance) -> Self {
        self.local = local;
        self
    }

    pub fn casting_shadow(mut self) -> Self {
        self.cast_shadow = true;
        self
    }

    pub fn receiving_shadow(mut self) -> Self {
        self.receive_shadow = true;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// World matrix as of the last [`SceneGraph::update_world_transforms`].
    pub fn world(&self) -> &Matrix4<f32> {
        &self.world
    }

    pub fn material(&self) -> Option<MaterialId> {
        self.renderable.as_ref().map(Renderable::material)
    }
}

#[derive(Clone, Debug)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    root: NodeId,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            nodes: vec![SceneNode::group("scene")],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Inserts `node` as the last child of `parent` and returns its id.
    ///
    /// Any parent/child links already present on `node` are discarded.
    pub fn add_child(&mut self, parent: NodeId, mut node: SceneNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self[id].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self[id].parent
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.name == name).map(NodeId)
    }

    /// All nodes below `id` in depth-first order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self[id].children.clone();
        stack.reverse();
        Descendants { graph: self, stack }
    }

    pub fn is_descendant_of(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut current = self[id].parent;
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self[parent].parent;
        }
        false
    }

    /// Recomputes every world matrix from the local transforms.
    ///
    /// Parents precede their children in the arena, so one forward pass sees
    /// each parent's fresh world matrix before any of its children.
    pub fn update_world_transforms(&mut self) {
        for i in 0..self.nodes.len() {
            let local = self.nodes[i].local.to_matrix();
            let world = match self.nodes[i].parent {
                Some(parent) => self.nodes[parent.0].world * local,
                None => local,
            };
            self.nodes[i].world = world;
        }
    }

    /// World-space origin of a node as of the last transform update.
    pub fn world_position(&self, id: NodeId) -> Vector3<f32> {
        self[id].world.w.truncate()
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<NodeId> for SceneGraph {
    type Output = SceneNode;

    fn index(&self, id: NodeId) -> &SceneNode {
        &self.nodes[id.0]
    }
}

impl IndexMut<NodeId> for SceneGraph {
    fn index_mut(&mut self, id: NodeId) -> &mut SceneNode {
        &mut self.nodes[id.0]
    }
}

pub struct Descendants<'a> {
    graph: &'a SceneGraph,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.graph[id].children.iter().rev().copied());
        Some(id)
    }
}
