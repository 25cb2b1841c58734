use glam::{Mat4, Quat, Vec3};

use crate::error::{Error, Result};

/// Handle to a node stored in a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Position and orientation of a scene node.
///
/// The world is right-handed with Z up and Y forward. `hpr` holds heading,
/// pitch and roll in degrees; heading turns about Z, pitch about X and roll
/// about Y, applied in that order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub hpr: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            hpr: Vec3::ZERO,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn set_hpr(&mut self, heading: f32, pitch: f32, roll: f32) {
        self.hpr = Vec3::new(heading, pitch, roll);
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_z(self.hpr.x.to_radians())
            * Quat::from_rotation_x(self.hpr.y.to_radians())
            * Quat::from_rotation_y(self.hpr.z.to_radians())
    }

    /// Moves the node along its own axes.
    pub fn translate_local(&mut self, offset: Vec3) {
        self.position += self.rotation() * offset;
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::Y
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation(), self.position)
    }
}

#[derive(Debug)]
struct Node {
    name: String,
    transform: Transform,
}

/// Flat node store. Removed slots stay empty so handles are never reused.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: Vec<Option<Node>>,
}

impl Scene {
    pub fn attach(&mut self, name: &str, transform: Transform) -> NodeId {
        self.nodes.push(Some(Node {
            name: name.to_string(),
            transform,
        }));
        NodeId(self.nodes.len() - 1)
    }

    pub fn detach(&mut self, id: NodeId) -> Result<()> {
        self.nodes
            .get_mut(id.0)
            .and_then(Option::take)
            .map(|_| ())
            .ok_or(Error::MissingNode(id))
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.node(id).map(|node| node.name.as_str())
    }

    pub fn transform(&self, id: NodeId) -> Option<&Transform> {
        self.node(id).map(|node| &node.transform)
    }

    pub fn transform_mut(&mut self, id: NodeId) -> Option<&mut Transform> {
        self.nodes
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .map(|node| &mut node.transform)
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|node| node.name == name))
            .map(NodeId)
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }
}
