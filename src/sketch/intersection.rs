//! Closest-hit accumulator for sketch picking

use super::node::NodeId;
use crate::rasterizer::Vec3;

/// Closest ray hit seen so far.
///
/// One accumulator can be fed by several meshes in turn to find the nearest
/// node across all of them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SketchNodeIntersection {
    t: f32,
    position: Vec3,
    normal: Vec3,
    target: Option<(u32, NodeId)>,
}

impl SketchNodeIntersection {
    pub fn new() -> Self {
        Self {
            t: f32::INFINITY,
            position: Vec3::ZERO,
            normal: Vec3::ZERO,
            target: None,
        }
    }

    /// Record a candidate hit if it is strictly closer than the current one
    pub fn update(&mut self, t: f32, position: Vec3, normal: Vec3, mesh: u32, node: NodeId) -> bool {
        if t < self.t {
            self.t = t;
            self.position = position;
            self.normal = normal;
            self.target = Some((mesh, node));
            true
        } else {
            false
        }
    }

    pub fn is_intersection(&self) -> bool {
        self.target.is_some()
    }

    /// Forget any recorded hit
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Ray parameter of the hit (infinite when nothing was hit)
    pub fn t(&self) -> f32 {
        self.t
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Index of the mesh that owns the hit node
    pub fn mesh(&self) -> Option<u32> {
        self.target.map(|(mesh, _)| mesh)
    }

    pub fn node(&self) -> Option<NodeId> {
        self.target.map(|(_, node)| node)
    }
}

impl Default for SketchNodeIntersection {
    fn default() -> Self {
        Self::new()
    }
}
