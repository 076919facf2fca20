//! Move node tool
//!
//! Press on a node to grab it, drag to slide it across the plane through
//! the node that faces the camera.

use super::{ToolBehavior, ToolContext};
use crate::rasterizer::{draw_3d_line_clipped, ray_plane_intersection, Camera, Color, Framebuffer, Vec3};
use crate::sketch::NodeId;

/// Size of the crosshair drawn on the grabbed node
const MARKER_SIZE: f32 = 0.25;

#[derive(Debug, Clone, Copy)]
struct Drag {
    node: NodeId,
    plane_normal: Vec3,
    /// Node position minus the grab point, so the node doesn't jump
    offset: Vec3,
    /// Where the node currently is
    position: Vec3,
}

#[derive(Debug, Clone, Default)]
pub struct MoveNodeTool {
    drag: Option<Drag>,
}

impl MoveNodeTool {
    pub fn new() -> Self {
        Self { drag: None }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Node being dragged, if any
    pub fn dragged_node(&self) -> Option<NodeId> {
        self.drag.map(|d| d.node)
    }
}

impl ToolBehavior for MoveNodeTool {
    fn key(&self) -> &'static str {
        "sketch-move"
    }

    fn tool_tip(&self) -> &'static [(&'static str, &'static str)] {
        &[("Left drag", "Move node")]
    }

    fn mouse_left_press(&mut self, ctx: &mut ToolContext<'_>, x: f32, y: f32) {
        self.drag = None;
        let Some(node) = ctx.pick(x, y).and_then(|hit| hit.node()) else {
            return;
        };

        let position = ctx.mesh.root().node(node).position;
        let plane_normal = ctx.camera.basis_z;
        let ray = ctx.ray(x, y);
        let offset = match ray_plane_intersection(&ray, position, plane_normal) {
            Some(t) => position - ray.at(t),
            None => Vec3::ZERO,
        };
        self.drag = Some(Drag { node, plane_normal, offset, position });
    }

    fn mouse_move(&mut self, ctx: &mut ToolContext<'_>, x: f32, y: f32, left_down: bool) {
        if !left_down {
            self.drag = None;
            return;
        }
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        if !ctx.mesh.has_root() || ctx.mesh.root().get(drag.node).is_none() {
            self.drag = None;
            return;
        }

        let ray = ctx.ray(x, y);
        if let Some(t) = ray_plane_intersection(&ray, drag.position, drag.plane_normal) {
            drag.position = ray.at(t) + drag.offset;
            ctx.mesh.root_mut().node_mut(drag.node).position = drag.position;
        }
    }

    fn mouse_left_release(&mut self, _ctx: &mut ToolContext<'_>, _x: f32, _y: f32) {
        self.drag = None;
    }

    fn render(&self, fb: &mut Framebuffer, camera: &Camera) {
        if let Some(drag) = &self.drag {
            let p = drag.position;
            for axis in [Vec3::new(1.0, 0.0, 0.0), Vec3::UP, Vec3::new(0.0, 0.0, 1.0)] {
                let a = axis * MARKER_SIZE;
                draw_3d_line_clipped(fb, camera, p - a, p + a, Color::WHITE);
            }
        }
    }
}
