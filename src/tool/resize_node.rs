//! Resize node tool: click a node, then scroll to scale its radius

use super::{ToolBehavior, ToolContext};
use crate::config::ConfigProxy;
use crate::sketch::node::limits;
use crate::sketch::NodeId;

#[derive(Debug, Clone)]
pub struct ResizeNodeTool {
    /// Radius factor per wheel notch (> 1)
    step: f32,
    min_radius: f32,
    target: Option<NodeId>,
}

impl ResizeNodeTool {
    /// `min_radius` never goes below what a sketch file may hold
    pub fn new(step: f32, min_radius: f32) -> Self {
        Self { step, min_radius: min_radius.max(limits::MIN_RADIUS), target: None }
    }

    /// Reads `step` and `min-radius`
    pub fn from_config(config: &ConfigProxy<'_>) -> Self {
        Self::new(config.get_or("step", 1.1), config.get_or("min-radius", 0.05))
    }

    pub fn target(&self) -> Option<NodeId> {
        self.target
    }
}

impl ToolBehavior for ResizeNodeTool {
    fn key(&self) -> &'static str {
        "sketch-resize"
    }

    fn tool_tip(&self) -> &'static [(&'static str, &'static str)] {
        &[("Left click", "Select node"), ("Wheel", "Grow/shrink node")]
    }

    fn mouse_left_press(&mut self, ctx: &mut ToolContext<'_>, x: f32, y: f32) {
        self.target = ctx.pick(x, y).and_then(|hit| hit.node());
    }

    fn mouse_move(&mut self, _ctx: &mut ToolContext<'_>, _x: f32, _y: f32, _left_down: bool) {}

    fn mouse_wheel(&mut self, ctx: &mut ToolContext<'_>, up: bool) {
        let Some(id) = self.target else {
            return;
        };
        if !ctx.mesh.has_root() || ctx.mesh.root().get(id).is_none() {
            self.target = None;
            return;
        }

        let factor = if up { self.step } else { 1.0 / self.step };
        let node = ctx.mesh.root_mut().node_mut(id);
        node.radius = (node.radius * factor).max(self.min_radius);
    }
}
