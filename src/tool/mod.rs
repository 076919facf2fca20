//! Sketch editing tools
//!
//! Every tool implements `ToolBehavior`: a few required event handlers plus
//! optional ones that default to doing nothing. The editor holds the active
//! tool as a `SketchTool` and forwards input to it.
//!
//! # Tools
//!
//! - **Move node**: drag a node in the plane facing the camera
//! - **Resize node**: pick a node, then grow/shrink it with the mouse wheel

mod move_node;
mod resize_node;

pub use move_node::MoveNodeTool;
pub use resize_node::ResizeNodeTool;

use crate::config::Config;
use crate::rasterizer::{screen_to_ray, Camera, Framebuffer, Ray};
use crate::sketch::{SketchMesh, SketchNodeIntersection};

/// Tool identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SketchToolId {
    MoveNode,
    ResizeNode,
}

impl SketchToolId {
    /// Key used for config lookups (`editor/tool/<key>/...`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MoveNode => "sketch-move",
            Self::ResizeNode => "sketch-resize",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::MoveNode => "Move node",
            Self::ResizeNode => "Resize node",
        }
    }

    /// Get all tool IDs
    pub fn all() -> &'static [SketchToolId] {
        &[Self::MoveNode, Self::ResizeNode]
    }

    pub fn from_key(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|id| id.as_str() == s)
    }

    /// Config prefix for this tool's settings
    pub fn config_prefix(&self) -> String {
        format!("editor/tool/{}/", self.as_str())
    }
}

/// What a tool works on during one event
pub struct ToolContext<'a> {
    pub mesh: &'a mut SketchMesh,
    pub camera: &'a Camera,
    /// Viewport size in framebuffer pixels
    pub width: usize,
    pub height: usize,
}

impl<'a> ToolContext<'a> {
    pub fn new(mesh: &'a mut SketchMesh, camera: &'a Camera, width: usize, height: usize) -> Self {
        Self { mesh, camera, width, height }
    }

    /// Ray through a viewport pixel
    pub fn ray(&self, x: f32, y: f32) -> Ray {
        screen_to_ray(x, y, self.width, self.height, self.camera)
    }

    /// Closest node under a viewport pixel
    pub fn pick(&self, x: f32, y: f32) -> Option<SketchNodeIntersection> {
        let mut hit = SketchNodeIntersection::new();
        if self.mesh.intersects(&self.ray(x, y), &mut hit) {
            Some(hit)
        } else {
            None
        }
    }
}

/// Input handling shared by all tools
pub trait ToolBehavior {
    /// Stable identifier (matches `SketchToolId::as_str`)
    fn key(&self) -> &'static str;

    /// (input, action) pairs shown while the tool is active
    fn tool_tip(&self) -> &'static [(&'static str, &'static str)];

    fn mouse_left_press(&mut self, ctx: &mut ToolContext<'_>, x: f32, y: f32);

    fn mouse_move(&mut self, ctx: &mut ToolContext<'_>, x: f32, y: f32, left_down: bool);

    fn mouse_left_release(&mut self, _ctx: &mut ToolContext<'_>, _x: f32, _y: f32) {}

    /// `up` is true when the wheel turns away from the user
    fn mouse_wheel(&mut self, _ctx: &mut ToolContext<'_>, _up: bool) {}

    /// Tool overlay, drawn after the scene
    fn render(&self, _fb: &mut Framebuffer, _camera: &Camera) {}
}

/// The active tool
#[derive(Debug, Clone)]
pub enum SketchTool {
    MoveNode(MoveNodeTool),
    ResizeNode(ResizeNodeTool),
}

impl SketchTool {
    pub fn new(id: SketchToolId, config: &Config) -> Self {
        let proxy = config.proxy(id.config_prefix());
        match id {
            SketchToolId::MoveNode => Self::MoveNode(MoveNodeTool::new()),
            SketchToolId::ResizeNode => Self::ResizeNode(ResizeNodeTool::from_config(&proxy)),
        }
    }

    pub fn id(&self) -> SketchToolId {
        match self {
            Self::MoveNode(_) => SketchToolId::MoveNode,
            Self::ResizeNode(_) => SketchToolId::ResizeNode,
        }
    }

    fn behavior(&self) -> &dyn ToolBehavior {
        match self {
            Self::MoveNode(t) => t,
            Self::ResizeNode(t) => t,
        }
    }

    fn behavior_mut(&mut self) -> &mut dyn ToolBehavior {
        match self {
            Self::MoveNode(t) => t,
            Self::ResizeNode(t) => t,
        }
    }
}

impl ToolBehavior for SketchTool {
    fn key(&self) -> &'static str {
        self.behavior().key()
    }

    fn tool_tip(&self) -> &'static [(&'static str, &'static str)] {
        self.behavior().tool_tip()
    }

    fn mouse_left_press(&mut self, ctx: &mut ToolContext<'_>, x: f32, y: f32) {
        self.behavior_mut().mouse_left_press(ctx, x, y);
    }

    fn mouse_move(&mut self, ctx: &mut ToolContext<'_>, x: f32, y: f32, left_down: bool) {
        self.behavior_mut().mouse_move(ctx, x, y, left_down);
    }

    fn mouse_left_release(&mut self, ctx: &mut ToolContext<'_>, x: f32, y: f32) {
        self.behavior_mut().mouse_left_release(ctx, x, y);
    }

    fn mouse_wheel(&mut self, ctx: &mut ToolContext<'_>, up: bool) {
        self.behavior_mut().mouse_wheel(ctx, up);
    }

    fn render(&self, fb: &mut Framebuffer, camera: &Camera) {
        self.behavior().render(fb, camera);
    }
}
