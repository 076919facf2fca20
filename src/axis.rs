//! World axis gizmo: X red, Y green, Z blue, drawn over everything

use crate::config::Config;
use crate::rasterizer::{draw_3d_line_clipped, Camera, Color, Framebuffer, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Axis {
    pub length: f32,
}

impl Axis {
    pub fn new(length: f32) -> Self {
        Self { length }
    }

    /// Length from `editor/axis/length`
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.get_or("editor/axis/length", 1.0))
    }

    /// The three lines as (end point, color), each starting at the origin
    pub fn lines(&self) -> [(Vec3, Color); 3] {
        let l = self.length;
        [
            (Vec3::new(l, 0.0, 0.0), Color::RED),
            (Vec3::new(0.0, l, 0.0), Color::GREEN),
            (Vec3::new(0.0, 0.0, l), Color::BLUE),
        ]
    }

    /// Lines skip the z-buffer, so the gizmo stays visible inside geometry
    pub fn render(&self, fb: &mut Framebuffer, camera: &Camera) {
        for (end, color) in self.lines() {
            draw_3d_line_clipped(fb, camera, Vec3::ZERO, end, color);
        }
    }
}

impl Default for Axis {
    fn default() -> Self {
        Self::new(1.0)
    }
}
