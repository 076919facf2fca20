//! Drawing utilities for 3D rendering
//!
//! Standalone functions for drawing lines and reference grids.

use super::camera::Camera;
use super::math::{Vec3, world_to_screen, NEAR_PLANE};
use super::render::Framebuffer;
use super::types::Color;

/// Draw a 3D line with proper near-plane clipping.
/// Lines ignore the z-buffer, so they always land on top of geometry.
pub fn draw_3d_line_clipped(
    fb: &mut Framebuffer,
    camera: &Camera,
    p0: Vec3,
    p1: Vec3,
    color: Color,
) {
    // Transform to camera space
    let z0 = (p0 - camera.position).dot(camera.basis_z);
    let z1 = (p1 - camera.position).dot(camera.basis_z);

    // Both behind camera - skip entirely
    if z0 <= NEAR_PLANE && z1 <= NEAR_PLANE {
        return;
    }

    // Pull slightly past the near plane so projection accepts the endpoint
    let near = NEAR_PLANE + 0.001;
    let (clipped_p0, clipped_p1) = if z0 <= NEAR_PLANE {
        let t = (near - z0) / (z1 - z0);
        (p0 + (p1 - p0) * t, p1)
    } else if z1 <= NEAR_PLANE {
        let t = (near - z0) / (z1 - z0);
        (p0, p0 + (p1 - p0) * t)
    } else {
        (p0, p1)
    };

    let project = |p: Vec3| {
        world_to_screen(
            p,
            camera.position,
            camera.basis_x,
            camera.basis_y,
            camera.basis_z,
            fb.width,
            fb.height,
        )
    };

    if let (Some((x0, y0)), Some((x1, y1))) = (project(clipped_p0), project(clipped_p1)) {
        fb.draw_line(x0 as i32, y0 as i32, x1 as i32, y1 as i32, color);
    }
}

/// Draw a floor grid on a horizontal plane.
/// Uses short segments for better near-plane clipping behavior.
///
/// # Arguments
/// * `y` - Y height of the grid plane
/// * `spacing` - Distance between grid lines
/// * `extent` - Half-size of the grid (grid goes from -extent to +extent)
pub fn draw_floor_grid(
    fb: &mut Framebuffer,
    camera: &Camera,
    y: f32,
    spacing: f32,
    extent: f32,
    grid_color: Color,
) {
    if spacing <= 0.0 {
        return;
    }

    let mut offset = -extent;
    while offset <= extent {
        let mut along = -extent;
        while along < extent {
            let end = (along + spacing).min(extent);
            // X-parallel segment
            draw_3d_line_clipped(fb, camera, Vec3::new(along, y, offset), Vec3::new(end, y, offset), grid_color);
            // Z-parallel segment
            draw_3d_line_clipped(fb, camera, Vec3::new(offset, y, along), Vec3::new(offset, y, end), grid_color);
            along += spacing;
        }
        offset += spacing;
    }
}
