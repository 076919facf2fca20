//! Core rendering functions
//! Triangle rasterization into an RGBA framebuffer with a z-buffer

use super::camera::Camera;
use super::math::{perspective_transform, project, Vec3, NEAR_PLANE};
use super::types::{Color, Face, RasterSettings, ShadingMode, Vertex};

/// Framebuffer for software rendering
pub struct Framebuffer {
    pub pixels: Vec<u8>,    // RGBA, 4 bytes per pixel
    pub zbuffer: Vec<f32>,  // Depth buffer
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            zbuffer: vec![f32::MAX; width * height],
            width,
            height,
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        if self.width != width || self.height != height {
            self.width = width;
            self.height = height;
            self.pixels = vec![0; width * height * 4];
            self.zbuffer = vec![f32::MAX; width * height];
        }
    }

    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
        self.zbuffer.fill(f32::MAX);
    }

    /// Read back a pixel (None outside the buffer)
    pub fn get_pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            Some(Color::new(self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]))
        } else {
            None
        }
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            self.pixels[idx..idx + 4].copy_from_slice(&color.to_bytes());
        }
    }

    pub fn set_pixel_with_depth(&mut self, x: usize, y: usize, z: f32, color: Color) -> bool {
        if x < self.width && y < self.height {
            let idx = y * self.width + x;
            if z < self.zbuffer[idx] {
                self.zbuffer[idx] = z;
                let pixel_idx = idx * 4;
                self.pixels[pixel_idx..pixel_idx + 4].copy_from_slice(&color.to_bytes());
                return true;
            }
        }
        false
    }

    /// Draw a line from (x0, y0) to (x1, y1) using Bresenham's algorithm
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let mut x = x0;
        let mut y = y0;

        loop {
            if x >= 0 && y >= 0 {
                self.set_pixel(x as usize, y as usize, color);
            }

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }
}

/// Flat shading intensity from a single directional light
fn shade_intensity_directional(normal: Vec3, light_dir: Vec3, ambient: f32) -> f32 {
    let diffuse = normal.dot(-light_dir).max(0.0);
    (ambient + (1.0 - ambient) * diffuse).clamp(0.0, 1.0)
}

/// Screen-space triangle ready for rasterization
struct Surface {
    v1: Vec3,
    v2: Vec3,
    v3: Vec3,
    color: Color,
}

fn rasterize_triangle(fb: &mut Framebuffer, surface: &Surface, settings: &RasterSettings) {
    let Surface { v1, v2, v3, color } = *surface;

    let min_x = v1.x.min(v2.x).min(v3.x).max(0.0) as usize;
    let max_x = (v1.x.max(v2.x).max(v3.x) + 1.0).min(fb.width as f32) as usize;
    let min_y = v1.y.min(v2.y).min(v3.y).max(0.0) as usize;
    let max_y = (v1.y.max(v2.y).max(v3.y) + 1.0).min(fb.height as f32) as usize;

    // Degenerate or off-screen
    if min_x >= max_x || min_y >= max_y {
        return;
    }

    // Signed area * 2; dividing by it makes the inside test winding-independent
    let area = (v2.y - v3.y) * (v1.x - v3.x) + (v3.x - v2.x) * (v1.y - v3.y);
    if area.abs() < 0.00001 {
        return;
    }
    let inv_area = 1.0 / area;

    let inv_z1 = 1.0 / v1.z;
    let inv_z2 = 1.0 / v2.z;
    let inv_z3 = 1.0 / v3.z;

    for y in min_y..max_y {
        let py = y as f32 + 0.5;
        for x in min_x..max_x {
            let px = x as f32 + 0.5;

            let bc_x = ((v2.y - v3.y) * (px - v3.x) + (v3.x - v2.x) * (py - v3.y)) * inv_area;
            let bc_y = ((v3.y - v1.y) * (px - v3.x) + (v1.x - v3.x) * (py - v3.y)) * inv_area;
            let bc_z = 1.0 - bc_x - bc_y;

            const ERR: f32 = -0.0001;
            if bc_x < ERR || bc_y < ERR || bc_z < ERR {
                continue;
            }

            // 1/z interpolates linearly in screen space
            let z = 1.0 / (bc_x * inv_z1 + bc_y * inv_z2 + bc_z * inv_z3);

            if settings.use_zbuffer {
                fb.set_pixel_with_depth(x, y, z, color);
            } else {
                fb.set_pixel(x, y, color);
            }
        }
    }
}

/// Per-vertex buffers reused across `render_mesh` calls
#[derive(Debug, Clone, Default)]
pub struct RenderScratch {
    cam_space: Vec<Vec3>,
    projected: Vec<Vec3>,
}

impl RenderScratch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize) -> Self {
        Self {
            cam_space: Vec::with_capacity(vertices),
            projected: Vec::with_capacity(vertices),
        }
    }
}

/// Render world-space triangles in a single base color.
///
/// Faces with any vertex behind the near plane are skipped entirely.
/// Returns the number of triangles that reached the rasterizer.
pub fn render_mesh(
    fb: &mut Framebuffer,
    vertices: &[Vertex],
    faces: &[Face],
    color: Color,
    camera: &Camera,
    settings: &RasterSettings,
    scratch: &mut RenderScratch,
) -> usize {
    let RenderScratch { cam_space, projected } = scratch;
    cam_space.clear();
    projected.clear();

    for v in vertices {
        let rel_pos = v.pos - camera.position;
        let cam_pos = perspective_transform(rel_pos, camera.basis_x, camera.basis_y, camera.basis_z);
        cam_space.push(cam_pos);
        projected.push(project(cam_pos, fb.width, fb.height));
    }

    let mut drawn = 0;
    for face in faces {
        let cv1 = cam_space[face.v0];
        let cv2 = cam_space[face.v1];
        let cv3 = cam_space[face.v2];

        if cv1.z <= NEAR_PLANE || cv2.z <= NEAR_PLANE || cv3.z <= NEAR_PLANE {
            continue;
        }

        // Camera-space backface test (camera sits at the origin)
        let normal = (cv2 - cv1).cross(cv3 - cv1);
        if settings.backface_cull && normal.dot(-cv1) <= 0.0 {
            continue;
        }

        let shaded = match settings.shading {
            ShadingMode::None => color,
            ShadingMode::Flat => {
                let w1 = vertices[face.v0].pos;
                let world_normal = (vertices[face.v1].pos - w1)
                    .cross(vertices[face.v2].pos - w1)
                    .normalize();
                color.shade(shade_intensity_directional(world_normal, settings.light_dir, settings.ambient))
            }
        };

        let surface = Surface {
            v1: projected[face.v0],
            v2: projected[face.v1],
            v3: projected[face.v2],
            color: shaded,
        };
        rasterize_triangle(fb, &surface, settings);
        drawn += 1;
    }

    drawn
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Camera at the origin looking down +Z
    fn front_camera() -> Camera {
        Camera::new()
    }

    /// Triangle at z=5 wound to face the origin
    fn facing_triangle(z: f32) -> Vec<Vertex> {
        vec![
            Vertex::from_pos(-1.0, -1.0, z),
            Vertex::from_pos(0.0, 1.0, z),
            Vertex::from_pos(1.0, -1.0, z),
        ]
    }

    fn facing_face(vertices: &[Vertex], camera: &Camera) -> Face {
        // Pick the winding that points toward the camera
        let cv: Vec<Vec3> = vertices
            .iter()
            .map(|v| perspective_transform(v.pos - camera.position, camera.basis_x, camera.basis_y, camera.basis_z))
            .collect();
        let normal = (cv[1] - cv[0]).cross(cv[2] - cv[0]);
        if normal.dot(-cv[0]) > 0.0 { Face::new(0, 1, 2) } else { Face::new(0, 2, 1) }
    }

    #[test]
    fn test_clear_sets_every_pixel() {
        let mut fb = Framebuffer::new(4, 3);
        fb.clear(Color::RED);
        assert_eq!(fb.get_pixel(3, 2), Some(Color::RED));
        assert!(fb.zbuffer.iter().all(|z| *z == f32::MAX));
    }

    #[test]
    fn test_draw_line_endpoints() {
        let mut fb = Framebuffer::new(10, 10);
        fb.clear(Color::BLACK);
        fb.draw_line(1, 1, 8, 5, Color::WHITE);
        assert_eq!(fb.get_pixel(1, 1), Some(Color::WHITE));
        assert_eq!(fb.get_pixel(8, 5), Some(Color::WHITE));
    }

    #[test]
    fn test_render_triangle_covers_center() {
        let camera = front_camera();
        let mut fb = Framebuffer::new(64, 64);
        fb.clear(Color::BLACK);
        let vertices = facing_triangle(5.0);
        let face = facing_face(&vertices, &camera);
        let settings = RasterSettings { shading: ShadingMode::None, ..RasterSettings::default() };

        let drawn = render_mesh(&mut fb, &vertices, &[face], Color::GREEN, &camera, &settings, &mut RenderScratch::new());
        assert_eq!(drawn, 1);
        assert_eq!(fb.get_pixel(32, 32), Some(Color::GREEN));
    }

    #[test]
    fn test_backface_is_culled() {
        let camera = front_camera();
        let mut fb = Framebuffer::new(64, 64);
        let vertices = facing_triangle(5.0);
        let front = facing_face(&vertices, &camera);
        let back = Face::new(front.v0, front.v2, front.v1);

        let drawn = render_mesh(&mut fb, &vertices, &[back], Color::GREEN, &camera, &RasterSettings::default(), &mut RenderScratch::new());
        assert_eq!(drawn, 0);
    }

    #[test]
    fn test_zbuffer_keeps_nearest() {
        let camera = front_camera();
        let mut fb = Framebuffer::new(64, 64);
        fb.clear(Color::BLACK);
        let settings = RasterSettings { shading: ShadingMode::None, ..RasterSettings::default() };

        let near = facing_triangle(4.0);
        let far = facing_triangle(8.0);
        let near_face = facing_face(&near, &camera);
        let far_face = facing_face(&far, &camera);

        render_mesh(&mut fb, &near, &[near_face], Color::RED, &camera, &settings, &mut RenderScratch::new());
        render_mesh(&mut fb, &far, &[far_face], Color::BLUE, &camera, &settings, &mut RenderScratch::new());
        assert_eq!(fb.get_pixel(32, 32), Some(Color::RED));
    }

    #[test]
    fn test_behind_near_plane_skipped() {
        let camera = front_camera();
        let mut fb = Framebuffer::new(64, 64);
        let vertices = facing_triangle(-5.0);
        let drawn = render_mesh(&mut fb, &vertices, &[Face::new(0, 1, 2)], Color::RED, &camera, &RasterSettings::default(), &mut RenderScratch::new());
        assert_eq!(drawn, 0);
    }

    #[test]
    fn test_scratch_buffers_are_reused() {
        let camera = front_camera();
        let mut fb = Framebuffer::new(64, 64);
        let vertices = facing_triangle(5.0);
        let face = facing_face(&vertices, &camera);
        let settings = RasterSettings::default();
        let mut scratch = RenderScratch::new();

        render_mesh(&mut fb, &vertices, &[face], Color::RED, &camera, &settings, &mut scratch);
        let cam_space = scratch.cam_space.as_ptr();
        let projected = scratch.projected.as_ptr();
        assert_eq!(scratch.cam_space.len(), 3);

        let drawn = render_mesh(&mut fb, &vertices, &[face], Color::RED, &camera, &settings, &mut scratch);
        assert_eq!(drawn, 1);
        assert_eq!(scratch.cam_space.len(), 3);
        assert_eq!(scratch.cam_space.as_ptr(), cam_space);
        assert_eq!(scratch.projected.as_ptr(), projected);
    }
}
