//! Display meshes
//!
//! A `DisplayMesh` is local-space geometry plus a per-draw transform
//! (position, scaling, rotation) and a flat color. Proxy shapes like the
//! sketch node sphere are built once and re-posed for every draw through
//! the `ProxyMesh` trait, so a frame never allocates new geometry.

pub mod util;

use crate::rasterizer::{
    Camera, Color, Face, Framebuffer, Mat4, RasterSettings, RenderScratch, Vec3, Vertex,
    mat4_from_trs, mat4_identity, mat4_transform_point, mat4_transform_vector, render_mesh,
};

/// A reusable, re-posable renderable.
///
/// Setters only change state for the next `draw`; nothing is rendered until
/// `draw` is called.
pub trait ProxyMesh {
    fn set_position(&mut self, position: Vec3);
    fn set_scaling(&mut self, scaling: Vec3);
    fn set_rotation(&mut self, rotation: Mat4);
    fn set_color(&mut self, color: Color);

    /// Back to identity placement (color is kept)
    fn reset_transform(&mut self) {
        self.set_position(Vec3::ZERO);
        self.set_scaling(Vec3::ONE);
        self.set_rotation(mat4_identity());
    }

    fn draw(&mut self, fb: &mut Framebuffer, camera: &Camera);
}

/// Triangle mesh with placement and color
#[derive(Debug, Clone)]
pub struct DisplayMesh {
    vertices: Vec<Vertex>,
    faces: Vec<Face>,
    position: Vec3,
    scaling: Vec3,
    rotation: Mat4,
    color: Color,
    pub settings: RasterSettings,
    /// World-space positions of `vertices`, refilled on every draw
    world: Vec<Vertex>,
    raster: RenderScratch,
}

impl DisplayMesh {
    pub fn new() -> Self {
        Self::from_parts(Vec::new(), Vec::new())
    }

    pub fn from_parts(vertices: Vec<Vertex>, faces: Vec<Face>) -> Self {
        Self {
            world: Vec::with_capacity(vertices.len()),
            raster: RenderScratch::with_capacity(vertices.len()),
            vertices,
            faces,
            position: Vec3::ZERO,
            scaling: Vec3::ONE,
            rotation: mat4_identity(),
            color: Color::NEUTRAL,
            settings: RasterSettings::default(),
        }
    }

    /// Append a vertex, returning its index
    pub fn add_vertex(&mut self, pos: Vec3) -> usize {
        self.vertices.push(Vertex::new(pos, Vec3::ZERO));
        self.vertices.len() - 1
    }

    pub fn add_face(&mut self, v0: usize, v1: usize, v2: usize) {
        self.faces.push(Face::new(v0, v1, v2));
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn scaling(&self) -> Vec3 {
        self.scaling
    }

    pub fn rotation(&self) -> &Mat4 {
        &self.rotation
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Local -> world transform for the current placement
    pub fn model_matrix(&self) -> Mat4 {
        mat4_from_trs(self.position, &self.rotation, self.scaling)
    }

    /// Apply the current placement to the vertices and reset it to identity
    pub fn bake_transform(&mut self) {
        let m = self.model_matrix();
        for v in &mut self.vertices {
            v.pos = mat4_transform_point(&m, v.pos);
            v.normal = mat4_transform_vector(&m, v.normal).normalize();
        }
        self.position = Vec3::ZERO;
        self.scaling = Vec3::ONE;
        self.rotation = mat4_identity();
    }

    /// Render with the current placement, returning the triangles drawn.
    ///
    /// Only positions are transformed: flat shading rebuilds face normals.
    pub fn render(&mut self, fb: &mut Framebuffer, camera: &Camera) -> usize {
        let m = self.model_matrix();

        self.world.clear();
        self.world.extend(self.vertices.iter().map(|v| Vertex::new(mat4_transform_point(&m, v.pos), Vec3::ZERO)));

        render_mesh(fb, &self.world, &self.faces, self.color, camera, &self.settings, &mut self.raster)
    }
}

impl Default for DisplayMesh {
    fn default() -> Self {
        Self::new()
    }
}

impl ProxyMesh for DisplayMesh {
    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn set_scaling(&mut self, scaling: Vec3) {
        self.scaling = scaling;
    }

    fn set_rotation(&mut self, rotation: Mat4) {
        self.rotation = rotation;
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn draw(&mut self, fb: &mut Framebuffer, camera: &Camera) {
        self.render(fb, camera);
    }
}
