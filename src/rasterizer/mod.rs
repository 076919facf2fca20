//! PS1-style software rasterizer
//!
//! Just enough of a renderer to preview sketch meshes: flat-shaded,
//! z-buffered triangles and clipped 3D lines into an RGBA framebuffer.
//!
//! # Module Organization
//!
//! - `types` - Color, Vertex, Face, RasterSettings
//! - `math` - Vec3, Mat4 helpers, projection
//! - `camera` - Camera struct for 3D rendering
//! - `render` - Framebuffer and mesh rendering
//! - `draw` - Line and grid drawing
//! - `constants` - Screen resolution constants
//! - `ray` - Ray casting and analytic primitives

pub mod camera;
pub mod constants;
pub mod draw;
pub mod math;
pub mod ray;
pub mod render;
pub mod types;

pub use types::{Color, Face, RasterSettings, ShadingMode, Vertex};

pub use math::{
    Vec3, Mat4, NEAR_PLANE, lerp,
    perspective_transform, project, world_to_screen, world_to_screen_with_depth,
    mat4_identity, mat4_translation, mat4_scaling, mat4_axis_angle, mat4_orientation,
    mat4_mul, mat4_transform_point, mat4_transform_vector, mat4_from_trs,
};

pub use camera::Camera;

pub use render::{Framebuffer, RenderScratch, render_mesh};

pub use draw::{draw_3d_line_clipped, draw_floor_grid};

pub use constants::{WIDTH, HEIGHT, WIDTH_HI, HEIGHT_HI};

pub use ray::{Ray, Sphere, ray_sphere_intersect, screen_to_ray, ray_plane_intersection};
