//! Vector math for 3D rendering
//!
//! Small, copyable `Vec3` plus row-major 4x4 matrices. Everything the
//! sketch renderer needs to place, scale and orient its proxy meshes.

use std::ops::{Add, Div, Mul, Neg, Sub};
use serde::{Serialize, Deserialize};

/// Anything closer than this (camera-space Z) is clipped
pub const NEAR_PLANE: f32 = 0.1;

/// 3D Vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
    pub const ONE: Vec3 = Vec3 { x: 1.0, y: 1.0, z: 1.0 };
    pub const UP: Vec3 = Vec3 { x: 0.0, y: 1.0, z: 0.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Vector with all three components set to `v`
    pub fn splat(v: f32) -> Self {
        Self { x: v, y: v, z: v }
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn len(self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn distance(self, other: Vec3) -> f32 {
        (other - self).len()
    }

    pub fn normalize(self) -> Vec3 {
        let l = self.len();
        if l == 0.0 {
            return Vec3::ZERO;
        }
        Vec3 {
            x: self.x / l,
            y: self.y / l,
            z: self.z / l,
        }
    }

    pub fn scale(self, s: f32) -> Vec3 {
        Vec3 {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, s: f32) -> Vec3 {
        self.scale(s)
    }
}

impl Div<f32> for Vec3 {
    type Output = Vec3;
    fn div(self, s: f32) -> Vec3 {
        self.scale(1.0 / s)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Vec3 {
        self.scale(-1.0)
    }
}

/// Linear interpolation: `a` at t=0, `b` at t=1
pub fn lerp(t: f32, a: f32, b: f32) -> f32 {
    a + (b - a) * t
}

/// Transform a vertex by camera basis vectors (rotation)
pub fn perspective_transform(v: Vec3, cam_x: Vec3, cam_y: Vec3, cam_z: Vec3) -> Vec3 {
    Vec3 {
        x: v.dot(cam_x),
        y: v.dot(cam_y),
        z: v.dot(cam_z),
    }
}

/// Projection constants (shared with the ray caster)
pub(crate) const PROJ_DISTANCE: f32 = 5.0;
pub(crate) const PROJ_SCALE: f32 = 0.75;

/// Project a camera-space point to screen coordinates.
/// Returns Vec3 where x,y are screen coords and z is the camera-space depth.
pub fn project(v: Vec3, width: usize, height: usize) -> Vec3 {
    let ud = PROJ_DISTANCE;
    let us = ud - 1.0;
    let vs = (width.min(height) as f32 / 2.0) * PROJ_SCALE;

    let denom = v.z + ud;
    if denom.abs() < 0.001 {
        return Vec3::new(width as f32 / 2.0, height as f32 / 2.0, v.z);
    }

    Vec3 {
        x: (v.x * us) / denom * vs + (width as f32 / 2.0),
        y: (v.y * us) / denom * vs + (height as f32 / 2.0),
        z: v.z,
    }
}

/// Project a world-space point to framebuffer coordinates.
pub fn world_to_screen(
    world_pos: Vec3,
    camera_pos: Vec3,
    basis_x: Vec3,
    basis_y: Vec3,
    basis_z: Vec3,
    fb_width: usize,
    fb_height: usize,
) -> Option<(f32, f32)> {
    world_to_screen_with_depth(world_pos, camera_pos, basis_x, basis_y, basis_z, fb_width, fb_height)
        .map(|(x, y, _)| (x, y))
}

/// Project a world-space point to framebuffer coordinates with depth.
/// Returns (screen_x, screen_y, depth) where depth is camera-space Z.
pub fn world_to_screen_with_depth(
    world_pos: Vec3,
    camera_pos: Vec3,
    basis_x: Vec3,
    basis_y: Vec3,
    basis_z: Vec3,
    fb_width: usize,
    fb_height: usize,
) -> Option<(f32, f32, f32)> {
    let cam = perspective_transform(world_pos - camera_pos, basis_x, basis_y, basis_z);

    // Behind camera
    if cam.z <= NEAR_PLANE {
        return None;
    }

    let screen = project(cam, fb_width, fb_height);
    Some((screen.x, screen.y, cam.z))
}

// =============================================================================
// 4x4 Matrix operations (for transforms)
// =============================================================================

/// 4x4 transformation matrix type (row-major, column vectors)
pub type Mat4 = [[f32; 4]; 4];

/// Identity matrix
pub fn mat4_identity() -> Mat4 {
    [
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Create translation matrix
pub fn mat4_translation(t: Vec3) -> Mat4 {
    [
        [1.0, 0.0, 0.0, t.x],
        [0.0, 1.0, 0.0, t.y],
        [0.0, 0.0, 1.0, t.z],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Create non-uniform scaling matrix
pub fn mat4_scaling(s: Vec3) -> Mat4 {
    [
        [s.x, 0.0, 0.0, 0.0],
        [0.0, s.y, 0.0, 0.0],
        [0.0, 0.0, s.z, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Rotation of `angle` radians around a (unit) axis, Rodrigues form
pub fn mat4_axis_angle(axis: Vec3, angle: f32) -> Mat4 {
    let Vec3 { x, y, z } = axis;
    let (s, c) = angle.sin_cos();
    let t = 1.0 - c;

    [
        [c + x * x * t, x * y * t - z * s, x * z * t + y * s, 0.0],
        [y * x * t + z * s, c + y * y * t, y * z * t - x * s, 0.0],
        [z * x * t - y * s, z * y * t + x * s, c + z * z * t, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Rotation that takes the unit vector `up` onto the unit vector `direction`.
///
/// Parallel inputs give the identity. Opposite inputs turn half way around an
/// arbitrary axis perpendicular to `up`.
pub fn mat4_orientation(direction: Vec3, up: Vec3) -> Mat4 {
    const EPSILON: f32 = 1e-6;

    let cos_angle = direction.dot(up).clamp(-1.0, 1.0);
    if cos_angle >= 1.0 - EPSILON {
        return mat4_identity();
    }

    let axis = up.cross(direction);
    if axis.len() < EPSILON {
        // Opposite: any axis perpendicular to up works
        let reference = if up.x.abs() < 0.9 { Vec3::new(1.0, 0.0, 0.0) } else { Vec3::new(0.0, 0.0, 1.0) };
        return mat4_axis_angle(up.cross(reference).normalize(), std::f32::consts::PI);
    }

    mat4_axis_angle(axis.normalize(), cos_angle.acos())
}

/// Multiply two 4x4 matrices
pub fn mat4_mul(a: &Mat4, b: &Mat4) -> Mat4 {
    let mut result = [[0.0; 4]; 4];
    for i in 0..4 {
        for j in 0..4 {
            for k in 0..4 {
                result[i][j] += a[i][k] * b[k][j];
            }
        }
    }
    result
}

/// Transform a point by a 4x4 matrix
pub fn mat4_transform_point(m: &Mat4, p: Vec3) -> Vec3 {
    Vec3::new(
        m[0][0] * p.x + m[0][1] * p.y + m[0][2] * p.z + m[0][3],
        m[1][0] * p.x + m[1][1] * p.y + m[1][2] * p.z + m[1][3],
        m[2][0] * p.x + m[2][1] * p.y + m[2][2] * p.z + m[2][3],
    )
}

/// Transform a direction by a 4x4 matrix (ignores translation)
pub fn mat4_transform_vector(m: &Mat4, v: Vec3) -> Vec3 {
    Vec3::new(
        m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
        m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
        m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
    )
}

/// Translation * rotation * scaling, the order display meshes apply them in
pub fn mat4_from_trs(position: Vec3, rotation: &Mat4, scaling: Vec3) -> Mat4 {
    let rs = mat4_mul(rotation, &mat4_scaling(scaling));
    mat4_mul(&mat4_translation(position), &rs)
}
