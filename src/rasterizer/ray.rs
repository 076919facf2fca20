//! Ray casting utilities for 3D picking and drag operations
//!
//! Provides the inverse of the rasterizer projection (screen -> ray) and the
//! analytic primitives picking is built on.

use super::camera::Camera;
use super::math::{Vec3, PROJ_DISTANCE, PROJ_SCALE};

/// A 3D ray with origin and direction
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,  // Normalized
}

impl Ray {
    /// Create a new ray, normalizing the direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize()
        }
    }

    /// Ray from `origin` through `target`
    pub fn towards(origin: Vec3, target: Vec3) -> Self {
        Self::new(origin, target - origin)
    }

    /// Get point at distance t along ray
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// A sphere given by center and radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Analytic ray/sphere test.
///
/// Returns the smallest positive ray parameter at which the ray enters (or,
/// when starting inside, leaves) the sphere. Hits at or behind the origin
/// are rejected.
pub fn ray_sphere_intersect(ray: &Ray, sphere: &Sphere) -> Option<f32> {
    let oc = ray.origin - sphere.center;
    let b = ray.direction.dot(oc);
    let c = oc.dot(oc) - sphere.radius * sphere.radius;
    let discriminant = b * b - c;

    if discriminant < 0.0 {
        return None;
    }

    let root = discriminant.sqrt();
    let t0 = -b - root;
    let t1 = -b + root;

    if t0 > 0.0 {
        Some(t0)
    } else if t1 > 0.0 {
        Some(t1)
    } else {
        None
    }
}

/// Generate a ray from screen coordinates through the camera.
///
/// The projection divides by `cam_z + DISTANCE`, i.e. rays converge at a
/// virtual eye DISTANCE units behind the camera. The returned origin is where
/// that ray crosses the camera plane (cam_z = 0).
pub fn screen_to_ray(
    screen_x: f32,
    screen_y: f32,
    screen_width: usize,
    screen_height: usize,
    camera: &Camera,
) -> Ray {
    let vs = (screen_width.min(screen_height) as f32 / 2.0) * PROJ_SCALE;
    let us = PROJ_DISTANCE - 1.0;

    let ndc_x = (screen_x - screen_width as f32 / 2.0) / vs;
    let ndc_y = (screen_y - screen_height as f32 / 2.0) / vs;

    // cam_x = ndc_x * (cam_z + DISTANCE) / us
    let origin = camera.position
        + camera.basis_x * (ndc_x * PROJ_DISTANCE / us)
        + camera.basis_y * (ndc_y * PROJ_DISTANCE / us);
    let world_dir = camera.basis_x * (ndc_x / us)
        + camera.basis_y * (ndc_y / us)
        + camera.basis_z;

    Ray::new(origin, world_dir)
}

/// Find the intersection of a ray with a plane.
///
/// Returns the distance along the ray to the intersection point,
/// or None if the ray is parallel to the plane or intersection is behind ray origin.
pub fn ray_plane_intersection(
    ray: &Ray,
    plane_point: Vec3,
    plane_normal: Vec3,
) -> Option<f32> {
    let denom = ray.direction.dot(plane_normal);
    if denom.abs() < 0.0001 {
        return None;  // Ray parallel to plane
    }

    let t = (plane_point - ray.origin).dot(plane_normal) / denom;
    if t < 0.0 {
        return None;  // Intersection behind ray origin
    }

    Some(t)
}
