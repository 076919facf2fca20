//! Camera for 3D rendering
//!
//! Position plus pitch/yaw; the basis vectors are derived from the angles.

use super::math::Vec3;

/// Camera state for 3D rendering
#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Vec3,
    pub rotation_x: f32, // Pitch
    pub rotation_y: f32, // Yaw

    // Computed basis vectors
    pub basis_x: Vec3,
    pub basis_y: Vec3,
    pub basis_z: Vec3,
}

impl Camera {
    pub fn new() -> Self {
        let mut cam = Self {
            position: Vec3::ZERO,
            rotation_x: 0.0,
            rotation_y: 0.0,
            basis_x: Vec3::new(1.0, 0.0, 0.0),
            basis_y: Vec3::new(0.0, 1.0, 0.0),
            basis_z: Vec3::new(0.0, 0.0, 1.0),
        };
        cam.update_basis();
        cam
    }

    pub fn update_basis(&mut self) {
        let upward = Vec3::new(0.0, -1.0, 0.0);  // -Y is up on screen

        // Forward vector based on rotation
        self.basis_z = Vec3 {
            x: self.rotation_x.cos() * self.rotation_y.sin(),
            y: -self.rotation_x.sin(),
            z: self.rotation_x.cos() * self.rotation_y.cos(),
        };

        // Right vector
        self.basis_x = upward.cross(self.basis_z).normalize();

        // Up vector
        self.basis_y = self.basis_z.cross(self.basis_x);
    }

    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.rotation_y += dy;
        self.rotation_x = (self.rotation_x + dx).clamp(
            -std::f32::consts::FRAC_PI_2 + 0.01,
            std::f32::consts::FRAC_PI_2 - 0.01,
        );
        self.update_basis();
    }

    /// Place the camera `distance` units behind `target` along the view direction
    pub fn orbit(&mut self, target: Vec3, distance: f32) {
        self.update_basis();
        self.position = target - self.basis_z * distance;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basis_is_orthonormal() {
        let mut camera = Camera::new();
        camera.rotate(0.4, 1.1);
        assert!(camera.basis_x.dot(camera.basis_y).abs() < 0.001);
        assert!(camera.basis_x.dot(camera.basis_z).abs() < 0.001);
        assert!((camera.basis_z.len() - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_orbit_looks_at_target() {
        let mut camera = Camera::new();
        camera.rotate(0.3, -0.7);
        let target = Vec3::new(1.0, 2.0, 3.0);
        camera.orbit(target, 10.0);
        let to_target = (target - camera.position).normalize();
        assert!(to_target.dot(camera.basis_z) > 0.999);
        assert!((camera.position.distance(target) - 10.0).abs() < 0.001);
    }
}
