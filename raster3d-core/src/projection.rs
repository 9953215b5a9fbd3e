/// Camera and projection utilities
use crate::math::{Matrix4, Vector3};
use crate::transform::Transform;

/// Camera configuration for 3D rendering
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub position: Vector3,
    pub target: Vector3,
    pub up: Vector3,
    /// Vertical field of view in radians.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, -5.0),
            target: Vector3::ZERO,
            up: Vector3::UP,
            fov: std::f32::consts::PI / 4.0, // 45 degrees
            aspect: width as f32 / height.max(1) as f32,
            near: 0.1,
            far: 100.0,
        }
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4 {
        Transform::look_at(self.position, self.target, self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4 {
        Transform::perspective(self.fov, self.aspect, self.near, self.far)
    }

    /// Keep the aspect ratio in step with the output size.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}
