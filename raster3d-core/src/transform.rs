/// 3D transformation matrices and rotation state
use crate::math::{Matrix4, Vector3};

/// Rotation state around three axes (in radians)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Transform builder for 3D transformations.
///
/// Matrices are row-major and act on column vectors (`M * v`), so
/// translations live in the last column and `A * B` applies `B` first.
pub struct Transform;

impl Transform {
    /// Create a translation matrix
    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix4 {
        Matrix4::new([
            [1.0, 0.0, 0.0, x],
            [0.0, 1.0, 0.0, y],
            [0.0, 0.0, 1.0, z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Create a scale matrix
    pub fn scale_matrix(sx: f32, sy: f32, sz: f32) -> Matrix4 {
        Matrix4::new([
            [sx, 0.0, 0.0, 0.0],
            [0.0, sy, 0.0, 0.0],
            [0.0, 0.0, sz, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_x(angle: f32) -> Matrix4 {
        let (s, c) = angle.sin_cos();
        Matrix4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, -s, 0.0],
            [0.0, s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_y(angle: f32) -> Matrix4 {
        let (s, c) = angle.sin_cos();
        Matrix4::new([
            [c, 0.0, s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_z(angle: f32) -> Matrix4 {
        let (s, c) = angle.sin_cos();
        Matrix4::new([
            [c, -s, 0.0, 0.0],
            [s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Create a rotation matrix from a rotation state
    pub fn rotation_matrix(rotation: &RotationState) -> Matrix4 {
        let rx = Self::rotation_x(rotation.x);
        let ry = Self::rotation_y(rotation.y);
        let rz = Self::rotation_z(rotation.z);

        // Apply rotations in order: Z, Y, X
        rz * ry * rx
    }

    /// `T * Rz * Ry * Rx * S`: scale first, then rotate, then translate.
    pub fn model_matrix(translation: Vector3, rotation: &RotationState, scale: Vector3) -> Matrix4 {
        Self::translation_matrix(translation.x, translation.y, translation.z)
            * Self::rotation_matrix(rotation)
            * Self::scale_matrix(scale.x, scale.y, scale.z)
    }

    /// View matrix for a camera at `eye` looking at `target`.
    ///
    /// View space is left-handed: +x right, +y up, +z forward. Each basis
    /// axis goes through `normalize_safe`, so a degenerate direction (eye on
    /// target, forward parallel to up) leaves a zero axis rather than NaNs.
    pub fn look_at(eye: Vector3, target: Vector3, up: Vector3) -> Matrix4 {
        let forward = (target - eye).normalize_safe();
        let right = up.cross(forward).normalize_safe();
        let true_up = forward.cross(right).normalize_safe();

        Matrix4::new([
            [right.x, right.y, right.z, -right.dot(eye)],
            [true_up.x, true_up.y, true_up.z, -true_up.dot(eye)],
            [forward.x, forward.y, forward.z, -forward.dot(eye)],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Perspective projection. Clip `w` equals view-space z, and after the
    /// divide z maps `near -> -1`, `far -> 1`.
    pub fn perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Matrix4 {
        let f = 1.0 / (fov / 2.0).tan();
        let depth = far - near;
        Matrix4::new([
            [f / aspect, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, (far + near) / depth, -2.0 * far * near / depth],
            [0.0, 0.0, 1.0, 0.0],
        ])
    }

    /// Create a model-view-projection matrix
    pub fn mvp_matrix(model: &Matrix4, view: &Matrix4, projection: &Matrix4) -> Matrix4 {
        *projection * *view * *model
    }

    /// NDC (`-1..1`, y up) to pixel coordinates (`0..width`, y down). z is kept.
    pub fn vertex_to_point(ndc: Vector3, width: usize, height: usize) -> Vector3 {
        Vector3::new(
            (ndc.x + 1.0) * width as f32 / 2.0,
            (1.0 - ndc.y) * height as f32 / 2.0,
            ndc.z,
        )
    }

    /// Applies `m` to a point (w = 1) and divides by the resulting w.
    ///
    /// When `|w| < EPSILON` the divide is skipped and the undivided xyz is
    /// returned, so the result is not guaranteed to be projected.
    pub fn transform_point(m: &Matrix4, p: Vector3) -> Vector3 {
        (*m * p.extend(1.0)).to_vector3_safe()
    }

    /// Applies `m` to a direction (w = 0) and renormalizes it.
    pub fn transform_normal(m: &Matrix4, n: Vector3) -> Vector3 {
        (*m * n.extend(0.0)).truncate().normalize_safe()
    }
}
