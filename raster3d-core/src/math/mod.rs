/// Linear algebra kernel: small value-type vectors and fixed-size matrices.

pub mod interop;
pub mod matrix;
pub mod vector;

pub use matrix::{Matrix3, Matrix4};
pub use vector::{Vector2, Vector3, Vector4};

/// Tolerance shared by equality, normalization, singularity and divide guards.
pub const EPSILON: f32 = 1e-7;
