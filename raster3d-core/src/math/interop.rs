/// Conversions to and from `nalgebra`, for callers that already hold
/// nalgebra geometry (and as an independent oracle in tests).
use super::{Matrix4, Vector3, Vector4};

impl From<nalgebra::Vector3<f32>> for Vector3 {
    fn from(v: nalgebra::Vector3<f32>) -> Self {
        Vector3::new(v.x, v.y, v.z)
    }
}

impl From<Vector3> for nalgebra::Vector3<f32> {
    fn from(v: Vector3) -> Self {
        nalgebra::Vector3::new(v.x, v.y, v.z)
    }
}

impl From<nalgebra::Point3<f32>> for Vector3 {
    fn from(p: nalgebra::Point3<f32>) -> Self {
        Vector3::new(p.x, p.y, p.z)
    }
}

impl From<nalgebra::Vector4<f32>> for Vector4 {
    fn from(v: nalgebra::Vector4<f32>) -> Self {
        Vector4::new(v.x, v.y, v.z, v.w)
    }
}

impl From<Vector4> for nalgebra::Vector4<f32> {
    fn from(v: Vector4) -> Self {
        nalgebra::Vector4::new(v.x, v.y, v.z, v.w)
    }
}

impl From<nalgebra::Matrix4<f32>> for Matrix4 {
    fn from(m: nalgebra::Matrix4<f32>) -> Self {
        let mut out = Matrix4::zero();
        for r in 0..4 {
            for c in 0..4 {
                out[(r, c)] = m[(r, c)];
            }
        }
        out
    }
}

impl From<Matrix4> for nalgebra::Matrix4<f32> {
    fn from(m: Matrix4) -> Self {
        // nalgebra storage is column-major; from_row_slice handles the flip
        nalgebra::Matrix4::from_row_slice(m.as_slice())
    }
}
