/// 2, 3 and 4 component `f32` vectors with value semantics.
use std::ops::{Add, Div, Index, Mul, Neg, Sub};

use super::EPSILON;
use crate::error::MathError;

/// Generates the arithmetic shared by every vector width.
macro_rules! vector_common {
    ($name:ident, $n:literal, $($field:ident),+) => {
        impl $name {
            pub const ZERO: $name = $name { $($field: 0.0),+ };

            #[inline]
            pub const fn new($($field: f32),+) -> Self {
                Self { $($field),+ }
            }

            /// Builds a vector from a slice, failing unless it has exactly
            #[doc = concat!("`", stringify!($n), "` components.")]
            pub fn from_slice(values: &[f32]) -> Result<Self, MathError> {
                match values {
                    [$($field),+] => Ok(Self { $($field: *$field),+ }),
                    _ => Err(MathError::DimensionMismatch { expected: $n, actual: values.len() }),
                }
            }

            pub fn to_array(self) -> [f32; $n] {
                [$(self.$field),+]
            }

            #[inline]
            pub fn dot(self, other: Self) -> f32 {
                0.0 $(+ self.$field * other.$field)+
            }

            #[inline]
            pub fn length(self) -> f32 {
                self.dot(self).sqrt()
            }

            /// Componentwise (Hadamard) product.
            #[inline]
            pub fn mul_elementwise(self, other: Self) -> Self {
                Self { $($field: self.$field * other.$field),+ }
            }

            /// Unit vector in the same direction.
            ///
            /// Fails with [`MathError::ZeroLengthVector`] when the length is
            /// below [`EPSILON`]; use this where degeneracy means a logic bug.
            pub fn normalize(self) -> Result<Self, MathError> {
                let length = self.length();
                if length < EPSILON {
                    return Err(MathError::ZeroLengthVector);
                }
                Ok(self / length)
            }

            /// Like [`Self::normalize`] but returns `self` unchanged for
            /// near-zero vectors. Used on render-time geometry.
            pub fn normalize_safe(self) -> Self {
                let length = self.length();
                if length < EPSILON {
                    return self;
                }
                self / length
            }

            /// Componentwise comparison with a caller-chosen tolerance.
            pub fn approx_eq(self, other: Self, tolerance: f32) -> bool {
                true $(&& (self.$field - other.$field).abs() < tolerance)+
            }

            pub fn is_finite(self) -> bool {
                true $(&& self.$field.is_finite())+
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                true $(&& (self.$field - other.$field).abs() < EPSILON)+
            }
        }

        impl Add for $name {
            type Output = $name;

            #[inline]
            fn add(self, rhs: $name) -> $name {
                $name { $($field: self.$field + rhs.$field),+ }
            }
        }

        impl Sub for $name {
            type Output = $name;

            #[inline]
            fn sub(self, rhs: $name) -> $name {
                $name { $($field: self.$field - rhs.$field),+ }
            }
        }

        impl Mul<f32> for $name {
            type Output = $name;

            #[inline]
            fn mul(self, s: f32) -> $name {
                $name { $($field: self.$field * s),+ }
            }
        }

        impl Div<f32> for $name {
            type Output = $name;

            #[inline]
            fn div(self, s: f32) -> $name {
                $name { $($field: self.$field / s),+ }
            }
        }

        impl Neg for $name {
            type Output = $name;

            #[inline]
            fn neg(self) -> $name {
                $name { $($field: -self.$field),+ }
            }
        }

        impl Index<usize> for $name {
            type Output = f32;

            fn index(&self, i: usize) -> &f32 {
                let fields = [$(&self.$field),+];
                match fields.get(i) {
                    Some(value) => *value,
                    None => panic!(
                        "component {} out of bounds for {}",
                        i,
                        stringify!($name)
                    ),
                }
            }
        }

        impl From<[f32; $n]> for $name {
            fn from(values: [f32; $n]) -> Self {
                let [$($field),+] = values;
                Self { $($field),+ }
            }
        }
    };
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Homogeneous coordinate. `w = 1` for points, `w = 0` for directions.
#[derive(Debug, Clone, Copy, Default)]
pub struct Vector4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

vector_common!(Vector2, 2, x, y);
vector_common!(Vector3, 3, x, y, z);
vector_common!(Vector4, 4, x, y, z, w);

impl Vector3 {
    pub const UP: Vector3 = Vector3 { x: 0.0, y: 1.0, z: 0.0 };

    pub fn cross(self, other: Vector3) -> Vector3 {
        Vector3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Lifts to homogeneous coordinates with the given `w`.
    pub fn extend(self, w: f32) -> Vector4 {
        Vector4::new(self.x, self.y, self.z, w)
    }
}

impl Vector4 {
    /// Drops `w` without dividing.
    pub fn truncate(self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Perspective divide. Fails when `|w| < EPSILON`.
    pub fn to_vector3(self) -> Result<Vector3, MathError> {
        if self.w.abs() < EPSILON {
            return Err(MathError::ZeroHomogeneousW);
        }
        Ok(self.truncate() / self.w)
    }

    /// Perspective divide that skips the division when `|w| < EPSILON`,
    /// returning `(x, y, z)` unprojected. Callers cannot assume the result
    /// was projected.
    pub fn to_vector3_safe(self) -> Vector3 {
        if self.w.abs() < EPSILON {
            return self.truncate();
        }
        self.truncate() / self.w
    }
}
