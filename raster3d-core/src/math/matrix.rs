/// Row-major 3x3 and 4x4 `f32` matrices backed by flat fixed-size arrays.
use std::ops::{Index, IndexMut, Mul};

use super::vector::{Vector3, Vector4};
use super::EPSILON;
use crate::error::MathError;

/// Generates storage, accessors and the products shared by both ranks.
macro_rules! matrix_common {
    ($name:ident, $n:literal, $vector:ident) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name {
            data: [f32; $n * $n],
        }

        impl $name {
            pub const RANK: usize = $n;

            #[inline]
            const fn offset(row: usize, col: usize) -> usize {
                row * $n + col
            }

            fn check(row: usize, col: usize) -> Result<usize, MathError> {
                if row >= $n || col >= $n {
                    return Err(MathError::IndexOutOfBounds { row, col, rank: $n });
                }
                Ok(Self::offset(row, col))
            }

            pub fn new(rows: [[f32; $n]; $n]) -> Self {
                let mut m = Self::zero();
                for (r, row) in rows.iter().enumerate() {
                    for (c, value) in row.iter().enumerate() {
                        m.data[Self::offset(r, c)] = *value;
                    }
                }
                m
            }

            /// Builds a matrix from row-major values; the slice must hold
            /// exactly `RANK * RANK` entries.
            pub fn from_slice(values: &[f32]) -> Result<Self, MathError> {
                if values.len() != $n * $n {
                    return Err(MathError::DimensionMismatch {
                        expected: $n * $n,
                        actual: values.len(),
                    });
                }
                let mut data = [0.0; $n * $n];
                data.copy_from_slice(values);
                Ok(Self { data })
            }

            /// Builds a matrix from a ragged row list, rejecting anything that
            /// is not exactly `RANK` rows of `RANK` values.
            pub fn from_rows(rows: &[&[f32]]) -> Result<Self, MathError> {
                if rows.len() != $n {
                    return Err(MathError::DimensionMismatch { expected: $n, actual: rows.len() });
                }
                let mut m = Self::zero();
                for (r, row) in rows.iter().enumerate() {
                    if row.len() != $n {
                        return Err(MathError::DimensionMismatch { expected: $n, actual: row.len() });
                    }
                    for (c, value) in row.iter().enumerate() {
                        m.data[Self::offset(r, c)] = *value;
                    }
                }
                Ok(m)
            }

            pub fn zero() -> Self {
                Self { data: [0.0; $n * $n] }
            }

            pub fn identity() -> Self {
                let mut m = Self::zero();
                m.set_identity();
                m
            }

            /// Re-initializes in place to the identity.
            pub fn set_identity(&mut self) {
                self.set_zero();
                for i in 0..$n {
                    self.data[Self::offset(i, i)] = 1.0;
                }
            }

            /// Re-initializes in place to all zeros.
            pub fn set_zero(&mut self) {
                self.data = [0.0; $n * $n];
            }

            pub fn get(&self, row: usize, col: usize) -> Result<f32, MathError> {
                Ok(self.data[Self::check(row, col)?])
            }

            pub fn set(&mut self, row: usize, col: usize, value: f32) -> Result<(), MathError> {
                let i = Self::check(row, col)?;
                self.data[i] = value;
                Ok(())
            }

            pub fn row(&self, row: usize) -> Result<$vector, MathError> {
                let start = Self::check(row, 0)?;
                $vector::from_slice(&self.data[start..start + $n])
            }

            pub fn as_slice(&self) -> &[f32] {
                &self.data
            }

            pub fn transpose(&self) -> Self {
                let mut t = Self::zero();
                for r in 0..$n {
                    for c in 0..$n {
                        t.data[Self::offset(c, r)] = self.data[Self::offset(r, c)];
                    }
                }
                t
            }

            pub fn approx_eq(&self, other: &Self, tolerance: f32) -> bool {
                self.data
                    .iter()
                    .zip(other.data.iter())
                    .all(|(a, b)| (a - b).abs() < tolerance)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::identity()
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.approx_eq(other, EPSILON)
            }
        }

        impl Index<(usize, usize)> for $name {
            type Output = f32;

            fn index(&self, (row, col): (usize, usize)) -> &f32 {
                match Self::check(row, col) {
                    Ok(i) => &self.data[i],
                    Err(err) => panic!("{}", err),
                }
            }
        }

        impl IndexMut<(usize, usize)> for $name {
            fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f32 {
                match Self::check(row, col) {
                    Ok(i) => &mut self.data[i],
                    Err(err) => panic!("{}", err),
                }
            }
        }

        impl Mul for $name {
            type Output = $name;

            fn mul(self, rhs: $name) -> $name {
                let mut out = $name::zero();
                for r in 0..$n {
                    for c in 0..$n {
                        let mut sum = 0.0;
                        for k in 0..$n {
                            sum += self.data[Self::offset(r, k)] * rhs.data[Self::offset(k, c)];
                        }
                        out.data[Self::offset(r, c)] = sum;
                    }
                }
                out
            }
        }

        impl Mul<$vector> for $name {
            type Output = $vector;

            /// Row-by-vector product: `out[r] = sum_k m[r][k] * v[k]`.
            fn mul(self, v: $vector) -> $vector {
                let v = v.to_array();
                let mut out = [0.0; $n];
                for (r, value) in out.iter_mut().enumerate() {
                    for (k, component) in v.iter().enumerate() {
                        *value += self.data[Self::offset(r, k)] * component;
                    }
                }
                $vector::from(out)
            }
        }

        impl Mul<f32> for $name {
            type Output = $name;

            fn mul(self, s: f32) -> $name {
                let mut out = self;
                for value in out.data.iter_mut() {
                    *value *= s;
                }
                out
            }
        }
    };
}

matrix_common!(Matrix3, 3, Vector3);
matrix_common!(Matrix4, 4, Vector4);

impl Matrix3 {
    /// Determinant by the rule of Sarrus.
    pub fn determinant(&self) -> f32 {
        let m = |r: usize, c: usize| self.data[Self::offset(r, c)];
        m(0, 0) * m(1, 1) * m(2, 2) + m(0, 1) * m(1, 2) * m(2, 0) + m(0, 2) * m(1, 0) * m(2, 1)
            - m(0, 2) * m(1, 1) * m(2, 0)
            - m(0, 0) * m(1, 2) * m(2, 1)
            - m(0, 1) * m(1, 0) * m(2, 2)
    }
}

impl Matrix4 {
    /// The 3x3 submatrix left after deleting `row` and `col`.
    pub fn minor(&self, row: usize, col: usize) -> Result<Matrix3, MathError> {
        Self::check(row, col)?;
        let mut out = [0.0; 9];
        let mut i = 0;
        for r in (0..4).filter(|&r| r != row) {
            for c in (0..4).filter(|&c| c != col) {
                out[i] = self.data[Self::offset(r, c)];
                i += 1;
            }
        }
        Matrix3::from_slice(&out)
    }

    /// Signed minor determinant `(-1)^(row+col) * det(minor(row, col))`.
    pub fn cofactor(&self, row: usize, col: usize) -> Result<f32, MathError> {
        let sign = if (row + col) % 2 == 0 { 1.0 } else { -1.0 };
        Ok(sign * self.minor(row, col)?.determinant())
    }

    /// Cofactor expansion along row 0.
    pub fn determinant(&self) -> f32 {
        let mut det = 0.0;
        for col in 0..4 {
            // indices are in range by construction
            if let Ok(cofactor) = self.cofactor(0, col) {
                det += self.data[Self::offset(0, col)] * cofactor;
            }
        }
        det
    }

    /// Adjugate divided by the determinant.
    ///
    /// Fails with [`MathError::SingularMatrix`] when `|det| < EPSILON`, which
    /// happens for zero-scale or collapsed-basis transforms.
    pub fn inverse(&self) -> Result<Matrix4, MathError> {
        let determinant = self.determinant();
        if determinant.abs() < EPSILON {
            return Err(MathError::SingularMatrix { determinant });
        }

        let mut cofactors = Matrix4::zero();
        for r in 0..4 {
            for c in 0..4 {
                cofactors.data[Self::offset(r, c)] = self.cofactor(r, c)?;
            }
        }
        Ok(cofactors.transpose() * (1.0 / determinant))
    }
}
