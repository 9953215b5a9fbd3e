/// Error values for the fail-fast operations of the math kernel and texture setup.
///
/// The rasterizer and the orchestrator never produce these: render-time
/// geometry goes through the `*_safe` variants instead.
use std::fmt;

/// Programmer-error conditions raised by the math kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MathError {
    /// `normalize` was called on a vector shorter than [`crate::math::EPSILON`].
    ZeroLengthVector,
    /// A strict homogeneous divide hit `|w| < EPSILON`.
    ZeroHomogeneousW,
    /// `inverse` was called on a matrix with `|det| < EPSILON`.
    SingularMatrix { determinant: f32 },
    /// A row/column index outside `0..rank`.
    IndexOutOfBounds { row: usize, col: usize, rank: usize },
    /// A slice of the wrong length was handed to a fixed-size constructor.
    DimensionMismatch { expected: usize, actual: usize },
}

impl fmt::Display for MathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MathError::ZeroLengthVector => write!(f, "cannot normalize a zero-length vector"),
            MathError::ZeroHomogeneousW => write!(f, "homogeneous w is zero, cannot divide"),
            MathError::SingularMatrix { determinant } => {
                write!(f, "matrix is singular (determinant {determinant})")
            }
            MathError::IndexOutOfBounds { row, col, rank } => {
                write!(f, "index ({row}, {col}) out of bounds for a {rank}x{rank} matrix")
            }
            MathError::DimensionMismatch { expected, actual } => {
                write!(f, "expected {expected} components, got {actual}")
            }
        }
    }
}

impl std::error::Error for MathError {}

/// Rejected texture rasters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureError {
    /// Width or height is zero.
    EmptyDimensions { width: usize, height: usize },
    /// The pixel buffer does not hold `width * height` entries.
    PixelCountMismatch { expected: usize, actual: usize },
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureError::EmptyDimensions { width, height } => {
                write!(f, "texture has empty dimensions {width}x{height}")
            }
            TextureError::PixelCountMismatch { expected, actual } => {
                write!(f, "texture expects {expected} pixels, got {actual}")
            }
        }
    }
}

impl std::error::Error for TextureError {}
