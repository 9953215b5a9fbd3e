/// Decoded texture raster with nearest-texel sampling.
///
/// Decoding image files is the caller's business; a `Texture` adopts an
/// already-decoded raster and is immutable afterwards, so one instance can be
/// shared (`Arc<Texture>`) across models and frames.
use image::RgbaImage;

use crate::color::Color;
use crate::error::TextureError;

#[derive(Debug, Clone)]
pub struct Texture {
    width: usize,
    height: usize,
    /// Row-major, row 0 is the top of the image.
    pixels: Vec<Color>,
}

impl Texture {
    pub fn new(width: usize, height: usize, pixels: Vec<Color>) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::EmptyDimensions { width, height });
        }
        if pixels.len() != width * height {
            return Err(TextureError::PixelCountMismatch {
                expected: width * height,
                actual: pixels.len(),
            });
        }
        Ok(Self { width, height, pixels })
    }

    /// Adopts a decoded RGBA8 image.
    pub fn from_rgba_image(image: &RgbaImage) -> Result<Self, TextureError> {
        let (width, height) = image.dimensions();
        let pixels = image.pixels().map(|p| Color::from_rgba8(p.0)).collect();
        let texture = Self::new(width as usize, height as usize, pixels)?;
        log::debug!("adopted {}x{} texture", width, height);
        Ok(texture)
    }

    /// Two-color checkerboard with `cells` squares per side.
    pub fn checkerboard(size: usize, cells: usize, a: Color, b: Color) -> Result<Self, TextureError> {
        let cell = (size / cells.max(1)).max(1);
        let pixels = (0..size * size)
            .map(|i| {
                let (x, y) = (i % size, i / size);
                if (x / cell + y / cell) % 2 == 0 {
                    a
                } else {
                    b
                }
            })
            .collect();
        Self::new(size, size, pixels)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Nearest texel for `(u, v)`. Both are clamped to `[0, 1]`; `v = 0` is
    /// the bottom row of the image.
    pub fn get_pixel(&self, u: f32, v: f32) -> Color {
        let u = u.clamp(0.0, 1.0);
        let v = v.clamp(0.0, 1.0);
        // NaN survives clamp; the saturating cast maps it to 0
        let x = ((u * (self.width - 1) as f32) as usize).min(self.width - 1);
        let y = (((1.0 - v) * (self.height - 1) as f32) as usize).min(self.height - 1);
        self.pixels[y * self.width + x]
    }
}
