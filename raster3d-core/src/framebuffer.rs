/// Pixel output: the [`PixelSink`] seam and an in-memory color buffer.
use image::RgbaImage;

use crate::color::Color;

/// The rasterizer's only output channel. Storage and device semantics belong
/// to the implementor; coordinates may fall outside any valid range and must
/// then be ignored.
pub trait PixelSink {
    fn set_pixel(&mut self, x: i32, y: i32, color: Color);
}

/// Row-major color buffer, row 0 at the top.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::BLACK; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    /// Quantizes to an RGBA8 image, e.g. for PNG export.
    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            image::Rgba(self.pixels[y as usize * self.width + x as usize].to_rgba8())
        })
    }
}

impl PixelSink for FrameBuffer {
    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        self.pixels[y as usize * self.width + x as usize] = color;
    }
}
