/// True-color half-block output for a framebuffer
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use raster3d_core::{Color as PixelColor, FrameBuffer};
use std::io::Write;

/// Upper half block: foreground paints the top pixel, background the bottom one.
pub const HALF_BLOCK: char = '\u{2580}';

/// Writes two framebuffer rows per terminal row.
#[derive(Debug, Clone, Copy, Default)]
pub struct HalfBlockPresenter {
    /// Terminal row the first pixel row lands on.
    pub top_row: u16,
}

impl HalfBlockPresenter {
    pub fn new(top_row: u16) -> Self {
        Self { top_row }
    }

    /// Terminal rows needed for a framebuffer of `height` pixel rows.
    pub fn rows_for(height: usize) -> usize {
        (height + 1) / 2
    }

    /// Queues the whole framebuffer; the caller flushes. Color changes are
    /// only emitted when a cell differs from its left neighbour.
    pub fn draw<W: Write + ?Sized>(&self, framebuffer: &FrameBuffer, writer: &mut W) -> std::io::Result<()> {
        for row in 0..Self::rows_for(framebuffer.height()) {
            writer.queue(cursor::MoveTo(0, self.top_row + row as u16))?;
            let mut current: Option<(Color, Color)> = None;

            for x in 0..framebuffer.width() {
                let top = framebuffer.get_pixel(x, row * 2).unwrap_or(PixelColor::BLACK);
                let bottom = framebuffer.get_pixel(x, row * 2 + 1).unwrap_or(PixelColor::BLACK);
                let colors = (to_terminal(top), to_terminal(bottom));

                if current != Some(colors) {
                    writer.queue(SetForegroundColor(colors.0))?;
                    writer.queue(SetBackgroundColor(colors.1))?;
                    current = Some(colors);
                }
                writer.queue(Print(HALF_BLOCK))?;
            }
            writer.queue(ResetColor)?;
        }
        Ok(())
    }
}

fn to_terminal(color: PixelColor) -> Color {
    let [r, g, b, _] = color.to_rgba8();
    Color::Rgb { r, g, b }
}
