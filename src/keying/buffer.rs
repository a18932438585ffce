//! Row-major RGBA pixel buffer shared by the transform and codec stages.

use super::color::Color;

/// A decoded image: `width × height` colors in row-major order.
///
/// The length invariant (`pixels.len() == width * height`) holds at every
/// stage; violating it is programmer error and panics immediately rather
/// than surfacing as a per-item batch failure.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl PixelBuffer {
    /// # Panics
    /// Panics if `pixels.len() != width * height`.
    pub fn new(width: u32, height: u32, pixels: Vec<Color>) -> Self {
        assert_eq!(
            pixels.len(),
            width as usize * height as usize,
            "pixel buffer length {} does not match {width}x{height}",
            pixels.len(),
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// # Panics
    /// Panics if `(x, y)` is outside the buffer.
    pub fn get(&self, x: u32, y: u32) -> Color {
        assert!(x < self.width && y < self.height, "({x}, {y}) out of bounds");
        self.pixels[(y * self.width + x) as usize]
    }
}
