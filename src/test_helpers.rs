//! Shared test utilities for the color-key test suite.

use crate::keying::{Color, PixelBuffer};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

/// A `width × height` buffer filled with one color.
pub fn solid_buffer(width: u32, height: u32, color: Color) -> PixelBuffer {
    PixelBuffer::new(
        width,
        height,
        vec![color; width as usize * height as usize],
    )
}

/// A buffer alternating between two distinct opaque colors, so round-trip
/// tests exercise more than one channel pattern.
pub fn checker_buffer(width: u32, height: u32) -> PixelBuffer {
    let a = Color::new(0.8, 0.2, 0.4, 1.0);
    let b = Color::new(0.1, 0.6, 0.9, 0.5);
    let pixels = (0..height)
        .flat_map(|y| (0..width).map(move |x| if (x + y) % 2 == 0 { a } else { b }))
        .collect();
    PixelBuffer::new(width, height, pixels)
}

/// Encode a buffer as PNG bytes.
pub fn png_bytes(buf: &PixelBuffer) -> Vec<u8> {
    crate::codec::encode(buf, crate::codec::OutputFormat::Png).unwrap()
}

/// Encode a buffer as BMP bytes — legacy-format fixtures. Goes through
/// the `image` crate directly since the codec module is decode-only for
/// BMP.
pub fn bmp_bytes(buf: &PixelBuffer) -> Vec<u8> {
    let img = RgbaImage::from_fn(buf.width(), buf.height(), |x, y| {
        Rgba(buf.get(x, y).to_rgba8())
    });
    let mut bytes = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut bytes, ImageFormat::Bmp)
        .unwrap();
    bytes.into_inner()
}
