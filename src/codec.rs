//! Encode/decode between pixel buffers and raster containers.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (PNG, TGA, BMP) | `image::load_from_memory_with_format` |
//! | Encode (PNG, TGA) | `image::DynamicImage::write_to` |
//!
//! PNG and TGA are the output containers; BMP is decode-only, the legacy
//! input format replaced on processing. Decoding takes an extension hint
//! because TGA has no magic bytes to sniff.
//!
//! All three containers are 8 bits per channel, so one encode/decode
//! cycle can move a channel by at most 1/255 (~0.004): key tolerances
//! smaller than that are swallowed by quantization on decoded input.

use crate::keying::{Color, PixelBuffer};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use thiserror::Error;

/// The one input extension that triggers format conversion.
pub const LEGACY_EXTENSION: &str = "bmp";

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("unsupported input format: .{0}")]
    UnsupportedFormat(String),
    #[error("decode failed: {0}")]
    Decode(image::ImageError),
    #[error("cannot encode empty {0}x{1} buffer")]
    EmptyBuffer(u32, u32),
    #[error("encode failed: {0}")]
    Encode(image::ImageError),
}

/// Output container, selected once per batch in `[output] format`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Tga,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Tga => "tga",
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            OutputFormat::Png => ImageFormat::Png,
            OutputFormat::Tga => ImageFormat::Tga,
        }
    }
}

/// Whether an extension (case-insensitive, no dot) is the legacy format.
pub fn is_legacy_extension(extension: &str) -> bool {
    extension.eq_ignore_ascii_case(LEGACY_EXTENSION)
}

/// Map an input extension to its decoder, if one is compiled in.
fn input_format(extension: &str) -> Option<ImageFormat> {
    match extension.to_ascii_lowercase().as_str() {
        "png" => Some(ImageFormat::Png),
        "tga" => Some(ImageFormat::Tga),
        LEGACY_EXTENSION => Some(ImageFormat::Bmp),
        _ => None,
    }
}

/// Decode raw file bytes into a pixel buffer.
///
/// `extension` selects the decoder — TGA in particular cannot be
/// recognized from content alone. Any source channel layout is expanded
/// to RGBA; formats without an alpha channel decode with `a == 1`.
pub fn decode(bytes: &[u8], extension: &str) -> Result<PixelBuffer, CodecError> {
    let format = input_format(extension)
        .ok_or_else(|| CodecError::UnsupportedFormat(extension.to_ascii_lowercase()))?;
    let img = image::load_from_memory_with_format(bytes, format).map_err(CodecError::Decode)?;
    Ok(buffer_from_image(&img.to_rgba8()))
}

/// Encode a pixel buffer into container bytes.
///
/// A zero-dimension buffer is a runtime input condition (e.g. a truncated
/// source), reported as [`CodecError::EmptyBuffer`] rather than panicking.
pub fn encode(buf: &PixelBuffer, format: OutputFormat) -> Result<Vec<u8>, CodecError> {
    if buf.width() == 0 || buf.height() == 0 {
        return Err(CodecError::EmptyBuffer(buf.width(), buf.height()));
    }
    let img = image_from_buffer(buf);
    let mut bytes = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut bytes, format.image_format())
        .map_err(CodecError::Encode)?;
    Ok(bytes.into_inner())
}

fn buffer_from_image(img: &RgbaImage) -> PixelBuffer {
    let pixels = img.pixels().map(|p| Color::from_rgba8(p.0)).collect();
    PixelBuffer::new(img.width(), img.height(), pixels)
}

fn image_from_buffer(buf: &PixelBuffer) -> RgbaImage {
    RgbaImage::from_fn(buf.width(), buf.height(), |x, y| {
        Rgba(buf.get(x, y).to_rgba8())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{bmp_bytes, checker_buffer, solid_buffer};

    fn max_channel_error(a: &PixelBuffer, b: &PixelBuffer) -> f32 {
        a.pixels()
            .iter()
            .zip(b.pixels())
            .flat_map(|(&x, &y)| {
                let x: [f32; 4] = x.into();
                let y: [f32; 4] = y.into();
                (0..4).map(move |i| (x[i] - y[i]).abs())
            })
            .fold(0.0, f32::max)
    }

    #[test]
    fn png_round_trip_within_quantization() {
        let buf = checker_buffer(4, 4);
        let bytes = encode(&buf, OutputFormat::Png).unwrap();
        let back = decode(&bytes, "png").unwrap();
        assert_eq!((back.width(), back.height()), (4, 4));
        assert!(max_channel_error(&buf, &back) <= 1.0 / 255.0);
    }

    #[test]
    fn tga_round_trip_within_quantization() {
        let buf = checker_buffer(3, 5);
        let bytes = encode(&buf, OutputFormat::Tga).unwrap();
        let back = decode(&bytes, "tga").unwrap();
        assert_eq!((back.width(), back.height()), (3, 5));
        assert!(max_channel_error(&buf, &back) <= 1.0 / 255.0);
    }

    #[test]
    fn round_trip_preserves_full_transparency() {
        let buf = solid_buffer(2, 2, Color::new(0.5, 0.5, 0.5, 0.0));
        let bytes = encode(&buf, OutputFormat::Png).unwrap();
        let back = decode(&bytes, "png").unwrap();
        for p in back.pixels() {
            assert_eq!(p.a, 0.0);
        }
    }

    #[test]
    fn bmp_decodes_via_extension_hint() {
        let buf = solid_buffer(3, 2, Color::new(1.0, 0.0, 1.0, 1.0));
        let bytes = bmp_bytes(&buf);
        let back = decode(&bytes, "bmp").unwrap();
        assert_eq!((back.width(), back.height()), (3, 2));
        assert!(max_channel_error(&buf, &back) <= 1.0 / 255.0);
    }

    #[test]
    fn extension_hint_is_case_insensitive() {
        let buf = solid_buffer(1, 1, Color::new(0.2, 0.4, 0.6, 1.0));
        let bytes = encode(&buf, OutputFormat::Png).unwrap();
        assert!(decode(&bytes, "PNG").is_ok());
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let result = decode(&[0u8; 16], "gif");
        assert!(matches!(result, Err(CodecError::UnsupportedFormat(ext)) if ext == "gif"));
    }

    #[test]
    fn malformed_bytes_fail_to_decode() {
        let result = decode(b"not a png at all", "png");
        assert!(matches!(result, Err(CodecError::Decode(_))));
    }

    #[test]
    fn empty_buffer_fails_to_encode() {
        let buf = PixelBuffer::new(0, 0, Vec::new());
        let result = encode(&buf, OutputFormat::Png);
        assert!(matches!(result, Err(CodecError::EmptyBuffer(0, 0))));
    }

    #[test]
    fn legacy_extension_detection() {
        assert!(is_legacy_extension("bmp"));
        assert!(is_legacy_extension("BMP"));
        assert!(!is_legacy_extension("png"));
        assert!(!is_legacy_extension("tga"));
    }

    #[test]
    fn output_format_extensions() {
        assert_eq!(OutputFormat::Png.extension(), "png");
        assert_eq!(OutputFormat::Tga.extension(), "tga");
    }
}
