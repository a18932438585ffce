//! Buffer-level recoloring and mip chain generation.
//!
//! [`transform`] applies the per-pixel classification to a whole buffer.
//! [`mip_chain`] produces progressively halved levels for callers that
//! want them; PNG/TGA cannot embed a chain, so the batch stage writes
//! levels as sidecar files when mips are requested.

use super::buffer::PixelBuffer;
use super::classify::{PixelOutcome, classify};
use super::color::Color;
use crate::config::KeySettings;

/// Recolor a buffer: classify every pixel and rewrite it.
///
/// - Transparent → same RGB, alpha 0.
/// - Shadow → replaced wholesale by `keys.shadow_color`.
/// - Opaque → same RGB, alpha 1 (legacy sources carry inconsistent alpha;
///   everything that survives keying becomes fully opaque).
///
/// Allocates a new buffer of identical dimensions. The source is never
/// mutated, so classification of a pixel cannot observe earlier rewrites.
pub fn transform(src: &PixelBuffer, keys: &KeySettings) -> PixelBuffer {
    let pixels = src
        .pixels()
        .iter()
        .map(|&p| match classify(p, keys) {
            PixelOutcome::Transparent => Color { a: 0.0, ..p },
            PixelOutcome::Shadow => keys.shadow_color,
            PixelOutcome::Opaque => Color { a: 1.0, ..p },
        })
        .collect();
    PixelBuffer::new(src.width(), src.height(), pixels)
}

/// Generate the mip chain below `base`: successive box-filtered halvings
/// down to 1×1. The base level itself is not included; a 1×1 buffer has
/// an empty chain.
pub fn mip_chain(base: &PixelBuffer) -> Vec<PixelBuffer> {
    let mut levels: Vec<PixelBuffer> = Vec::new();
    loop {
        let prev = levels.last().unwrap_or(base);
        if prev.width() <= 1 && prev.height() <= 1 {
            break;
        }
        let next = halve(prev);
        levels.push(next);
    }
    levels
}

/// One mip step: each texel averages the 2×2 source block under it.
/// Non-even edges reuse the last row/column, so 1×N strips still halve.
fn halve(src: &PixelBuffer) -> PixelBuffer {
    let width = (src.width() / 2).max(1);
    let height = (src.height() / 2).max(1);
    let mut pixels = Vec::with_capacity(width as usize * height as usize);

    for y in 0..height {
        for x in 0..width {
            let x0 = (x * 2).min(src.width() - 1);
            let y0 = (y * 2).min(src.height() - 1);
            let x1 = (x0 + 1).min(src.width() - 1);
            let y1 = (y0 + 1).min(src.height() - 1);

            let samples = [
                src.get(x0, y0),
                src.get(x1, y0),
                src.get(x0, y1),
                src.get(x1, y1),
            ];
            let mut sum = [0.0f32; 4];
            for s in samples {
                sum[0] += s.r;
                sum[1] += s.g;
                sum[2] += s.b;
                sum[3] += s.a;
            }
            pixels.push(Color::new(
                sum[0] / 4.0,
                sum[1] / 4.0,
                sum[2] / 4.0,
                sum[3] / 4.0,
            ));
        }
    }

    PixelBuffer::new(width, height, pixels)
}
