//! Per-pixel classification against the two key colors.
//!
//! Precedence is fixed: transparent beats shadow beats opaque. A pixel can
//! sit within tolerance of both keys at once, so the first matching rule
//! decides — overlapping regions must resolve the same way every time.

use super::color::{Color, distance};
use crate::config::KeySettings;

/// What a source pixel becomes after keying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelOutcome {
    Transparent,
    Shadow,
    Opaque,
}

/// Classify one pixel. Deterministic and side-effect free.
///
/// Rules, first match wins:
/// 1. Transparent — within `alpha_tolerance` of `alpha_key` (RGB only),
///    or the source alpha is already zero. Zero alpha is a pre-existing
///    hole regardless of color: BMP sources can carry garbage channels
///    under `a == 0` that must not leak through.
/// 2. Shadow — within `shadow_tolerance` of `shadow_key` (RGB only) or of
///    `shadow_color` (all four channels).
/// 3. Opaque otherwise.
pub fn classify(pixel: Color, keys: &KeySettings) -> PixelOutcome {
    if distance(pixel, keys.alpha_key, false) < keys.alpha_tolerance || pixel.a == 0.0 {
        return PixelOutcome::Transparent;
    }
    if distance(pixel, keys.shadow_key, false) < keys.shadow_tolerance
        || distance(pixel, keys.shadow_color, true) < keys.shadow_tolerance
    {
        return PixelOutcome::Shadow;
    }
    PixelOutcome::Opaque
}
