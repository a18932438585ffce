//! Color value type and the distance metric driving all key matching.
//!
//! Channels are normalized `f32` in `[0.0, 1.0]` — the same space key
//! tolerances are expressed in. Whether two colors "match" is always a
//! distance question against a tolerance, never structural equality, so
//! [`Color`] deliberately does not implement `PartialEq`.

use serde::{Deserialize, Serialize};

/// An RGBA color with normalized `[0, 1]` channels.
///
/// Serialized as a plain 4-element array (`[0.0, 1.0, 1.0, 1.0]`) so key
/// colors read naturally in `color-key.toml`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Convert from 8-bit channels (the precision of PNG/TGA/BMP files).
    pub fn from_rgba8(channels: [u8; 4]) -> Self {
        let [r, g, b, a] = channels;
        Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Quantize to 8-bit channels. Values outside `[0, 1]` are clamped;
    /// rounding means one decode/encode cycle moves a channel ≤ 1/255.
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

impl From<[f32; 4]> for Color {
    fn from([r, g, b, a]: [f32; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

impl From<Color> for [f32; 4] {
    fn from(c: Color) -> Self {
        [c.r, c.g, c.b, c.a]
    }
}

/// Euclidean distance between two colors.
///
/// Over (r, g, b) when `include_alpha` is false, over all four channels
/// when true. No clamping, no side effects.
///
/// # Examples
/// ```
/// # use color_key::keying::{Color, distance};
/// let cyan = Color::new(0.0, 1.0, 1.0, 1.0);
/// assert_eq!(distance(cyan, cyan, true), 0.0);
/// ```
pub fn distance(a: Color, b: Color, include_alpha: bool) -> f32 {
    let dr = a.r - b.r;
    let dg = a.g - b.g;
    let db = a.b - b.b;
    let mut sum = dr * dr + dg * dg + db * db;
    if include_alpha {
        let da = a.a - b.a;
        sum += da * da;
    }
    sum.sqrt()
}
