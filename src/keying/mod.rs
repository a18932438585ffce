//! Pixel keying — pure, I/O-free core of the pipeline.
//!
//! | Stage | Module |
//! |---|---|
//! | **Distance metric** | [`color`] — normalized RGBA + Euclidean distance |
//! | **Classification** | [`classify`] — transparent / shadow / opaque, fixed precedence |
//! | **Recoloring** | [`transform`] — new buffer, source untouched, optional mip chain |
//!
//! Everything here is deterministic given its inputs and testable without
//! touching the filesystem or an encoder.

pub mod buffer;
pub mod classify;
pub mod color;
pub mod transform;

pub use buffer::PixelBuffer;
pub use classify::{PixelOutcome, classify};
pub use color::{Color, distance};
pub use transform::{mip_chain, transform};
