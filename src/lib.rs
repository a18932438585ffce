//! # color-key
//!
//! Batch color-key recoloring for sprite assets. Every pixel of every
//! source image is reclassified — transparent, flat shadow fill, or fully
//! opaque — by Euclidean color distance against two configurable key
//! colors, then re-encoded to PNG or TGA. Legacy BMP sources are
//! converted to the output container and replaced on disk.
//!
//! # Architecture: Scan → Batch → Report
//!
//! ```text
//! 1. Scan    assets/   →  Vec<SourceEntry>     (filesystem → candidates)
//! 2. Batch   entries   →  Vec<ProcessResult>   (read, key, encode, write)
//! 3. Report  results   →  stdout / report.json
//! ```
//!
//! The batch stage is a per-item pipeline over an [`store::AssetStore`]
//! seam, so its ordering guarantees (legacy originals deleted only after
//! a confirmed replacement write, read-only flags restored on every exit
//! path) are provable in tests with an in-memory store.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Walks the source directory, collects processable rasters with their read-only state |
//! | [`keying`] | Pure core: color distance, two-key classification, buffer recoloring, mip chains |
//! | [`codec`] | PNG/TGA encode, PNG/TGA/BMP decode, 8-bit quantization contract |
//! | [`batch`] | Per-item orchestration, failure isolation, on-disk reconciliation |
//! | [`store`] | Filesystem trait boundary (`FsStore` in production, mock in tests) |
//! | [`config`] | `color-key.toml` loading, validation, stock config generation |
//! | [`output`] | CLI output formatting — per-item lines and summary counts |
//!
//! # Design Decisions
//!
//! ## Fixed Classification Precedence
//!
//! A pixel can sit within tolerance of both keys at once. Transparent
//! beats shadow beats opaque, always — the rules are an ordered
//! early-return chain, not independent flags, so overlapping matches
//! resolve identically on every run. A zero-alpha source pixel is
//! transparent no matter its RGB: legacy BMPs carry garbage alpha that
//! must not leak through.
//!
//! ## Delete-After-Confirmed-Write
//!
//! BMP conversion removes the original only after the replacement is on
//! disk. The delete step is unreachable from any earlier failure branch;
//! a failed write leaves the source byte-for-byte untouched.
//!
//! ## Failures Are Per-Item Data
//!
//! Read, decode, encode and write failures are recorded on the item's
//! result and the batch continues; callers always get one result per
//! input, in input order. The only panics are precondition violations
//! (buffer length vs dimensions) — programmer errors, not input errors.
//!
//! ## 8-Bit Quantization Contract
//!
//! Tolerances live in normalized 0..1 channel space, but PNG/TGA/BMP are
//! 8 bits per channel: one encode/decode cycle moves a channel at most
//! 1/255, and tolerances below ~0.004 are indistinguishable from zero on
//! decoded input. The codec tests pin this bound.

pub mod batch;
pub mod codec;
pub mod config;
pub mod keying;
pub mod output;
pub mod scan;
pub mod store;

#[cfg(test)]
pub(crate) mod test_helpers;
