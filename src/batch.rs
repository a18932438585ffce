//! Batch orchestration: read → decode → transform → encode → write →
//! reconcile, one result per source image.
//!
//! ## Per-item isolation
//!
//! Every failure kind ([`FailureReason`]) is local to one item: it is
//! recorded on that item's [`ProcessResult`] and the batch carries on.
//! The result list always has exactly one entry per input, in input
//! order. The only loud exits are precondition violations (a pixel
//! buffer whose length disagrees with its dimensions), which are
//! programmer errors and panic instead of becoming results.
//!
//! ## Crash safety
//!
//! A legacy (BMP) source is removed only after its replacement has been
//! confirmed written; any earlier failure leaves the original untouched.
//!
//! ## Readability lease
//!
//! Each item records the source's read-only flag, widens it for the
//! duration of processing, and settles it on every exit path: the output
//! ends up readable iff the run forces readability or the source was
//! readable to begin with. Failures restore the source exactly as found.
//!
//! ## Parallelism
//!
//! Items are independent (distinct paths, no shared mutable state), so
//! the batch fans out over rayon. `par_iter().collect()` preserves input
//! order in the result list.

use crate::codec::{self, OutputFormat};
use crate::config::KeyConfig;
use crate::keying::{mip_chain, transform};
use crate::scan::SourceEntry;
use crate::store::AssetStore;
use rayon::prelude::*;
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why one item failed. Local to the item, never aborts the batch.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FailureReason {
    #[error("read failed: {0}")]
    Read(String),
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("encode failed: {0}")]
    Encode(String),
    #[error("write failed: {0}")]
    Write(String),
}

/// Terminal state of one batch item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Rewritten in place.
    Processed,
    /// Legacy source replaced by the configured output container.
    Converted,
    Failed { reason: FailureReason },
}

/// Per-item record; the batch's only output artifact.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessResult {
    pub source: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    pub outcome: Outcome,
}

impl ProcessResult {
    pub fn succeeded(&self) -> bool {
        !matches!(self.outcome, Outcome::Failed { .. })
    }
}

/// Process every entry, in parallel, returning one result per entry in
/// input order.
pub fn run(
    store: &impl AssetStore,
    entries: &[SourceEntry],
    config: &KeyConfig,
) -> Vec<ProcessResult> {
    entries
        .par_iter()
        .map(|entry| process_entry(store, entry, config))
        .collect()
}

/// Where a source lands: legacy inputs move to the output format's
/// extension, everything else is rewritten in place.
pub fn output_path(entry: &SourceEntry, format: OutputFormat) -> PathBuf {
    if codec::is_legacy_extension(&entry.extension) {
        entry.path.with_extension(format.extension())
    } else {
        entry.path.clone()
    }
}

fn process_entry(
    store: &impl AssetStore,
    entry: &SourceEntry,
    config: &KeyConfig,
) -> ProcessResult {
    let legacy = codec::is_legacy_extension(&entry.extension);
    let output = output_path(entry, config.output.format);

    let failed = |reason: FailureReason| ProcessResult {
        source: entry.path.clone(),
        output: None,
        outcome: Outcome::Failed { reason },
    };

    let lease = match ReadabilityLease::acquire(store, &entry.path) {
        Ok(lease) => lease,
        Err(e) => return failed(FailureReason::Read(e.to_string())),
    };

    match run_item(store, entry, config, &output) {
        Ok(()) => {
            if let Err(e) = lease.settle(store, &output, config.output.make_readable) {
                return failed(FailureReason::Write(format!(
                    "could not settle readability: {e}"
                )));
            }
            ProcessResult {
                source: entry.path.clone(),
                output: Some(output),
                outcome: if legacy {
                    Outcome::Converted
                } else {
                    Outcome::Processed
                },
            }
        }
        Err(reason) => {
            // Best effort: put the source's flag back exactly as found.
            let _ = lease.restore(store, &entry.path);
            failed(reason)
        }
    }
}

/// The pipeline proper. Stops at the first failing stage; the legacy
/// original is only removed once everything else is on disk.
fn run_item(
    store: &impl AssetStore,
    entry: &SourceEntry,
    config: &KeyConfig,
    output: &Path,
) -> Result<(), FailureReason> {
    let bytes = store
        .read(&entry.path)
        .map_err(|e| FailureReason::Read(e.to_string()))?;

    let source = codec::decode(&bytes, &entry.extension)
        .map_err(|e| FailureReason::Decode(e.to_string()))?;

    let recolored = transform(&source, &config.keying);

    let encoded = codec::encode(&recolored, config.output.format)
        .map_err(|e| FailureReason::Encode(e.to_string()))?;
    store
        .write(output, &encoded)
        .map_err(|e| FailureReason::Write(e.to_string()))?;

    if config.output.generate_mips {
        for (index, level) in mip_chain(&recolored).iter().enumerate() {
            let level_bytes = codec::encode(level, config.output.format)
                .map_err(|e| FailureReason::Encode(e.to_string()))?;
            let level_path = mip_path(output, index + 1, config.output.format);
            store
                .write(&level_path, &level_bytes)
                .map_err(|e| FailureReason::Write(e.to_string()))?;
        }
    }

    if output != entry.path {
        store
            .remove(&entry.path)
            .map_err(|e| FailureReason::Write(e.to_string()))?;
    }

    Ok(())
}

/// `sprite.png` + level 2 → `sprite.mip2.png`.
fn mip_path(base: &Path, level: usize, format: OutputFormat) -> PathBuf {
    base.with_extension(format!("mip{level}.{}", format.extension()))
}

/// Before/after record of one item's read-only flag.
///
/// Acquiring widens the capability (clears the flag) so the item can be
/// rewritten; settling restores the pre-processing state unless the run
/// forces readability. The widened flag never outlives the item.
struct ReadabilityLease {
    was_readonly: bool,
}

impl ReadabilityLease {
    fn acquire(store: &impl AssetStore, path: &Path) -> io::Result<Self> {
        let was_readonly = store.is_readonly(path)?;
        if was_readonly {
            store.set_readonly(path, false)?;
        }
        Ok(Self { was_readonly })
    }

    /// Apply the post-processing flag to the output asset.
    fn settle(
        &self,
        store: &impl AssetStore,
        output: &Path,
        force_readable: bool,
    ) -> io::Result<()> {
        store.set_readonly(output, self.was_readonly && !force_readable)
    }

    /// Failure path: the source keeps whatever flag it had before.
    fn restore(&self, store: &impl AssetStore, source: &Path) -> io::Result<()> {
        if self.was_readonly {
            store.set_readonly(source, true)?;
        }
        Ok(())
    }
}
