//! CLI output formatting for the scan and batch stages.
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.
//!
//! ## Check
//!
//! ```text
//! Sources
//! 001 hero.png
//! 002 tiles.bmp
//!     Legacy: will convert to tiles.png
//!
//! 2 sources (1 legacy)
//! ```
//!
//! ## Process
//!
//! ```text
//! 001 hero.png: processed
//! 002 tiles.bmp: converted -> tiles.png
//! 003 broken.png: failed (read failed: permission denied)
//!
//! Processed 1, converted 1, failed 1 (3 total)
//! ```

use crate::batch::{Outcome, ProcessResult};
use crate::codec::{self, OutputFormat};
use crate::scan::SourceEntry;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Display a path relative to the scan root where possible.
fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

// ============================================================================
// Check (scan) output
// ============================================================================

pub fn format_scan_output(
    entries: &[SourceEntry],
    root: &Path,
    format: OutputFormat,
) -> Vec<String> {
    let mut lines = vec!["Sources".to_string()];
    let mut legacy_count = 0;

    for (i, entry) in entries.iter().enumerate() {
        lines.push(format!(
            "{} {}",
            format_index(i + 1),
            display_path(&entry.path, root)
        ));
        if codec::is_legacy_extension(&entry.extension) {
            legacy_count += 1;
            let target = entry.path.with_extension(format.extension());
            lines.push(format!(
                "    Legacy: will convert to {}",
                display_path(&target, root)
            ));
        }
        if entry.readonly {
            lines.push("    Read-only".to_string());
        }
    }

    lines.push(String::new());
    lines.push(match legacy_count {
        0 => format!("{} sources", entries.len()),
        n => format!("{} sources ({} legacy)", entries.len(), n),
    });
    lines
}

pub fn print_scan_output(entries: &[SourceEntry], root: &Path, format: OutputFormat) {
    for line in format_scan_output(entries, root, format) {
        println!("{line}");
    }
}

// ============================================================================
// Process (batch) output
// ============================================================================

pub fn format_batch_output(results: &[ProcessResult], root: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    let mut processed = 0;
    let mut converted = 0;
    let mut failed = 0;

    for (i, result) in results.iter().enumerate() {
        let source = display_path(&result.source, root);
        let line = match &result.outcome {
            Outcome::Processed => {
                processed += 1;
                format!("{} {}: processed", format_index(i + 1), source)
            }
            Outcome::Converted => {
                converted += 1;
                let target = result
                    .output
                    .as_deref()
                    .map(|p| display_path(p, root))
                    .unwrap_or_default();
                format!("{} {}: converted -> {}", format_index(i + 1), source, target)
            }
            Outcome::Failed { reason } => {
                failed += 1;
                format!("{} {}: failed ({})", format_index(i + 1), source, reason)
            }
        };
        lines.push(line);
    }

    lines.push(String::new());
    lines.push(format!(
        "Processed {processed}, converted {converted}, failed {failed} ({} total)",
        results.len()
    ));
    lines
}

pub fn print_batch_output(results: &[ProcessResult], root: &Path) {
    for line in format_batch_output(results, root) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::FailureReason;
    use std::path::PathBuf;

    fn entry(path: &str, extension: &str, readonly: bool) -> SourceEntry {
        SourceEntry {
            path: PathBuf::from(path),
            extension: extension.into(),
            readonly,
        }
    }

    fn result(source: &str, output: Option<&str>, outcome: Outcome) -> ProcessResult {
        ProcessResult {
            source: PathBuf::from(source),
            output: output.map(PathBuf::from),
            outcome,
        }
    }

    #[test]
    fn scan_output_annotates_legacy_and_readonly() {
        let entries = vec![
            entry("/assets/hero.png", "png", false),
            entry("/assets/tiles.bmp", "bmp", true),
        ];
        let lines = format_scan_output(&entries, Path::new("/assets"), OutputFormat::Png);

        assert_eq!(lines[0], "Sources");
        assert_eq!(lines[1], "001 hero.png");
        assert_eq!(lines[2], "002 tiles.bmp");
        assert_eq!(lines[3], "    Legacy: will convert to tiles.png");
        assert_eq!(lines[4], "    Read-only");
        assert_eq!(lines.last().unwrap(), "2 sources (1 legacy)");
    }

    #[test]
    fn scan_output_without_legacy_omits_count() {
        let entries = vec![entry("/assets/hero.png", "png", false)];
        let lines = format_scan_output(&entries, Path::new("/assets"), OutputFormat::Png);
        assert_eq!(lines.last().unwrap(), "1 sources");
    }

    #[test]
    fn batch_output_lines_and_summary() {
        let results = vec![
            result(
                "/assets/hero.png",
                Some("/assets/hero.png"),
                Outcome::Processed,
            ),
            result(
                "/assets/tiles.bmp",
                Some("/assets/tiles.png"),
                Outcome::Converted,
            ),
            result(
                "/assets/broken.png",
                None,
                Outcome::Failed {
                    reason: FailureReason::Read("permission denied".into()),
                },
            ),
        ];
        let lines = format_batch_output(&results, Path::new("/assets"));

        assert_eq!(lines[0], "001 hero.png: processed");
        assert_eq!(lines[1], "002 tiles.bmp: converted -> tiles.png");
        assert_eq!(
            lines[2],
            "003 broken.png: failed (read failed: permission denied)"
        );
        assert_eq!(
            lines.last().unwrap(),
            "Processed 1, converted 1, failed 1 (3 total)"
        );
    }

    #[test]
    fn paths_outside_root_display_as_is() {
        let results = vec![result("/elsewhere/a.png", None, Outcome::Processed)];
        let lines = format_batch_output(&results, Path::new("/assets"));
        assert_eq!(lines[0], "001 /elsewhere/a.png: processed");
    }
}
