//! Row-level cleaning passes.
//!
//! Two small transforms applied between data acquisition and deduplication:
//! dropping rows polluted by HTML-escape artifacts left behind by a broken
//! upstream export, and keeping only the first occurrence per key column.

use serde::Serialize;
use std::collections::HashSet;
use tracing::info;

use crate::Result;
use crate::table::Table;

/// Substrings that mark a row as carrying HTML-escape artifacts.
/// `&amp` and `&lt` also cover the double-escaped `&amp;lt;` variants.
const ESCAPE_MARKERS: [&str; 2] = ["&amp", "&lt"];

/// Counters for a [`strip_escaped_rows`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanStats {
    pub read: usize,
    pub kept: usize,
    pub removed: usize,
}

/// Drops every row where any cell contains an HTML-escape artifact.
#[must_use]
pub fn strip_escaped_rows(table: &Table) -> (Table, CleanStats) {
    let mut kept = Table::new(table.headers().to_vec());
    let mut stats = CleanStats::default();

    for row in table.rows() {
        stats.read += 1;
        let polluted = row
            .iter()
            .any(|cell| ESCAPE_MARKERS.iter().any(|m| cell.contains(m)));
        if polluted {
            stats.removed += 1;
            continue;
        }
        kept.push_row(row.clone());
        stats.kept += 1;
    }

    info!(
        read = stats.read,
        kept = stats.kept,
        removed = stats.removed,
        "stripped escaped rows"
    );
    (kept, stats)
}

/// Keeps the first row per value of `column` and drops later rows with the
/// same value. Empty values collapse like any other value: the first blank
/// row is kept, subsequent blanks are dropped.
///
/// # Errors
///
/// Returns [`crate::PipelineError::MissingColumn`] when `column` is absent.
pub fn keep_first_by(table: &Table, column: &str) -> Result<(Table, usize)> {
    let col = table.require_column(column)?;

    let mut seen: HashSet<&str> = HashSet::new();
    let mut kept = Table::new(table.headers().to_vec());
    let mut dropped = 0usize;

    for row in table.rows() {
        if seen.insert(row[col].as_str()) {
            kept.push_row(row.clone());
        } else {
            dropped += 1;
        }
    }

    info!(column, kept = kept.len(), dropped, "kept first occurrence per key");
    Ok((kept, dropped))
}
