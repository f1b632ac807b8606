//! A library for deduplicating and cleaning bibliographic publication tables.
//!
//! `pubdedup` operates on flat CSV tables of publication records as produced by
//! bibliographic APIs such as OpenAlex. It focuses on record linkage across
//! sources: exact matching on external identifiers (DOI, MAG) and fuzzy title
//! matching with blocking, plus a handful of row-level cleaning passes and
//! journal/conference ranking merges.
//!
//! # Key Features
//!
//! - **Identifier-based deduplication**: exact matching on normalized DOI and
//!   MAG ids, with retention driven by the presence of a primary `id`.
//! - **Fuzzy title deduplication**: normalized Levenshtein ratio (0-100) over
//!   blocked candidates, with a provenance-aware tie-break policy.
//! - **Provenance flags**: removed rows carry `removedDoi`, `removedMag`, and
//!   `removedTitle` columns indicating which rule fired.
//! - **Cleaning passes**: drop rows polluted by HTML-escape artifacts, keep
//!   the first occurrence per key column.
//! - **Ranking merges**: fold per-year SCImago and CORE ranking files into a
//!   single wide table.
//!
//! # Basic Usage
//!
//! ```rust
//! use pubdedup::{Deduplicator, Table};
//!
//! let input = "\
//! id,ids.doi,ids.mag,display_name,addedViaImenik
//! W1,10.1/x,,Deep Learning for X,
//! ,10.1/X,,Deep learning for X,1
//! ";
//!
//! let table = Table::read_from(input.as_bytes()).unwrap();
//! let result = Deduplicator::new().split(&table).unwrap();
//!
//! assert_eq!(result.originals.len(), 1);
//! assert_eq!(result.duplicates.len(), 1);
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return the crate-local [`Result`] wrapping
//! [`PipelineError`]. A missing required column is fatal before any row is
//! processed; per-row anomalies (e.g. a title that normalizes to the empty
//! string) are skipped and surfaced as `tracing` warnings instead.
//!
//! # Determinism
//!
//! The pipeline is a one-shot batch transform: identical input yields
//! identical output, including the order of emitted duplicate rows. The
//! optional `parallel` feature only parallelizes the per-block similarity
//! matrix and does not affect outcomes.

use thiserror::Error;

extern crate csv as csv_crate;

pub mod clean;
pub mod dedupe;
pub mod normalize;
pub mod rankings;
mod regex;
pub mod table;

// Reexports
pub use clean::{keep_first_by, strip_escaped_rows};
pub use dedupe::{DedupeConfig, DedupeResult, DedupeStats, Deduplicator};
pub use table::Table;

/// A specialized Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Represents errors that can occur while loading or transforming tables.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv_crate::Error),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Invalid field value: {field} - {message}")]
    InvalidFieldValue { field: String, message: String },

    #[error("Error: {0}")]
    Other(String),
}
