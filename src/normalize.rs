//! Key and title normalization for record linkage.
//!
//! Raw fields are turned into comparable keys before any matching happens:
//! identifiers get a cheap lowercase/trim, titles additionally lose all
//! punctuation (Unicode-aware) so that `"Deep Learning for X"` and
//! `"deep learning for x!!"` compare equal.

use crate::regex::Regex;
use std::sync::LazyLock;

/// Matches everything that is neither a word character nor whitespace.
static NON_WORD_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s]").unwrap());

/// Values of `addedViaImenik` that count as set. The column arrives as
/// strings from several exporters, including float-typed booleans.
const TRUTHY_FLAGS: [&str; 4] = ["1", "1.0", "True", "true"];

/// Normalizes an identifier key (DOI, MAG): lowercase and trim.
///
/// Returns an empty string for blank input; empty keys never participate in
/// exact-key grouping.
#[must_use]
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Normalizes a title for fuzzy comparison.
///
/// Lowercases, strips all punctuation while keeping letters (including
/// non-Latin scripts) and interior whitespace, then trims the ends. A title
/// that normalizes to the empty string is excluded from fuzzy matching.
#[must_use]
pub fn normalize_title(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    NON_WORD_REGEX.replace_all(&lowered, "").trim().to_string()
}

/// Whether an `addedViaImenik` cell marks a record as imported from the
/// secondary source.
#[must_use]
pub fn is_truthy_flag(raw: &str) -> bool {
    TRUTHY_FLAGS.contains(&raw.trim())
}

/// Blocking key: the first `len` characters of a normalized title.
#[must_use]
pub fn block_key(normalized_title: &str, len: usize) -> String {
    normalized_title.chars().take(len).collect()
}
