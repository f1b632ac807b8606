//! Publication deduplicator implementation.
//!
//! A module for detecting duplicate publication records across bibliographic
//! sources. Records are linked by three rules applied in order: exact match on
//! normalized DOI, exact match on normalized MAG id, and fuzzy title match
//! within blocking buckets. A record is removed at most once; the rule that
//! fired is recorded in a provenance flag column on the duplicates output.
//!
//! ## Matching rules
//!
//! 1. **DOI pass**: rows sharing a non-empty normalized DOI form a group. If
//!    at least one member carries a primary `id`, every member without one is
//!    removed (`removedDoi`). Groups where no member has an `id` are left
//!    untouched: there is no way to pick a canonical record.
//! 2. **MAG pass**: the identical procedure over normalized MAG ids, skipping
//!    rows already removed (`removedMag`).
//! 3. **Title pass**: remaining rows with a non-empty normalized title are
//!    bucketed by the first 4 characters of the title. Within a bucket, every
//!    pair scoring >= 95 on a 0-100 normalized Levenshtein ratio is a
//!    candidate; the tie-break prefers rows with an `id`, then rows flagged
//!    `addedViaImenik`, and removes both rows when neither distinction holds
//!    (`removedTitle`).
//!
//! Blocking deliberately trades recall for tractability: near-duplicates
//! whose normalized titles differ within the first 4 characters are not
//! detected.
//!
//! ## Usage
//!
//! ```rust
//! use pubdedup::{Deduplicator, DedupeConfig, Table};
//!
//! let input = "\
//! id,ids.doi,ids.mag,display_name,addedViaImenik
//! W1,10.1/a,,Machine Learning Basics,
//! ,10.1/A,,Machine Learning Basics.,
//! W2,10.1/b,,Another Paper,
//! ";
//!
//! let table = Table::read_from(input.as_bytes()).unwrap();
//! let result = Deduplicator::new().split(&table).unwrap();
//!
//! assert_eq!(result.originals.len(), 2);
//! assert_eq!(result.duplicates.len(), 1);
//! assert_eq!(result.stats.removed_doi, 1);
//! ```

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info, warn};

use crate::Result;
use crate::normalize::{block_key, is_truthy_flag, normalize_key, normalize_title};
use crate::table::Table;

/// Primary identifier column; rows with a non-empty value here win ties.
pub const ID_COLUMN: &str = "id";
/// DOI column as exported by OpenAlex (`ids.doi`).
pub const DOI_COLUMN: &str = "ids.doi";
/// MAG id column as exported by OpenAlex (`ids.mag`).
pub const MAG_COLUMN: &str = "ids.mag";
/// Title column.
pub const TITLE_COLUMN: &str = "display_name";
/// Provenance flag marking rows imported from the secondary source.
pub const IMENIK_COLUMN: &str = "addedViaImenik";

/// Flag columns appended to the duplicates output.
pub const REMOVED_DOI_COLUMN: &str = "removedDoi";
pub const REMOVED_MAG_COLUMN: &str = "removedMag";
pub const REMOVED_TITLE_COLUMN: &str = "removedTitle";

const DEFAULT_TITLE_SIMILARITY_THRESHOLD: f64 = 95.0;
const DEFAULT_BLOCK_PREFIX_LEN: usize = 4;

/// Configuration options for controlling the deduplication process.
///
/// # Examples
///
/// ```
/// use pubdedup::DedupeConfig;
///
/// let config = DedupeConfig {
///     title_similarity_threshold: 97.0,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DedupeConfig {
    /// Minimum 0-100 similarity ratio for a title pair to count as a match.
    pub title_similarity_threshold: f64,
    /// Number of leading title characters used as the blocking key.
    pub block_prefix_len: usize,
    /// Whether to compute per-block similarity scores in parallel.
    /// Marking stays serial either way, so results are identical.
    pub run_in_parallel: bool,
}

impl Default for DedupeConfig {
    fn default() -> Self {
        Self {
            title_similarity_threshold: DEFAULT_TITLE_SIMILARITY_THRESHOLD,
            block_prefix_len: DEFAULT_BLOCK_PREFIX_LEN,
            run_in_parallel: false,
        }
    }
}

/// Counters describing what a [`Deduplicator::split`] run did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DedupeStats {
    /// Rows in the input table.
    pub input_rows: usize,
    /// Rows kept as originals.
    pub originals: usize,
    /// Rows removed as duplicates.
    pub duplicates: usize,
    /// Rows removed by the DOI pass.
    pub removed_doi: usize,
    /// Rows removed by the MAG pass.
    pub removed_mag: usize,
    /// Rows removed by the title pass.
    pub removed_title: usize,
    /// Candidate rows whose title normalized to the empty string.
    pub empty_titles: usize,
    /// Title pairs at or above the similarity threshold.
    pub fuzzy_pairs: usize,
}

/// Result of partitioning a table into originals and duplicates.
///
/// Every input row appears in exactly one of the two tables. `originals`
/// keeps the input columns unchanged; `duplicates` carries three extra
/// boolean columns naming the rule that removed each row, in removal order.
#[derive(Debug, Clone)]
pub struct DedupeResult {
    pub originals: Table,
    pub duplicates: Table,
    pub stats: DedupeStats,
}

/// Which matching rule removed a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    Doi,
    Mag,
    Title,
}

#[derive(Debug)]
struct PreprocessedRow {
    doi: String,
    mag: String,
    title: String,
    has_id: bool,
    imenik: bool,
}

#[derive(Debug, Clone, Copy, Default)]
struct RowFlags {
    doi: bool,
    mag: bool,
    title: bool,
}

/// Removal bookkeeping shared by the three passes.
///
/// Kept as an explicit value threaded through the pass functions; `order`
/// preserves removal order for the duplicates output.
struct MarkState {
    removed: Vec<bool>,
    flags: Vec<RowFlags>,
    order: Vec<usize>,
}

impl MarkState {
    fn new(rows: usize) -> Self {
        Self {
            removed: vec![false; rows],
            flags: vec![RowFlags::default(); rows],
            order: Vec::new(),
        }
    }

    fn mark(&mut self, idx: usize, rule: Rule) {
        match rule {
            Rule::Doi => self.flags[idx].doi = true,
            Rule::Mag => self.flags[idx].mag = true,
            Rule::Title => self.flags[idx].title = true,
        }
        if !self.removed[idx] {
            self.removed[idx] = true;
            self.order.push(idx);
        }
    }
}

/// Core deduplication engine for publication tables.
///
/// # Examples
///
/// ```
/// use pubdedup::{Deduplicator, DedupeConfig};
///
/// let deduplicator = Deduplicator::new().with_config(DedupeConfig {
///     run_in_parallel: true,
///     ..Default::default()
/// });
/// ```
#[derive(Debug, Default, Clone)]
pub struct Deduplicator {
    config: DedupeConfig,
}

impl Deduplicator {
    /// Creates a new Deduplicator with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new Deduplicator with custom configuration.
    #[must_use]
    pub fn with_config(mut self, config: DedupeConfig) -> Self {
        self.config = config;
        self
    }

    /// Partitions a table into originals and duplicates.
    ///
    /// Runs the DOI, MAG, and title passes in order and splits the rows. The
    /// five required columns (`id`, `ids.doi`, `ids.mag`, `display_name`,
    /// `addedViaImenik`) must be present; all other columns pass through.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PipelineError::MissingColumn`] before any row is
    /// processed when a required column is absent.
    pub fn split(&self, table: &Table) -> Result<DedupeResult> {
        let id_col = table.require_column(ID_COLUMN)?;
        let doi_col = table.require_column(DOI_COLUMN)?;
        let mag_col = table.require_column(MAG_COLUMN)?;
        let title_col = table.require_column(TITLE_COLUMN)?;
        let imenik_col = table.require_column(IMENIK_COLUMN)?;

        let rows: Vec<PreprocessedRow> = (0..table.len())
            .map(|i| PreprocessedRow {
                doi: normalize_key(table.value(i, doi_col)),
                mag: normalize_key(table.value(i, mag_col)),
                title: normalize_title(table.value(i, title_col)),
                has_id: !table.value(i, id_col).trim().is_empty(),
                imenik: is_truthy_flag(table.value(i, imenik_col)),
            })
            .collect();

        let mut state = MarkState::new(rows.len());

        self.exact_pass(&rows, &mut state, Rule::Doi, |r| r.doi.as_str());
        self.exact_pass(&rows, &mut state, Rule::Mag, |r| r.mag.as_str());
        let (empty_titles, fuzzy_pairs) = self.fuzzy_pass(&rows, &mut state);

        let kept: Vec<usize> = (0..rows.len()).filter(|&i| !state.removed[i]).collect();
        let originals = table.select(&kept);

        let mut duplicate_headers = table.headers().to_vec();
        duplicate_headers.push(REMOVED_DOI_COLUMN.to_string());
        duplicate_headers.push(REMOVED_MAG_COLUMN.to_string());
        duplicate_headers.push(REMOVED_TITLE_COLUMN.to_string());
        let mut duplicates = Table::new(duplicate_headers);
        for &idx in &state.order {
            let mut row = table.rows()[idx].clone();
            let flags = state.flags[idx];
            row.push(bool_cell(flags.doi));
            row.push(bool_cell(flags.mag));
            row.push(bool_cell(flags.title));
            duplicates.push_row(row);
        }

        let stats = DedupeStats {
            input_rows: table.len(),
            originals: originals.len(),
            duplicates: duplicates.len(),
            removed_doi: state.flags.iter().filter(|f| f.doi).count(),
            removed_mag: state.flags.iter().filter(|f| f.mag).count(),
            removed_title: state.flags.iter().filter(|f| f.title).count(),
            empty_titles,
            fuzzy_pairs,
        };
        info!(
            input = stats.input_rows,
            originals = stats.originals,
            duplicates = stats.duplicates,
            "deduplication complete"
        );

        Ok(DedupeResult {
            originals,
            duplicates,
            stats,
        })
    }

    /// Exact-key pass over one identifier column.
    ///
    /// Groups not-yet-removed rows by key (sorted key order, original row
    /// order within a group) and removes the members without an `id` wherever
    /// the group has at least one member with one.
    fn exact_pass<F>(&self, rows: &[PreprocessedRow], state: &mut MarkState, rule: Rule, key: F)
    where
        F: Fn(&PreprocessedRow) -> &str,
    {
        let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (idx, row) in rows.iter().enumerate() {
            if state.removed[idx] {
                continue;
            }
            let k = key(row);
            if k.is_empty() {
                continue;
            }
            groups.entry(k).or_default().push(idx);
        }

        for (&k, members) in &groups {
            if members.len() < 2 {
                continue;
            }
            // No member has an id: the canonical record cannot be decided
            // from the identifier alone, so the group is left untouched.
            if !members.iter().any(|&i| rows[i].has_id) {
                continue;
            }
            for &idx in members {
                if !rows[idx].has_id {
                    state.mark(idx, rule);
                    info!(
                        row = idx,
                        key = k,
                        rule = ?rule,
                        "removed exact-key duplicate, no id present"
                    );
                }
            }
        }
    }

    /// Blocked fuzzy title pass. Returns (empty-title count, matched pairs).
    fn fuzzy_pass(&self, rows: &[PreprocessedRow], state: &mut MarkState) -> (usize, usize) {
        let mut empty_titles = 0usize;
        let mut blocks: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (idx, row) in rows.iter().enumerate() {
            if state.removed[idx] {
                continue;
            }
            if row.title.is_empty() {
                empty_titles += 1;
                continue;
            }
            blocks
                .entry(block_key(&row.title, self.config.block_prefix_len))
                .or_default()
                .push(idx);
        }
        if empty_titles > 0 {
            warn!(
                count = empty_titles,
                "titles normalized to empty string, excluded from fuzzy matching"
            );
        }
        info!(
            candidates = blocks.values().map(Vec::len).sum::<usize>(),
            blocks = blocks.len(),
            "starting fuzzy title pass"
        );

        // Each row is removed at most once; removed rows enter `used` and
        // their remaining pairs are skipped. Kept rows stay eligible.
        let mut used: HashSet<usize> = HashSet::new();
        let mut pair_count = 0usize;

        for (block, members) in &blocks {
            if members.len() < 2 {
                continue;
            }
            debug!(block = block.as_str(), titles = members.len(), "processing block");

            for (i, j, score) in self.score_pairs(rows, members) {
                if score < self.config.title_similarity_threshold {
                    continue;
                }
                let (idx_i, idx_j) = (members[i], members[j]);
                if used.contains(&idx_i) || used.contains(&idx_j) {
                    continue;
                }
                pair_count += 1;
                let (a, b) = (&rows[idx_i], &rows[idx_j]);

                if a.has_id || b.has_id {
                    // Retain by id. When both carry an id, nothing is
                    // removed and the pair stays as two originals.
                    for idx in [idx_i, idx_j] {
                        if !rows[idx].has_id {
                            state.mark(idx, Rule::Title);
                            used.insert(idx);
                            info!(
                                row = idx,
                                block = block.as_str(),
                                score,
                                "removed title duplicate, no id present"
                            );
                        }
                    }
                } else if a.imenik != b.imenik {
                    let idx = if a.imenik { idx_j } else { idx_i };
                    state.mark(idx, Rule::Title);
                    used.insert(idx);
                    info!(
                        row = idx,
                        block = block.as_str(),
                        score,
                        "removed title duplicate, kept the addedViaImenik record"
                    );
                } else if a.imenik && b.imenik {
                    state.mark(idx_j, Rule::Title);
                    used.insert(idx_j);
                    info!(
                        row = idx_j,
                        block = block.as_str(),
                        score,
                        "removed title duplicate, both addedViaImenik, removed second only"
                    );
                } else {
                    for idx in [idx_i, idx_j] {
                        state.mark(idx, Rule::Title);
                        used.insert(idx);
                        info!(
                            row = idx,
                            block = block.as_str(),
                            score,
                            "removed title duplicate, neither has id or addedViaImenik"
                        );
                    }
                }
            }
        }

        info!(
            pairs = pair_count,
            removed = state.flags.iter().filter(|f| f.title).count(),
            "fuzzy title pass complete"
        );
        (empty_titles, pair_count)
    }

    /// Similarity scores for all i < j position pairs of a block, in
    /// deterministic pair order regardless of parallelism.
    fn score_pairs(
        &self,
        rows: &[PreprocessedRow],
        members: &[usize],
    ) -> Vec<(usize, usize, f64)> {
        let pairs: Vec<(usize, usize)> = (0..members.len()).tuple_combinations().collect();
        let score = |&(i, j): &(usize, usize)| {
            (
                i,
                j,
                similarity_ratio(&rows[members[i]].title, &rows[members[j]].title),
            )
        };

        #[cfg(feature = "parallel")]
        if self.config.run_in_parallel {
            use rayon::prelude::*;
            return pairs.par_iter().map(score).collect();
        }

        pairs.iter().map(score).collect()
    }
}

/// Normalized Levenshtein ratio on a 0-100 scale.
fn similarity_ratio(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b) * 100.0
}

fn bool_cell(value: bool) -> String {
    if value { "true" } else { "false" }.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const HEADERS: [&str; 5] = [
        ID_COLUMN,
        DOI_COLUMN,
        MAG_COLUMN,
        TITLE_COLUMN,
        IMENIK_COLUMN,
    ];

    fn table(rows: &[[&str; 5]]) -> Table {
        Table::from_rows(
            HEADERS.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    fn split(rows: &[[&str; 5]]) -> DedupeResult {
        Deduplicator::new().split(&table(rows)).unwrap()
    }

    fn flag(result: &DedupeResult, row: usize, column: &str) -> String {
        let col = result.duplicates.column_index(column).unwrap();
        result.duplicates.value(row, col).to_string()
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let table = Table::from_rows(
            vec!["id".into(), "display_name".into()],
            vec![vec!["W1".into(), "Title".into()]],
        );
        let err = Deduplicator::new().split(&table).unwrap_err();
        assert!(matches!(err, crate::PipelineError::MissingColumn(c) if c == DOI_COLUMN));
    }

    #[test]
    fn test_counts_are_conserved() {
        let result = split(&[
            ["W1", "10.1/a", "", "Paper One", ""],
            ["", "10.1/A ", "", "Paper One copy", ""],
            ["W2", "", "123", "Paper Two", ""],
            ["", "", "123", "Paper Two copy", ""],
            ["W3", "", "", "Paper Three", ""],
        ]);
        assert_eq!(
            result.originals.len() + result.duplicates.len(),
            result.stats.input_rows
        );
        assert_eq!(result.originals.len(), 3);
        assert_eq!(result.duplicates.len(), 2);
    }

    #[test]
    fn test_doi_duplicate_without_id_is_removed() {
        let result = split(&[
            ["W1", "10.1/a", "", "Paper", ""],
            ["", "10.1/A", "", "Paper variant", ""],
        ]);
        assert_eq!(result.duplicates.len(), 1);
        assert_eq!(flag(&result, 0, REMOVED_DOI_COLUMN), "true");
        assert_eq!(flag(&result, 0, REMOVED_MAG_COLUMN), "false");
        assert_eq!(flag(&result, 0, REMOVED_TITLE_COLUMN), "false");

        // The kept row is the one with an id.
        assert_eq!(result.originals.value(0, 0), "W1");
    }

    #[test]
    fn test_doi_group_without_any_id_is_untouched() {
        // Titles differ enough to stay below the fuzzy threshold.
        let result = split(&[
            ["", "10.1/a", "", "A study of pelagic fish", ""],
            ["", "10.1/a", "", "A theory of everything else", ""],
        ]);
        assert_eq!(result.originals.len(), 2);
        assert_eq!(result.duplicates.len(), 0);
    }

    #[test]
    fn test_singleton_group_is_never_a_duplicate() {
        let result = split(&[
            ["", "10.1/a", "", "Only paper", ""],
            ["W1", "10.1/b", "", "Other paper", ""],
        ]);
        assert_eq!(result.duplicates.len(), 0);
    }

    #[test]
    fn test_mag_pass_skips_rows_removed_by_doi() {
        // Row 1 is removed by the DOI pass; the MAG pass then sees its MAG
        // group as a singleton and must not flag anything.
        let result = split(&[
            ["W1", "10.1/a", "777", "Alpha beta gamma", ""],
            ["", "10.1/a", "777", "Alpha beta gamma delta epsilon", ""],
        ]);
        assert_eq!(result.duplicates.len(), 1);
        assert_eq!(flag(&result, 0, REMOVED_DOI_COLUMN), "true");
        assert_eq!(flag(&result, 0, REMOVED_MAG_COLUMN), "false");
    }

    #[test]
    fn test_mag_duplicate_without_id_is_removed() {
        let result = split(&[
            ["W1", "", "999", "Completely different one", ""],
            ["", "", " 999 ", "Another unrelated title", ""],
        ]);
        assert_eq!(result.duplicates.len(), 1);
        assert_eq!(flag(&result, 0, REMOVED_MAG_COLUMN), "true");
    }

    #[test]
    fn test_fuzzy_removes_row_without_id() {
        let result = split(&[
            ["W1", "", "", "Deep Learning for X", ""],
            ["", "", "", "deep learning for x!!", ""],
        ]);
        assert_eq!(result.duplicates.len(), 1);
        assert_eq!(flag(&result, 0, REMOVED_TITLE_COLUMN), "true");
        assert_eq!(result.originals.value(0, 0), "W1");
    }

    #[test]
    fn test_fuzzy_removes_both_when_nothing_distinguishes_them() {
        // Identical normalized titles, no ids, no imenik flags: both go.
        let result = split(&[
            ["", "", "", "Deep Learning for X", ""],
            ["", "", "", "deep learning for x!!", ""],
        ]);
        assert_eq!(result.originals.len(), 0);
        assert_eq!(result.duplicates.len(), 2);
        assert_eq!(flag(&result, 0, REMOVED_TITLE_COLUMN), "true");
        assert_eq!(flag(&result, 1, REMOVED_TITLE_COLUMN), "true");
    }

    #[test]
    fn test_fuzzy_keeps_imenik_record_on_xor() {
        let result = split(&[
            ["", "", "", "Graph Neural Networks Revisited", ""],
            ["", "", "", "Graph neural networks revisited!", "1"],
        ]);
        assert_eq!(result.originals.len(), 1);
        assert_eq!(result.duplicates.len(), 1);
        let imenik_col = result.originals.column_index(IMENIK_COLUMN).unwrap();
        assert_eq!(result.originals.value(0, imenik_col), "1");
    }

    #[test]
    fn test_fuzzy_both_imenik_removes_second_only() {
        let result = split(&[
            ["", "", "", "Graph Neural Networks Revisited", "true"],
            ["", "", "", "Graph neural networks revisited!", "1.0"],
        ]);
        assert_eq!(result.originals.len(), 1);
        assert_eq!(result.duplicates.len(), 1);
        // First-seen row is kept.
        let title_col = result.originals.column_index(TITLE_COLUMN).unwrap();
        assert_eq!(
            result.originals.value(0, title_col),
            "Graph Neural Networks Revisited"
        );
    }

    #[test]
    fn test_fuzzy_pair_with_two_ids_is_left_as_two_originals() {
        let result = split(&[
            ["W1", "", "", "Graph Neural Networks Revisited", ""],
            ["W2", "", "", "Graph neural networks revisited!", ""],
        ]);
        assert_eq!(result.originals.len(), 2);
        assert_eq!(result.duplicates.len(), 0);
    }

    #[test]
    fn test_blocking_boundary_is_an_accepted_miss() {
        // A leading typo pushes the pair into different 4-char blocks, so
        // the near-identical titles are deliberately not detected.
        let result = split(&[
            ["", "", "", "Xeep Learning for Speech Recognition", ""],
            ["", "", "", "Deep Learning for Speech Recognition", ""],
        ]);
        assert_eq!(result.originals.len(), 2);
        assert_eq!(result.duplicates.len(), 0);
    }

    #[test]
    fn test_below_threshold_pair_is_kept() {
        let result = split(&[
            ["", "", "", "Deep Learning for Speech", ""],
            ["", "", "", "Deep Learning for Graphs and Trees", ""],
        ]);
        assert_eq!(result.duplicates.len(), 0);
    }

    #[test]
    fn test_empty_titles_are_excluded_from_fuzzy_but_not_exact() {
        let result = split(&[
            ["W1", "10.1/a", "", "???", ""],
            ["", "10.1/a", "", "!!!", ""],
            ["", "", "", "...", ""],
        ]);
        // Exact DOI pass still fires; the all-punctuation titles are simply
        // never fuzzy candidates.
        assert_eq!(result.duplicates.len(), 1);
        assert_eq!(flag(&result, 0, REMOVED_DOI_COLUMN), "true");
        assert_eq!(result.stats.empty_titles, 2);
    }

    #[test]
    fn test_duplicates_preserve_removal_order() {
        // DOI removal fires before the title removal, regardless of row order.
        let result = split(&[
            ["", "", "", "Zebra Stripe Formation Models", ""],
            ["", "", "", "Zebra stripe formation models!", ""],
            ["W1", "10.1/a", "", "Unrelated paper", ""],
            ["", "10.1/a", "", "Also unrelated entirely", ""],
        ]);
        assert_eq!(result.duplicates.len(), 3);
        assert_eq!(flag(&result, 0, REMOVED_DOI_COLUMN), "true");
        assert_eq!(flag(&result, 1, REMOVED_TITLE_COLUMN), "true");
        assert_eq!(flag(&result, 2, REMOVED_TITLE_COLUMN), "true");
    }

    #[test]
    fn test_idempotence_on_originals() {
        let rows = [
            ["W1", "10.1/a", "", "Paper One", ""],
            ["", "10.1/a", "", "Paper One copy", ""],
            ["", "", "", "Shared title here", "1"],
            ["", "", "", "Shared title here", ""],
            ["", "10.1/b", "", "No id group member one", ""],
            ["", "10.1/b", "", "Completely different title", ""],
        ];
        let first = split(&rows);
        let second = Deduplicator::new().split(&first.originals).unwrap();
        assert_eq!(second.duplicates.len(), 0);
        assert_eq!(second.originals.len(), first.originals.len());
    }

    #[test]
    fn test_passthrough_columns_survive() {
        let mut headers: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
        headers.push("cited_by_count".to_string());
        let table = Table::from_rows(
            headers,
            vec![
                vec!["W1".into(), "10.1/a".into(), String::new(), "Paper".into(), String::new(), "42".into()],
                vec![String::new(), "10.1/a".into(), String::new(), "Paper!".into(), String::new(), "7".into()],
            ],
        );
        let result = Deduplicator::new().split(&table).unwrap();
        let col = result.originals.column_index("cited_by_count").unwrap();
        assert_eq!(result.originals.value(0, col), "42");
        let dup_col = result.duplicates.column_index("cited_by_count").unwrap();
        assert_eq!(result.duplicates.value(0, dup_col), "7");
    }

    #[test]
    fn test_parallel_scoring_matches_serial() {
        let rows = [
            ["", "", "", "Shared title here one", ""],
            ["", "", "", "Shared title here one!", "1"],
            ["W1", "", "", "Shared title here two", ""],
            ["", "", "", "Shared title here two?", ""],
        ];
        let serial = split(&rows);
        let parallel = Deduplicator::new()
            .with_config(DedupeConfig {
                run_in_parallel: true,
                ..Default::default()
            })
            .split(&table(&rows))
            .unwrap();
        assert_eq!(parallel.stats, serial.stats);
        assert_eq!(parallel.duplicates.rows(), serial.duplicates.rows());
    }
}
