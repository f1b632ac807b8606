//! Journal and conference ranking merges.
//!
//! SCImago publishes one CSV per year (semicolon-delimited, one row per
//! journal, possibly several comma-separated ISSNs per row); CORE publishes
//! one headerless CSV per conference ranking round. Both are folded into a
//! single wide table with one column per year, which downstream tooling joins
//! onto the publication table.

use csv::ReaderBuilder;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::Result;
use crate::table::{ReadOptions, Table};

/// SCImago column names we pick out of the per-year files. Anything missing
/// is treated as empty rather than fatal; the exports have changed shape
/// between years.
const SCIMAGO_ISSN: &str = "Issn";
const SCIMAGO_TITLE: &str = "Title";
const SCIMAGO_TYPE: &str = "Type";
const SCIMAGO_SOURCE_ID: &str = "Sourceid";
const SCIMAGO_QUARTILE: &str = "SJR Best Quartile";
const SCIMAGO_H_INDEX: &str = "H index";

#[derive(Debug, Default, Clone)]
struct JournalEntry {
    title: String,
    journal_type: String,
    source_id: String,
    quartiles: BTreeMap<i32, String>,
    h_index: BTreeMap<i32, String>,
}

#[derive(Debug, Default, Clone)]
struct ConferenceEntry {
    name: String,
    abbreviation: String,
    rankings: BTreeMap<i32, String>,
}

/// Hyphenates a bare 8-digit ISSN (`12345678` -> `1234-5678`).
/// Anything else is returned unchanged apart from trimming.
#[must_use]
pub fn format_issn(raw: &str) -> String {
    let issn = raw.trim();
    if issn.len() == 8 && issn.bytes().all(|b| b.is_ascii_digit()) {
        format!("{}-{}", &issn[..4], &issn[4..])
    } else {
        issn.to_string()
    }
}

/// Extracts a publication year from a ranking file name.
///
/// Tokens of the file stem (split on whitespace, `_`, and `-`) are scanned
/// from the end; the first one that parses as an integer wins. Covers both
/// `scimagojr 2020.csv` and `CORE_2021.csv` style names.
#[must_use]
pub fn year_from_file_name(path: &Path) -> Option<i32> {
    let stem = path.file_stem()?.to_str()?;
    stem.split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .rev()
        .find_map(|token| token.parse::<i32>().ok())
}

/// Finds `<prefix>*.csv` files under `dir` and pairs each with the year in
/// its name, sorted by year. Files without a parseable year are skipped with
/// a warning.
pub fn discover_year_files(dir: &Path, prefix: &str) -> Result<Vec<(i32, PathBuf)>> {
    let mut year_files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.starts_with(prefix) || !name.ends_with(".csv") {
            continue;
        }
        match year_from_file_name(&path) {
            Some(year) => year_files.push((year, path)),
            None => warn!(file = name, "no year in ranking file name, skipped"),
        }
    }
    year_files.sort();
    Ok(year_files)
}

/// Folds per-year SCImago files into one table keyed by ISSN.
///
/// Each journal row contributes one output row per ISSN; title, type, and
/// source id always reflect the latest year seen. The output carries
/// `Quartile - <year>` and `H index - <year>` columns across all years and is
/// sorted by title, case-insensitively.
pub fn merge_scimago(year_files: &[(i32, PathBuf)]) -> Result<Table> {
    let years: Vec<i32> = year_files.iter().map(|(y, _)| *y).collect();
    let mut journals: BTreeMap<String, JournalEntry> = BTreeMap::new();

    for (year, path) in year_files {
        info!(year, file = %path.display(), "processing SCImago file");
        let table = Table::read_path_with(path, &ReadOptions { delimiter: b';' })?;

        let issn_col = table.column_index(SCIMAGO_ISSN);
        let title_col = table.column_index(SCIMAGO_TITLE);
        let type_col = table.column_index(SCIMAGO_TYPE);
        let source_col = table.column_index(SCIMAGO_SOURCE_ID);
        let quartile_col = table.column_index(SCIMAGO_QUARTILE);
        let h_index_col = table.column_index(SCIMAGO_H_INDEX);

        fn cell(table: &Table, row: usize, col: Option<usize>) -> &str {
            col.map_or("", |c| table.value(row, c).trim())
        }

        for row in 0..table.len() {
            let raw_issn = cell(&table, row, issn_col);
            if raw_issn.is_empty() {
                continue;
            }
            for issn in raw_issn.split(',').map(format_issn) {
                let entry = journals.entry(issn).or_default();
                entry.title = cell(&table, row, title_col).to_string();
                entry.journal_type = cell(&table, row, type_col).to_string();
                entry.source_id = cell(&table, row, source_col).to_string();
                entry
                    .quartiles
                    .insert(*year, cell(&table, row, quartile_col).to_string());
                entry
                    .h_index
                    .insert(*year, cell(&table, row, h_index_col).to_string());
            }
        }
    }

    let mut headers = vec![
        SCIMAGO_ISSN.to_string(),
        SCIMAGO_TITLE.to_string(),
        SCIMAGO_TYPE.to_string(),
        SCIMAGO_SOURCE_ID.to_string(),
    ];
    headers.extend(years.iter().map(|y| format!("Quartile - {y}")));
    headers.extend(years.iter().map(|y| format!("H index - {y}")));

    let mut rows: Vec<Vec<String>> = journals
        .into_iter()
        .map(|(issn, entry)| {
            let mut row = vec![issn, entry.title, entry.journal_type, entry.source_id];
            row.extend(
                years
                    .iter()
                    .map(|y| entry.quartiles.get(y).cloned().unwrap_or_default()),
            );
            row.extend(
                years
                    .iter()
                    .map(|y| entry.h_index.get(y).cloned().unwrap_or_default()),
            );
            row
        })
        .collect();
    rows.sort_by_key(|row| row[1].to_lowercase());

    Ok(Table::from_rows(headers, rows))
}

/// Folds per-year headerless CORE files into one table keyed by conference
/// id, with one rank column per year, sorted by conference name.
///
/// CORE rows are positional: id, name, abbreviation, source, rank. Rows with
/// fewer than five fields are skipped.
pub fn merge_core(year_files: &[(i32, PathBuf)]) -> Result<Table> {
    let years: Vec<i32> = year_files.iter().map(|(y, _)| *y).collect();
    let mut conferences: BTreeMap<String, ConferenceEntry> = BTreeMap::new();

    for (year, path) in year_files {
        info!(year, file = %path.display(), "processing CORE file");
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(File::open(path)?);

        for record in reader.records() {
            let record = record?;
            if record.len() < 5 {
                continue;
            }
            let entry = conferences
                .entry(record[0].trim().to_string())
                .or_default();
            entry.name = record[1].trim().to_string();
            entry.abbreviation = record[2].trim().to_string();
            entry.rankings.insert(*year, record[4].trim().to_string());
        }
    }

    let mut headers = vec![
        "id".to_string(),
        "conference name".to_string(),
        "conference abbreviation".to_string(),
    ];
    headers.extend(years.iter().map(|y| y.to_string()));

    let mut rows: Vec<Vec<String>> = conferences
        .into_iter()
        .map(|(id, entry)| {
            let mut row = vec![id, entry.name, entry.abbreviation];
            row.extend(
                years
                    .iter()
                    .map(|y| entry.rankings.get(y).cloned().unwrap_or_default()),
            );
            row
        })
        .collect();
    rows.sort_by_key(|row| row[1].to_lowercase());

    Ok(Table::from_rows(headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::io::Write;

    #[rstest]
    #[case("12345678", "1234-5678")]
    #[case("1234-5678", "1234-5678")]
    #[case(" 12345678 ", "1234-5678")]
    #[case("1234567X", "1234567X")]
    #[case("123456789", "123456789")]
    #[case("", "")]
    fn test_format_issn(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(format_issn(raw), expected);
    }

    #[rstest]
    #[case("scimagojr 2020.csv", Some(2020))]
    #[case("scimagojr journals 2019 v2.csv", Some(2019))]
    #[case("CORE_2021.csv", Some(2021))]
    #[case("CORE-2018.csv", Some(2018))]
    #[case("rankings.csv", None)]
    fn test_year_from_file_name(#[case] name: &str, #[case] expected: Option<i32>) {
        assert_eq!(year_from_file_name(Path::new(name)), expected);
    }

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_discover_year_files_sorted_by_year() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "scimagojr 2021.csv", "");
        write_file(dir.path(), "scimagojr 2019.csv", "");
        write_file(dir.path(), "scimagojr noyear.csv", "");
        write_file(dir.path(), "other 2020.csv", "");

        let files = discover_year_files(dir.path(), "scimagojr").unwrap();
        let years: Vec<i32> = files.iter().map(|(y, _)| *y).collect();
        assert_eq!(years, vec![2019, 2021]);
    }

    #[test]
    fn test_merge_scimago() {
        let dir = tempfile::tempdir().unwrap();
        let f2019 = write_file(
            dir.path(),
            "scimagojr 2019.csv",
            "Sourceid;Title;Type;Issn;SJR Best Quartile;H index\n\
             100;Old Name;journal;12345678;Q2;50\n",
        );
        let f2020 = write_file(
            dir.path(),
            "scimagojr 2020.csv",
            "Sourceid;Title;Type;Issn;SJR Best Quartile;H index\n\
             100;Journal of Examples;journal;12345678, 8765-4321;Q1;55\n\
             200;Acta Demonstrativa;journal;11112222;Q3;12\n",
        );

        let merged = merge_scimago(&[(2019, f2019), (2020, f2020)]).unwrap();
        assert_eq!(
            merged.headers(),
            &[
                "Issn",
                "Title",
                "Type",
                "Sourceid",
                "Quartile - 2019",
                "Quartile - 2020",
                "H index - 2019",
                "H index - 2020",
            ]
        );

        // Sorted by title: Acta before Journal of Examples.
        assert_eq!(merged.value(0, 0), "1111-2222");
        assert_eq!(merged.value(0, 5), "Q3");

        // One row per ISSN; latest year wins the title.
        let issn_rows: Vec<&str> = merged.rows().iter().map(|r| r[0].as_str()).collect();
        assert!(issn_rows.contains(&"1234-5678"));
        assert!(issn_rows.contains(&"8765-4321"));
        let row = merged
            .rows()
            .iter()
            .find(|r| r[0] == "1234-5678")
            .unwrap();
        assert_eq!(row[1], "Journal of Examples");
        assert_eq!(row[4], "Q2");
        assert_eq!(row[5], "Q1");
        assert_eq!(row[6], "50");
        assert_eq!(row[7], "55");

        // The second ISSN only exists in 2020.
        let row = merged
            .rows()
            .iter()
            .find(|r| r[0] == "8765-4321")
            .unwrap();
        assert_eq!(row[4], "");
        assert_eq!(row[5], "Q1");
    }

    #[test]
    fn test_merge_core() {
        let dir = tempfile::tempdir().unwrap();
        let f2018 = write_file(
            dir.path(),
            "CORE_2018.csv",
            "1,International Conference on Examples,ICE,x,A\n\
             2,Workshop on Demos,WOD,x,B\n",
        );
        let f2021 = write_file(
            dir.path(),
            "CORE_2021.csv",
            "1,International Conference on Examples,ICE,x,A*\n\
             3,short row\n",
        );

        let merged = merge_core(&[(2018, f2018), (2021, f2021)]).unwrap();
        assert_eq!(
            merged.headers(),
            &["id", "conference name", "conference abbreviation", "2018", "2021"]
        );
        assert_eq!(merged.len(), 2);

        let ice = merged.rows().iter().find(|r| r[0] == "1").unwrap();
        assert_eq!(ice[3], "A");
        assert_eq!(ice[4], "A*");

        let wod = merged.rows().iter().find(|r| r[0] == "2").unwrap();
        assert_eq!(wod[3], "B");
        assert_eq!(wod[4], "");
    }
}
