//! Flat string table backed by CSV files.
//!
//! Publication records are rows in a headered table. The pipeline only
//! interprets a handful of required columns; everything else passes through
//! untouched, so the table keeps every cell as an owned string.
//!
//! # Example
//!
//! ```
//! use pubdedup::Table;
//!
//! let input = "id,display_name\nW1,Example Paper";
//!
//! let table = Table::read_from(input.as_bytes()).unwrap();
//! assert_eq!(table.len(), 1);
//! assert_eq!(table.value(0, table.column_index("display_name").unwrap()), "Example Paper");
//! ```

use csv::{ReaderBuilder, WriterBuilder};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::{PipelineError, Result};

/// Options for reading a CSV file into a [`Table`].
///
/// The defaults match the common case: comma-delimited with a header row.
/// SCImago exports use `;` as the delimiter.
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Delimiter to use for parsing the CSV
    pub delimiter: u8,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// An in-memory table of string cells with a header row.
///
/// Rows are always kept at the same width as the header: short rows are
/// padded with empty cells on read, long rows are truncated. Missing values
/// and empty strings are not distinguished, mirroring how the upstream data
/// treats blanks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Creates an empty table with the given header row.
    #[must_use]
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Creates a table from a header row and data rows.
    ///
    /// Rows are padded or truncated to the header width.
    #[must_use]
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let mut table = Self::new(headers);
        for row in rows {
            table.push_row(row);
        }
        table
    }

    /// Reads a comma-delimited CSV file with a header row.
    pub fn read_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::read_path_with(path, &ReadOptions::default())
    }

    /// Reads a CSV file with custom [`ReadOptions`].
    pub fn read_path_with<P: AsRef<Path>>(path: P, options: &ReadOptions) -> Result<Self> {
        let file = File::open(path)?;
        Self::read_from_with(file, options)
    }

    /// Reads comma-delimited CSV data with a header row from any reader.
    pub fn read_from<R: Read>(reader: R) -> Result<Self> {
        Self::read_from_with(reader, &ReadOptions::default())
    }

    /// Reads CSV data from any reader with custom [`ReadOptions`].
    pub fn read_from_with<R: Read>(reader: R, options: &ReadOptions) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .delimiter(options.delimiter)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut table = Self::new(headers);
        for record in csv_reader.records() {
            let record = record?;
            table.push_row(record.iter().map(|f| f.to_string()).collect());
        }
        Ok(table)
    }

    /// Writes the table as comma-delimited CSV to a file.
    pub fn write_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.write_to(file)
    }

    /// Writes the table as comma-delimited CSV to any writer.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = WriterBuilder::new().from_writer(writer);
        csv_writer.write_record(&self.headers)?;
        for row in &self.rows {
            csv_writer.write_record(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// The header row.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// The data rows, without the header.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by exact header name.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Index of a column by exact header name, or a fatal
    /// [`PipelineError::MissingColumn`].
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| PipelineError::MissingColumn(name.to_string()))
    }

    /// Cell value at (row, column).
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    #[must_use]
    pub fn value(&self, row: usize, column: usize) -> &str {
        &self.rows[row][column]
    }

    /// Appends a row, padding or truncating it to the header width.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    /// New table with the same headers and the rows at `indices`, in the
    /// order given.
    #[must_use]
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            headers: self.headers.clone(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }
}
