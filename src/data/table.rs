//! Delimited text table with string cells and row/column filtering operations.

use crate::data::Comparator;
use crate::error::{ProteolysisError, Result};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// String predicate for [`RawTable::filter_string`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StringMatch {
    Equals(String),
    NotEquals(String),
    Contains(String),
    StartsWith(String),
}

impl StringMatch {
    pub fn matches(&self, cell: &str) -> bool {
        let cell = cell.trim();
        match self {
            Self::Equals(s) => cell == s,
            Self::NotEquals(s) => cell != s,
            Self::Contains(s) => cell.contains(s.as_str()),
            Self::StartsWith(s) => cell.starts_with(s.as_str()),
        }
    }
}

/// Tabular input as loaded from disk: a header row and string cells.
///
/// Tables are never modified in place. Every operation returns a new table
/// whose rows keep their original relative order.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Create a table, checking that every row has one cell per header.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        for row in &rows {
            if row.len() != headers.len() {
                return Err(ProteolysisError::DimensionMismatch {
                    expected: headers.len(),
                    actual: row.len(),
                });
            }
        }
        Ok(Self { headers, rows })
    }

    /// Load a tab-separated file with a header row.
    pub fn from_tsv<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_path(path, b'\t')
    }

    /// Load a delimited file with a header row.
    pub fn from_path<P: AsRef<Path>>(path: P, delimiter: u8) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, delimiter)
    }

    /// Load delimited text from any reader.
    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(String::from).collect();
        if headers.is_empty() {
            return Err(ProteolysisError::EmptyData("Table has no columns".to_string()));
        }

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            rows.push(record.iter().map(String::from).collect());
        }

        Self::new(headers, rows)
    }

    /// Write the table as tab-separated text.
    pub fn to_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_path(path)?;
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn n_columns(&self) -> usize {
        self.headers.len()
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Header of a column.
    pub fn header(&self, col: usize) -> Result<&str> {
        self.check_column(col)?;
        Ok(&self.headers[col])
    }

    /// Cell content, or `None` outside the table.
    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// All cells of a column.
    pub fn column(&self, col: usize) -> Result<Vec<&str>> {
        self.check_column(col)?;
        Ok(self.rows.iter().map(|r| r[col].as_str()).collect())
    }

    /// Parse a whole column as numbers (empty and NaN cells become NaN).
    pub fn numeric_column(&self, col: usize) -> Result<Vec<f64>> {
        self.check_column(col)?;
        self.rows
            .iter()
            .enumerate()
            .map(|(row, r)| parse_cell(&r[col], row, &self.headers[col]))
            .collect()
    }

    pub fn check_column(&self, col: usize) -> Result<()> {
        if col >= self.n_columns() {
            return Err(ProteolysisError::ColumnOutOfRange {
                index: col,
                n_columns: self.n_columns(),
            });
        }
        Ok(())
    }

    /// Keep only the given columns, in the given order.
    pub fn select_columns(&self, cols: &[usize]) -> Result<Self> {
        for &c in cols {
            self.check_column(c)?;
        }
        let headers = cols.iter().map(|&c| self.headers[c].clone()).collect();
        let rows = self
            .rows
            .iter()
            .map(|r| cols.iter().map(|&c| r[c].clone()).collect())
            .collect();
        Self::new(headers, rows)
    }

    /// Keep only the given rows (by index), preserving their order.
    pub fn subset_rows(&self, indices: &[usize]) -> Result<Self> {
        let mut rows = Vec::with_capacity(indices.len());
        for &i in indices {
            let row = self.rows.get(i).ok_or_else(|| {
                ProteolysisError::InvalidParameter(format!("Row index {} out of bounds", i))
            })?;
            rows.push(row.clone());
        }
        Self::new(self.headers.clone(), rows)
    }

    /// Keep rows whose numeric value in `col` satisfies `value <cmp> threshold`.
    ///
    /// Cells that are not numbers abort with an error naming the row.
    pub fn filter_numeric(&self, col: usize, cmp: Comparator, threshold: f64) -> Result<Self> {
        let values = self.numeric_column(col)?;
        let keep: Vec<usize> = values
            .iter()
            .enumerate()
            .filter(|(_, &v)| cmp.apply(v, threshold))
            .map(|(i, _)| i)
            .collect();
        self.subset_rows(&keep)
    }

    /// Keep rows whose cell in `col` matches the predicate.
    pub fn filter_string(&self, col: usize, predicate: &StringMatch) -> Result<Self> {
        self.check_column(col)?;
        let keep: Vec<usize> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, r)| predicate.matches(&r[col]))
            .map(|(i, _)| i)
            .collect();
        self.subset_rows(&keep)
    }

    /// Drop rows that have any non-empty cell in the given columns.
    ///
    /// Used for flag columns such as reverse-database or contaminant hits,
    /// where a marker (typically `+`) means the row must be discarded.
    pub fn exclude_rows(&self, cols: &[usize]) -> Result<Self> {
        for &c in cols {
            self.check_column(c)?;
        }
        let keep: Vec<usize> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, r)| cols.iter().all(|&c| r[c].trim().is_empty()))
            .map(|(i, _)| i)
            .collect();
        self.subset_rows(&keep)
    }

    /// Replace cells equal to `from` (after trimming) with `to` in the given columns.
    pub fn replace_values(&self, cols: &[usize], from: &str, to: &str) -> Result<Self> {
        for &c in cols {
            self.check_column(c)?;
        }
        let rows = self
            .rows
            .iter()
            .map(|r| {
                let mut r = r.clone();
                for &c in cols {
                    if r[c].trim() == from {
                        r[c] = to.to_string();
                    }
                }
                r
            })
            .collect();
        Self::new(self.headers.clone(), rows)
    }
}

/// Parse a cell as f64. Empty cells and common missing markers become NaN.
pub(crate) fn parse_cell(cell: &str, row: usize, column: &str) -> Result<f64> {
    let trimmed = cell.trim();
    match trimmed {
        "" | "NaN" | "nan" | "NA" | "N/A" => Ok(f64::NAN),
        _ => trimmed.parse().map_err(|_| ProteolysisError::InvalidNumber {
            value: cell.to_string(),
            row,
            column: column.to_string(),
        }),
    }
}
