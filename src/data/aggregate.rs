//! Summary matrices with a two-level column header.

use crate::error::{ProteolysisError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// A derived table: one row per key (residue, amino acid, bin) and columns
/// addressed by a `(group, metric)` pair, e.g. `("Exp1", "P1'")`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateTable {
    /// Name of the row key column.
    pub key_name: String,
    /// Two-level column header.
    pub columns: Vec<(String, String)>,
    /// Row keys.
    pub keys: Vec<String>,
    /// Values, row-major; `values[row].len() == columns.len()`.
    pub values: Vec<Vec<f64>>,
}

impl AggregateTable {
    pub fn new(key_name: &str, columns: Vec<(String, String)>) -> Self {
        Self {
            key_name: key_name.to_string(),
            columns,
            keys: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Append a row.
    pub fn push_row(&mut self, key: impl Into<String>, values: Vec<f64>) -> Result<()> {
        if values.len() != self.columns.len() {
            return Err(ProteolysisError::DimensionMismatch {
                expected: self.columns.len(),
                actual: values.len(),
            });
        }
        self.keys.push(key.into());
        self.values.push(values);
        Ok(())
    }

    pub fn n_rows(&self) -> usize {
        self.keys.len()
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Index of a column by its two header levels.
    pub fn column_index(&self, group: &str, metric: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|(g, m)| g == group && m == metric)
    }

    /// Value lookup by row key and column header.
    pub fn get(&self, key: &str, group: &str, metric: &str) -> Option<f64> {
        let row = self.keys.iter().position(|k| k == key)?;
        let col = self.column_index(group, metric)?;
        Some(self.values[row][col])
    }

    /// All values of one column.
    pub fn column(&self, group: &str, metric: &str) -> Option<Vec<f64>> {
        let col = self.column_index(group, metric)?;
        Some(self.values.iter().map(|r| r[col]).collect())
    }

    /// Write as tab-separated text with two header lines.
    pub fn to_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        write!(writer, "{}", self.key_name)?;
        for (group, _) in &self.columns {
            write!(writer, "\t{}", group)?;
        }
        writeln!(writer)?;
        for (_, metric) in &self.columns {
            write!(writer, "\t{}", metric)?;
        }
        writeln!(writer)?;

        for (key, row) in self.keys.iter().zip(&self.values) {
            write!(writer, "{}", key)?;
            for value in row {
                write!(writer, "\t{}", value)?;
            }
            writeln!(writer)?;
        }

        Ok(())
    }
}
