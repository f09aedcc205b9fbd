//! Column selections written as compact strings ("4-10", "1,2,3", "0 2 5-7").

use crate::error::{ProteolysisError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// An ordered, duplicate-free list of 0-based column indices.
///
/// Parsed from a string of tokens separated by commas and/or whitespace.
/// Each token is either a single index (`7`) or an inclusive range (`4-6`).
/// Order of appearance is kept, so `"6 4 5"` selects columns 6, 4 and 5 in
/// that order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColumnSpec {
    indices: Vec<usize>,
}

impl ColumnSpec {
    /// Parse a column specification string.
    pub fn parse(spec: &str) -> Result<Self> {
        let invalid = |reason: &str| ProteolysisError::InvalidColumnSpec {
            spec: spec.to_string(),
            reason: reason.to_string(),
        };

        let mut indices = Vec::new();
        for token in spec
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
        {
            match token.split_once('-') {
                Some((start, end)) => {
                    let start: usize = start
                        .trim()
                        .parse()
                        .map_err(|_| invalid(&format!("bad range start in '{}'", token)))?;
                    let end: usize = end
                        .trim()
                        .parse()
                        .map_err(|_| invalid(&format!("bad range end in '{}'", token)))?;
                    if start > end {
                        return Err(invalid(&format!("descending range '{}'", token)));
                    }
                    indices.extend(start..=end);
                }
                None => {
                    let index: usize = token
                        .parse()
                        .map_err(|_| invalid(&format!("'{}' is not a column index", token)))?;
                    indices.push(index);
                }
            }
        }

        if indices.is_empty() {
            return Err(invalid("no columns selected"));
        }

        Self::from_indices(indices).map_err(|_| invalid("column selected more than once"))
    }

    /// Build a specification from explicit indices, rejecting duplicates.
    pub fn from_indices(indices: Vec<usize>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for &i in &indices {
            if !seen.insert(i) {
                return Err(ProteolysisError::InvalidColumnSpec {
                    spec: format!("{:?}", indices),
                    reason: format!("column {} selected more than once", i),
                });
            }
        }
        Ok(Self { indices })
    }

    /// The selected indices, in order of appearance.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    /// Largest selected index.
    pub fn max_index(&self) -> Option<usize> {
        self.indices.iter().copied().max()
    }

    /// Sorted union of two selections.
    pub fn union(&self, other: &ColumnSpec) -> ColumnSpec {
        let set: BTreeSet<usize> = self
            .indices
            .iter()
            .chain(other.indices.iter())
            .copied()
            .collect();
        ColumnSpec {
            indices: set.into_iter().collect(),
        }
    }

    /// Check every index against a table width.
    pub fn check_bounds(&self, n_columns: usize) -> Result<()> {
        match self.indices.iter().find(|&&i| i >= n_columns) {
            Some(&index) => Err(ProteolysisError::ColumnOutOfRange { index, n_columns }),
            None => Ok(()),
        }
    }
}

/// Parse groups of columns separated by `;`, e.g. `"4-6; 7-9; 10 11 12"`.
pub fn parse_groups(spec: &str) -> Result<Vec<ColumnSpec>> {
    spec.split(';')
        .filter(|g| !g.trim().is_empty())
        .map(ColumnSpec::parse)
        .collect()
}

impl FromStr for ColumnSpec {
    type Err = ProteolysisError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ColumnSpec {
    type Error = ProteolysisError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<ColumnSpec> for String {
    fn from(spec: ColumnSpec) -> Self {
        spec.to_string()
    }
}

impl fmt::Display for ColumnSpec {
    /// Writes consecutive ascending runs as ranges: `[1,2,3,7]` -> `"1-3 7"`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        let mut i = 0;
        while i < self.indices.len() {
            let start = self.indices[i];
            let mut j = i;
            while j + 1 < self.indices.len() && self.indices[j + 1] == self.indices[j] + 1 {
                j += 1;
            }
            if j > i {
                parts.push(format!("{}-{}", start, self.indices[j]));
            } else {
                parts.push(start.to_string());
            }
            i = j + 1;
        }
        write!(f, "{}", parts.join(" "))
    }
}
