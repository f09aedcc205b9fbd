//! Cleavage histogram over residue windows.

use crate::aggregate::{cleavage_sites, numbering_name, numberings, position_in, Significance};
use crate::data::{AggregateTable, ResultTable};
use crate::error::{ProteolysisError, Result};
use crate::seq::ProteinCoords;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Bin layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HistWindows {
    /// Consecutive windows of this many positions starting at 0.
    Fixed(usize),
    /// Explicit increasing boundaries; bin `i` is `[edges[i], edges[i + 1])`.
    Edges(Vec<usize>),
}

impl HistWindows {
    /// Bin boundaries covering positions `0..length`.
    pub fn edges(&self, length: usize) -> Result<Vec<usize>> {
        match self {
            Self::Fixed(0) => Err(ProteolysisError::InvalidParameter(
                "histogram window must be positive".to_string(),
            )),
            Self::Fixed(width) => {
                let n_bins = length.div_ceil(*width).max(1);
                Ok((0..=n_bins).map(|i| i * width).collect())
            }
            Self::Edges(edges) => {
                if edges.len() < 2 || edges.windows(2).any(|w| w[0] >= w[1]) {
                    return Err(ProteolysisError::InvalidParameter(format!(
                        "histogram edges must be at least two strictly increasing values, got {:?}",
                        edges
                    )));
                }
                Ok(edges.clone())
            }
        }
    }
}

/// Count cleavage positions per window.
///
/// Columns are `("Rec/All", label)`, `("Rec/Unique", label)` and, when a
/// native sequence is aligned, the same for `Nat`. `All` counts every
/// cleavage of every significant peptide; `Unique` counts distinct
/// positions. Bins are laid out over the recombinant length and keyed
/// `"start-end"`, followed by an open-ended `"end-"` row that is NaN in
/// every column.
pub fn histogram(
    table: &ResultTable,
    coords: &ProteinCoords,
    windows: &HistWindows,
    significance: Significance,
) -> Result<AggregateTable> {
    let edges = windows.edges(coords.rec_length)?;
    let n_bins = edges.len() - 1;
    let bin_of = |pos: usize| -> Option<usize> {
        if pos < edges[0] || pos >= edges[n_bins] {
            return None;
        }
        Some(edges.partition_point(|&e| e <= pos) - 1)
    };

    let targets = numberings(coords);
    let mut columns = Vec::new();
    for &target in &targets {
        for kind in ["All", "Unique"] {
            for label in &table.labels {
                columns.push((format!("{}/{}", numbering_name(target), kind), label.clone()));
            }
        }
    }

    let n_labels = table.n_labels();
    let mut counts = vec![vec![0.0; columns.len()]; n_bins];
    for (t, &target) in targets.iter().enumerate() {
        let length = coords.length(target).unwrap_or(coords.rec_length);
        for l in 0..n_labels {
            let all_col = t * 2 * n_labels + l;
            let unique_col = all_col + n_labels;

            let mut unique = BTreeSet::new();
            for row in significance.rows(table, l) {
                let Some(pos) = position_in(row, target) else {
                    continue;
                };
                for site in cleavage_sites(pos, length) {
                    if let Some(b) = bin_of(site) {
                        counts[b][all_col] += 1.0;
                        unique.insert(site);
                    }
                }
            }
            for site in unique {
                if let Some(b) = bin_of(site) {
                    counts[b][unique_col] += 1.0;
                }
            }
        }
    }

    let mut out = AggregateTable::new("Window", columns);
    for (b, row) in counts.into_iter().enumerate() {
        out.push_row(format!("{}-{}", edges[b], edges[b + 1]), row)?;
    }
    let trailing = vec![f64::NAN; out.n_columns()];
    out.push_row(format!("{}-", edges[n_bins]), trailing)?;
    Ok(out)
}
