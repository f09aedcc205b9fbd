//! Cleavage evolution across ordered experimental labels.

use crate::aggregate::{cleavage_sites, numbering_name, position_in, require_length, Significance};
use crate::data::{AggregateTable, ResultTable};
use crate::error::Result;
use crate::seq::{ProteinCoords, SeqTarget};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Shape of a series across ordered labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Monotonicity {
    /// Never decreases and increases at least once.
    Increasing,
    /// Never increases and decreases at least once.
    Decreasing,
    Constant,
    Mixed,
}

/// Classify a series; NaN entries are skipped.
pub fn monotonicity(series: &[f64]) -> Monotonicity {
    let values: Vec<f64> = series.iter().copied().filter(|v| !v.is_nan()).collect();
    let (mut up, mut down) = (false, false);
    for w in values.windows(2) {
        if w[1] > w[0] {
            up = true;
        } else if w[1] < w[0] {
            down = true;
        }
    }
    match (up, down) {
        (false, false) => Monotonicity::Constant,
        (true, false) => Monotonicity::Increasing,
        (false, true) => Monotonicity::Decreasing,
        (true, true) => Monotonicity::Mixed,
    }
}

/// Per-peptide weights on a 1-10 scale.
///
/// Labels where the peptide is not significant get 0. Among the others the
/// mean intensity is min-max scaled to 1..=10; when all of them are equal
/// each gets 1.
fn scaled_weights(means: &[Option<f64>]) -> Vec<f64> {
    let present: Vec<f64> = means.iter().flatten().copied().filter(|v| v.is_finite()).collect();
    let min = present.iter().copied().fold(f64::INFINITY, f64::min);
    let max = present.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    means
        .iter()
        .map(|m| match m {
            Some(v) if v.is_finite() => {
                if max > min {
                    1.0 + 9.0 * (v - min) / (max - min)
                } else {
                    1.0
                }
            }
            _ => 0.0,
        })
        .collect()
}

/// Evolution score of every cleaved residue across labels.
///
/// For each peptide significant in at least one label, its scaled weights
/// are added to both of its cleavage positions. Rows are only the residues
/// that receive a contribution, keyed like cleavage-per-residue. Columns
/// are `(numbering, label)` in label order, so each row is the series to
/// pass to [`monotonicity`].
pub fn cleavage_evolution(
    table: &ResultTable,
    coords: &ProteinCoords,
    target: SeqTarget,
    significance: Significance,
) -> Result<AggregateTable> {
    let length = require_length(coords, target)?;
    let n_labels = table.n_labels();

    let mut scores: BTreeMap<usize, Vec<f64>> = BTreeMap::new();
    for row in &table.rows {
        let Some(pos) = position_in(row, target) else {
            continue;
        };
        let means: Vec<Option<f64>> = (0..n_labels)
            .map(|l| {
                let p = table.p_value(row, l);
                if significance.comparator.apply(p, significance.threshold) {
                    Some(row.groups[l].mean_intensity())
                } else {
                    None
                }
            })
            .collect();
        if means.iter().all(Option::is_none) {
            continue;
        }

        let weights = scaled_weights(&means);
        for site in cleavage_sites(pos, length) {
            let entry = scores.entry(site).or_insert_with(|| vec![0.0; n_labels]);
            for (acc, w) in entry.iter_mut().zip(&weights) {
                *acc += w;
            }
        }
    }

    let name = numbering_name(target);
    let columns = table
        .labels
        .iter()
        .map(|l| (name.to_string(), l.clone()))
        .collect();
    let mut out = AggregateTable::new("Residue", columns);
    for (site, values) in scores {
        out.push_row(site.to_string(), values)?;
    }
    Ok(out)
}
