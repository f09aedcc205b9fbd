//! Amino-acid distribution around cleavage sites.

use crate::aggregate::{cleavage_sites, Significance};
use crate::data::{AggregateTable, ResultTable};
use crate::error::{ProteolysisError, Result};
use crate::seq::SequenceInfo;
use crate::test::test_chi;
use nalgebra::DMatrix;
use tracing::debug;

const AMINO_ACIDS: &[u8] = b"ACDEFGHIKLMNPQRSTVWY";

/// Physicochemical classes compared by the chi-square test.
pub const AA_GROUPS: [(&str, &str); 5] = [
    ("Nonpolar", "GAVLIMP"),
    ("Aromatic", "FWY"),
    ("Polar", "STCNQ"),
    ("Basic", "KRH"),
    ("Acidic", "DE"),
];

/// Residue counts around cleavages and their comparison to all bonds.
#[derive(Debug, Clone, PartialEq)]
pub struct AaDistribution {
    /// Rows: amino acids. Columns: `(label or "All", offset)`.
    pub counts: AggregateTable,
    /// Rows: residue classes plus `"P"`. Columns: `(label, offset)`.
    /// Class rows hold -1/0/1 (under/not significant/over), the `"P"` row
    /// the chi-square p-value.
    pub chi: AggregateTable,
}

/// Offset names from `P{pos}` to `P1` then `P1'` to `P{pos}'`.
fn offset_names(pos: usize) -> Vec<String> {
    (1..=pos)
        .rev()
        .map(|k| format!("P{}", k))
        .chain((1..=pos).map(|k| format!("P{}'", k)))
        .collect()
}

fn aa_index(residue: u8) -> Option<usize> {
    AMINO_ACIDS.iter().position(|&a| a == residue)
}

fn group_index(residue: u8) -> Option<usize> {
    AA_GROUPS
        .iter()
        .position(|(_, members)| members.as_bytes().contains(&residue))
}

/// Add the residues around cleavage position `site` to `counts[aa][offset]`.
///
/// Position `site` lies between residues `site` and `site + 1` (1-based),
/// so `P1` is `protein[site - 1]` and `P1'` is `protein[site]` (0-based).
fn count_window(protein: &[u8], site: usize, pos: usize, counts: &mut [Vec<f64>]) {
    for (o, k) in (1..=pos).rev().enumerate() {
        if let Some(aa) = site.checked_sub(k).and_then(|i| protein.get(i)).and_then(|&r| aa_index(r)) {
            counts[aa][o] += 1.0;
        }
    }
    for k in 0..pos {
        if let Some(aa) = protein.get(site + k).and_then(|&r| aa_index(r)) {
            counts[aa][pos + k] += 1.0;
        }
    }
}

/// Count residues at `pos` offsets on both sides of every significant
/// cleavage (recombinant numbering) and of every bond of the protein.
///
/// For each label and offset, a 2 x 5 contingency table of residue classes
/// (label vs. all bonds) is tested with chi-square at `alpha`.
pub fn aa_distribution(
    table: &ResultTable,
    sequences: &SequenceInfo,
    pos: usize,
    significance: Significance,
    alpha: f64,
) -> Result<AaDistribution> {
    if pos == 0 {
        return Err(ProteolysisError::InvalidParameter(
            "AA distribution needs at least one position per side".to_string(),
        ));
    }
    let protein = sequences.recombinant().as_bytes();
    let length = protein.len();
    let offsets = offset_names(pos);
    let n_offsets = offsets.len();

    let mut all = vec![vec![0.0; n_offsets]; AMINO_ACIDS.len()];
    for site in 1..length {
        count_window(protein, site, pos, &mut all);
    }

    let mut per_label = Vec::with_capacity(table.n_labels());
    for l in 0..table.n_labels() {
        let mut counts = vec![vec![0.0; n_offsets]; AMINO_ACIDS.len()];
        for row in significance.rows(table, l) {
            for site in cleavage_sites(row.position.rec, length) {
                count_window(protein, site, pos, &mut counts);
            }
        }
        per_label.push(counts);
    }

    let mut count_columns = Vec::new();
    for group in std::iter::once("All").chain(table.labels.iter().map(String::as_str)) {
        for o in &offsets {
            count_columns.push((group.to_string(), o.clone()));
        }
    }
    let mut counts_table = AggregateTable::new("AA", count_columns);
    for (a, &aa) in AMINO_ACIDS.iter().enumerate() {
        let mut row = all[a].clone();
        for counts in &per_label {
            row.extend_from_slice(&counts[a]);
        }
        counts_table.push_row((aa as char).to_string(), row)?;
    }

    let grouped = |counts: &[Vec<f64>], o: usize| -> Vec<f64> {
        let mut g = vec![0.0; AA_GROUPS.len()];
        for (a, &aa) in AMINO_ACIDS.iter().enumerate() {
            if let Some(gi) = group_index(aa) {
                g[gi] += counts[a][o];
            }
        }
        g
    };

    let mut chi_columns = Vec::new();
    let mut chi_values = vec![Vec::new(); AA_GROUPS.len() + 1];
    for (l, label) in table.labels.iter().enumerate() {
        for (o, name) in offsets.iter().enumerate() {
            let observed = grouped(&per_label[l], o);
            let reference = grouped(&all, o);
            let matrix = DMatrix::from_fn(2, AA_GROUPS.len(), |i, j| {
                if i == 0 {
                    observed[j]
                } else {
                    reference[j]
                }
            });
            let result = test_chi(&matrix, alpha)?;
            for gi in 0..AA_GROUPS.len() {
                chi_values[gi].push(f64::from(result.direction(gi).0));
            }
            chi_values[AA_GROUPS.len()].push(result.p_value);
            chi_columns.push((label.clone(), name.clone()));
        }
        debug!(label = %label, offsets = n_offsets, "tested AA distribution");
    }

    let mut chi = AggregateTable::new("Group", chi_columns);
    for (gi, (name, _)) in AA_GROUPS.iter().enumerate() {
        chi.push_row(name.to_string(), std::mem::take(&mut chi_values[gi]))?;
    }
    chi.push_row("P", std::mem::take(&mut chi_values[AA_GROUPS.len()]))?;

    Ok(AaDistribution {
        counts: counts_table,
        chi,
    })
}
