//! Cleavage counts per residue.

use crate::aggregate::{cleavage_sites, numbering_name, position_in, require_length, Significance};
use crate::data::{AggregateTable, ResultTable};
use crate::error::Result;
use crate::seq::{ProteinCoords, SeqTarget};

/// Number of significant peptides cleaving after each residue.
///
/// Rows are residues `1..length` (a cut at position `p` follows residue `p`;
/// the last residue is never followed by a cleavage). Columns are
/// `(numbering, label)`. Requesting native numbering without an aligned
/// native sequence is an error.
pub fn cleavage_per_residue(
    table: &ResultTable,
    coords: &ProteinCoords,
    target: SeqTarget,
    significance: Significance,
) -> Result<AggregateTable> {
    let length = require_length(coords, target)?;
    let name = numbering_name(target);
    let columns = table
        .labels
        .iter()
        .map(|l| (name.to_string(), l.clone()))
        .collect();

    let n_sites = length.saturating_sub(1);
    let mut counts = vec![vec![0.0; table.n_labels()]; n_sites];
    for l in 0..table.n_labels() {
        for row in significance.rows(table, l) {
            if let Some(pos) = position_in(row, target) {
                for site in cleavage_sites(pos, length) {
                    counts[site - 1][l] += 1.0;
                }
            }
        }
    }

    let mut out = AggregateTable::new("Residue", columns);
    for (i, row) in counts.into_iter().enumerate() {
        out.push_row((i + 1).to_string(), row)?;
    }
    Ok(out)
}
