//! Sequence search and recombinant <-> native coordinate mapping.
//!
//! All residue numbers are 1-based and inclusive: a peptide at
//! `Coordinates { n: 3, c: 7 }` covers residues 3 through 7.

pub mod align;
pub mod info;

pub use align::{align_native, NativeAlignment};
pub use info::{NativeRegion, ProteinCoords, SequenceInfo};

use crate::error::{ProteolysisError, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// N- and C-terminal residue numbers of a peptide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinates {
    pub n: usize,
    pub c: usize,
}

impl Coordinates {
    pub fn new(n: usize, c: usize) -> Self {
        Self { n, c }
    }

    /// Number of residues covered.
    pub fn len(&self) -> usize {
        self.c + 1 - self.n
    }

    pub fn is_empty(&self) -> bool {
        self.c < self.n
    }

    /// 0-based cleavage positions: the bond before residue `n` and the bond
    /// after residue `c`.
    pub fn cut_sites(&self) -> [usize; 2] {
        [self.n - 1, self.c]
    }
}

/// Position of a peptide in recombinant and (when mappable) native numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeptidePosition {
    pub rec: Coordinates,
    /// `None` when the peptide is not fully inside the native location window.
    pub nat: Option<Coordinates>,
}

/// Which sequence a search runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeqTarget {
    Recombinant,
    Native,
}

/// Exact substring search.
///
/// # Returns
/// 1-based (N, C) residue numbers of the first occurrence, or `None`.
pub fn find_seq(protein: &str, peptide: &str) -> Option<Coordinates> {
    if peptide.is_empty() {
        return None;
    }
    protein.find(peptide).map(|start| Coordinates {
        n: start + 1,
        c: start + peptide.len(),
    })
}

/// Recombinant and native positions for every peptide, in input order.
///
/// Aborts on the first peptide that cannot be located in the recombinant
/// sequence.
pub fn nc_res_numbers<S: AsRef<str>>(info: &SequenceInfo, peptides: &[S]) -> Result<Vec<PeptidePosition>> {
    let positions = peptides
        .iter()
        .map(|p| {
            let peptide = p.as_ref();
            let rec = find_seq(info.recombinant(), peptide)
                .ok_or_else(|| ProteolysisError::PeptideNotFound {
                    peptide: peptide.to_string(),
                })?;
            Ok(PeptidePosition {
                rec,
                nat: info.to_native(rec),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    info!(
        peptides = positions.len(),
        native = positions.iter().filter(|p| p.nat.is_some()).count(),
        "mapped peptide coordinates"
    );
    Ok(positions)
}
