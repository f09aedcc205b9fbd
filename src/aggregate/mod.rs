//! Aggregations derived from a finished result table.
//!
//! Cleavage positions are 0-based bond indices: a peptide covering residues
//! `n..=c` is produced by cuts at positions `n - 1` and `c`. Positions `0`
//! and `length` are protein termini, not cleavages, and are ignored by every
//! aggregation here.

pub mod aa_distribution;
pub mod cleavage;
pub mod evolution;
pub mod fragments;
pub mod histogram;

pub use aa_distribution::{aa_distribution, AaDistribution, AA_GROUPS};
pub use cleavage::cleavage_per_residue;
pub use evolution::{cleavage_evolution, monotonicity, Monotonicity};
pub use fragments::{fragments, merge_intervals, Fragment, FragmentSet};
pub use histogram::{histogram, HistWindows};

use crate::data::{Comparator, PeptideResult, ResultTable};
use crate::error::{ProteolysisError, Result};
use crate::seq::{Coordinates, ProteinCoords, SeqTarget};
use serde::{Deserialize, Serialize};

/// Which peptides count as hits for an aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Significance {
    pub comparator: Comparator,
    pub threshold: f64,
}

impl Significance {
    pub fn new(comparator: Comparator, threshold: f64) -> Self {
        Self {
            comparator,
            threshold,
        }
    }

    /// `p <= alpha`.
    pub fn at(alpha: f64) -> Self {
        Self::new(Comparator::Le, alpha)
    }

    pub(crate) fn rows<'a>(&self, table: &'a ResultTable, label: usize) -> Vec<&'a PeptideResult> {
        table.significant(label, self.comparator, self.threshold)
    }
}

/// Column-header name of a numbering.
pub(crate) fn numbering_name(target: SeqTarget) -> &'static str {
    match target {
        SeqTarget::Recombinant => "Rec",
        SeqTarget::Native => "Nat",
    }
}

/// Numberings available for a protein: recombinant always, native if aligned.
pub(crate) fn numberings(coords: &ProteinCoords) -> Vec<SeqTarget> {
    let mut targets = vec![SeqTarget::Recombinant];
    if coords.native.is_some() {
        targets.push(SeqTarget::Native);
    }
    targets
}

/// Protein length in `target` numbering, or an error if it is not available.
pub(crate) fn require_length(coords: &ProteinCoords, target: SeqTarget) -> Result<usize> {
    coords
        .length(target)
        .ok_or(ProteolysisError::NoNativeSequence)
}

/// Peptide coordinates in `target` numbering.
pub(crate) fn position_in(row: &PeptideResult, target: SeqTarget) -> Option<Coordinates> {
    match target {
        SeqTarget::Recombinant => Some(row.position.rec),
        SeqTarget::Native => row.position.nat,
    }
}

/// Cleavage positions of a peptide strictly inside `(0, length)`.
pub(crate) fn cleavage_sites(coords: Coordinates, length: usize) -> Vec<usize> {
    coords
        .cut_sites()
        .into_iter()
        .filter(|&p| p > 0 && p < length)
        .collect()
}
