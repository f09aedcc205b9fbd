//! Recombinant and native sequences of the protein under study.

use crate::error::{ProteolysisError, Result};
use crate::seq::align::{align_native, sanitize};
use crate::seq::{find_seq, Coordinates, SeqTarget};
use bio::io::fasta;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

/// Recombinant sequence plus the optional native sequence and its mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceInfo {
    recombinant: String,
    native: Option<String>,
    /// Offset from recombinant to native residue numbers (0 without native).
    delta: i64,
    /// Recombinant residues covered by the native sequence.
    window: Option<(usize, usize)>,
}

impl SequenceInfo {
    /// Build from raw sequences, aligning the native sequence when present.
    pub fn new(recombinant: &str, native: Option<&str>) -> Result<Self> {
        let recombinant = String::from_utf8_lossy(&sanitize(recombinant)).into_owned();
        if recombinant.is_empty() {
            return Err(ProteolysisError::InvalidSequence(
                "recombinant sequence is empty".to_string(),
            ));
        }

        let native = native
            .map(|n| String::from_utf8_lossy(&sanitize(n)).into_owned())
            .filter(|n| !n.is_empty());

        let (delta, window) = match &native {
            Some(nat) => {
                let aln = align_native(&recombinant, nat)?;
                info!(
                    delta = aln.delta,
                    window_start = aln.window.0,
                    window_end = aln.window.1,
                    score = aln.score,
                    "aligned native sequence"
                );
                (aln.delta, Some(aln.window))
            }
            None => (0, None),
        };

        Ok(Self {
            recombinant,
            native,
            delta,
            window,
        })
    }

    /// Read one or two FASTA records: recombinant first, native second.
    pub fn from_fasta<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let mut sequences = Vec::new();
        for record in fasta::Reader::new(file).records() {
            let record = record?;
            debug!(id = record.id(), length = record.seq().len(), "read FASTA record");
            sequences.push(String::from_utf8_lossy(record.seq()).into_owned());
            if sequences.len() == 2 {
                break;
            }
        }

        match sequences.as_slice() {
            [] => Err(ProteolysisError::InvalidSequence(
                "FASTA file contains no records".to_string(),
            )),
            [rec] => Self::new(rec, None),
            [rec, nat, ..] => Self::new(rec, Some(nat)),
        }
    }

    pub fn recombinant(&self) -> &str {
        &self.recombinant
    }

    pub fn native(&self) -> Option<&str> {
        self.native.as_deref()
    }

    pub fn delta(&self) -> i64 {
        self.delta
    }

    pub fn window(&self) -> Option<(usize, usize)> {
        self.window
    }

    pub fn rec_length(&self) -> usize {
        self.recombinant.len()
    }

    /// Search one of the two sequences.
    pub fn find(&self, peptide: &str, target: SeqTarget) -> Result<Option<Coordinates>> {
        match target {
            SeqTarget::Recombinant => Ok(find_seq(&self.recombinant, peptide)),
            SeqTarget::Native => {
                let native = self.native.as_deref().ok_or(ProteolysisError::NoNativeSequence)?;
                Ok(find_seq(native, peptide))
            }
        }
    }

    /// Native numbering of a recombinant range, if it lies inside the window.
    pub fn to_native(&self, rec: Coordinates) -> Option<Coordinates> {
        self.coords().to_native(rec)
    }

    /// Lengths and window used by the aggregations.
    pub fn coords(&self) -> ProteinCoords {
        let coords = ProteinCoords::new(self.rec_length());
        match (&self.native, self.window) {
            (Some(nat), Some(window)) => coords.with_native(NativeRegion {
                delta: self.delta,
                window,
                length: nat.len(),
            }),
            _ => coords,
        }
    }
}

/// Native sequence placement needed to number cleavages natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeRegion {
    pub delta: i64,
    pub window: (usize, usize),
    pub length: usize,
}

impl NativeRegion {
    /// Shift a recombinant range into native numbering when inside the window.
    pub fn to_native(&self, rec: Coordinates) -> Option<Coordinates> {
        let (start, end) = self.window;
        if rec.n < start || rec.c > end {
            return None;
        }
        let shift = |r: usize| usize::try_from(r as i64 + self.delta).ok();
        Some(Coordinates {
            n: shift(rec.n)?,
            c: shift(rec.c)?,
        })
    }
}

/// Protein lengths for both numberings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProteinCoords {
    pub rec_length: usize,
    pub native: Option<NativeRegion>,
}

impl ProteinCoords {
    pub fn new(rec_length: usize) -> Self {
        Self {
            rec_length,
            native: None,
        }
    }

    pub fn with_native(mut self, native: NativeRegion) -> Self {
        self.native = Some(native);
        self
    }

    pub fn to_native(&self, rec: Coordinates) -> Option<Coordinates> {
        self.native.and_then(|n| n.to_native(rec))
    }

    /// Length of the protein in the given numbering, if available.
    pub fn length(&self, target: SeqTarget) -> Option<usize> {
        match target {
            SeqTarget::Recombinant => Some(self.rec_length),
            SeqTarget::Native => self.native.map(|n| n.length),
        }
    }
}
