//! Alignment of the native sequence onto the recombinant sequence.

use crate::error::{ProteolysisError, Result};
use bio::alignment::pairwise::Aligner;
use bio::alignment::AlignmentOperation;
use bio::scores::blosum62;
use serde::{Deserialize, Serialize};

const GAP_OPEN: i32 = -10;
const GAP_EXTEND: i32 = -1;

/// Where the native sequence sits inside the recombinant one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeAlignment {
    /// Offset added to a recombinant residue number to get the native one.
    pub delta: i64,
    /// First and last recombinant residue (1-based) aligned to the native sequence.
    pub window: (usize, usize),
    pub score: i32,
}

/// Upper-case residues; anything outside A-Z is scored as `X`.
pub(crate) fn sanitize(sequence: &str) -> Vec<u8> {
    sequence
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .map(|b| {
            let b = b.to_ascii_uppercase();
            if b.is_ascii_uppercase() {
                b
            } else {
                b'X'
            }
        })
        .collect()
}

/// Global BLOSUM62 alignment of `native` against `recombinant`.
///
/// The delta comes from the first aligned residue pair; the window spans
/// the first to the last recombinant residue paired with a native residue.
pub fn align_native(recombinant: &str, native: &str) -> Result<NativeAlignment> {
    let x = sanitize(recombinant);
    let y = sanitize(native);
    if x.is_empty() || y.is_empty() {
        return Err(ProteolysisError::InvalidSequence(
            "cannot align an empty sequence".to_string(),
        ));
    }

    let mut aligner = Aligner::with_capacity(x.len(), y.len(), GAP_OPEN, GAP_EXTEND, &blosum62);
    let alignment = aligner.global(&x, &y);

    let (mut i, mut j) = (alignment.xstart, alignment.ystart);
    let mut first: Option<(usize, usize)> = None;
    let mut last_x = 0;
    for op in &alignment.operations {
        match op {
            AlignmentOperation::Match | AlignmentOperation::Subst => {
                if first.is_none() {
                    first = Some((i, j));
                }
                last_x = i;
                i += 1;
                j += 1;
            }
            AlignmentOperation::Ins => i += 1,
            AlignmentOperation::Del => j += 1,
            AlignmentOperation::Xclip(n) => i += n,
            AlignmentOperation::Yclip(n) => j += n,
        }
    }

    let (i0, j0) = first.ok_or_else(|| {
        ProteolysisError::InvalidSequence(
            "native sequence shares no aligned residues with the recombinant sequence".to_string(),
        )
    })?;

    Ok(NativeAlignment {
        delta: j0 as i64 - i0 as i64,
        window: (i0 + 1, last_x + 1),
        score: alignment.score,
    })
}
