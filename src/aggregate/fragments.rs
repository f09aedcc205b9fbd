//! Contiguous regions covered by significant peptides.

use crate::aggregate::{cleavage_sites, Significance};
use crate::data::{AggregateTable, ResultTable};
use crate::error::Result;
use crate::seq::{Coordinates, ProteinCoords};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// A merged region of overlapping significant peptides for one label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub label: String,
    pub rec: Coordinates,
    /// Native numbering when the whole fragment lies in the native window.
    pub nat: Option<Coordinates>,
    /// Peptide sequences overlaid on the fragment, `-` where none covers.
    pub sequence: String,
    pub n_peptides: usize,
    /// Distinct cleavage positions of the member peptides.
    pub n_cleavages: usize,
}

impl Fragment {
    /// The sequence broken into lines of at most `width` residues.
    pub fn wrapped_sequence(&self, width: usize) -> String {
        if width == 0 {
            return self.sequence.clone();
        }
        self.sequence
            .as_bytes()
            .chunks(width)
            .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Fragments of every label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragmentSet {
    pub labels: Vec<String>,
    /// One list per label, ordered by N-terminus.
    pub fragments: Vec<Vec<Fragment>>,
}

impl FragmentSet {
    pub fn for_label(&self, label: &str) -> Option<&[Fragment]> {
        let i = self.labels.iter().position(|l| l == label)?;
        Some(&self.fragments[i])
    }

    pub fn total(&self) -> usize {
        self.fragments.iter().map(Vec::len).sum()
    }

    /// Per-label totals of fragments, peptides and distinct cleavages.
    pub fn summary(&self) -> Result<AggregateTable> {
        let columns = ["Fragments", "Peptides", "Cleavages"]
            .iter()
            .map(|m| ("Total".to_string(), m.to_string()))
            .collect();
        let mut table = AggregateTable::new("Label", columns);
        for (label, frags) in self.labels.iter().zip(&self.fragments) {
            let peptides: usize = frags.iter().map(|f| f.n_peptides).sum();
            let cleavages: usize = frags.iter().map(|f| f.n_cleavages).sum();
            table.push_row(
                label.clone(),
                vec![frags.len() as f64, peptides as f64, cleavages as f64],
            )?;
        }
        Ok(table)
    }

    /// One line per fragment.
    pub fn to_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writeln!(
            writer,
            "Label\tNterm\tCterm\tNtermF\tCtermF\tPeptides\tCleavages\tSequence"
        )?;
        for frag in self.fragments.iter().flatten() {
            let (nat_n, nat_c) = match frag.nat {
                Some(nat) => (nat.n.to_string(), nat.c.to_string()),
                None => ("NA".to_string(), "NA".to_string()),
            };
            writeln!(
                writer,
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                frag.label,
                frag.rec.n,
                frag.rec.c,
                nat_n,
                nat_c,
                frag.n_peptides,
                frag.n_cleavages,
                frag.sequence
            )?;
        }
        Ok(())
    }
}

/// Sort-and-sweep merge of residue ranges.
///
/// An interval joins the current region when its start is at most
/// `delta` residues past the region's end. The output is sorted and
/// merging it again with the same `delta` returns it unchanged.
pub fn merge_intervals(intervals: &[Coordinates], delta: usize) -> Vec<Coordinates> {
    let mut sorted = intervals.to_vec();
    sorted.sort();

    let mut merged: Vec<Coordinates> = Vec::new();
    for iv in sorted {
        match merged.last_mut() {
            Some(cur) if iv.n <= cur.c + delta => cur.c = cur.c.max(iv.c),
            _ => merged.push(iv),
        }
    }
    merged
}

/// Merge the significant peptides of every label into fragments.
///
/// # Arguments
/// * `table` - Finished result table
/// * `coords` - Protein lengths and native window
/// * `significance` - Which p-values count as hits
/// * `delta` - Largest gap (in residues) bridged when merging
pub fn fragments(
    table: &ResultTable,
    coords: &ProteinCoords,
    significance: Significance,
    delta: usize,
) -> Result<FragmentSet> {
    let mut all = Vec::with_capacity(table.n_labels());

    for (l, label) in table.labels.iter().enumerate() {
        let rows = significance.rows(table, l);
        let regions = merge_intervals(
            &rows.iter().map(|r| r.position.rec).collect::<Vec<_>>(),
            delta,
        );

        let frags: Vec<Fragment> = regions
            .into_iter()
            .map(|region| {
                let members: Vec<_> = rows
                    .iter()
                    .filter(|r| r.position.rec.n >= region.n && r.position.rec.c <= region.c)
                    .collect();

                let mut text = vec![b'-'; region.len()];
                let mut cuts = BTreeSet::new();
                for r in &members {
                    let offset = r.position.rec.n - region.n;
                    for (k, b) in r.sequence.bytes().enumerate() {
                        if let Some(slot) = text.get_mut(offset + k) {
                            *slot = b;
                        }
                    }
                    cuts.extend(cleavage_sites(r.position.rec, coords.rec_length));
                }

                Fragment {
                    label: label.clone(),
                    rec: region,
                    nat: coords.to_native(region),
                    sequence: String::from_utf8_lossy(&text).into_owned(),
                    n_peptides: members.len(),
                    n_cleavages: cuts.len(),
                }
            })
            .collect();

        debug!(label = %label, fragments = frags.len(), "merged fragments");
        all.push(frags);
    }

    Ok(FragmentSet {
        labels: table.labels.clone(),
        fragments: all,
    })
}
