//! Result types for proteolysis analyses.

use crate::data::Comparator;
use crate::error::{ProteolysisError, Result};
use crate::seq::PeptidePosition;
use crate::test::descriptive;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Design-specific statistics for one peptide in one experimental group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TestDetail {
    /// Indicator-coded regression coefficient against the control level.
    Slope {
        slope: f64,
        std_error: f64,
        statistic: f64,
        df: f64,
    },
    /// Two one-sided tests against the equivalence margin `theta`.
    Tost {
        theta: f64,
        difference: f64,
        t_two: f64,
        p_two: f64,
        t_lower: f64,
        p_lower: f64,
        t_upper: f64,
        p_upper: f64,
    },
    /// Two-sample t-test on log2 intensities.
    TTest {
        log2_fc: f64,
        statistic: f64,
        df: f64,
        pooled: bool,
    },
}

impl TestDetail {
    /// The main test statistic.
    pub fn statistic(&self) -> f64 {
        match self {
            Self::Slope { statistic, .. } => *statistic,
            Self::Tost { t_two, .. } => *t_two,
            Self::TTest { statistic, .. } => *statistic,
        }
    }

    /// Named numeric columns for tabular export.
    pub fn columns(&self) -> Vec<(&'static str, f64)> {
        match self {
            Self::Slope {
                slope,
                std_error,
                statistic,
                df,
            } => vec![
                ("Slope", *slope),
                ("SE", *std_error),
                ("t", *statistic),
                ("df", *df),
            ],
            Self::Tost {
                theta,
                difference,
                t_two,
                p_two,
                t_lower,
                p_lower,
                t_upper,
                p_upper,
            } => vec![
                ("Theta", *theta),
                ("Delta", *difference),
                ("t", *t_two),
                ("Pt", *p_two),
                ("tL", *t_lower),
                ("PL", *p_lower),
                ("tU", *t_upper),
                ("PU", *p_upper),
            ],
            Self::TTest {
                log2_fc,
                statistic,
                df,
                pooled,
            } => vec![
                ("log2FC", *log2_fc),
                ("t", *statistic),
                ("df", *df),
                ("Pooled", if *pooled { 1.0 } else { 0.0 }),
            ],
        }
    }
}

/// Outcome of the configured test for one experimental group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupResult {
    /// Prepared replicate intensities of this group.
    pub intensities: Vec<f64>,
    pub detail: TestDetail,
    /// Raw p-value.
    pub p_value: f64,
    /// Adjusted p-value; equals `p_value` when no correction is applied.
    pub p_adjusted: f64,
}

impl GroupResult {
    pub fn new(intensities: Vec<f64>, detail: TestDetail, p_value: f64) -> Self {
        Self {
            intensities,
            detail,
            p_value,
            p_adjusted: p_value,
        }
    }

    /// Mean of the finite replicate intensities.
    pub fn mean_intensity(&self) -> f64 {
        descriptive::mean(&self.intensities)
    }
}

/// One analysed peptide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeptideResult {
    pub sequence: String,
    pub score: f64,
    pub position: PeptidePosition,
    /// Prepared control replicate intensities.
    pub control: Vec<f64>,
    /// One entry per experimental label, in label order.
    pub groups: Vec<GroupResult>,
}

/// Annotated result of one analysis, one row per peptide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultTable {
    /// Name of the statistical design that produced the table.
    pub design: String,
    /// Experimental labels, one per group column block.
    pub labels: Vec<String>,
    /// Significance level used by the analysis.
    pub alpha: f64,
    /// Whether significance uses adjusted p-values.
    pub corrected: bool,
    pub rows: Vec<PeptideResult>,
}

impl ResultTable {
    pub fn new(design: &str, labels: Vec<String>, alpha: f64, corrected: bool) -> Self {
        Self {
            design: design.to_string(),
            labels,
            alpha,
            corrected,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn n_labels(&self) -> usize {
        self.labels.len()
    }

    /// Index of a label.
    pub fn label_index(&self, label: &str) -> Result<usize> {
        self.labels.iter().position(|l| l == label).ok_or_else(|| {
            ProteolysisError::InvalidParameter(format!(
                "Label '{}' not found. Available: {:?}",
                label, self.labels
            ))
        })
    }

    /// The p-value significance is judged on (adjusted when corrected).
    pub fn p_value(&self, row: &PeptideResult, label: usize) -> f64 {
        row.groups
            .get(label)
            .map(|g| if self.corrected { g.p_adjusted } else { g.p_value })
            .unwrap_or(f64::NAN)
    }

    /// Rows whose p-value for `label` satisfies `p <cmp> threshold`.
    pub fn significant(
        &self,
        label: usize,
        cmp: Comparator,
        threshold: f64,
    ) -> Vec<&PeptideResult> {
        self.rows
            .iter()
            .filter(|r| cmp.apply(self.p_value(r, label), threshold))
            .collect()
    }

    /// Number of significant rows per label at the table's alpha (`p <= alpha`).
    pub fn n_significant(&self) -> Vec<usize> {
        (0..self.n_labels())
            .map(|l| self.significant(l, Comparator::Le, self.alpha).len())
            .collect()
    }

    /// True when at least one peptide is significant in at least one label.
    pub fn has_significant(&self) -> bool {
        self.n_significant().iter().any(|&n| n > 0)
    }

    /// Sort rows by (N-term, C-term) recombinant position.
    pub fn sort_by_position(&mut self) {
        self.rows
            .sort_by_key(|r| (r.position.rec.n, r.position.rec.c));
    }

    /// Write the table as tab-separated text.
    pub fn to_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        let detail_names: Vec<&'static str> = self
            .rows
            .first()
            .and_then(|r| r.groups.first())
            .map(|g| g.detail.columns().into_iter().map(|(n, _)| n).collect())
            .unwrap_or_default();

        // Header
        write!(
            writer,
            "Sequence\tScore\tNterm\tCterm\tNtermF\tCtermF\tControl"
        )?;
        for label in &self.labels {
            write!(writer, "\t{} Int", label)?;
            for name in &detail_names {
                write!(writer, "\t{} {}", label, name)?;
            }
            write!(writer, "\t{} P\t{} Padj", label, label)?;
        }
        writeln!(writer)?;

        for row in &self.rows {
            let (nat_n, nat_c) = match row.position.nat {
                Some(nat) => (nat.n.to_string(), nat.c.to_string()),
                None => (String::from("NA"), String::from("NA")),
            };
            write!(
                writer,
                "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                row.sequence,
                row.score,
                row.position.rec.n,
                row.position.rec.c,
                nat_n,
                nat_c,
                format_list(&row.control)
            )?;
            for group in &row.groups {
                write!(writer, "\t{}", format_list(&group.intensities))?;
                for (_, value) in group.detail.columns() {
                    write!(writer, "\t{}", value)?;
                }
                write!(writer, "\t{}\t{}", group.p_value, group.p_adjusted)?;
            }
            writeln!(writer)?;
        }

        Ok(())
    }
}

/// Format values as a bracketed list, e.g. `[1.5, 2, NaN]`.
pub fn format_list(values: &[f64]) -> String {
    let items: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("[{}]", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seq::Coordinates;

    fn row(seq: &str, n: usize, c: usize, p: f64) -> PeptideResult {
        PeptideResult {
            sequence: seq.to_string(),
            score: 50.0,
            position: PeptidePosition {
                rec: Coordinates { n, c },
                nat: None,
            },
            control: vec![1.0, 2.0],
            groups: vec![GroupResult::new(
                vec![3.0, 5.0],
                TestDetail::TTest {
                    log2_fc: 2.5,
                    statistic: 3.0,
                    df: 2.0,
                    pooled: true,
                },
                p,
            )],
        }
    }

    #[test]
    fn test_sort_by_position() {
        let mut table = ResultTable::new("ProtProf", vec!["Exp1".into()], 0.05, false);
        table.rows.push(row("CC", 10, 11, 0.01));
        table.rows.push(row("AAA", 1, 3, 0.5));
        table.rows.push(row("AAAA", 1, 4, 0.04));
        table.sort_by_position();
        let order: Vec<&str> = table.rows.iter().map(|r| r.sequence.as_str()).collect();
        assert_eq!(order, vec!["AAA", "AAAA", "CC"]);
    }

    #[test]
    fn test_significant() {
        let mut table = ResultTable::new("ProtProf", vec!["Exp1".into()], 0.05, false);
        table.rows.push(row("CC", 10, 11, 0.01));
        table.rows.push(row("AAA", 1, 3, 0.5));
        table.rows.push(row("DD", 5, 6, 0.05));
        assert_eq!(table.significant(0, Comparator::Le, 0.05).len(), 2);
        assert_eq!(table.significant(0, Comparator::Lt, 0.05).len(), 1);
        assert_eq!(table.n_significant(), vec![2]);
        assert!(table.has_significant());
    }

    #[test]
    fn test_corrected_uses_adjusted() {
        let mut table = ResultTable::new("ProtProf", vec!["Exp1".into()], 0.05, true);
        let mut r = row("CC", 10, 11, 0.01);
        r.groups[0].p_adjusted = 0.2;
        table.rows.push(r);
        assert!(!table.has_significant());
    }

    #[test]
    fn test_format_list() {
        assert_eq!(format_list(&[1.5, 2.0]), "[1.5, 2]");
        assert_eq!(format_list(&[]), "[]");
    }

    #[test]
    fn test_mean_intensity_ignores_nan() {
        let g = GroupResult::new(
            vec![1.0, f64::NAN, 3.0],
            TestDetail::TTest {
                log2_fc: 0.0,
                statistic: 0.0,
                df: 1.0,
                pooled: false,
            },
            1.0,
        );
        assert_eq!(g.mean_intensity(), 2.0);
    }
}
