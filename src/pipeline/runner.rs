//! Runner that turns an input table into an annotated result table.

use crate::data::{AnalysisConfig, Comparator, GroupResult, PeptideResult, RawTable, ResultTable};
use crate::error::{ProteolysisError, Result};
use crate::pipeline::RunAnalysis;
use crate::prep::{run_prep, DataSteps};
use crate::seq::{nc_res_numbers, SequenceInfo};
use rayon::prelude::*;
use std::fmt;
use tracing::{debug, info, warn};

/// Major steps reported to a progress callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validated,
    Filtered { rows: usize },
    Prepared,
    Mapped,
    Tested,
    Corrected,
    Finished,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Validated => write!(f, "configuration validated"),
            Stage::Filtered { rows } => write!(f, "filtered input ({} rows)", rows),
            Stage::Prepared => write!(f, "data preparation done"),
            Stage::Mapped => write!(f, "peptides mapped to sequence"),
            Stage::Tested => write!(f, "statistical tests done"),
            Stage::Corrected => write!(f, "p-values corrected"),
            Stage::Finished => write!(f, "analysis finished"),
        }
    }
}

/// Data steps and results of a completed analysis.
#[derive(Debug, Clone)]
pub struct AnalysisOutput {
    pub steps: DataSteps,
    pub results: ResultTable,
}

/// How a run ended.
#[derive(Debug, Clone)]
pub enum AnalysisOutcome {
    Completed(AnalysisOutput),
    /// No peptide reached significance in any group; nothing to aggregate.
    NoSignificant { message: String, steps: DataSteps },
}

impl AnalysisOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    pub fn results(&self) -> Option<&ResultTable> {
        match self {
            Self::Completed(out) => Some(&out.results),
            Self::NoSignificant { .. } => None,
        }
    }

    pub fn steps(&self) -> &DataSteps {
        match self {
            Self::Completed(out) => &out.steps,
            Self::NoSignificant { steps, .. } => steps,
        }
    }

    /// The completed output, or a pipeline error carrying the message.
    pub fn into_output(self) -> Result<AnalysisOutput> {
        match self {
            Self::Completed(out) => Ok(out),
            Self::NoSignificant { message, .. } => Err(ProteolysisError::Pipeline(message)),
        }
    }
}

type ProgressFn<'a> = Box<dyn FnMut(Stage) + 'a>;

/// Executes one analysis as configured.
pub struct AnalysisRunner<'a> {
    config: AnalysisConfig,
    progress: Option<ProgressFn<'a>>,
}

impl<'a> AnalysisRunner<'a> {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            progress: None,
        }
    }

    /// Call `callback` after each major step.
    pub fn with_progress<F: FnMut(Stage) + 'a>(mut self, callback: F) -> Self {
        self.progress = Some(Box::new(callback));
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Run the analysis on `table` against the protein in `sequences`.
    pub fn run(&mut self, table: &RawTable, sequences: &SequenceInfo) -> Result<AnalysisOutcome> {
        let config = &self.config;
        let layout = &config.columns;
        let design = &config.design;

        config.validate(table.n_columns())?;
        notify(&mut self.progress, Stage::Validated);
        info!(name = %config.name, design = design.name(), "starting analysis");

        let filtered = apply_filters(table, config)?;
        if filtered.n_rows() == 0 {
            return Err(ProteolysisError::EmptyData(
                "no rows left after filtering".to_string(),
            ));
        }
        notify(&mut self.progress, Stage::Filtered { rows: filtered.n_rows() });

        let intensity_cols = layout.intensity_columns();
        let steps = run_prep(&filtered, &intensity_cols, &config.prep)?;
        notify(&mut self.progress, Stage::Prepared);

        let sequences_col: Vec<String> = filtered
            .column(layout.sequence)?
            .iter()
            .map(|s| s.trim().to_ascii_uppercase())
            .collect();
        let scores = filtered.numeric_column(layout.score)?;
        let positions = nc_res_numbers(sequences, &sequences_col)?;
        notify(&mut self.progress, Stage::Mapped);

        // Positions of each replicate block inside the prepared matrix.
        let n_control = layout.control.len();
        let control_pos: Vec<usize> = (0..n_control).collect();
        let mut group_pos = Vec::with_capacity(layout.experiments.len());
        let mut offset = n_control;
        for group in &layout.experiments {
            group_pos.push((offset..offset + group.columns.len()).collect::<Vec<usize>>());
            offset += group.columns.len();
        }

        let prepared = steps.prepared();
        let alpha = config.alpha;
        let rows: Vec<PeptideResult> = (0..prepared.n_rows())
            .into_par_iter()
            .map(|i| {
                let control = prepared.row_subset(i, &control_pos);
                let groups: Vec<Vec<f64>> =
                    group_pos.iter().map(|cols| prepared.row_subset(i, cols)).collect();
                let tests = design
                    .test_groups(&control, &groups, alpha)
                    .map_err(|e| ProteolysisError::PeptideTest {
                        peptide: sequences_col[i].clone(),
                        source: Box::new(e),
                    })?;
                Ok(PeptideResult {
                    sequence: sequences_col[i].clone(),
                    score: scores[i],
                    position: positions[i],
                    control,
                    groups: groups
                        .into_iter()
                        .zip(tests)
                        .map(|(intensities, t)| GroupResult::new(intensities, t.detail, t.p_value))
                        .collect(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        info!(rows = rows.len(), "tested peptides");
        notify(&mut self.progress, Stage::Tested);

        let mut results = ResultTable::new(
            design.name(),
            layout.labels(),
            alpha,
            !config.correction.is_none(),
        );
        results.rows = rows;
        for label in 0..results.n_labels() {
            let raw: Vec<f64> = results.rows.iter().map(|r| r.groups[label].p_value).collect();
            let adjusted = config.correction.adjust(&raw);
            for (row, p) in results.rows.iter_mut().zip(adjusted) {
                row.groups[label].p_adjusted = p;
            }
        }
        notify(&mut self.progress, Stage::Corrected);

        let n_significant = results.n_significant();
        for (label, n) in results.labels.iter().zip(&n_significant) {
            debug!(label = %label, significant = n, "significant peptides");
        }
        if !results.has_significant() {
            let message = format!(
                "No peptide is significant at alpha = {} in any experimental group",
                alpha
            );
            warn!(%message, "stopping early");
            notify(&mut self.progress, Stage::Finished);
            return Ok(AnalysisOutcome::NoSignificant { message, steps });
        }

        results.sort_by_position();
        info!(
            rows = results.len(),
            significant = n_significant.iter().sum::<usize>(),
            "analysis complete"
        );
        notify(&mut self.progress, Stage::Finished);

        Ok(AnalysisOutcome::Completed(AnalysisOutput { steps, results }))
    }
}

fn notify(progress: &mut Option<ProgressFn<'_>>, stage: Stage) {
    if let Some(callback) = progress.as_mut() {
        callback(stage);
    }
}

/// Row filters applied before data preparation.
///
/// Rows flagged in any exclusion column are dropped first, then rows not
/// assigned to the target protein, then rows scoring below the threshold.
pub fn apply_filters(table: &RawTable, config: &AnalysisConfig) -> Result<RawTable> {
    let layout = &config.columns;
    let mut current = table.clone();

    if let Some(exclude) = &layout.exclude {
        current = current.exclude_rows(exclude.indices())?;
        debug!(rows = current.n_rows(), "after exclusion flags");
    }

    if let (Some(target), Some(col)) = (&config.target_protein, layout.detected_protein) {
        let keep: Vec<usize> = current
            .column(col)?
            .into_iter()
            .enumerate()
            .filter(|(_, cell)| cell.split(';').any(|p| p.trim() == target.as_str()))
            .map(|(i, _)| i)
            .collect();
        current = current.subset_rows(&keep)?;
        debug!(rows = current.n_rows(), target = %target, "after target protein");
    }

    current = current.filter_numeric(layout.score, Comparator::Ge, config.score_threshold)?;
    info!(
        input = table.n_rows(),
        kept = current.n_rows(),
        "filtered input rows"
    );
    Ok(current)
}

/// Run one analysis without a progress callback.
pub fn run_analysis(
    config: &AnalysisConfig,
    table: &RawTable,
    sequences: &SequenceInfo,
) -> Result<AnalysisOutcome> {
    AnalysisRunner::new(config.clone()).run(table, sequences)
}
