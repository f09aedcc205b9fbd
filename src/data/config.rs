//! Immutable run configuration.

use crate::correct::CorrectionMethod;
use crate::data::ColumnSpec;
use crate::error::{ProteolysisError, Result};
use crate::pipeline::{AnalysisDesign, RunAnalysis};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How literal zero intensities are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MissingPolicy {
    /// Zero is a measured value.
    NotMissing,
    /// Zero means "not detected" and becomes NaN before any transformation.
    #[default]
    ZeroIsMissing,
}

/// Elementwise transformation of intensities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TransformMethod {
    None,
    #[default]
    Log2,
}

/// Per-column normalization of intensities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NormalizationMethod {
    None,
    #[default]
    Median,
}

/// Replacement of missing intensities.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ImputationMethod {
    #[default]
    None,
    /// Draw from N(mean - shift * sd, width * sd) of each column.
    NormalDistribution { shift: f64, width: f64 },
}

impl ImputationMethod {
    /// Down-shifted distribution with commonly used defaults.
    pub fn normal_default() -> Self {
        Self::NormalDistribution {
            shift: 1.8,
            width: 0.3,
        }
    }
}

/// Settings for the Float -> Transform -> Normalize -> Impute pipeline.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PrepConfig {
    #[serde(default)]
    pub missing: MissingPolicy,
    #[serde(default)]
    pub transform: TransformMethod,
    #[serde(default)]
    pub normalization: NormalizationMethod,
    #[serde(default)]
    pub imputation: ImputationMethod,
    /// Seed for imputation draws; entropy-seeded when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// A labelled block of replicate columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentGroup {
    pub label: String,
    pub columns: ColumnSpec,
}

impl ExperimentGroup {
    pub fn new(label: &str, columns: ColumnSpec) -> Self {
        Self {
            label: label.to_string(),
            columns,
        }
    }
}

/// Where each piece of information lives in the input table (0-based).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnLayout {
    pub sequence: usize,
    pub score: usize,
    /// Column listing the proteins a peptide was assigned to.
    #[serde(default)]
    pub detected_protein: Option<usize>,
    /// Flag columns; rows with any non-empty flag are dropped.
    #[serde(default)]
    pub exclude: Option<ColumnSpec>,
    pub control: ColumnSpec,
    pub experiments: Vec<ExperimentGroup>,
}

impl ColumnLayout {
    /// All intensity columns: control first, then each group in order.
    pub fn intensity_columns(&self) -> Vec<usize> {
        let mut cols = self.control.indices().to_vec();
        for group in &self.experiments {
            cols.extend_from_slice(group.columns.indices());
        }
        cols
    }

    pub fn labels(&self) -> Vec<String> {
        self.experiments.iter().map(|g| g.label.clone()).collect()
    }
}

/// Complete configuration for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub name: String,
    /// Protein the peptides must be assigned to (needs `detected_protein`).
    #[serde(default)]
    pub target_protein: Option<String>,
    /// Minimum identification score; rows below are dropped.
    #[serde(default)]
    pub score_threshold: f64,
    pub alpha: f64,
    #[serde(default)]
    pub correction: CorrectionMethod,
    pub columns: ColumnLayout,
    #[serde(default)]
    pub prep: PrepConfig,
    pub design: AnalysisDesign,
}

impl AnalysisConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(ProteolysisError::from)
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(ProteolysisError::from)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(ProteolysisError::from)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(ProteolysisError::from)
    }

    /// Reject configurations that cannot run against a table of `n_columns`.
    pub fn validate(&self, n_columns: usize) -> Result<()> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(ProteolysisError::InvalidParameter(format!(
                "alpha must be in (0, 1), got {}",
                self.alpha
            )));
        }
        if !self.score_threshold.is_finite() {
            return Err(ProteolysisError::InvalidParameter(
                "score threshold must be finite".to_string(),
            ));
        }

        let layout = &self.columns;
        for index in [Some(layout.sequence), Some(layout.score), layout.detected_protein]
            .into_iter()
            .flatten()
        {
            if index >= n_columns {
                return Err(ProteolysisError::ColumnOutOfRange { index, n_columns });
            }
        }
        if let Some(exclude) = &layout.exclude {
            exclude.check_bounds(n_columns)?;
        }
        if self.target_protein.is_some() && layout.detected_protein.is_none() {
            return Err(ProteolysisError::InvalidParameter(
                "target protein filtering needs a detected-protein column".to_string(),
            ));
        }

        if layout.experiments.is_empty() {
            return Err(ProteolysisError::InvalidParameter(
                "at least one experimental group is required".to_string(),
            ));
        }
        layout.control.check_bounds(n_columns)?;
        let mut labels = HashSet::new();
        for group in &layout.experiments {
            group.columns.check_bounds(n_columns)?;
            if group.label.trim().is_empty() {
                return Err(ProteolysisError::InvalidParameter(
                    "experiment labels must not be empty".to_string(),
                ));
            }
            if !labels.insert(group.label.as_str()) {
                return Err(ProteolysisError::InvalidParameter(format!(
                    "duplicate experiment label '{}'",
                    group.label
                )));
            }
        }

        let intensity = layout.intensity_columns();
        let mut seen = HashSet::new();
        for &col in &intensity {
            if !seen.insert(col) {
                return Err(ProteolysisError::InvalidParameter(format!(
                    "column {} is used by more than one replicate group",
                    col
                )));
            }
            if col == layout.sequence || col == layout.score {
                return Err(ProteolysisError::InvalidParameter(format!(
                    "column {} cannot be both an intensity and the sequence/score column",
                    col
                )));
            }
        }

        if let ImputationMethod::NormalDistribution { shift, width } = self.prep.imputation {
            if !shift.is_finite() || !(width > 0.0) || !width.is_finite() {
                return Err(ProteolysisError::InvalidParameter(format!(
                    "imputation needs finite shift and positive width (shift={}, width={})",
                    shift, width
                )));
            }
        }

        self.design.validate(layout)
    }
}
