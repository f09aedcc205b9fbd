//! Statistical designs: which test runs for each peptide.

use crate::data::{ColumnLayout, TestDetail};
use crate::error::{ProteolysisError, Result};
use crate::test::{test_slope, test_t_independent, test_t_paired, test_tost, Theta, TostParams};
use serde::{Deserialize, Serialize};

/// Test outcome for one experimental group of one peptide.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupTest {
    pub detail: TestDetail,
    /// The p-value significance is judged on.
    pub p_value: f64,
}

/// Common interface of the analysis designs.
pub trait RunAnalysis {
    /// Short name used in logs and exported tables.
    fn name(&self) -> &'static str;

    /// Check the design against the column layout before any computation.
    fn validate(&self, layout: &ColumnLayout) -> Result<()>;

    /// Test every experimental group of one peptide against its control.
    ///
    /// Returns one entry per group, in group order.
    fn test_groups(&self, control: &[f64], groups: &[Vec<f64>], alpha: f64) -> Result<Vec<GroupTest>>;
}

/// Targeted proteolysis: slope of each group against the control level.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TarProtDesign;

impl RunAnalysis for TarProtDesign {
    fn name(&self) -> &'static str {
        "TarProt"
    }

    fn validate(&self, _layout: &ColumnLayout) -> Result<()> {
        Ok(())
    }

    fn test_groups(&self, control: &[f64], groups: &[Vec<f64>], _alpha: f64) -> Result<Vec<GroupTest>> {
        let fit = test_slope(control, groups)?;
        Ok((0..groups.len())
            .map(|g| GroupTest {
                detail: TestDetail::Slope {
                    slope: fit.slopes[g],
                    std_error: fit.std_errors[g],
                    statistic: fit.statistics[g],
                    df: fit.df,
                },
                p_value: fit.p_values[g],
            })
            .collect())
    }
}

/// Limited proteolysis: equivalence of each group to the control.
///
/// A hit is a peptide whose abundance is shown equivalent to baseline, so
/// the reported p-value is the TOST p-value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LimProtDesign {
    pub beta: f64,
    pub gamma: f64,
    pub theta: Theta,
    pub paired: bool,
}

impl Default for LimProtDesign {
    fn default() -> Self {
        Self {
            beta: 0.05,
            gamma: 0.8,
            theta: Theta::Auto { max: 8.0 },
            paired: true,
        }
    }
}

impl LimProtDesign {
    pub fn params(&self, alpha: f64) -> TostParams {
        TostParams {
            alpha,
            beta: self.beta,
            gamma: self.gamma,
            theta: self.theta,
            paired: self.paired,
        }
    }
}

impl RunAnalysis for LimProtDesign {
    fn name(&self) -> &'static str {
        "LimProt"
    }

    fn validate(&self, layout: &ColumnLayout) -> Result<()> {
        // Any valid alpha works here; the run's alpha is checked by the config.
        self.params(0.05).validate()?;
        if self.paired {
            check_paired(layout)?;
        }
        Ok(())
    }

    fn test_groups(&self, control: &[f64], groups: &[Vec<f64>], alpha: f64) -> Result<Vec<GroupTest>> {
        let params = self.params(alpha);
        groups
            .iter()
            .map(|group| {
                let r = test_tost(control, group, &params)?;
                Ok(GroupTest {
                    detail: TestDetail::Tost {
                        theta: r.theta,
                        difference: r.difference,
                        t_two: r.t_two,
                        p_two: r.p_two,
                        t_lower: r.t_lower,
                        p_lower: r.p_lower,
                        t_upper: r.t_upper,
                        p_upper: r.p_upper,
                    },
                    p_value: r.p_tost,
                })
            })
            .collect()
    }
}

/// Protein profiling: log2 fold change with a two-sample t-test.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProtProfDesign {
    #[serde(default)]
    pub paired: bool,
    /// Force pooled (`true`) or Welch (`false`) variance; F-test decides when absent.
    #[serde(default)]
    pub equal_var: Option<bool>,
}

impl RunAnalysis for ProtProfDesign {
    fn name(&self) -> &'static str {
        "ProtProf"
    }

    fn validate(&self, layout: &ColumnLayout) -> Result<()> {
        if self.paired {
            check_paired(layout)?;
        }
        Ok(())
    }

    fn test_groups(&self, control: &[f64], groups: &[Vec<f64>], alpha: f64) -> Result<Vec<GroupTest>> {
        groups
            .iter()
            .map(|group| {
                let r = if self.paired {
                    test_t_paired(group, control, alpha)?
                } else {
                    test_t_independent(group, control, alpha, self.equal_var)?
                };
                Ok(GroupTest {
                    detail: TestDetail::TTest {
                        log2_fc: r.difference,
                        statistic: r.statistic,
                        df: r.df,
                        pooled: r.pooled,
                    },
                    p_value: r.p_value,
                })
            })
            .collect()
    }
}

/// The statistical design of a run.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum AnalysisDesign {
    #[default]
    TarProt,
    LimProt(LimProtDesign),
    ProtProf(ProtProfDesign),
}

impl AnalysisDesign {
    fn inner(&self) -> &dyn RunAnalysis {
        match self {
            Self::TarProt => &TarProtDesign,
            Self::LimProt(d) => d,
            Self::ProtProf(d) => d,
        }
    }
}

impl RunAnalysis for AnalysisDesign {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn validate(&self, layout: &ColumnLayout) -> Result<()> {
        self.inner().validate(layout)
    }

    fn test_groups(&self, control: &[f64], groups: &[Vec<f64>], alpha: f64) -> Result<Vec<GroupTest>> {
        self.inner().test_groups(control, groups, alpha)
    }
}

/// Paired designs need every group to have as many replicates as the control.
fn check_paired(layout: &ColumnLayout) -> Result<()> {
    for group in &layout.experiments {
        if group.columns.len() != layout.control.len() {
            return Err(ProteolysisError::InvalidParameter(format!(
                "paired design: group '{}' has {} replicates, control has {}",
                group.label,
                group.columns.len(),
                layout.control.len()
            )));
        }
    }
    Ok(())
}
