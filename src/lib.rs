//! Composable Proteolysis Analysis Library
//!
//! This library provides modular primitives for the quantitative analysis of
//! proteolysis mass-spectrometry experiments: targeted proteolysis (TarProt),
//! limited proteolysis (LimProt) and protein profiling (ProtProf).
//!
//! # Overview
//!
//! The library is organized into composable modules:
//!
//! - **data**: Core data structures (RawTable, AnalysisConfig, ResultTable, AggregateTable)
//! - **prep**: Data preparation (float conversion, log2, median normalization, imputation)
//! - **test**: Statistical tests (t-tests, F-test, TOST, slope, chi-square)
//! - **correct**: Multiple testing correction (Benjamini-Hochberg, Bonferroni, Holm)
//! - **seq**: Sequence mapping (peptide positions, recombinant/native alignment)
//! - **pipeline**: Analysis designs and the staged analysis runner
//! - **aggregate**: Cleavage-level summaries (fragments, histograms, CpR, AA distribution)
//!
//! # Example
//!
//! ```no_run
//! use composable_proteolysis::prelude::*;
//!
//! let config = AnalysisConfig::from_yaml(&std::fs::read_to_string("run.yaml").unwrap()).unwrap();
//! let table = RawTable::from_tsv("peptides.tsv").unwrap();
//! let sequences = SequenceInfo::from_fasta("protein.fasta").unwrap();
//!
//! let output = run_analysis(&config, &table, &sequences).unwrap().into_output().unwrap();
//! let fragments = fragments(&output.results, &sequences.coords(), Significance::at(0.05), 0).unwrap();
//! println!("{} fragments", fragments.total());
//! ```

pub mod aggregate;
pub mod correct;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod prep;
pub mod seq;
pub mod test;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::aggregate::{
        aa_distribution, cleavage_evolution, cleavage_per_residue, fragments, histogram,
        monotonicity, AaDistribution, Fragment, FragmentSet, HistWindows, Monotonicity,
        Significance,
    };
    pub use crate::correct::CorrectionMethod;
    pub use crate::data::{
        AggregateTable, AnalysisConfig, ColumnLayout, ColumnSpec, Comparator, ExperimentGroup,
        ImputationMethod, MissingPolicy, NormalizationMethod, PeptideResult, PrepConfig,
        RawTable, ResultTable, StringMatch, TestDetail, TransformMethod,
    };
    pub use crate::error::{ProteolysisError, Result};
    pub use crate::pipeline::{
        run_analysis, AnalysisDesign, AnalysisOutcome, AnalysisOutput, AnalysisRunner,
        LimProtDesign, ProtProfDesign, RunAnalysis, Stage,
    };
    pub use crate::prep::{run_prep, DataSteps, IntensityMatrix};
    pub use crate::seq::{
        nc_res_numbers, Coordinates, PeptidePosition, ProteinCoords, SeqTarget, SequenceInfo,
    };
    pub use crate::test::{
        test_chi, test_f, test_slope, test_t_independent, test_t_paired, test_tost, Theta,
    };
}
