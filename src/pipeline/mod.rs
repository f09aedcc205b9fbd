//! Analysis orchestration: designs and the runner that executes them.

mod design;
mod runner;

pub use design::{
    AnalysisDesign, GroupTest, LimProtDesign, ProtProfDesign, RunAnalysis, TarProtDesign,
};
pub use runner::{
    apply_filters, run_analysis, AnalysisOutcome, AnalysisOutput, AnalysisRunner, Stage,
};
