//! Data structures for proteolysis analysis.

mod aggregate;
mod columns;
mod compare;
mod config;
mod result;
pub(crate) mod table;

pub use aggregate::AggregateTable;
pub use columns::{parse_groups, ColumnSpec};
pub use compare::Comparator;
pub use config::{
    AnalysisConfig, ColumnLayout, ExperimentGroup, ImputationMethod, MissingPolicy,
    NormalizationMethod, PrepConfig, TransformMethod,
};
pub use result::{format_list, GroupResult, PeptideResult, ResultTable, TestDetail};
pub use table::{RawTable, StringMatch};
