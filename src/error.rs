//! Error types for the composable-proteolysis library.

use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum ProteolysisError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid numeric value '{value}' at row {row}, column '{column}'")]
    InvalidNumber {
        value: String,
        row: usize,
        column: String,
    },

    #[error("Invalid column specification '{spec}': {reason}")]
    InvalidColumnSpec { spec: String, reason: String },

    #[error("Column index {index} is out of range (table has {n_columns} columns)")]
    ColumnOutOfRange { index: usize, n_columns: usize },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Peptide '{peptide}' was not found in the protein sequence")]
    PeptideNotFound { peptide: String },

    #[error("Native sequence requested but none was provided")]
    NoNativeSequence,

    #[error("Invalid sequence: {0}")]
    InvalidSequence(String),

    #[error("Empty data: {0}")]
    EmptyData(String),

    #[error("Numerical error: {0}")]
    Numerical(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Statistical test failed for peptide '{peptide}': {source}")]
    PeptideTest {
        peptide: String,
        source: Box<ProteolysisError>,
    },

    #[error("Pipeline error: {0}")]
    Pipeline(String),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, ProteolysisError>;
