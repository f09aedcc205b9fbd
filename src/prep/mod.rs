//! Data preparation: Float -> Transform -> Normalize -> Impute.
//!
//! Each stage consumes the previous stage's matrix and produces a complete
//! new snapshot. Rows are never reordered, so row `i` of every stage
//! corresponds to row `i` of the initial table.

pub mod float;
pub mod impute;
pub mod normalize;
pub mod transform;

pub use float::to_float;
pub use impute::impute;
pub use normalize::normalize;
pub use transform::transform;

use crate::data::{PrepConfig, RawTable};
use crate::error::Result;
use nalgebra::DMatrix;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Numeric intensities (rows × replicate columns) with NaN for missing values.
#[derive(Debug, Clone, PartialEq)]
pub struct IntensityMatrix {
    pub data: DMatrix<f64>,
    /// Header of each column in the source table.
    pub column_names: Vec<String>,
    /// Name of the stage that produced this matrix.
    pub stage: String,
}

impl IntensityMatrix {
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[(row, col)]
    }

    pub fn n_rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn n_columns(&self) -> usize {
        self.data.ncols()
    }

    pub fn row(&self, row: usize) -> Vec<f64> {
        self.data.row(row).iter().cloned().collect()
    }

    pub fn column(&self, col: usize) -> Vec<f64> {
        self.data.column(col).iter().cloned().collect()
    }

    /// Values of one row restricted to a set of column positions.
    pub fn row_subset(&self, row: usize, cols: &[usize]) -> Vec<f64> {
        cols.iter().map(|&c| self.data[(row, c)]).collect()
    }

    /// Number of NaN cells.
    pub fn n_missing(&self) -> usize {
        self.data.iter().filter(|v| v.is_nan()).count()
    }

    /// Same data under a new stage name.
    pub(crate) fn with_stage(&self, data: DMatrix<f64>, stage: &str) -> Self {
        Self {
            data,
            column_names: self.column_names.clone(),
            stage: stage.to_string(),
        }
    }

    /// Write as tab-separated text with a leading row-number column.
    pub fn to_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        write!(writer, "Row")?;
        for name in &self.column_names {
            write!(writer, "\t{}", name)?;
        }
        writeln!(writer)?;

        for i in 0..self.n_rows() {
            write!(writer, "{}", i)?;
            for j in 0..self.n_columns() {
                write!(writer, "\t{}", self.data[(i, j)])?;
            }
            writeln!(writer)?;
        }

        Ok(())
    }
}

/// Snapshots of every preparation stage.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSteps {
    /// Filtered input table the numeric stages were computed from.
    pub initial: RawTable,
    pub float: IntensityMatrix,
    pub transform: IntensityMatrix,
    pub normalize: IntensityMatrix,
    pub impute: IntensityMatrix,
}

impl DataSteps {
    /// Matrix the statistical tests run on.
    pub fn prepared(&self) -> &IntensityMatrix {
        &self.impute
    }

    /// Write one TSV per stage into `dir` (created if needed).
    pub fn write_dir<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        self.initial.to_tsv(dir.join("1-Initial.tsv"))?;
        self.float.to_tsv(dir.join("2-Float.tsv"))?;
        self.transform.to_tsv(dir.join("3-Transformed.tsv"))?;
        self.normalize.to_tsv(dir.join("4-Normalized.tsv"))?;
        self.impute.to_tsv(dir.join("5-Imputed.tsv"))?;
        Ok(())
    }
}

/// Run all preparation stages on `columns` of `table`.
pub fn run_prep(table: &RawTable, columns: &[usize], config: &PrepConfig) -> Result<DataSteps> {
    let float = to_float(table, columns, config.missing)?;
    info!(
        rows = float.n_rows(),
        columns = float.n_columns(),
        missing = float.n_missing(),
        "float stage ready"
    );

    let transformed = transform(&float, config.transform);
    info!(method = ?config.transform, "transform stage ready");

    let normalized = normalize(&transformed, config.normalization)?;
    info!(method = ?config.normalization, "normalize stage ready");

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let imputed = impute(&normalized, config.imputation, &mut rng)?;
    info!(
        method = ?config.imputation,
        remaining_missing = imputed.n_missing(),
        "impute stage ready"
    );

    Ok(DataSteps {
        initial: table.clone(),
        float,
        transform: transformed,
        normalize: normalized,
        impute: imputed,
    })
}
