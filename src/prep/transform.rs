//! Transform stage.

use crate::data::TransformMethod;
use crate::prep::IntensityMatrix;

/// Apply an elementwise transformation.
///
/// `Log2` maps non-positive values to NaN rather than `-inf`, so a zero that
/// survived the Float stage is still treated as missing downstream.
pub fn transform(matrix: &IntensityMatrix, method: TransformMethod) -> IntensityMatrix {
    let data = match method {
        TransformMethod::None => matrix.data.clone(),
        TransformMethod::Log2 => matrix
            .data
            .map(|x| if x > 0.0 { x.log2() } else { f64::NAN }),
    };
    matrix.with_stage(data, "transform")
}
