//! Error types in machlearn
//!

use thiserror::Error;

use ndarray::ShapeError;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("invalid parameter {0}")]
    Parameters(String),
    #[error("invalid ndarray shape {0}")]
    NdShape(#[from] ShapeError),
    #[error("mismatched number of samples: {records} records but {targets} targets")]
    MismatchedShapes { records: usize, targets: usize },
    #[error("unequal inputs: {weights} sample weights for {samples} samples")]
    MismatchedWeights { weights: usize, samples: usize },
    #[error("sample weight {weight} at index {index} must be finite and non-negative")]
    InvalidWeight { index: usize, weight: f32 },
    #[error("record at row {row}, column {col} is not finite")]
    NonFiniteRecord { row: usize, col: usize },
    #[error("Not enough samples")]
    NotEnoughSamples,
}
