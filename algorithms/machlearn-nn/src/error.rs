use thiserror::Error;

pub type Result<T> = std::result::Result<T, NnError>;

/// Errors raised by the nearest-neighbour classifier
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NnError {
    #[error("invalid parameter {0}")]
    Parameters(String),
    #[error("{found} training samples are not enough to look up {n_neighbors} neighbours")]
    NotEnoughSamples { found: usize, n_neighbors: usize },
    #[error("points have dimension {found}, but the training records have {expected}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error(transparent)]
    BaseCrate(#[from] machlearn::Error),
}
