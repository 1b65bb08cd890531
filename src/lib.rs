//! `machlearn` is an educational toolkit of classical machine learning algorithms written from
//! scratch in Rust.
//!
//! This crate holds the pieces every algorithm shares: the [`Dataset`] container with records,
//! targets and sample weights, the fitting and prediction traits, hyperparameter checking and
//! classification metrics. The algorithms themselves live in their own crates:
//!
//! * `machlearn-trees`: a binary decision tree grown greedily on entropy or Gini impurity
//! * `machlearn-nn`: a brute-force k-nearest-neighbour classifier with pluggable distances
//!

pub mod dataset;
pub mod error;
mod metrics_classification;
mod param_guard;
pub mod prelude;
pub mod traits;

pub use dataset::{Dataset, DatasetBase, DatasetView, Float, Label};
pub use error::Error;
pub use param_guard::ParamGuard;

/// Common metrics functions for classification
pub mod metrics {
    pub use crate::metrics_classification::{
        BinaryClassification, ConfusionMatrix, ReceiverOperatingCharacteristic, ToConfusionMatrix,
    };
}
