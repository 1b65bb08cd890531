//!
//! # Nearest-neighbour classification
//! `machlearn-nn` classifies points by the majority label of their closest training samples.
//!
//! The search is a linear scan over the memorised training set, so lookups cost one distance
//! evaluation per training row. The metric is chosen when the hyperparameters are built, either
//! one of the [predefined distances](distance/index.html) or any type implementing
//! [`Distance`](distance/trait.Distance.html).
//!

pub mod distance;

mod algorithm;
mod error;
mod hyperparams;

pub use algorithm::*;
pub use distance::{CommonDistance, Distance, Point};
pub use error::*;
pub use hyperparams::*;
