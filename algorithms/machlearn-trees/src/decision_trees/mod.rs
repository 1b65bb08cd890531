mod algorithm;
mod domain;
mod error;
mod hyperparams;
mod impurity;
mod iter;
mod node;
mod order;
mod split;

pub use algorithm::*;
pub use domain::{weighted_impurity, ClassDistribution, LabelDomain};
pub use error::*;
pub use hyperparams::*;
pub use impurity::{entropy, gini_impurity};
pub use iter::*;
pub use node::*;
pub use order::*;
pub use split::{find_best_split, find_best_split_in_feature, FeatureSplit, ThresholdSplit};
