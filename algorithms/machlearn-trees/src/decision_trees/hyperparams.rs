use machlearn::{
    error::{Error, Result},
    Float, Label, ParamGuard,
};
use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use super::DecisionTreeError;
use crate::DecisionTree;

/// Impurity measure minimised by every split
///
/// Candidates are compared by the impurity of both partitions averaged by their sample count,
/// and the node keeps the lowest. Parsed from `"entropy"` or `"gini_impurity"`.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplitQuality {
    /// `1 - p0² - p1²`, the chance that a label drawn from the node mislabels another draw
    Gini,
    /// `-p0·log2(p0) - p1·log2(p1)` in bits, zero for a pure node and one for an even mix
    Entropy,
}

impl FromStr for SplitQuality {
    type Err = DecisionTreeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "entropy" => Ok(SplitQuality::Entropy),
            "gini_impurity" | "gini" => Ok(SplitQuality::Gini),
            other => Err(DecisionTreeError::UnknownSplitQuality(other.to_string())),
        }
    }
}

impl fmt::Display for SplitQuality {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SplitQuality::Entropy => write!(f, "entropy"),
            SplitQuality::Gini => write!(f, "gini_impurity"),
        }
    }
}

/// The feature columns a tree is allowed to split on
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeatureSubset {
    /// Every column of the records
    All,
    /// Only these columns, evaluated in the given order
    Indices(Vec<usize>),
}

impl FeatureSubset {
    /// Resolves the eligible column indices for records with `nfeatures` columns
    pub fn resolve(&self, nfeatures: usize) -> std::result::Result<Vec<usize>, DecisionTreeError> {
        match self {
            FeatureSubset::All => Ok((0..nfeatures).collect()),
            FeatureSubset::Indices(indices) => {
                if let Some(&index) = indices.iter().find(|&&idx| idx >= nfeatures) {
                    return Err(DecisionTreeError::FeatureOutOfBounds { index, nfeatures });
                }
                Ok(indices.clone())
            }
        }
    }
}

impl From<Vec<usize>> for FeatureSubset {
    fn from(indices: Vec<usize>) -> Self {
        FeatureSubset::Indices(indices)
    }
}

impl From<&[usize]> for FeatureSubset {
    fn from(indices: &[usize]) -> Self {
        FeatureSubset::Indices(indices.to_vec())
    }
}

/// The set of hyperparameters that can be specified for fitting a
/// [decision tree](struct.DecisionTree.html).
///
/// ### Example
///
/// ```rust
/// use machlearn_trees::{DecisionTree, SplitQuality};
/// use machlearn::prelude::*;
/// use ndarray::array;
///
/// // Initialize the default set of parameters
/// let params = DecisionTree::params();
/// // Set the parameters to the desired values
/// let params = params.split_quality(SplitQuality::Gini).max_depth(1);
///
/// let dataset = Dataset::new(array![[1.], [2.], [3.], [4.]], array![0, 0, 1, 1]);
/// // Fit the decision tree on the training data
/// let tree = params.fit(&dataset).unwrap();
/// assert_eq!(tree.predict(dataset.records()), array![0, 0, 1, 1]);
/// ```
///
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct DecisionTreeValidParams<F, L> {
    split_quality: SplitQuality,
    max_depth: usize,
    features: FeatureSubset,

    marker: PhantomData<(F, L)>,
}

impl<F: Float, L> DecisionTreeValidParams<F, L> {
    pub fn split_quality(&self) -> SplitQuality {
        self.split_quality
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn features(&self) -> &FeatureSubset {
        &self.features
    }
}

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct DecisionTreeParams<F, L>(DecisionTreeValidParams<F, L>);

impl<F: Float, L: Label> DecisionTreeParams<F, L> {
    pub fn new() -> Self {
        Self(DecisionTreeValidParams {
            split_quality: SplitQuality::Entropy,
            max_depth: 10,
            features: FeatureSubset::All,
            marker: PhantomData,
        })
    }

    /// Sets the metric used to decide the feature on which to split a node
    pub fn split_quality(mut self, split_quality: SplitQuality) -> Self {
        self.0.split_quality = split_quality;
        self
    }

    /// Sets the limit to the depth of the decision tree, the root sits at depth zero
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.0.max_depth = max_depth;
        self
    }

    /// Restricts the split search to a subset of the feature columns
    ///
    /// With 30 features, `features(vec![2, 15])` only ever splits on the third and sixteenth
    /// column.
    pub fn features<S: Into<FeatureSubset>>(mut self, features: S) -> Self {
        self.0.features = features.into();
        self
    }
}

impl<F: Float, L: Label> Default for DecisionTreeParams<F, L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float, L: Label> DecisionTree<F, L> {
    /// Defaults are provided if the optional parameters are not specified:
    /// * `split_quality = SplitQuality::Entropy`
    /// * `max_depth = 10`
    /// * `features = FeatureSubset::All`
    // Violates the convention that new should return a value of type `Self`
    #[allow(clippy::new_ret_no_self)]
    pub fn params() -> DecisionTreeParams<F, L> {
        DecisionTreeParams::new()
    }
}

impl<F, L> ParamGuard for DecisionTreeParams<F, L> {
    type Checked = DecisionTreeValidParams<F, L>;
    type Error = Error;

    fn check_ref(&self) -> Result<&Self::Checked> {
        if self.0.max_depth == 0 {
            return Err(Error::Parameters(
                "Maximum depth should be at least one".to_string(),
            ));
        }

        if let FeatureSubset::Indices(indices) = &self.0.features {
            if indices.is_empty() {
                return Err(Error::Parameters(
                    "At least one feature index has to be eligible for splitting".to_string(),
                ));
            }

            let unique = indices.iter().collect::<HashSet<_>>();
            if unique.len() != indices.len() {
                return Err(Error::Parameters(format!(
                    "Feature indices should be unique, but got {:?}",
                    indices
                )));
            }
        }

        Ok(&self.0)
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_impurity_measure_names() {
        assert_eq!("entropy".parse::<SplitQuality>(), Ok(SplitQuality::Entropy));
        assert_eq!("gini_impurity".parse::<SplitQuality>(), Ok(SplitQuality::Gini));
        assert_eq!(
            "misclassification".parse::<SplitQuality>(),
            Err(DecisionTreeError::UnknownSplitQuality(
                "misclassification".to_string()
            ))
        );
        assert_eq!(SplitQuality::Gini.to_string(), "gini_impurity");
    }

    #[test]
    fn defaults_follow_the_classic_configuration() {
        let params = DecisionTree::<f64, usize>::params().check().unwrap();

        assert_eq!(params.max_depth(), 10);
        assert_eq!(params.split_quality(), SplitQuality::Entropy);
        assert_eq!(params.features(), &FeatureSubset::All);
    }

    #[test]
    fn zero_depth_is_rejected() {
        let result = DecisionTree::<f64, usize>::params().max_depth(0).check();
        assert!(matches!(result, Err(Error::Parameters(_))));
    }

    #[test]
    fn feature_subsets_are_checked() {
        let empty = DecisionTree::<f64, usize>::params()
            .features(Vec::<usize>::new())
            .check();
        assert!(matches!(empty, Err(Error::Parameters(_))));

        let duplicated = DecisionTree::<f64, usize>::params()
            .features(vec![1, 1])
            .check();
        assert!(matches!(duplicated, Err(Error::Parameters(_))));

        let subset = FeatureSubset::from(vec![2, 0]);
        assert_eq!(subset.resolve(3), Ok(vec![2, 0]));
        assert_eq!(
            subset.resolve(2),
            Err(DecisionTreeError::FeatureOutOfBounds {
                index: 2,
                nfeatures: 2
            })
        );
        assert_eq!(FeatureSubset::All.resolve(2), Ok(vec![0, 1]));
    }
}
