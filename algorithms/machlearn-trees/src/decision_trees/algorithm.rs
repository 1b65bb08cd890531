//! Binary decision trees grown from scratch
//!
use std::collections::BTreeSet;

use log::{debug, info};
use ndarray::{Array1, Array2, ArrayBase, ArrayView1, Axis, Data, Ix2, Zip};

use super::split::SplitSearch;
use super::{
    ClassDistribution, DecisionTreeError, DecisionTreeValidParams, LabelDomain, NodeIter, Result,
    TreeNode,
};
use machlearn::{
    dataset::{AsTargets, Records},
    metrics::ToConfusionMatrix,
    traits::*,
    DatasetBase, Float, Label,
};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// Recursive state shared by every node of one fit
///
/// Observations are tracked by their row index. A node only ever sees the rows routed to it,
/// and hands disjoint subsets down to its children.
struct TreeBuilder<'a, F, L> {
    max_depth: usize,
    domain: &'a LabelDomain<L>,
    features: &'a [usize],
    search: SplitSearch<'a, F>,
}

impl<'a, F: Float, L: Label> TreeBuilder<'a, F, L> {
    /// Recursively builds the subtree of the given rows
    fn build(&self, rows: &[usize], depth: usize) -> Result<TreeNode<F, L>> {
        let impurity = self.search.impurity(rows);
        let distribution = ClassDistribution::from_classes(
            self.domain,
            self.search.classes,
            self.search.weights,
            rows,
        );
        let node = TreeNode::leaf(depth, impurity, distribution, self.domain)?;

        if impurity == F::zero() || depth >= self.max_depth {
            debug!(
                "leaf at depth {} with {} samples, impurity = {:.3}",
                depth,
                rows.len(),
                impurity
            );
            return Ok(node);
        }

        // a split routing every sample to the same side would leave an empty branch
        let best = match self.search.across_features(self.features, rows) {
            Some(best) if !best.split.is_degenerate() => best,
            _ => {
                debug!(
                    "leaf at depth {}, no threshold separates its {} samples",
                    depth,
                    rows.len()
                );
                return Ok(node);
            }
        };

        debug!(
            "split at depth {} on feature {} <= {:.3}, impurity {:.3} -> {:.3}",
            depth, best.feature, best.split.threshold, impurity, best.split.impurity
        );

        let column = self.search.records.column(best.feature);
        let (left, right): (Vec<usize>, Vec<usize>) = rows
            .iter()
            .partition(|&&row| column[row] <= best.split.threshold);

        let left = self.build(&left, depth + 1)?;
        let right = self.build(&right, depth + 1)?;

        Ok(node.with_split(&best, left, right))
    }
}

/// A fitted decision tree model for binary classification.
///
/// ### Structure
/// A decision tree structure is a binary tree where:
/// * Each internal node specifies a decision, represented by a choice of a feature and a threshold such that all observations for which
/// `feature <= threshold` is true fall in the left subtree, while the others fall in the right subtree.
///
/// * Leaf nodes make predictions, their prediction is the dominant label of the training samples which reached them.
///
/// ### Algorithm
///
/// Starting with a single root node, decision trees are trained recursively by applying the following rule to every
/// node considered:
///
/// * If the node is pure or sits at the maximal depth, it becomes a leaf;
/// * Otherwise every distinct value of every eligible feature proposes a threshold, and the one leaving the lowest
///   [impurity](enum.SplitQuality.html), weighted by the number of samples on each side, is selected;
/// * Two child nodes are generated, the left one containing all observations with `feature <= threshold` and the right one
///   containing the rest. If one of them would be empty, the node becomes a leaf instead.
///
/// The two labels of the task are fixed at the root, the smaller one is `class0` and the larger one `class1`.
///
/// ### Predictions
///
/// To predict the label of a sample, the tree is traversed from the root to a leaf, choosing between left and right children according to
/// the values of the features of the sample. The final prediction for the sample is the dominant label of the reached leaf, the
/// predicted probabilities are the (weighted) label shares of that leaf.
///
/// ### Example
///
/// Here is an example on how to train a decision tree from its parameters:
///
/// ```rust
///
/// use machlearn_trees::DecisionTree;
/// use machlearn::prelude::*;
/// use ndarray::array;
///
/// let dataset = Dataset::new(
///     array![[1., 8.], [2., 6.], [3., 7.], [4., 2.], [5., 1.], [6., 3.]],
///     array![0, 0, 0, 1, 1, 1],
/// );
/// // Fit the tree
/// let tree = DecisionTree::params().fit(&dataset).unwrap();
/// // Get accuracy on training set
/// let accuracy = tree.predict(&dataset).confusion_matrix(&dataset).unwrap().accuracy();
///
/// assert_eq!(accuracy, 1.0);
/// assert_eq!(tree.num_leaves(), 2);
///
/// ```
///
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTree<F, L: Ord> {
    root_node: TreeNode<F, L>,
    label_domain: LabelDomain<L>,
    num_features: usize,
}

impl<F: Float, L: Label, D: Data<Elem = F>> PredictInplace<ArrayBase<D, Ix2>, Array1<L>>
    for DecisionTree<F, L>
{
    /// Make predictions for each row of a matrix of features `x`.
    fn predict_inplace(&self, x: &ArrayBase<D, Ix2>, y: &mut Array1<L>) {
        assert_eq!(
            x.nrows(),
            y.len(),
            "The number of data points must match the number of output targets."
        );
        assert_eq!(
            x.ncols(),
            self.num_features,
            "The number of features must match the number of features seen during fitting."
        );

        Zip::from(x.view().axis_iter(Axis(0)))
            .and(y)
            .par_for_each(|row, target| *target = self.find_leaf(&row).prediction().clone());
    }

    fn default_target(&self, x: &ArrayBase<D, Ix2>) -> Array1<L> {
        Array1::from_elem(x.nrows(), self.root_node.prediction().clone())
    }
}

impl<F: Float, L: Label, D, T> Fit<ArrayBase<D, Ix2>, T, DecisionTreeError>
    for DecisionTreeValidParams<F, L>
where
    D: Data<Elem = F>,
    T: AsTargets<Elem = L>,
{
    type Object = DecisionTree<F, L>;

    /// Fit a decision tree using `hyperparamters` on the dataset consisting of
    /// a matrix of features `x` and an array of labels `y`.
    fn fit(&self, dataset: &DatasetBase<ArrayBase<D, Ix2>, T>) -> Result<Self::Object> {
        dataset.validate()?;

        let records = dataset.records().view();
        let targets = dataset.as_targets();

        // the label domain is fixed once for the whole tree
        let label_domain = LabelDomain::from_targets(targets)?;
        let features = self.features().resolve(records.ncols())?;
        let classes = label_domain.encode(targets)?;
        let weights = (0..dataset.nsamples())
            .map(|idx| F::cast(dataset.weight_for(idx)))
            .collect::<Vec<_>>();

        info!(
            "fitting decision tree on {} samples with {} features ({} eligible), {} impurity, max depth {}",
            dataset.nsamples(),
            records.ncols(),
            features.len(),
            self.split_quality(),
            self.max_depth()
        );

        let builder = TreeBuilder {
            max_depth: self.max_depth(),
            domain: &label_domain,
            features: &features,
            search: SplitSearch {
                records: records.view(),
                classes: &classes,
                weights: &weights,
                quality: self.split_quality(),
            },
        };
        let rows = (0..dataset.nsamples()).collect::<Vec<_>>();
        let root_node = builder.build(&rows, 0)?;

        let tree = DecisionTree {
            root_node,
            label_domain,
            num_features: records.ncols(),
        };

        info!(
            "fitted decision tree with {} nodes, {} leaves and depth {}",
            tree.iter_nodes().count(),
            tree.num_leaves(),
            tree.max_depth()
        );

        Ok(tree)
    }
}

impl<F: Float, L: Label> DecisionTree<F, L> {
    /// Create a node iterator in level-order (BFT)
    pub fn iter_nodes(&self) -> NodeIter<F, L> {
        NodeIter::new(&self.root_node)
    }

    /// Return the indices of the features used by a split, in ascending order
    pub fn features(&self) -> Vec<usize> {
        self.iter_nodes()
            .filter_map(|node| node.split())
            .map(|(feature, _)| feature)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Return root node of the tree
    pub fn root_node(&self) -> &TreeNode<F, L> {
        &self.root_node
    }

    /// Return the binary label domain fixed while fitting
    pub fn label_domain(&self) -> &LabelDomain<L> {
        &self.label_domain
    }

    /// Return the number of features seen while fitting
    pub fn num_features(&self) -> usize {
        self.num_features
    }

    /// Return max depth of the tree
    pub fn max_depth(&self) -> usize {
        self.iter_nodes()
            .fold(0, |max, node| usize::max(max, node.depth()))
    }

    /// Return the number of leaves in this tree
    pub fn num_leaves(&self) -> usize {
        self.iter_nodes().filter(|node| node.is_leaf()).count()
    }

    /// Walks from the root to the leaf responsible for `row`
    ///
    /// Samples with `row[feature] <= threshold` descend left, the others right.
    pub fn find_leaf(&self, row: &ArrayView1<F>) -> &TreeNode<F, L> {
        let mut node = &self.root_node;
        while let Some((feature, threshold)) = node.split() {
            let child = if row[feature] <= threshold {
                node.left_child()
            } else {
                node.right_child()
            };

            match child {
                Some(child) => node = child,
                None => break,
            }
        }

        node
    }

    /// Predict the probabilities of both labels for each row of `x`
    ///
    /// Returns a matrix with two columns, the probability of `class0` followed by the
    /// probability of `class1`.
    pub fn predict_proba<D: Data<Elem = F>>(&self, x: &ArrayBase<D, Ix2>) -> Array2<F> {
        assert_eq!(
            x.ncols(),
            self.num_features,
            "The number of features must match the number of features seen during fitting."
        );

        let mut probabilities = Array2::zeros((x.nrows(), 2));
        Zip::from(x.view().axis_iter(Axis(0)))
            .and(probabilities.axis_iter_mut(Axis(0)))
            .par_for_each(|row, mut probability| {
                let class1 = self.find_leaf(&row).class1_probability();
                probability[0] = F::one() - class1;
                probability[1] = class1;
            });

        probabilities
    }

    /// Mean accuracy of the predictions on a labelled dataset
    pub fn score<D, T>(&self, dataset: &DatasetBase<ArrayBase<D, Ix2>, T>) -> Result<f32>
    where
        D: Data<Elem = F>,
        T: AsTargets<Elem = L>,
    {
        if dataset.records().nfeatures() != self.num_features {
            return Err(DecisionTreeError::MismatchedFeatures {
                expected: self.num_features,
                found: dataset.records().nfeatures(),
            });
        }

        let predicted: Array1<L> = self.predict(dataset.records());
        let cm = predicted.confusion_matrix(dataset)?;

        Ok(cm.accuracy())
    }
}
