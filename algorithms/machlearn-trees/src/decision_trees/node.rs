use machlearn::{Float, Label};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use super::{ClassDistribution, DecisionTreeError, FeatureSplit, LabelDomain, Result};

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
/// A node in the decision tree
///
/// Every node keeps the statistics of the samples which reached it during fitting. Internal
/// nodes additionally carry the split feature and threshold and own both children, leaves
/// carry neither.
pub struct TreeNode<F, L: Ord> {
    depth: usize,
    impurity: F,
    sample_count: usize,
    class_distribution: ClassDistribution<L, F>,
    prediction: L,
    class1_probability: F,
    split_feature: Option<usize>,
    split_threshold: Option<F>,
    information_gain: F,
    left_child: Option<Box<TreeNode<F, L>>>,
    right_child: Option<Box<TreeNode<F, L>>>,
}

impl<F: Float, L: Label> TreeNode<F, L> {
    /// Creates a leaf from the class distribution of its samples
    ///
    /// Fails with `EmptyPopulation` if no sample reached the node.
    pub(crate) fn leaf(
        depth: usize,
        impurity: F,
        class_distribution: ClassDistribution<L, F>,
        domain: &LabelDomain<L>,
    ) -> Result<Self> {
        let (prediction, class1_probability) = class_distribution
            .dominant_class(domain)?
            .ok_or(DecisionTreeError::EmptyPopulation)?;
        let sample_count = class_distribution.iter().map(|(_, n, _)| n).sum();

        Ok(TreeNode {
            depth,
            impurity,
            sample_count,
            class_distribution,
            prediction,
            class1_probability,
            split_feature: None,
            split_threshold: None,
            information_gain: F::zero(),
            left_child: None,
            right_child: None,
        })
    }

    /// Turns the node into an internal node owning both children
    pub(crate) fn with_split(
        mut self,
        split: &FeatureSplit<F>,
        left: TreeNode<F, L>,
        right: TreeNode<F, L>,
    ) -> Self {
        self.split_feature = Some(split.feature);
        self.split_threshold = Some(split.split.threshold);
        self.information_gain = split.split.information_gain;
        self.left_child = Some(Box::new(left));
        self.right_child = Some(Box::new(right));
        self
    }

    /// Returns true if the node has no split
    pub fn is_leaf(&self) -> bool {
        self.split_threshold.is_none()
    }

    /// Returns the depth of the node in the decision tree, the root has depth zero
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns the impurity of the node before splitting
    pub fn impurity(&self) -> F {
        self.impurity
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    pub fn class_distribution(&self) -> &ClassDistribution<L, F> {
        &self.class_distribution
    }

    /// Returns the dominant class of the samples in this node
    pub fn prediction(&self) -> &L {
        &self.prediction
    }

    /// Returns the (weighted) share of `class1` samples in this node
    pub fn class1_probability(&self) -> F {
        self.class1_probability
    }

    /// Returns the split (feature index, threshold) of internal nodes
    pub fn split(&self) -> Option<(usize, F)> {
        match (self.split_feature, self.split_threshold) {
            (Some(feature), Some(threshold)) => Some((feature, threshold)),
            _ => None,
        }
    }

    /// Returns the reduction of impurity achieved by the split, zero for leaves
    pub fn information_gain(&self) -> F {
        self.information_gain
    }

    pub fn left_child(&self) -> Option<&TreeNode<F, L>> {
        self.left_child.as_deref()
    }

    pub fn right_child(&self) -> Option<&TreeNode<F, L>> {
        self.right_child.as_deref()
    }

    /// Returns both children, first left then right
    pub fn children(&self) -> Vec<&Option<Box<TreeNode<F, L>>>> {
        vec![&self.left_child, &self.right_child]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ThresholdSplit;
    use ndarray::array;

    #[test]
    fn leaf_statistics() {
        let domain = LabelDomain::new("no", "yes").unwrap();
        let targets = array!["no", "yes", "yes", "yes"];
        let distribution = ClassDistribution::<_, f64>::from_targets(targets.view(), None).unwrap();

        let node = TreeNode::leaf(2, 0.81, distribution, &domain).unwrap();
        assert!(node.is_leaf());
        assert_eq!(node.split(), None);
        assert_eq!(node.depth(), 2);
        assert_eq!(node.sample_count(), 4);
        assert_eq!(node.prediction(), &"yes");
        assert_eq!(node.class1_probability(), 0.75);
        assert!(node.left_child().is_none() && node.right_child().is_none());
    }

    #[test]
    fn empty_population_has_no_leaf() {
        let domain = LabelDomain::new(0, 1).unwrap();
        let distribution =
            ClassDistribution::<i32, f32>::from_targets(ndarray::Array1::zeros(0).view(), None)
                .unwrap();

        assert_eq!(
            TreeNode::leaf(0, 0.0, distribution, &domain),
            Err(DecisionTreeError::EmptyPopulation)
        );
    }

    #[test]
    fn split_with_zero_threshold_is_internal() {
        let domain = LabelDomain::new(0, 1).unwrap();
        let node = |y: ndarray::Array1<i32>, depth| {
            let distribution = ClassDistribution::<_, f64>::from_targets(y.view(), None).unwrap();
            TreeNode::leaf(depth, 0.0, distribution, &domain).unwrap()
        };

        let split = FeatureSplit {
            feature: 3,
            split: ThresholdSplit {
                threshold: 0.0,
                impurity: 0.0,
                information_gain: 1.0,
                left_counts: [1, 0],
                right_counts: [0, 1],
            },
        };
        let root = node(array![0, 1], 0).with_split(&split, node(array![0], 1), node(array![1], 1));

        assert!(!root.is_leaf());
        assert_eq!(root.split(), Some((3, 0.0)));
        assert_eq!(root.information_gain(), 1.0);
        assert_eq!(root.left_child().map(|n| *n.prediction()), Some(0));
        assert_eq!(root.right_child().map(|n| *n.prediction()), Some(1));
        assert_eq!(root.children().iter().filter(|c| c.is_some()).count(), 2);
    }
}
