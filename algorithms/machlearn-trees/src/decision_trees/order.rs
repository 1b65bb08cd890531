//! Structural dumps of a fitted tree
//!
//! A dump mirrors the tree: every node becomes a [`NodeSummary`](struct.NodeSummary.html)
//! with rounded statistics, and its children become nested dumps. The traversal order decides
//! in which order the `left`, `curr` and `right` entries are emitted, both when flattening and
//! when serializing.
use std::fmt;
use std::str::FromStr;

use machlearn::{Float, Label};

#[cfg(feature = "serde")]
use serde_crate::{
    ser::{SerializeMap, Serializer},
    Deserialize, Serialize,
};

use super::{DecisionTree, DecisionTreeError, TreeNode};

/// Order in which a node and its two subtrees are visited
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Traversal {
    /// Left subtree, node, right subtree
    InOrder,
    /// Node, left subtree, right subtree
    PreOrder,
    /// Left subtree, right subtree, node
    PostOrder,
}

#[derive(Clone, Copy)]
enum Slot {
    Left,
    Curr,
    Right,
}

impl Traversal {
    fn slots(self) -> [Slot; 3] {
        match self {
            Traversal::InOrder => [Slot::Left, Slot::Curr, Slot::Right],
            Traversal::PreOrder => [Slot::Curr, Slot::Left, Slot::Right],
            Traversal::PostOrder => [Slot::Left, Slot::Right, Slot::Curr],
        }
    }
}

impl FromStr for Traversal {
    type Err = DecisionTreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "inorder" => Ok(Traversal::InOrder),
            "preorder" => Ok(Traversal::PreOrder),
            "postorder" => Ok(Traversal::PostOrder),
            _ => Err(DecisionTreeError::UnknownTraversal(s.to_string())),
        }
    }
}

impl fmt::Display for Traversal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Traversal::InOrder => write!(f, "Inorder"),
            Traversal::PreOrder => write!(f, "Preorder"),
            Traversal::PostOrder => write!(f, "Postorder"),
        }
    }
}

/// Rounds to three decimals, without a negative sign on zero
fn three_decimals<F: Float>(value: F) -> String {
    let value = if value == F::zero() { F::zero() } else { value };
    format!("{:.3}", value)
}

/// Statistics of one node, rounded for display
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct NodeSummary<F, L> {
    pub depth: usize,
    pub impurity: String,
    pub sample_count: usize,
    /// Observed labels with their sample count and summed sample weight, in ascending label order
    pub class_distribution: Vec<(L, usize, F)>,
    pub dominant_class: L,
    pub class1_probability: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub split_feature: Option<usize>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub split_threshold: Option<String>,
}

impl<F: Float, L: Label> From<&TreeNode<F, L>> for NodeSummary<F, L> {
    fn from(node: &TreeNode<F, L>) -> Self {
        NodeSummary {
            depth: node.depth(),
            impurity: three_decimals(node.impurity()),
            sample_count: node.sample_count(),
            class_distribution: node
                .class_distribution()
                .iter()
                .map(|(label, count, weight)| (label.clone(), count, weight))
                .collect(),
            dominant_class: node.prediction().clone(),
            class1_probability: three_decimals(node.class1_probability()),
            split_feature: node.split().map(|(feature, _)| feature),
            split_threshold: node.split().map(|(_, threshold)| three_decimals(threshold)),
        }
    }
}

impl<F: fmt::Display, L: fmt::Debug> fmt::Display for NodeSummary<F, L> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "depth {}: impurity {}, {} samples, distribution {{",
            self.depth, self.impurity, self.sample_count
        )?;
        for (i, (label, count, weight)) in self.class_distribution.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}: {} (weight {})", label, count, weight)?;
        }
        write!(
            f,
            "}}, dominant {:?}, class1 probability {}",
            self.dominant_class, self.class1_probability
        )?;

        match (&self.split_feature, &self.split_threshold) {
            (Some(feature), Some(threshold)) => {
                write!(f, ", split x[{}] <= {}", feature, threshold)
            }
            _ => Ok(()),
        }
    }
}

/// Nested dump of a (sub)tree in one traversal order
#[derive(Clone, Debug, PartialEq)]
pub struct OrderedNode<F, L> {
    traversal: Traversal,
    pub curr: NodeSummary<F, L>,
    pub left: Option<Box<OrderedNode<F, L>>>,
    pub right: Option<Box<OrderedNode<F, L>>>,
}

impl<F: Float, L: Label> OrderedNode<F, L> {
    fn of(node: &TreeNode<F, L>, traversal: Traversal) -> Self {
        OrderedNode {
            traversal,
            curr: NodeSummary::from(node),
            left: node
                .left_child()
                .map(|child| Box::new(OrderedNode::of(child, traversal))),
            right: node
                .right_child()
                .map(|child| Box::new(OrderedNode::of(child, traversal))),
        }
    }
}

impl<F, L> OrderedNode<F, L> {
    pub fn traversal(&self) -> Traversal {
        self.traversal
    }

    /// All node summaries of this dump, in traversal order
    pub fn nodes(&self) -> Vec<&NodeSummary<F, L>> {
        let mut nodes = Vec::new();
        self.collect(&mut nodes);
        nodes
    }

    fn collect<'a>(&'a self, nodes: &mut Vec<&'a NodeSummary<F, L>>) {
        for slot in self.traversal.slots().iter() {
            match slot {
                Slot::Left => {
                    if let Some(left) = &self.left {
                        left.collect(nodes);
                    }
                }
                Slot::Curr => nodes.push(&self.curr),
                Slot::Right => {
                    if let Some(right) = &self.right {
                        right.collect(nodes);
                    }
                }
            }
        }
    }
}

/// One line per node in traversal order, indented by depth
impl<F: fmt::Display, L: fmt::Debug> fmt::Display for OrderedNode<F, L> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for node in self.nodes() {
            writeln!(f, "{:indent$}{}", "", node, indent = 2 * node.depth)?;
        }
        Ok(())
    }
}

/// Emits the `left`, `curr` and `right` entries in traversal order, missing children as `null`
#[cfg(feature = "serde")]
impl<F: Serialize, L: Serialize> Serialize for OrderedNode<F, L> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        for slot in self.traversal.slots().iter() {
            match slot {
                Slot::Left => map.serialize_entry("left", &self.left)?,
                Slot::Curr => map.serialize_entry("curr", &self.curr)?,
                Slot::Right => map.serialize_entry("right", &self.right)?,
            }
        }
        map.end()
    }
}

impl<F: Float, L: Label> DecisionTree<F, L> {
    /// Dumps the tree structure in the given traversal order
    ///
    /// ```rust
    /// use machlearn_trees::{DecisionTree, Traversal};
    /// use machlearn::prelude::*;
    /// use ndarray::array;
    ///
    /// let dataset = Dataset::new(array![[1.], [2.], [3.], [4.]], array![0, 0, 1, 1]);
    /// let tree = DecisionTree::params().fit(&dataset).unwrap();
    ///
    /// let dump = tree.order("Preorder".parse::<Traversal>().unwrap());
    /// let thresholds = dump
    ///     .nodes()
    ///     .iter()
    ///     .map(|node| node.split_threshold.clone())
    ///     .collect::<Vec<_>>();
    /// assert_eq!(thresholds, vec![Some("2.500".to_string()), None, None]);
    /// ```
    pub fn order(&self, traversal: Traversal) -> OrderedNode<F, L> {
        OrderedNode::of(self.root_node(), traversal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use machlearn::prelude::*;
    use ndarray::array;

    fn fitted() -> DecisionTree<f64, usize> {
        // root splits at 2.5, its right child at 4.5
        let dataset = Dataset::new(
            array![[1.], [2.], [3.], [4.], [5.], [6.]],
            array![0, 0, 1, 1, 0, 0],
        );
        DecisionTree::params().fit(&dataset).unwrap()
    }

    fn depths(dump: &OrderedNode<f64, usize>) -> Vec<usize> {
        dump.nodes().iter().map(|node| node.depth).collect()
    }

    #[test]
    fn parses_traversal_names() {
        assert_eq!("Inorder".parse::<Traversal>(), Ok(Traversal::InOrder));
        assert_eq!("preorder".parse::<Traversal>(), Ok(Traversal::PreOrder));
        assert_eq!("POSTORDER".parse::<Traversal>(), Ok(Traversal::PostOrder));
        assert_eq!(
            "levelorder".parse::<Traversal>(),
            Err(DecisionTreeError::UnknownTraversal("levelorder".to_string()))
        );
        assert_eq!(Traversal::PostOrder.to_string(), "Postorder");
    }

    #[test]
    fn traversal_orders() {
        let tree = fitted();
        assert_eq!(tree.root_node().split(), Some((0, 2.5)));

        // nodes: root (0), leaf (1), inner (1), leaf (2), leaf (2)
        assert_eq!(depths(&tree.order(Traversal::PreOrder)), vec![0, 1, 1, 2, 2]);
        assert_eq!(depths(&tree.order(Traversal::InOrder)), vec![1, 0, 2, 1, 2]);
        assert_eq!(depths(&tree.order(Traversal::PostOrder)), vec![1, 2, 2, 1, 0]);
    }

    #[test]
    fn summaries_are_rounded() {
        let tree = fitted();
        let dump = tree.order(Traversal::PreOrder);

        let root = &dump.curr;
        assert_eq!(root.impurity, "0.918");
        assert_eq!(root.sample_count, 6);
        assert_eq!(root.class_distribution, vec![(0, 4, 4.0), (1, 2, 2.0)]);
        assert_eq!(root.dominant_class, 0);
        assert_eq!(root.class1_probability, "0.333");
        assert_eq!(root.split_feature, Some(0));
        assert_eq!(root.split_threshold.as_deref(), Some("2.500"));

        let leaf = &dump.left.as_ref().unwrap().curr;
        assert_eq!(leaf.impurity, "0.000");
        assert_eq!(leaf.class1_probability, "0.000");
        assert_eq!(leaf.split_feature, None);
        assert_eq!(leaf.split_threshold, None);
        assert!(dump.left.as_ref().unwrap().left.is_none());
    }

    #[test]
    fn distribution_keeps_counts_next_to_weights() {
        let dataset = Dataset::new(
            array![[1.], [2.], [3.], [4.], [5.], [6.]],
            array![0, 0, 1, 1, 0, 0],
        )
        .with_weights(array![2., 1., 1., 1., 1., 1.]);
        let tree = DecisionTree::params().max_depth(1).fit(&dataset).unwrap();
        let dump = tree.order(Traversal::PreOrder);

        assert_eq!(dump.curr.class_distribution, vec![(0, 4, 5.0), (1, 2, 2.0)]);
        assert!(dump
            .to_string()
            .contains("distribution {0: 4 (weight 5), 1: 2 (weight 2)}"));
    }

    #[test]
    fn display_indents_by_depth() {
        let dump = fitted().order(Traversal::PreOrder).to_string();
        let lines = dump.lines().collect::<Vec<_>>();

        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("depth 0: impurity 0.918, 6 samples"));
        assert!(lines[0].ends_with("split x[0] <= 2.500"));
        assert!(lines[1].starts_with("  depth 1"));
        assert!(lines[3].starts_with("    depth 2"));
    }
}
