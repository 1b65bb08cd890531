//!
//! # Decision tree learning
//! `machlearn-trees` provides a from-scratch implementation of binary decision tree
//! classification.
//!
//! # The big picture
//!
//! `machlearn-trees` is a crate in the `machlearn` toolkit, a collection of classical machine
//! learning algorithms written from scratch to show how they work.
//!
//! A decision tree learns simple decision rules of the form `feature <= threshold` from
//! labelled data. It is grown greedily: every node tries every distinct value of every eligible
//! feature and keeps the threshold that leaves the purest partitions, measured with
//! [entropy](fn.entropy.html) or [Gini impurity](fn.gini_impurity.html).
//!
//! # Current state
//!
//! `machlearn-trees` currently provides an [implementation](DecisionTree) of single-tree
//! fitting for binary classification with optional sample weights, together with the
//! building blocks it is made of: the [split search](fn.find_best_split.html), the
//! [weighted impurity](fn.weighted_impurity.html) of a labelled population and
//! [structural dumps](struct.OrderedNode.html) of a fitted tree.
//!
//! Progress is reported through the [`log`](https://docs.rs/log) facade: `info` once per fit,
//! `debug` per node and evaluated feature, and `trace` per candidate threshold.
//!

mod decision_trees;

// Re-export all core decision tree functionality
pub use decision_trees::*;
