use thiserror::Error;

pub type Result<T> = std::result::Result<T, DecisionTreeError>;

/// Errors raised while configuring, fitting or inspecting a decision tree
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecisionTreeError {
    /// The targets do not contain exactly two distinct labels
    #[error("y must be binary, but {found} distinct labels were found")]
    NotBinary { found: usize },
    /// A target lies outside the binary label domain fixed at the root
    #[error("y[{index}]={label} must be either class0={class0} or class1={class1}")]
    UnknownLabel {
        index: usize,
        label: String,
        class0: String,
        class1: String,
    },
    /// A single-class node holds a label outside the binary label domain
    #[error("unexpected dominant class {label} (should be either {class0} or {class1})")]
    UnexpectedDominantClass {
        label: String,
        class0: String,
        class1: String,
    },
    /// A node observed more than two classes
    #[error("more than 2 classes in y detected: {0}")]
    TooManyClasses(usize),
    /// Statistics were requested for a population without samples
    #[error("no samples reached this node")]
    EmptyPopulation,
    #[error("invalid impurity measure {0:?}, expected \"entropy\" or \"gini_impurity\"")]
    UnknownSplitQuality(String),
    #[error("invalid traversal order {0:?}, expected \"Inorder\", \"Preorder\" or \"Postorder\"")]
    UnknownTraversal(String),
    #[error("feature index {index} is out of bounds for {nfeatures} features")]
    FeatureOutOfBounds { index: usize, nfeatures: usize },
    #[error("expected records with {expected} features, but found {found}")]
    MismatchedFeatures { expected: usize, found: usize },
    #[error(transparent)]
    BaseCrate(#[from] machlearn::Error),
}
