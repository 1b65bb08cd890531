//! Labelled samples
//!
//! A dataset pairs a feature matrix with one target per row and optional sample weights. The
//! algorithms only ever see records through the traits defined here.
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, ScalarOperand};

use num_traits::{AsPrimitive, FromPrimitive, NumAssignOps, NumCast, Signed};
use rand::distributions::uniform::SampleUniform;

use std::fmt;
use std::hash::Hash;
use std::iter::Sum;

mod impl_dataset;
mod impl_records;
mod impl_targets;

/// Element type of the feature matrix, either `f32` or `f64`
///
/// Impurities, thresholds, distances and probabilities are computed in the same type as the
/// records they come from.
pub trait Float:
    FromPrimitive
    + num_traits::Float
    + PartialOrd
    + Sync
    + Send
    + Default
    + fmt::Display
    + fmt::Debug
    + Signed
    + Sum
    + NumAssignOps
    + AsPrimitive<usize>
    + SampleUniform
    + ScalarOperand
    + approx::AbsDiffEq
{
    fn cast<T: NumCast>(x: T) -> Self {
        NumCast::from(x).unwrap()
    }
}

impl Float for f32 {}

impl Float for f64 {}

/// Discrete labels
///
/// Labels are countable, comparable, hashable and totally ordered. The ordering fixes which
/// of the two values of a binary task is considered the first class. Booleans, integers and
/// strings are supported.
pub trait Label: PartialEq + Eq + Hash + Ord + Clone + fmt::Debug + Send + Sync {}

impl Label for bool {}
impl Label for usize {}
impl Label for u8 {}
impl Label for i32 {}
impl Label for i64 {}
impl Label for String {}
impl Label for &str {}

/// Records of `nsamples` rows by `nfeatures` columns with one target per row
///
/// Only the records are constrained by a trait; targets are usually an `Array1` or an
/// `ArrayView1` and gain their methods through [`AsTargets`]. Weights and feature names are
/// owned and cloned into views.
///
/// `weights` is empty when every sample weighs one, otherwise it holds one non-negative finite
/// weight per row. [`validate`](DatasetBase::validate) checks all of this before fitting.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetBase<R, T>
where
    R: Records,
{
    pub records: R,
    pub targets: T,

    pub weights: Array1<f32>,
    feature_names: Vec<String>,
}

/// Owned records and targets
pub type Dataset<D, L> = DatasetBase<Array2<D>, Array1<L>>;

/// Borrowed records and targets
pub type DatasetView<'a, D, L> = DatasetBase<ArrayView2<'a, D>, ArrayView1<'a, L>>;

/// Record trait
pub trait Records: Sized {
    type Elem;

    fn nsamples(&self) -> usize;
    fn nfeatures(&self) -> usize;
}

/// Return a view of the single target variable
pub trait AsTargets {
    type Elem;

    /// Returns a view on the targets as one-dimensional array
    fn as_targets(&self) -> ArrayView1<Self::Elem>;

    /// Distinct labels in ascending order
    fn labels(&self) -> Vec<Self::Elem>
    where
        Self::Elem: Label,
    {
        let mut labels = self.as_targets().to_vec();
        labels.sort();
        labels.dedup();
        labels
    }
}
