//! Provide traits for different classes of algorithms
//!

use crate::dataset::{DatasetBase, Float, Records};
use ndarray::{ArrayBase, Data, Ix2};
use std::convert::From;

/// Fittable algorithms
///
/// A fittable algorithm takes a dataset and creates a concept of some kind about it. For example
/// a decision tree learns split rules from labelled records and a nearest-neighbour classifier
/// memorises its training set.
pub trait Fit<R: Records, T, E: std::error::Error + From<crate::error::Error>> {
    type Object;

    fn fit(&self, dataset: &DatasetBase<R, T>) -> Result<Self::Object, E>;
}

/// Predict with model into a mutable reference of targets.
pub trait PredictInplace<R: Records, T> {
    /// Predict something in place
    fn predict_inplace<'a>(&'a self, x: &'a R, y: &mut T);

    /// Create targets that `predict_inplace` works with.
    fn default_target(&self, x: &R) -> T;
}

/// Predict with model
///
/// This trait assumes the `PredictInplace` implementation and provides additional input/output
/// combinations.
///
/// # Provided implementation
///
/// * Array2 -> targets
/// * &Array2 -> targets
/// * &Dataset -> targets
pub trait Predict<R, T> {
    fn predict(&self, x: R) -> T;
}

impl<F, D, T, O> Predict<ArrayBase<D, Ix2>, T> for O
where
    F: Float,
    D: Data<Elem = F>,
    O: PredictInplace<ArrayBase<D, Ix2>, T>,
{
    fn predict(&self, records: ArrayBase<D, Ix2>) -> T {
        let mut targets = self.default_target(&records);
        self.predict_inplace(&records, &mut targets);
        targets
    }
}

impl<'a, F, D, T, O> Predict<&'a ArrayBase<D, Ix2>, T> for O
where
    F: Float,
    D: Data<Elem = F>,
    O: PredictInplace<ArrayBase<D, Ix2>, T>,
{
    fn predict(&self, records: &'a ArrayBase<D, Ix2>) -> T {
        let mut targets = self.default_target(records);
        self.predict_inplace(records, &mut targets);
        targets
    }
}

impl<'a, F, D, T, S, O> Predict<&'a DatasetBase<ArrayBase<D, Ix2>, T>, S> for O
where
    F: Float,
    D: Data<Elem = F>,
    O: PredictInplace<ArrayBase<D, Ix2>, S>,
{
    fn predict(&self, ds: &'a DatasetBase<ArrayBase<D, Ix2>, T>) -> S {
        let mut targets = self.default_target(&ds.records);
        self.predict_inplace(&ds.records, &mut targets);
        targets
    }
}
