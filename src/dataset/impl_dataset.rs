use super::{AsTargets, Dataset, DatasetBase, DatasetView, Float, Records};
use crate::error::{Error, Result};
use ndarray::{
    s, Array1, Array2, ArrayBase, ArrayView1, ArrayView2, Axis, Data, ErrorKind, Ix2, ShapeError,
};
use rand::{seq::SliceRandom, Rng};

/// Implementation without constraints on records and targets
///
/// This implementation block provides methods for the creation and mutation of datasets. This
/// includes swapping the targets, return the records etc.
impl<R: Records, T> DatasetBase<R, T> {
    /// Create a new dataset from records and targets
    ///
    /// # Example
    ///
    /// ```ignore
    /// let dataset = Dataset::new(records, targets);
    /// ```
    pub fn new(records: R, targets: T) -> DatasetBase<R, T> {
        DatasetBase {
            records,
            targets,
            weights: Array1::zeros(0),
            feature_names: Vec::new(),
        }
    }

    /// Returns reference to targets
    pub fn targets(&self) -> &T {
        &self.targets
    }

    /// Returns optionally weights
    pub fn weights(&self) -> Option<&[f32]> {
        self.weights.as_slice().filter(|weights| !weights.is_empty())
    }

    /// Return a single weight
    ///
    /// The weight of the `idx`th observation is returned. If no weight is specified, then all
    /// observations are unweighted with default value `1.0`.
    pub fn weight_for(&self, idx: usize) -> f32 {
        self.weights.get(idx).copied().unwrap_or(1.0)
    }

    /// Returns feature names
    ///
    /// A feature name gives a human-readable string describing the purpose of a single feature.
    /// This allows the reader to understand its purpose while analysing results, for example
    /// correlation analysis or feature importance.
    pub fn feature_names(&self) -> Vec<String> {
        if !self.feature_names.is_empty() {
            self.feature_names.clone()
        } else {
            (0..self.records.nfeatures())
                .map(|idx| format!("feature-{}", idx))
                .collect()
        }
    }

    /// Return records of a dataset
    ///
    /// The records are data points from which predictions are made. This functions returns a
    /// reference to the record field.
    pub fn records(&self) -> &R {
        &self.records
    }

    /// Updates the weights of a dataset
    pub fn with_weights(mut self, weights: Array1<f32>) -> DatasetBase<R, T> {
        self.weights = weights;

        self
    }

    /// Updates the feature names of a dataset
    pub fn with_feature_names<I: Into<String>>(mut self, names: Vec<I>) -> DatasetBase<R, T> {
        let feature_names = names.into_iter().map(|x| x.into()).collect();

        self.feature_names = feature_names;

        self
    }

    pub fn nsamples(&self) -> usize {
        self.records.nsamples()
    }

    pub fn nfeatures(&self) -> usize {
        self.records.nfeatures()
    }
}

impl<F, D, T> DatasetBase<ArrayBase<D, Ix2>, T>
where
    F: Float,
    D: Data<Elem = F>,
    T: AsTargets,
{
    /// Checks that records, targets and weights describe the same samples
    ///
    /// Fails if the number of targets or weights differs from the number of records, if a weight
    /// is negative or not finite, or if a record is not finite.
    pub fn validate(&self) -> Result<()> {
        let nsamples = self.records.nrows();
        let ntargets = self.targets.as_targets().len();
        if nsamples != ntargets {
            return Err(Error::MismatchedShapes {
                records: nsamples,
                targets: ntargets,
            });
        }

        if let Some(weights) = self.weights() {
            if weights.len() != nsamples {
                return Err(Error::MismatchedWeights {
                    weights: weights.len(),
                    samples: nsamples,
                });
            }

            if let Some((index, weight)) = weights
                .iter()
                .enumerate()
                .find(|(_, w)| !w.is_finite() || **w < 0.0)
            {
                return Err(Error::InvalidWeight {
                    index,
                    weight: *weight,
                });
            }
        }

        if let Some(((row, col), _)) = self.records.indexed_iter().find(|(_, x)| !x.is_finite()) {
            return Err(Error::NonFiniteRecord { row, col });
        }

        Ok(())
    }

    /// Creates a view of the dataset
    pub fn view(&self) -> DatasetView<'_, F, T::Elem> {
        DatasetBase {
            records: self.records.view(),
            targets: self.targets.as_targets(),
            weights: self.weights.clone(),
            feature_names: self.feature_names.clone(),
        }
    }
}

impl<F: Float, L: Clone> Dataset<F, L> {
    /// Converts row-major tabular input into a dataset
    ///
    /// Every row must have the same number of columns, and there must be one target per row.
    pub fn from_rows(rows: Vec<Vec<F>>, targets: Vec<L>) -> Result<Self> {
        if rows.len() != targets.len() {
            return Err(Error::MismatchedShapes {
                records: rows.len(),
                targets: targets.len(),
            });
        }

        let ncols = rows.first().map(|row| row.len()).unwrap_or(0);
        if rows.iter().any(|row| row.len() != ncols) {
            return Err(ShapeError::from_kind(ErrorKind::IncompatibleShape).into());
        }

        let nrows = rows.len();
        let records = Array2::from_shape_vec((nrows, ncols), rows.into_iter().flatten().collect())?;

        Ok(DatasetBase::new(records, Array1::from(targets)))
    }

    /// Split dataset into two disjoint chunks
    ///
    /// This function splits the observations in a dataset into two disjoint chunks. The splitting
    /// threshold is calculated with the `ratio`. For example a ratio of `0.9` allocates 90% to the
    /// first chunks and 10% to the second. This is often used in training, validation splitting
    /// procedures.
    pub fn split_with_ratio(self, ratio: f32) -> (Self, Self) {
        let n = (self.nsamples() as f32 * ratio).ceil() as usize;
        let n = n.min(self.nsamples());

        let (first_weights, second_weights) = if self.weights.len() == self.nsamples() {
            (
                self.weights.slice(s![..n]).to_owned(),
                self.weights.slice(s![n..]).to_owned(),
            )
        } else {
            (Array1::zeros(0), Array1::zeros(0))
        };

        let first = DatasetBase {
            records: self.records.slice(s![..n, ..]).to_owned(),
            targets: self.targets.slice(s![..n]).to_owned(),
            weights: first_weights,
            feature_names: self.feature_names.clone(),
        };
        let second = DatasetBase {
            records: self.records.slice(s![n.., ..]).to_owned(),
            targets: self.targets.slice(s![n..]).to_owned(),
            weights: second_weights,
            feature_names: self.feature_names,
        };

        (first, second)
    }

    /// Apply a random permutation to the observations
    ///
    /// Records, targets and (when present) weights are permuted together.
    pub fn shuffle<Rg: Rng>(&self, rng: &mut Rg) -> Self {
        let mut indices = (0..self.nsamples()).collect::<Vec<_>>();
        indices.shuffle(rng);

        let weights = if self.weights.len() == self.nsamples() {
            self.weights.select(Axis(0), &indices)
        } else {
            Array1::zeros(0)
        };

        DatasetBase {
            records: self.records.select(Axis(0), &indices),
            targets: self.targets.select(Axis(0), &indices),
            weights,
            feature_names: self.feature_names.clone(),
        }
    }
}

impl<F: Float, L> From<(Array2<F>, Array1<L>)> for Dataset<F, L> {
    fn from(rec_tar: (Array2<F>, Array1<L>)) -> Self {
        DatasetBase::new(rec_tar.0, rec_tar.1)
    }
}

impl<'a, F: Float, L> From<(ArrayView2<'a, F>, ArrayView1<'a, L>)> for DatasetView<'a, F, L> {
    fn from(rec_tar: (ArrayView2<'a, F>, ArrayView1<'a, L>)) -> Self {
        DatasetBase::new(rec_tar.0, rec_tar.1)
    }
}
