use std::cmp::Ordering;

use log::info;
use ndarray::{Array1, Array2, ArrayBase, ArrayView1, Axis, Data, Ix2, Zip};

use crate::distance::Distance;
use crate::{KNearestNeighborsValidParams, NnError, Result};
use machlearn::{dataset::AsTargets, traits::*, DatasetBase, Float, Label};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// Brute-force k-nearest-neighbour classifier
///
/// Fitting memorises the training records and labels. A prediction measures the distance from
/// the query to every training row, keeps the `n_neighbors` closest ones and returns their most
/// common label. Rows at equal distance keep their training order, and a tied vote goes to the
/// label of the closest neighbour among the tied labels.
///
/// ### Example
///
/// ```rust
/// use machlearn_nn::KNearestNeighbors;
/// use machlearn::prelude::*;
/// use ndarray::array;
///
/// let dataset = Dataset::new(
///     array![[1., 1.], [1., 2.], [2., 1.], [8., 8.], [8., 9.], [9., 8.]],
///     array!["low", "low", "low", "high", "high", "high"],
/// );
/// let model = KNearestNeighbors::params().n_neighbors(3).fit(&dataset).unwrap();
///
/// assert_eq!(model.predict(&array![[0., 0.], [10., 10.]]), array!["low", "high"]);
/// ```
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct KNearestNeighbors<F, L, D> {
    records: Array2<F>,
    targets: Array1<L>,
    dist_fn: D,
    n_neighbors: usize,
}

impl<F: Float, L: Label, D: Distance<F>> KNearestNeighbors<F, L, D> {
    pub fn n_neighbors(&self) -> usize {
        self.n_neighbors
    }

    pub fn dist_fn(&self) -> &D {
        &self.dist_fn
    }

    /// Number of feature columns seen during fitting
    pub fn num_features(&self) -> usize {
        self.records.ncols()
    }

    /// Indices of the `n_neighbors` training rows closest to `point` with their distance, closest
    /// first
    pub fn kneighbors(&self, point: ArrayView1<F>) -> Result<Vec<(usize, F)>> {
        if point.len() != self.num_features() {
            return Err(NnError::DimensionMismatch {
                expected: self.num_features(),
                found: point.len(),
            });
        }

        Ok(self
            .nearest(&point)
            .into_iter()
            .map(|(idx, _)| (idx, self.dist_fn.distance(point.view(), self.records.row(idx))))
            .collect())
    }

    /// Closest training rows by reduced distance
    fn nearest(&self, point: &ArrayView1<F>) -> Vec<(usize, F)> {
        let mut candidates = self
            .records
            .axis_iter(Axis(0))
            .map(|row| self.dist_fn.rdistance(point.view(), row))
            .enumerate()
            .collect::<Vec<_>>();

        // `sort_by` is stable, equidistant rows keep their training order
        candidates.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
        candidates.truncate(self.n_neighbors);
        candidates
    }

    fn vote(&self, point: &ArrayView1<F>) -> &L {
        // labels in order of their closest neighbour
        let mut votes: Vec<(&L, usize)> = Vec::with_capacity(self.n_neighbors);
        for (idx, _) in self.nearest(point) {
            let label = &self.targets[idx];
            match votes.iter_mut().find(|(l, _)| *l == label) {
                Some((_, count)) => *count += 1,
                None => votes.push((label, 1)),
            }
        }

        let mut winner = votes[0];
        for &(label, count) in votes.iter().skip(1) {
            if count > winner.1 {
                winner = (label, count);
            }
        }
        winner.0
    }
}

impl<F: Float, L: Label, D: Distance<F>, S: Data<Elem = F>>
    PredictInplace<ArrayBase<S, Ix2>, Array1<L>> for KNearestNeighbors<F, L, D>
{
    /// Predicts the majority label of the nearest training rows for each row of `x`
    fn predict_inplace(&self, x: &ArrayBase<S, Ix2>, y: &mut Array1<L>) {
        assert_eq!(
            x.nrows(),
            y.len(),
            "The number of data points must match the number of output targets."
        );
        assert_eq!(
            x.ncols(),
            self.num_features(),
            "The number of features must match the number of features seen during fitting."
        );

        Zip::from(x.view().axis_iter(Axis(0)))
            .and(y)
            .par_for_each(|row, target| *target = self.vote(&row).clone());
    }

    fn default_target(&self, x: &ArrayBase<S, Ix2>) -> Array1<L> {
        Array1::from_elem(x.nrows(), self.targets[0].clone())
    }
}

impl<F: Float, L: Label, D, S, T> Fit<ArrayBase<S, Ix2>, T, NnError>
    for KNearestNeighborsValidParams<F, L, D>
where
    D: Distance<F> + Clone,
    S: Data<Elem = F>,
    T: AsTargets<Elem = L>,
{
    type Object = KNearestNeighbors<F, L, D>;

    fn fit(&self, dataset: &DatasetBase<ArrayBase<S, Ix2>, T>) -> Result<Self::Object> {
        dataset.validate()?;

        if dataset.nsamples() < self.n_neighbors() {
            return Err(NnError::NotEnoughSamples {
                found: dataset.nsamples(),
                n_neighbors: self.n_neighbors(),
            });
        }

        info!(
            "storing {} samples with {} features for {}-nearest-neighbour lookups",
            dataset.nsamples(),
            dataset.nfeatures(),
            self.n_neighbors()
        );

        Ok(KNearestNeighbors {
            records: dataset.records().to_owned(),
            targets: dataset.as_targets().to_owned(),
            dist_fn: self.dist_fn().clone(),
            n_neighbors: self.n_neighbors(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::{CommonDistance, L1Dist, LInfDist};
    use approx::assert_abs_diff_eq;
    use machlearn::{error::Error, Dataset};
    use ndarray::array;

    #[test]
    fn neighbours_are_sorted_by_distance() -> Result<()> {
        let dataset = Dataset::new(
            array![[0., 0.], [3., 4.], [1., 0.], [0., 2.]],
            array![0, 1, 0, 1],
        );
        let model = KNearestNeighbors::params().n_neighbors(3).fit(&dataset)?;

        let neighbours = model.kneighbors(array![0., 0.].view())?;
        let indices = neighbours.iter().map(|(idx, _)| *idx).collect::<Vec<_>>();
        assert_eq!(indices, vec![0, 2, 3]);
        assert_abs_diff_eq!(neighbours[2].1, 2.0);

        // the reduced euclidean distance is only used for ordering
        let neighbours = model.kneighbors(array![3., 0.].view())?;
        assert_eq!(neighbours[0].0, 2);
        assert_abs_diff_eq!(neighbours[0].1, 2.0);
        assert_abs_diff_eq!(neighbours[1].1, 3.0);

        Ok(())
    }

    #[test]
    fn equidistant_rows_keep_training_order() -> Result<()> {
        let dataset = Dataset::new(array![[1.], [-1.], [2.]], array![true, false, false]);
        let model = KNearestNeighbors::params().n_neighbors(1).fit(&dataset)?;

        assert_eq!(model.kneighbors(array![0.].view())?, vec![(0, 1.0)]);
        assert_eq!(model.predict(&array![[0.]]), array![true]);

        Ok(())
    }

    #[test]
    fn tied_votes_go_to_the_closest_label() -> Result<()> {
        let dataset = Dataset::new(array![[0.], [1.], [3.]], array!["a", "b", "c"]);
        let model = KNearestNeighbors::params_with_distance(L1Dist)
            .n_neighbors(2)
            .fit(&dataset)?;

        assert_eq!(model.predict(&array![[0.4], [0.6]]), array!["a", "b"]);

        Ok(())
    }

    #[test]
    fn majority_outvotes_the_closest_neighbour() -> Result<()> {
        let dataset = Dataset::new(array![[0.], [1.], [1.2], [5.]], array![0, 1, 1, 0]);
        let model = KNearestNeighbors::params().n_neighbors(3).fit(&dataset)?;

        assert_eq!(model.predict(&array![[0.1]]), array![1]);
        assert_eq!(
            KNearestNeighbors::params()
                .n_neighbors(1)
                .fit(&dataset)?
                .predict(&array![[0.1]]),
            array![0]
        );

        Ok(())
    }

    #[test]
    fn distance_changes_the_neighbourhood() -> Result<()> {
        // the second row is closer in the L1 sense, the first in the Chebyshev sense
        let dataset = Dataset::new(array![[3., 3.], [0., 4.]], array![0, 1]);
        let query = array![[0., 0.]];

        let l1 = KNearestNeighbors::params_with_distance(CommonDistance::L1Dist)
            .n_neighbors(1)
            .fit(&dataset)?;
        let linf = KNearestNeighbors::params_with_distance(LInfDist)
            .n_neighbors(1)
            .fit(&dataset)?;

        assert_eq!(l1.predict(&query), array![1]);
        assert_eq!(linf.predict(&query), array![0]);

        Ok(())
    }

    #[test]
    fn invalid_inputs_are_reported() {
        let dataset = Dataset::new(array![[0.], [1.]], array![0, 1]);
        assert_eq!(
            KNearestNeighbors::params().fit(&dataset),
            Err(NnError::NotEnoughSamples {
                found: 2,
                n_neighbors: 5
            })
        );
        assert!(matches!(
            KNearestNeighbors::params().n_neighbors(0).fit(&dataset),
            Err(NnError::Parameters(_))
        ));

        let dataset = Dataset::new(array![[0.], [f64::INFINITY]], array![0, 1]);
        assert_eq!(
            KNearestNeighbors::params().n_neighbors(1).fit(&dataset),
            Err(NnError::BaseCrate(Error::NonFiniteRecord { row: 1, col: 0 }))
        );

        let model = KNearestNeighbors::params()
            .n_neighbors(1)
            .fit(&Dataset::new(array![[0.], [1.]], array![0, 1]))
            .unwrap();
        assert_eq!(
            model.kneighbors(array![0., 1.].view()),
            Err(NnError::DimensionMismatch {
                expected: 1,
                found: 2
            })
        );
    }
}
