use std::marker::PhantomData;

use machlearn::{Float, ParamGuard};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::distance::{CommonDistance, Distance};
use crate::{KNearestNeighbors, NnError, Result};

/// Checked hyperparameters of a [k-nearest-neighbour classifier](struct.KNearestNeighbors.html)
///
/// ### Example
///
/// ```rust
/// use machlearn_nn::{distance::L1Dist, KNearestNeighbors};
/// use machlearn::prelude::*;
/// use ndarray::array;
///
/// let dataset = Dataset::new(array![[0.], [1.], [5.], [6.]], array![0, 0, 1, 1]);
/// let model = KNearestNeighbors::params_with_distance(L1Dist)
///     .n_neighbors(3)
///     .fit(&dataset)
///     .unwrap();
///
/// assert_eq!(model.predict(&array![[0.5], [5.5]]), array![0, 1]);
/// ```
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct KNearestNeighborsValidParams<F, L, D> {
    n_neighbors: usize,
    dist_fn: D,

    marker: PhantomData<(F, L)>,
}

impl<F: Float, L, D: Distance<F>> KNearestNeighborsValidParams<F, L, D> {
    pub fn n_neighbors(&self) -> usize {
        self.n_neighbors
    }

    pub fn dist_fn(&self) -> &D {
        &self.dist_fn
    }
}

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct KNearestNeighborsParams<F, L, D>(KNearestNeighborsValidParams<F, L, D>);

impl<F: Float, L, D: Distance<F>> KNearestNeighborsParams<F, L, D> {
    pub fn new(dist_fn: D) -> Self {
        Self(KNearestNeighborsValidParams {
            n_neighbors: 5,
            dist_fn,
            marker: PhantomData,
        })
    }

    /// Sets the number of neighbours that vote on a prediction
    pub fn n_neighbors(mut self, n_neighbors: usize) -> Self {
        self.0.n_neighbors = n_neighbors;
        self
    }
}

impl<F: Float, L> KNearestNeighbors<F, L, CommonDistance<F>> {
    /// Euclidean distance with `n_neighbors = 5`
    // Violates the convention that new should return a value of type `Self`
    #[allow(clippy::new_ret_no_self)]
    pub fn params() -> KNearestNeighborsParams<F, L, CommonDistance<F>> {
        KNearestNeighborsParams::new(CommonDistance::L2Dist)
    }
}

impl<F: Float, L, D: Distance<F>> KNearestNeighbors<F, L, D> {
    /// Uses `dist_fn` for every lookup of the fitted model
    pub fn params_with_distance(dist_fn: D) -> KNearestNeighborsParams<F, L, D> {
        KNearestNeighborsParams::new(dist_fn)
    }
}

impl<F, L, D> ParamGuard for KNearestNeighborsParams<F, L, D> {
    type Checked = KNearestNeighborsValidParams<F, L, D>;
    type Error = NnError;

    fn check_ref(&self) -> Result<&Self::Checked> {
        if self.0.n_neighbors == 0 {
            Err(NnError::Parameters(
                "n_neighbors should be at least one".to_string(),
            ))
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}
