//! Metrics between two points
//!
//! The classifier ranks training rows with [`Distance::rdistance`] and only reports
//! [`Distance::distance`] for the neighbours it returns, so a metric may provide a cheaper
//! monotone variant (the squared euclidean distance, for instance).
use machlearn::Float;
use ndarray::{ArrayView1, Zip};
use ndarray_stats::DeviationExt;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// A single point, one row of the records
pub type Point<'a, F> = ArrayView1<'a, F>;

/// A metric on points of equal dimension
///
/// Both methods panic on points of different dimension. Callers check dimensions before any
/// lookup.
pub trait Distance<F: Float>: Send + Sync {
    fn distance(&self, a: Point<F>, b: Point<F>) -> F;

    /// Ranks pairs of points like `distance` does
    fn rdistance(&self, a: Point<F>, b: Point<F>) -> F {
        self.distance(a, b)
    }
}

/// Sum of absolute coordinate differences
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct L1Dist;

impl<F: Float> Distance<F> for L1Dist {
    fn distance(&self, a: Point<F>, b: Point<F>) -> F {
        a.l1_dist(&b).unwrap()
    }
}

/// Straight-line distance, ranked by its square
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct L2Dist;

impl<F: Float> Distance<F> for L2Dist {
    fn distance(&self, a: Point<F>, b: Point<F>) -> F {
        self.rdistance(a, b).sqrt()
    }

    fn rdistance(&self, a: Point<F>, b: Point<F>) -> F {
        a.sq_l2_dist(&b).unwrap()
    }
}

/// Largest absolute coordinate difference
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LInfDist;

impl<F: Float> Distance<F> for LInfDist {
    fn distance(&self, a: Point<F>, b: Point<F>) -> F {
        a.linf_dist(&b).unwrap()
    }
}

/// Minkowski distance of order `p`, ranked by its `p`-th power
///
/// `LpDist(1.)` is the Manhattan and `LpDist(2.)` the euclidean distance.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LpDist<F: Float>(pub F);

impl<F: Float> Distance<F> for LpDist<F> {
    fn distance(&self, a: Point<F>, b: Point<F>) -> F {
        self.rdistance(a, b).powf(self.0.recip())
    }

    fn rdistance(&self, a: Point<F>, b: Point<F>) -> F {
        assert_eq!(a.len(), b.len(), "points must have the same dimension");
        let p = self.0;
        Zip::from(&a)
            .and(&b)
            .fold(F::zero(), |sum, &x, &y| sum + (x - y).abs().powf(p))
    }
}

/// Metric picked at runtime
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommonDistance<F> {
    /// See [`L1Dist`]
    L1Dist,
    /// See [`L2Dist`]
    L2Dist,
    /// See [`LInfDist`]
    LInfDist,
    /// See [`LpDist`]
    LpDist(F),
}

impl<F> Default for CommonDistance<F> {
    fn default() -> Self {
        CommonDistance::L2Dist
    }
}

impl<F: Float> CommonDistance<F> {
    fn with_metric<R>(&self, f: impl FnOnce(&dyn Distance<F>) -> R) -> R {
        match *self {
            CommonDistance::L1Dist => f(&L1Dist),
            CommonDistance::L2Dist => f(&L2Dist),
            CommonDistance::LInfDist => f(&LInfDist),
            CommonDistance::LpDist(p) => f(&LpDist(p)),
        }
    }
}

impl<F: Float> Distance<F> for CommonDistance<F> {
    fn distance(&self, a: Point<F>, b: Point<F>) -> F {
        self.with_metric(|metric| metric.distance(a, b))
    }

    fn rdistance(&self, a: Point<F>, b: Point<F>) -> F {
        self.with_metric(|metric| metric.rdistance(a, b))
    }
}
