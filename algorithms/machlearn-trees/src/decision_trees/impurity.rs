//! Impurity measures on class counts
//!
//! Both measures take the (possibly weighted) number of samples in every class of one
//! population and return zero for a pure or empty population.
use machlearn::Float;

use super::SplitQuality;

/// Entropy of a split population, `-sum(p * log2(p))`
///
/// Classes with zero count contribute nothing, and an empty population has zero entropy.
/// Two evenly populated classes reach the maximum of `1.0`.
pub fn entropy<F: Float>(counts: &[F]) -> F {
    let total = counts.iter().cloned().sum::<F>();
    if total == F::zero() {
        return F::zero();
    }

    counts
        .iter()
        .map(|&count| count / total)
        .filter(|&p| p != F::zero())
        .fold(F::zero(), |sum, p| sum - p * p.log2())
}

/// Gini impurity of a split population, `sum(p * (1 - p))`
///
/// An empty population has zero impurity. Two evenly populated classes reach the
/// maximum of `0.5`.
pub fn gini_impurity<F: Float>(counts: &[F]) -> F {
    let total = counts.iter().cloned().sum::<F>();
    if total == F::zero() {
        return F::zero();
    }

    counts
        .iter()
        .map(|&count| count / total)
        .map(|p| p * (F::one() - p))
        .sum()
}

impl SplitQuality {
    /// Applies the selected measure to the class counts of a population
    pub fn impurity<F: Float>(&self, counts: &[F]) -> F {
        match self {
            SplitQuality::Entropy => entropy(counts),
            SplitQuality::Gini => gini_impurity(counts),
        }
    }
}
