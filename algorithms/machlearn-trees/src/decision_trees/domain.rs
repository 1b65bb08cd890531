//! Binary label domain and weighted class statistics
use std::collections::BTreeMap;

use machlearn::{error::Error, Float, Label};
use ndarray::ArrayView1;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use super::{DecisionTreeError, Result, SplitQuality};

/// The two labels of a binary classification task
///
/// The domain is fixed once, from the sorted distinct targets at the root of a tree, and
/// every node below is interpreted against it. `class1` is the label whose probability is
/// reported by the tree.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelDomain<L> {
    class0: L,
    class1: L,
}

impl<L: Label> LabelDomain<L> {
    /// Creates a domain from two labels, the smaller one becomes `class0`
    pub fn new(a: L, b: L) -> Result<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Ok(LabelDomain { class0: a, class1: b }),
            std::cmp::Ordering::Greater => Ok(LabelDomain { class0: b, class1: a }),
            std::cmp::Ordering::Equal => Err(DecisionTreeError::NotBinary { found: 1 }),
        }
    }

    /// Derives the domain from the distinct values of `targets`
    ///
    /// Fails unless exactly two distinct labels occur.
    pub fn from_targets(targets: ArrayView1<L>) -> Result<Self> {
        let mut labels = targets.iter().collect::<Vec<_>>();
        labels.sort();
        labels.dedup();

        match labels.as_slice() {
            [class0, class1] => Ok(LabelDomain {
                class0: (*class0).clone(),
                class1: (*class1).clone(),
            }),
            other => Err(DecisionTreeError::NotBinary { found: other.len() }),
        }
    }

    pub fn class0(&self) -> &L {
        &self.class0
    }

    pub fn class1(&self) -> &L {
        &self.class1
    }

    /// Returns `0` for `class0`, `1` for `class1` and `None` for any other label
    pub fn class_index(&self, label: &L) -> Option<usize> {
        if label == &self.class0 {
            Some(0)
        } else if label == &self.class1 {
            Some(1)
        } else {
            None
        }
    }

    /// Returns the label behind a class index
    pub fn label(&self, class: usize) -> &L {
        if class == 0 {
            &self.class0
        } else {
            &self.class1
        }
    }

    /// Maps every target to its class index
    pub(crate) fn encode(&self, targets: ArrayView1<L>) -> Result<Vec<usize>> {
        targets
            .iter()
            .enumerate()
            .map(|(index, label)| {
                self.class_index(label)
                    .ok_or_else(|| DecisionTreeError::UnknownLabel {
                        index,
                        label: format!("{:?}", label),
                        class0: format!("{:?}", self.class0),
                        class1: format!("{:?}", self.class1),
                    })
            })
            .collect()
    }
}

/// Checks optional per-sample weights against the number of samples
///
/// Missing weights count every sample once.
pub(crate) fn sample_weights<F: Float>(
    weights: Option<ArrayView1<F>>,
    nsamples: usize,
) -> Result<Vec<F>> {
    let weights = match weights {
        None => return Ok(vec![F::one(); nsamples]),
        Some(weights) => weights,
    };

    if weights.len() != nsamples {
        return Err(Error::MismatchedWeights {
            weights: weights.len(),
            samples: nsamples,
        }
        .into());
    }

    if let Some((index, weight)) = weights
        .iter()
        .enumerate()
        .find(|(_, w)| !w.is_finite() || **w < F::zero())
    {
        return Err(Error::InvalidWeight {
            index,
            weight: weight.to_f32().unwrap_or(f32::NAN),
        }
        .into());
    }

    Ok(weights.to_vec())
}

/// Sums the weights of the selected rows per class
pub(crate) fn class_weights<F: Float>(classes: &[usize], weights: &[F], rows: &[usize]) -> [F; 2] {
    let mut totals = [F::zero(); 2];
    for &row in rows {
        totals[classes[row]] += weights[row];
    }
    totals
}

/// Impurity of a set of labels, each counted with its sample weight
///
/// An empty set has zero impurity. Weights default to one per sample when omitted and must
/// otherwise match the number of labels. Every label has to belong to `domain`.
///
/// ```rust
/// use machlearn_trees::{weighted_impurity, LabelDomain, SplitQuality};
/// use ndarray::array;
///
/// let y = array![0, 1, 1, 0, 0, 1];
/// let domain = LabelDomain::from_targets(y.view()).unwrap();
///
/// let entropy = weighted_impurity::<f64, _>(y.view(), &domain, None, SplitQuality::Entropy);
/// assert_eq!(entropy, Ok(1.0));
/// ```
pub fn weighted_impurity<F: Float, L: Label>(
    targets: ArrayView1<L>,
    domain: &LabelDomain<L>,
    weights: Option<ArrayView1<F>>,
    quality: SplitQuality,
) -> Result<F> {
    if targets.is_empty() {
        return Ok(F::zero());
    }

    let weights = sample_weights(weights, targets.len())?;
    let classes = domain.encode(targets)?;
    let rows = (0..classes.len()).collect::<Vec<_>>();

    Ok(quality.impurity(&class_weights(&classes, &weights, &rows)))
}

/// Observed labels of a population, with their sample count and summed weight
///
/// Only labels carried by at least one sample appear, in ascending order.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct ClassDistribution<L: Ord, F> {
    classes: BTreeMap<L, (usize, F)>,
}

impl<L: Label, F: Float> ClassDistribution<L, F> {
    /// Counts the labels of `targets`, each weighted by the matching entry of `weights`
    pub fn from_targets(targets: ArrayView1<L>, weights: Option<ArrayView1<F>>) -> Result<Self> {
        let weights = sample_weights(weights, targets.len())?;
        let mut classes = BTreeMap::new();
        for (label, weight) in targets.iter().zip(weights) {
            let entry = classes.entry(label.clone()).or_insert((0, F::zero()));
            entry.0 += 1;
            entry.1 += weight;
        }

        Ok(ClassDistribution { classes })
    }

    pub(crate) fn from_classes(
        domain: &LabelDomain<L>,
        classes: &[usize],
        weights: &[F],
        rows: &[usize],
    ) -> Self {
        let mut counts = [(0, F::zero()); 2];
        for &row in rows {
            counts[classes[row]].0 += 1;
            counts[classes[row]].1 += weights[row];
        }

        let classes = counts
            .iter()
            .enumerate()
            .filter(|(_, (n, _))| *n > 0)
            .map(|(class, &entry)| (domain.label(class).clone(), entry))
            .collect();

        ClassDistribution { classes }
    }

    /// Number of distinct observed labels
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Number of samples carrying `label`
    pub fn count(&self, label: &L) -> usize {
        self.classes.get(label).map(|(n, _)| *n).unwrap_or(0)
    }

    /// Summed weight of the samples carrying `label`
    pub fn weight(&self, label: &L) -> F {
        self.classes
            .get(label)
            .map(|(_, w)| *w)
            .unwrap_or_else(F::zero)
    }

    /// Iterates over `(label, sample count, summed weight)` in ascending label order
    pub fn iter(&self) -> impl Iterator<Item = (&L, usize, F)> {
        self.classes.iter().map(|(label, (n, w))| (label, *n, *w))
    }

    /// Returns the dominant label and the probability of `class1`
    ///
    /// A population holding a single label is dominated by it, with a probability of one if
    /// that label is `class1` and zero otherwise. With both labels present the probability is
    /// the weight share of `class1`, falling back to the sample share when every weight is zero,
    /// and `class1` dominates from a share of one half on. An empty population has no
    /// dominant label.
    pub fn dominant_class(&self, domain: &LabelDomain<L>) -> Result<Option<(L, F)>> {
        let mut observed = self.classes.iter();
        match (observed.next(), observed.next(), self.classes.len()) {
            (None, _, _) => Ok(None),
            (Some((label, _)), None, _) => {
                let probability = match domain.class_index(label) {
                    Some(1) => F::one(),
                    Some(_) => F::zero(),
                    None => {
                        return Err(DecisionTreeError::UnexpectedDominantClass {
                            label: format!("{:?}", label),
                            class0: format!("{:?}", domain.class0()),
                            class1: format!("{:?}", domain.class1()),
                        })
                    }
                };
                Ok(Some((label.clone(), probability)))
            }
            (Some(_), Some(_), 2) => {
                let (n0, w0) = self.known(domain, domain.class0())?;
                let (n1, w1) = self.known(domain, domain.class1())?;

                let probability = if w0 + w1 > F::zero() {
                    w1 / (w0 + w1)
                } else {
                    F::cast(n1) / F::cast(n0 + n1)
                };

                let dominant = if probability >= F::cast(0.5) {
                    domain.class1().clone()
                } else {
                    domain.class0().clone()
                };
                Ok(Some((dominant, probability)))
            }
            (_, _, n) => Err(DecisionTreeError::TooManyClasses(n)),
        }
    }

    fn known(&self, domain: &LabelDomain<L>, label: &L) -> Result<(usize, F)> {
        match self.classes.get(label) {
            Some(&entry) => Ok(entry),
            None => {
                let unexpected = self
                    .classes
                    .keys()
                    .find(|l| domain.class_index(l).is_none())
                    .unwrap_or(label);
                Err(DecisionTreeError::UnexpectedDominantClass {
                    label: format!("{:?}", unexpected),
                    class0: format!("{:?}", domain.class0()),
                    class1: format!("{:?}", domain.class1()),
                })
            }
        }
    }
}
