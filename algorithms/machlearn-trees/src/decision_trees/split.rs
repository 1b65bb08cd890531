//! Exhaustive threshold search
//!
//! Every distinct value of a feature proposes one threshold: the midpoint to the next
//! distinct value, or the value itself for the largest one. Samples with `x <= threshold`
//! go left, the others go right. The candidate leaving the lowest size-weighted impurity
//! in both partitions wins, ties are kept by the first candidate in ascending order, and
//! the scan stops at the first perfect split.
use std::cmp::Ordering;

use log::{debug, trace};
use machlearn::{error::Error, Float, Label};
use ndarray::{ArrayView1, ArrayView2, Axis};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use super::domain::{class_weights, sample_weights};
use super::{DecisionTreeError, FeatureSubset, LabelDomain, Result, SplitQuality};

/// The best threshold on a single feature
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct ThresholdSplit<F> {
    /// Samples with a feature value up to and including the threshold go left
    pub threshold: F,
    /// Impurity of both partitions, weighted by their number of samples
    pub impurity: F,
    /// Impurity before the split minus `impurity`
    pub information_gain: F,
    /// Number of `class0` and `class1` samples routed left
    pub left_counts: [usize; 2],
    /// Number of `class0` and `class1` samples routed right
    pub right_counts: [usize; 2],
}

impl<F> ThresholdSplit<F> {
    pub fn left_size(&self) -> usize {
        self.left_counts[0] + self.left_counts[1]
    }

    pub fn right_size(&self) -> usize {
        self.right_counts[0] + self.right_counts[1]
    }

    /// Whether one side of the split receives no sample at all
    pub fn is_degenerate(&self) -> bool {
        self.left_size() == 0 || self.right_size() == 0
    }
}

/// The best threshold over all eligible features
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureSplit<F> {
    pub feature: usize,
    pub split: ThresholdSplit<F>,
}

/// Samples sharing one feature value
struct Run<F> {
    value: F,
    counts: [usize; 2],
    weights: [F; 2],
}

/// Split search over a fixed population, only looking at the rows handed in
pub(crate) struct SplitSearch<'a, F> {
    pub records: ArrayView2<'a, F>,
    pub classes: &'a [usize],
    pub weights: &'a [F],
    pub quality: SplitQuality,
}

impl<'a, F: Float> SplitSearch<'a, F> {
    /// Impurity of the selected rows
    pub fn impurity(&self, rows: &[usize]) -> F {
        self.quality
            .impurity(&class_weights(self.classes, self.weights, rows))
    }

    /// Groups the selected rows by ascending feature value
    fn runs(&self, feature: usize, rows: &[usize]) -> Vec<Run<F>> {
        let column = self.records.column(feature);
        let mut sorted = rows
            .iter()
            .map(|&row| (column[row], row))
            .collect::<Vec<_>>();
        sorted.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

        let mut runs: Vec<Run<F>> = Vec::new();
        for (value, row) in sorted {
            let class = self.classes[row];
            match runs.last_mut() {
                Some(run) if run.value == value => {
                    run.counts[class] += 1;
                    run.weights[class] += self.weights[row];
                }
                _ => {
                    let mut run = Run {
                        value,
                        counts: [0; 2],
                        weights: [F::zero(); 2],
                    };
                    run.counts[class] += 1;
                    run.weights[class] += self.weights[row];
                    runs.push(run);
                }
            }
        }

        runs
    }

    /// Finds the best threshold of `feature` for the selected rows
    ///
    /// Returns `None` if no row is selected.
    pub fn in_feature(
        &self,
        feature: usize,
        rows: &[usize],
        before_split: F,
    ) -> Option<ThresholdSplit<F>> {
        let runs = self.runs(feature, rows);
        let total = F::cast(rows.len());

        // accumulated from both ends, so an absent class keeps a total of exactly zero
        let mut right = vec![([0usize; 2], [F::zero(); 2]); runs.len()];
        for i in (0..runs.len().saturating_sub(1)).rev() {
            let (counts, weights) = right[i + 1];
            let next = &runs[i + 1];
            right[i] = (
                [counts[0] + next.counts[0], counts[1] + next.counts[1]],
                [weights[0] + next.weights[0], weights[1] + next.weights[1]],
            );
        }

        let mut left_counts = [0usize; 2];
        let mut left_weights = [F::zero(); 2];
        let mut best: Option<ThresholdSplit<F>> = None;

        for (i, run) in runs.iter().enumerate() {
            for class in 0..2 {
                left_counts[class] += run.counts[class];
                left_weights[class] += run.weights[class];
            }
            let (right_counts, right_weights) = right[i];

            let threshold = match runs.get(i + 1) {
                Some(next) => midpoint(run.value, next.value),
                None => run.value,
            };

            let left_n = F::cast(left_counts[0] + left_counts[1]);
            let right_n = F::cast(right_counts[0] + right_counts[1]);
            let impurity = self.quality.impurity(&left_weights) * left_n / total
                + self.quality.impurity(&right_weights) * right_n / total;
            let information_gain = before_split - impurity;

            trace!(
                "feature {} candidate #{}: threshold = {:.3}, impurity = {:.3}, information gain = {:.3}, counts = [{:?}, {:?}]",
                feature,
                i,
                threshold,
                impurity,
                information_gain,
                left_counts,
                right_counts
            );

            let improves = best
                .as_ref()
                .map(|best| impurity < best.impurity)
                .unwrap_or(true);
            if improves {
                best = Some(ThresholdSplit {
                    threshold,
                    impurity,
                    information_gain,
                    left_counts,
                    right_counts,
                });

                if impurity == F::zero() {
                    break;
                }
            }
        }

        best
    }

    /// Finds the best feature and threshold for the selected rows
    ///
    /// Features are scanned in the given order, a later feature has to be strictly better
    /// to replace an earlier one, and the scan stops at the first perfect split.
    pub fn across_features(&self, features: &[usize], rows: &[usize]) -> Option<FeatureSplit<F>> {
        let before_split = self.impurity(rows);
        let mut best: Option<FeatureSplit<F>> = None;

        for &feature in features {
            let split = match self.in_feature(feature, rows, before_split) {
                Some(split) => split,
                None => continue,
            };

            debug!(
                "feature {}: best threshold = {:.3}, impurity = {:.3}, information gain = {:.3}",
                feature, split.threshold, split.impurity, split.information_gain
            );

            let improves = best
                .as_ref()
                .map(|best| split.impurity < best.split.impurity)
                .unwrap_or(true);
            if improves {
                let perfect = split.impurity == F::zero();
                best = Some(FeatureSplit { feature, split });

                if perfect {
                    break;
                }
            }
        }

        best
    }
}

/// Threshold between two consecutive distinct values
///
/// Falls back to the lower value when the midpoint cannot be represented between both.
fn midpoint<F: Float>(lower: F, upper: F) -> F {
    let mid = (lower + upper) / F::cast(2.0);
    if mid.is_finite() && mid >= lower && mid < upper {
        mid
    } else {
        lower
    }
}

fn check_records<F: Float>(records: ArrayView2<F>, nsamples: usize) -> Result<()> {
    if records.nrows() != nsamples {
        return Err(Error::MismatchedShapes {
            records: records.nrows(),
            targets: nsamples,
        }
        .into());
    }

    if let Some(((row, col), _)) = records.indexed_iter().find(|(_, x)| !x.is_finite()) {
        return Err(Error::NonFiniteRecord { row, col }.into());
    }

    Ok(())
}

/// Finds the best threshold on a single feature column
///
/// The label domain is derived from `y`, which has to hold exactly two distinct labels.
/// Weights default to one per sample.
///
/// ```rust
/// use machlearn_trees::{find_best_split_in_feature, SplitQuality};
/// use ndarray::array;
///
/// let x = array![1., 2., 3., 4., 5., 6.];
/// let y = array![0, 0, 0, 1, 1, 1];
///
/// let split = find_best_split_in_feature(x.view(), y.view(), None, SplitQuality::Entropy).unwrap();
/// assert_eq!(split.threshold, 3.5);
/// assert_eq!(split.impurity, 0.0);
/// assert_eq!(split.information_gain, 1.0);
/// assert_eq!((split.left_counts, split.right_counts), ([3, 0], [0, 3]));
/// ```
pub fn find_best_split_in_feature<F: Float, L: Label>(
    x: ArrayView1<F>,
    y: ArrayView1<L>,
    weights: Option<ArrayView1<F>>,
    quality: SplitQuality,
) -> Result<ThresholdSplit<F>> {
    let records = x.insert_axis(Axis(1));
    check_records(records, y.len())?;

    let domain = LabelDomain::from_targets(y)?;
    let weights = sample_weights(weights, y.len())?;
    let classes = domain.encode(y)?;

    let search = SplitSearch {
        records: records.view(),
        classes: &classes,
        weights: &weights,
        quality,
    };
    let rows = (0..classes.len()).collect::<Vec<_>>();

    search
        .in_feature(0, &rows, search.impurity(&rows))
        .ok_or(DecisionTreeError::EmptyPopulation)
}

/// Finds the best feature and threshold among the eligible columns of `x`
///
/// Features are evaluated in the order of `features`, which also decides ties.
pub fn find_best_split<F: Float, L: Label>(
    x: ArrayView2<F>,
    y: ArrayView1<L>,
    weights: Option<ArrayView1<F>>,
    features: &FeatureSubset,
    quality: SplitQuality,
) -> Result<FeatureSplit<F>> {
    check_records(x, y.len())?;

    let features = features.resolve(x.ncols())?;
    if features.is_empty() {
        return Err(Error::Parameters("no feature is eligible for splitting".to_string()).into());
    }

    let domain = LabelDomain::from_targets(y)?;
    let weights = sample_weights(weights, y.len())?;
    let classes = domain.encode(y)?;

    let search = SplitSearch {
        records: x.view(),
        classes: &classes,
        weights: &weights,
        quality,
    };
    let rows = (0..classes.len()).collect::<Vec<_>>();

    search
        .across_features(&features, &rows)
        .ok_or(DecisionTreeError::EmptyPopulation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array1};

    /// Impurity of every candidate threshold, computed directly from the partitions
    fn candidate_impurities(
        x: &Array1<f64>,
        y: &Array1<usize>,
        w: &Array1<f64>,
        quality: SplitQuality,
    ) -> Vec<f64> {
        let mut values = x.to_vec();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap());
        values.dedup();

        values
            .iter()
            .map(|&t| {
                let mut left = [0.0; 2];
                let mut right = [0.0; 2];
                let (mut nl, mut nr) = (0.0, 0.0);
                for i in 0..x.len() {
                    if x[i] <= t {
                        left[y[i]] += w[i];
                        nl += 1.0;
                    } else {
                        right[y[i]] += w[i];
                        nr += 1.0;
                    }
                }
                let n = x.len() as f64;
                quality.impurity(&left) * nl / n + quality.impurity(&right) * nr / n
            })
            .collect()
    }

    #[test]
    fn perfect_split_on_sorted_feature() {
        let x = array![1., 2., 3., 4., 5., 6.];
        let y = array![0, 0, 0, 1, 1, 1];

        for quality in &[SplitQuality::Entropy, SplitQuality::Gini] {
            let split = find_best_split_in_feature(x.view(), y.view(), None, *quality).unwrap();
            let before: f64 = quality.impurity(&[3.0, 3.0]);

            assert_abs_diff_eq!(split.threshold, 3.5);
            assert_abs_diff_eq!(split.impurity, 0.0);
            assert_abs_diff_eq!(split.information_gain, before);
            assert_eq!(split.left_counts, [3, 0]);
            assert_eq!(split.right_counts, [0, 3]);
        }
    }

    #[test]
    fn unsorted_values_and_duplicates() {
        let x = array![3., 1., 3., 2., 1., 2.];
        let y = array!["b", "a", "b", "a", "a", "a"];

        let split =
            find_best_split_in_feature(x.view(), y.view(), None, SplitQuality::Gini).unwrap();

        // candidates are 1.5, 2.5 and 3.0, only the second one separates both labels
        assert_abs_diff_eq!(split.threshold, 2.5);
        assert_abs_diff_eq!(split.impurity, 0.0);
        assert_eq!(split.left_counts, [4, 0]);
        assert_eq!(split.right_counts, [0, 2]);
    }

    #[test]
    fn ties_keep_the_lowest_threshold() {
        // both 1.5 and 3.5 isolate one sample of class 1 with the same impurity
        let x = array![1., 2., 3., 4.];
        let y = array![1, 0, 0, 1];

        let split =
            find_best_split_in_feature(x.view(), y.view(), None, SplitQuality::Entropy).unwrap();
        assert_abs_diff_eq!(split.threshold, 1.5);
    }

    #[test]
    fn single_value_uses_the_value_itself() {
        let x = array![2., 2., 2.];
        let y = array![0, 1, 1];

        let split =
            find_best_split_in_feature(x.view(), y.view(), None, SplitQuality::Gini).unwrap();
        assert_abs_diff_eq!(split.threshold, 2.0);
        assert_abs_diff_eq!(split.information_gain, 0.0);
        assert!(split.is_degenerate());
    }

    #[test]
    fn chosen_threshold_is_never_beaten() {
        let x = array![0.3, 1.7, 0.9, 2.2, 1.1, 0.4, 2.9, 1.7, 0.1, 2.5];
        let y = array![0, 1, 0, 1, 1, 0, 0, 1, 1, 0];
        let w = array![1.0, 0.5, 2.0, 1.5, 0.1, 1.0, 0.7, 1.3, 0.2, 0.9];

        for quality in &[SplitQuality::Entropy, SplitQuality::Gini] {
            let split =
                find_best_split_in_feature(x.view(), y.view(), Some(w.view()), *quality).unwrap();

            for impurity in candidate_impurities(&x, &y, &w, *quality) {
                assert!(split.impurity <= impurity + 1e-12);
            }
        }
    }

    #[test]
    fn weights_move_the_threshold() {
        let x = array![1., 2., 3., 4.];
        let y = array![0, 1, 0, 1];

        let light = array![1., 1., 1., 1.];
        let heavy = array![1., 1., 100., 1.];

        let a =
            find_best_split_in_feature(x.view(), y.view(), Some(light.view()), SplitQuality::Gini)
                .unwrap();
        let b =
            find_best_split_in_feature(x.view(), y.view(), Some(heavy.view()), SplitQuality::Gini)
                .unwrap();

        assert_abs_diff_eq!(a.threshold, 1.5);
        assert_abs_diff_eq!(b.threshold, 3.5);
    }

    #[test]
    fn search_across_features_prefers_perfect_split() {
        let x = array![[5., 1.], [3., 2.], [4., 3.], [1., 4.], [2., 5.], [6., 6.]];
        let y = array![0, 0, 0, 1, 1, 1];

        let best =
            find_best_split(x.view(), y.view(), None, &FeatureSubset::All, SplitQuality::Entropy)
                .unwrap();
        assert_eq!(best.feature, 1);
        assert_abs_diff_eq!(best.split.threshold, 3.5);
        assert_abs_diff_eq!(best.split.impurity, 0.0);

        // restricted to the first column only
        let first = find_best_split(
            x.view(),
            y.view(),
            None,
            &FeatureSubset::from(vec![0]),
            SplitQuality::Entropy,
        )
        .unwrap();
        assert_eq!(first.feature, 0);
        assert!(first.split.impurity > 0.0);
    }

    #[test]
    fn ties_across_features_keep_the_first_eligible() {
        // both columns are identical
        let x = array![[1., 1.], [2., 2.], [3., 3.], [4., 4.]];
        let y = array![0, 1, 0, 1];

        let best =
            find_best_split(x.view(), y.view(), None, &FeatureSubset::All, SplitQuality::Gini)
                .unwrap();
        assert_eq!(best.feature, 0);

        let best = find_best_split(
            x.view(),
            y.view(),
            None,
            &FeatureSubset::from(vec![1, 0]),
            SplitQuality::Gini,
        )
        .unwrap();
        assert_eq!(best.feature, 1);
    }

    #[test]
    fn invalid_search_inputs() {
        let x = array![1., 2., 3.];

        assert_eq!(
            find_best_split_in_feature(x.view(), array![0, 1, 2].view(), None, SplitQuality::Gini),
            Err(DecisionTreeError::NotBinary { found: 3 })
        );
        assert_eq!(
            find_best_split_in_feature(x.view(), array![0, 1].view(), None, SplitQuality::Gini),
            Err(DecisionTreeError::BaseCrate(Error::MismatchedShapes {
                records: 3,
                targets: 2
            }))
        );
        assert_eq!(
            find_best_split_in_feature(
                array![1., f64::NAN].view(),
                array![0, 1].view(),
                None,
                SplitQuality::Gini
            ),
            Err(DecisionTreeError::BaseCrate(Error::NonFiniteRecord { row: 1, col: 0 }))
        );

        let x = array![[1., 2.], [3., 4.]];
        assert_eq!(
            find_best_split(
                x.view(),
                array![0, 1].view(),
                None,
                &FeatureSubset::from(vec![2]),
                SplitQuality::Gini
            ),
            Err(DecisionTreeError::FeatureOutOfBounds {
                index: 2,
                nfeatures: 2
            })
        );
    }

    #[test]
    fn midpoint_stays_between_neighbours() {
        assert_eq!(midpoint(1.0f64, 2.0), 1.5);
        assert_eq!(midpoint(-3.0f32, 3.0), 0.0);

        let lower = 1.0f64;
        let upper = f64::from_bits(lower.to_bits() + 1);
        assert!(midpoint(lower, upper) < upper);
        assert_eq!(midpoint(f64::MAX, f64::MAX), f64::MAX);
    }
}
