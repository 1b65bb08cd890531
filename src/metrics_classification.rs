//! Common metrics for performance evaluation of classifier
//!
//! Scoring is essential for classification tasks. This module implements
//! common scoring functions like precision, accuracy, recall, f1-score, ROC and ROC
//! Area-Under-Curve.
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use ndarray::prelude::*;
use ndarray::Data;

use crate::dataset::{AsTargets, Float, Label};
use crate::error::{Error, Result};

/// Confusion matrix for multi-label evaluation
///
/// A confusion matrix shows predictions in a matrix, where rows correspond to target and columns
/// to predicted. The diagonal entries are correct predictions.
#[derive(Clone, PartialEq)]
pub struct ConfusionMatrix<A> {
    matrix: Array2<f32>,
    members: Array1<A>,
}

impl<A> ConfusionMatrix<A> {
    /// Calculate precision for every class
    pub fn precision(&self) -> Array1<f32> {
        let sum = self.matrix.sum_axis(Axis(0));

        self.matrix
            .diag()
            .iter()
            .zip(sum.iter())
            .map(|(a, b)| a / b)
            .collect()
    }

    /// Calculate recall for every class
    pub fn recall(&self) -> Array1<f32> {
        let sum = self.matrix.sum_axis(Axis(1));

        self.matrix
            .diag()
            .iter()
            .zip(sum.iter())
            .map(|(a, b)| a / b)
            .collect()
    }

    /// Return mean accuracy
    pub fn accuracy(&self) -> f32 {
        self.matrix.diag().sum() / self.matrix.sum()
    }

    /// Return the beta score for every class
    pub fn f_score(&self, beta: f32) -> Array1<f32> {
        let sb = beta * beta;
        let precision = self.precision();
        let recall = self.recall();

        precision
            .iter()
            .zip(recall.iter())
            .map(|(p, r)| (1.0 + sb) * (p * r) / (sb * p + r))
            .collect()
    }

    /// Return the beta=1 score for every class
    pub fn f1_score(&self) -> Array1<f32> {
        self.f_score(1.0)
    }

    /// Class labels in the order of the rows and columns
    pub fn members(&self) -> ArrayView1<A> {
        self.members.view()
    }
}

impl<A: fmt::Debug> fmt::Debug for ConfusionMatrix<A> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let len = self.matrix.len_of(Axis(0));
        writeln!(f)?;
        write!(f, "{: <10}", "classes")?;
        for i in 0..len {
            write!(f, " | {: <10}", format!("{:?}", self.members[i]))?;
        }
        writeln!(f)?;

        for i in 0..len {
            write!(f, "{: <10}", format!("{:?}", self.members[i]))?;

            for j in 0..len {
                write!(f, " | {: <10}", self.matrix[(i, j)])?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// Classification for multi-label evaluation
///
/// Contains a routine to calculate the confusion matrix, all other scores are derived form it.
pub trait ToConfusionMatrix<A, T> {
    fn confusion_matrix(&self, ground_truth: T) -> Result<ConfusionMatrix<A>>;
}

impl<L, S, T> ToConfusionMatrix<L, T> for ArrayBase<S, Ix1>
where
    L: Label,
    S: Data<Elem = L>,
    T: AsTargets<Elem = L>,
{
    fn confusion_matrix(&self, ground_truth: T) -> Result<ConfusionMatrix<L>> {
        let ground_truth = ground_truth.as_targets();
        if ground_truth.len() != self.len() {
            return Err(Error::MismatchedShapes {
                records: self.len(),
                targets: ground_truth.len(),
            });
        }

        let mut classes = ground_truth
            .iter()
            .chain(self.iter())
            .cloned()
            .collect::<Vec<_>>();
        classes.sort();
        classes.dedup();

        let indices = classes
            .iter()
            .enumerate()
            .map(|(idx, class)| (class, idx))
            .collect::<HashMap<_, _>>();

        let mut matrix = Array2::zeros((classes.len(), classes.len()));
        for (truth, predicted) in ground_truth.iter().zip(self.iter()) {
            matrix[(indices[truth], indices[predicted])] += 1.0;
        }

        Ok(ConfusionMatrix {
            matrix,
            members: Array1::from(classes),
        })
    }
}

/// Receiver operating characteristic of a binary scoring
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiverOperatingCharacteristic<A> {
    curve: Vec<(A, A)>,
    thresholds: Vec<A>,
}

impl<A: Float> ReceiverOperatingCharacteristic<A> {
    /// Points of the curve as (false positive rate, true positive rate)
    pub fn get_curve(&self) -> Vec<(A, A)> {
        self.curve.clone()
    }

    pub fn get_thresholds(&self) -> Vec<A> {
        self.thresholds.clone()
    }

    /// Area under the curve, integrated with the trapezoidal rule
    pub fn area_under_curve(&self) -> A {
        self.curve
            .windows(2)
            .map(|w| (w[1].0 - w[0].0) * (w[0].1 + w[1].1) / A::cast(2.0))
            .sum()
    }
}

/// Binary classification evaluated on class-1 scores
pub trait BinaryClassification<A> {
    fn roc(&self, ground_truth: &[bool]) -> Result<ReceiverOperatingCharacteristic<A>>;
}

impl<A: Float, D: Data<Elem = A>> BinaryClassification<A> for ArrayBase<D, Ix1> {
    fn roc(&self, ground_truth: &[bool]) -> Result<ReceiverOperatingCharacteristic<A>> {
        if ground_truth.len() != self.len() {
            return Err(Error::MismatchedShapes {
                records: self.len(),
                targets: ground_truth.len(),
            });
        }

        let positives = ground_truth.iter().filter(|x| **x).count();
        let negatives = ground_truth.len() - positives;
        if positives == 0 || negatives == 0 {
            return Err(Error::NotEnoughSamples);
        }

        let mut pairs = self
            .iter()
            .cloned()
            .zip(ground_truth.iter().cloned())
            .collect::<Vec<_>>();
        pairs.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

        let (max_tp, max_fp) = (A::cast(positives), A::cast(negatives));
        let (mut tp, mut fp) = (A::zero(), A::zero());
        let mut curve = vec![(A::zero(), A::zero())];
        let mut thresholds = Vec::new();

        for (i, (score, target)) in pairs.iter().enumerate() {
            if *target {
                tp += A::one();
            } else {
                fp += A::one();
            }

            // emit a point once all samples sharing this score are counted
            if pairs.get(i + 1).map(|next| next.0 != *score).unwrap_or(true) {
                curve.push((fp / max_fp, tp / max_tp));
                thresholds.push(*score);
            }
        }

        Ok(ReceiverOperatingCharacteristic { curve, thresholds })
    }
}
