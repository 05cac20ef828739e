//! Multiclass linear classification via softmax.

use crate::artifact::ClassifierParams;
use crate::error::{AugurError, Result};
use crate::prediction::Prediction;

/// Multiclass linear classifier over pre-fitted coefficients.
#[derive(Debug, Clone)]
pub struct LinearClassifier<'a> {
    params: &'a ClassifierParams,
}

impl<'a> LinearClassifier<'a> {
    /// Create a classifier over validated artifact parameters.
    pub fn new(params: &'a ClassifierParams) -> Self {
        Self { params }
    }

    /// Expected input vector dimension N.
    pub fn dimension(&self) -> usize {
        self.params.coefficients.first().map_or(0, |row| row.len())
    }

    /// Classify a feature vector of length N.
    ///
    /// A length mismatch is a configuration error, never silently
    /// truncated.
    pub fn classify(&self, vector: &[f64]) -> Result<Prediction> {
        let n = self.dimension();
        if vector.len() != n {
            return Err(AugurError::dimension_mismatch(n, vector.len()));
        }

        let logits: Vec<f64> = self
            .params
            .coefficients
            .iter()
            .zip(&self.params.intercepts)
            .map(|(row, intercept)| {
                intercept + row.iter().zip(vector).map(|(c, x)| c * x).sum::<f64>()
            })
            .collect();

        Ok(Prediction::from_distribution(
            &self.params.classes,
            softmax(&logits),
        ))
    }
}

/// Numerically stable softmax: shift by the max logit before
/// exponentiating.
pub fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exp: Vec<f64> = logits.iter().map(|&l| (l - max).exp()).collect();
    let sum: f64 = exp.iter().sum();
    exp.into_iter().map(|e| e / sum).collect()
}
