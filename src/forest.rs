//! Random forest aggregation.

use rayon::prelude::*;

use crate::artifact::ForestModel;
use crate::error::{AugurError, Result};
use crate::prediction::Prediction;
use crate::tree;

/// Random forest classifier over a validated artifact.
#[derive(Debug, Clone)]
pub struct RandomForest<'a> {
    model: &'a ForestModel,
}

impl<'a> RandomForest<'a> {
    /// Create a forest over validated artifact parameters.
    pub fn new(model: &'a ForestModel) -> Self {
        Self { model }
    }

    /// Expected input vector dimension (the engineered-feature schema).
    pub fn dimension(&self) -> usize {
        self.model.feature_names.len()
    }

    /// Classify an engineered-feature vector.
    ///
    /// Every tree is evaluated independently, its leaf distribution is
    /// normalized to probabilities, and the per-tree distributions are
    /// averaged component-wise. A single-tree forest reduces exactly to
    /// that tree's own normalized leaf distribution.
    pub fn classify(&self, features: &[f64]) -> Result<Prediction> {
        if features.len() != self.dimension() {
            return Err(AugurError::dimension_mismatch(
                self.dimension(),
                features.len(),
            ));
        }

        let class_count = self.model.classes.len();
        let tree_count = self.model.trees.len();

        // Evaluate trees in parallel, then sum in tree order: float
        // addition is not associative, and the summation order must not
        // vary between calls.
        let distributions: Vec<Vec<f64>> = self
            .model
            .trees
            .par_iter()
            .map(|t| normalize(tree::evaluate(t, features)))
            .collect();

        let mut summed = vec![0.0; class_count];
        for dist in &distributions {
            for (a, d) in summed.iter_mut().zip(dist) {
                *a += d;
            }
        }

        let averaged: Vec<f64> = summed.into_iter().map(|s| s / tree_count as f64).collect();
        Ok(Prediction::from_distribution(&self.model.classes, averaged))
    }
}

/// Normalize a leaf's raw class counts to probabilities. An all-zero leaf
/// stays all-zero.
fn normalize(counts: &[f64]) -> Vec<f64> {
    let total: f64 = counts.iter().sum();
    if total > 0.0 {
        counts.iter().map(|c| c / total).collect()
    } else {
        counts.to_vec()
    }
}
