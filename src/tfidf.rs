//! TF-IDF vector reconstruction.
//!
//! This is the inference-side counterpart of the training toolchain's
//! vectorizer: it rebuilds, from the artifact's vocabulary and precomputed
//! IDF weights, the exact vector the classifier coefficients were fitted
//! against. The weighting is `count * idf` with L2 normalization and no
//! additional length normalization, matching the runtime the artifact was
//! exported for.

use ahash::AHashMap;

use crate::analysis::extract_grams;
use crate::artifact::TfIdfParams;

/// TF-IDF vectorizer over a fixed, pre-fitted vocabulary.
#[derive(Debug, Clone)]
pub struct TfIdfVectorizer<'a> {
    params: &'a TfIdfParams,
}

impl<'a> TfIdfVectorizer<'a> {
    /// Create a vectorizer over validated artifact parameters.
    pub fn new(params: &'a TfIdfParams) -> Self {
        Self { params }
    }

    /// Size of the vocabulary (the output vector dimension).
    pub fn dimension(&self) -> usize {
        self.params.idf_weights.len()
    }

    /// Transform raw text into a unit-length TF-IDF vector.
    ///
    /// Grams absent from the vocabulary are silently ignored; that is the
    /// intended out-of-vocabulary policy, not an error. When no gram
    /// matches at all, the all-zero vector is returned unchanged rather
    /// than dividing by a zero norm.
    pub fn transform(&self, text: &str) -> Vec<f64> {
        let mut counts: AHashMap<usize, u32> = AHashMap::new();
        for gram in extract_grams(text) {
            if let Some(&idx) = self.params.vocabulary.get(&gram) {
                *counts.entry(idx).or_insert(0) += 1;
            }
        }

        let mut vector = vec![0.0; self.dimension()];
        for (idx, count) in counts {
            vector[idx] = count as f64 * self.params.idf_weights[idx];
        }

        let norm = vector.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}
