//! Prediction output type shared by all classifier paths.

use serde::{Deserialize, Serialize};

/// Result of a single classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted class label.
    pub label: String,
    /// Probability of the predicted label.
    pub confidence: f64,
    /// Full per-class probability distribution, preserving class order.
    pub probabilities: Vec<(String, f64)>,
}

impl Prediction {
    /// Build a prediction from class labels and a probability distribution
    /// in class order. Ties resolve to the first occurrence.
    pub fn from_distribution(classes: &[String], distribution: Vec<f64>) -> Self {
        debug_assert_eq!(classes.len(), distribution.len());

        let mut best = 0;
        for (i, &p) in distribution.iter().enumerate() {
            if p > distribution[best] {
                best = i;
            }
        }

        Prediction {
            label: classes[best].clone(),
            confidence: distribution[best],
            probabilities: classes
                .iter()
                .cloned()
                .zip(distribution)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_argmax_picks_largest() {
        let p = Prediction::from_distribution(&classes(&["a", "b", "c"]), vec![0.2, 0.5, 0.3]);
        assert_eq!(p.label, "b");
        assert_eq!(p.confidence, 0.5);
        assert_eq!(p.probabilities.len(), 3);
    }

    #[test]
    fn test_tie_resolves_to_first_occurrence() {
        let p = Prediction::from_distribution(&classes(&["a", "b"]), vec![0.5, 0.5]);
        assert_eq!(p.label, "a");
    }

    #[test]
    fn test_distribution_preserves_class_order() {
        let p = Prediction::from_distribution(&classes(&["z", "a"]), vec![0.1, 0.9]);
        assert_eq!(p.probabilities[0].0, "z");
        assert_eq!(p.probabilities[1].0, "a");
    }
}
