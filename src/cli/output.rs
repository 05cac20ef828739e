//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::AugurArgs;
use crate::error::Result;
use crate::prediction::Prediction;

/// Result structure for batch evaluation.
#[derive(Debug, Serialize, Deserialize)]
pub struct EvalResults {
    /// Number of evaluated rows.
    pub total: usize,
    /// Fraction of correct predictions.
    pub accuracy: f64,
    /// Mean confidence over all rows.
    pub average_confidence: f64,
    /// Sorted union of true and predicted labels.
    pub labels: Vec<String>,
    /// Confusion matrix, `matrix[true][predicted]` in `labels` order.
    pub matrix: Vec<Vec<usize>>,
    /// Rows whose confidence fell below the threshold.
    pub low_confidence: Vec<LowConfidenceRow>,
    /// The threshold used for flagging.
    pub threshold: f64,
}

/// One flagged low-confidence prediction.
#[derive(Debug, Serialize, Deserialize)]
pub struct LowConfidenceRow {
    pub message: String,
    pub true_label: String,
    pub predicted_label: String,
    pub confidence: f64,
}

/// Artifact summary for the inspect command.
#[derive(Debug, Serialize, Deserialize)]
pub struct ArtifactSummary {
    pub variant: String,
    pub classes: Vec<String>,
    /// Vocabulary size for linear text models.
    pub vocabulary_size: Option<usize>,
    /// Tree count for forest models.
    pub tree_count: Option<usize>,
    /// Total node count across all trees for forest models.
    pub total_nodes: Option<usize>,
    /// Engineered-feature schema for forest models.
    pub feature_names: Option<Vec<String>>,
}

/// Serialize a result as JSON to stdout.
pub fn print_json<T: Serialize>(result: &T, args: &AugurArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}

/// Print a prediction in human-readable form.
pub fn print_prediction_human(prediction: &Prediction) {
    println!("Label: {}", prediction.label);
    println!("Confidence: {:.2}", prediction.confidence);
    println!("Probabilities:");

    let mut sorted: Vec<_> = prediction.probabilities.iter().collect();
    sorted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    for (label, prob) in sorted {
        println!("  {label}: {prob:.3}");
    }
}

/// Print evaluation results in human-readable form.
pub fn print_eval_human(results: &EvalResults) {
    println!("Evaluation Results");
    println!("==================");
    println!("Rows: {}", results.total);
    println!("Accuracy: {:.3}", results.accuracy);
    println!("Average confidence: {:.3}", results.average_confidence);

    println!();
    println!("Confusion matrix (rows = true, columns = predicted):");
    print!("{:>12}", "");
    for label in &results.labels {
        print!("{label:>12}");
    }
    println!();
    for (i, label) in results.labels.iter().enumerate() {
        print!("{label:>12}");
        for count in &results.matrix[i] {
            print!("{count:>12}");
        }
        println!();
    }

    if !results.low_confidence.is_empty() {
        println!();
        println!(
            "{} predictions with confidence < {}:",
            results.low_confidence.len(),
            results.threshold
        );
        for row in results.low_confidence.iter().take(5) {
            println!(
                "  {:.2} | true={:8} pred={:8} | {:?}",
                row.confidence, row.true_label, row.predicted_label, row.message
            );
        }
        if results.low_confidence.len() > 5 {
            println!("  ... and {} more", results.low_confidence.len() - 5);
        }
    }
}

/// Print an artifact summary in human-readable form.
pub fn print_summary_human(summary: &ArtifactSummary) {
    println!("Variant: {}", summary.variant);
    println!("Classes: {}", summary.classes.join(", "));
    if let Some(n) = summary.vocabulary_size {
        println!("Vocabulary size: {n}");
    }
    if let Some(n) = summary.tree_count {
        println!("Trees: {n}");
    }
    if let Some(n) = summary.total_nodes {
        println!("Total nodes: {n}");
    }
    if let Some(names) = &summary.feature_names {
        println!("Features: {}", names.join(", "));
    }
}
