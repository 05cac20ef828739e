//! Command line argument parsing for the Augur CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// Augur - portable classifier inference engine
#[derive(Parser, Debug, Clone)]
#[command(name = "augur")]
#[command(about = "Run inference against serialized classifier artifacts")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct AugurArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl AugurArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Classify text or a feature vector (interactive when no input given)
    Predict(PredictArgs),

    /// Evaluate a model against a labeled CSV file
    Eval(EvalArgs),

    /// Show artifact variant, classes, and dimensions
    Inspect(InspectArgs),
}

/// Arguments for prediction
#[derive(Parser, Debug, Clone)]
pub struct PredictArgs {
    /// Path to the model artifact (JSON)
    #[arg(short, long, value_name = "MODEL_PATH")]
    pub model: PathBuf,

    /// Text to classify; with no text and no --features, enters an
    /// interactive loop reading one line at a time
    #[arg(value_name = "TEXT", trailing_var_arg = true)]
    pub text: Vec<String>,

    /// Engineered-feature vector for forest models (comma-separated)
    #[arg(long, value_name = "FEATURES", value_delimiter = ',', conflicts_with = "text")]
    pub features: Vec<f64>,
}

/// Arguments for batch evaluation
#[derive(Parser, Debug, Clone)]
pub struct EvalArgs {
    /// Path to the model artifact (JSON)
    #[arg(short, long, value_name = "MODEL_PATH")]
    pub model: PathBuf,

    /// CSV file with header columns `message,label`
    #[arg(value_name = "CSV_FILE")]
    pub csv_file: PathBuf,

    /// Flag predictions with confidence below this threshold
    #[arg(long, default_value = "0.7")]
    pub threshold: f64,
}

/// Arguments for artifact inspection
#[derive(Parser, Debug, Clone)]
pub struct InspectArgs {
    /// Path to the model artifact (JSON)
    #[arg(short, long, value_name = "MODEL_PATH")]
    pub model: PathBuf,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predict_command() {
        let args = AugurArgs::try_parse_from([
            "augur",
            "predict",
            "--model",
            "model.json",
            "how",
            "to",
            "install",
        ])
        .unwrap();

        if let Command::Predict(predict_args) = args.command {
            assert_eq!(predict_args.model, PathBuf::from("model.json"));
            assert_eq!(predict_args.text, vec!["how", "to", "install"]);
            assert!(predict_args.features.is_empty());
        } else {
            panic!("Expected Predict command");
        }
    }

    #[test]
    fn test_predict_features() {
        let args = AugurArgs::try_parse_from([
            "augur",
            "predict",
            "--model",
            "forest.json",
            "--features",
            "1.0,0.85,0.05",
        ])
        .unwrap();

        if let Command::Predict(predict_args) = args.command {
            assert_eq!(predict_args.features, vec![1.0, 0.85, 0.05]);
        } else {
            panic!("Expected Predict command");
        }
    }

    #[test]
    fn test_eval_command_with_threshold() {
        let args = AugurArgs::try_parse_from([
            "augur",
            "--format",
            "json",
            "eval",
            "--model",
            "model.json",
            "eval.csv",
            "--threshold",
            "0.5",
        ])
        .unwrap();

        assert!(matches!(args.output_format, OutputFormat::Json));
        if let Command::Eval(eval_args) = args.command {
            assert_eq!(eval_args.csv_file, PathBuf::from("eval.csv"));
            assert_eq!(eval_args.threshold, 0.5);
        } else {
            panic!("Expected Eval command");
        }
    }

    #[test]
    fn test_verbosity() {
        let args =
            AugurArgs::try_parse_from(["augur", "-vv", "inspect", "--model", "m.json"]).unwrap();
        assert_eq!(args.verbosity(), 2);

        let args =
            AugurArgs::try_parse_from(["augur", "--quiet", "inspect", "--model", "m.json"])
                .unwrap();
        assert_eq!(args.verbosity(), 0);
    }
}
