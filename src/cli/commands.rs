//! Command implementations for the Augur CLI.

use std::fs;
use std::io::{BufRead, Write};

use log::{debug, info};
use rayon::prelude::*;

use crate::artifact::ModelArtifact;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::engine::InferenceEngine;
use crate::error::{AugurError, Result};

/// Execute a CLI command.
pub fn execute_command(args: AugurArgs) -> Result<()> {
    match &args.command {
        Command::Predict(predict_args) => predict(predict_args.clone(), &args),
        Command::Eval(eval_args) => eval(eval_args.clone(), &args),
        Command::Inspect(inspect_args) => inspect(inspect_args.clone(), &args),
    }
}

/// Run a one-shot prediction, or the interactive loop when no input was
/// given.
fn predict(args: PredictArgs, cli_args: &AugurArgs) -> Result<()> {
    let engine = InferenceEngine::load(&args.model)?;

    if !args.features.is_empty() {
        let prediction = engine.predict_features(&args.features)?;
        return match cli_args.output_format {
            OutputFormat::Json => print_json(&prediction, cli_args),
            OutputFormat::Human => {
                print_prediction_human(&prediction);
                Ok(())
            }
        };
    }

    if !args.text.is_empty() {
        let prediction = engine.predict_text(&args.text.join(" "))?;
        return match cli_args.output_format {
            OutputFormat::Json => print_json(&prediction, cli_args),
            OutputFormat::Human => {
                print_prediction_human(&prediction);
                Ok(())
            }
        };
    }

    interactive_loop(&engine, cli_args)
}

/// Read one line at a time and classify it until `exit`/`quit` or EOF.
fn interactive_loop(engine: &InferenceEngine, cli_args: &AugurArgs) -> Result<()> {
    if cli_args.verbosity() > 0 {
        println!("Interactive classifier. Type 'exit' to quit.");
    }

    let stdin = std::io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            break;
        }

        match engine.predict_text(input) {
            Ok(prediction) => match cli_args.output_format {
                OutputFormat::Json => print_json(&prediction, cli_args)?,
                OutputFormat::Human => print_prediction_human(&prediction),
            },
            Err(e) => eprintln!("Error: {e}"),
        }
    }
    Ok(())
}

/// Evaluate the model over a labeled CSV file.
fn eval(args: EvalArgs, cli_args: &AugurArgs) -> Result<()> {
    let engine = InferenceEngine::load(&args.model)?;
    let rows = read_labeled_csv(&args.csv_file)?;
    info!("loaded {} evaluation rows from {}", rows.len(), args.csv_file.display());

    let total = rows.len();
    if total == 0 {
        return Err(AugurError::invalid_input("evaluation file has no data rows"));
    }

    // Rows are independent; predict them in parallel, in input order.
    let predictions: Vec<_> = rows
        .par_iter()
        .map(|(message, _)| engine.predict_text(message))
        .collect::<Result<_>>()?;

    let mut correct = 0usize;
    let mut confidence_sum = 0.0;
    let mut pairs: Vec<(String, String)> = Vec::with_capacity(total);
    let mut low_confidence = Vec::new();

    for ((message, true_label), prediction) in rows.iter().zip(&predictions) {
        debug!("{message:?} -> {} ({:.3})", prediction.label, prediction.confidence);

        if prediction.label == *true_label {
            correct += 1;
        }
        confidence_sum += prediction.confidence;
        if prediction.confidence < args.threshold {
            low_confidence.push(LowConfidenceRow {
                message: message.clone(),
                true_label: true_label.clone(),
                predicted_label: prediction.label.clone(),
                confidence: prediction.confidence,
            });
        }
        pairs.push((true_label.clone(), prediction.label.clone()));
    }

    // Confusion matrix over the sorted union of true and predicted labels.
    let mut labels: Vec<String> = pairs
        .iter()
        .flat_map(|(t, p)| [t.clone(), p.clone()])
        .collect();
    labels.sort();
    labels.dedup();

    let index = |label: &str| labels.iter().position(|l| l == label).unwrap();
    let mut matrix = vec![vec![0usize; labels.len()]; labels.len()];
    for (true_label, predicted) in &pairs {
        matrix[index(true_label)][index(predicted)] += 1;
    }

    let results = EvalResults {
        total,
        accuracy: correct as f64 / total as f64,
        average_confidence: confidence_sum / total as f64,
        labels,
        matrix,
        low_confidence,
        threshold: args.threshold,
    };

    match cli_args.output_format {
        OutputFormat::Json => print_json(&results, cli_args),
        OutputFormat::Human => {
            print_eval_human(&results);
            Ok(())
        }
    }
}

/// Show artifact variant, classes, and dimensions.
fn inspect(args: InspectArgs, cli_args: &AugurArgs) -> Result<()> {
    let artifact = ModelArtifact::load(&args.model)?;

    let summary = match &artifact {
        ModelArtifact::LinearText(model) => ArtifactSummary {
            variant: artifact.variant().to_string(),
            classes: model.classifier.classes.clone(),
            vocabulary_size: Some(model.vocabulary_size()),
            tree_count: None,
            total_nodes: None,
            feature_names: None,
        },
        ModelArtifact::Forest(model) => ArtifactSummary {
            variant: artifact.variant().to_string(),
            classes: model.classes.clone(),
            vocabulary_size: None,
            tree_count: Some(model.trees.len()),
            total_nodes: Some(model.trees.iter().map(|t| t.node_count()).sum()),
            feature_names: Some(model.feature_names.clone()),
        },
    };

    match cli_args.output_format {
        OutputFormat::Json => print_json(&summary, cli_args),
        OutputFormat::Human => {
            print_summary_human(&summary);
            Ok(())
        }
    }
}

/// Read a `message,label` CSV file with a header row.
fn read_labeled_csv(path: &std::path::Path) -> Result<Vec<(String, String)>> {
    let content = fs::read_to_string(path)?;
    let mut records = split_csv_records(&content).into_iter();

    let header = records
        .next()
        .ok_or_else(|| AugurError::invalid_input("evaluation file is empty"))?;
    let columns = parse_csv_record(&header);
    let message_idx = columns.iter().position(|c| c == "message");
    let label_idx = columns.iter().position(|c| c == "label");
    let (message_idx, label_idx) = match (message_idx, label_idx) {
        (Some(m), Some(l)) => (m, l),
        _ => {
            return Err(AugurError::invalid_input(
                "CSV must contain 'message' and 'label' columns",
            ));
        }
    };

    let mut rows = Vec::new();
    for record in records {
        if record.trim().is_empty() {
            continue;
        }
        let fields = parse_csv_record(&record);
        if fields.len() <= message_idx.max(label_idx) {
            return Err(AugurError::invalid_input(format!(
                "CSV row has {} fields, expected at least {}",
                fields.len(),
                message_idx.max(label_idx) + 1
            )));
        }
        rows.push((fields[message_idx].clone(), fields[label_idx].clone()));
    }
    Ok(rows)
}

/// Split CSV content into logical records. A newline inside a quoted
/// field belongs to the field; a `\r` before a record break is dropped,
/// so CRLF files parse the same as LF files.
fn split_csv_records(content: &str) -> Vec<String> {
    let mut records = Vec::new();
    let mut record = String::new();
    let mut in_quotes = false;

    for c in content.chars() {
        match c {
            // An escaped `""` toggles twice and lands back in quotes.
            '"' => {
                in_quotes = !in_quotes;
                record.push(c);
            }
            '\n' if !in_quotes => {
                if record.ends_with('\r') {
                    record.pop();
                }
                records.push(std::mem::take(&mut record));
            }
            _ => record.push(c),
        }
    }
    if record.ends_with('\r') {
        record.pop();
    }
    if !record.is_empty() {
        records.push(record);
    }
    records
}

/// Split one CSV record into fields, honoring double-quote quoting with
/// `""` escapes.
fn parse_csv_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.is_empty() => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut field));
            }
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_record_plain() {
        assert_eq!(parse_csv_record("a,b,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parse_csv_record_quoted_comma() {
        assert_eq!(
            parse_csv_record(r#""hello, world",label"#),
            vec!["hello, world", "label"]
        );
    }

    #[test]
    fn test_parse_csv_record_escaped_quote() {
        assert_eq!(
            parse_csv_record(r#""say ""hi""",x"#),
            vec![r#"say "hi""#, "x"]
        );
    }

    #[test]
    fn test_parse_csv_record_empty_fields() {
        assert_eq!(parse_csv_record("a,,b"), vec!["a", "", "b"]);
        assert_eq!(parse_csv_record(""), vec![""]);
    }

    #[test]
    fn test_split_csv_records_crlf() {
        let records = split_csv_records("message,label\r\nhello there,greet\r\n");
        assert_eq!(records, vec!["message,label", "hello there,greet"]);
    }

    #[test]
    fn test_split_csv_records_quoted_newline() {
        let records = split_csv_records("\"first\nsecond\",x\nplain,y\n");
        assert_eq!(records, vec!["\"first\nsecond\",x", "plain,y"]);
        assert_eq!(
            parse_csv_record(&records[0]),
            vec!["first\nsecond", "x"]
        );
    }

    #[test]
    fn test_split_csv_records_no_trailing_newline() {
        let records = split_csv_records("message,label\na,b");
        assert_eq!(records, vec!["message,label", "a,b"]);
    }

    #[test]
    fn test_read_labeled_csv_crlf_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("eval.csv");
        std::fs::write(&path, "message,label\r\nhello world,greet\r\nbuy now,sales\r\n").unwrap();

        let rows = read_labeled_csv(&path).unwrap();
        assert_eq!(
            rows,
            vec![
                ("hello world".to_string(), "greet".to_string()),
                ("buy now".to_string(), "sales".to_string())
            ]
        );
    }
}
