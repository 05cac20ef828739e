//! Inference facade: loads one artifact, dispatches on its variant, and
//! answers `predict` calls.
//!
//! The engine holds the active artifact behind `RwLock<Arc<ModelArtifact>>`.
//! Inference clones the `Arc` out of the lock and then runs without any
//! synchronization; a reload builds and validates the replacement fully
//! before swapping the reference, so concurrent callers always see either
//! the old or the new artifact in full.

use std::path::Path;
use std::sync::Arc;

use log::info;
use parking_lot::RwLock;

use crate::artifact::ModelArtifact;
use crate::error::{AugurError, Result};
use crate::forest::RandomForest;
use crate::linear::LinearClassifier;
use crate::prediction::Prediction;
use crate::tfidf::TfIdfVectorizer;

/// Input to a `predict` call.
#[derive(Debug, Clone)]
pub enum ModelInput {
    /// Raw text, for linear text models.
    Text(String),
    /// Engineered-feature vector, for forest models.
    Features(Vec<f64>),
}

/// The inference engine over one loaded artifact.
#[derive(Debug)]
pub struct InferenceEngine {
    artifact: RwLock<Arc<ModelArtifact>>,
}

impl InferenceEngine {
    /// Load and validate an artifact file, then construct an engine over it.
    pub fn load(path: &Path) -> Result<Self> {
        let artifact = ModelArtifact::load(path)?;
        info!(
            "loaded {} artifact from {} ({} classes)",
            artifact.variant(),
            path.display(),
            artifact.classes().len()
        );
        Ok(Self {
            artifact: RwLock::new(Arc::new(artifact)),
        })
    }

    /// Construct an engine over an already-validated artifact.
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self> {
        artifact.validate()?;
        Ok(Self {
            artifact: RwLock::new(Arc::new(artifact)),
        })
    }

    /// The currently active artifact.
    pub fn artifact(&self) -> Arc<ModelArtifact> {
        self.artifact.read().clone()
    }

    /// Load a new artifact and swap it in atomically.
    ///
    /// The replacement is parsed and validated entirely before the swap;
    /// on any failure the active artifact stays untouched. In-flight
    /// `predict` calls keep the artifact they started with.
    pub fn reload(&self, path: &Path) -> Result<()> {
        let replacement = Arc::new(ModelArtifact::load(path)?);
        info!(
            "reloaded {} artifact from {}",
            replacement.variant(),
            path.display()
        );
        *self.artifact.write() = replacement;
        Ok(())
    }

    /// Classify one input against the active artifact.
    ///
    /// The input kind must match the loaded variant: text for linear text
    /// models, a feature vector for forests. A mismatch rejects the call;
    /// no fallback label is ever returned.
    pub fn predict(&self, input: &ModelInput) -> Result<Prediction> {
        let artifact = self.artifact();
        match (artifact.as_ref(), input) {
            (ModelArtifact::LinearText(model), ModelInput::Text(text)) => {
                let vector = TfIdfVectorizer::new(&model.tfidf).transform(text);
                LinearClassifier::new(&model.classifier).classify(&vector)
            }
            (ModelArtifact::Forest(model), ModelInput::Features(features)) => {
                RandomForest::new(model).classify(features)
            }
            (ModelArtifact::LinearText(_), ModelInput::Features(_)) => Err(
                AugurError::invalid_input("linear text model expects text input"),
            ),
            (ModelArtifact::Forest(_), ModelInput::Text(_)) => Err(AugurError::invalid_input(
                "random forest model expects a feature vector",
            )),
        }
    }

    /// Classify raw text (linear text models).
    pub fn predict_text(&self, text: &str) -> Result<Prediction> {
        self.predict(&ModelInput::Text(text.to_string()))
    }

    /// Classify an engineered-feature vector (forest models).
    pub fn predict_features(&self, features: &[f64]) -> Result<Prediction> {
        self.predict(&ModelInput::Features(features.to_vec()))
    }
}
