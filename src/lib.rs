//! # Augur
//!
//! A portable inference engine for small text- and feature-based
//! classifiers. Augur loads serialized model artifacts exported by an
//! external training toolchain and reproduces the vectorization and
//! classification math without that toolchain present.
//!
//! ## Features
//!
//! - TF-IDF text classification (word 1-3-grams, linear softmax classifier)
//! - Random forest evaluation over engineered feature vectors
//! - Strict artifact validation at load time
//! - Atomic hot-reload of the active artifact
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use augur::engine::InferenceEngine;
//!
//! # fn main() -> augur::error::Result<()> {
//! let engine = InferenceEngine::load(Path::new("models/intent_model.json"))?;
//! let prediction = engine.predict_text("how do I install this")?;
//! println!("{} ({:.2})", prediction.label, prediction.confidence);
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod artifact;
pub mod cli;
pub mod engine;
pub mod error;
pub mod forest;
pub mod linear;
pub mod prediction;
pub mod tfidf;
pub mod tree;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
