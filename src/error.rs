//! Error types for the Augur library.
//!
//! All errors are represented by the [`AugurError`] enum. Load-time failures
//! (`ArtifactNotFound`, `ArtifactMalformed`) abort artifact activation
//! entirely; per-call failures (`FeatureDimensionMismatch`, `InvalidInput`)
//! reject only the offending call and never touch the loaded artifact.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The main error type for Augur operations.
#[derive(Error, Debug)]
pub enum AugurError {
    /// Artifact file missing at load time.
    #[error("artifact not found: {}", .0.display())]
    ArtifactNotFound(PathBuf),

    /// Artifact parse failure or schema invariant violation.
    #[error("malformed artifact: {0}")]
    ArtifactMalformed(String),

    /// Input vector length disagrees with the model's expected dimension.
    #[error("feature dimension mismatch: expected {expected}, got {actual}")]
    FeatureDimensionMismatch { expected: usize, actual: usize },

    /// Input kind does not match the loaded model variant.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization errors outside artifact loading.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic anyhow error.
    #[error("error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with AugurError.
pub type Result<T> = std::result::Result<T, AugurError>;

impl AugurError {
    /// Create a new malformed-artifact error.
    pub fn malformed<S: Into<String>>(msg: S) -> Self {
        AugurError::ArtifactMalformed(msg.into())
    }

    /// Create a new invalid-input error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        AugurError::InvalidInput(msg.into())
    }

    /// Create a new feature dimension mismatch error.
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        AugurError::FeatureDimensionMismatch { expected, actual }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AugurError::malformed("ragged coefficient matrix");
        assert_eq!(
            err.to_string(),
            "malformed artifact: ragged coefficient matrix"
        );

        let err = AugurError::dimension_mismatch(8, 5);
        assert_eq!(
            err.to_string(),
            "feature dimension mismatch: expected 8, got 5"
        );
    }

    #[test]
    fn test_io_conversion() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err: AugurError = io_err.into();
        assert!(matches!(err, AugurError::Io(_)));
    }
}
