//! Model artifact schema, loading, and validation.
//!
//! An artifact is the serialized JSON model the external training toolchain
//! exports. Two shapes exist: a TF-IDF + linear classifier bundle for text
//! inputs, and a random forest over a fixed engineered-feature schema. The
//! variant is decided once here at load time; inference code never
//! re-inspects the shape.
//!
//! Every invariant is checked before an artifact is published. A loaded
//! [`ModelArtifact`] is immutable for its entire lifetime.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{AugurError, Result};

/// TF-IDF parameters of a linear text model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfIdfParams {
    /// Vocabulary: gram -> dense index mapping (0..N-1).
    pub vocabulary: HashMap<String, usize>,
    /// Inverse document frequency weight per vocabulary index.
    pub idf_weights: Vec<f64>,
}

/// Linear classifier parameters of a linear text model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierParams {
    /// Coefficient matrix, one row of length N per class.
    pub coefficients: Vec<Vec<f64>>,
    /// Intercept per class.
    pub intercepts: Vec<f64>,
    /// Ordered class labels.
    pub classes: Vec<String>,
}

/// TF-IDF vectorizer plus multiclass linear classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearTextModel {
    /// Vectorizer parameters.
    pub tfidf: TfIdfParams,
    /// Classifier parameters.
    pub classifier: ClassifierParams,
}

/// A single decision tree in parallel-array form.
///
/// All arrays have the same length (the node count). `feature` holds the
/// split feature index per node, with `-2` marking a leaf. `children_left`
/// and `children_right` hold child node indices, with `-1` marking absence.
/// `value` holds the per-node class-count distribution, only meaningful at
/// leaves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    /// Split feature index per node (-2 = leaf).
    pub feature: Vec<i64>,
    /// Split threshold per node.
    pub threshold: Vec<f64>,
    /// Per-node class-count distribution.
    #[serde(deserialize_with = "deserialize_node_values")]
    pub value: Vec<Vec<f64>>,
    /// Left child index per node (-1 = absent).
    pub children_left: Vec<i64>,
    /// Right child index per node (-1 = absent).
    pub children_right: Vec<i64>,
}

/// Random forest over a fixed engineered-feature schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestModel {
    /// Declared ensemble size; must match `trees.len()`.
    pub n_estimators: usize,
    /// Ordered class labels.
    pub classes: Vec<String>,
    /// Engineered-feature schema; inputs must have exactly this length.
    pub feature_names: Vec<String>,
    /// The trees of the ensemble.
    pub trees: Vec<Tree>,
}

/// A loaded, validated model artifact.
///
/// The variant is a closed tagged union decided once at load time: an
/// object carrying `trees` is a forest, one carrying `tfidf` and
/// `classifier` is a linear text model.
#[derive(Debug, Clone)]
pub enum ModelArtifact {
    /// Random forest over engineered features.
    Forest(ForestModel),
    /// TF-IDF + linear classifier over raw text.
    LinearText(LinearTextModel),
}

/// The training toolchain exports each node's value with an extra nesting
/// level (`[[c0, c1, ...]]`); accept both that and the flat row shape.
fn deserialize_node_values<'de, D>(deserializer: D) -> std::result::Result<Vec<Vec<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NodeValue {
        Flat(Vec<f64>),
        Nested(Vec<Vec<f64>>),
    }

    let raw: Vec<NodeValue> = Vec::deserialize(deserializer)?;
    raw.into_iter()
        .map(|node| match node {
            NodeValue::Flat(row) => Ok(row),
            NodeValue::Nested(mut rows) if rows.len() == 1 => Ok(rows.remove(0)),
            NodeValue::Nested(rows) => Err(serde::de::Error::custom(format!(
                "node value must hold exactly one distribution row, got {}",
                rows.len()
            ))),
        })
        .collect()
}

impl ModelArtifact {
    /// Load and validate an artifact from a JSON file.
    ///
    /// Any parse failure or invariant violation rejects the artifact as a
    /// whole; a partially valid artifact is never returned.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AugurError::ArtifactNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse and validate an artifact from a JSON string.
    ///
    /// The variant is decided here, once: an object carrying `trees` is a
    /// forest, one carrying `tfidf` and `classifier` is a linear text
    /// model. Anything else is malformed.
    pub fn from_json(content: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(content)
            .map_err(|e| AugurError::malformed(format!("JSON parse failure: {e}")))?;

        let (is_forest, is_linear) = match value.as_object() {
            Some(object) => (
                object.contains_key("trees"),
                object.contains_key("tfidf") && object.contains_key("classifier"),
            ),
            None => {
                return Err(AugurError::malformed("artifact root must be a JSON object"));
            }
        };

        let artifact = if is_forest {
            ModelArtifact::Forest(
                serde_json::from_value(value)
                    .map_err(|e| AugurError::malformed(format!("forest schema: {e}")))?,
            )
        } else if is_linear {
            ModelArtifact::LinearText(
                serde_json::from_value(value)
                    .map_err(|e| AugurError::malformed(format!("linear text schema: {e}")))?,
            )
        } else {
            return Err(AugurError::malformed(
                "artifact has neither `trees` nor `tfidf` + `classifier`",
            ));
        };

        artifact.validate()?;
        Ok(artifact)
    }

    /// Ordered class labels of the artifact.
    pub fn classes(&self) -> &[String] {
        match self {
            ModelArtifact::Forest(m) => &m.classes,
            ModelArtifact::LinearText(m) => &m.classifier.classes,
        }
    }

    /// Short variant name for logging and inspection.
    pub fn variant(&self) -> &'static str {
        match self {
            ModelArtifact::Forest(_) => "random_forest",
            ModelArtifact::LinearText(_) => "linear_text",
        }
    }

    /// Check every schema invariant.
    pub fn validate(&self) -> Result<()> {
        match self {
            ModelArtifact::Forest(m) => m.validate(),
            ModelArtifact::LinearText(m) => m.validate(),
        }
    }
}

fn validate_classes(classes: &[String]) -> Result<()> {
    if classes.is_empty() {
        return Err(AugurError::malformed("class list is empty"));
    }
    let unique: HashSet<&str> = classes.iter().map(|c| c.as_str()).collect();
    if unique.len() != classes.len() {
        return Err(AugurError::malformed("class labels are not unique"));
    }
    Ok(())
}

impl LinearTextModel {
    /// Vocabulary size N.
    pub fn vocabulary_size(&self) -> usize {
        self.tfidf.vocabulary.len()
    }

    fn validate(&self) -> Result<()> {
        let n = self.tfidf.vocabulary.len();

        // Vocabulary indices must be exactly 0..N-1, each used once.
        let mut seen = vec![false; n];
        for (gram, &idx) in &self.tfidf.vocabulary {
            if idx >= n {
                return Err(AugurError::malformed(format!(
                    "vocabulary index {idx} for gram {gram:?} out of range (N = {n})"
                )));
            }
            if seen[idx] {
                return Err(AugurError::malformed(format!(
                    "duplicate vocabulary index {idx}"
                )));
            }
            seen[idx] = true;
        }

        if self.tfidf.idf_weights.len() != n {
            return Err(AugurError::malformed(format!(
                "idf_weights length {} does not match vocabulary size {n}",
                self.tfidf.idf_weights.len()
            )));
        }

        validate_classes(&self.classifier.classes)?;
        let c = self.classifier.classes.len();
        if self.classifier.coefficients.len() != c {
            return Err(AugurError::malformed(format!(
                "coefficient row count {} does not match class count {c}",
                self.classifier.coefficients.len()
            )));
        }
        if self.classifier.intercepts.len() != c {
            return Err(AugurError::malformed(format!(
                "intercept count {} does not match class count {c}",
                self.classifier.intercepts.len()
            )));
        }
        for (i, row) in self.classifier.coefficients.iter().enumerate() {
            if row.len() != n {
                return Err(AugurError::malformed(format!(
                    "coefficient row {i} has length {} but vocabulary size is {n}",
                    row.len()
                )));
            }
        }
        Ok(())
    }
}

impl ForestModel {
    fn validate(&self) -> Result<()> {
        validate_classes(&self.classes)?;
        if self.feature_names.is_empty() {
            return Err(AugurError::malformed("feature_names is empty"));
        }
        if self.trees.is_empty() {
            return Err(AugurError::malformed("forest has no trees"));
        }
        if self.n_estimators != self.trees.len() {
            return Err(AugurError::malformed(format!(
                "n_estimators {} does not match tree count {}",
                self.n_estimators,
                self.trees.len()
            )));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.classes.len(), self.feature_names.len())
                .map_err(|e| AugurError::malformed(format!("tree {i}: {e}")))?;
        }
        Ok(())
    }
}

/// Leaf marker in the `feature` array.
pub const LEAF_FEATURE: i64 = -2;
/// Absent-child marker in the children arrays.
pub const NO_CHILD: i64 = -1;

impl Tree {
    /// Number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        self.feature.len()
    }

    /// Check whether a node is a leaf.
    pub fn is_leaf(&self, node: usize) -> bool {
        self.feature[node] == LEAF_FEATURE
            || (self.children_left[node] == NO_CHILD && self.children_right[node] == NO_CHILD)
    }

    fn validate(&self, class_count: usize, feature_count: usize) -> Result<()> {
        let nodes = self.feature.len();
        if nodes == 0 {
            return Err(AugurError::malformed("tree has no nodes"));
        }
        if self.threshold.len() != nodes
            || self.value.len() != nodes
            || self.children_left.len() != nodes
            || self.children_right.len() != nodes
        {
            return Err(AugurError::malformed(format!(
                "ragged tree arrays: feature={}, threshold={}, value={}, left={}, right={}",
                nodes,
                self.threshold.len(),
                self.value.len(),
                self.children_left.len(),
                self.children_right.len()
            )));
        }

        for node in 0..nodes {
            if self.value[node].len() != class_count {
                return Err(AugurError::malformed(format!(
                    "node {node} value row has length {} but class count is {class_count}",
                    self.value[node].len()
                )));
            }

            let feature = self.feature[node];
            if feature != LEAF_FEATURE && (feature < 0 || feature as usize >= feature_count) {
                return Err(AugurError::malformed(format!(
                    "node {node} split feature {feature} out of range ({feature_count} features)"
                )));
            }

            for (side, child) in [
                ("left", self.children_left[node]),
                ("right", self.children_right[node]),
            ] {
                if child != NO_CHILD && (child < 0 || child as usize >= nodes) {
                    return Err(AugurError::malformed(format!(
                        "node {node} {side} child {child} out of range ({nodes} nodes)"
                    )));
                }
                // Children always come after their parent in the node
                // arrays; this rules out cycles, so traversal terminates.
                if child != NO_CHILD && child as usize <= node {
                    return Err(AugurError::malformed(format!(
                        "node {node} {side} child {child} does not follow its parent"
                    )));
                }
            }

            if feature == LEAF_FEATURE
                && (self.children_left[node] != NO_CHILD || self.children_right[node] != NO_CHILD)
            {
                return Err(AugurError::malformed(format!(
                    "leaf node {node} has children"
                )));
            }
            if feature >= 0
                && (self.children_left[node] == NO_CHILD || self.children_right[node] == NO_CHILD)
            {
                return Err(AugurError::malformed(format!(
                    "split node {node} is missing a child"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_json() -> String {
        serde_json::json!({
            "tfidf": {
                "vocabulary": {"hello": 0, "world": 1},
                "idf_weights": [1.0, 1.0]
            },
            "classifier": {
                "coefficients": [[1.0, 0.0], [0.0, 1.0]],
                "intercepts": [0.0, 0.0],
                "classes": ["A", "B"]
            }
        })
        .to_string()
    }

    fn forest_json() -> String {
        serde_json::json!({
            "type": "random_forest",
            "n_estimators": 1,
            "classes": ["X", "Y"],
            "feature_names": ["f0", "f1"],
            "trees": [{
                "feature": [-2],
                "threshold": [-2.0],
                "value": [[[5.0, 3.0]]],
                "children_left": [-1],
                "children_right": [-1]
            }]
        })
        .to_string()
    }

    #[test]
    fn test_linear_artifact_parses_and_validates() {
        let artifact = ModelArtifact::from_json(&linear_json()).unwrap();
        assert_eq!(artifact.variant(), "linear_text");
        assert_eq!(artifact.classes(), &["A", "B"]);
    }

    #[test]
    fn test_forest_artifact_parses_and_validates() {
        let artifact = ModelArtifact::from_json(&forest_json()).unwrap();
        assert_eq!(artifact.variant(), "random_forest");
        match artifact {
            ModelArtifact::Forest(m) => {
                // The nested value row is flattened at load.
                assert_eq!(m.trees[0].value[0], vec![5.0, 3.0]);
            }
            _ => panic!("expected forest variant"),
        }
    }

    #[test]
    fn test_flat_value_rows_accepted() {
        let json = forest_json().replace("[[[5.0,3.0]]]", "[[5.0,3.0]]");
        let artifact = ModelArtifact::from_json(&json).unwrap();
        match artifact {
            ModelArtifact::Forest(m) => assert_eq!(m.trees[0].value[0], vec![5.0, 3.0]),
            _ => panic!("expected forest variant"),
        }
    }

    #[test]
    fn test_class_coefficient_mismatch_rejected() {
        let json = linear_json().replace(
            r#""classes":["A","B"]"#,
            r#""classes":["A","B","C"]"#,
        );
        let err = ModelArtifact::from_json(&json).unwrap_err();
        assert!(matches!(err, AugurError::ArtifactMalformed(_)));
    }

    #[test]
    fn test_ragged_coefficient_row_rejected() {
        let json = linear_json().replace("[0.0,1.0]", "[0.0]");
        let err = ModelArtifact::from_json(&json).unwrap_err();
        assert!(matches!(err, AugurError::ArtifactMalformed(_)));
    }

    #[test]
    fn test_sparse_vocabulary_indices_rejected() {
        let json = linear_json().replace(r#""world":1"#, r#""world":3"#);
        let err = ModelArtifact::from_json(&json).unwrap_err();
        assert!(matches!(err, AugurError::ArtifactMalformed(_)));
    }

    #[test]
    fn test_empty_class_list_rejected() {
        let json = forest_json().replace(r#""classes":["X","Y"]"#, r#""classes":[]"#);
        let err = ModelArtifact::from_json(&json).unwrap_err();
        assert!(matches!(err, AugurError::ArtifactMalformed(_)));
    }

    #[test]
    fn test_ragged_tree_arrays_rejected() {
        let json = forest_json().replace(r#""threshold":[-2.0]"#, r#""threshold":[-2.0,0.5]"#);
        let err = ModelArtifact::from_json(&json).unwrap_err();
        assert!(matches!(err, AugurError::ArtifactMalformed(_)));
    }

    #[test]
    fn test_n_estimators_mismatch_rejected() {
        let json = forest_json().replace(r#""n_estimators":1"#, r#""n_estimators":7"#);
        let err = ModelArtifact::from_json(&json).unwrap_err();
        assert!(matches!(err, AugurError::ArtifactMalformed(_)));
    }

    #[test]
    fn test_cyclic_children_rejected() {
        let json = serde_json::json!({
            "type": "random_forest",
            "n_estimators": 1,
            "classes": ["X", "Y"],
            "feature_names": ["f0"],
            "trees": [{
                "feature": [0, 0, -2],
                "threshold": [0.5, 0.5, -2.0],
                "value": [[1.0, 1.0], [1.0, 1.0], [1.0, 1.0]],
                "children_left": [1, 0, -1],
                "children_right": [2, 2, -1]
            }]
        })
        .to_string();
        let err = ModelArtifact::from_json(&json).unwrap_err();
        assert!(matches!(err, AugurError::ArtifactMalformed(_)));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = ModelArtifact::load(Path::new("/nonexistent/model.json")).unwrap_err();
        assert!(matches!(err, AugurError::ArtifactNotFound(_)));
    }

    #[test]
    fn test_garbage_json_is_malformed() {
        let err = ModelArtifact::from_json("{not json").unwrap_err();
        assert!(matches!(err, AugurError::ArtifactMalformed(_)));
    }
}
