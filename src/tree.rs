//! Decision tree evaluation over parallel-array trees.

use crate::artifact::Tree;

/// Evaluate a tree against a feature vector, returning the reached leaf's
/// raw class-count distribution verbatim (not normalized).
///
/// Traversal starts at node 0 and follows `x[feature] <= threshold` to the
/// left child, otherwise to the right, until a leaf. Validation guarantees
/// every split node has both children, so the walk terminates within the
/// tree's depth.
pub fn evaluate<'a>(tree: &'a Tree, features: &[f64]) -> &'a [f64] {
    let mut node = 0usize;
    while !tree.is_leaf(node) {
        let feature_idx = tree.feature[node] as usize;
        node = if features[feature_idx] <= tree.threshold[node] {
            tree.children_left[node] as usize
        } else {
            tree.children_right[node] as usize
        };
    }
    &tree.value[node]
}
