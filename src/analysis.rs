//! Text analysis: tokenization and word n-gram extraction.
//!
//! The pipeline mirrors the vectorizer the training toolchain was fitted
//! with: lowercase, replace every character outside `[a-z0-9]` and
//! whitespace with a single space, split on whitespace, then emit unigrams,
//! bigrams, and trigrams. Grams are the feature keys looked up in the
//! artifact vocabulary.

/// Split text into lowercase alphanumeric tokens.
///
/// Every character that is neither ASCII alphanumeric nor whitespace is
/// treated as a token boundary.
pub fn tokenize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    cleaned.split_whitespace().map(|t| t.to_string()).collect()
}

/// Generate contiguous word n-grams of size `n`, joined by a single space.
///
/// Returns an empty vector when fewer than `n` tokens are available.
pub fn ngrams(tokens: &[String], n: usize) -> Vec<String> {
    if n == 0 || tokens.len() < n {
        return Vec::new();
    }
    if n == 1 {
        return tokens.to_vec();
    }
    tokens.windows(n).map(|w| w.join(" ")).collect()
}

/// Extract the full gram sequence for a text: unigrams, then bigrams, then
/// trigrams.
///
/// Empty or punctuation-only input yields an empty sequence. The grouping
/// by gram size is for clarity only; downstream counting is order-agnostic.
pub fn extract_grams(text: &str) -> Vec<String> {
    let tokens = tokenize(text);
    let mut grams = ngrams(&tokens, 1);
    grams.extend(ngrams(&tokens, 2));
    grams.extend(ngrams(&tokens, 3));
    grams
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_lowercases_and_strips_punctuation() {
        let tokens = tokenize("Hello, World! 42");
        assert_eq!(tokens, vec!["hello", "world", "42"]);
    }

    #[test]
    fn test_tokenize_punctuation_only() {
        assert!(tokenize("?!... ---").is_empty());
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_tokenize_collapses_whitespace() {
        let tokens = tokenize("a\t b\n  c");
        assert_eq!(tokens, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_ngrams_bigram() {
        let tokens: Vec<String> = ["how", "to", "install", "python"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            ngrams(&tokens, 2),
            vec!["how to", "to install", "install python"]
        );
    }

    #[test]
    fn test_ngrams_short_input() {
        let tokens: Vec<String> = vec!["only".to_string()];
        assert!(ngrams(&tokens, 2).is_empty());
        assert!(ngrams(&tokens, 3).is_empty());
        assert_eq!(ngrams(&tokens, 1), vec!["only"]);
    }

    #[test]
    fn test_extract_grams_order() {
        let grams = extract_grams("a b c");
        assert_eq!(grams, vec!["a", "b", "c", "a b", "b c", "a b c"]);
    }

    #[test]
    fn test_extract_grams_empty_input() {
        assert!(extract_grams("").is_empty());
        assert!(extract_grams("!!!").is_empty());
    }
}
