//! Space splitting and per-token stemming

use super::stemmer::Stemmer;

/// Split normalized text on single spaces.
///
/// Adjacent spaces produce empty tokens; they are kept here so the token
/// stream lines up one-to-one with the delimiters in the text.
pub fn tokenize(cleaned: &str) -> Vec<&str> {
    cleaned.split(' ').collect()
}

/// Applies a stemmer to each token, preserving order and length
pub struct StemPipeline<'a> {
    stemmer: &'a dyn Stemmer,
}

impl<'a> StemPipeline<'a> {
    pub fn new(stemmer: &'a dyn Stemmer) -> Self {
        Self { stemmer }
    }

    /// Stem every token in order
    pub fn stem_tokens<'t, I>(&self, tokens: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'t str>,
    {
        tokens
            .into_iter()
            .map(|token| self.stemmer.stem(token))
            .collect()
    }

    /// Tokenize, stem, and drop empty terms
    pub fn terms(&self, cleaned: &str) -> Vec<String> {
        self.stem_tokens(tokenize(cleaned))
            .into_iter()
            .filter(|term| !term.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::stemmer::{IdentityStemmer, PorterStemmer};

    #[test]
    fn test_tokenize_keeps_empty_tokens() {
        assert_eq!(tokenize("Data  data "), vec!["Data", "", "data", ""]);
        assert_eq!(tokenize(""), vec![""]);
        assert_eq!(tokenize("one"), vec!["one"]);
    }

    #[test]
    fn test_tokenize_only_splits_on_space() {
        assert_eq!(tokenize("a\tb c"), vec!["a\tb", "c"]);
    }

    #[test]
    fn test_stem_tokens_preserves_length() {
        let stemmer = PorterStemmer::new();
        let pipeline = StemPipeline::new(&stemmer);
        let stemmed = pipeline.stem_tokens(vec!["Data", "", "data", ""]);
        assert_eq!(stemmed, vec!["data", "", "data", ""]);
    }

    #[test]
    fn test_terms_filters_empty() {
        let stemmer = IdentityStemmer;
        let pipeline = StemPipeline::new(&stemmer);
        assert_eq!(pipeline.terms("  a  b "), vec!["a", "b"]);
        assert!(pipeline.terms("    ").is_empty());
    }
}
