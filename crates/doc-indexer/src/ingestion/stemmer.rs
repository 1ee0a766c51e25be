//! Stemmer seam and implementations

use rust_stemmers::Algorithm;

/// Trait for stemming algorithms.
///
/// Implementations must be total: every input, including the empty string,
/// yields some output.
pub trait Stemmer: Send + Sync {
    /// Stem a word to its root form.
    fn stem(&self, word: &str) -> String;

    /// Get the name of this stemmer.
    fn name(&self) -> &'static str;
}

/// English Porter2 (Snowball) stemmer. Lowercases before stemming.
pub struct PorterStemmer {
    inner: rust_stemmers::Stemmer,
}

impl PorterStemmer {
    pub fn new() -> Self {
        Self {
            inner: rust_stemmers::Stemmer::create(Algorithm::English),
        }
    }
}

impl Default for PorterStemmer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PorterStemmer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PorterStemmer").finish()
    }
}

impl Stemmer for PorterStemmer {
    fn stem(&self, word: &str) -> String {
        let lowered = word.to_lowercase();
        self.inner.stem(&lowered).into_owned()
    }

    fn name(&self) -> &'static str {
        "porter"
    }
}

/// Returns words unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityStemmer;

impl Stemmer for IdentityStemmer {
    fn stem(&self, word: &str) -> String {
        word.to_string()
    }

    fn name(&self) -> &'static str {
        "identity"
    }
}
