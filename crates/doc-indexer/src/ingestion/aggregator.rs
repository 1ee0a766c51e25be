//! Term frequency aggregation

use crate::types::TermTable;

/// Folds a stemmed token stream into a first-occurrence ordered table
#[derive(Debug, Clone, Copy, Default)]
pub struct TermFrequencyAggregator;

impl TermFrequencyAggregator {
    /// Aggregate tokens in a single pass.
    ///
    /// Each distinct token appears once, positioned where it first occurred,
    /// and the frequencies sum to the number of tokens consumed.
    pub fn aggregate<I, S>(tokens: I) -> TermTable
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        tokens.into_iter().collect()
    }
}
