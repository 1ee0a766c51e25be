//! Insertion-ordered term frequency table

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Stemmed term to frequency, iterated in first-occurrence order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TermTable {
    terms: IndexMap<String, usize>,
}

impl TermTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `term`. New terms are appended at the end,
    /// known terms keep their position.
    pub fn record(&mut self, term: impl Into<String>) {
        *self.terms.entry(term.into()).or_insert(0) += 1;
    }

    /// Frequency of a term
    pub fn get(&self, term: &str) -> Option<usize> {
        self.terms.get(term).copied()
    }

    /// Number of distinct terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Sum of all frequencies, equal to the number of aggregated tokens
    pub fn total_frequency(&self) -> usize {
        self.terms.values().sum()
    }

    /// Iterate (term, frequency) pairs in first-occurrence order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.terms.iter().map(|(term, freq)| (term.as_str(), *freq))
    }

    /// Terms in first-occurrence order
    pub fn terms(&self) -> impl Iterator<Item = &str> + '_ {
        self.terms.keys().map(String::as_str)
    }

    /// Owned (term, frequency) pairs
    pub fn to_vec(&self) -> Vec<(String, usize)> {
        self.terms
            .iter()
            .map(|(term, freq)| (term.clone(), *freq))
            .collect()
    }
}

impl<S: Into<String>> FromIterator<S> for TermTable {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut table = TermTable::new();
        for term in iter {
            table.record(term);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_first_occurrence_order() {
        let mut table = TermTable::new();
        for term in ["b", "a", "b", "c", "a", "b"] {
            table.record(term);
        }
        assert_eq!(
            table.to_vec(),
            vec![
                ("b".to_string(), 3),
                ("a".to_string(), 2),
                ("c".to_string(), 1),
            ]
        );
        assert_eq!(table.terms().collect::<Vec<_>>(), vec!["b", "a", "c"]);
        assert_eq!(table.total_frequency(), 6);
    }

    #[test]
    fn test_serializes_as_ordered_object() {
        let table: TermTable = ["zebra", "apple", "zebra"].into_iter().collect();
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"zebra":2,"apple":1}"#);

        let back: TermTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn test_empty_table() {
        let table = TermTable::new();
        assert!(table.is_empty());
        assert_eq!(table.get("anything"), None);
        assert_eq!(table.total_frequency(), 0);
    }
}
