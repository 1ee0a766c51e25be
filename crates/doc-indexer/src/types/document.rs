//! Document entity and its ingestion state machine

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, FailureKind, Result};
use crate::ingestion::{IngestPipeline, RawTextSource};

use super::term_table::TermTable;

/// Ingestion state of a document
#[derive(Debug, Clone, PartialEq)]
pub enum IngestState {
    /// `ingest` has not been called
    NotIngested,
    /// Terms were extracted
    Ingested(TermTable),
    /// Ingestion failed; no terms are exposed
    Failed { kind: FailureKind, message: String },
}

/// A single source file and the term table extracted from it.
///
/// A document is ingested at most once. After `ingest` returns, the
/// document no longer changes.
#[derive(Debug, Clone)]
pub struct Document {
    source_path: PathBuf,
    /// Explicit source, overriding extension detection
    source: Option<RawTextSource>,
    raw_text: String,
    state: IngestState,
}

/// Result of ingesting one document, as reported to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestOutcome {
    /// Path of the ingested file
    pub path: PathBuf,
    /// Whether a non-empty term table was produced
    pub success: bool,
    /// Number of distinct terms, absent unless successful
    pub term_count: Option<usize>,
    /// Ordered term table, empty unless successful
    pub terms: TermTable,
    /// Failure classification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
    /// Failure message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Document {
    /// Create an empty document for `path`. The source is chosen from the
    /// extension when ingesting.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: path.into(),
            source: None,
            raw_text: String::new(),
            state: IngestState::NotIngested,
        }
    }

    /// Create an empty document read with an explicit source
    pub fn with_source(path: impl Into<PathBuf>, source: RawTextSource) -> Self {
        Self {
            source: Some(source),
            ..Self::new(path)
        }
    }

    /// Extract, normalize, stem and aggregate the file's terms.
    ///
    /// Returns the number of distinct terms. On error the document moves to
    /// the failed state and exposes no terms. Calling this a second time
    /// returns `Error::AlreadyIngested` and leaves the document unchanged.
    pub fn ingest(&mut self, pipeline: &IngestPipeline) -> Result<usize> {
        if !matches!(self.state, IngestState::NotIngested) {
            return Err(Error::AlreadyIngested(self.source_path.clone()));
        }

        tracing::info!("Ingesting {}", self.source_path.display());

        match self.build_terms(pipeline) {
            Ok(terms) => {
                let count = terms.len();
                tracing::info!(
                    "Parsed {}: {} distinct terms, {} tokens",
                    self.source_path.display(),
                    count,
                    terms.total_frequency()
                );
                self.state = IngestState::Ingested(terms);
                Ok(count)
            }
            Err(err) => {
                tracing::warn!("Failed to ingest {}: {}", self.source_path.display(), err);
                self.state = IngestState::Failed {
                    kind: err.kind().unwrap_or(FailureKind::Format),
                    message: err.to_string(),
                };
                Err(err)
            }
        }
    }

    fn build_terms(&mut self, pipeline: &IngestPipeline) -> Result<TermTable> {
        let source = match self.source {
            Some(source) => source,
            None => RawTextSource::for_path(&self.source_path)?,
        };

        let raw_text = pipeline.extract(source, &self.source_path)?;
        tracing::debug!(
            "Read {} bytes of {} text from {}",
            raw_text.len(),
            source,
            self.source_path.display()
        );

        let terms = pipeline.analyze(&raw_text);
        self.raw_text = raw_text;

        if terms.is_empty() {
            return Err(Error::EmptyContent(self.source_path.clone()));
        }
        Ok(terms)
    }

    /// Path of the source file
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Unnormalized extracted text. Empty before ingestion and after a read
    /// or parse failure.
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn state(&self) -> &IngestState {
        &self.state
    }

    /// Whether `ingest` has been called
    pub fn is_ingested(&self) -> bool {
        !matches!(self.state, IngestState::NotIngested)
    }

    /// Whether ingestion produced a term table
    pub fn succeeded(&self) -> bool {
        matches!(self.state, IngestState::Ingested(_))
    }

    /// Term table, present only after successful ingestion
    pub fn terms(&self) -> Option<&TermTable> {
        match &self.state {
            IngestState::Ingested(terms) => Some(terms),
            _ => None,
        }
    }

    /// Number of distinct terms, present only after successful ingestion
    pub fn term_count(&self) -> Option<usize> {
        self.terms().map(TermTable::len)
    }

    /// Failure classification, if ingestion failed
    pub fn failure(&self) -> Option<FailureKind> {
        match &self.state {
            IngestState::Failed { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Summary for callers: success flag, ordered terms, and count
    pub fn outcome(&self) -> IngestOutcome {
        let error = match &self.state {
            IngestState::Failed { message, .. } => Some(message.clone()),
            IngestState::NotIngested => Some("not ingested".to_string()),
            IngestState::Ingested(_) => None,
        };

        IngestOutcome {
            path: self.source_path.clone(),
            success: self.succeeded(),
            term_count: self.term_count(),
            terms: self.terms().cloned().unwrap_or_default(),
            failure: self.failure(),
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn ingest(path: &Path) -> (Document, Result<usize>) {
        let pipeline = IngestPipeline::default();
        let mut document = Document::new(path);
        let result = document.ingest(&pipeline);
        (document, result)
    }

    #[test]
    fn test_new_document_is_empty() {
        let document = Document::new("notes.txt");
        assert!(!document.is_ingested());
        assert!(document.terms().is_none());
        assert_eq!(document.term_count(), None);
        assert_eq!(document.raw_text(), "");
        assert!(!document.outcome().success);
    }

    #[test]
    fn test_plain_text_stems() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "words.txt", "running runs runner");
        let (document, result) = ingest(&path);

        let count = result.unwrap();
        let terms = document.terms().unwrap();
        assert_eq!(count, terms.len());
        assert_eq!(terms.total_frequency(), 3);
        assert!(terms.get("run").unwrap() >= 2);
        assert_eq!(document.raw_text(), "running runs runner");
    }

    #[test]
    fn test_json_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "pets.json", r#"{"a": "cat dog", "b": {"c": "cat"}}"#);
        let (document, _) = ingest(&path);

        let terms = document.terms().unwrap();
        assert_eq!(
            terms.to_vec(),
            vec![("cat".to_string(), 2), ("dog".to_string(), 1)]
        );
        assert_eq!(document.term_count(), Some(2));
    }

    #[test]
    fn test_xml_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "greet.xml", "<root><x>hello world</x><y>hello</y></root>");
        let (document, _) = ingest(&path);

        assert_eq!(
            document.terms().unwrap().to_vec(),
            vec![("hello".to_string(), 2), ("world".to_string(), 1)]
        );
    }

    #[test]
    fn test_html_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "page.html", "<html><body><p>Data, data!</p></body></html>");
        let (document, _) = ingest(&path);

        assert_eq!(document.terms().unwrap().to_vec(), vec![("data".to_string(), 2)]);
    }

    #[test]
    fn test_csv_keeps_delimiters_as_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "table.csv", "city,count\nParis,3\n");
        let pipeline = IngestPipeline::with_stemmer(
            &crate::IndexerConfig::default(),
            std::sync::Arc::new(crate::ingestion::IdentityStemmer),
        );
        let mut document = Document::new(&path);
        document.ingest(&pipeline).unwrap();

        // Commas and newlines split, column structure is not interpreted
        assert_eq!(
            document.terms().unwrap().terms().collect::<Vec<_>>(),
            vec!["city", "count", "Paris", "3"]
        );
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let (document, result) = ingest(&dir.path().join("absent.txt"));

        assert!(matches!(result, Err(Error::NotFound(_))));
        assert!(document.is_ingested());
        assert!(!document.succeeded());
        assert!(document.terms().is_none());
        assert_eq!(document.term_count(), None);
        assert_eq!(document.failure(), Some(FailureKind::NotFound));
        assert_eq!(document.raw_text(), "");
    }

    #[test]
    fn test_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "broken.json", r#"{"a": [1, 2"#);
        let (document, result) = ingest(&path);

        assert!(matches!(result, Err(Error::FileParse { .. })));
        assert_eq!(document.failure(), Some(FailureKind::Format));
        assert_eq!(document.raw_text(), "");
    }

    #[test]
    fn test_empty_and_punctuation_only_fail() {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in [("empty.txt", ""), ("punct.txt", "!!! ,,, ...\r\n()[]{}")] {
            let path = write(&dir, name, content);
            let (document, result) = ingest(&path);

            assert!(matches!(result, Err(Error::EmptyContent(_))), "{}", name);
            assert_eq!(document.failure(), Some(FailureKind::EmptyContent));
            assert!(document.terms().is_none());
            assert_eq!(document.raw_text(), content);
        }
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "slides.pptx", "not really");
        let (document, result) = ingest(&path);

        assert!(matches!(result, Err(Error::UnsupportedFileType(_))));
        assert_eq!(document.failure(), Some(FailureKind::Unsupported));
    }

    #[test]
    fn test_explicit_source_overrides_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "data.log", "{\"msg\": \"disk full\"}");
        let pipeline = IngestPipeline::default();
        let mut document = Document::with_source(&path, RawTextSource::Json);

        assert_eq!(document.ingest(&pipeline).unwrap(), 2);
        assert_eq!(document.terms().unwrap().get("disk"), Some(1));
    }

    #[test]
    fn test_ingest_only_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "once.txt", "alpha beta");
        let pipeline = IngestPipeline::default();
        let mut document = Document::new(&path);

        document.ingest(&pipeline).unwrap();
        let before = document.terms().cloned();

        std::fs::write(&path, "gamma").unwrap();
        let second = document.ingest(&pipeline);
        assert!(matches!(second, Err(Error::AlreadyIngested(_))));
        assert_eq!(document.terms().cloned(), before);
    }

    #[test]
    fn test_deterministic_across_documents() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "story.txt",
            "The cat sat. The cats sat again; a dog (barking) chased the cat!",
        );
        let (first, _) = ingest(&path);
        let (second, _) = ingest(&path);

        assert_eq!(first.terms().unwrap().to_vec(), second.terms().unwrap().to_vec());
    }

    #[test]
    fn test_conservation_and_uniqueness() {
        let dir = tempfile::tempdir().unwrap();
        let text = "one two  two three three three\tfour";
        let path = write(&dir, "count.txt", text);
        let pipeline = IngestPipeline::with_stemmer(
            &crate::IndexerConfig::default(),
            std::sync::Arc::new(crate::ingestion::IdentityStemmer),
        );
        let mut document = Document::new(&path);
        document.ingest(&pipeline).unwrap();

        let terms = document.terms().unwrap();
        let token_count = text.split(' ').filter(|t| !t.is_empty()).count();
        assert_eq!(terms.total_frequency(), token_count);

        let mut names: Vec<_> = terms.terms().collect();
        let before = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), before);
        assert_eq!(terms.get("three\tfour"), Some(1));
    }

    #[test]
    fn test_outcome_json_contract() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "pets.json", r#"{"a": "cat dog", "b": {"c": "cat"}}"#);
        let (document, _) = ingest(&path);

        let outcome = serde_json::to_value(document.outcome()).unwrap();
        assert_eq!(outcome["success"], true);
        assert_eq!(outcome["term_count"], 2);
        assert_eq!(outcome["terms"]["cat"], 2);
        assert!(outcome.get("error").is_none());

        let (missing, _) = ingest(&dir.path().join("gone.json"));
        let outcome = serde_json::to_value(missing.outcome()).unwrap();
        assert_eq!(outcome["success"], false);
        assert!(outcome["term_count"].is_null());
        assert_eq!(outcome["failure"], "not_found");
        assert_eq!(outcome["terms"], serde_json::json!({}));
    }
}
