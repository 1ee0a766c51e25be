//! Ingestion pipeline orchestration

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{IndexerConfig, IngestConfig};
use crate::error::Result;
use crate::types::{Document, TermTable};

use super::aggregator::TermFrequencyAggregator;
use super::normalizer::TextNormalizer;
use super::source::RawTextSource;
use super::stemmer::{PorterStemmer, Stemmer};
use super::tokenizer::StemPipeline;

/// Main ingestion pipeline. Stateless per document, so one instance can be
/// shared by many workers.
pub struct IngestPipeline {
    /// Source settings
    config: IngestConfig,
    /// Punctuation stripping
    normalizer: TextNormalizer,
    /// Word stemmer
    stemmer: Arc<dyn Stemmer>,
    /// Documents ingested in parallel by `ingest_all`
    workers: usize,
}

impl IngestPipeline {
    /// Create a pipeline with the Porter stemmer
    pub fn new(config: &IndexerConfig) -> Self {
        Self::with_stemmer(config, Arc::new(PorterStemmer::new()))
    }

    /// Create a pipeline with a custom stemmer
    pub fn with_stemmer(config: &IndexerConfig, stemmer: Arc<dyn Stemmer>) -> Self {
        Self {
            normalizer: TextNormalizer::with_extra_chars(&config.ingest.extra_strip_chars),
            config: config.ingest.clone(),
            stemmer,
            workers: config.processing.worker_count(),
        }
    }

    /// The stemmer in use
    pub fn stemmer(&self) -> &dyn Stemmer {
        self.stemmer.as_ref()
    }

    /// Extract raw text from a file with the given source
    pub fn extract(&self, source: RawTextSource, path: &Path) -> Result<String> {
        source.extract_raw_text(path, &self.config)
    }

    /// Normalize, tokenize, stem and aggregate raw text
    pub fn analyze(&self, raw_text: &str) -> TermTable {
        let cleaned = self.normalizer.normalize(raw_text);
        let terms = StemPipeline::new(self.stemmer.as_ref()).terms(&cleaned);
        tracing::debug!("Aggregating {} stemmed tokens", terms.len());
        TermFrequencyAggregator::aggregate(terms)
    }

    /// Ingest one file into a new document. Failures are recorded on the
    /// returned document.
    pub fn ingest(&self, path: impl Into<PathBuf>) -> Document {
        let mut document = Document::new(path);
        let _ = document.ingest(self);
        document
    }

    /// Ingest every path into its own document, in parallel. Output order
    /// matches input order.
    pub fn ingest_all(&self, paths: &[PathBuf]) -> Vec<Document> {
        let pool = match rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
        {
            Ok(pool) => pool,
            Err(e) => {
                tracing::warn!("Could not start worker pool ({}), ingesting sequentially", e);
                return paths.iter().map(|path| self.ingest(path.clone())).collect();
            }
        };

        tracing::info!("Ingesting {} files with {} workers", paths.len(), self.workers);
        pool.install(|| {
            paths
                .par_iter()
                .map(|path| self.ingest(path.clone()))
                .collect()
        })
    }
}

impl Default for IngestPipeline {
    fn default() -> Self {
        Self::new(&IndexerConfig::default())
    }
}
