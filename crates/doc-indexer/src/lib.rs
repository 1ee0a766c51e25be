//! doc-indexer: multi-format document ingestion into term-frequency tables
//!
//! A document of any supported format (plain text, PDF, HTML, XML, JSON, CSV)
//! is reduced to raw text, stripped of punctuation, split into words, stemmed,
//! and counted into a table ordered by first occurrence.

pub mod config;
pub mod error;
pub mod ingestion;
pub mod types;

pub use config::IndexerConfig;
pub use error::{Error, FailureKind, Result};
pub use ingestion::{IdentityStemmer, IngestPipeline, PorterStemmer, RawTextSource, Stemmer};
pub use types::{Document, FileType, IngestOutcome, IngestState, TermTable};
