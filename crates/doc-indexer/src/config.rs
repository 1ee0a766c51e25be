//! Configuration for the indexer

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};

/// Main indexer configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexerConfig {
    /// Per-document ingestion settings
    #[serde(default)]
    pub ingest: IngestConfig,
    /// Batch processing settings
    #[serde(default)]
    pub processing: ProcessingConfig,
}

impl IndexerConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("cannot read '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| Error::config(e.to_string()))
    }
}

/// Ingestion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Upper bound on PDF loading and page extraction (default: 60s, 0 = unbounded)
    #[serde(default = "default_pdf_timeout")]
    pub pdf_timeout_secs: u64,
    /// Characters replaced by spaces in addition to the built-in strip set
    #[serde(default)]
    pub extra_strip_chars: String,
}

fn default_pdf_timeout() -> u64 { 60 }

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            pdf_timeout_secs: default_pdf_timeout(),
            extra_strip_chars: String::new(),
        }
    }
}

impl IngestConfig {
    /// PDF timeout as a Duration
    pub fn pdf_timeout(&self) -> Duration {
        Duration::from_secs(self.pdf_timeout_secs)
    }
}

/// Processing configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Number of documents ingested in parallel (default: CPU count)
    #[serde(default)]
    pub parallel_files: Option<usize>,
}

impl ProcessingConfig {
    /// Resolved worker count, never zero
    pub fn worker_count(&self) -> usize {
        self.parallel_files
            .unwrap_or_else(num_cpus::get)
            .max(1)
    }
}
