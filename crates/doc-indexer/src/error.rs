//! Error types for document ingestion

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for ingestion operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ingestion errors
#[derive(Debug, Error)]
pub enum Error {
    /// File does not exist
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// File exists but could not be read
    #[error("IO error reading '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Format collaborator rejected the file structure
    #[error("Failed to parse file '{filename}': {message}")]
    FileParse { filename: String, message: String },

    /// Format collaborator did not finish in time
    #[error("Parsing '{filename}' timed out after {secs}s")]
    Timeout { filename: String, secs: u64 },

    /// Extraction succeeded but produced no terms
    #[error("No terms could be extracted from '{}'", .0.display())]
    EmptyContent(PathBuf),

    /// Unsupported file type
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// Document was already ingested once
    #[error("Document '{}' has already been ingested", .0.display())]
    AlreadyIngested(PathBuf),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse failure classification reported for a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Read error: file missing
    NotFound,
    /// Read error: file could not be opened or streamed
    IoFailure,
    /// Format error: content could not be parsed
    Format,
    /// Parser exceeded its time bound
    Timeout,
    /// Zero terms after normalization
    EmptyContent,
    /// No source handles this file type
    Unsupported,
}

impl Error {
    /// Create a file parse error
    pub fn file_parse(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FileParse {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Map an IO error for `path` onto the read error variants
    pub fn read(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(path.to_path_buf())
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Failure classification, or `None` for errors that are not per-document
    /// ingestion outcomes
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            Error::NotFound(_) => Some(FailureKind::NotFound),
            Error::Io { .. } => Some(FailureKind::IoFailure),
            Error::FileParse { .. } => Some(FailureKind::Format),
            Error::Timeout { .. } => Some(FailureKind::Timeout),
            Error::EmptyContent(_) => Some(FailureKind::EmptyContent),
            Error::UnsupportedFileType(_) => Some(FailureKind::Unsupported),
            Error::AlreadyIngested(_) | Error::Config(_) => None,
        }
    }

    /// True for the read error family (not-found or IO failure)
    pub fn is_read_error(&self) -> bool {
        matches!(self, Error::NotFound(_) | Error::Io { .. })
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::NotFound => write!(f, "not_found"),
            FailureKind::IoFailure => write!(f, "io_failure"),
            FailureKind::Format => write!(f, "format"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::EmptyContent => write!(f, "empty_content"),
            FailureKind::Unsupported => write!(f, "unsupported"),
        }
    }
}
