//! Supported source formats

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Supported file types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// Plain text file
    Txt,
    /// PDF document
    Pdf,
    /// HTML document
    Html,
    /// JSON document
    Json,
    /// XML document
    Xml,
    /// CSV file (read as plain text)
    Csv,
    /// Unknown file type
    Unknown,
}

impl FileType {
    /// Detect file type from extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "txt" | "text" => Self::Txt,
            "pdf" => Self::Pdf,
            "html" | "htm" => Self::Html,
            "json" => Self::Json,
            "xml" => Self::Xml,
            "csv" => Self::Csv,
            _ => Self::Unknown,
        }
    }

    /// Detect file type from a path's extension
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Unknown)
    }

    /// Check if this is a supported file type
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Txt => "Text File",
            Self::Pdf => "PDF",
            Self::Html => "HTML",
            Self::Json => "JSON",
            Self::Xml => "XML",
            Self::Csv => "CSV",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
