//! Core types for document indexing

pub mod document;
pub mod file_type;
pub mod term_table;

pub use document::{Document, IngestOutcome, IngestState};
pub use file_type::FileType;
pub use term_table::TermTable;
