//! Document ingestion pipeline with multi-format extraction

mod aggregator;
mod normalizer;
mod processor;
mod source;
mod stemmer;
mod tokenizer;

pub use aggregator::TermFrequencyAggregator;
pub use normalizer::{TextNormalizer, STRIP_CHARS};
pub use processor::IngestPipeline;
pub use source::RawTextSource;
pub use stemmer::{IdentityStemmer, PorterStemmer, Stemmer};
pub use tokenizer::{tokenize, StemPipeline};
