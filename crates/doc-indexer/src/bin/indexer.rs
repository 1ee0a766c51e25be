//! Term table extraction CLI
//!
//! Run with: cargo run -p doc-indexer -- <PATHS>...

use anyhow::Context;
use clap::{Parser, ValueEnum};
use doc_indexer::{
    Document, FileType, IdentityStemmer, IndexerConfig, IngestPipeline, IngestState, PorterStemmer,
    Stemmer,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use walkdir::WalkDir;

/// Extract ordered, stemmed term-frequency tables from documents
#[derive(Parser)]
#[command(name = "doc-indexer")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Files or directories to ingest (directories are walked recursively)
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stemming algorithm
    #[arg(long, value_enum, default_value_t = StemmerChoice::Porter)]
    stemmer: StemmerChoice,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Print at most this many terms per document (text output only)
    #[arg(long)]
    top: Option<usize>,
}

#[derive(Clone, Copy, ValueEnum)]
enum StemmerChoice {
    Porter,
    Identity,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "doc_indexer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => IndexerConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => IndexerConfig::default(),
    };

    let stemmer: Arc<dyn Stemmer> = match cli.stemmer {
        StemmerChoice::Porter => Arc::new(PorterStemmer::new()),
        StemmerChoice::Identity => Arc::new(IdentityStemmer),
    };
    tracing::info!("Using {} stemmer", stemmer.name());

    let files = collect_files(&cli.paths);
    if files.is_empty() {
        anyhow::bail!("no supported files found");
    }

    let pipeline = IngestPipeline::with_stemmer(&config, stemmer);
    let documents = pipeline.ingest_all(&files);
    let failed = documents.iter().filter(|doc| !doc.succeeded()).count();

    match cli.format {
        OutputFormat::Json => {
            let outcomes: Vec<_> = documents.iter().map(Document::outcome).collect();
            println!("{}", serde_json::to_string_pretty(&outcomes)?);
        }
        OutputFormat::Text => {
            for document in &documents {
                print_text(document, cli.top);
            }
        }
    }

    tracing::info!(
        "Done: {} succeeded, {} failed",
        documents.len() - failed,
        failed
    );

    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Expand directories into their supported files, sorted by path. Files
/// named explicitly are kept whatever their extension.
fn collect_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }

        for entry in WalkDir::new(path).sort_by_file_name() {
            match entry {
                Ok(entry) if entry.file_type().is_file() => {
                    if FileType::from_path(entry.path()).is_supported() {
                        files.push(entry.into_path());
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::warn!("Skipping unreadable entry: {}", e),
            }
        }
    }

    files
}

fn print_text(document: &Document, top: Option<usize>) {
    let path = document.source_path().display();

    match document.state() {
        IngestState::Ingested(terms) => {
            println!("== {} ({} terms)", path, terms.len());
            for (term, frequency) in terms.iter().take(top.unwrap_or(usize::MAX)) {
                println!("  {:<24} {}", term, frequency);
            }
        }
        IngestState::Failed { kind, message } => {
            println!("== {} FAILED [{}]: {}", path, kind, message);
        }
        IngestState::NotIngested => {
            println!("== {} not ingested", path);
        }
    }
}
