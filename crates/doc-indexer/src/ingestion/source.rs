//! Per-format raw text extraction

use quick_xml::events::Event;
use serde_json::Value;
use std::collections::HashMap;
use std::panic;
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::config::IngestConfig;
use crate::error::{Error, Result};
use crate::types::FileType;

/// Source format of a document, one variant per supported file type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawTextSource {
    /// File contents as-is
    PlainText,
    /// Page texts in page order, joined by a space
    Pdf,
    /// Inner text of the parsed document
    Html,
    /// Inner text of each immediate child of the root, joined by spaces
    Xml,
    /// Leaf values in document order, joined by spaces
    Json,
    /// File contents as-is, no column parsing
    Csv,
}

impl RawTextSource {
    /// Source for a detected file type
    pub fn for_file_type(file_type: FileType) -> Option<Self> {
        match file_type {
            FileType::Txt => Some(Self::PlainText),
            FileType::Pdf => Some(Self::Pdf),
            FileType::Html => Some(Self::Html),
            FileType::Xml => Some(Self::Xml),
            FileType::Json => Some(Self::Json),
            FileType::Csv => Some(Self::Csv),
            FileType::Unknown => None,
        }
    }

    /// Select the source from a path's extension
    pub fn for_path(path: &Path) -> Result<Self> {
        Self::for_file_type(FileType::from_path(path)).ok_or_else(|| {
            let extension = path
                .extension()
                .map(|ext| ext.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            Error::UnsupportedFileType(format!(
                "'{}' ({})",
                path.display(),
                if extension.is_empty() { "no extension" } else { extension.as_str() }
            ))
        })
    }

    /// File type handled by this source
    pub fn file_type(&self) -> FileType {
        match self {
            Self::PlainText => FileType::Txt,
            Self::Pdf => FileType::Pdf,
            Self::Html => FileType::Html,
            Self::Xml => FileType::Xml,
            Self::Json => FileType::Json,
            Self::Csv => FileType::Csv,
        }
    }

    /// Read `path` and extract its raw text
    pub fn extract_raw_text(&self, path: &Path, config: &IngestConfig) -> Result<String> {
        let data = std::fs::read(path).map_err(|e| Error::read(path, e))?;
        self.extract_from_bytes(&path.display().to_string(), data, config)
    }

    /// Extract raw text from file contents already in memory
    pub fn extract_from_bytes(
        &self,
        filename: &str,
        data: Vec<u8>,
        config: &IngestConfig,
    ) -> Result<String> {
        match self {
            Self::PlainText | Self::Csv => Ok(decode_text(&data)),
            Self::Pdf => extract_pdf_with_timeout(filename, data, config.pdf_timeout()),
            Self::Html => Ok(extract_html(&data)),
            Self::Xml => extract_xml(filename, &data),
            Self::Json => extract_json(filename, &data),
        }
    }
}

impl std::fmt::Display for RawTextSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file_type().display_name())
    }
}

/// Decode bytes as UTF-8, replacing invalid sequences and dropping a BOM
fn decode_text(data: &[u8]) -> String {
    let text = String::from_utf8_lossy(data);
    match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text.into_owned(),
    }
}

/// Run PDF extraction on a helper thread, waiting at most `limit`.
/// A zero limit runs inline without a bound. A panic inside lopdf is
/// reported as a parse failure on both paths.
fn extract_pdf_with_timeout(filename: &str, data: Vec<u8>, limit: Duration) -> Result<String> {
    if limit.is_zero() {
        return catch_extraction_panic(filename, || extract_pdf(filename, &data));
    }

    let (tx, rx) = mpsc::channel();
    let name = filename.to_string();
    let handle = thread::spawn(move || {
        let result = extract_pdf(&name, &data);
        let _ = tx.send(result);
    });

    match rx.recv_timeout(limit) {
        Ok(result) => {
            let _ = handle.join();
            result
        }
        Err(mpsc::RecvTimeoutError::Timeout) => {
            // The thread cannot be killed; it owns its data and exits on its own
            tracing::error!(
                "PDF extraction timeout after {}s for {}",
                limit.as_secs(),
                filename
            );
            Err(Error::Timeout {
                filename: filename.to_string(),
                secs: limit.as_secs(),
            })
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            tracing::error!("PDF extraction thread crashed for {}", filename);
            Err(Error::file_parse(filename, "PDF extraction thread panicked"))
        }
    }
}

/// Turn a panic inside `extract` into a parse failure for `filename`
fn catch_extraction_panic<F>(filename: &str, extract: F) -> Result<String>
where
    F: FnOnce() -> Result<String> + panic::UnwindSafe,
{
    panic::catch_unwind(extract).unwrap_or_else(|_| {
        tracing::error!("PDF extraction panicked for {}", filename);
        Err(Error::file_parse(filename, "PDF extraction panicked"))
    })
}

/// Load a PDF and concatenate page texts in page order
fn extract_pdf(filename: &str, data: &[u8]) -> Result<String> {
    let doc = lopdf::Document::load_mem(data)
        .map_err(|e| Error::file_parse(filename, format!("Failed to load PDF: {}", e)))?;

    let pages = doc.get_pages();
    let mut texts = Vec::with_capacity(pages.len());

    // get_pages is keyed by page number, so iteration is in page order
    for page_number in pages.keys() {
        let text = doc.extract_text(&[*page_number]).map_err(|e| {
            Error::file_parse(filename, format!("Failed to extract page {}: {}", page_number, e))
        })?;
        texts.push(text);
    }

    tracing::debug!("Extracted {} pages from {}", texts.len(), filename);
    Ok(texts.join(" "))
}

/// Inner text of the whole HTML document
fn extract_html(data: &[u8]) -> String {
    let html = decode_text(data);
    let document = scraper::Html::parse_document(&html);
    document.root_element().text().collect()
}

/// Inner text of each immediate child of the XML root element.
///
/// An element child contributes all of its descendant text concatenated. A
/// text or CDATA child of the root contributes itself, trimmed. Children
/// without text contribute nothing. General entities declared in the
/// internal DTD subset are expanded.
fn extract_xml(filename: &str, data: &[u8]) -> Result<String> {
    let xml = std::str::from_utf8(data)
        .map_err(|e| Error::file_parse(filename, format!("XML is not valid UTF-8: {}", e)))?;
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);

    let mut reader = quick_xml::Reader::from_str(xml);
    let mut depth = 0usize;
    let mut seen_root = false;
    let mut pieces: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut entities: HashMap<String, String> = HashMap::new();

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                return Err(Error::file_parse(
                    filename,
                    format!("error at position {}: {}", reader.buffer_position(), e),
                ))
            }
        };

        match event {
            Event::Start(_) => {
                if depth == 0 {
                    if seen_root {
                        return Err(Error::file_parse(filename, "multiple root elements"));
                    }
                    seen_root = true;
                } else if depth == 1 {
                    current.clear();
                }
                depth += 1;
            }
            Event::Empty(_) => {
                if depth == 0 {
                    if seen_root {
                        return Err(Error::file_parse(filename, "multiple root elements"));
                    }
                    seen_root = true;
                }
            }
            Event::End(_) => {
                if depth == 0 {
                    return Err(Error::file_parse(filename, "unmatched closing tag"));
                }
                depth -= 1;
                if depth == 1 && !current.is_empty() {
                    pieces.push(std::mem::take(&mut current));
                }
            }
            Event::DocType(e) => {
                entities.extend(parse_entity_declarations(&String::from_utf8_lossy(&e)));
            }
            Event::Text(e) => {
                let text = e
                    .unescape_with(|name| entities.get(name).map(String::as_str))
                    .map_err(|err| Error::file_parse(filename, err.to_string()))?;
                push_xml_text(filename, depth, &text, &mut pieces, &mut current)?;
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(&e).into_owned();
                push_xml_text(filename, depth, &text, &mut pieces, &mut current)?;
            }
            Event::Eof => break,
            // Declarations, comments and processing instructions carry no text
            _ => {}
        }
    }

    if depth != 0 {
        return Err(Error::file_parse(filename, "unexpected end of document, unclosed element"));
    }
    if !seen_root {
        return Err(Error::file_parse(filename, "no root element"));
    }

    Ok(pieces.join(" "))
}

/// Internal general entities (`<!ENTITY name "value">`) of a DOCTYPE body.
/// Parameter and external entities are skipped. The first declaration of a
/// name wins.
fn parse_entity_declarations(doctype: &str) -> HashMap<String, String> {
    let mut entities = HashMap::new();
    let mut rest = doctype;

    while let Some(start) = rest.find("<!ENTITY") {
        rest = rest[start + "<!ENTITY".len()..].trim_start();
        if rest.starts_with('%') {
            continue;
        }

        let name_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let name = &rest[..name_end];
        rest = rest[name_end..].trim_start();

        let Some(quote) = rest.chars().next().filter(|c| *c == '"' || *c == '\'') else {
            continue;
        };
        let Some(value_end) = rest[1..].find(quote) else {
            break;
        };
        if !name.is_empty() {
            entities
                .entry(name.to_string())
                .or_insert_with(|| rest[1..1 + value_end].to_string());
        }
        rest = &rest[1 + value_end + 1..];
    }

    entities
}

fn push_xml_text(
    filename: &str,
    depth: usize,
    text: &str,
    pieces: &mut Vec<String>,
    current: &mut String,
) -> Result<()> {
    match depth {
        0 => {
            if !text.trim().is_empty() {
                return Err(Error::file_parse(filename, "text outside the root element"));
            }
        }
        1 => {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                pieces.push(trimmed.to_string());
            }
        }
        _ => current.push_str(text),
    }
    Ok(())
}

/// Leaf values of a JSON document joined by spaces
fn extract_json(filename: &str, data: &[u8]) -> Result<String> {
    let value: Value = serde_json::from_slice(data)
        .map_err(|e| Error::file_parse(filename, e.to_string()))?;

    let mut values = Vec::new();
    collect_json_values(&value, &mut values);
    Ok(values.join(" "))
}

/// Depth-first walk in document order. Arrays keep only their string
/// elements; scalars are rendered as text, null as an empty string.
fn collect_json_values(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for nested in map.values() {
                collect_json_values(nested, out);
            }
        }
        Value::Array(items) => {
            out.extend(items.iter().filter_map(|item| item.as_str().map(str::to_string)));
        }
        Value::String(s) => out.push(s.clone()),
        // Number text is kept as written, so out-of-range values still parse
        Value::Number(n) => out.push(n.to_string()),
        Value::Bool(b) => out.push(b.to_string()),
        Value::Null => out.push(String::new()),
    }
}
