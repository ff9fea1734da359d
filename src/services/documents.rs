//! Contract Document Loader
//!
//! Extracts the plain text of a contract from `.txt`, `.docx` or `.pdf` files.
//! The pipeline only ever sees the extracted text.

use std::io::Read;
use std::path::Path;

use quick_xml::events::Event;

use crate::utils::error::{AppError, AppResult};

/// Maximum file size for document parsing (50MB)
const MAX_DOC_SIZE: u64 = 50 * 1024 * 1024;

/// Contract file formats the loader understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Text,
    Docx,
    Pdf,
}

impl DocumentKind {
    /// Detect the kind from a file extension (case-insensitive)
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "txt" => Ok(DocumentKind::Text),
            "docx" => Ok(DocumentKind::Docx),
            "pdf" => Ok(DocumentKind::Pdf),
            "" => Err(AppError::unsupported_format(format!(
                "{} has no file extension (expected .txt, .docx or .pdf)",
                path.display()
            ))),
            other => Err(AppError::unsupported_format(format!(
                ".{} (expected .txt, .docx or .pdf)",
                other
            ))),
        }
    }
}

/// Check file size against a limit
fn check_file_size(path: &Path, max_size: u64) -> AppResult<u64> {
    let size = std::fs::metadata(path)?.len();
    if size > max_size {
        return Err(AppError::document(format!(
            "File too large: {:.1} MB (max {:.1} MB)",
            size as f64 / (1024.0 * 1024.0),
            max_size as f64 / (1024.0 * 1024.0)
        )));
    }
    Ok(size)
}

/// Load the full plain text of a contract file.
pub fn load_contract(path: &Path) -> AppResult<String> {
    let kind = DocumentKind::from_path(path)?;
    let size = check_file_size(path, MAX_DOC_SIZE)?;

    let text = match kind {
        DocumentKind::Text => read_text(path)?,
        DocumentKind::Docx => parse_docx(path)?,
        DocumentKind::Pdf => parse_pdf(path)?,
    };

    tracing::info!(
        path = %path.display(),
        kind = ?kind,
        bytes = size,
        chars = text.chars().count(),
        "Contract loaded"
    );
    Ok(text)
}

/// Read a UTF-8 text file.
fn read_text(path: &Path) -> AppResult<String> {
    let bytes = std::fs::read(path)?;
    String::from_utf8(bytes)
        .map_err(|e| AppError::document(format!("{} is not valid UTF-8: {}", path.display(), e)))
}

/// Extract PDF text; pages are joined with newlines.
fn parse_pdf(path: &Path) -> AppResult<String> {
    let text = pdf_extract::extract_text(path)
        .map_err(|e| AppError::document(format!("Failed to extract PDF text: {}", e)))?;

    // pdf-extract separates pages with form feeds
    let pages: Vec<&str> = text.split('\x0c').map(str::trim_end).collect();
    Ok(pages.join("\n"))
}

/// Parse a DOCX file by extracting paragraph text from the XML inside the ZIP archive.
fn parse_docx(path: &Path) -> AppResult<String> {
    let file = std::fs::File::open(path)?;

    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| AppError::document(format!("Failed to read DOCX as ZIP: {}", e)))?;

    let mut doc_xml = String::new();
    {
        let mut doc_entry = archive
            .by_name("word/document.xml")
            .map_err(|_| AppError::document("Invalid DOCX: missing word/document.xml"))?;
        doc_entry
            .read_to_string(&mut doc_xml)
            .map_err(|e| AppError::document(format!("Failed to read document.xml: {}", e)))?;
    }

    docx_paragraphs(&doc_xml).map(|paragraphs| paragraphs.join("\n"))
}

/// Collect the text of every `<w:p>` paragraph, empty ones included.
fn docx_paragraphs(doc_xml: &str) -> AppResult<Vec<String>> {
    let mut reader = quick_xml::Reader::from_str(doc_xml);
    let mut paragraphs = Vec::new();
    let mut paragraph_text = String::new();
    let mut in_paragraph = false;
    let mut in_text_element = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"p" => {
                    in_paragraph = true;
                    paragraph_text.clear();
                }
                b"t" => in_text_element = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"p" => paragraphs.push(String::new()),
                b"tab" if in_paragraph => paragraph_text.push('\t'),
                b"br" if in_paragraph => paragraph_text.push('\n'),
                _ => {}
            },
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"p" => {
                    if in_paragraph {
                        paragraphs.push(std::mem::take(&mut paragraph_text));
                    }
                    in_paragraph = false;
                }
                b"t" => in_text_element = false,
                _ => {}
            },
            Ok(Event::Text(ref e)) => {
                if in_text_element {
                    let text = e
                        .unescape()
                        .map_err(|e| AppError::document(format!("XML parse error: {}", e)))?;
                    paragraph_text.push_str(&text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(AppError::document(format!("XML parse error: {}", e))),
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs)
}
