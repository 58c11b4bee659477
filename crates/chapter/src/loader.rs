//! Document loader: PDF bytes to normalized text.
//!
//! Only text-based PDFs are supported; scanned PDFs have no text layer and are reported as
//! unreadable.

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, instrument, warn};

use crate::DocumentError;

/// An uploaded document. Owned by the request that received it and dropped after processing.
#[derive(Debug, Clone)]
pub struct Document {
    pub bytes: Vec<u8>,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
}

impl Document {
    pub fn new(bytes: Vec<u8>, file_name: Option<String>, mime_type: Option<String>) -> Self {
        Self {
            bytes,
            file_name,
            mime_type,
        }
    }

    /// True when the mime type mentions pdf or the file name ends with `.pdf`.
    pub fn is_pdf(&self) -> bool {
        self.mime_type
            .as_deref()
            .is_some_and(|m| m.to_ascii_lowercase().contains("pdf"))
            || self
                .file_name
                .as_deref()
                .is_some_and(|n| n.to_ascii_lowercase().ends_with(".pdf"))
    }

    /// File name without its extension, e.g. `ch3_cells.pdf` -> `ch3_cells`.
    pub fn stem(&self) -> Option<&str> {
        let name = self.file_name.as_deref()?;
        let stem = match name.rfind('.') {
            Some(0) | None => name,
            Some(i) => &name[..i],
        };
        if stem.trim().is_empty() {
            None
        } else {
            Some(stem)
        }
    }
}

/// Extracts and normalizes text on the blocking pool.
#[instrument(skip(bytes), fields(bytes = bytes.len()))]
pub async fn extract_text(bytes: Vec<u8>) -> Result<String, DocumentError> {
    tokio::task::spawn_blocking(move || extract_text_blocking(&bytes))
        .await
        .map_err(|e| DocumentError::UnreadableDocument(format!("extraction task failed: {}", e)))?
}

/// Extracts and normalizes text from PDF bytes.
///
/// The extractor can panic on malformed files; panics are reported as unreadable documents.
pub fn extract_text_blocking(bytes: &[u8]) -> Result<String, DocumentError> {
    let raw = panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes)))
        .map_err(|_| {
            warn!("PDF extractor panicked");
            DocumentError::UnreadableDocument("the PDF could not be parsed".to_string())
        })?
        .map_err(|e| DocumentError::UnreadableDocument(format!("PDF parse failed: {}", e)))?;

    let text = normalize_text(&raw);
    debug!(raw_len = raw.len(), text_len = text.len(), "PDF text extracted");

    if text.is_empty() {
        return Err(DocumentError::UnreadableDocument(
            "no text layer found (scanned PDF?)".to_string(),
        ));
    }
    Ok(text)
}

/// Normalizes extracted text: runs of spaces and tabs collapse to one space, lines are
/// trimmed at the end, form feeds (page breaks) become blank lines, and at most one blank line
/// separates paragraphs. Leading and trailing blank lines are removed.
pub fn normalize_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut blank_run = 0usize;

    for line in raw.replace('\u{c}', "\n\n").replace("\r\n", "\n").split('\n') {
        let mut collapsed = String::with_capacity(line.len());
        let mut prev_space = false;
        for ch in line.chars() {
            if ch == ' ' || ch == '\t' || ch == '\r' || ch == '\u{a0}' {
                if !prev_space {
                    collapsed.push(' ');
                }
                prev_space = true;
            } else {
                collapsed.push(ch);
                prev_space = false;
            }
        }
        let collapsed = collapsed.trim_end();

        if collapsed.trim().is_empty() {
            blank_run += 1;
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
            if blank_run > 0 {
                out.push('\n');
            }
        }
        blank_run = 0;
        out.push_str(collapsed);
    }

    out
}
