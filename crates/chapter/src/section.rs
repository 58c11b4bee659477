use std::ops::Range;

/// Contiguous span of the extracted text treated as one unit for Q&A generation.
///
/// `text` is exactly `source[span]`; spans of one document are ordered and non-overlapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Position in the document, starting at 0.
    pub index: usize,
    pub title: Option<String>,
    pub text: String,
    /// Byte range into the extracted text.
    pub span: Range<usize>,
}

impl Section {
    /// Title for display: the detected heading, or `Section {n}` (1-based) when untitled.
    pub fn display_title(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| format!("Section {}", self.index + 1))
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}
