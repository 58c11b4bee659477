use thiserror::Error;

/// Document-scoped failures while turning an upload into sections.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// Extraction failed or produced no usable text (e.g. a scanned PDF).
    #[error("Unreadable document: {0}")]
    UnreadableDocument(String),
}
