//! # chapter
//!
//! Turns an uploaded chapter PDF into ordered [`Section`]s.
//!
//! - [`loader`]: extracts and normalizes text from PDF bytes (`pdf-extract`), failing with
//!   [`DocumentError::UnreadableDocument`] when no text layer is present.
//! - [`heading`]: heading-like line detection (numbered chapters, ALL-CAPS lines, Markdown).
//! - [`splitter`]: lazy, single-pass splitting at headings with a word-window bound.

mod error;
pub mod heading;
pub mod loader;
mod section;
pub mod splitter;

pub use error::DocumentError;
pub use heading::HeadingDetector;
pub use loader::{extract_text, extract_text_blocking, normalize_text, Document};
pub use section::Section;
pub use splitter::{
    SectionSplitter, Sections, SplitterConfig, DEFAULT_MAX_SECTION_WORDS, DEFAULT_MIN_SECTION_WORDS,
};
