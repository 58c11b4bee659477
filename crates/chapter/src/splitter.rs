//! Section splitter: a lazy, single-pass iterator over the extracted text.
//!
//! Sections break at heading-like lines ([`HeadingDetector`]) once the section in progress has
//! `min_body_words` of body text; headings met earlier (numbered list items, short ALL-CAPS
//! lines) stay inside it. Text before the first heading always closes there. A section that
//! reaches `max_section_words` is closed at that word boundary and the rest continues in a new
//! section, which bounds section length when a document has no headings at all. A document
//! with no headings and fewer words than the bound yields exactly one section.

use tracing::debug;

use crate::heading::MAX_HEADING_WORDS;
use crate::{DocumentError, HeadingDetector, Section};

/// Default word bound for one section.
pub const DEFAULT_MAX_SECTION_WORDS: usize = 1500;

/// Default body size a section needs before a heading may close it.
pub const DEFAULT_MIN_SECTION_WORDS: usize = 50;

/// Splitting policy knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitterConfig {
    /// Word bound per section; longer spans are cut into consecutive windows. Raised to
    /// [`MAX_HEADING_WORDS`] so a heading line always fits one window.
    pub max_section_words: usize,
    /// Words a section needs beyond its heading line before the next heading may close it.
    /// Headings with less body between them (a chapter title directly followed by its first
    /// subsection, items of a numbered list) stay in one section.
    pub min_body_words: usize,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            max_section_words: DEFAULT_MAX_SECTION_WORDS,
            min_body_words: DEFAULT_MIN_SECTION_WORDS,
        }
    }
}

/// Splits extracted document text into [`Sections`].
#[derive(Debug, Clone, Default)]
pub struct SectionSplitter {
    config: SplitterConfig,
    detector: HeadingDetector,
}

impl SectionSplitter {
    pub fn new(config: SplitterConfig) -> Self {
        let max_section_words = config.max_section_words.max(MAX_HEADING_WORDS);
        Self {
            config: SplitterConfig {
                max_section_words,
                min_body_words: config.min_body_words.min(max_section_words),
            },
            detector: HeadingDetector::new(),
        }
    }

    pub fn config(&self) -> &SplitterConfig {
        &self.config
    }

    /// Returns the lazy section sequence for `text`.
    ///
    /// Fails with [`DocumentError::UnreadableDocument`] when `text` has no visible content.
    pub fn split<'a>(&self, text: &'a str) -> Result<Sections<'a>, DocumentError> {
        if text.trim().is_empty() {
            return Err(DocumentError::UnreadableDocument(
                "no text to split".to_string(),
            ));
        }
        Ok(Sections {
            source: text,
            config: self.config,
            detector: self.detector,
            start: 0,
            line_pos: 0,
            words: 0,
            heading_words: 0,
            title: None,
            base_title: None,
            window: 1,
            next_index: 0,
        })
    }
}

/// Ordered, finite, single-pass sequence of sections over one document's text.
#[derive(Debug)]
pub struct Sections<'a> {
    source: &'a str,
    config: SplitterConfig,
    detector: HeadingDetector,
    /// Byte offset where the section in progress starts.
    start: usize,
    /// Byte offset of the next unread line (or line remainder after a mid-line cut).
    line_pos: usize,
    /// Words in the section in progress.
    words: usize,
    /// Words of the heading line that opened the section in progress.
    heading_words: usize,
    title: Option<String>,
    base_title: Option<String>,
    /// 1-based window number within the current heading (or the untitled prefix).
    window: usize,
    next_index: usize,
}

impl<'a> Sections<'a> {
    fn at_line_start(&self) -> bool {
        self.line_pos == 0 || self.source.as_bytes()[self.line_pos - 1] == b'\n'
    }

    /// Emits `start..end` as a section when it has visible text; always moves `start` to `end`.
    fn take(&mut self, end: usize) -> Option<Section> {
        let span = self.start..end;
        self.start = end;
        let text = &self.source[span.clone()];
        if text.trim().is_empty() {
            return None;
        }
        let section = Section {
            index: self.next_index,
            title: self.title.clone(),
            text: text.to_string(),
            span,
        };
        self.next_index += 1;
        debug!(
            index = section.index,
            title = ?section.title,
            words = self.words,
            "section emitted"
        );
        Some(section)
    }

    fn open_heading(&mut self, title: String, heading_words: usize) {
        self.base_title = Some(title.clone());
        self.title = Some(title);
        self.window = 1;
        self.words = 0;
        self.heading_words = heading_words;
    }

    /// Whether a heading at the current line ends the section in progress.
    fn closes_at_heading(&self) -> bool {
        self.base_title.is_none()
            || self.words.saturating_sub(self.heading_words) >= self.config.min_body_words
    }

    fn open_window(&mut self) {
        self.window += 1;
        self.title = Some(match &self.base_title {
            Some(base) => format!("{} (part {})", base, self.window),
            None => format!("Part {}", self.window),
        });
        self.words = 0;
        self.heading_words = 0;
    }
}

impl<'a> Iterator for Sections<'a> {
    type Item = Section;

    fn next(&mut self) -> Option<Section> {
        loop {
            if self.line_pos >= self.source.len() {
                if self.start < self.source.len() {
                    let end = self.source.len();
                    if let Some(section) = self.take(end) {
                        return Some(section);
                    }
                }
                return None;
            }

            let line_end = self.source[self.line_pos..]
                .find('\n')
                .map(|i| self.line_pos + i + 1)
                .unwrap_or(self.source.len());
            let line = &self.source[self.line_pos..line_end];
            let line_words = line.split_whitespace().count();

            if self.at_line_start() && self.detector.is_heading(line) {
                if self.source[self.start..self.line_pos].trim().is_empty() {
                    self.start = self.line_pos;
                    self.open_heading(self.detector.title(line), line_words);
                } else if self.closes_at_heading() {
                    // The heading line is read again as the first line of the next section.
                    if let Some(section) = self.take(self.line_pos) {
                        return Some(section);
                    }
                }
            }

            let max = self.config.max_section_words;
            if self.words + line_words <= max {
                self.words += line_words;
                self.line_pos = line_end;
                continue;
            }

            // Window bound reached: cut before this line, or inside it when the line alone
            // is longer than the bound.
            let cut = if self.words > 0 {
                self.line_pos
            } else {
                self.line_pos + byte_offset_after_words(line, max)
            };
            let closed = self.take(cut);
            self.line_pos = cut;
            self.open_window();
            if closed.is_some() {
                return closed;
            }
        }
    }
}

/// Byte offset in `s` just after its `n`-th whitespace-separated word. `s` must contain more
/// than `n` words.
fn byte_offset_after_words(s: &str, n: usize) -> usize {
    let mut words = 0;
    let mut in_word = false;
    for (i, ch) in s.char_indices() {
        if ch.is_whitespace() {
            if in_word && words == n {
                return i;
            }
            in_word = false;
        } else if !in_word {
            in_word = true;
            words += 1;
        }
    }
    s.len()
}
