//! Heading-like line detection.
//!
//! A line is heading-like when it is short and matches one of:
//! - a numbered unit: `Chapter 3`, `SECTION 2: Cells`, `Part IV`, `Unit 1`, `Lesson 5`, `Module 2`
//! - a numbered heading: `2. Cell Structure`, `3.1 Membranes` (title starts uppercase)
//! - a Markdown heading: `## Summary`
//! - an ALL-CAPS line of at least 7 characters: `CELL DIVISION AND GROWTH`
//!
//! Except for Markdown headings, lines ending with sentence punctuation or longer than
//! [`MAX_HEADING_WORDS`] words are treated as body text.

use std::sync::LazyLock;

use regex::Regex;

/// Longest heading line, in characters. Detected titles are cut to this length.
pub const MAX_HEADING_CHARS: usize = 120;

/// Longest heading line, in words.
pub const MAX_HEADING_WORDS: usize = 14;

static UNIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(chapter|section|part|unit|lesson|module)\s+(\d+|[ivxlcdm]+)\b")
        .expect("valid unit heading pattern")
});

static NUMBERED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{1,3}(\.\d{1,3})*\.?\s+\p{Lu}").expect("valid numbered heading pattern")
});

static MARKDOWN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{1,6}\s+\S").expect("valid markdown heading pattern"));

static CAPS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\p{Lu}0-9][\p{Lu}0-9 \-:&,'()]{6,}$").expect("valid caps heading pattern")
});

/// Decides whether a line starts a new section and derives its title.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadingDetector;

impl HeadingDetector {
    pub fn new() -> Self {
        Self
    }

    /// True when the (untrimmed) line looks like a section heading.
    pub fn is_heading(&self, line: &str) -> bool {
        let line = line.trim();
        let chars = line.chars().count();
        if !(3..=MAX_HEADING_CHARS).contains(&chars) {
            return false;
        }
        if MARKDOWN_RE.is_match(line) {
            return true;
        }
        if line.split_whitespace().count() > MAX_HEADING_WORDS {
            return false;
        }
        if line.ends_with(['.', '!', '?', ';', ',']) {
            return false;
        }
        if UNIT_RE.is_match(line) || NUMBERED_RE.is_match(line) {
            return true;
        }
        CAPS_RE.is_match(line) && line.chars().any(|c| c.is_alphabetic())
    }

    /// Title for a heading line: Markdown hashes removed, whitespace collapsed, ALL-CAPS
    /// converted to title case, cut to [`MAX_HEADING_CHARS`] characters.
    pub fn title(&self, line: &str) -> String {
        let line = line.trim().trim_start_matches('#');
        let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
        let has_lower = collapsed.chars().any(|c| c.is_lowercase());
        let titled = if has_lower {
            collapsed
        } else {
            title_case(&collapsed)
        };
        titled.chars().take(MAX_HEADING_CHARS).collect()
    }
}

fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
