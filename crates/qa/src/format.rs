//! Line-marker format for Q&A output.
//!
//! ```text
//! BULLET: Cells are the basic unit of life
//! COMPREHENSION: Why do cells need a membrane?
//! ANSWER: - It controls what enters and leaves
//! - It keeps the contents together
//! REVISION: What separates a cell from its surroundings?
//! ANSWER: The membrane
//! TOPICS: cell theory, membranes
//! ```
//!
//! Markers are matched case-insensitively and may carry list or bold decoration
//! (`- `, `1. `, `**`). Lines after `ANSWER:` up to the next marker continue the answer.
//! Text before the first marker is ignored.
//!
//! A line starting with `\ ` (or a lone `\`) is an escaped continuation: the rest of the line
//! is taken verbatim and never read as a marker. [`format_item`] writes every line it cannot
//! emit plainly in that form, so parsing its output gives back the same item.

use prompt::{MARKER_ANSWER, MARKER_TOPICS};
use thiserror::Error;
use tracing::warn;

use crate::{QAItem, QAKind};

const ESCAPE: &str = "\\";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("ANSWER on line {0} has no preceding question")]
    OrphanAnswer(usize),

    #[error("no Q&A items found")]
    NoItems,
}

/// Parsed completion: items in output order plus key topics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedOutput {
    pub items: Vec<QAItem>,
    pub key_topics: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Item(QAKind),
    Answer,
    Topics,
}

struct Pending {
    kind: QAKind,
    question: String,
    /// False until the question has its first line; an escaped line then starts it.
    question_started: bool,
    answer: Vec<String>,
    in_answer: bool,
}

impl Pending {
    fn new(kind: QAKind, first_line: &str) -> Self {
        Self {
            kind,
            question: first_line.to_string(),
            question_started: !first_line.is_empty(),
            answer: Vec::new(),
            in_answer: false,
        }
    }

    /// Adds a verbatim line to the answer or the question in progress.
    fn push_escaped(&mut self, content: &str) {
        if self.in_answer {
            self.answer.push(content.to_string());
        } else {
            if self.question_started {
                self.question.push('\n');
            }
            self.question.push_str(content);
            self.question_started = true;
        }
    }

    /// Adds a plain (trimmed) line; wrapped question lines are joined with a space.
    fn push_plain(&mut self, line: &str) {
        if self.in_answer {
            self.answer.push(line.to_string());
        } else {
            if !self.question.is_empty() {
                self.question.push(' ');
            }
            self.question.push_str(line);
            self.question_started = true;
        }
    }

    fn finish(self, items: &mut Vec<QAItem>) {
        if self.question.trim().is_empty() {
            warn!(kind = %self.kind, "dropping item with empty question");
            return;
        }
        let answer = Some(self.answer.join("\n")).filter(|a| !a.trim().is_empty());
        if answer.is_none() && self.kind.requires_answer() {
            warn!(kind = %self.kind, question = %self.question, "dropping question without answer");
            return;
        }
        items.push(QAItem {
            kind: self.kind,
            question: self.question,
            answer,
        });
    }
}

/// Strips list numbering, bullets and bold markers in front of a possible marker.
fn strip_decoration(line: &str) -> &str {
    let mut s = line.trim_start();
    loop {
        let before = s;
        if let Some(rest) = s.strip_prefix("**") {
            s = rest.trim_start();
        } else if let Some(rest) = s.strip_prefix(['-', '*', '•']) {
            s = rest.trim_start();
        } else {
            let digits = s.bytes().take_while(u8::is_ascii_digit).count();
            if digits > 0 {
                if let Some(rest) = s[digits..].strip_prefix(['.', ')']) {
                    s = rest.trim_start();
                }
            }
        }
        if s.len() == before.len() {
            return s;
        }
    }
}

/// Recognizes `MARKER:` at the start of a line and returns it with the rest of the line.
fn split_marker(line: &str) -> Option<(Marker, &str)> {
    let s = strip_decoration(line);
    let candidates = [
        (QAKind::Bullet.marker(), Marker::Item(QAKind::Bullet)),
        (
            QAKind::Comprehension.marker(),
            Marker::Item(QAKind::Comprehension),
        ),
        (QAKind::Revision.marker(), Marker::Item(QAKind::Revision)),
        (MARKER_ANSWER, Marker::Answer),
        (MARKER_TOPICS, Marker::Topics),
    ];
    for (name, marker) in candidates {
        let Some(head) = s.get(..name.len()) else {
            continue;
        };
        if !head.eq_ignore_ascii_case(name) {
            continue;
        }
        let rest = s[name.len()..].trim_start_matches('*').trim_start();
        if let Some(rest) = rest.strip_prefix(':') {
            let rest = rest.trim_start_matches('*').trim();
            return Some((marker, rest));
        }
    }
    None
}

/// Content of an escaped continuation line (`\ text` or a lone `\`).
fn split_escaped(raw: &str) -> Option<&str> {
    let s = raw.trim_start();
    if s.trim_end() == ESCAPE {
        return Some("");
    }
    s.strip_prefix(ESCAPE)?.strip_prefix(' ')
}

/// Parses a completion in the marker format.
///
/// Comprehension and revision items without an answer are dropped with a warning. Fails when
/// an `ANSWER` has no question to attach to, or when no item survives.
pub fn parse_items(text: &str) -> Result<ParsedOutput, FormatError> {
    let mut items = Vec::new();
    let mut key_topics = Vec::new();
    let mut current: Option<Pending> = None;

    for (i, raw) in text.lines().enumerate() {
        if let Some(content) = split_escaped(raw) {
            if let Some(pending) = current.as_mut() {
                pending.push_escaped(content);
            }
            continue;
        }
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        match split_marker(line) {
            Some((Marker::Item(kind), rest)) => {
                if let Some(done) = current.take() {
                    done.finish(&mut items);
                }
                current = Some(Pending::new(kind, rest));
            }
            Some((Marker::Answer, rest)) => {
                let pending = current.as_mut().ok_or(FormatError::OrphanAnswer(i + 1))?;
                pending.in_answer = true;
                if !rest.is_empty() {
                    pending.answer.push(rest.to_string());
                }
            }
            Some((Marker::Topics, rest)) => {
                if let Some(done) = current.take() {
                    done.finish(&mut items);
                }
                key_topics.extend(
                    rest.split([',', ';'])
                        .map(str::trim)
                        .filter(|t| !t.is_empty())
                        .map(str::to_string),
                );
            }
            None => {
                if let Some(pending) = current.as_mut() {
                    pending.push_plain(line);
                }
            }
        }
    }
    if let Some(done) = current.take() {
        done.finish(&mut items);
    }

    if items.is_empty() {
        return Err(FormatError::NoItems);
    }
    Ok(ParsedOutput { items, key_topics })
}

/// True when `line` can follow a marker and parse back unchanged.
fn fits_marker_line(line: &str) -> bool {
    !line.is_empty() && line == line.trim() && !line.starts_with('*') && !line.starts_with(ESCAPE)
}

/// True when `line` can be an unescaped answer continuation.
fn fits_plain_line(line: &str) -> bool {
    fits_marker_line(line) && split_marker(line).is_none()
}

/// Writes `MARKER: first line`, then the remaining lines. Lines that would be trimmed, read as
/// a marker or (in a question) joined with a space are escaped.
fn push_field(out: &mut String, marker: &str, text: &str, plain_continuation: bool) {
    let mut lines = text.split('\n');
    let first = lines.next().unwrap_or_default();
    out.push_str(marker);
    out.push(':');
    if fits_marker_line(first) {
        out.push(' ');
        out.push_str(first);
    } else {
        push_escaped_line(out, first);
    }
    for line in lines {
        if plain_continuation && fits_plain_line(line) {
            out.push('\n');
            out.push_str(line);
        } else {
            push_escaped_line(out, line);
        }
    }
}

fn push_escaped_line(out: &mut String, line: &str) {
    out.push('\n');
    out.push_str(ESCAPE);
    if !line.is_empty() {
        out.push(' ');
        out.push_str(line);
    }
}

/// Formats one item in the marker format. [`parse_items`] reads the result back as the same
/// item whenever the question and answer have visible text.
pub fn format_item(item: &QAItem) -> String {
    let mut out = String::new();
    push_field(&mut out, item.kind.marker(), &item.question, false);
    if let Some(answer) = &item.answer {
        out.push('\n');
        push_field(&mut out, MARKER_ANSWER, answer, true);
    }
    out
}

/// Formats items and topics as one completion text.
pub fn format_items(items: &[QAItem], key_topics: &[String]) -> String {
    let mut out: Vec<String> = items.iter().map(format_item).collect();
    if !key_topics.is_empty() {
        out.push(format!("{}: {}", MARKER_TOPICS, key_topics.join(", ")));
    }
    out.join("\n")
}
