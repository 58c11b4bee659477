//! Q&A items.

use std::collections::HashSet;
use std::fmt;

/// Kind of a generated item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QAKind {
    /// Short fact in non-question form.
    Bullet,
    /// Question answered directly by the section.
    Comprehension,
    /// Recall-practice question, possibly needing synthesis across the section.
    Revision,
}

impl QAKind {
    pub const ALL: [QAKind; 3] = [QAKind::Bullet, QAKind::Comprehension, QAKind::Revision];

    /// Marker used in the model output format.
    pub fn marker(self) -> &'static str {
        match self {
            QAKind::Bullet => prompt::MARKER_BULLET,
            QAKind::Comprehension => prompt::MARKER_COMPREHENSION,
            QAKind::Revision => prompt::MARKER_REVISION,
        }
    }

    /// Answers are optional only for bullets.
    pub fn requires_answer(self) -> bool {
        !matches!(self, QAKind::Bullet)
    }
}

impl fmt::Display for QAKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QAKind::Bullet => "bullet",
            QAKind::Comprehension => "comprehension",
            QAKind::Revision => "revision",
        };
        f.write_str(name)
    }
}

/// One generated item. For bullets `question` holds the fact and `answer` is usually None.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QAItem {
    pub kind: QAKind,
    pub question: String,
    pub answer: Option<String>,
}

impl QAItem {
    pub fn bullet(fact: impl Into<String>) -> Self {
        Self {
            kind: QAKind::Bullet,
            question: fact.into(),
            answer: None,
        }
    }

    pub fn comprehension(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            kind: QAKind::Comprehension,
            question: question.into(),
            answer: Some(answer.into()),
        }
    }

    pub fn revision(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            kind: QAKind::Revision,
            question: question.into(),
            answer: Some(answer.into()),
        }
    }
}

/// Items and key topics generated for one section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionQa {
    pub items: Vec<QAItem>,
    pub key_topics: Vec<String>,
}

impl SectionQa {
    pub fn of_kind(&self, kind: QAKind) -> impl Iterator<Item = &QAItem> {
        self.items.iter().filter(move |i| i.kind == kind)
    }

    pub fn count(&self, kind: QAKind) -> usize {
        self.of_kind(kind).count()
    }
}

/// Keeps at most `max` items per kind, in order, dropping repeated questions
/// (case-insensitive) within a kind.
pub(crate) fn limit_per_kind(items: Vec<QAItem>, max: usize) -> Vec<QAItem> {
    let mut seen: HashSet<(QAKind, String)> = HashSet::new();
    let mut counts = [0usize; 3];
    items
        .into_iter()
        .filter(|item| {
            let slot = match item.kind {
                QAKind::Bullet => 0,
                QAKind::Comprehension => 1,
                QAKind::Revision => 2,
            };
            if counts[slot] >= max {
                return false;
            }
            if !seen.insert((item.kind, item.question.to_lowercase())) {
                return false;
            }
            counts[slot] += 1;
            true
        })
        .collect()
}
