use chapter::Section;

use crate::{GenerationError, QAItem, SectionQa};

/// One section and what generation produced for it.
#[derive(Debug, Clone)]
pub struct SectionOutcome {
    pub section: Section,
    pub result: Result<SectionQa, GenerationError>,
}

impl SectionOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Whole-chapter comprehension and revision questions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChapterExtras {
    pub items: Vec<QAItem>,
}

/// Everything produced for one document, sections in source order.
#[derive(Debug, Clone)]
pub struct StudyPack {
    pub title: String,
    pub outcomes: Vec<SectionOutcome>,
    /// None when extras are disabled.
    pub extras: Option<Result<ChapterExtras, GenerationError>>,
}

impl StudyPack {
    pub fn failed_sections(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_ok()).count()
    }

    /// Items across all successful sections, extras excluded.
    pub fn item_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .map(|qa| qa.items.len())
            .sum()
    }

    /// True when no section and no extras produced anything.
    pub fn is_empty(&self) -> bool {
        self.item_count() == 0 && !matches!(&self.extras, Some(Ok(e)) if !e.items.is_empty())
    }
}
