//! Per-document pipeline: load, split, generate, collect.
//!
//! Sections are generated through a bounded, order-preserving stream, so at most
//! `section_concurrency` completion calls are in flight and outcomes come back in source order.
//! A failed section is recorded in its [`SectionOutcome`] and does not stop the others. The
//! whole run is bounded by `document_timeout`; when it expires the in-flight calls are dropped.

use std::time::Duration;

use chapter::{extract_text, Document, SectionSplitter, SplitterConfig};
use futures::StreamExt;
use tracing::{info, instrument, warn};

use crate::{PipelineError, QaGenerator, SectionOutcome, StudyPack};

/// Title used when neither a heading nor a file name is available.
pub const FALLBACK_TITLE: &str = "Chapter";

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub splitter: SplitterConfig,
    /// Sections generated concurrently.
    pub section_concurrency: usize,
    pub document_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            splitter: SplitterConfig::default(),
            section_concurrency: 4,
            document_timeout: Duration::from_secs(900),
        }
    }
}

/// Turns one uploaded document into a [`StudyPack`].
#[derive(Clone)]
pub struct Pipeline {
    generator: QaGenerator,
    splitter: SectionSplitter,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(generator: QaGenerator, config: PipelineConfig) -> Self {
        Self {
            generator,
            splitter: SectionSplitter::new(config.splitter),
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs the whole pipeline for a PDF. The document is consumed and dropped once its text
    /// is extracted.
    #[instrument(skip(self, document), fields(file_name = ?document.file_name, bytes = document.bytes.len()))]
    pub async fn run(&self, document: Document) -> Result<StudyPack, PipelineError> {
        let limit = self.config.document_timeout;
        tokio::time::timeout(limit, async move {
            let fallback_title = document.stem().map(str::to_string);
            let text = extract_text(document.bytes).await?;
            self.process_text(&text, fallback_title).await
        })
        .await
        .map_err(|_| {
            warn!(timeout_secs = limit.as_secs(), "document timed out");
            PipelineError::DocumentTimedOut(limit)
        })?
    }

    /// Runs split and generation over already extracted text.
    pub async fn run_text(
        &self,
        text: &str,
        fallback_title: Option<String>,
    ) -> Result<StudyPack, PipelineError> {
        let limit = self.config.document_timeout;
        tokio::time::timeout(limit, self.process_text(text, fallback_title))
            .await
            .map_err(|_| {
                warn!(timeout_secs = limit.as_secs(), "document timed out");
                PipelineError::DocumentTimedOut(limit)
            })?
    }

    async fn process_text(
        &self,
        text: &str,
        fallback_title: Option<String>,
    ) -> Result<StudyPack, PipelineError> {
        let sections = self.splitter.split(text)?;
        let generator = &self.generator;

        let outcomes: Vec<SectionOutcome> = futures::stream::iter(sections)
            .map(|section| async move {
                let result = generator.generate(&section).await;
                SectionOutcome { section, result }
            })
            .buffered(self.config.section_concurrency.max(1))
            .collect()
            .await;

        let extras = if generator.config().extra_qa_count > 0 {
            let sections: Vec<_> = outcomes.iter().map(|o| o.section.clone()).collect();
            Some(generator.generate_extras(&sections).await)
        } else {
            None
        };

        let title = outcomes
            .first()
            .and_then(|o| o.section.title.clone())
            .or(fallback_title)
            .unwrap_or_else(|| FALLBACK_TITLE.to_string());

        let pack = StudyPack {
            title,
            outcomes,
            extras,
        };
        info!(
            title = %pack.title,
            sections = pack.outcomes.len(),
            failed = pack.failed_sections(),
            items = pack.item_count(),
            "study pack ready"
        );
        Ok(pack)
    }
}
