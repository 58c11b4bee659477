//! Q&A generator: one section (or the whole chapter) to items through an [`LlmClient`].
//!
//! Every call runs under a per-request timeout. Service errors, timeouts and unparseable
//! output are retried with exponential backoff; after the last attempt the section fails
//! with [`GenerationError::GenerationFailed`] carrying the last cause.

use std::sync::Arc;
use std::time::Duration;

use chapter::Section;
use llm_client::{CompletionRequest, LlmClient};
use prompt::ChatMessage;
use tracing::{debug, info, instrument, warn};

use crate::item::limit_per_kind;
use crate::{parse_items, ChapterExtras, FailureCause, GenerationError, QAKind, SectionQa};

/// Generation knobs.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub model: String,
    pub system_prompt: String,
    /// Cap per item kind for one section.
    pub max_qa_per_section: usize,
    /// Word clamp for the section text sent in one request.
    pub max_prompt_words: usize,
    pub request_timeout: Duration,
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry; doubled for each further retry.
    pub retry_backoff: Duration,
    /// Comprehension and revision questions each for the whole chapter; 0 disables extras.
    pub extra_qa_count: usize,
    /// Word clamp for the chapter text sent for extras.
    pub max_extras_prompt_words: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: llm_client::DEFAULT_MODEL.to_string(),
            system_prompt: prompt::DEFAULT_SYSTEM_PROMPT.to_string(),
            max_qa_per_section: 4,
            max_prompt_words: 4500,
            request_timeout: Duration::from_secs(120),
            max_retries: 2,
            retry_backoff: Duration::from_millis(500),
            extra_qa_count: 6,
            max_extras_prompt_words: 12000,
        }
    }
}

/// Generates Q&A items. Cheap to share; holds the client behind an `Arc`.
#[derive(Clone)]
pub struct QaGenerator {
    client: Arc<dyn LlmClient>,
    config: GeneratorConfig,
}

impl QaGenerator {
    pub fn new(client: Arc<dyn LlmClient>, config: GeneratorConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates items for one section: at most `max_qa_per_section` of each kind.
    #[instrument(skip(self, section), fields(section = section.index, title = ?section.title))]
    pub async fn generate(&self, section: &Section) -> Result<SectionQa, GenerationError> {
        let messages = prompt::section_messages(
            &self.config.system_prompt,
            section.title.as_deref(),
            &section.text,
            self.config.max_qa_per_section,
            self.config.max_prompt_words,
        );
        let max = self.config.max_qa_per_section;
        let qa = self
            .complete_with_retry(messages, |text| {
                let parsed = parse_items(text).map_err(|e| e.to_string())?;
                Ok(SectionQa {
                    items: limit_per_kind(parsed.items, max),
                    key_topics: parsed.key_topics,
                })
            })
            .await?;

        info!(
            bullets = qa.count(QAKind::Bullet),
            comprehension = qa.count(QAKind::Comprehension),
            revision = qa.count(QAKind::Revision),
            "section Q&A generated"
        );
        Ok(qa)
    }

    /// Generates whole-chapter comprehension and revision questions from all sections.
    #[instrument(skip(self, sections), fields(sections = sections.len()))]
    pub async fn generate_extras(
        &self,
        sections: &[Section],
    ) -> Result<ChapterExtras, GenerationError> {
        let chapter_text = sections
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        let count = self.config.extra_qa_count;
        let messages = prompt::chapter_extras_messages(
            &self.config.system_prompt,
            &chapter_text,
            count,
            self.config.max_extras_prompt_words,
        );
        let extras = self
            .complete_with_retry(messages, |text| {
                let parsed = parse_items(text).map_err(|e| e.to_string())?;
                let questions: Vec<_> = parsed
                    .items
                    .into_iter()
                    .filter(|i| i.kind != QAKind::Bullet)
                    .collect();
                if questions.is_empty() {
                    return Err("no comprehension or revision questions".to_string());
                }
                Ok(ChapterExtras {
                    items: limit_per_kind(questions, count),
                })
            })
            .await?;

        info!(items = extras.items.len(), "chapter extras generated");
        Ok(extras)
    }

    async fn complete_with_retry<T>(
        &self,
        messages: Vec<ChatMessage>,
        parse: impl Fn(&str) -> Result<T, String>,
    ) -> Result<T, GenerationError> {
        let attempts = self.config.max_retries + 1;
        let mut backoff = self.config.retry_backoff;
        let mut attempt = 1;

        loop {
            let request = CompletionRequest::new(self.config.model.clone(), messages.clone());
            let cause =
                match tokio::time::timeout(self.config.request_timeout, self.client.complete(request))
                    .await
                {
                    Err(_) => FailureCause::Timeout(self.config.request_timeout),
                    Ok(Err(e)) => FailureCause::Service(e.to_string()),
                    Ok(Ok(response)) => {
                        debug!(
                            attempt,
                            total_tokens = ?response.total_tokens,
                            len = response.text.len(),
                            "completion received"
                        );
                        match parse(&response.text) {
                            Ok(value) => return Ok(value),
                            Err(reason) => FailureCause::Malformed(reason),
                        }
                    }
                };

            if attempt >= attempts {
                warn!(attempt, cause = %cause, "generation failed, no retries left");
                return Err(GenerationError::GenerationFailed { attempts, cause });
            }
            warn!(attempt, cause = %cause, backoff_ms = backoff.as_millis() as u64, "generation attempt failed, retrying");
            tokio::time::sleep(backoff).await;
            backoff = backoff.saturating_mul(2);
            attempt += 1;
        }
    }
}
