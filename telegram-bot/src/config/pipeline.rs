//! Pipeline config: Q&A limits, retries, timeouts, splitting, upload limit, delivery mode.

use anyhow::{bail, Context, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

use chapter::SplitterConfig;
use llm_client::LlmConfig;
use qa::{GeneratorConfig, PipelineConfig};

/// Telegram bots can download files up to 20 MiB.
pub const DEFAULT_MAX_FILE_BYTES: u64 = 20 * 1024 * 1024;

/// Smallest accepted MAX_SECTION_WORDS.
pub const LOWEST_MAX_SECTION_WORDS: usize = 50;

/// How a finished study pack is delivered to the chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryMode {
    /// Chat messages, split to the message size limit.
    #[default]
    Messages,
    /// One Markdown file.
    Document,
    /// Messages followed by the Markdown file.
    Both,
}

impl DeliveryMode {
    pub fn sends_messages(self) -> bool {
        matches!(self, DeliveryMode::Messages | DeliveryMode::Both)
    }

    pub fn sends_document(self) -> bool {
        matches!(self, DeliveryMode::Document | DeliveryMode::Both)
    }
}

impl FromStr for DeliveryMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "messages" | "message" | "text" => Ok(DeliveryMode::Messages),
            "document" | "file" | "markdown" => Ok(DeliveryMode::Document),
            "both" => Ok(DeliveryMode::Both),
            other => bail!("DELIVERY_MODE must be messages, document or both, got {:?}", other),
        }
    }
}

/// Q&A pipeline settings.
#[derive(Debug, Clone)]
pub struct QaConfig {
    /// MAX_QA_PER_SECTION (per kind)
    pub max_qa_per_section: usize,
    /// SECTION_CONCURRENCY
    pub section_concurrency: usize,
    /// REQUEST_TIMEOUT_SECS
    pub request_timeout_secs: u64,
    /// MAX_RETRIES
    pub max_retries: u32,
    /// RETRY_BACKOFF_MS
    pub retry_backoff_ms: u64,
    /// DOCUMENT_TIMEOUT_SECS
    pub document_timeout_secs: u64,
    /// MAX_SECTION_WORDS
    pub max_section_words: usize,
    /// MIN_SECTION_WORDS: body words before a heading may start a new section
    pub min_section_words: usize,
    /// MAX_PROMPT_WORDS
    pub max_prompt_words: usize,
    /// EXTRA_QA_COUNT; 0 disables whole-chapter questions
    pub extra_qa_count: usize,
    /// MAX_FILE_BYTES
    pub max_file_bytes: u64,
    /// DELIVERY_MODE
    pub delivery_mode: DeliveryMode,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            max_qa_per_section: 4,
            section_concurrency: 4,
            request_timeout_secs: 120,
            max_retries: 2,
            retry_backoff_ms: 500,
            document_timeout_secs: 900,
            max_section_words: chapter::DEFAULT_MAX_SECTION_WORDS,
            min_section_words: chapter::DEFAULT_MIN_SECTION_WORDS,
            max_prompt_words: 4500,
            extra_qa_count: 6,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            delivery_mode: DeliveryMode::default(),
        }
    }
}

/// Reads `name` and parses it; unset or blank gives `default`, unparsable is an error.
fn env_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{}", e))
            .with_context(|| format!("{} has an invalid value: {:?}", name, raw)),
        _ => Ok(default),
    }
}

impl QaConfig {
    /// Load from environment variables; unset values take the defaults.
    pub fn from_env() -> Result<Self> {
        let d = Self::default();
        Ok(Self {
            max_qa_per_section: env_or("MAX_QA_PER_SECTION", d.max_qa_per_section)?,
            section_concurrency: env_or("SECTION_CONCURRENCY", d.section_concurrency)?,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", d.request_timeout_secs)?,
            max_retries: env_or("MAX_RETRIES", d.max_retries)?,
            retry_backoff_ms: env_or("RETRY_BACKOFF_MS", d.retry_backoff_ms)?,
            document_timeout_secs: env_or("DOCUMENT_TIMEOUT_SECS", d.document_timeout_secs)?,
            max_section_words: env_or("MAX_SECTION_WORDS", d.max_section_words)?,
            min_section_words: env_or("MIN_SECTION_WORDS", d.min_section_words)?,
            max_prompt_words: env_or("MAX_PROMPT_WORDS", d.max_prompt_words)?,
            extra_qa_count: env_or("EXTRA_QA_COUNT", d.extra_qa_count)?,
            max_file_bytes: env_or("MAX_FILE_BYTES", d.max_file_bytes)?,
            delivery_mode: env_or("DELIVERY_MODE", d.delivery_mode)?,
        })
    }

    /// Rejects values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.max_qa_per_section == 0 {
            bail!("MAX_QA_PER_SECTION must be at least 1");
        }
        if self.section_concurrency == 0 {
            bail!("SECTION_CONCURRENCY must be at least 1");
        }
        if self.request_timeout_secs == 0 {
            bail!("REQUEST_TIMEOUT_SECS must be at least 1");
        }
        if self.document_timeout_secs == 0 {
            bail!("DOCUMENT_TIMEOUT_SECS must be at least 1");
        }
        if self.max_section_words < LOWEST_MAX_SECTION_WORDS {
            bail!("MAX_SECTION_WORDS must be at least {}", LOWEST_MAX_SECTION_WORDS);
        }
        if self.min_section_words >= self.max_section_words {
            bail!("MIN_SECTION_WORDS must be below MAX_SECTION_WORDS");
        }
        if self.max_prompt_words == 0 {
            bail!("MAX_PROMPT_WORDS must be at least 1");
        }
        if self.max_file_bytes == 0 {
            bail!("MAX_FILE_BYTES must be at least 1");
        }
        Ok(())
    }

    /// Generator settings; model and system prompt come from the completion config.
    pub fn generator_config(&self, llm: &dyn LlmConfig) -> GeneratorConfig {
        let defaults = GeneratorConfig::default();
        GeneratorConfig {
            model: llm.model().to_string(),
            system_prompt: llm
                .system_prompt()
                .map(str::to_string)
                .unwrap_or_else(|| defaults.system_prompt.clone()),
            max_qa_per_section: self.max_qa_per_section,
            max_prompt_words: self.max_prompt_words,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_retries: self.max_retries,
            retry_backoff: Duration::from_millis(self.retry_backoff_ms),
            extra_qa_count: self.extra_qa_count,
            ..defaults
        }
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            splitter: SplitterConfig {
                max_section_words: self.max_section_words,
                min_body_words: self.min_section_words,
            },
            section_concurrency: self.section_concurrency,
            document_timeout: Duration::from_secs(self.document_timeout_secs),
        }
    }
}
