//! # qa
//!
//! Q&A generation for chapter sections and the per-document pipeline.
//!
//! - [`item`]: [`QAItem`] and its three kinds.
//! - [`format`]: the line-marker format shared with the model prompt (parse and format).
//! - [`generator`]: one section (or the whole chapter) to items via [`llm_client::LlmClient`],
//!   with per-call timeout, retries and backoff.
//! - [`pipeline`]: PDF bytes to a [`StudyPack`], sections generated through a bounded stream
//!   under a document-level timeout.
//! - [`render`]: chat-sized messages and the Markdown study pack.

mod error;
pub mod format;
pub mod generator;
pub mod item;
mod pack;
pub mod pipeline;
pub mod render;

pub use error::{FailureCause, GenerationError, PipelineError};
pub use format::{format_item, format_items, parse_items, FormatError, ParsedOutput};
pub use generator::{GeneratorConfig, QaGenerator};
pub use item::{QAItem, QAKind, SectionQa};
pub use pack::{ChapterExtras, SectionOutcome, StudyPack};
pub use pipeline::{Pipeline, PipelineConfig};
pub use render::{render_markdown, render_messages, TELEGRAM_MAX_MESSAGE_CHARS};
