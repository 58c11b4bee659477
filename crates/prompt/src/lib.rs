//! # Prompt
//!
//! Builds the chat messages sent to the completion model for chapter study packs.
//!
//! ## Output format
//!
//! The model is asked to answer with line-prefixed markers, one item per marker line:
//!
//! ```text
//! BULLET: Photosynthesis converts light energy into chemical energy.
//! COMPREHENSION: Why do plants need chlorophyll?
//! ANSWER: - It absorbs light energy
//! - It drives the light reactions
//! REVISION: How does this connect to cellular respiration?
//! ANSWER: Respiration releases the energy photosynthesis stores.
//! TOPICS: photosynthesis, chlorophyll
//! ```
//!
//! Lines following an `ANSWER:` line until the next marker continue that answer. The `qa` crate
//! parses this format back into items.
//!
//! ## External interactions
//!
//! - **Completion models**: output of [`section_messages`] and [`chapter_extras_messages`] is
//!   sent to OpenAI-compatible chat APIs.

use std::borrow::Cow;

/// Role of a message, one-to-one with OpenAI Chat Completions API `role` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    /// System instruction (API `role: "system"`).
    System,
    /// User message (API `role: "user"`).
    User,
}

/// A single chat message, one-to-one with one element of OpenAI `messages` array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Marker for a short fact (no question form).
pub const MARKER_BULLET: &str = "BULLET";
/// Marker for a question answered directly by the section.
pub const MARKER_COMPREHENSION: &str = "COMPREHENSION";
/// Marker for a recall-practice question.
pub const MARKER_REVISION: &str = "REVISION";
/// Marker starting the answer of the preceding question.
pub const MARKER_ANSWER: &str = "ANSWER";
/// Marker for a comma-separated list of key topics.
pub const MARKER_TOPICS: &str = "TOPICS";

/// Study-coach instruction used when no custom system prompt is configured.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a study coach that converts textbook sections into short, high-quality Q&A.

Rules:
- Keep questions and answers very concise, 1-3 bullet points each.
- Prefer comprehension-based questions (why/how/compare/apply) over pure recall.
- Avoid jargon unless necessary; define terms briefly if used.
- Maintain factual accuracy and neutrality.
- If the text is ambiguous, infer cautiously and note assumptions.

Answer strictly in the line-marker format you are given. Do not use any other formatting.";

/// Description of the marker format appended to every user prompt.
pub fn format_instructions() -> String {
    format!(
        "Output format (one marker per line, nothing else):
{b}: <one short fact, not a question>
{c}: <question answered directly by the text>
{a}: <answer; further lines may start with \"- \" for bullets>
{r}: <revision question for recall practice>
{a}: <answer>
{t}: <topic>, <topic>, <topic>

Every {c} and {r} line must be followed by an {a} line.",
        b = MARKER_BULLET,
        c = MARKER_COMPREHENSION,
        r = MARKER_REVISION,
        a = MARKER_ANSWER,
        t = MARKER_TOPICS,
    )
}

/// Truncates `text` to at most `max_words` whitespace-separated words, keeping the original
/// spacing of the kept prefix. Returns the input unchanged when it is already short enough.
pub fn clamp_words(text: &str, max_words: usize) -> Cow<'_, str> {
    let mut words = 0;
    let mut in_word = false;
    for (i, ch) in text.char_indices() {
        if ch.is_whitespace() {
            in_word = false;
        } else if !in_word {
            in_word = true;
            words += 1;
            if words > max_words {
                return Cow::Owned(text[..i].trim_end().to_string());
            }
        }
    }
    Cow::Borrowed(text)
}

/// Builds the messages for one section: system prompt, then the task, limits, title and text.
///
/// `max_per_kind` caps bullets, comprehension and revision items separately; `max_words` clamps
/// the section text so one request stays within the model context.
pub fn section_messages(
    system_prompt: &str,
    title: Option<&str>,
    text: &str,
    max_per_kind: usize,
    max_words: usize,
) -> Vec<ChatMessage> {
    let user = format!(
        "You will receive one section of a textbook chapter.

Task:
1) Give up to {max} {b} facts covering the core ideas of THIS section only.
2) Give up to {max} {c} questions with concise answers (explain, compare, apply).
3) Give up to {max} {r} questions for recall practice, possibly connecting ideas across the section.
4) Give 1-3 {t} that explain the whole section.
Avoid duplicates; each item should add new value.

{format}

SECTION_TITLE: {title}

SECTION_TEXT:
{text}",
        max = max_per_kind,
        b = MARKER_BULLET,
        c = MARKER_COMPREHENSION,
        r = MARKER_REVISION,
        t = MARKER_TOPICS,
        format = format_instructions(),
        title = title.unwrap_or("(untitled)"),
        text = clamp_words(text, max_words),
    );
    vec![ChatMessage::system(system_prompt), ChatMessage::user(user)]
}

/// Builds the messages for the whole-chapter extras: `count` comprehension questions and
/// `count` revision questions linking the chapter to commonly taught prerequisites.
pub fn chapter_extras_messages(
    system_prompt: &str,
    chapter_text: &str,
    count: usize,
    max_words: usize,
) -> Vec<ChatMessage> {
    let user = format!(
        "From the ENTIRE chapter below, generate:
1) {count} {c} questions (apply/why/how/cause-effect/counterexample) with short bullet answers.
2) {count} {r} questions connecting this chapter to common prior knowledge in the subject (earlier chapters or foundational concepts). If prior-chapter details are unknown, pose cross-linking questions using generally taught prerequisites.
Do not output {b} or {t} lines.

{format}

CHAPTER_TEXT:
{text}",
        count = count,
        c = MARKER_COMPREHENSION,
        r = MARKER_REVISION,
        b = MARKER_BULLET,
        t = MARKER_TOPICS,
        format = format_instructions(),
        text = clamp_words(chapter_text, max_words),
    );
    vec![ChatMessage::system(system_prompt), ChatMessage::user(user)]
}
