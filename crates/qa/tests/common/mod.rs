//! Scripted completion client for generator and pipeline tests. No network.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use llm_client::{CompletionRequest, CompletionResponse, LlmClient};
use prompt::MessageRole;

/// What the fake does for one call.
pub enum Step {
    Reply(String),
    DelayedReply(Duration, String),
    Fail(String),
    /// Never answers; only a timeout ends the call.
    Hang,
}

type Responder = Box<dyn Fn(&str, usize) -> Step + Send + Sync>;

/// Answers each call from a responder given the user prompt and the 0-based call number.
pub struct FakeLlm {
    responder: Responder,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl FakeLlm {
    pub fn new(responder: impl Fn(&str, usize) -> Step + Send + Sync + 'static) -> Self {
        Self {
            responder: Box::new(responder),
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Replies with the same text to every call.
    pub fn always(text: &str) -> Self {
        let text = text.to_string();
        Self::new(move |_, _| Step::Reply(text.clone()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl LlmClient for FakeLlm {
    async fn complete(&self, request: CompletionRequest) -> anyhow::Result<CompletionResponse> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        let user = request
            .messages
            .iter()
            .find(|m| m.role == MessageRole::User)
            .map(|m| m.content.clone())
            .unwrap_or_default();
        self.prompts.lock().unwrap().push(user.clone());

        match (self.responder)(&user, n) {
            Step::Reply(text) => Ok(CompletionResponse::text(text)),
            Step::DelayedReply(delay, text) => {
                tokio::time::sleep(delay).await;
                Ok(CompletionResponse::text(text))
            }
            Step::Fail(reason) => Err(anyhow::anyhow!(reason)),
            Step::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(anyhow::anyhow!("hang ended"))
            }
        }
    }
}

/// A well-formed completion with one item of each kind and two topics.
pub fn valid_output(tag: &str) -> String {
    format!(
        "BULLET: {tag} fact\n\
         COMPREHENSION: Why does {tag} matter?\n\
         ANSWER: - Because it does\n\
         REVISION: Recall {tag}.\n\
         ANSWER: {tag}\n\
         TOPICS: {tag}, basics"
    )
}

/// Title on the `SECTION_TITLE:` line of a section prompt.
pub fn section_title(prompt: &str) -> Option<&str> {
    prompt
        .lines()
        .find_map(|l| l.strip_prefix("SECTION_TITLE: "))
}
