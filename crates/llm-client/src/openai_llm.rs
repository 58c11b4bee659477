//! [`LlmClient`] backed by openai-client.

use anyhow::Result;
use async_trait::async_trait;
use tracing::{instrument, warn};

use super::{chat_message_to_openai, CompletionRequest, CompletionResponse, LlmClient};

/// OpenAI (or compatible endpoint) implementation of [`LlmClient`].
#[derive(Clone)]
pub struct OpenAILlmClient {
    client: openai_client::OpenAIClient,
}

impl OpenAILlmClient {
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: openai_client::OpenAIClient::with_base_url(api_key, base_url),
        }
    }
}

#[async_trait]
impl LlmClient for OpenAILlmClient {
    #[instrument(skip(self, request), fields(model = %request.model, messages = request.messages.len()))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let messages = request
            .messages
            .iter()
            .map(chat_message_to_openai)
            .collect::<Result<Vec<_>>>()?;

        let completion = self.client.chat_completion(&request.model, messages).await?;

        if completion.finish_reason.as_deref() == Some("length") {
            warn!("Completion truncated by token limit; trailing items may be incomplete");
        }

        Ok(CompletionResponse {
            text: completion.content,
            total_tokens: completion.usage.map(|u| u.total_tokens),
        })
    }
}
