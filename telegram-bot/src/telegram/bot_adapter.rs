//! Wraps teloxide::Bot and implements [`qbot_core::Bot`]: text, in-memory documents, downloads.

use async_trait::async_trait;
use qbot_core::{Bot as CoreBot, Chat, Message, QbotError, Result};
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::{ChatId, FileId, InputFile};
use tracing::{debug, instrument};

/// Thin wrapper around teloxide::Bot that implements core's Bot trait.
#[derive(Clone)]
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat.id), text.to_string())
            .await
            .map_err(|e| QbotError::Bot(e.to_string()))?;
        Ok(())
    }

    async fn reply_to(&self, message: &Message, text: &str) -> Result<()> {
        self.send_message(&message.chat, text).await
    }

    async fn send_document(
        &self,
        chat: &Chat,
        file_name: &str,
        bytes: Vec<u8>,
        caption: Option<&str>,
    ) -> Result<()> {
        let file = InputFile::memory(bytes).file_name(file_name.to_string());
        let mut request = self.bot.send_document(ChatId(chat.id), file);
        if let Some(caption) = caption {
            request = request.caption(caption.to_string());
        }
        request.await.map_err(|e| QbotError::Bot(e.to_string()))?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn download_file(&self, file_id: &str) -> Result<Vec<u8>> {
        let file = self
            .bot
            .get_file(FileId(file_id.to_string()))
            .await
            .map_err(|e| QbotError::Download(e.to_string()))?;
        let mut bytes = Vec::with_capacity(file.size as usize);
        self.bot
            .download_file(&file.path, &mut bytes)
            .await
            .map_err(|e| QbotError::Download(e.to_string()))?;
        debug!(bytes = bytes.len(), "file downloaded");
        Ok(bytes)
    }
}
