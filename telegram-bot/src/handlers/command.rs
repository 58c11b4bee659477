//! `/start`, `/help`, and the usage hint for plain text.

use std::sync::Arc;

use async_trait::async_trait;
use qbot_core::{Bot, Handler, HandlerResponse, Message, Result};
use tracing::{debug, instrument};

pub const WELCOME_TEXT: &str = "Hi! Send me a chapter PDF.\n\
I'll split it into sections and return short Q&A for each one: key facts, comprehension \
questions and revision questions, plus questions that span the whole chapter. 🔍📘";

pub const HELP_TEXT: &str = "Just upload a PDF chapter (text-based, not scanned).\n\
You'll get the Q&A for each section as messages, or as a .md file if the bot is set up that way.\n\
Commands: /start, /help";

/// Answers commands and text messages. Documents pass through to the next handler.
pub struct CommandHandler {
    bot: Arc<dyn Bot>,
}

impl CommandHandler {
    pub fn new(bot: Arc<dyn Bot>) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Handler for CommandHandler {
    #[instrument(skip(self, message), fields(chat_id = message.chat.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if message.document.is_some() {
            return Ok(HandlerResponse::Continue);
        }

        let text = match message.command() {
            Some("start") => WELCOME_TEXT,
            Some("help") => HELP_TEXT,
            Some(other) => {
                debug!(command = other, "unknown command");
                HELP_TEXT
            }
            None if message.content.trim().is_empty() => return Ok(HandlerResponse::Ignore),
            None => HELP_TEXT,
        };
        self.bot.reply_to(message, text).await?;
        Ok(HandlerResponse::Reply(text.to_string()))
    }
}
