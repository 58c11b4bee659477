//! Bot abstraction for replying with text and files and for downloading uploads.
//!
//! [`Bot`] is transport-agnostic; the telegram-bot crate implements it via teloxide and tests
//! substitute in-process fakes.

use crate::error::Result;
use crate::types::{Chat, Message};
use async_trait::async_trait;

/// Abstraction over the chat transport. Implementations map to a transport (e.g. Telegram).
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends a text message to the given chat.
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()>;

    /// Sends a reply to the given message (same chat).
    async fn reply_to(&self, message: &Message, text: &str) -> Result<()>;

    /// Sends an in-memory file as a document with an optional caption.
    async fn send_document(
        &self,
        chat: &Chat,
        file_name: &str,
        bytes: Vec<u8>,
        caption: Option<&str>,
    ) -> Result<()>;

    /// Downloads an uploaded file by its transport-specific id and returns its bytes.
    async fn download_file(&self, file_id: &str) -> Result<Vec<u8>>;
}
