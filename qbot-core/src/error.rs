//! Error types for the bot core.
//!
//! [`QbotError`] is the top-level error; [`HandlerError`] is used for handler failures.

use thiserror::Error;

/// Top-level error for the bot (transport, downloads, handlers).
#[derive(Error, Debug)]
pub enum QbotError {
    #[error("Bot error: {0}")]
    Bot(String),

    #[error("Download error: {0}")]
    Download(String),

    #[error("Handler error: {0}")]
    Handler(#[from] HandlerError),
}

/// Errors produced by handlers while inspecting an incoming message.
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("Unsupported document: {0}")]
    UnsupportedDocument(String),

    #[error("File too large: {size} bytes (limit {limit})")]
    FileTooLarge { size: u64, limit: u64 },
}

/// Result type for core operations; uses [`QbotError`].
pub type Result<T> = std::result::Result<T, QbotError>;
