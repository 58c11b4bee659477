//! # qbot-core
//!
//! Core types and traits for the chapter Q&A bot: [`Bot`], [`Handler`], message, chat, user and
//! document types, error types and tracing initialization. Transport-agnostic; used by
//! handler-chain and the telegram-bot application.

pub mod bot;
pub mod error;
pub mod logger;
pub mod types;

pub use bot::Bot;
pub use error::{HandlerError, QbotError, Result};
pub use logger::init_tracing;
pub use types::{
    Chat, DocumentAttachment, Handler, HandlerResponse, Message, ToCoreMessage, ToCoreUser, User,
};
