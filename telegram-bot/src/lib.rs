//! # Chapter Q&A Telegram bot
//!
//! Wires qbot-core, handler-chain, the chapter/qa pipeline and the OpenAI completion client.
//! Loads config from env and runs the teloxide REPL. Each uploaded PDF chapter is split into
//! sections, Q&A is generated per section, and the study pack is sent back as messages and/or
//! a Markdown file.

pub mod cli;
pub mod config;
pub mod handlers;
pub mod runner;
pub mod telegram;

pub use cli::{load_config, Cli, Commands};
pub use config::{BaseConfig, BotConfig, DeliveryMode, QaConfig};
pub use handlers::{dispatch, replies, CommandHandler, StudyPackHandler, HELP_TEXT, WELCOME_TEXT};
pub use runner::{build_handler_chain, build_pipeline, run_bot};
pub use telegram::{run_repl, TelegramBotAdapter, TelegramMessageWrapper, TelegramUserWrapper};

pub use qbot_core::{Bot, Chat, DocumentAttachment, HandlerResponse, Message, QbotError, Result, User};
