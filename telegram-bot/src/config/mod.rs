//! Bot configuration: BaseConfig (Telegram + log) + completion config (llm-client) + QaConfig
//! (pipeline, limits, delivery). Loaded from env.

mod base;
mod bot_config;
mod pipeline;


pub use base::BaseConfig;
pub use bot_config::BotConfig;
pub use pipeline::{DeliveryMode, QaConfig};
