//! Application wiring: config -> tracing -> completion client -> pipeline -> handler chain ->
//! REPL.

use std::sync::Arc;

use anyhow::Result;
use handler_chain::HandlerChain;
use llm_client::{LlmClient, OpenAILlmClient};
use qa::{Pipeline, QaGenerator};
use qbot_core::{init_tracing, Bot};
use tracing::{info, instrument};

use crate::config::BotConfig;
use crate::handlers::{CommandHandler, StudyPackHandler};
use crate::telegram::{run_repl, TelegramBotAdapter};

/// Builds the pipeline from config around the given completion client.
pub fn build_pipeline(config: &BotConfig, llm: Arc<dyn LlmClient>) -> Pipeline {
    let generator = QaGenerator::new(llm, config.generator_config());
    Pipeline::new(generator, config.pipeline_config())
}

/// Command handler first, then the PDF flow.
pub fn build_handler_chain(config: &BotConfig, bot: Arc<dyn Bot>, pipeline: Pipeline) -> HandlerChain {
    HandlerChain::new()
        .add_handler(Arc::new(CommandHandler::new(bot.clone())))
        .add_handler(Arc::new(StudyPackHandler::new(
            bot,
            pipeline,
            config.max_file_bytes(),
            config.delivery_mode(),
        )))
}

/// Main entry: validate config, init logging, build the chain, then run the REPL.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    config.validate()?;
    init_tracing(config.log_file())?;

    info!(
        model = %config.llm.llm_model,
        api_key = %openai_client::mask_token(&config.llm.openai_api_key),
        delivery = ?config.delivery_mode(),
        section_concurrency = config.qa.section_concurrency,
        max_qa_per_section = config.qa.max_qa_per_section,
        "Initializing bot"
    );

    let mut teloxide_bot = teloxide::Bot::new(config.bot_token());
    if let Some(url) = config.telegram_api_url() {
        teloxide_bot = teloxide_bot.set_api_url(reqwest::Url::parse(url)?);
    }

    let llm: Arc<dyn LlmClient> = Arc::new(OpenAILlmClient::with_base_url(
        config.llm.openai_api_key.clone(),
        config.llm.openai_base_url.clone(),
    ));
    let bot: Arc<dyn Bot> = Arc::new(TelegramBotAdapter::new(teloxide_bot.clone()));
    let chain = build_handler_chain(&config, bot.clone(), build_pipeline(&config, llm));

    info!("Bot started successfully");
    run_repl(teloxide_bot, bot, chain).await
}
