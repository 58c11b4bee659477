//! BotConfig: BaseConfig + completion config + QaConfig. Use load() for env-based loading.

use anyhow::Result;
use llm_client::{EnvLlmConfig, LlmConfig};
use qa::{GeneratorConfig, PipelineConfig};

use super::{BaseConfig, DeliveryMode, QaConfig};

/// Full bot config. Call validate() after load() to fail fast before init.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub base: BaseConfig,
    pub llm: EnvLlmConfig,
    pub qa: QaConfig,
}

impl BotConfig {
    /// Load full config from environment variables. If `token` is provided it overrides BOT_TOKEN.
    pub fn load(token: Option<String>) -> Result<Self> {
        let base = BaseConfig::load(token)?;
        let llm = EnvLlmConfig::from_env()?;
        let qa = QaConfig::from_env()?;
        Ok(Self { base, llm, qa })
    }

    pub fn validate(&self) -> Result<()> {
        self.base.validate()?;
        if reqwest::Url::parse(self.llm.base_url()).is_err() {
            anyhow::bail!("OPENAI_BASE_URL is not a valid URL: {}", self.llm.base_url());
        }
        self.qa.validate()
    }

    pub fn bot_token(&self) -> &str {
        &self.base.bot_token
    }
    pub fn log_file(&self) -> &str {
        &self.base.log_file
    }
    pub fn telegram_api_url(&self) -> Option<&str> {
        self.base.telegram_api_url.as_deref()
    }
    pub fn llm_config(&self) -> &dyn LlmConfig {
        &self.llm
    }
    pub fn delivery_mode(&self) -> DeliveryMode {
        self.qa.delivery_mode
    }
    pub fn max_file_bytes(&self) -> u64 {
        self.qa.max_file_bytes
    }
    pub fn generator_config(&self) -> GeneratorConfig {
        self.qa.generator_config(&self.llm)
    }
    pub fn pipeline_config(&self) -> PipelineConfig {
        self.qa.pipeline_config()
    }
}
