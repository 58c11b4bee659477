//! Completion service configuration: trait and env-based implementation.

use anyhow::{Context, Result};
use std::env;

/// Default model when neither MODEL nor OPENAI_MODEL is set.
pub const DEFAULT_MODEL: &str = "gpt-5";

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration interface for OpenAI-compatible completion APIs.
pub trait LlmConfig: Send + Sync {
    fn api_key(&self) -> &str;
    fn base_url(&self) -> &str;
    fn model(&self) -> &str;
    fn system_prompt(&self) -> Option<&str>;
}

/// Completion config loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EnvLlmConfig {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub llm_model: String,
    pub llm_system_prompt: Option<String>,
}

impl LlmConfig for EnvLlmConfig {
    fn api_key(&self) -> &str {
        &self.openai_api_key
    }
    fn base_url(&self) -> &str {
        &self.openai_base_url
    }
    fn model(&self) -> &str {
        &self.llm_model
    }
    fn system_prompt(&self) -> Option<&str> {
        self.llm_system_prompt.as_deref()
    }
}

impl EnvLlmConfig {
    /// Loads OPENAI_API_KEY (required), OPENAI_BASE_URL, MODEL (or OPENAI_MODEL) and
    /// SYSTEM_PROMPT (or LLM_SYSTEM_PROMPT; blank values are ignored).
    pub fn from_env() -> Result<Self> {
        let openai_api_key = env::var("OPENAI_API_KEY").context("OPENAI_API_KEY not set")?;
        let openai_base_url =
            env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let llm_model = env::var("MODEL")
            .or_else(|_| env::var("OPENAI_MODEL"))
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let llm_system_prompt = env::var("SYSTEM_PROMPT")
            .or_else(|_| env::var("LLM_SYSTEM_PROMPT"))
            .ok()
            .filter(|s| !s.trim().is_empty());
        Ok(Self {
            openai_api_key,
            openai_base_url,
            llm_model,
            llm_system_prompt,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear() {
        for key in [
            "OPENAI_API_KEY",
            "OPENAI_BASE_URL",
            "MODEL",
            "OPENAI_MODEL",
            "SYSTEM_PROMPT",
            "LLM_SYSTEM_PROMPT",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn from_env_defaults() {
        clear();
        env::set_var("OPENAI_API_KEY", "test_key");

        let cfg = EnvLlmConfig::from_env().unwrap();
        assert_eq!(cfg.api_key(), "test_key");
        assert_eq!(cfg.base_url(), DEFAULT_BASE_URL);
        assert_eq!(cfg.model(), DEFAULT_MODEL);
        assert!(cfg.system_prompt().is_none());
        clear();
    }

    #[test]
    #[serial]
    fn from_env_openai_model_fallback_and_blank_prompt() {
        clear();
        env::set_var("OPENAI_API_KEY", "test_key");
        env::set_var("OPENAI_MODEL", "gpt-4o-mini");
        env::set_var("SYSTEM_PROMPT", "   ");

        let cfg = EnvLlmConfig::from_env().unwrap();
        assert_eq!(cfg.model(), "gpt-4o-mini");
        assert!(cfg.system_prompt().is_none());
        clear();
    }

    #[test]
    #[serial]
    fn from_env_requires_api_key() {
        clear();
        assert!(EnvLlmConfig::from_env().is_err());
    }
}
