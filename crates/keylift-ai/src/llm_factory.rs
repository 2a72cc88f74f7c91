use crate::llm_provider::LLMProvider;
use crate::openai_provider::{OpenAIConfig, OpenAIProvider};
use anyhow::{anyhow, Result};
use keylift_core::LlmSettings;
use secrecy::ExposeSecret;
use std::sync::Arc;

/// Factory for creating LLM providers based on configuration
pub struct LlmProviderFactory;

impl LlmProviderFactory {
    /// Create an LLM provider from settings. Returns an error when the
    /// provider is disabled, unknown, or missing credentials; callers that
    /// can degrade (the keyword generator) treat the error as "no provider"
    /// and take the template fallback path.
    pub fn create_from_settings(settings: &LlmSettings) -> Result<Arc<dyn LLMProvider>> {
        if !settings.enabled {
            return Err(anyhow!("LLM is not enabled in configuration"));
        }

        let provider_name = settings.provider.to_lowercase();

        match provider_name.as_str() {
            "openai" | "openai-compatible" => Self::create_openai_provider(settings),
            _ => Err(anyhow!(
                "Unsupported LLM provider: {}. Available providers: openai, openai-compatible",
                provider_name
            )),
        }
    }

    fn create_openai_provider(settings: &LlmSettings) -> Result<Arc<dyn LLMProvider>> {
        let api_key = settings
            .api_key
            .as_ref()
            .map(|k| k.expose_secret().to_string())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .unwrap_or_default();

        let config = OpenAIConfig {
            api_key,
            base_url: settings.base_url.clone(),
            model: settings.model.clone(),
            timeout_secs: settings.timeout_secs,
            max_retries: settings.max_retries,
        };

        Ok(Arc::new(OpenAIProvider::new(config)?) as Arc<dyn LLMProvider>)
    }
}
