use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for LLM operations
pub type LLMResult<T> = anyhow::Result<T>;

/// Configuration for generation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Temperature for sampling (0.0 to 2.0)
    pub temperature: f32,
    /// Maximum tokens to generate
    pub max_tokens: Option<usize>,
    /// Top-p nucleus sampling parameter
    pub top_p: Option<f32>,
    /// Stop sequences
    pub stop: Option<Vec<String>>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: Some(2000),
            top_p: None,
            stop: None,
        }
    }
}

/// A message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

/// Role of a message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// Response from the LLM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMResponse {
    /// Generated text content
    pub content: String,
    /// Total tokens used in the request
    pub total_tokens: Option<usize>,
    /// Tokens used in the prompt
    pub prompt_tokens: Option<usize>,
    /// Tokens generated in the completion
    pub completion_tokens: Option<usize>,
    /// Finish reason (e.g., "stop", "length")
    pub finish_reason: Option<String>,
    /// Model used for generation
    pub model: String,
}

/// Main trait for LLM providers
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Generate a completion for a single prompt
    async fn generate(&self, prompt: &str) -> LLMResult<LLMResponse> {
        let messages = vec![Message {
            role: MessageRole::User,
            content: prompt.to_string(),
        }];
        self.generate_chat(&messages, &GenerationConfig::default())
            .await
    }

    /// Generate a completion with a system instruction ahead of the prompt
    async fn generate_with_system(&self, system: &str, prompt: &str) -> LLMResult<LLMResponse> {
        let messages = vec![
            Message {
                role: MessageRole::System,
                content: system.to_string(),
            },
            Message {
                role: MessageRole::User,
                content: prompt.to_string(),
            },
        ];
        self.generate_chat(&messages, &GenerationConfig::default())
            .await
    }

    /// Generate a chat completion with message history
    async fn generate_chat(
        &self,
        messages: &[Message],
        config: &GenerationConfig,
    ) -> LLMResult<LLMResponse>;

    /// Check if the provider is available and ready
    async fn is_available(&self) -> bool;

    /// Get the name of this provider
    fn provider_name(&self) -> &str;

    /// Get the model identifier
    fn model_name(&self) -> &str;
}
