//! Chat-model collaborator.
//!
//! [`ChatModel`] is the seam handlers talk to; [`openai::OpenAiChatModel`]
//! is the production implementation for any OpenAI-compatible
//! `/chat/completions` endpoint.

pub mod openai;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

use crate::models::chat::ChatHistory;

pub use openai::OpenAiChatModel;

/// Default OpenAI-compatible API root.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default completion model.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Errors raised by a chat model. Never retried.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API key is not configured")]
    MissingApiKey,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("response contained no reply text")]
    EmptyReply,
}

/// Completion parameters.
#[derive(Debug, Clone)]
pub struct ChatModelConfig {
    pub api_key: Option<String>,
    pub base_url: Url,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for ChatModelConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: Url::parse(DEFAULT_BASE_URL).expect("valid default base url"),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 512,
        }
    }
}

/// Produces one assistant reply for a chat history.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Returns the top completion's text, trimmed.
    async fn complete(&self, history: &ChatHistory) -> Result<String, LlmError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_deployment() {
        let config = ChatModelConfig::default();
        assert!(config.api_key.is_none());
        assert_eq!(config.base_url.as_str(), "https://api.openai.com/v1");
        assert_eq!(config.model, "gpt-3.5-turbo");
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.max_tokens, 512);
    }
}
