//! OpenAI chat-completion client.
//!
//! Calls `POST {base_url}/chat/completions` once per request. No retry.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{ChatModel, ChatModelConfig, LlmError};
use crate::models::chat::ChatHistory;

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a ChatHistory,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// [`ChatModel`] backed by an OpenAI-compatible API.
#[derive(Debug, Clone)]
pub struct OpenAiChatModel {
    client: Client,
    config: ChatModelConfig,
}

impl OpenAiChatModel {
    pub fn new(client: Client, config: ChatModelConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.as_str().trim_end_matches('/')
        )
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    async fn complete(&self, history: &ChatHistory) -> Result<String, LlmError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(LlmError::MissingApiKey)?;

        let resp = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&CompletionRequest {
                model: &self.config.model,
                messages: history,
                temperature: self.config.temperature,
                max_tokens: self.config.max_tokens,
            })
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(LlmError::Provider { status, body });
        }

        let data: CompletionResponse = resp.json().await?;
        let reply = data
            .choices
            .into_iter()
            .next()
            .ok_or(LlmError::EmptyReply)?
            .message
            .content
            .ok_or(LlmError::EmptyReply)?;

        let reply = reply.trim();
        if reply.is_empty() {
            return Err(LlmError::EmptyReply);
        }
        Ok(reply.to_string())
    }
}
