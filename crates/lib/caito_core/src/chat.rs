//! Chat history construction.
//!
//! Client turns pass through [`TurnFilter`] before they join the history.
//! A turn is admitted only when:
//!
//! - it is a JSON object,
//! - its role (`role`, or `speaker`) is exactly `user` or `assistant`,
//! - its sanitized content (`content`, or `text`) is non-empty.
//!
//! Everything else is dropped; the rejection reason is available from
//! [`TurnFilter::check`] for logging and tests.

use serde::Deserialize;
use serde_json::Value;

use crate::models::chat::{ChatHistory, ChatRole, ChatTurn};
use crate::sanitize::sanitize;

/// Persona of the CAITO assistant.
pub const DEFAULT_PERSONA: &str = "Ты — Фелис, дружелюбный ассистент компании CAITO M.U.I.T. \
Ты говоришь на русском, профессионально и понятно.";

/// Turn-like object sent by a client.
#[derive(Debug, Default, Deserialize)]
struct IncomingTurn {
    #[serde(default, alias = "speaker")]
    role: Option<String>,
    #[serde(default, alias = "text")]
    content: Option<String>,
}

/// Why a client turn was left out of the history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnRejection {
    NotAnObject,
    UnknownRole(Option<String>),
    EmptyContent,
}

/// Admission rule for client turns.
#[derive(Debug, Clone, Copy, Default)]
pub struct TurnFilter;

impl TurnFilter {
    /// Admit or reject a single client turn.
    pub fn check(&self, raw: &Value) -> Result<ChatTurn, TurnRejection> {
        if !raw.is_object() {
            return Err(TurnRejection::NotAnObject);
        }
        let incoming: IncomingTurn = match IncomingTurn::deserialize(raw) {
            Ok(turn) => turn,
            // Non-string role or content.
            Err(_) => IncomingTurn::default(),
        };

        let role = incoming
            .role
            .as_deref()
            .and_then(ChatRole::from_client_label)
            .ok_or(TurnRejection::UnknownRole(incoming.role.clone()))?;

        let content = sanitize(incoming.content.as_deref().unwrap_or_default());
        if content.is_empty() {
            return Err(TurnRejection::EmptyContent);
        }

        Ok(ChatTurn { role, content })
    }
}

/// Build the history sent to the chat model: the persona followed by every
/// admitted client turn, in order.
pub fn build_history(persona: &str, messages: &[Value]) -> ChatHistory {
    let filter = TurnFilter;
    let mut history = ChatHistory::with_persona(persona);
    for (index, raw) in messages.iter().enumerate() {
        match filter.check(raw) {
            Ok(turn) => history.push(turn),
            Err(reason) => tracing::debug!(index, ?reason, "dropping chat turn"),
        }
    }
    history
}
