//! API response envelopes.

use serde::Serialize;

/// `{"error": "..."}`: used by the proxy, chat and HTTP-layer failures.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Outcome of a contact-request submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Success,
    Error,
}

/// `{"status": "success" | "error", "message": "..."}`.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionResponse {
    pub status: SubmissionStatus,
    pub message: String,
}

/// `{"message": "..."}`: the assistant's reply.
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub message: String,
}
