//! Application error types.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header::RETRY_AFTER},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use caito_core::sink::SinkError;
use caito_core::validation::ValidationError;

use crate::models::{ErrorResponse, SubmissionResponse, SubmissionStatus};

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Message returned when the collaborator behind the request log rejects a
/// submission.
pub const SINK_REJECTED_MESSAGE: &str = "Ошибка сервиса заявок";

/// Application-level errors with HTTP status mapping.
///
/// Contact submissions answer with the `{status, message}` envelope; every
/// other failure answers with `{error}`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    /// A collaborator could not be reached or returned garbage.
    #[error("{0}")]
    Upstream(String),

    #[error("Invalid submission: {0}")]
    InvalidSubmission(String),

    #[error("Submission failed with status {status}: {message}")]
    Submission { status: StatusCode, message: String },

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("not found")]
    NotFound,

    #[error("Слишком много запросов, попробуйте позже")]
    RateLimited { retry_after_secs: u64 },
}

impl AppError {
    /// Map a sink failure onto the submission envelope.
    pub fn from_sink(e: SinkError) -> Self {
        match e {
            SinkError::Rejected(code) => AppError::Submission {
                status: StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                message: SINK_REJECTED_MESSAGE.to_string(),
            },
            other => AppError::Submission {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: format!("Ошибка сервера: {other}"),
            },
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::InvalidSubmission(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Submission { status, .. } => *status,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::InvalidSubmission(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let text = self.to_string();
        match self {
            AppError::InvalidSubmission(message) | AppError::Submission { message, .. } => {
                let body = Json(SubmissionResponse {
                    status: SubmissionStatus::Error,
                    message,
                });
                (status, body).into_response()
            }
            AppError::RateLimited { retry_after_secs } => {
                let body = Json(ErrorResponse { error: text });
                let mut resp = (status, body).into_response();
                resp.headers_mut()
                    .insert(RETRY_AFTER, HeaderValue::from(retry_after_secs));
                resp
            }
            _ => (status, Json(ErrorResponse { error: text })).into_response(),
        }
    }
}
