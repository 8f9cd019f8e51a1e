//! Contact-request intake.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use caito_core::models::contact::ContactSubmission;
use serde_json::Value;
use tracing::warn;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{SubmissionResponse, SubmissionStatus};

pub const SUBMITTED_MESSAGE: &str = "Заявка успешно отправлена";
pub const MALFORMED_MESSAGE: &str = "Некорректный формат заявки";

/// `POST /api/request`: sanitize, validate and hand the form to the sink.
///
/// Answers with the sink's status (200 or 201) on success.
pub async fn submit_request(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<(StatusCode, Json<SubmissionResponse>)> {
    let request = parse_submission(&body)?.validate()?;

    let receipt = state.sink.submit(&request).await.map_err(|e| {
        warn!(sink = state.sink.name(), error = %e, "contact request not stored");
        AppError::from_sink(e)
    })?;

    let status = StatusCode::from_u16(receipt.status).unwrap_or(StatusCode::OK);
    Ok((
        status,
        Json(SubmissionResponse {
            status: SubmissionStatus::Success,
            message: SUBMITTED_MESSAGE.to_string(),
        }),
    ))
}

/// An empty body or JSON `null` is an empty form; anything but a JSON object
/// is malformed.
fn parse_submission(body: &[u8]) -> AppResult<ContactSubmission> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ContactSubmission::default());
    }
    let malformed = || AppError::InvalidSubmission(MALFORMED_MESSAGE.to_string());
    match serde_json::from_slice::<Value>(body).map_err(|_| malformed())? {
        Value::Null => Ok(ContactSubmission::default()),
        value @ Value::Object(_) => serde_json::from_value(value).map_err(|_| malformed()),
        _ => Err(malformed()),
    }
}
