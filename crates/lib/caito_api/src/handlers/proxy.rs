//! Read-only pass-through handlers for the catalog and the request log.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use caito_core::proxy::{Passthrough, fetch_json};
use tracing::warn;

use crate::AppState;
use crate::error::{AppError, AppResult};

/// `GET /api/catalog`: relay the catalog collaborator's answer verbatim.
pub async fn get_catalog(State(state): State<AppState>) -> AppResult<Response> {
    let resp = fetch_json(&state.http, &state.config.catalog_url)
        .await
        .map_err(|e| {
            warn!(error = %e, "catalog fetch failed");
            AppError::Upstream(format!("Не удалось загрузить каталог: {e}"))
        })?;
    Ok(relay(resp))
}

/// `GET /api/requests`: list stored contact requests from the active sink.
pub async fn list_requests(State(state): State<AppState>) -> AppResult<Response> {
    let resp = state.sink.list().await.map_err(|e| {
        warn!(sink = state.sink.name(), error = %e, "request log fetch failed");
        AppError::Upstream(format!("Не удалось загрузить список заявок: {e}"))
    })?;
    Ok(relay(resp))
}

fn relay(resp: Passthrough) -> Response {
    let status = StatusCode::from_u16(resp.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(resp.body)).into_response()
}
