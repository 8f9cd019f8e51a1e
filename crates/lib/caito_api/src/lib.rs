//! # caito_api
//!
//! HTTP API library for the CAITO request gateway.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderValue, Method, header::CONTENT_TYPE};
use axum::routing::{MethodRouter, get, post};
use caito_core::llm::ChatModel;
use caito_core::sink::SubmissionSink;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use crate::config::{ApiConfig, Quota};
use crate::handlers::{chat, fallback, proxy, request};
use crate::middleware::rate_limit::{self, RateLimiter};

pub const CATALOG_PATH: &str = "/api/catalog";
pub const REQUESTS_PATH: &str = "/api/requests";
pub const REQUEST_PATH: &str = "/api/request";
pub const CHAT_PATH: &str = "/api/chat";

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: ApiConfig,
    /// Client for the catalog collaborator.
    pub http: reqwest::Client,
    /// Destination of validated contact requests.
    pub sink: Arc<dyn SubmissionSink>,
    /// Language-model collaborator.
    pub chat_model: Arc<dyn ChatModel>,
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let limits = &state.config.rate_limits;

    let api = Router::new()
        .route(
            CATALOG_PATH,
            limited(get(proxy::get_catalog), &limits.default),
        )
        .route(
            REQUESTS_PATH,
            limited(get(proxy::list_requests), &limits.default),
        )
        .route(
            REQUEST_PATH,
            limited(post(request::submit_request), &limits.intake),
        )
        .route(CHAT_PATH, limited(post(chat::chat), &limits.chat));

    api.fallback(fallback::not_found)
        .layer(cors_layer(&state.config.allowed_origins))
        .with_state(state)
}

/// Answer unsupported methods with JSON 405 and attach a per-route limiter.
fn limited(route: MethodRouter<AppState>, quotas: &[Quota]) -> MethodRouter<AppState> {
    let route = route.fallback(fallback::method_not_allowed);
    if quotas.is_empty() {
        return route;
    }
    let limiter = Arc::new(RateLimiter::new(quotas));
    route.route_layer(axum::middleware::from_fn_with_state(
        limiter,
        rate_limit::enforce,
    ))
}

/// CORS restricted to the configured front-end origins.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
}
