//! API server configuration.

use std::time::Duration;

use url::Url;

/// Catalog collection of the production mock backend.
pub const DEFAULT_CATALOG_URL: &str = "https://6859802a138a18086dfea5ea.mockapi.io/kashchei777/catalog";

/// Request-log collection of the production mock backend.
pub const DEFAULT_LOG_URL: &str = "https://6859802a138a18086dfea5ea.mockapi.io/kashchei777/log";

/// Front-end origins allowed to call `/api/*`.
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "https://caito-muit.github.io",
    "https://daniildippel.github.io",
    "http://localhost:5173",
    "http://127.0.0.1:5501",
    "http://127.0.0.1:5000",
    "http://127.0.0.1:5500",
];

/// A request budget over a time window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Quota {
    pub limit: u32,
    pub period: Duration,
}

impl Quota {
    pub const fn per_minute(limit: u32) -> Self {
        Self {
            limit,
            period: Duration::from_secs(60),
        }
    }

    pub const fn per_day(limit: u32) -> Self {
        Self {
            limit,
            period: Duration::from_secs(24 * 60 * 60),
        }
    }
}

/// Per-IP rate-limit policies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimits {
    /// `POST /api/request`.
    pub intake: Vec<Quota>,
    /// `POST /api/chat`.
    pub chat: Vec<Quota>,
    /// Every other route.
    pub default: Vec<Quota>,
}

impl Default for RateLimits {
    fn default() -> Self {
        Self {
            intake: vec![Quota::per_minute(10)],
            chat: vec![Quota::per_minute(20)],
            default: vec![Quota::per_minute(10), Quota::per_day(100)],
        }
    }
}

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:5000").
    pub bind_addr: String,
    /// Catalog collaborator.
    pub catalog_url: Url,
    /// Origins allowed by CORS.
    pub allowed_origins: Vec<String>,
    /// System persona prepended to every chat history.
    pub persona: String,
    pub rate_limits: RateLimits,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5000".into(),
            catalog_url: Url::parse(DEFAULT_CATALOG_URL).expect("valid default catalog url"),
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|o| o.to_string())
                .collect(),
            persona: caito_core::chat::DEFAULT_PERSONA.to_string(),
            rate_limits: RateLimits::default(),
        }
    }
}

/// Split a comma-separated origin list, dropping blanks.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(|o| o.trim_end_matches('/').to_string())
        .collect()
}
