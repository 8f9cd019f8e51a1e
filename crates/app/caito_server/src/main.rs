//! CAITO request gateway server binary.
//!
//! Every option can also be supplied through the environment or a `.env`
//! file in the working directory.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use caito_api::config::{ApiConfig, DEFAULT_CATALOG_URL, DEFAULT_LOG_URL, Quota, RateLimits};
use caito_core::chat::DEFAULT_PERSONA;
use caito_core::llm::{ChatModelConfig, DEFAULT_BASE_URL, DEFAULT_MODEL, OpenAiChatModel};
use caito_core::sink::{RemoteLogSink, SqliteSink, SubmissionSink};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use url::Url;

/// Where validated contact requests are written.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SinkKind {
    /// POST to the remote request-log service.
    Remote,
    /// Insert into a local SQLite table.
    Sqlite,
}

/// CLI arguments for the gateway.
#[derive(Parser, Debug)]
#[command(name = "caito_server", about = "CAITO request gateway", version)]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:5000")]
    bind_addr: String,

    /// Catalog collaborator URL.
    #[arg(long, env = "CATALOG_URL", default_value = DEFAULT_CATALOG_URL)]
    catalog_url: Url,

    /// Remote request-log URL (used by the `remote` sink).
    #[arg(long, env = "LOG_URL", default_value = DEFAULT_LOG_URL)]
    log_url: Url,

    /// Submission sink.
    #[arg(long, env = "SUBMISSION_SINK", value_enum, default_value_t = SinkKind::Remote)]
    sink: SinkKind,

    /// SQLite database URL (used by the `sqlite` sink).
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://requests.db")]
    database_url: String,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,

    /// Comma-separated CORS origin allow-list. Defaults to the production
    /// front-ends.
    #[arg(long, env = "ALLOWED_ORIGINS")]
    allowed_origins: Option<String>,

    /// Chat-model API key.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: Option<String>,

    /// OpenAI-compatible API root.
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    openai_base_url: Url,

    /// Completion model.
    #[arg(long, env = "OPENAI_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// System persona prepended to every chat.
    #[arg(long, env = "ASSISTANT_PERSONA", default_value = DEFAULT_PERSONA)]
    persona: String,

    /// Contact submissions per minute per IP.
    #[arg(
        long,
        env = "INTAKE_RATE_PER_MINUTE",
        value_parser = clap::value_parser!(u32).range(1..),
        default_value_t = 10
    )]
    intake_per_minute: u32,

    /// Chat requests per minute per IP.
    #[arg(
        long,
        env = "CHAT_RATE_PER_MINUTE",
        value_parser = clap::value_parser!(u32).range(1..),
        default_value_t = 20
    )]
    chat_per_minute: u32,

    /// Requests per minute per IP on the other routes.
    #[arg(
        long,
        env = "DEFAULT_RATE_PER_MINUTE",
        value_parser = clap::value_parser!(u32).range(1..),
        default_value_t = 10
    )]
    default_per_minute: u32,

    /// Requests per day per IP on the other routes.
    #[arg(
        long,
        env = "DEFAULT_RATE_PER_DAY",
        value_parser = clap::value_parser!(u32).range(1..),
        default_value_t = 100
    )]
    default_per_day: u32,

    /// Timeout for calls to collaborators, in seconds. Unbounded when unset.
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS")]
    upstream_timeout_secs: Option<u64>,
}

impl Args {
    fn api_config(&self) -> ApiConfig {
        let defaults = ApiConfig::default();
        ApiConfig {
            bind_addr: self.bind_addr.clone(),
            catalog_url: self.catalog_url.clone(),
            allowed_origins: self
                .allowed_origins
                .as_deref()
                .map(caito_api::config::parse_origins)
                .unwrap_or(defaults.allowed_origins),
            persona: self.persona.clone(),
            rate_limits: RateLimits {
                intake: vec![Quota::per_minute(self.intake_per_minute)],
                chat: vec![Quota::per_minute(self.chat_per_minute)],
                default: vec![
                    Quota::per_minute(self.default_per_minute),
                    Quota::per_day(self.default_per_day),
                ],
            },
        }
    }

    fn chat_model_config(&self) -> ChatModelConfig {
        ChatModelConfig {
            api_key: self.openai_api_key.clone(),
            base_url: self.openai_base_url.clone(),
            model: self.model.clone(),
            ..ChatModelConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,caito_api=debug,caito_core=debug".into()),
        )
        .init();

    let args = Args::parse();
    let config = args.api_config();

    info!(
        version = caito_core::version(),
        bind_addr = %config.bind_addr,
        catalog_url = %config.catalog_url,
        sink = ?args.sink,
        origins = config.allowed_origins.len(),
        "starting caito_server"
    );

    let mut http = reqwest::Client::builder();
    if let Some(secs) = args.upstream_timeout_secs {
        http = http.timeout(Duration::from_secs(secs));
    }
    let http = http.build()?;

    let sink: Arc<dyn SubmissionSink> = match args.sink {
        SinkKind::Remote => {
            info!(log_url = %args.log_url, "using remote request log");
            Arc::new(RemoteLogSink::new(http.clone(), args.log_url.clone()))
        }
        SinkKind::Sqlite => {
            info!(database_url = %args.database_url, "opening request store");
            Arc::new(SqliteSink::connect(&args.database_url, args.max_connections).await?)
        }
    };

    let chat_config = args.chat_model_config();
    if chat_config.api_key.is_none() {
        warn!("OPENAI_API_KEY is not set; /api/chat will answer with errors");
    }
    info!(model = %chat_config.model, "chat relay configured");
    let chat_model = Arc::new(OpenAiChatModel::new(http.clone(), chat_config));

    let state = caito_api::AppState {
        config: config.clone(),
        http,
        sink,
        chat_model,
    };

    let app = caito_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, "REST API listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
