//! Submission sinks: where validated contact requests are written.
//!
//! Two implementations share one [`SubmissionSink`] trait:
//!
//! - [`remote::RemoteLogSink`]: POSTs to a remote request-log service
//! - [`sqlite::SqliteSink`]: inserts into a local `requests` table
//!
//! The deployment picks one at startup; handlers only see the trait object.

pub mod remote;
pub mod sqlite;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::contact::ContactRequest;
use crate::proxy::{Passthrough, ProxyError};

pub use remote::RemoteLogSink;
pub use sqlite::SqliteSink;

/// Errors raised by a sink.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The collaborator answered with a status other than 200/201.
    #[error("collaborator rejected the request with status {0}")]
    Rejected(u16),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Proxy(#[from] ProxyError),

    #[error(transparent)]
    Db(#[from] sqlx::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Outcome of a successful write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkReceipt {
    /// HTTP status to report to the client (200 or 201).
    pub status: u16,
}

/// Destination for validated contact requests.
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Write one request. Called at most once per inbound submission.
    async fn submit(&self, request: &ContactRequest) -> Result<SinkReceipt, SinkError>;

    /// List previously written requests as JSON.
    async fn list(&self) -> Result<Passthrough, SinkError>;
}
