//! Remote request-log sink.

use async_trait::async_trait;
use reqwest::Client;
use tracing::info;
use url::Url;

use super::{SinkError, SinkReceipt, SubmissionSink};
use crate::models::contact::ContactRequest;
use crate::proxy::{Passthrough, fetch_json};

/// Forwards requests to a remote log collection (`POST` to write, `GET` to
/// list).
#[derive(Debug, Clone)]
pub struct RemoteLogSink {
    client: Client,
    url: Url,
}

impl RemoteLogSink {
    pub fn new(client: Client, url: Url) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl SubmissionSink for RemoteLogSink {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn submit(&self, request: &ContactRequest) -> Result<SinkReceipt, SinkError> {
        let resp = self
            .client
            .post(self.url.as_str())
            .json(request)
            .send()
            .await?;

        let status = resp.status().as_u16();
        match status {
            200 | 201 => {
                info!(status, "contact request forwarded to remote log");
                Ok(SinkReceipt { status })
            }
            other => Err(SinkError::Rejected(other)),
        }
    }

    async fn list(&self) -> Result<Passthrough, SinkError> {
        Ok(fetch_json(&self.client, &self.url).await?)
    }
}
