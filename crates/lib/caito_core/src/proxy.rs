//! Read-only pass-through client for remote JSON collaborators.
//!
//! Used for the catalog and for the remote request log. Whatever the
//! collaborator answers is the full answer: no caching, no pagination.

use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use url::Url;

/// Errors raised while fetching from a collaborator.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Transport failure, or a body that is not JSON.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// A collaborator response, relayed as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct Passthrough {
    pub status: u16,
    pub body: Value,
}

/// `GET url` and decode the body as JSON, keeping the upstream status.
pub async fn fetch_json(client: &Client, url: &Url) -> Result<Passthrough, ProxyError> {
    let resp = client.get(url.as_str()).send().await?;
    let status = resp.status().as_u16();
    let body = resp.json::<Value>().await?;
    Ok(Passthrough { status, body })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn relays_body_and_status() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/catalog")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id":"1","title":"Сайт-визитка","price":15000}]"#)
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/catalog", server.url())).unwrap();
        let resp = fetch_json(&Client::new(), &url).await.unwrap();

        mock.assert_async().await;
        assert_eq!(resp.status, 200);
        assert_eq!(
            resp.body,
            json!([{"id": "1", "title": "Сайт-визитка", "price": 15000}])
        );
    }

    #[tokio::test]
    async fn keeps_non_success_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/catalog")
            .with_status(404)
            .with_body(r#""Not found""#)
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/catalog", server.url())).unwrap();
        let resp = fetch_json(&Client::new(), &url).await.unwrap();

        assert_eq!(resp.status, 404);
        assert_eq!(resp.body, json!("Not found"));
    }

    #[tokio::test]
    async fn non_json_body_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/catalog")
            .with_status(502)
            .with_body("<html>Bad Gateway</html>")
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/catalog", server.url())).unwrap();
        let err = fetch_json(&Client::new(), &url).await.unwrap_err();

        assert!(matches!(err, ProxyError::Http(_)));
    }

    #[tokio::test]
    async fn unreachable_collaborator_is_an_error() {
        let url = Url::parse("http://127.0.0.1:9/catalog").unwrap();
        let err = fetch_json(&Client::new(), &url).await.unwrap_err();
        assert!(!err.to_string().is_empty());
    }
}
