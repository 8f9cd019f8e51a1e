//! Local relational sink backed by SQLite.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;

use super::{SinkError, SinkReceipt, SubmissionSink};
use crate::migrate::migrate;
use crate::models::contact::{ContactRequest, StoredRequest};
use crate::proxy::Passthrough;

/// Writes each request as one row of the `requests` table.
#[derive(Debug, Clone)]
pub struct SqliteSink {
    pool: SqlitePool,
}

impl SqliteSink {
    /// Wrap an existing pool. Migrations must already have run.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if missing) the database at `database_url` and run
    /// migrations, so the `requests` table exists before the first insert.
    ///
    /// Connections are never recycled, which keeps `sqlite::memory:`
    /// databases alive for the lifetime of the pool.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, SinkError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        migrate(&pool).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// All stored requests, oldest first.
    pub async fn all(&self) -> Result<Vec<StoredRequest>, sqlx::Error> {
        sqlx::query_as::<_, StoredRequest>(
            r#"
            SELECT id, name, phone, email, message
            FROM requests
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }
}

#[async_trait]
impl SubmissionSink for SqliteSink {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn submit(&self, request: &ContactRequest) -> Result<SinkReceipt, SinkError> {
        let result = sqlx::query(
            r#"
            INSERT INTO requests (name, phone, email, message)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(request.name())
        .bind(request.phone())
        .bind(request.email())
        .bind(request.message())
        .execute(&self.pool)
        .await?;

        info!(id = result.last_insert_rowid(), "contact request stored");
        Ok(SinkReceipt { status: 200 })
    }

    async fn list(&self) -> Result<Passthrough, SinkError> {
        let rows = self.all().await?;
        Ok(Passthrough {
            status: 200,
            body: serde_json::to_value(rows)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::contact::ContactSubmission;

    async fn memory_sink() -> SqliteSink {
        SqliteSink::connect("sqlite::memory:", 1)
            .await
            .expect("in-memory sqlite")
    }

    fn request(name: &str, email: &str) -> ContactRequest {
        ContactSubmission {
            name: Some(name.into()),
            phone: Some("+79161234567".into()),
            email: Some(email.into()),
            message: Some("Нужен сайт".into()),
        }
        .validate()
        .unwrap()
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let sink = memory_sink().await;

        let receipt = sink.submit(&request("Ann", "ann@example.com")).await.unwrap();
        assert_eq!(receipt.status, 200);
        sink.submit(&request("Bob", "")).await.unwrap();

        let rows = sink.all().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, 1);
        assert_eq!(rows[0].name, "Ann");
        assert_eq!(rows[0].email.as_deref(), Some("ann@example.com"));
        assert_eq!(rows[0].message.as_deref(), Some("Нужен сайт"));
        assert_eq!(rows[1].id, 2);
        assert_eq!(rows[1].email.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn migrations_are_repeatable() {
        let sink = memory_sink().await;
        migrate(sink.pool()).await.unwrap();
        assert!(sink.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_returns_rows_as_json() {
        let sink = memory_sink().await;
        sink.submit(&request("Ann", "")).await.unwrap();

        let listing = sink.list().await.unwrap();
        assert_eq!(listing.status, 200);
        assert_eq!(
            listing.body,
            json!([{
                "id": 1,
                "name": "Ann",
                "phone": "+79161234567",
                "email": "",
                "message": "Нужен сайт"
            }])
        );
    }

    #[tokio::test]
    async fn store_errors_surface() {
        let sink = memory_sink().await;
        sqlx::query("DROP TABLE requests")
            .execute(sink.pool())
            .await
            .unwrap();

        let err = sink.submit(&request("Ann", "")).await.unwrap_err();
        assert!(matches!(err, SinkError::Db(_)));
        assert!(err.to_string().contains("requests"));
    }
}
