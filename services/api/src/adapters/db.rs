//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, a concrete implementation of the
//! `IssueRepository` port from the `core` crate backed by PostgreSQL via `sqlx`.
//! It keeps the same id and timestamp rules as the file store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use newsroom_core::archive::new_issue_id;
use newsroom_core::domain::{DomainError, GeneratedContent, IssueStatus, NewsIssueDraft};
use newsroom_core::ports::{IssueRepository, PortError, PortResult};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::warn;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `IssueRepository` port.
#[derive(Clone)]
pub struct PgIssueStore {
    pool: PgPool,
}

impl PgIssueStore {
    /// Creates a new `PgIssueStore`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct IssueRecord {
    id: String,
    text_data: Json<NewsIssueDraft>,
    image_base64: Option<String>,
    publication_type: String,
    theme: String,
    status: Option<String>,
    published_at: Option<DateTime<Utc>>,
}

impl IssueRecord {
    fn to_domain(self) -> PortResult<GeneratedContent> {
        let corrupt = |e: DomainError| {
            PortError::Storage(format!("Issue {} has an invalid column: {}", self.id, e))
        };
        Ok(GeneratedContent {
            publication_type: self.publication_type.parse().map_err(corrupt)?,
            theme: self.theme.parse().map_err(corrupt)?,
            status: self.status.as_deref().map(|s| s.parse::<IssueStatus>()).transpose().map_err(corrupt)?,
            id: Some(self.id.clone()),
            text_data: self.text_data.0,
            image_base64: self.image_base64,
            published_at: self.published_at,
        })
    }
}

fn storage_error(e: sqlx::Error) -> PortError {
    PortError::Storage(e.to_string())
}

const COLUMNS: &str =
    "id, text_data, image_base64, publication_type, theme, status, published_at";

//=========================================================================================
// `IssueRepository` Trait Implementation
//=========================================================================================

#[async_trait]
impl IssueRepository for PgIssueStore {
    async fn list(&self) -> PortResult<Vec<GeneratedContent>> {
        let records: Vec<IssueRecord> =
            sqlx::query_as(&format!("SELECT {} FROM issues ORDER BY seq ASC", COLUMNS))
                .fetch_all(&self.pool)
                .await
                .map_err(storage_error)?;

        records.into_iter().map(IssueRecord::to_domain).collect()
    }

    async fn save(&self, content: GeneratedContent) -> PortResult<GeneratedContent> {
        let status = content.status.map(|s| s.as_str());

        if let Some(id) = content.id.as_deref() {
            let updated: Option<IssueRecord> = sqlx::query_as(&format!(
                "UPDATE issues SET text_data = $2, image_base64 = $3, publication_type = $4, \
                 theme = $5, status = $6 WHERE id = $1 RETURNING {}",
                COLUMNS
            ))
            .bind(id)
            .bind(Json(&content.text_data))
            .bind(content.image_base64.as_deref())
            .bind(content.publication_type.as_str())
            .bind(content.theme.as_str())
            .bind(status)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;

            match updated {
                Some(record) => return record.to_domain(),
                None => warn!(id, "Saving issue with unknown id as a new issue"),
            }
        }

        let record: IssueRecord = sqlx::query_as(&format!(
            "INSERT INTO issues (id, text_data, image_base64, publication_type, theme, status, published_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            COLUMNS
        ))
        .bind(new_issue_id())
        .bind(Json(&content.text_data))
        .bind(content.image_base64.as_deref())
        .bind(content.publication_type.as_str())
        .bind(content.theme.as_str())
        .bind(status)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error)?;

        record.to_domain()
    }
}
