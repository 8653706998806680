//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::db_error::is_unique_violation_on_code;

const LINK_COLUMNS: &str = "id, short_code, original_url, clicks, last_clicked_at, created_at";

/// Row shape of the `links` table.
#[derive(Debug, FromRow)]
struct LinkRow {
    id: i64,
    short_code: String,
    original_url: String,
    clicks: i64,
    last_clicked_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<LinkRow> for Link {
    fn from(r: LinkRow) -> Self {
        Link::new(
            r.id,
            r.short_code,
            r.original_url,
            r.clicks,
            r.last_clicked_at,
            r.created_at,
        )
    }
}

/// PostgreSQL repository for link storage and retrieval.
///
/// Code uniqueness is enforced by the `links_short_code_key` constraint; visit
/// counting is a single `UPDATE ... SET clicks = clicks + 1` so concurrent
/// redirects never lose increments.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            "INSERT INTO links (short_code, original_url) VALUES ($1, $2) RETURNING {LINK_COLUMNS}"
        ))
        .bind(&new_link.short_code)
        .bind(&new_link.original_url)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| {
            if is_unique_violation_on_code(&e) {
                AppError::conflict(
                    "Code already exists",
                    json!({ "code": new_link.short_code }),
                )
            } else {
                AppError::from(e)
            }
        })?;

        Ok(row.into())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE short_code = $1"
        ))
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn list_all(&self) -> Result<Vec<Link>, AppError> {
        let rows = sqlx::query_as::<_, LinkRow>(&format!(
            "SELECT {LINK_COLUMNS} FROM links ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Link::from).collect())
    }

    async fn delete_by_code(&self, code: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM links WHERE short_code = $1")
            .bind(code)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn record_visit(&self, code: &str, visited_at: DateTime<Utc>) -> Result<bool, AppError> {
        // GREATEST ignores NULL, so the first visit simply sets the timestamp
        let result = sqlx::query(
            r#"
            UPDATE links
            SET clicks = clicks + 1,
                last_clicked_at = GREATEST(last_clicked_at, $2)
            WHERE short_code = $1
            "#,
        )
        .bind(code)
        .bind(visited_at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
