//! PostgreSQL implementation of the short link repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use super::rows::{SHORT_LINK_COLUMNS, ShortLinkRow, name_conflict};
use crate::domain::entities::{NewShortLink, ShortLink, ShortLinkPatch};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use serde_json::json;

/// PostgreSQL repository for short links.
///
/// Every code and alias is also a row in `link_names`, whose primary key
/// enforces the combined namespace. The link row and its names are written in
/// one transaction.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let mut tx = self.pool.begin().await?;

        let row: ShortLinkRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO short_links (code, alias, target_url, description, tags, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {SHORT_LINK_COLUMNS}
            "#
        ))
        .bind(&new_link.code)
        .bind(&new_link.alias)
        .bind(&new_link.target_url)
        .bind(&new_link.description)
        .bind(&new_link.tags)
        .bind(new_link.expires_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            let field = match e.as_database_error().and_then(|db| db.constraint()) {
                Some("short_links_alias_key") => "alias",
                _ => "code",
            };
            let name = if field == "alias" {
                new_link.alias.as_deref().unwrap_or_default()
            } else {
                &new_link.code
            };
            name_conflict(e, field, name)
        })?;
        let link = ShortLink::from(row);

        sqlx::query("INSERT INTO link_names (name, short_link_id) VALUES ($1, $2)")
            .bind(&link.code)
            .bind(link.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| name_conflict(e, "code", &link.code))?;

        if let Some(ref alias) = link.alias {
            sqlx::query("INSERT INTO link_names (name, short_link_id) VALUES ($1, $2)")
                .bind(alias)
                .bind(link.id)
                .execute(&mut *tx)
                .await
                .map_err(|e| name_conflict(e, "alias", alias))?;
        }

        tx.commit().await?;
        Ok(link)
    }

    async fn find_by_code_or_alias(&self, name: &str) -> Result<Option<ShortLink>, AppError> {
        let row: Option<ShortLinkRow> = sqlx::query_as(&format!(
            r#"
            SELECT {SHORT_LINK_COLUMNS}
            FROM short_links
            WHERE id = (SELECT short_link_id FROM link_names WHERE name = $1)
            "#
        ))
        .bind(name)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ShortLink::from))
    }

    async fn name_exists(&self, name: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM link_names WHERE name = $1)")
                .bind(name)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(exists)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ShortLink>, AppError> {
        let row: Option<ShortLinkRow> = sqlx::query_as(&format!(
            "SELECT {SHORT_LINK_COLUMNS} FROM short_links WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ShortLink::from))
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<ShortLink>, AppError> {
        let rows: Vec<ShortLinkRow> = sqlx::query_as(&format!(
            r#"
            SELECT {SHORT_LINK_COLUMNS}
            FROM short_links
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(ShortLink::from).collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM short_links")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn update(&self, id: i64, patch: ShortLinkPatch) -> Result<ShortLink, AppError> {
        let (description_set, description) = match patch.description {
            Some(value) => (true, value),
            None => (false, None),
        };
        let (expires_set, expires_at) = match patch.expires_at {
            Some(value) => (true, value),
            None => (false, None),
        };

        let row: Option<ShortLinkRow> = sqlx::query_as(&format!(
            r#"
            UPDATE short_links SET
                target_url  = COALESCE($2, target_url),
                description = CASE WHEN $3::boolean THEN $4::text ELSE description END,
                active      = COALESCE($5, active),
                expires_at  = CASE WHEN $6::boolean THEN $7::timestamptz ELSE expires_at END,
                tags        = COALESCE($8::text[], tags)
            WHERE id = $1
            RETURNING {SHORT_LINK_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.target_url)
        .bind(description_set)
        .bind(description)
        .bind(patch.active)
        .bind(expires_set)
        .bind(expires_at)
        .bind(patch.tags)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(ShortLink::from)
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "id": id })))
    }

    async fn delete(&self, id: i64) -> Result<Option<ShortLink>, AppError> {
        let row: Option<ShortLinkRow> = sqlx::query_as(&format!(
            "DELETE FROM short_links WHERE id = $1 RETURNING {SHORT_LINK_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ShortLink::from))
    }
}
