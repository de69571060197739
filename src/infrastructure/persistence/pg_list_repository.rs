use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use super::rows::{
    LIST_ITEM_COLUMNS, LIST_PAGE_COLUMNS, ListItemRow, ListPageRow, ListPageSummaryRow,
    name_conflict,
};
use crate::domain::entities::{
    ListItem, ListItemPatch, ListPage, ListPagePatch, ListPageSummary, NewListItem, NewListPage,
};
use crate::domain::repositories::ListRepository;
use crate::error::AppError;
use serde_json::json;

/// PostgreSQL repository for link-in-bio pages and items.
pub struct PgListRepository {
    pool: Arc<PgPool>,
}

impl PgListRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ListRepository for PgListRepository {
    async fn create_page(&self, new_page: NewListPage) -> Result<ListPage, AppError> {
        let row: ListPageRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO list_pages (title, slug, description)
            VALUES ($1, $2, $3)
            RETURNING {LIST_PAGE_COLUMNS}
            "#
        ))
        .bind(&new_page.title)
        .bind(&new_page.slug)
        .bind(&new_page.description)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| name_conflict(e, "slug", &new_page.slug))?;

        Ok(row.into())
    }

    async fn find_page(&self, id: i64) -> Result<Option<ListPage>, AppError> {
        let row: Option<ListPageRow> = sqlx::query_as(&format!(
            "SELECT {LIST_PAGE_COLUMNS} FROM list_pages WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ListPage::from))
    }

    async fn list_pages(&self, offset: i64, limit: i64) -> Result<Vec<ListPageSummary>, AppError> {
        let rows: Vec<ListPageSummaryRow> = sqlx::query_as(
            r#"
            SELECT p.id, p.title, p.slug, p.description, p.created_at,
                   COUNT(i.id) AS item_count
            FROM list_pages p
            LEFT JOIN list_items i ON i.list_page_id = p.id
            GROUP BY p.id
            ORDER BY p.created_at DESC, p.id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(ListPageSummary::from).collect())
    }

    async fn count_pages(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM list_pages")
            .fetch_one(self.pool.as_ref())
            .await?;
        Ok(count)
    }

    async fn update_page(
        &self,
        id: i64,
        patch: ListPagePatch,
    ) -> Result<Option<ListPage>, AppError> {
        let (description_set, description) = match patch.description {
            Some(value) => (true, value),
            None => (false, None),
        };
        let slug = patch.slug.clone().unwrap_or_default();

        let row: Option<ListPageRow> = sqlx::query_as(&format!(
            r#"
            UPDATE list_pages SET
                title       = COALESCE($2, title),
                slug        = COALESCE($3, slug),
                description = CASE WHEN $4::boolean THEN $5::text ELSE description END
            WHERE id = $1
            RETURNING {LIST_PAGE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.title)
        .bind(patch.slug)
        .bind(description_set)
        .bind(description)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(|e| name_conflict(e, "slug", &slug))?;

        Ok(row.map(ListPage::from))
    }

    async fn delete_page(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM list_pages WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_items(&self, page_id: i64) -> Result<Vec<ListItem>, AppError> {
        let rows: Vec<ListItemRow> = sqlx::query_as(&format!(
            r#"
            SELECT {LIST_ITEM_COLUMNS}
            FROM list_items
            WHERE list_page_id = $1
            ORDER BY position ASC, id ASC
            "#
        ))
        .bind(page_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(ListItem::from).collect())
    }

    async fn add_item(&self, new_item: NewListItem) -> Result<ListItem, AppError> {
        // The position subquery and the insert run as one statement; the FK
        // rejects items for a page deleted in between.
        let row: ListItemRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO list_items (list_page_id, title, target_url, visible, position)
            VALUES (
                $1, $2, $3, $4,
                (SELECT COALESCE(MAX(position) + 1, 0) FROM list_items WHERE list_page_id = $1)
            )
            RETURNING {LIST_ITEM_COLUMNS}
            "#
        ))
        .bind(new_item.list_page_id)
        .bind(&new_item.title)
        .bind(&new_item.target_url)
        .bind(new_item.visible)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::NotFound { .. } => AppError::not_found(
                "List page not found",
                json!({ "id": new_item.list_page_id }),
            ),
            other => other,
        })?;

        Ok(row.into())
    }

    async fn update_item(
        &self,
        id: i64,
        patch: ListItemPatch,
    ) -> Result<Option<ListItem>, AppError> {
        let row: Option<ListItemRow> = sqlx::query_as(&format!(
            r#"
            UPDATE list_items SET
                title      = COALESCE($2, title),
                target_url = COALESCE($3, target_url),
                visible    = COALESCE($4, visible),
                position   = COALESCE($5, position)
            WHERE id = $1
            RETURNING {LIST_ITEM_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.title)
        .bind(patch.target_url)
        .bind(patch.visible)
        .bind(patch.position)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ListItem::from))
    }

    async fn delete_item(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM list_items WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
