use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::click_event::ClickTarget;
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;

/// PostgreSQL click writer.
///
/// The counter increment and the event insert share a transaction, so the
/// counter always equals the number of event rows for its target.
pub struct PgClickRepository {
    pool: Arc<PgPool>,
}

impl PgClickRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClickRepository for PgClickRepository {
    async fn record_click(
        &self,
        target: ClickTarget,
        occurred_at: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let (update_sql, insert_sql) = match target {
            ClickTarget::ShortLink(_) => (
                "UPDATE short_links SET click_count = click_count + 1 WHERE id = $1",
                "INSERT INTO click_events (short_link_id, occurred_at) VALUES ($1, $2)",
            ),
            ClickTarget::ListItem(_) => (
                "UPDATE list_items SET click_count = click_count + 1 WHERE id = $1",
                "INSERT INTO click_events (list_item_id, occurred_at) VALUES ($1, $2)",
            ),
        };

        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(update_sql)
            .bind(target.id())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if updated == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query(insert_sql)
            .bind(target.id())
            .bind(occurred_at)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }
}
