//! Repository trait for link-in-bio pages and items.

use crate::domain::entities::{
    ListItem, ListItemPatch, ListPage, ListPagePatch, ListPageSummary, NewListItem, NewListPage,
};
use crate::error::AppError;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] with `details.field = "slug"` if the slug is taken.
    async fn create_page(&self, new_page: NewListPage) -> Result<ListPage, AppError>;

    async fn find_page(&self, id: i64) -> Result<Option<ListPage>, AppError>;

    /// Pages newest first, each with its item count.
    async fn list_pages(&self, offset: i64, limit: i64) -> Result<Vec<ListPageSummary>, AppError>;

    async fn count_pages(&self) -> Result<i64, AppError>;

    /// Returns `None` if no page has this `id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] with `details.field = "slug"` if the new slug is taken.
    async fn update_page(&self, id: i64, patch: ListPagePatch)
    -> Result<Option<ListPage>, AppError>;

    /// Deletes a page and, with it, all of its items. Returns `false` if absent.
    async fn delete_page(&self, id: i64) -> Result<bool, AppError>;

    /// Items of a page ordered by `position`, then `id`.
    async fn list_items(&self, page_id: i64) -> Result<Vec<ListItem>, AppError>;

    /// Appends an item after the page's current last position.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the page does not exist.
    async fn add_item(&self, new_item: NewListItem) -> Result<ListItem, AppError>;

    /// Returns `None` if no item has this `id`.
    async fn update_item(&self, id: i64, patch: ListItemPatch)
    -> Result<Option<ListItem>, AppError>;

    async fn delete_item(&self, id: i64) -> Result<bool, AppError>;
}
