//! Link-in-bio page and item management.

use std::sync::Arc;

use crate::domain::entities::{
    ListItem, ListItemPatch, ListPage, ListPagePatch, ListPageSummary, ListPageWithItems,
    NewListItem, NewListPage,
};
use crate::domain::repositories::ListRepository;
use crate::error::AppError;
use crate::utils::validation::{
    MAX_DESCRIPTION_LENGTH, ensure_max_chars, sanitize_optional, sanitize_title,
    validate_slug, validate_target_url,
};
use serde_json::json;
use tracing::info;

/// Input for [`ListService::add_item`].
#[derive(Debug, Clone)]
pub struct CreateListItem {
    pub title: String,
    pub target_url: String,
    pub visible: bool,
}

pub struct ListService<R: ListRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: ListRepository + ?Sized> ListService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a bad slug, empty title, or long description.
    /// Returns [`AppError::Conflict`] if the slug is taken.
    pub async fn create_page(
        &self,
        title: &str,
        slug: &str,
        description: Option<&str>,
    ) -> Result<ListPage, AppError> {
        validate_slug(slug)?;
        let title = sanitize_title(title)?;
        if let Some(description) = description {
            ensure_max_chars("description", description, MAX_DESCRIPTION_LENGTH)?;
        }

        let page = self
            .repository
            .create_page(NewListPage {
                title,
                slug: slug.to_string(),
                description: sanitize_optional(description, MAX_DESCRIPTION_LENGTH),
            })
            .await?;

        info!(id = page.id, slug = %page.slug, "List page created");
        Ok(page)
    }

    pub async fn get_page(&self, id: i64) -> Result<ListPageWithItems, AppError> {
        let page = self
            .repository
            .find_page(id)
            .await?
            .ok_or_else(|| page_not_found(id))?;
        let items = self.repository.list_items(id).await?;

        Ok(ListPageWithItems { page, items })
    }

    /// Returns one page of list pages, newest first, with the total count.
    pub async fn list_pages(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<ListPageSummary>, i64), AppError> {
        let pages = self.repository.list_pages(offset, limit).await?;
        let total = self.repository.count_pages().await?;
        Ok((pages, total))
    }

    /// Applies a partial update and returns the page with its items.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a bad slug, empty title, or long description.
    /// Returns [`AppError::Conflict`] if the new slug is taken.
    /// Returns [`AppError::NotFound`] if the page does not exist.
    pub async fn update_page(
        &self,
        id: i64,
        mut patch: ListPagePatch,
    ) -> Result<ListPageWithItems, AppError> {
        if let Some(ref slug) = patch.slug {
            validate_slug(slug)?;
        }
        if let Some(ref title) = patch.title {
            patch.title = Some(sanitize_title(title)?);
        }
        if let Some(Some(ref description)) = patch.description {
            ensure_max_chars("description", description, MAX_DESCRIPTION_LENGTH)?;
        }
        patch.description = patch
            .description
            .map(|d| sanitize_optional(d.as_deref(), MAX_DESCRIPTION_LENGTH));

        let page = self
            .repository
            .update_page(id, patch)
            .await?
            .ok_or_else(|| page_not_found(id))?;
        let items = self.repository.list_items(id).await?;

        info!(id, slug = %page.slug, "List page updated");
        Ok(ListPageWithItems { page, items })
    }

    pub async fn delete_page(&self, id: i64) -> Result<(), AppError> {
        if !self.repository.delete_page(id).await? {
            return Err(page_not_found(id));
        }
        info!(id, "List page deleted");
        Ok(())
    }

    /// Appends an item to a page.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the page does not exist.
    pub async fn add_item(
        &self,
        page_id: i64,
        input: CreateListItem,
    ) -> Result<ListItem, AppError> {
        let title = sanitize_title(&input.title)?;
        let target_url = input.target_url.trim().to_string();
        validate_target_url(&target_url)?;

        if self.repository.find_page(page_id).await?.is_none() {
            return Err(page_not_found(page_id));
        }

        self.repository
            .add_item(NewListItem {
                list_page_id: page_id,
                title,
                target_url,
                visible: input.visible,
            })
            .await
    }

    pub async fn update_item(
        &self,
        id: i64,
        mut patch: ListItemPatch,
    ) -> Result<ListItem, AppError> {
        if let Some(ref title) = patch.title {
            patch.title = Some(sanitize_title(title)?);
        }
        if let Some(ref url) = patch.target_url {
            validate_target_url(url)?;
        }

        self.repository
            .update_item(id, patch)
            .await?
            .ok_or_else(|| item_not_found(id))
    }

    pub async fn delete_item(&self, id: i64) -> Result<(), AppError> {
        if self.repository.delete_item(id).await? {
            Ok(())
        } else {
            Err(item_not_found(id))
        }
    }
}

fn page_not_found(id: i64) -> AppError {
    AppError::not_found("List page not found", json!({ "id": id }))
}

fn item_not_found(id: i64) -> AppError {
    AppError::not_found("List item not found", json!({ "id": id }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockListRepository;
    use chrono::Utc;

    fn page(id: i64, slug: &str) -> ListPage {
        ListPage {
            id,
            title: "My links".to_string(),
            slug: slug.to_string(),
            description: None,
            created_at: Utc::now(),
        }
    }

    fn item(id: i64, page_id: i64, title: &str, url: &str) -> ListItem {
        ListItem {
            id,
            list_page_id: page_id,
            title: title.to_string(),
            target_url: url.to_string(),
            click_count: 0,
            visible: true,
            position: 0,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_page_success() {
        let mut mock_repo = MockListRepository::new();
        mock_repo
            .expect_create_page()
            .withf(|p| p.slug == "my-links" && p.title == "My links")
            .times(1)
            .returning(|p| Ok(page(1, &p.slug)));

        let service = ListService::new(Arc::new(mock_repo));
        let created = service
            .create_page(" My links ", "my-links", None)
            .await
            .unwrap();

        assert_eq!(created.slug, "my-links");
    }

    #[tokio::test]
    async fn test_create_page_invalid_slug() {
        let mut mock_repo = MockListRepository::new();
        mock_repo.expect_create_page().times(0);

        let service = ListService::new(Arc::new(mock_repo));
        let result = service.create_page("Title", "no", None).await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_create_page_description_too_long() {
        let service = ListService::new(Arc::new(MockListRepository::new()));
        let long = "d".repeat(501);
        let result = service.create_page("Title", "valid-slug", Some(&long)).await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_get_page_with_items() {
        let mut mock_repo = MockListRepository::new();
        mock_repo
            .expect_find_page()
            .returning(|id| Ok(Some(page(id, "bio"))));
        mock_repo.expect_list_items().returning(|page_id| {
            Ok(vec![
                item(1, page_id, "Blog", "https://blog.example"),
                item(2, page_id, "Shop", "https://shop.example"),
            ])
        });

        let service = ListService::new(Arc::new(mock_repo));
        let result = service.get_page(3).await.unwrap();

        assert_eq!(result.page.id, 3);
        assert_eq!(result.items.len(), 2);
    }

    #[tokio::test]
    async fn test_add_item_to_missing_page() {
        let mut mock_repo = MockListRepository::new();
        mock_repo.expect_find_page().returning(|_| Ok(None));
        mock_repo.expect_add_item().times(0);

        let service = ListService::new(Arc::new(mock_repo));
        let result = service
            .add_item(
                9,
                CreateListItem {
                    title: "Blog".to_string(),
                    target_url: "https://blog.example".to_string(),
                    visible: true,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_add_item_rejects_invalid_url() {
        let service = ListService::new(Arc::new(MockListRepository::new()));
        let result = service
            .add_item(
                1,
                CreateListItem {
                    title: "Bad".to_string(),
                    target_url: "data:text/html,hi".to_string(),
                    visible: true,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_update_item_not_found() {
        let mut mock_repo = MockListRepository::new();
        mock_repo.expect_update_item().returning(|_, _| Ok(None));

        let service = ListService::new(Arc::new(mock_repo));
        let result = service.update_item(4, ListItemPatch::default()).await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_page_validates_before_writing() {
        let mut mock_repo = MockListRepository::new();
        mock_repo.expect_update_page().times(0);

        let service = ListService::new(Arc::new(mock_repo));
        let bad_slug = ListPagePatch {
            slug: Some("a b".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            service.update_page(1, bad_slug).await,
            Err(AppError::Validation { .. })
        ));

        let empty_title = ListPagePatch {
            title: Some(" <> ".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            service.update_page(1, empty_title).await,
            Err(AppError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_page_returns_items() {
        let mut mock_repo = MockListRepository::new();
        mock_repo
            .expect_update_page()
            .withf(|_, patch| {
                patch.title.as_deref() == Some("Renamed") && patch.description == Some(None)
            })
            .times(1)
            .returning(|id, _| Ok(Some(page(id, "bio"))));
        mock_repo
            .expect_list_items()
            .returning(|page_id| Ok(vec![item(1, page_id, "Blog", "https://blog.example")]));

        let service = ListService::new(Arc::new(mock_repo));
        let updated = service
            .update_page(
                2,
                ListPagePatch {
                    title: Some(" Renamed ".to_string()),
                    description: Some(Some("   ".to_string())),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.page.id, 2);
        assert_eq!(updated.items.len(), 1);
    }

    #[tokio::test]
    async fn test_update_page_not_found() {
        let mut mock_repo = MockListRepository::new();
        mock_repo.expect_update_page().returning(|_, _| Ok(None));

        let service = ListService::new(Arc::new(mock_repo));
        assert!(matches!(
            service.update_page(4, ListPagePatch::default()).await,
            Err(AppError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_page_not_found() {
        let mut mock_repo = MockListRepository::new();
        mock_repo.expect_delete_page().returning(|_| Ok(false));

        let service = ListService::new(Arc::new(mock_repo));
        assert!(matches!(
            service.delete_page(4).await,
            Err(AppError::NotFound { .. })
        ));
    }
}
