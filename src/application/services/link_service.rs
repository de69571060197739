//! Short link creation, resolution, and administration.

use std::sync::Arc;

use crate::application::services::code_generator::CodeGenerator;
use crate::domain::clock::Clock;
use crate::domain::entities::{NewShortLink, ShortLink, ShortLinkPatch};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{DEFAULT_CODE_LENGTH, validate_alias, validate_code_length};
use crate::utils::validation::{
    MAX_DESCRIPTION_LENGTH, ensure_max_chars, normalize_tags, sanitize_optional,
    validate_target_url,
};
use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{debug, info};

/// Insert attempts when a freshly generated code loses a race at the unique constraint.
const INSERT_ATTEMPTS: usize = 3;

/// Input for [`LinkService::create_short_link`].
#[derive(Debug, Clone, Default)]
pub struct CreateShortLink {
    pub target_url: String,
    pub alias: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Service for creating, resolving, and managing short links.
pub struct LinkService<L: LinkRepository + ?Sized> {
    repository: Arc<L>,
    generator: CodeGenerator<L>,
    clock: Arc<dyn Clock>,
    code_length: usize,
}

impl<L: LinkRepository + ?Sized> LinkService<L> {
    pub fn new(repository: Arc<L>, clock: Arc<dyn Clock>) -> Self {
        Self {
            generator: CodeGenerator::new(repository.clone()),
            repository,
            clock,
            code_length: DEFAULT_CODE_LENGTH,
        }
    }

    /// Sets the length of generated codes.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `length` is outside 4..=20.
    pub fn with_code_length(mut self, length: usize) -> Result<Self, AppError> {
        validate_code_length(length)?;
        self.code_length = length;
        Ok(self)
    }

    pub fn code_length(&self) -> usize {
        self.code_length
    }

    /// Creates a short link with a generated code and an optional alias.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL, alias, description, or expiry is invalid.
    /// Returns [`AppError::Conflict`] with `details.field = "alias"` if the alias is taken.
    /// Returns [`AppError::CapacityExhausted`] if no free code could be found.
    pub async fn create_short_link(&self, input: CreateShortLink) -> Result<ShortLink, AppError> {
        let target_url = input.target_url.trim().to_string();
        validate_target_url(&target_url)?;

        if let Some(ref alias) = input.alias {
            validate_alias(alias)?;
        }

        if let Some(ref description) = input.description {
            ensure_max_chars("description", description, MAX_DESCRIPTION_LENGTH)?;
        }
        let description = sanitize_optional(input.description.as_deref(), MAX_DESCRIPTION_LENGTH);
        let tags = normalize_tags(&input.tags)?;

        if let Some(expires_at) = input.expires_at
            && expires_at <= self.clock.now()
        {
            return Err(AppError::bad_request(
                "Expiry must be in the future",
                json!({ "field": "expiresAt" }),
            ));
        }

        if let Some(ref alias) = input.alias
            && self.repository.name_exists(alias).await?
        {
            return Err(alias_taken(alias));
        }

        for attempt in 1..=INSERT_ATTEMPTS {
            let code = self.generator.generate(self.code_length).await?;

            let new_link = NewShortLink {
                code,
                alias: input.alias.clone(),
                target_url: target_url.clone(),
                description: description.clone(),
                tags: tags.clone(),
                expires_at: input.expires_at,
            };

            match self.repository.create(new_link).await {
                Ok(link) => {
                    info!(id = link.id, code = %link.code, alias = ?link.alias, "Short link created");
                    return Ok(link);
                }
                Err(e) if e.is_conflict_on("code") => {
                    debug!(attempt, "Generated code taken at insert, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::capacity_exhausted(
            "Could not claim a unique short code",
            json!({ "attempts": INSERT_ATTEMPTS }),
        ))
    }

    /// Resolves a code or alias to a link that may currently redirect.
    ///
    /// # Errors
    ///
    /// Returns the same [`AppError::NotFound`] whether the name never existed,
    /// the link is inactive, or it has expired.
    pub async fn resolve(&self, name: &str) -> Result<ShortLink, AppError> {
        let link = self
            .repository
            .find_by_code_or_alias(name)
            .await?
            .ok_or_else(link_not_found)?;

        self.ensure_resolvable(link)
    }

    /// Passes the link through only if it is active and unexpired now.
    pub fn ensure_resolvable(&self, link: ShortLink) -> Result<ShortLink, AppError> {
        if link.is_resolvable_at(self.clock.now()) {
            Ok(link)
        } else {
            Err(link_not_found())
        }
    }

    pub async fn get_link(&self, id: i64) -> Result<ShortLink, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "id": id })))
    }

    /// Returns one page of links, newest first, with the total count.
    pub async fn list_links(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<ShortLink>, i64), AppError> {
        let links = self.repository.list(offset, limit).await?;
        let total = self.repository.count().await?;
        Ok((links, total))
    }

    pub async fn count_links(&self) -> Result<i64, AppError> {
        self.repository.count().await
    }

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an invalid URL, oversized description, or bad tags.
    /// Returns [`AppError::NotFound`] if the link does not exist.
    pub async fn update_link(
        &self,
        id: i64,
        mut patch: ShortLinkPatch,
    ) -> Result<ShortLink, AppError> {
        if let Some(ref url) = patch.target_url {
            validate_target_url(url)?;
        }

        if let Some(Some(ref description)) = patch.description {
            ensure_max_chars("description", description, MAX_DESCRIPTION_LENGTH)?;
        }
        patch.description = patch
            .description
            .map(|d| sanitize_optional(d.as_deref(), MAX_DESCRIPTION_LENGTH));
        patch.tags = patch.tags.map(|tags| normalize_tags(&tags)).transpose()?;

        let link = self.repository.update(id, patch).await?;
        info!(id, "Short link updated");
        Ok(link)
    }

    /// Deletes a link and returns it, so callers can drop cached names.
    pub async fn delete_link(&self, id: i64) -> Result<ShortLink, AppError> {
        let link = self
            .repository
            .delete(id)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "id": id })))?;
        info!(id, code = %link.code, "Short link deleted");
        Ok(link)
    }
}

/// Uniform miss for the redirect path. Carries no lifecycle detail.
fn link_not_found() -> AppError {
    AppError::not_found("Short link not found", json!({}))
}

fn alias_taken(alias: &str) -> AppError {
    AppError::conflict(
        "Alias is already taken",
        json!({ "field": "alias", "name": alias }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::ManualClock;
    use crate::domain::repositories::MockLinkRepository;
    use chrono::Duration;

    fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::new(Utc::now()))
    }

    fn test_link(id: i64, code: &str, alias: Option<&str>, url: &str) -> ShortLink {
        ShortLink {
            id,
            code: code.to_string(),
            alias: alias.map(str::to_string),
            target_url: url.to_string(),
            description: None,
            tags: Vec::new(),
            active: true,
            expires_at: None,
            click_count: 0,
            created_at: Utc::now(),
        }
    }

    fn input(url: &str) -> CreateShortLink {
        CreateShortLink {
            target_url: url.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_short_link_success() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_name_exists()
            .times(1)
            .returning(|_| Ok(false));
        mock_repo
            .expect_create()
            .withf(|new_link| {
                new_link.code.len() == 6
                    && new_link.alias.is_none()
                    && new_link.target_url == "https://example.com"
            })
            .times(1)
            .returning(|new_link| Ok(test_link(10, &new_link.code, None, &new_link.target_url)));

        let service = LinkService::new(Arc::new(mock_repo), clock());
        let link = service
            .create_short_link(input("https://example.com"))
            .await
            .unwrap();

        assert_eq!(link.id, 10);
        assert_eq!(link.target_url, "https://example.com");
    }

    #[tokio::test]
    async fn test_create_short_link_with_alias() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_name_exists()
            .withf(|name| name == "nextjs")
            .times(1)
            .returning(|_| Ok(false));
        mock_repo
            .expect_name_exists()
            .times(1)
            .returning(|_| Ok(false));
        mock_repo
            .expect_create()
            .withf(|new_link| new_link.alias.as_deref() == Some("nextjs"))
            .times(1)
            .returning(|n| Ok(test_link(1, &n.code, Some("nextjs"), &n.target_url)));

        let service = LinkService::new(Arc::new(mock_repo), clock());
        let link = service
            .create_short_link(CreateShortLink {
                alias: Some("nextjs".to_string()),
                ..input("https://nextjs.org")
            })
            .await
            .unwrap();

        assert_eq!(link.alias.as_deref(), Some("nextjs"));
    }

    #[tokio::test]
    async fn test_create_short_link_alias_conflict() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_name_exists()
            .withf(|name| name == "taken")
            .times(1)
            .returning(|_| Ok(true));
        mock_repo.expect_create().times(0);

        let service = LinkService::new(Arc::new(mock_repo), clock());
        let err = service
            .create_short_link(CreateShortLink {
                alias: Some("taken".to_string()),
                ..input("https://example.com")
            })
            .await
            .unwrap_err();

        assert!(err.is_conflict_on("alias"));
    }

    #[tokio::test]
    async fn test_create_short_link_alias_race_surfaces_conflict() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_name_exists().returning(|_| Ok(false));
        mock_repo.expect_create().times(1).returning(|_| {
            Err(AppError::conflict(
                "Alias is already taken",
                json!({ "field": "alias" }),
            ))
        });

        let service = LinkService::new(Arc::new(mock_repo), clock());
        let err = service
            .create_short_link(CreateShortLink {
                alias: Some("racy".to_string()),
                ..input("https://example.com")
            })
            .await
            .unwrap_err();

        assert!(err.is_conflict_on("alias"));
    }

    #[tokio::test]
    async fn test_create_short_link_retries_lost_code_race() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_name_exists().returning(|_| Ok(false));

        let mut seq = mockall::Sequence::new();
        mock_repo
            .expect_create()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(AppError::conflict("taken", json!({ "field": "code" }))));
        mock_repo
            .expect_create()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|n| Ok(test_link(2, &n.code, None, &n.target_url)));

        let service = LinkService::new(Arc::new(mock_repo), clock());
        let link = service
            .create_short_link(input("https://example.com"))
            .await
            .unwrap();

        assert_eq!(link.id, 2);
    }

    #[tokio::test]
    async fn test_create_short_link_invalid_url() {
        let mock_repo = MockLinkRepository::new();
        let service = LinkService::new(Arc::new(mock_repo), clock());

        let result = service.create_short_link(input("not-a-url")).await;
        assert!(matches!(result, Err(AppError::Validation { .. })));

        let result = service.create_short_link(input("ftp://example.com")).await;
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_create_short_link_rejects_suspicious_url() {
        let mock_repo = MockLinkRepository::new();
        let service = LinkService::new(Arc::new(mock_repo), clock());

        let result = service
            .create_short_link(input("https://paypal-secure.example/login"))
            .await;
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_create_short_link_rejects_invalid_alias() {
        let mock_repo = MockLinkRepository::new();
        let service = LinkService::new(Arc::new(mock_repo), clock());

        let result = service
            .create_short_link(CreateShortLink {
                alias: Some("a!".to_string()),
                ..input("https://example.com")
            })
            .await;
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_create_short_link_rejects_past_expiry() {
        let mock_repo = MockLinkRepository::new();
        let clock = clock();
        let service = LinkService::new(Arc::new(mock_repo), clock.clone());

        let result = service
            .create_short_link(CreateShortLink {
                expires_at: Some(clock.now() - Duration::minutes(1)),
                ..input("https://example.com")
            })
            .await;
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_create_short_link_sanitizes_description() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_name_exists().returning(|_| Ok(false));
        mock_repo
            .expect_create()
            .withf(|n| n.description.as_deref() == Some("bold claim"))
            .times(1)
            .returning(|n| Ok(test_link(1, &n.code, None, &n.target_url)));

        let service = LinkService::new(Arc::new(mock_repo), clock());
        let result = service
            .create_short_link(CreateShortLink {
                description: Some("  <b>bold claim  ".to_string()),
                ..input("https://example.com")
            })
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_create_short_link_normalizes_tags() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_name_exists().returning(|_| Ok(false));
        mock_repo
            .expect_create()
            .withf(|n| n.tags == vec!["dev".to_string(), "github".to_string()])
            .times(1)
            .returning(|n| {
                let mut link = test_link(1, &n.code, None, &n.target_url);
                link.tags = n.tags;
                Ok(link)
            });

        let service = LinkService::new(Arc::new(mock_repo), clock());
        let link = service
            .create_short_link(CreateShortLink {
                tags: vec![" dev".to_string(), "github".to_string(), "dev".to_string()],
                ..input("https://github.com")
            })
            .await
            .unwrap();

        assert_eq!(link.tags, vec!["dev", "github"]);
    }

    #[tokio::test]
    async fn test_update_link_rejects_too_many_tags() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_update().times(0);

        let service = LinkService::new(Arc::new(mock_repo), clock());
        let patch = ShortLinkPatch {
            tags: Some((0..20).map(|i| format!("tag{i}")).collect()),
            ..Default::default()
        };

        assert!(matches!(
            service.update_link(1, patch).await,
            Err(AppError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_resolve_success() {
        let mut mock_repo = MockLinkRepository::new();
        let link = test_link(1, "abc123", Some("nextjs"), "https://nextjs.org");
        mock_repo
            .expect_find_by_code_or_alias()
            .withf(|name| name == "nextjs")
            .times(1)
            .returning(move |_| Ok(Some(link.clone())));

        let service = LinkService::new(Arc::new(mock_repo), clock());
        let resolved = service.resolve("nextjs").await.unwrap();

        assert_eq!(resolved.target_url, "https://nextjs.org");
    }

    #[tokio::test]
    async fn test_resolve_misses_are_indistinguishable() {
        let clock = clock();
        let mut inactive = test_link(1, "inactive", None, "https://a.example");
        inactive.active = false;
        let mut expired = test_link(2, "expired", None, "https://b.example");
        expired.expires_at = Some(clock.now() - Duration::seconds(1));

        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_find_by_code_or_alias()
            .returning(move |name| {
                Ok(match name {
                    "inactive" => Some(inactive.clone()),
                    "expired" => Some(expired.clone()),
                    _ => None,
                })
            });

        let service = LinkService::new(Arc::new(mock_repo), clock);

        let mut bodies = Vec::new();
        for name in ["inactive", "expired", "missing"] {
            let err = service.resolve(name).await.unwrap_err();
            assert!(matches!(err, AppError::NotFound { .. }));
            let info = err.to_error_info();
            bodies.push((info.message, info.details));
        }

        assert_eq!(bodies[0], bodies[1]);
        assert_eq!(bodies[1], bodies[2]);
    }

    #[tokio::test]
    async fn test_update_link_not_found() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_update()
            .returning(|id, _| Err(AppError::not_found("Short link not found", json!({ "id": id }))));

        let service = LinkService::new(Arc::new(mock_repo), clock());
        let result = service.update_link(99, ShortLinkPatch::default()).await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_link_rejects_invalid_url() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_update().times(0);

        let service = LinkService::new(Arc::new(mock_repo), clock());
        let patch = ShortLinkPatch {
            target_url: Some("javascript:alert(1)".to_string()),
            ..Default::default()
        };

        assert!(matches!(
            service.update_link(1, patch).await,
            Err(AppError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_link_not_found() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_delete().returning(|_| Ok(None));

        let service = LinkService::new(Arc::new(mock_repo), clock());
        assert!(matches!(
            service.delete_link(5).await,
            Err(AppError::NotFound { .. })
        ));
    }

    #[test]
    fn test_with_code_length_validates() {
        let service = LinkService::new(Arc::new(MockLinkRepository::new()), clock());
        assert!(service.with_code_length(3).is_err());

        let service = LinkService::new(Arc::new(MockLinkRepository::new()), clock());
        assert_eq!(service.with_code_length(8).unwrap().code_length(), 8);
    }
}
