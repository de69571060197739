//! Repository trait for short link data access.

use crate::domain::entities::{NewShortLink, ShortLink, ShortLinkPatch};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for managing short links.
///
/// The persistence layer is the authority on the combined code/alias namespace:
/// `create` must reject a name that is already taken as either field, atomically
/// with the insert.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::MemoryStore`] - in-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Creates a new short link, claiming its code and alias.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] with `details.field` set to `"code"` or
    /// `"alias"` if that name is already taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_link: NewShortLink) -> Result<ShortLink, AppError>;

    /// Finds a link whose code or alias equals `name`.
    ///
    /// Returns the link regardless of `active`/`expires_at`; resolvability is
    /// decided by the caller.
    async fn find_by_code_or_alias(&self, name: &str) -> Result<Option<ShortLink>, AppError>;

    /// Returns true if `name` is taken as a code or an alias.
    async fn name_exists(&self, name: &str) -> Result<bool, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<ShortLink>, AppError>;

    /// Lists links newest first.
    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<ShortLink>, AppError>;

    async fn count(&self) -> Result<i64, AppError>;

    /// Partially updates a link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this `id`.
    async fn update(&self, id: i64, patch: ShortLinkPatch) -> Result<ShortLink, AppError>;

    /// Deletes a link, releasing its names. Returns the removed link, or `None`
    /// if it did not exist.
    async fn delete(&self, id: i64) -> Result<Option<ShortLink>, AppError>;
}
