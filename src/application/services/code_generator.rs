//! Collision-free short code issuance.

use std::sync::Arc;

use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{random_code, validate_code_length};
use serde_json::json;
use tracing::{debug, warn};

/// Attempts before giving up with [`AppError::CapacityExhausted`].
pub const MAX_GENERATION_ATTEMPTS: usize = 50;

/// Draws random codes until one is free in the combined code/alias namespace.
///
/// The pre-check against the repository only avoids obvious collisions; the
/// repository's unique constraint decides the race at insert time.
pub struct CodeGenerator<L: LinkRepository + ?Sized> {
    repository: Arc<L>,
    max_attempts: usize,
}

impl<L: LinkRepository + ?Sized> CodeGenerator<L> {
    pub fn new(repository: Arc<L>) -> Self {
        Self {
            repository,
            max_attempts: MAX_GENERATION_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Returns an unused code of `length` characters.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `length` is outside 4..=20.
    /// Returns [`AppError::CapacityExhausted`] if every attempt collided.
    pub async fn generate(&self, length: usize) -> Result<String, AppError> {
        validate_code_length(length)?;

        for attempt in 1..=self.max_attempts {
            let candidate = random_code(length);

            if !self.repository.name_exists(&candidate).await? {
                return Ok(candidate);
            }

            debug!(attempt, length, "Short code collision, retrying");
        }

        warn!(
            attempts = self.max_attempts,
            length, "Short code space exhausted"
        );
        Err(AppError::capacity_exhausted(
            "Could not generate a unique short code",
            json!({ "attempts": self.max_attempts, "length": length }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use crate::utils::code_generator::ALPHABET;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_generate_returns_first_free_candidate() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_name_exists()
            .times(1)
            .returning(|_| Ok(false));

        let generator = CodeGenerator::new(Arc::new(mock_repo));
        let code = generator.generate(6).await.unwrap();

        assert_eq!(code.len(), 6);
        assert!(code.bytes().all(|b| ALPHABET.contains(&b)));
    }

    #[tokio::test]
    async fn test_generate_retries_on_collision() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();

        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_name_exists()
            .times(4)
            .returning(move |_| Ok(calls_clone.fetch_add(1, Ordering::SeqCst) < 3));

        let generator = CodeGenerator::new(Arc::new(mock_repo));
        assert!(generator.generate(6).await.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_generate_fails_with_capacity_exhausted() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_name_exists()
            .times(MAX_GENERATION_ATTEMPTS)
            .returning(|_| Ok(true));

        let generator = CodeGenerator::new(Arc::new(mock_repo));
        let result = generator.generate(6).await;

        assert!(matches!(result, Err(AppError::CapacityExhausted { .. })));
    }

    #[tokio::test]
    async fn test_generate_respects_custom_attempt_cap() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_name_exists()
            .times(3)
            .returning(|_| Ok(true));

        let generator = CodeGenerator::new(Arc::new(mock_repo)).with_max_attempts(3);
        assert!(matches!(
            generator.generate(6).await,
            Err(AppError::CapacityExhausted { .. })
        ));
    }

    #[tokio::test]
    async fn test_generate_rejects_bad_length() {
        let mock_repo = MockLinkRepository::new();
        let generator = CodeGenerator::new(Arc::new(mock_repo));

        assert!(matches!(
            generator.generate(2).await,
            Err(AppError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_generate_propagates_repository_errors() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_name_exists()
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let generator = CodeGenerator::new(Arc::new(mock_repo));
        assert!(matches!(
            generator.generate(6).await,
            Err(AppError::Internal { .. })
        ));
    }
}
