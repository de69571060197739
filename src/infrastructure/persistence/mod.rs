//! PostgreSQL repository implementations.
//!
//! Queries are built at runtime with `sqlx::query_as` and decoded into the
//! private row types in `rows`. The schema lives in `migrations/`.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Short links and the code/alias namespace
//! - [`PgListRepository`] - Link-in-bio pages and items
//! - [`PgClickRepository`] - Transactional click writes
//! - [`PgAnalyticsRepository`] - Aggregation queries

pub mod pg_analytics_repository;
pub mod pg_click_repository;
pub mod pg_link_repository;
pub mod pg_list_repository;
mod rows;

pub use pg_analytics_repository::PgAnalyticsRepository;
pub use pg_click_repository::PgClickRepository;
pub use pg_link_repository::PgLinkRepository;
pub use pg_list_repository::PgListRepository;
