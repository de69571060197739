//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access so services stay independent of storage.
//! Implementations live in `crate::infrastructure::persistence` (PostgreSQL) and
//! `crate::infrastructure::memory` (in-process). Mocks are generated with
//! `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Short link CRUD and the code/alias namespace
//! - [`ListRepository`] - Link-in-bio pages and items
//! - [`ClickRepository`] - Atomic click recording
//! - [`AnalyticsRepository`] - Aggregation reads

pub mod analytics_repository;
pub mod click_repository;
pub mod link_repository;
pub mod list_repository;

pub use analytics_repository::AnalyticsRepository;
pub use click_repository::ClickRepository;
pub use link_repository::LinkRepository;
pub use list_repository::ListRepository;

#[cfg(test)]
pub use analytics_repository::MockAnalyticsRepository;
#[cfg(test)]
pub use click_repository::MockClickRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use list_repository::MockListRepository;
