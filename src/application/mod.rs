//! Application layer services implementing business logic.
//!
//! Services validate input, apply business rules, and coordinate repository
//! calls. They depend only on repository traits and the injectable clock.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Short link creation, resolution, and CRUD
//! - [`services::code_generator::CodeGenerator`] - Unique code issuance
//! - [`services::list_service::ListService`] - Link-in-bio pages and items
//! - [`services::click_service::ClickService`] - Click persistence
//! - [`services::click_service::ClickRecorder`] - Fire-and-forget click queue
//! - [`services::admission::AdmissionController`] - Fixed-window rate limiting
//! - [`services::analytics_service::AnalyticsService`] - Click analytics

pub mod services;
