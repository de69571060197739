//! Business logic services for the application layer.

pub mod admission;
pub mod analytics_service;
pub mod click_service;
pub mod code_generator;
pub mod link_service;
pub mod list_service;

pub use admission::{AdmissionController, AdmissionDecision, RateLimitConfig};
pub use analytics_service::{AnalyticsReport, AnalyticsService};
pub use click_service::{ClickRecorder, ClickService};
pub use code_generator::CodeGenerator;
pub use link_service::{CreateShortLink, LinkService};
pub use list_service::{CreateListItem, ListService};
