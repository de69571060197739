//! Data Transfer Objects for API requests and responses.
//!
//! Bodies are camelCase JSON. Request DTOs derive `validator::Validate` for
//! shape checks; the services own the domain rules.

pub mod analytics;
pub mod health;
pub mod links;
pub mod lists;
pub mod pagination;
pub mod track;
