//! REST API layer for HTTP request/response handling.
//!
//! # Modules
//!
//! - [`dto`] - Request/response bodies
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Admission guards, rate limiting, tracing
//! - [`routes`] - Route tables

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
