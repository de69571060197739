//! HTTP middleware: admission guards, token-bucket limiting, request tracing.

pub mod admission;
pub mod rate_limit;
pub mod tracing;
