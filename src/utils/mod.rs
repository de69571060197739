//! Utility functions for code generation, input validation, and request handling.
//!
//! - [`code_generator`] - Random code drawing and alias validation
//! - [`validation`] - URL/slug checks and free-text sanitization
//! - [`client_ip`] - Client identity from proxy headers

pub mod client_ip;
pub mod code_generator;
pub mod validation;
