//! Client identity extraction from HTTP request headers.

use axum::http::HeaderMap;

/// Identity shared by every client that sends none of the identity headers.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Headers consulted in order of decreasing trust.
const IDENTITY_HEADERS: [&str; 3] = ["x-forwarded-for", "x-real-ip", "cf-connecting-ip"];

/// Resolves the client identity used as a rate-limit key.
///
/// Takes the first populated value of:
/// 1. `X-Forwarded-For` (first entry of the chain)
/// 2. `X-Real-IP`
/// 3. `CF-Connecting-IP`
///
/// Falls back to [`UNKNOWN_CLIENT`]. All such clients share one bucket.
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
///
/// assert_eq!(client_identity(&headers), "203.0.113.7");
/// ```
pub fn client_identity(headers: &HeaderMap) -> String {
    IDENTITY_HEADERS
        .iter()
        .filter_map(|name| headers.get(*name))
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(',').next())
        .map(str::trim)
        .find(|value| !value.is_empty())
        .unwrap_or(UNKNOWN_CLIENT)
        .to_string()
}
