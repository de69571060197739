//! Input validation and sanitization helpers.

use crate::error::AppError;
use regex::{Regex, RegexSet};
use serde_json::json;
use std::sync::LazyLock;
use tracing::warn;
use url::Url;

pub const MAX_DESCRIPTION_LENGTH: usize = 500;
pub const MAX_TITLE_LENGTH: usize = 255;
pub const MAX_TAGS: usize = 10;
pub const MAX_TAG_LENGTH: usize = 50;

static SLUG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{3,50}$").expect("valid slug regex"));

/// Phishing and throwaway-TLD patterns, matched case-insensitively against the whole URL.
static SUSPICIOUS_URL_PATTERNS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"(?i)paypal.*login",
        r"(?i)amazon.*signin",
        r"(?i)microsoft.*account",
        r"(?i)google.*signin",
        r"(?i)apple.*id.*login",
        r"(?i)banking.*login",
        r"(?i)\.tk$",
        r"(?i)\.ml$",
        r"(?i)\.ga$",
    ])
    .expect("valid suspicious url patterns")
});

/// A URL is valid only if it parses and its scheme is `http` or `https`.
pub fn is_valid_url(input: &str) -> bool {
    Url::parse(input)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// `^[A-Za-z0-9_-]{3,50}$`
pub fn is_valid_slug(input: &str) -> bool {
    SLUG_REGEX.is_match(input)
}

pub fn is_suspicious_url(input: &str) -> bool {
    SUSPICIOUS_URL_PATTERNS.is_match(input)
}

/// Strips `<` and `>`, trims, and caps the result at `max_chars` characters.
pub fn sanitize_text(input: &str, max_chars: usize) -> String {
    let stripped: String = input.chars().filter(|c| *c != '<' && *c != '>').collect();
    stripped.trim().chars().take(max_chars).collect()
}

/// Sanitizes an optional free-text field; empty results become `None`.
pub fn sanitize_optional(input: Option<&str>, max_chars: usize) -> Option<String> {
    input
        .map(|s| sanitize_text(s, max_chars))
        .filter(|s| !s.is_empty())
}

/// Validates a redirect target: http(s) only, no known phishing patterns.
///
/// Suspicious URLs are logged as a security event before being rejected.
pub fn validate_target_url(input: &str) -> Result<(), AppError> {
    if !is_valid_url(input) {
        return Err(AppError::bad_request(
            "URL must be a valid http or https URL",
            json!({ "field": "targetUrl" }),
        ));
    }

    if is_suspicious_url(input) {
        warn!(
            event = "suspicious_url_rejected",
            url = %input,
            "Security event: rejected suspicious target URL"
        );
        return Err(AppError::bad_request(
            "URL is not allowed",
            json!({ "field": "targetUrl", "reason": "suspicious" }),
        ));
    }

    Ok(())
}

pub fn validate_slug(slug: &str) -> Result<(), AppError> {
    if is_valid_slug(slug) {
        Ok(())
    } else {
        Err(AppError::bad_request(
            "Slug must be 3-50 characters of letters, digits, '-' or '_'",
            json!({ "field": "slug", "slug": slug }),
        ))
    }
}

/// Sanitizes a required title, rejecting one that is empty afterwards.
pub fn sanitize_title(title: &str) -> Result<String, AppError> {
    let title = sanitize_text(title, MAX_TITLE_LENGTH);
    if title.is_empty() {
        return Err(AppError::bad_request(
            "Title must not be empty",
            json!({ "field": "title" }),
        ));
    }
    Ok(title)
}

/// Rejects text over `max_chars` before sanitizing.
pub fn ensure_max_chars(field: &str, input: &str, max_chars: usize) -> Result<(), AppError> {
    let len = input.chars().count();
    if len > max_chars {
        return Err(AppError::bad_request(
            format!("{field} must be at most {max_chars} characters"),
            json!({ "field": field, "length": len }),
        ));
    }
    Ok(())
}

/// Trims tags, drops empty ones, and removes duplicates keeping first occurrence.
///
/// # Errors
///
/// Rejects more than [`MAX_TAGS`] distinct tags or a tag over [`MAX_TAG_LENGTH`] characters.
pub fn normalize_tags(tags: &[String]) -> Result<Vec<String>, AppError> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        ensure_max_chars("tags", tag.trim(), MAX_TAG_LENGTH)?;
        let tag = sanitize_text(tag, MAX_TAG_LENGTH);
        if !tag.is_empty() && !normalized.contains(&tag) {
            normalized.push(tag);
        }
    }

    if normalized.len() > MAX_TAGS {
        return Err(AppError::bad_request(
            format!("At most {MAX_TAGS} tags are allowed"),
            json!({ "field": "tags", "count": normalized.len() }),
        ));
    }
    Ok(normalized)
}
