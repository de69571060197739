//! Short link entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A short link mapping a code (and optional alias) to a target URL.
///
/// `code` and `alias` live in one namespace: no name resolves to two links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortLink {
    pub id: i64,
    pub code: String,
    pub alias: Option<String>,
    pub target_url: String,
    pub description: Option<String>,
    /// Free-form labels for the admin UI. Never affect resolution.
    #[serde(default)]
    pub tags: Vec<String>,
    pub active: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
}

impl ShortLink {
    /// Returns true if the link has passed its expiry time at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| now >= e)
    }

    /// A link redirects only while active and not expired.
    pub fn is_resolvable_at(&self, now: DateTime<Utc>) -> bool {
        self.active && !self.is_expired_at(now)
    }

    /// The public name: the alias when set, otherwise the generated code.
    pub fn display_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.code)
    }

    /// All names under which this link is reachable.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.code.as_str()).chain(self.alias.as_deref())
    }
}

/// Input data for creating a new short link.
#[derive(Debug, Clone, PartialEq)]
pub struct NewShortLink {
    pub code: String,
    pub alias: Option<String>,
    pub target_url: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Partial update for an existing short link.
///
/// `None` fields are left unchanged.
/// `expires_at: Some(None)` clears the expiry; `Some(Some(t))` sets it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShortLinkPatch {
    pub target_url: Option<String>,
    pub description: Option<Option<String>>,
    /// Replaces the whole tag set.
    pub tags: Option<Vec<String>>,
    pub active: Option<bool>,
    pub expires_at: Option<Option<DateTime<Utc>>>,
}
