//! Click event model for asynchronous click tracking.

use chrono::{DateTime, Utc};
use std::fmt;

/// Which kind of entity a click is recorded against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClickKind {
    ShortLink,
    ListItem,
}

impl ClickKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShortLink => "short_link",
            Self::ListItem => "list_item",
        }
    }
}

impl fmt::Display for ClickKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single entity a click counts against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClickTarget {
    ShortLink(i64),
    ListItem(i64),
}

impl ClickTarget {
    pub fn kind(&self) -> ClickKind {
        match self {
            Self::ShortLink(_) => ClickKind::ShortLink,
            Self::ListItem(_) => ClickKind::ListItem,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Self::ShortLink(id) | Self::ListItem(id) => *id,
        }
    }
}

/// A click handed from the request path to the background worker.
///
/// `occurred_at` is captured when the click is accepted, so queueing delay
/// never moves a click into a different day bucket.
///
/// # Usage Flow
///
/// 1. Created by [`crate::application::services::ClickRecorder`] in the redirect or tracking handler
/// 2. Sent to a bounded channel (non-blocking)
/// 3. Processed by [`crate::domain::click_worker::run_click_worker`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickEvent {
    pub target: ClickTarget,
    pub occurred_at: DateTime<Utc>,
}

impl ClickEvent {
    pub fn new(target: ClickTarget, occurred_at: DateTime<Utc>) -> Self {
        Self {
            target,
            occurred_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_kind_and_id() {
        let link = ClickTarget::ShortLink(7);
        let item = ClickTarget::ListItem(9);

        assert_eq!(link.kind(), ClickKind::ShortLink);
        assert_eq!(link.id(), 7);
        assert_eq!(item.kind(), ClickKind::ListItem);
        assert_eq!(item.id(), 9);
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(ClickKind::ShortLink.to_string(), "short_link");
        assert_eq!(ClickKind::ListItem.as_str(), "list_item");
    }
}
