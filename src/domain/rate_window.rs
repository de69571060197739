//! Fixed-window counter state used by the admission controller.

/// Identifies one counter: a client identity on one endpoint path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WindowKey {
    pub identity: String,
    pub endpoint: String,
}

impl WindowKey {
    pub fn new(identity: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            endpoint: endpoint.into(),
        }
    }
}

/// Requests seen in the current window and the instant (epoch millis) it expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateWindow {
    pub count: u32,
    pub reset_at_ms: i64,
}

impl RateWindow {
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms >= self.reset_at_ms
    }
}

/// Process-local storage for rate windows.
///
/// `update` must run the closure atomically with respect to other calls for the
/// same key. The closure receives `None` when no window exists; leaving `None`
/// in the slot removes the entry.
pub trait WindowStore: Send + Sync {
    fn get(&self, key: &WindowKey) -> Option<RateWindow>;

    fn update(&self, key: WindowKey, apply: &mut dyn FnMut(&mut Option<RateWindow>));

    /// Drops windows already expired at `now_ms`. Returns how many were removed.
    fn sweep(&self, now_ms: i64) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
