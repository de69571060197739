//! Fixed-window admission control for public endpoints.
//!
//! Each `(client identity, endpoint path)` pair owns one counter. A window opens
//! on the first request, admits up to `max_requests`, and resets once its
//! deadline passes. A burst straddling a window boundary can therefore see up to
//! `2 * max_requests` admissions in a short span; that is the accepted cost of a
//! fixed window.
//!
//! State is process-local. Several replicas each enforce their own limit.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use crate::domain::clock::Clock;
use crate::domain::rate_window::{RateWindow, WindowKey, WindowStore};
use tracing::debug;

/// Limit applied to one endpoint class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window_ms: u64,
}

impl RateLimitConfig {
    pub const fn new(max_requests: u32, window_ms: u64) -> Self {
        Self {
            max_requests,
            window_ms,
        }
    }
}

/// Outcome of one admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdmissionDecision {
    pub allowed: bool,
    pub remaining: u32,
    pub limit: u32,
    /// Epoch millis at which the current window resets.
    pub reset_at_ms: i64,
}

impl AdmissionDecision {
    /// Whole seconds until the window resets, at least 1.
    pub fn retry_after_secs(&self, now_ms: i64) -> u64 {
        let wait_ms = (self.reset_at_ms - now_ms).max(0) as u64;
        wait_ms.div_ceil(1000).max(1)
    }
}

/// Minimum gap between two ceiling-triggered sweeps.
const SWEEP_INTERVAL_MS: i64 = 1_000;

pub struct AdmissionController {
    store: Arc<dyn WindowStore>,
    clock: Arc<dyn Clock>,
    max_entries: usize,
    last_sweep_ms: AtomicI64,
}

impl AdmissionController {
    /// `max_entries` is the window count above which expired windows are swept.
    pub fn new(store: Arc<dyn WindowStore>, clock: Arc<dyn Clock>, max_entries: usize) -> Self {
        Self {
            store,
            clock,
            max_entries,
            last_sweep_ms: AtomicI64::new(i64::MIN),
        }
    }

    /// Counts one request for `(identity, endpoint)` and decides whether it may proceed.
    ///
    /// A denied request is not counted. Decisions for one key are linearizable
    /// because the store applies the read-modify-write under that key's lock.
    pub fn check_and_consume(
        &self,
        identity: &str,
        endpoint: &str,
        config: &RateLimitConfig,
    ) -> AdmissionDecision {
        let now_ms = self.clock.now_millis();

        if self.store.len() > self.max_entries && self.claim_sweep(now_ms) {
            self.sweep_at(now_ms);
        }

        let mut decision = AdmissionDecision {
            allowed: false,
            remaining: 0,
            limit: config.max_requests,
            reset_at_ms: now_ms,
        };

        self.store
            .update(WindowKey::new(identity, endpoint), &mut |slot: &mut Option<RateWindow>| {
                decision = apply(slot, now_ms, config);
            });

        decision
    }

    pub fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }

    /// Drops expired windows. Live windows are never touched.
    pub fn sweep_expired(&self) -> usize {
        self.sweep_at(self.clock.now_millis())
    }

    pub fn tracked_windows(&self) -> usize {
        self.store.len()
    }

    /// At most one ceiling-triggered sweep per [`SWEEP_INTERVAL_MS`], across all callers.
    fn claim_sweep(&self, now_ms: i64) -> bool {
        let last = self.last_sweep_ms.load(Ordering::Acquire);
        now_ms.saturating_sub(last) >= SWEEP_INTERVAL_MS
            && self
                .last_sweep_ms
                .compare_exchange(last, now_ms, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
    }

    fn sweep_at(&self, now_ms: i64) -> usize {
        let evicted = self.store.sweep(now_ms);
        if evicted > 0 {
            metrics::counter!("admission_evicted_total").increment(evicted as u64);
            debug!(evicted, remaining = self.store.len(), "Swept expired rate windows");
        }
        evicted
    }
}

fn apply(slot: &mut Option<RateWindow>, now_ms: i64, config: &RateLimitConfig) -> AdmissionDecision {
    let limit = config.max_requests;

    match slot {
        Some(window) if !window.is_expired_at(now_ms) => {
            if window.count < limit {
                window.count += 1;
                AdmissionDecision {
                    allowed: true,
                    remaining: limit - window.count,
                    limit,
                    reset_at_ms: window.reset_at_ms,
                }
            } else {
                AdmissionDecision {
                    allowed: false,
                    remaining: 0,
                    limit,
                    reset_at_ms: window.reset_at_ms,
                }
            }
        }
        _ => {
            let window_ms = i64::try_from(config.window_ms).unwrap_or(i64::MAX);
            let window = RateWindow {
                count: 1,
                reset_at_ms: now_ms.saturating_add(window_ms),
            };
            *slot = Some(window);
            AdmissionDecision {
                allowed: limit >= 1,
                remaining: limit.saturating_sub(1),
                limit,
                reset_at_ms: window.reset_at_ms,
            }
        }
    }
}
