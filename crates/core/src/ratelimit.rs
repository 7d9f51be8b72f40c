//! Sliding-window rate limiting for agent-facing operations.
//!
//! Each action name owns an ordered list of recent call instants. A call is
//! allowed when fewer than `limit` calls remain inside the window once stale
//! entries are discarded; denied calls are not recorded, so hammering a
//! limited action does not extend the lockout.
//!
//! Limits and windows are supplied per call site, which lets different
//! actions carry different policies without parameterizing the limiter.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

/// Per-key sliding-window call counter.
///
/// Thread-safe: concurrent callers using the same key share a single logical
/// counter. State is process-lifetime only; nothing persists across restarts.
#[derive(Debug, Default)]
pub struct RateLimiter {
    windows: Mutex<HashMap<String, Vec<Instant>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether an action keyed by `key` is allowed right now.
    ///
    /// On success the current instant is recorded and `true` is returned; on
    /// rejection nothing is recorded and `false` is returned.
    pub fn check(&self, key: &str, limit: usize, window: Duration) -> bool {
        let now = Instant::now();
        let mut windows = self.windows.lock().expect("rate limiter lock poisoned");
        let entries = windows.entry(key.to_string()).or_default();

        entries.retain(|t| now.duration_since(*t) < window);

        if entries.len() >= limit {
            debug!(key, limit, "rate limit exceeded");
            return false;
        }

        entries.push(now);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_limit_enforced_within_window() {
        let limiter = RateLimiter::new();
        let window = Duration::from_millis(1000);

        assert!(limiter.check("resolve", 2, window));
        assert!(limiter.check("resolve", 2, window));
        assert!(!limiter.check("resolve", 2, window));
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_expiry_frees_slots() {
        let limiter = RateLimiter::new();
        let window = Duration::from_millis(1000);

        assert!(limiter.check("list", 2, window));
        assert!(limiter.check("list", 2, window));
        assert!(!limiter.check("list", 2, window));

        tokio::time::advance(Duration::from_millis(1001)).await;
        assert!(limiter.check("list", 2, window));
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_are_independent() {
        let limiter = RateLimiter::new();
        let window = Duration::from_millis(1000);

        assert!(limiter.check("read", 1, window));
        assert!(!limiter.check("read", 1, window));
        // A different action keeps its own counter.
        assert!(limiter.check("list", 1, window));
    }

    #[tokio::test(start_paused = true)]
    async fn test_denied_calls_are_not_recorded() {
        let limiter = RateLimiter::new();
        let window = Duration::from_millis(1000);

        assert!(limiter.check("save", 1, window));
        for _ in 0..10 {
            assert!(!limiter.check("save", 1, window));
        }

        // Only the single allowed call occupies the window, so it frees up
        // exactly one window after it was made.
        tokio::time::advance(Duration::from_millis(1001)).await;
        assert!(limiter.check("save", 1, window));
    }
}
