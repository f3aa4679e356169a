//! Fixed-window rate limiting.
//!
//! This service bounds request frequency per identifier (API key id, email,
//! restaurant + client IP) within a caller-supplied window. The first
//! request in a window starts a counter at 1; subsequent requests increment
//! it; once the counter exceeds the caller's maximum, requests are rejected
//! with a retry-after computed from the remaining window time. Windows reset
//! automatically once elapsed.
//!
//! # Scope
//!
//! Counters live in process memory behind a mutex and are NOT shared across
//! server instances. A horizontally scaled deployment gets one window per
//! instance for the same identifier. The limiter is injected through
//! `AppState` rather than a global precisely so a shared counter store can
//! replace it behind the same `check` call.

use std::{
    collections::HashMap,
    sync::Mutex,
    time::{Duration, Instant},
};

/// Counter state for one identifier's current window.
///
/// The window duration is recorded per entry: different surfaces share
/// one limiter with different windows (60 s key budgets, 600 s OTP
/// budgets), and eviction must judge each entry by its own clock.
#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: Instant,
    window: Duration,
    count: u32,
}

/// Outcome of a rejected rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryAfter {
    /// Time remaining until the identifier's window resets
    pub duration: Duration,
}

impl RetryAfter {
    /// Remaining window time in whole seconds, rounded up so clients never
    /// retry before the window actually resets.
    pub fn as_secs_ceil(&self) -> u64 {
        let secs = self.duration.as_secs();
        if self.duration.subsec_nanos() > 0 {
            secs + 1
        } else {
            secs.max(1)
        }
    }
}

/// Fixed-window counter map keyed by identifier string.
///
/// Window duration and maximum count are supplied per call, so the same
/// limiter instance serves every throttled surface (per-key request limits,
/// PIN attempts, OTP requests).
#[derive(Debug, Default)]
pub struct RateLimiter {
    windows: Mutex<HashMap<String, Window>>,
}

/// Purge stale windows once the map holds this many identifiers.
///
/// Expired entries for identifiers that never return would otherwise
/// accumulate forever.
const PURGE_THRESHOLD: usize = 10_000;

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one request for `identifier` and decide whether it may proceed.
    ///
    /// # Arguments
    ///
    /// * `identifier` - throttling key (e.g. `key:{uuid}`, `otp:{email}`)
    /// * `max_requests` - requests allowed per window
    /// * `window` - window duration
    ///
    /// # Returns
    ///
    /// - `Ok(())` when the request is within the limit
    /// - `Err(RetryAfter)` when the limit is exceeded; carries the time
    ///   remaining until the window resets
    pub fn check(
        &self,
        identifier: &str,
        max_requests: u32,
        window: Duration,
    ) -> Result<(), RetryAfter> {
        self.check_at(identifier, max_requests, window, Instant::now())
    }

    /// Clock-explicit variant of [`check`](Self::check) used by tests.
    fn check_at(
        &self,
        identifier: &str,
        max_requests: u32,
        window: Duration,
        now: Instant,
    ) -> Result<(), RetryAfter> {
        let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());

        if windows.len() >= PURGE_THRESHOLD {
            // Drop every window that has already elapsed, each judged by
            // its own duration; live counters must survive a purge intact
            windows.retain(|_, w| now.duration_since(w.started_at) < w.window);
        }

        let entry = windows.entry(identifier.to_string()).or_insert(Window {
            started_at: now,
            window,
            count: 0,
        });

        // Elapsed window: reset and start counting again
        if now.duration_since(entry.started_at) >= window {
            entry.started_at = now;
            entry.count = 0;
        }
        entry.window = window;

        entry.count += 1;

        if entry.count > max_requests {
            let elapsed = now.duration_since(entry.started_at);
            let remaining = window.saturating_sub(elapsed);
            return Err(RetryAfter { duration: remaining });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(60);

    #[test]
    fn allows_up_to_max_within_window() {
        let limiter = RateLimiter::new();
        let start = Instant::now();

        for _ in 0..5 {
            assert!(limiter.check_at("ip:1.2.3.4", 5, WINDOW, start).is_ok());
        }
    }

    #[test]
    fn rejects_request_past_max() {
        let limiter = RateLimiter::new();
        let start = Instant::now();

        for _ in 0..3 {
            assert!(limiter.check_at("email:a@b.c", 3, WINDOW, start).is_ok());
        }

        // 4th call in the same window must be rejected
        let err = limiter
            .check_at("email:a@b.c", 3, WINDOW, start)
            .unwrap_err();
        assert!(err.duration > Duration::ZERO);
        assert!(err.duration <= WINDOW);
    }

    #[test]
    fn retry_after_shrinks_as_window_elapses() {
        let limiter = RateLimiter::new();
        let start = Instant::now();

        assert!(limiter.check_at("k", 1, WINDOW, start).is_ok());

        let early = limiter
            .check_at("k", 1, WINDOW, start + Duration::from_secs(10))
            .unwrap_err();
        let late = limiter
            .check_at("k", 1, WINDOW, start + Duration::from_secs(50))
            .unwrap_err();

        assert_eq!(early.duration, Duration::from_secs(50));
        assert_eq!(late.duration, Duration::from_secs(10));
    }

    #[test]
    fn window_resets_after_expiry() {
        let limiter = RateLimiter::new();
        let start = Instant::now();

        assert!(limiter.check_at("k", 1, WINDOW, start).is_ok());
        assert!(limiter.check_at("k", 1, WINDOW, start).is_err());

        // First call after the window elapses starts a fresh count
        let after = start + WINDOW;
        assert!(limiter.check_at("k", 1, WINDOW, after).is_ok());
    }

    #[test]
    fn identifiers_are_independent() {
        let limiter = RateLimiter::new();
        let start = Instant::now();

        assert!(limiter.check_at("a", 1, WINDOW, start).is_ok());
        assert!(limiter.check_at("a", 1, WINDOW, start).is_err());
        assert!(limiter.check_at("b", 1, WINDOW, start).is_ok());
    }

    #[test]
    fn purge_keeps_live_counters_with_longer_windows() {
        let limiter = RateLimiter::new();
        let start = Instant::now();
        let long = Duration::from_secs(600);
        let short = Duration::from_millis(1);

        // Exhaust a long-window counter
        assert!(limiter.check_at("otp-request:a@b.c", 1, long, start).is_ok());
        assert!(limiter.check_at("otp-request:a@b.c", 1, long, start).is_err());

        // Flood the map with short-window identifiers until the purge
        // runs, well past their own expiry
        let later = start + Duration::from_secs(1);
        for i in 0..(PURGE_THRESHOLD + 100) {
            let _ = limiter.check_at(&format!("key:{i}"), 1, short, later);
        }

        // The long window is still open; its count must have survived
        assert!(
            limiter.check_at("otp-request:a@b.c", 1, long, later).is_err(),
            "live long-window counter was evicted by the purge"
        );
    }

    #[test]
    fn retry_after_seconds_round_up() {
        let retry = RetryAfter {
            duration: Duration::from_millis(1500),
        };
        assert_eq!(retry.as_secs_ceil(), 2);

        let retry = RetryAfter {
            duration: Duration::from_secs(3),
        };
        assert_eq!(retry.as_secs_ceil(), 3);

        // Never report zero: the client would retry immediately
        let retry = RetryAfter {
            duration: Duration::ZERO,
        };
        assert_eq!(retry.as_secs_ceil(), 1);
    }
}
