//! Outbound rate limiting for provider calls.
//!
//! Two fixed windows (per-minute and per-hour) reset lazily on access.
//! Denial is immediate: the limiter never queues or retries, callers must
//! surface the rejection as a distinct error rather than silently dropping
//! the request.

use std::sync::Mutex;
use std::time::{Duration, Instant};

const MINUTE: Duration = Duration::from_secs(60);
const HOUR: Duration = Duration::from_secs(3600);

struct Windows {
    minute_count: u32,
    hour_count: u32,
    minute_started: Instant,
    hour_started: Instant,
}

/// Process-wide limiter bounding outbound provider calls per minute and per
/// hour. Counters are approximate fixed windows, not a precise sliding log;
/// they live only in memory and reset on restart.
pub struct RateLimiter {
    inner: Mutex<Windows>,
    per_minute: u32,
    per_hour: u32,
    minute_period: Duration,
    hour_period: Duration,
}

impl RateLimiter {
    #[must_use]
    pub fn new(per_minute: u32, per_hour: u32) -> Self {
        Self::with_periods(per_minute, per_hour, MINUTE, HOUR)
    }

    /// Construct with custom window lengths. Production uses 60 s / 3600 s;
    /// tests shrink the windows to observe resets without waiting.
    #[must_use]
    pub fn with_periods(
        per_minute: u32,
        per_hour: u32,
        minute_period: Duration,
        hour_period: Duration,
    ) -> Self {
        let now = Instant::now();
        Self {
            inner: Mutex::new(Windows {
                minute_count: 0,
                hour_count: 0,
                minute_started: now,
                hour_started: now,
            }),
            per_minute,
            per_hour,
            minute_period,
            hour_period,
        }
    }

    /// Try to take one slot from both windows.
    ///
    /// Returns `false` once either threshold is reached; a denied call does
    /// not consume a slot.
    ///
    /// # Panics
    ///
    /// Panics if the interior mutex was poisoned by a panicking thread.
    pub fn try_acquire(&self) -> bool {
        let now = Instant::now();
        let mut w = self.inner.lock().expect("rate limiter mutex poisoned");

        if now.duration_since(w.minute_started) >= self.minute_period {
            w.minute_count = 0;
            w.minute_started = now;
        }
        if now.duration_since(w.hour_started) >= self.hour_period {
            w.hour_count = 0;
            w.hour_started = now;
        }

        if w.minute_count >= self.per_minute || w.hour_count >= self.per_hour {
            return false;
        }

        w.minute_count += 1;
        w.hour_count += 1;
        true
    }

    /// Current (minute, hour) counts, for status reporting.
    ///
    /// # Panics
    ///
    /// Panics if the interior mutex was poisoned by a panicking thread.
    #[must_use]
    pub fn usage(&self) -> (u32, u32) {
        let w = self.inner.lock().expect("rate limiter mutex poisoned");
        (w.minute_count, w.hour_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_up_to_minute_threshold_then_rejects() {
        let limiter = RateLimiter::new(3, 100);
        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire(), "call 4 of 3 must be rejected");
        assert_eq!(limiter.usage(), (3, 3));
    }

    #[test]
    fn hour_threshold_rejects_even_with_minute_headroom() {
        let limiter = RateLimiter::new(100, 2);
        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
    }

    #[test]
    fn denied_call_does_not_consume_a_slot() {
        let limiter = RateLimiter::new(1, 100);
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
        assert_eq!(limiter.usage(), (1, 1));
    }

    #[test]
    fn minute_window_resets_after_period() {
        let limiter =
            RateLimiter::with_periods(2, 100, Duration::from_millis(20), Duration::from_secs(3600));
        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());

        std::thread::sleep(Duration::from_millis(25));
        assert!(
            limiter.try_acquire(),
            "a fresh window must accept calls again"
        );
        assert_eq!(limiter.usage().0, 1, "minute counter restarts from zero");
    }

    #[test]
    fn hour_counter_survives_minute_reset() {
        let limiter =
            RateLimiter::with_periods(1, 100, Duration::from_millis(10), Duration::from_secs(3600));
        assert!(limiter.try_acquire());
        std::thread::sleep(Duration::from_millis(15));
        assert!(limiter.try_acquire());
        assert_eq!(limiter.usage(), (1, 2));
    }
}
