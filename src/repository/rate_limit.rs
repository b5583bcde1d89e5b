//! Request throttling shared by every hosting API call of one invocation.
//!
//! A bucket of `capacity` tokens refilled one at a time, every
//! `window / capacity`. A full bucket holds its schedule at the current
//! instant, so the first refill comes one interval after the first token
//! drawn from it. Tokens are only ever returned by the clock.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep_until};

/// Requests per minute the hosting API allows for authenticated callers
pub const AUTHENTICATED_PER_MINUTE: u32 = 30;
/// Requests per minute the hosting API allows for anonymous callers
pub const ANONYMOUS_PER_MINUTE: u32 = 10;

pub struct RateLimiter {
    capacity: u32,
    interval: Duration,
    bucket: Mutex<Bucket>,
}

struct Bucket {
    available: u32,
    last_tick: Instant,
}

impl RateLimiter {
    pub fn new(capacity: u32, window: Duration) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            interval: window / capacity,
            bucket: Mutex::new(Bucket {
                available: capacity,
                last_tick: Instant::now(),
            }),
        }
    }

    /// Budget for the hosting API: one minute plus `buffer` to absorb clock
    /// skew against the server's own window.
    pub fn for_hosting_api(authenticated: bool, buffer: Duration) -> Self {
        let per_minute = if authenticated {
            AUTHENTICATED_PER_MINUTE
        } else {
            ANONYMOUS_PER_MINUTE
        };
        Self::new(per_minute, Duration::from_secs(60) + buffer)
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Time between two refills
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Waits until a token is available and takes it.
    pub async fn acquire(&self) {
        loop {
            let wake_at = {
                let mut bucket = self.bucket.lock().await;
                bucket.refill(self.capacity, self.interval, Instant::now());
                if bucket.available > 0 {
                    bucket.available -= 1;
                    return;
                }
                bucket.last_tick + self.interval
            };
            tracing::debug!(wait = ?wake_at.saturating_duration_since(Instant::now()), "rate limit reached");
            sleep_until(wake_at).await;
        }
    }

    /// Tokens that could be taken right now without waiting
    pub async fn available(&self) -> u32 {
        let mut bucket = self.bucket.lock().await;
        bucket.refill(self.capacity, self.interval, Instant::now());
        bucket.available
    }
}

impl Bucket {
    fn refill(&mut self, capacity: u32, interval: Duration, now: Instant) {
        if interval.is_zero() {
            self.available = capacity;
            self.last_tick = now;
            return;
        }
        if self.available >= capacity {
            self.last_tick = now;
            return;
        }
        let elapsed = now.saturating_duration_since(self.last_tick);
        let ticks = u32::try_from(elapsed.as_nanos() / interval.as_nanos()).unwrap_or(u32::MAX);
        if ticks == 0 {
            return;
        }
        self.available = self.available.saturating_add(ticks).min(capacity);
        if self.available == capacity {
            self.last_tick = now;
        } else {
            self.last_tick += interval.saturating_mul(ticks);
        }
    }
}
