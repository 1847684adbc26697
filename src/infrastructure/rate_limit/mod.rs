use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

/// Injected rate-limiter seam: an in-memory backend for single-node and test
/// use; production deployments can swap in a distributed store behind the
/// same trait. No module-level singletons.
pub trait RateLimiter: Send + Sync {
    fn allow(&self, key: &str) -> bool;
}

/// Fixed-window counter per key.
pub struct InMemoryRateLimiter {
    max_per_window: u32,
    window: Duration,
    buckets: Mutex<HashMap<String, WindowState>>,
}

struct WindowState {
    window_start: DateTime<Utc>,
    count: u32,
}

impl InMemoryRateLimiter {
    pub fn new(max_per_window: u32, window: Duration) -> Self {
        Self {
            max_per_window,
            window,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    pub fn per_minute(max_per_window: u32) -> Self {
        Self::new(max_per_window, Duration::minutes(1))
    }

    fn allow_at(&self, key: &str, now: DateTime<Utc>) -> bool {
        let mut buckets = self.buckets.lock().expect("rate limiter lock poisoned");
        let state = buckets.entry(key.to_string()).or_insert(WindowState {
            window_start: now,
            count: 0,
        });

        if now - state.window_start >= self.window {
            state.window_start = now;
            state.count = 0;
        }

        if state.count >= self.max_per_window {
            return false;
        }

        state.count += 1;
        true
    }
}

impl RateLimiter for InMemoryRateLimiter {
    fn allow(&self, key: &str) -> bool {
        self.allow_at(key, Utc::now())
    }
}
