use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Fixed-window request limiter keyed by caller-supplied strings (client key
/// plus query hash for auction starts).
///
/// Owned by the service that uses it rather than living in a process-global;
/// one instance guards one deployment process. Horizontally scaled replicas
/// each enforce the window independently.
pub struct RateLimiter {
    windows: DashMap<String, WindowState>,
    window: Duration,
    max_hits: u32,
}

struct WindowState {
    started_at: Instant,
    hits: u32,
}

impl RateLimiter {
    pub fn new(window: Duration, max_hits: u32) -> Self {
        Self {
            windows: DashMap::new(),
            window,
            max_hits,
        }
    }

    /// Records a hit for `key` and reports whether it is still within the
    /// window's allowance.
    pub fn check(&self, key: &str) -> bool {
        let mut entry = self
            .windows
            .entry(key.to_string())
            .or_insert_with(|| WindowState {
                started_at: Instant::now(),
                hits: 0,
            });
        if entry.started_at.elapsed() >= self.window {
            entry.started_at = Instant::now();
            entry.hits = 0;
        }
        entry.hits += 1;
        entry.hits <= self.max_hits
    }

    /// Drops windows that have fully elapsed. Callers may invoke this
    /// periodically to keep the map from growing unbounded.
    pub fn purge_expired(&self) {
        self.windows
            .retain(|_, state| state.started_at.elapsed() < self.window);
    }

    pub fn tracked_keys(&self) -> usize {
        self.windows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_up_to_max_hits() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 3);
        assert!(limiter.check("k"));
        assert!(limiter.check("k"));
        assert!(limiter.check("k"));
        assert!(!limiter.check("k"));
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 1);
        assert!(limiter.check("a"));
        assert!(limiter.check("b"));
        assert!(!limiter.check("a"));
    }

    #[test]
    fn test_window_resets() {
        let limiter = RateLimiter::new(Duration::from_millis(0), 1);
        assert!(limiter.check("k"));
        // zero-length window: every hit starts a fresh window
        assert!(limiter.check("k"));
    }

    #[test]
    fn test_purge_drops_elapsed_windows() {
        let limiter = RateLimiter::new(Duration::from_millis(0), 1);
        limiter.check("k");
        limiter.purge_expired();
        assert_eq!(limiter.tracked_keys(), 0);
    }
}
