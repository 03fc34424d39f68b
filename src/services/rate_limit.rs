// src/services/rate_limit.rs
// DOCUMENTATION: Login attempt throttling
// PURPOSE: Slow down password guessing, keyed by normalized e-mail

use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

/// Keyed rate limiter for login attempts
pub struct LoginRateLimiter {
    limiter: DefaultKeyedRateLimiter<String>,
}

impl LoginRateLimiter {
    /// Allow `per_minute` attempts per key, with a burst of the same size
    pub fn new(per_minute: u32) -> Self {
        let per_minute = NonZeroU32::new(per_minute).unwrap_or(NonZeroU32::MIN);
        Self {
            limiter: RateLimiter::keyed(Quota::per_minute(per_minute)),
        }
    }

    /// Consume one attempt; false when the key is over its quota
    pub fn check(&self, key: &str) -> bool {
        let allowed = self.limiter.check_key(&key.to_string()).is_ok();
        if !allowed {
            log::warn!("Login rate limit hit for {}", key);
        }
        allowed
    }

    /// Drop keys whose quota has fully replenished
    pub fn cleanup(&self) {
        let before = self.limiter.len();
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
        let after = self.limiter.len();

        if before > after {
            log::debug!(
                "Rate limiter cleanup: removed {} idle keys ({} remaining)",
                before - after,
                after
            );
        }
    }

    pub fn tracked_keys(&self) -> usize {
        self.limiter.len()
    }
}

/// Start background cleanup task
/// DOCUMENTATION: Periodically forgets idle keys so memory stays bounded
pub fn start_cleanup_task(limiter: Arc<LoginRateLimiter>, interval_seconds: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds));

        loop {
            interval.tick().await;
            limiter.cleanup();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_is_per_key() {
        let limiter = LoginRateLimiter::new(2);

        assert!(limiter.check("a@example.fr"));
        assert!(limiter.check("a@example.fr"));
        assert!(!limiter.check("a@example.fr"));

        // Other keys have their own budget
        assert!(limiter.check("b@example.fr"));
        assert_eq!(limiter.tracked_keys(), 2);
    }

    #[test]
    fn test_zero_quota_falls_back_to_one() {
        let limiter = LoginRateLimiter::new(0);
        assert!(limiter.check("x"));
        assert!(!limiter.check("x"));
    }
}
