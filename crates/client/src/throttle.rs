//! Process-wide pacing of outbound search requests.

use async_trait::async_trait;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Delays callers so outbound requests respect a minimum spacing.
#[async_trait]
pub trait Throttle: Send + Sync {
    /// Wait until the next request may be sent, then record it as sent.
    async fn wait_if_needed(&self);
}

/// Fixed minimum interval between requests.
///
/// The lock is held across the sleep, so concurrent callers are released one
/// interval apart in arrival order.
#[derive(Debug)]
pub struct RateLimiter {
    last_request: Mutex<Instant>,
    min_interval: Duration,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Mutex::new(Instant::now().checked_sub(min_interval).unwrap_or_else(Instant::now)),
            min_interval,
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

#[async_trait]
impl Throttle for RateLimiter {
    async fn wait_if_needed(&self) {
        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();
        if elapsed < self.min_interval {
            let wait = self.min_interval - elapsed;
            tracing::debug!("throttling search request for {:?}", wait);
            tokio::time::sleep(wait).await;
        }
        *last = Instant::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_first_request_not_delayed() {
        let limiter = RateLimiter::new(Duration::from_secs(2));
        let start = Instant::now();
        limiter.wait_if_needed().await;
        assert!(start.elapsed() < Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_second_request_waits_interval() {
        let limiter = RateLimiter::new(Duration::from_millis(150));
        limiter.wait_if_needed().await;

        let start = Instant::now();
        limiter.wait_if_needed().await;
        assert!(start.elapsed() >= Duration::from_millis(140));
    }

    #[tokio::test]
    async fn test_no_wait_after_interval_elapsed() {
        let limiter = RateLimiter::new(Duration::from_millis(50));
        limiter.wait_if_needed().await;
        tokio::time::sleep(Duration::from_millis(80)).await;

        let start = Instant::now();
        limiter.wait_if_needed().await;
        assert!(start.elapsed() < Duration::from_millis(40));
    }

    #[tokio::test]
    async fn test_concurrent_callers_serialized() {
        let limiter: Arc<dyn Throttle> = Arc::new(RateLimiter::new(Duration::from_millis(100)));
        let start = Instant::now();

        let handles: Vec<_> = (0..3)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                tokio::spawn(async move { limiter.wait_if_needed().await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        // First passes immediately, the other two wait one interval each.
        assert!(start.elapsed() >= Duration::from_millis(190));
    }

    #[test]
    fn test_zero_interval() {
        let limiter = RateLimiter::new(Duration::ZERO);
        assert_eq!(limiter.min_interval(), Duration::ZERO);
    }
}
