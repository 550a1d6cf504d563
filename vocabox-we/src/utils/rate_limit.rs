//! Minimum-interval rate limiting for outbound API clients

use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Enforces a minimum interval between requests to one provider.
///
/// Keeps bursts of cache misses from hammering an upstream; it is not a
/// token bucket and does not retry.
pub struct MinIntervalLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl MinIntervalLimiter {
    pub fn new(min_interval_ms: u64) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval: Duration::from_millis(min_interval_ms),
        }
    }

    /// Wait if necessary to comply with the interval.
    pub async fn wait(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                tracing::debug!("Rate limiting: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}
