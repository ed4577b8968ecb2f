use std::sync::Arc;
use std::time::Duration;

use governor::clock::DefaultClock;
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Token bucket with a burst of one, spacing consecutive upstream passes.
#[derive(Clone)]
pub struct Pacer {
    limiter: Option<Arc<DirectRateLimiter>>,
}

impl Pacer {
    /// A zero interval disables pacing.
    pub fn new(interval: Duration) -> Self {
        let limiter = Quota::with_period(interval)
            .map(RateLimiter::direct)
            .map(Arc::new);
        Self { limiter }
    }

    /// Waits until the next pass may start. The first call returns immediately.
    pub async fn wait(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}
