//! Politeness throttle
//!
//! Enforces a minimum interval between the end of one fetch and the start of
//! the next. Only requests that actually hit the network are paced; skipping a
//! frontier entry never waits.

use std::time::Duration;
use tokio::time::Instant;

/// Minimum-interval throttle for a single in-flight request stream
#[derive(Debug, Clone)]
pub struct Throttle {
    delay: Duration,
    last_fetch: Option<Instant>,
}

impl Throttle {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_fetch: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Time left before the next request may start, or `None` if it may start now
    pub fn time_until_ready(&self, now: Instant) -> Option<Duration> {
        let last = self.last_fetch?;
        let ready_at = last + self.delay;
        if now >= ready_at {
            None
        } else {
            Some(ready_at - now)
        }
    }

    /// Sleeps until the next request may start
    pub async fn wait_turn(&self) {
        if let Some(wait) = self.time_until_ready(Instant::now()) {
            tracing::trace!("Throttling next request for {:?}", wait);
            tokio::time::sleep(wait).await;
        }
    }

    /// Records that a request just finished
    pub fn record_fetch(&mut self) {
        self.last_fetch = Some(Instant::now());
    }
}
