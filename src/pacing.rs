//! Fixed-delay pacing between sequential lookups.

use std::time::Duration;
use tracing::trace;

/// Sleeps a fixed interval after every lookup, including the last one.
#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    delay: Duration,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub async fn pause(&self) {
        trace!("Pausing {:?} before next lookup", self.delay);
        tokio::time::sleep(self.delay).await;
    }
}
