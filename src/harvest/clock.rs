//! Injectable sleep primitive.
//!
//! The harvest cycle never blocks a thread; every wait goes through a
//! `Clock` so tests can drive the state machine without real delays.

use async_trait::async_trait;
use std::time::Duration;

/// A source of deferred continuations.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Wait for the given duration.
    async fn sleep(&self, duration: Duration);
}

/// Wall-clock implementation backed by the tokio timer.
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
