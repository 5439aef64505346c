//! Injectable sleeping for backoff delays.

use std::time::Duration;

use async_trait::async_trait;

/// Suspends the current task between retry attempts.
///
/// The resilient client never calls `tokio::time::sleep` directly; tests
/// substitute a sleeper that records the requested delays and returns at once.
#[async_trait]
pub trait Sleeper: Send + Sync + std::fmt::Debug {
    async fn sleep(&self, delay: Duration);
}

/// Production sleeper backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
