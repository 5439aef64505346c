//! Deterministic sleeper for retry tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::resilience::Sleeper;

/// Records every requested delay and returns without waiting.
///
/// Clones share the same record, so a test can keep one handle and give the
/// other to the client under test.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    delays: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    /// Empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays requested so far, in call order.
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().clone()
    }

    /// Sum of all recorded delays.
    pub fn total(&self) -> Duration {
        self.delays.lock().iter().copied().fold(Duration::ZERO, Duration::saturating_add)
    }

    /// Forget every recorded delay.
    pub fn clear(&self) {
        self.delays.lock().clear();
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, delay: Duration) {
        self.delays.lock().push(delay);
    }
}
