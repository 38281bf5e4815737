use std::time::Duration;

use tokio::time::sleep;

use crate::prelude::*;

/// Enforces the fixed delay between successive upstream calls.
#[must_use]
pub struct Pacer {
    delay: Duration,
    n_calls: usize,
}

impl Pacer {
    pub const fn new(delay: Duration) -> Self {
        Self { delay, n_calls: 0 }
    }

    /// Wait before the upcoming call, unless it is the very first one.
    pub async fn wait(&mut self) {
        if self.n_calls != 0 && !self.delay.is_zero() {
            trace!(delay = ?self.delay, "pacing…");
            sleep(self.delay).await;
        }
        self.n_calls += 1;
    }

    #[must_use]
    pub const fn n_calls(&self) -> usize {
        self.n_calls
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    #[tokio::test]
    async fn test_first_call_is_not_delayed() {
        let mut pacer = Pacer::new(Duration::from_secs(3600));
        let started_at = Instant::now();
        pacer.wait().await;
        assert!(started_at.elapsed() < Duration::from_secs(1));
        assert_eq!(pacer.n_calls(), 1);
    }

    #[tokio::test]
    async fn test_successive_calls_are_delayed() {
        let mut pacer = Pacer::new(Duration::from_millis(20));
        let started_at = Instant::now();
        pacer.wait().await;
        pacer.wait().await;
        pacer.wait().await;
        assert!(started_at.elapsed() >= Duration::from_millis(40));
        assert_eq!(pacer.n_calls(), 3);
    }
}
