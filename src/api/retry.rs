use std::time::Duration;

use bon::Builder;
use tokio::time::sleep;

use crate::{api::FetchError, prelude::*};

/// Retry policy shared by all upstream calls.
#[must_use]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Builder)]
pub struct RetryPolicy {
    /// Including the very first attempt.
    #[builder(default = 3)]
    max_attempts: u32,

    /// Delay before the second attempt.
    #[builder(default = Duration::from_secs(1), into)]
    initial_delay: Duration,

    /// Each subsequent delay is multiplied by this factor.
    #[builder(default = 2)]
    multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl RetryPolicy {
    /// Single attempt, no retries.
    pub const NONE: Self = Self { max_attempts: 1, initial_delay: Duration::ZERO, multiplier: 1 };

    /// Delay to wait before the specified attempt (1-based).
    #[must_use]
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            Duration::ZERO
        } else {
            self.initial_delay.saturating_mul(self.multiplier.saturating_pow(attempt - 2))
        }
    }

    /// Run the operation until it succeeds, fails permanently, or the attempts run out.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T, FetchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(error) if error.is_retryable() && attempt < max_attempts => {
                    attempt += 1;
                    let delay = self.delay_before(attempt);
                    warn!(attempt, max_attempts, ?delay, %error, "retrying…");
                    sleep(delay).await;
                }
                Err(error) => return Err(error),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn unavailable() -> FetchError {
        FetchError::Status { status: 503, message: "Service Unavailable".to_owned() }
    }

    #[test]
    fn test_delay_before() {
        let policy = RetryPolicy::builder()
            .max_attempts(4)
            .initial_delay(Duration::from_millis(100))
            .multiplier(3)
            .build();
        assert_eq!(policy.delay_before(1), Duration::ZERO);
        assert_eq!(policy.delay_before(2), Duration::from_millis(100));
        assert_eq!(policy.delay_before(3), Duration::from_millis(300));
        assert_eq!(policy.delay_before(4), Duration::from_millis(900));
    }

    #[tokio::test]
    async fn test_run_retries_until_success() -> Result {
        let policy = RetryPolicy::builder().initial_delay(Duration::ZERO).build();
        let n_calls = &Cell::new(0);
        let value = policy
            .run(move || async move {
                n_calls.set(n_calls.get() + 1);
                if n_calls.get() < 3 { Err(unavailable()) } else { Ok(42) }
            })
            .await?;
        assert_eq!(value, 42);
        assert_eq!(n_calls.get(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_run_gives_up_after_max_attempts() {
        let policy =
            RetryPolicy::builder().max_attempts(2).initial_delay(Duration::ZERO).build();
        let n_calls = &Cell::new(0);
        let result = policy
            .run(move || async move {
                n_calls.set(n_calls.get() + 1);
                Err::<(), _>(unavailable())
            })
            .await;
        assert!(matches!(result, Err(FetchError::Status { status: 503, .. })));
        assert_eq!(n_calls.get(), 2);
    }

    #[tokio::test]
    async fn test_run_does_not_retry_authentication() {
        let n_calls = &Cell::new(0);
        let result = RetryPolicy::default()
            .run(move || async move {
                n_calls.set(n_calls.get() + 1);
                Err::<(), _>(FetchError::Authentication { status: 401 })
            })
            .await;
        assert!(matches!(result, Err(FetchError::Authentication { .. })));
        assert_eq!(n_calls.get(), 1);
    }
}
