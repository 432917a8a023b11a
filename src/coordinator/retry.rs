//! Bounded retry for units of work that lost the race for an order guard.

use crate::error::PosError;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total tries, including the first.
    pub attempts: u32,
    /// Delay before the second try; doubles after each further conflict.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff: Duration::from_millis(25),
        }
    }
}

impl RetryPolicy {
    /// Runs `op` until it succeeds, fails with anything other than
    /// [`PosError::ConcurrencyConflict`], or runs out of attempts.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, PosError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, PosError>>,
    {
        let mut delay = self.backoff;
        let mut attempt = 1;
        loop {
            match op().await {
                Err(PosError::ConcurrencyConflict(order)) if attempt < self.attempts => {
                    warn!(
                        %order,
                        attempt,
                        max_attempts = self.attempts,
                        delay_ms = delay.as_millis() as u64,
                        "Order busy, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    delay = (delay * 2).min(Duration::from_secs(1));
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OrderId;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn policy(attempts: u32) -> RetryPolicy {
        RetryPolicy {
            attempts,
            backoff: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn test_conflict_is_retried_until_success() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result = policy(3)
            .run(move || async move {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(PosError::ConcurrencyConflict(OrderId(1)))
                } else {
                    Ok("done")
                }
            })
            .await;
        assert_eq!(result, Ok("done"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_conflict_surfaces_after_last_attempt() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<(), PosError> = policy(2)
            .run(move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(PosError::ConcurrencyConflict(OrderId(1)))
            })
            .await;
        assert_eq!(result, Err(PosError::ConcurrencyConflict(OrderId(1))));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_other_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<(), PosError> = policy(5)
            .run(move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(PosError::InvalidArgument("bad".to_string()))
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
