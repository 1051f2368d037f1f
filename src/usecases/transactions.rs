use crate::common::context::Context;
use crate::common::error::{AppError, ServiceResult, unexpected};
use crate::common::store::{StoreError, Transaction};
use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use tracing::{error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_backoff: Duration::from_millis(25),
        }
    }
}

impl RetryPolicy {
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Exponential backoff with up to one base interval of jitter.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let base_ms = self.base_backoff.as_millis() as u64;
        if base_ms == 0 {
            return Duration::ZERO;
        }
        let exponential_ms = base_ms.saturating_mul(1u64 << attempt.saturating_sub(1).min(6));
        let jitter_ms = rand::rng().random_range(0..=base_ms);
        Duration::from_millis(exponential_ms + jitter_ms)
    }
}

/// One read-validate-write unit. Implementations must finish every read
/// before their first write; validation failures are returned before any
/// write so nothing partial is ever committed.
#[async_trait]
pub trait Transition: Send + Sync {
    type Output: Send;

    const NAME: &'static str;

    async fn apply(&self, tx: &mut Transaction) -> ServiceResult<Self::Output>;
}

/// Runs `transition` in a fresh transaction, retrying the whole unit when the
/// commit loses an optimistic-concurrency race. A domain error is only
/// reported once the reads that produced it are known to be one snapshot.
pub async fn run<C: Context, T: Transition>(ctx: &C, transition: &T) -> ServiceResult<T::Output> {
    let policy = ctx.retry_policy();
    let attempts = policy.attempts();
    for attempt in 1..=attempts {
        let mut tx = ctx.store().begin().await?;
        let result = transition.apply(&mut tx).await;
        let outcome = match result {
            Ok(output) => tx.commit().await.map(|()| output),
            Err(e) => match tx.validate().await {
                Ok(()) => return Err(e),
                Err(StoreError::Conflict) => Err(StoreError::Conflict),
                Err(validate_error) => {
                    warn!(
                        transition = T::NAME,
                        "Failed to validate aborted transaction: {validate_error}"
                    );
                    return Err(e);
                }
            },
        };

        match outcome {
            Ok(output) => return Ok(output),
            Err(StoreError::Conflict) => {
                warn!(
                    transition = T::NAME,
                    attempt, attempts, "Transaction conflicted with a concurrent write"
                );
                if attempt < attempts {
                    tokio::time::sleep(policy.backoff(attempt)).await;
                }
            }
            Err(e) => return unexpected(e),
        }
    }

    error!(
        transition = T::NAME,
        attempts, "Transaction aborted after exhausting retries"
    );
    Err(AppError::TransactionsAborted)
}
