use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

use crate::api::ApiError;
use crate::config::Config;

/// Exponential backoff with jitter for idempotent reads.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub jitter: Duration
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.retry_base_delay_ms),
            max_delay: Duration::from_millis(config.retry_max_delay_ms),
            jitter: Duration::from_millis(config.retry_jitter_ms)
        }
    }

    /// Wait before retry number `attempt`, counting from 1: `base * 2^(attempt - 1)`
    /// plus up to `jitter`, never more than `max_delay`.
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        let exponential = self.base_delay.saturating_mul(factor);

        let jitter_ms = u64::try_from(self.jitter.as_millis()).unwrap_or(u64::MAX);
        let jitter = if jitter_ms == 0 {
            Duration::ZERO
        } else {
            Duration::from_millis(rand::random_range(0..jitter_ms))
        };

        exponential.saturating_add(jitter).min(self.max_delay)
    }

    /// Runs `attempt` until it succeeds, fails with a non-transient error,
    /// or `max_retries` extra attempts have been spent.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut attempt: F) -> Result<T, ApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>
    {
        let mut retries = 0;

        loop {
            match attempt().await {
                Ok(value) => return Ok(value),
                Err(error) if error.kind().is_transient() && retries < self.max_retries => {
                    retries += 1;
                    let delay = self.delay(retries);

                    warn!("Retrying {operation} ({retries}/{}) in {delay:?}: {error}", self.max_retries);
                    sleep(delay).await;
                }
                Err(error) => return Err(error)
            }
        }
    }
}
