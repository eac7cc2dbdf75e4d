use crate::utils::error::{Result, TrendSyncError};
use rand::Rng;
use std::future::Future;
use std::time::Duration;

/// Retry schedule for throttled provider queries.
///
/// Before retry `k` the controller sleeps `2^k * base_unit` plus up to
/// `jitter_max` of uniform jitter. With the defaults that is roughly
/// 20s, 40s, 80s, 160s for attempts 1 to 4.
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffPolicy {
    pub max_attempts: u32,
    pub base_unit: Duration,
    pub jitter_max: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_unit: Duration::from_secs(10),
            jitter_max: Duration::from_secs(7),
        }
    }
}

impl BackoffPolicy {
    /// Retries without sleeping.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_unit: Duration::ZERO,
            jitter_max: Duration::ZERO,
        }
    }

    /// Lower bound of the sleep that follows a throttled `attempt`.
    pub fn base_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base_unit.saturating_mul(factor)
    }

    pub fn delay_for<R: Rng + ?Sized>(&self, attempt: u32, rng: &mut R) -> Duration {
        let jitter_ms = self.jitter_max.as_millis() as u64;
        let jitter = Duration::from_millis(rng.random_range(0..=jitter_ms));
        self.base_delay(attempt).saturating_add(jitter)
    }

    /// Runs `operation` until it succeeds, fails with anything other than
    /// `Throttled`, or runs out of attempts.
    pub async fn with_retry<T, F, Fut>(&self, label: &str, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_throttled() => {
                    if attempt >= max_attempts {
                        tracing::warn!(
                            "🛑 {}: throttled on final attempt {}/{}",
                            label,
                            attempt,
                            max_attempts
                        );
                        return Err(TrendSyncError::RetryExhausted {
                            attempts: attempt,
                            source: Box::new(err),
                        });
                    }

                    let delay = self.delay_for(attempt, &mut rand::rng());
                    tracing::warn!(
                        "⏳ {}: throttled (attempt {}/{}), sleeping {:.1}s",
                        label,
                        attempt,
                        max_attempts,
                        delay.as_secs_f64()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
