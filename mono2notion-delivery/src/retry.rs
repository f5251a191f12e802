//! Exponential backoff around a single delivery.

use mono2notion_core::RetrySection;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::error::DeliveryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Sleep after the first failure; doubles after each further failure
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetrySection::default())
    }
}

impl From<&RetrySection> for RetryPolicy {
    fn from(section: &RetrySection) -> Self {
        Self {
            max_attempts: section.max_attempts.max(1),
            initial_delay: Duration::from_millis(section.initial_delay_ms),
        }
    }
}

impl RetryPolicy {
    /// Sleep after failed attempt number `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_delay.saturating_mul(factor)
    }
}

/// Why a delivery gave up.
#[derive(Debug)]
pub enum RetryError {
    /// A timeout or decode failure; nothing further was attempted
    Fatal { attempts: u32, error: DeliveryError },
    /// Every attempt failed retryably; `error` is the last one
    Exhausted { attempts: u32, error: DeliveryError },
}

/// Run `op` until it succeeds, fails fatally, or the attempt budget is spent.
///
/// Returns the value and the number of attempts it took.
pub async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    mut op: F,
) -> Result<(T, u32), RetryError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DeliveryError>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok((value, attempt)),
            Err(error) if error.is_fatal() => {
                return Err(RetryError::Fatal {
                    attempts: attempt,
                    error,
                });
            }
            Err(error) if attempt >= policy.max_attempts => {
                return Err(RetryError::Exhausted {
                    attempts: attempt,
                    error,
                });
            }
            Err(error) => {
                let delay = policy.delay_after(attempt);
                warn!(
                    attempt,
                    max_attempts = policy.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    %error,
                    "delivery attempt failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
