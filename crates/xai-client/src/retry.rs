use std::time::Duration;

use tracing::debug;

use crate::errors::XaiError;

/// Bounded exponential-backoff policy for whole streaming calls.
///
/// The client itself never retries; wrap the call site instead and let the
/// policy consult [`XaiError::is_retryable`]:
///
/// ```no_run
/// # async fn demo(client: xai_client::XaiClient) -> Result<(), xai_client::XaiError> {
/// use futures::TryStreamExt as _;
/// use xai_client::RetryPolicy;
///
/// let events = RetryPolicy::default()
///     .run(|| async {
///         let stream = client.stream_chat("Answer briefly.", &[]).await?;
///         stream.try_collect::<Vec<_>>().await
///     })
///     .await?;
/// # let _ = events;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    /// Maximum number of attempts (1 = no retry).
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_backoff: Duration,
    /// Upper bound for any single delay.
    pub max_backoff: Duration,
    /// Multiplier applied to the delay after each failed attempt.
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(10),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Creates a policy that disables retries (single attempt).
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Default::default()
        }
    }

    /// Sets the maximum number of attempts.
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Sets the delay before the first retry.
    pub fn initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    /// Sets the upper bound for any single delay.
    pub fn max_backoff(mut self, max: Duration) -> Self {
        self.max_backoff = max;
        self
    }

    /// Sets the backoff multiplier.
    pub fn backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Runs `operation`, reattempting retryable failures with exponential
    /// backoff until one attempt succeeds or the attempt limit is reached.
    /// The last error is returned on exhaustion.
    pub async fn run<F, Fut, T>(&self, mut operation: F) -> Result<T, XaiError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, XaiError>>,
    {
        let mut attempt = 1;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    if !error.is_retryable() || attempt >= self.max_attempts {
                        return Err(error);
                    }
                    let delay = self.delay_for(attempt);
                    debug!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "retrying after retryable error: {error}"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    fn delay_for(&self, attempt: u32) -> Duration {
        let backoff = self.initial_backoff.as_secs_f64()
            * self.backoff_multiplier.powi(attempt as i32 - 1);
        Duration::from_secs_f64(backoff.min(self.max_backoff.as_secs_f64()))
    }
}
