//! Exponential backoff with jitter for outbound calls

use backon::{BackoffBuilder, Retryable};
use rand::Rng;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Tells the retry loop whether an error is worth another attempt
pub trait RetryClassify {
    /// Timeouts, refused connections, truncated bodies
    fn is_transient(&self) -> bool;

    /// HTTP status carried by the error, if any
    fn status(&self) -> Option<u16> {
        None
    }
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Guarded attempts before the final unguarded one
    pub retries: usize,
    pub base_delay: Duration,
    pub max_delay: Duration,
    /// Relative jitter, 0.3 means +/-30%
    pub jitter: f64,
    pub retry_on_status: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 5,
            base_delay: Duration::from_millis(1500),
            max_delay: Duration::from_secs(20),
            jitter: 0.3,
            retry_on_status: vec![429, 500, 502, 503, 504],
        }
    }
}

impl RetryPolicy {
    /// `min(max_delay, base_delay * 2^(attempt-1))` for a 1-based attempt
    pub fn nominal_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        let factor = 2u32.saturating_pow(exponent);
        self.base_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |d| d.min(self.max_delay))
    }

    /// Scale `delay` by a uniform factor in `[1 - jitter, 1 + jitter]`
    pub fn jittered(&self, delay: Duration) -> Duration {
        let spread = self.jitter.clamp(0.0, 1.0);
        if spread == 0.0 {
            return delay;
        }
        let factor = rand::thread_rng().gen_range(1.0 - spread..=1.0 + spread);
        delay.mul_f64(factor)
    }

    pub fn is_retryable<E: RetryClassify>(&self, err: &E) -> bool {
        match err.status() {
            Some(status) => self.retry_on_status.contains(&status),
            None => err.is_transient(),
        }
    }
}

/// Delay sequence handed to `backon`; one entry per guarded attempt
#[derive(Debug)]
pub struct JitteredBackoff {
    policy: RetryPolicy,
    attempt: u32,
}

impl Iterator for JitteredBackoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        if self.attempt as usize >= self.policy.retries {
            return None;
        }
        self.attempt += 1;
        Some(self.policy.jittered(self.policy.nominal_delay(self.attempt)))
    }
}

impl BackoffBuilder for RetryPolicy {
    type Backoff = JitteredBackoff;

    fn build(self) -> Self::Backoff {
        JitteredBackoff {
            policy: self,
            attempt: 0,
        }
    }
}

/// Runs fallible async operations under a [`RetryPolicy`]
#[derive(Debug, Clone, Default)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Execute `op`, retrying retryable failures with backoff.
    ///
    /// After `retries` guarded attempts one last attempt runs and its error is
    /// returned as is. Non-retryable errors are returned immediately.
    pub async fn run<T, E, F, Fut>(&self, label: &str, op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: RetryClassify + Display,
    {
        let retries = self.policy.retries;
        let mut attempt = 0usize;

        op.retry(self.policy.clone())
            .when(|err: &E| self.policy.is_retryable(err))
            .notify(|err: &E, delay: Duration| {
                attempt += 1;
                warn!(
                    label = label,
                    attempt = attempt,
                    retries = retries,
                    delay_secs = delay.as_secs_f64(),
                    error = %err,
                    "{} failed, retry {}/{} in {:.1}s",
                    label,
                    attempt,
                    retries,
                    delay.as_secs_f64()
                );
            })
            .await
    }
}
