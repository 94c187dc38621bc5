use std::time::Duration;

use crate::config::RetryConfig;

const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(250);

/// High-level classification of a pipeline error for retry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network-level or guest-token failure.
    Transport,
    /// Backend asked us to slow down (429, 503).
    Throttled,
    /// Backend refused the query with another non-2xx status.
    Backend,
    /// Response JSON lacked the expected structure. Retried, but a streak of
    /// these usually means the backend contract changed.
    Schema,
    /// Bad input or a programming/schema type error. Never retried.
    Fatal,
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this error.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Exponential backoff policy with caps.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Base delay for backoff.
    pub base_delay: Duration,
    /// Upper bound on backoff delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

impl RetryPolicy {
    pub fn from_config(cfg: &RetryConfig) -> Self {
        Self {
            max_attempts: cfg.max_attempts.max(1),
            base_delay: Duration::try_from_secs_f64(cfg.base_delay_secs.max(0.0))
                .unwrap_or_else(|_| {
                    tracing::warn!(
                        "retry.base_delay_secs = {} out of range, using {}s",
                        cfg.base_delay_secs,
                        DEFAULT_BASE_DELAY.as_secs_f64()
                    );
                    DEFAULT_BASE_DELAY
                }),
            max_delay: Duration::from_secs(cfg.max_delay_secs),
        }
    }

    /// Same policy with a different attempt bound.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Compute the next backoff delay for a given attempt and error kind.
    ///
    /// `attempt` is 1-based (1 = first attempt). Returns `RetryDecision::NoRetry`
    /// when we should stop retrying.
    pub fn decide(&self, attempt: u32, kind: ErrorKind) -> RetryDecision {
        if attempt >= self.max_attempts {
            return RetryDecision::NoRetry;
        }

        match kind {
            ErrorKind::Fatal => RetryDecision::NoRetry,
            ErrorKind::Transport
            | ErrorKind::Throttled
            | ErrorKind::Backend
            | ErrorKind::Schema => {
                // base * 2^(attempt-1), capped.
                let exp = 1u32 << attempt.saturating_sub(1).min(8);
                let raw = self.base_delay.saturating_mul(exp);
                RetryDecision::RetryAfter(raw.min(self.max_delay))
            }
        }
    }
}
