// src/core/retry.rs — Caller-level retry with linear backoff
//
// Every failure is retried, whatever its kind. Waits grow linearly:
// base_delay * retry_number (2s, then 4s with the defaults).

use std::future::Future;
use std::time::Duration;

use crate::infra::config::RetrySettings;
use crate::infra::errors::DietAgentError;

const MAX_RETRIES: u32 = 2;
const BASE_DELAY_MS: u64 = 2_000;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: MAX_RETRIES,
            base_delay: Duration::from_millis(BASE_DELAY_MS),
        }
    }
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(cfg: &RetrySettings) -> Self {
        Self {
            max_retries: cfg.max_retries,
            base_delay: Duration::from_millis(cfg.base_delay_ms),
        }
    }
}

impl RetryPolicy {
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Wait before retry number `retry` (1-based).
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        self.base_delay * retry
    }
}

/// Where an attempt sits in the retry budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempt {
    /// 0 for the first attempt, then 1, 2, ...
    pub retry: u32,
    pub max_retries: u32,
}

impl Attempt {
    pub fn number(&self) -> u32 {
        self.retry + 1
    }

    pub fn is_last(&self) -> bool {
        self.retry >= self.max_retries
    }
}

#[derive(Debug)]
pub struct RetryOutcome<T> {
    pub result: Result<T, DietAgentError>,
    pub attempts: u32,
}

/// Run `op` until it succeeds or the retry budget is spent. The last error
/// is returned; nothing is raised past this point.
pub async fn run_with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    mut op: F,
) -> RetryOutcome<T>
where
    F: FnMut(Attempt) -> Fut,
    Fut: Future<Output = Result<T, DietAgentError>>,
{
    let mut retry = 0;
    loop {
        let attempt = Attempt {
            retry,
            max_retries: policy.max_retries,
        };

        match op(attempt).await {
            Ok(value) => {
                return RetryOutcome {
                    result: Ok(value),
                    attempts: attempt.number(),
                }
            }
            Err(e) => {
                tracing::warn!(
                    operation,
                    attempt = attempt.number(),
                    max_attempts = policy.max_attempts(),
                    "Attempt failed: {}",
                    e
                );

                if attempt.is_last() {
                    return RetryOutcome {
                        result: Err(e),
                        attempts: attempt.number(),
                    };
                }

                retry += 1;
                let delay = policy.delay_for_retry(retry);
                tracing::debug!(operation, retry, delay_ms = delay.as_millis() as u64, "Backing off");
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::time::Instant;

    fn failure(n: u32) -> DietAgentError {
        DietAgentError::OutputShape {
            kind: "meal plan".into(),
            message: format!("attempt {n} failed"),
        }
    }

    #[test]
    fn test_default_policy() {
        let p = RetryPolicy::default();
        assert_eq!(p.max_attempts(), 3);
        assert_eq!(p.delay_for_retry(1), Duration::from_millis(2_000));
        assert_eq!(p.delay_for_retry(2), Duration::from_millis(4_000));
    }

    #[test]
    fn test_policy_from_settings() {
        let p = RetryPolicy::from(&RetrySettings {
            max_retries: 4,
            base_delay_ms: 500,
        });
        assert_eq!(p.max_attempts(), 5);
        assert_eq!(p.delay_for_retry(3), Duration::from_millis(1_500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_third_attempt_succeeds_after_linear_waits() {
        let starts: Arc<Mutex<Vec<Instant>>> = Arc::new(Mutex::new(Vec::new()));
        let log = starts.clone();

        let outcome = run_with_retry(&RetryPolicy::default(), "test", |attempt| {
            let log = log.clone();
            async move {
                log.lock().unwrap().push(Instant::now());
                if attempt.number() < 3 {
                    Err(failure(attempt.number()))
                } else {
                    Ok("plan")
                }
            }
        })
        .await;

        assert_eq!(outcome.result.unwrap(), "plan");
        assert_eq!(outcome.attempts, 3);

        let starts = starts.lock().unwrap();
        assert_eq!(starts[1] - starts[0], Duration::from_millis(2_000));
        assert_eq!(starts[2] - starts[1], Duration::from_millis(4_000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_returns_last_error() {
        let outcome: RetryOutcome<()> =
            run_with_retry(&RetryPolicy::default(), "test", |attempt| async move {
                Err(failure(attempt.number()))
            })
            .await;

        assert_eq!(outcome.attempts, 3);
        let err = outcome.result.unwrap_err();
        assert!(err.to_string().contains("attempt 3 failed"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_success_does_not_wait() {
        let start = Instant::now();
        let outcome = run_with_retry(&RetryPolicy::default(), "test", |_| async { Ok(1) }).await;
        assert_eq!(outcome.attempts, 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_retries_means_single_attempt() {
        let policy = RetryPolicy {
            max_retries: 0,
            base_delay: Duration::from_millis(2_000),
        };
        let outcome: RetryOutcome<()> =
            run_with_retry(&policy, "test", |a| async move { Err(failure(a.number())) }).await;
        assert_eq!(outcome.attempts, 1);
    }

    #[test]
    fn test_attempt_is_last() {
        let a = Attempt {
            retry: 2,
            max_retries: 2,
        };
        assert!(a.is_last());
        assert_eq!(a.number(), 3);
        assert!(!Attempt {
            retry: 1,
            max_retries: 2
        }
        .is_last());
    }
}
