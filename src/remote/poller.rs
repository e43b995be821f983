// src/remote/poller.rs — Drive a remote task to a terminal status
//
// One in-flight fetch at a time. The deadline is checked before every fetch.
// Fetch failures only grow the backoff factor; they never end the loop.

use std::time::Duration;
use tokio::time::Instant;

use super::{Task, TaskApi, TaskStatus};
use crate::infra::config::PollingConfig;
use crate::infra::errors::DietAgentError;

const DEFAULT_POLL_INTERVAL_MS: u64 = 3_000;
const DEFAULT_MAX_WAIT_MS: u64 = 300_000;
const MAX_POLL_INTERVAL_MS: u64 = 10_000;
const BACKOFF_GROWTH: f64 = 1.5;

/// Progress callback: `(status, step_count)` after every successful fetch.
pub type ProgressFn<'a> = dyn Fn(TaskStatus, u32) + Send + Sync + 'a;

#[derive(Debug, Clone)]
pub struct PollConfig {
    pub poll_interval: Duration,
    pub max_wait: Duration,
    pub max_interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            max_wait: Duration::from_millis(DEFAULT_MAX_WAIT_MS),
            max_interval: Duration::from_millis(MAX_POLL_INTERVAL_MS),
        }
    }
}

impl From<&PollingConfig> for PollConfig {
    fn from(cfg: &PollingConfig) -> Self {
        Self {
            poll_interval: Duration::from_millis(cfg.interval_ms),
            max_wait: Duration::from_millis(cfg.max_wait_ms),
            max_interval: Duration::from_millis(cfg.max_interval_ms),
        }
    }
}

/// Multiplicative backoff on the base poll interval.
#[derive(Debug, Clone)]
pub struct Backoff {
    base: Duration,
    max: Duration,
    factor: f64,
}

impl Backoff {
    pub fn new(base: Duration, max: Duration) -> Self {
        Self {
            base,
            max,
            factor: 1.0,
        }
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn on_success(&mut self) {
        self.factor = 1.0;
    }

    /// Grow by 1.5x, capped so `delay()` never exceeds the max interval.
    pub fn on_failure(&mut self) {
        let base_ms = self.base.as_millis().max(1) as f64;
        let cap = (self.max.as_millis() as f64 / base_ms).max(1.0);
        self.factor = (self.factor * BACKOFF_GROWTH).min(cap);
    }

    /// Wait before the next fetch: `min(base * factor, max)`.
    pub fn delay(&self) -> Duration {
        let ms = (self.base.as_millis() as f64 * self.factor).min(self.max.as_millis() as f64);
        Duration::from_millis(ms.round() as u64)
    }
}

/// Poll `task_id` until it reaches `finished`, `failed` or `stopped`.
///
/// Returns the terminal task as fetched; a `failed`/`stopped` task is
/// returned, not raised, so the caller can classify it. The only error is
/// [`DietAgentError::TaskTimeout`].
pub async fn poll_until_terminal(
    api: &dyn TaskApi,
    task_id: &str,
    config: &PollConfig,
    on_progress: Option<&ProgressFn<'_>>,
) -> Result<Task, DietAgentError> {
    let start = Instant::now();
    let mut backoff = Backoff::new(config.poll_interval, config.max_interval);

    loop {
        let elapsed = start.elapsed();
        if elapsed > config.max_wait {
            tracing::warn!(task_id, elapsed_secs = elapsed.as_secs(), "Task poll deadline exceeded");
            return Err(DietAgentError::TaskTimeout {
                task_id: task_id.to_string(),
                elapsed_secs: elapsed.as_secs(),
            });
        }

        match api.get_task(task_id).await {
            Ok(task) => {
                if let Some(cb) = on_progress {
                    cb(task.status, task.step_count());
                }

                if task.status.is_terminal() {
                    tracing::debug!(task_id, status = %task.status, "Task reached terminal status");
                    return Ok(task);
                }

                backoff.on_success();
            }
            Err(e) => {
                backoff.on_failure();
                tracing::warn!(
                    task_id,
                    backoff = backoff.factor(),
                    "Error fetching task details (will retry): {}",
                    e
                );
            }
        }

        tokio::time::sleep(backoff.delay()).await;
    }
}
