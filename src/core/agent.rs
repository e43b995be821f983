// src/core/agent.rs — Submit, poll, validate, retry: one generation end to end

use std::sync::Arc;

use chrono::Utc;

use super::failure::Failure;
use super::retry::{run_with_retry, Attempt, RetryPolicy};
use super::validate::parse_task_output;
use crate::infra::config::Config;
use crate::infra::errors::DietAgentError;
use crate::planner::meal_plan::MealPlan;
use crate::planner::preferences::Preferences;
use crate::planner::shopping_cart::ShoppingCart;
use crate::planner::{TaskKind, TaskOutput, TaskPayload};
use crate::remote::poller::{poll_until_terminal, PollConfig};
use crate::remote::{Task, TaskApi, TaskStatus, DEFAULT_LLM};

/// Events emitted while a generation runs.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentEvent {
    Starting {
        kind: TaskKind,
    },
    Retrying {
        retry: u32,
        max_retries: u32,
    },
    Submitted {
        kind: TaskKind,
        task_id: String,
    },
    Progress {
        kind: TaskKind,
        status: TaskStatus,
        steps: u32,
        will_retry: bool,
    },
}

impl AgentEvent {
    /// One-line progress text, or `None` for statuses not worth showing.
    pub fn message(&self) -> Option<String> {
        match self {
            AgentEvent::Starting { kind } => {
                Some(format!("Initializing AI agent for {}...", kind.label()))
            }
            AgentEvent::Retrying { retry, max_retries } => Some(format!(
                "Retrying... (Attempt {} of {})",
                retry, max_retries
            )),
            AgentEvent::Submitted { kind, .. } => Some(format!(
                "AI agent is researching current market prices and creating your {}...",
                kind.label()
            )),
            AgentEvent::Progress {
                kind,
                status,
                steps,
                will_retry,
            } => match status {
                TaskStatus::Running => {
                    Some(format!("AI agent is working... ({} steps completed)", steps))
                }
                TaskStatus::Finished => Some(format!(
                    "AI agent has completed your {}! Processing results...",
                    kind.label()
                )),
                TaskStatus::Failed | TaskStatus::Stopped => Some(format!(
                    "Task {}. {}",
                    status,
                    if *will_retry {
                        "Will retry shortly..."
                    } else {
                        "Maximum retries reached."
                    }
                )),
                TaskStatus::Created | TaskStatus::Paused => None,
            },
        }
    }
}

pub type EventFn<'a> = dyn Fn(AgentEvent) + Send + Sync + 'a;

/// Result of a generation. Failures are values, never panics.
#[derive(Debug)]
pub enum Generation<T> {
    Ready {
        value: T,
        task_id: String,
        attempts: u32,
    },
    Failed(Failure),
}

impl<T> Generation<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Generation::Ready { .. })
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Generation::Ready { value, .. } => Some(value),
            Generation::Failed(_) => None,
        }
    }
}

pub struct DietAgent {
    api: Arc<dyn TaskApi>,
    poll: PollConfig,
    retry: RetryPolicy,
    llm: String,
}

impl DietAgent {
    pub fn new(api: Arc<dyn TaskApi>) -> Self {
        Self {
            api,
            poll: PollConfig::default(),
            retry: RetryPolicy::default(),
            llm: DEFAULT_LLM.to_string(),
        }
    }

    pub fn from_config(api: Arc<dyn TaskApi>, config: &Config) -> Self {
        Self {
            api,
            poll: PollConfig::from(&config.polling),
            retry: RetryPolicy::from(&config.retry),
            llm: config.remote.llm.clone(),
        }
    }

    pub fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn api(&self) -> &dyn TaskApi {
        self.api.as_ref()
    }

    /// Create one remote task. No retry here.
    pub async fn submit_task(&self, payload: &TaskPayload<'_>) -> Result<Task, DietAgentError> {
        let kind = payload.kind();
        let request = payload.to_request(&self.llm, Utc::now());
        let task = self.api.create_task(&request).await?;
        tracing::info!(task_id = %task.id, kind = kind.label(), "Task created");
        Ok(task)
    }

    pub async fn generate_meal_plan(
        &self,
        prompt: &str,
        preferences: Option<&Preferences>,
        on_event: Option<&EventFn<'_>>,
    ) -> Generation<MealPlan> {
        let payload = TaskPayload::MealPlan {
            prompt,
            preferences,
        };
        self.generate(&payload, on_event).await
    }

    pub async fn generate_shopping_cart(
        &self,
        plan: &MealPlan,
        supermarket: &str,
        country: &str,
        on_event: Option<&EventFn<'_>>,
    ) -> Generation<ShoppingCart> {
        let payload = TaskPayload::ShoppingCart {
            plan,
            supermarket,
            country,
        };
        self.generate(&payload, on_event).await
    }

    async fn generate<T: TaskOutput>(
        &self,
        payload: &TaskPayload<'_>,
        on_event: Option<&EventFn<'_>>,
    ) -> Generation<T> {
        let kind = payload.kind();
        emit(on_event, AgentEvent::Starting { kind });

        let outcome = run_with_retry(&self.retry, kind.label(), move |attempt| {
            self.attempt::<T>(payload, attempt, on_event)
        })
        .await;

        match outcome.result {
            Ok((value, task_id)) => Generation::Ready {
                value,
                task_id,
                attempts: outcome.attempts,
            },
            Err(e) => {
                let failure = Failure::from_error(kind.label(), &e, outcome.attempts);
                tracing::warn!(
                    kind = kind.label(),
                    category = %failure.category,
                    attempts = failure.attempts,
                    "Generation failed: {}",
                    failure.detail
                );
                Generation::Failed(failure)
            }
        }
    }

    async fn attempt<T: TaskOutput>(
        &self,
        payload: &TaskPayload<'_>,
        attempt: Attempt,
        on_event: Option<&EventFn<'_>>,
    ) -> Result<(T, String), DietAgentError> {
        let kind = payload.kind();
        if attempt.retry > 0 {
            emit(
                on_event,
                AgentEvent::Retrying {
                    retry: attempt.retry,
                    max_retries: attempt.max_retries,
                },
            );
        }

        let task = self.submit_task(payload).await?;
        emit(
            on_event,
            AgentEvent::Submitted {
                kind,
                task_id: task.id.clone(),
            },
        );

        let will_retry = !attempt.is_last();
        let progress = move |status: TaskStatus, steps: u32| {
            emit(
                on_event,
                AgentEvent::Progress {
                    kind,
                    status,
                    steps,
                    will_retry,
                },
            );
        };

        let done = poll_until_terminal(self.api.as_ref(), &task.id, &self.poll, Some(&progress))
            .await?;
        let value = parse_task_output::<T>(&done)?;
        Ok((value, done.id))
    }
}

fn emit(on_event: Option<&EventFn<'_>>, event: AgentEvent) {
    if let Some(cb) = on_event {
        cb(event);
    }
}
