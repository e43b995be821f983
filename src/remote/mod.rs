// src/remote/mod.rs — Remote browser-automation task API

pub mod client;
pub mod completions;
pub mod poller;

#[cfg(test)]
pub(crate) mod mock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::infra::errors::DietAgentError;

pub const DEFAULT_BASE_URL: &str = "https://api.browser-use.com/api/v2";
pub const DEFAULT_LLM: &str = "gemini-2.5-flash";
pub const API_KEY_HEADER: &str = "X-Browser-Use-API-Key";

/// Operations the task API exposes. The reqwest client implements this;
/// tests substitute scripted fakes.
#[async_trait]
pub trait TaskApi: Send + Sync {
    async fn create_task(&self, request: &CreateTaskRequest) -> Result<Task, DietAgentError>;

    async fn get_task(&self, task_id: &str) -> Result<Task, DietAgentError>;

    async fn control_task(&self, task_id: &str, action: TaskAction)
        -> Result<(), DietAgentError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Created,
    Running,
    Finished,
    Failed,
    Stopped,
    Paused,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Created => "created",
            TaskStatus::Running => "running",
            TaskStatus::Finished => "finished",
            TaskStatus::Failed => "failed",
            TaskStatus::Stopped => "stopped",
            TaskStatus::Paused => "paused",
        }
    }

    /// No further transitions are expected once a task reaches one of these.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskStatus::Finished | TaskStatus::Failed | TaskStatus::Stopped
        )
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, TaskStatus::Failed | TaskStatus::Stopped)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A task as reported by the remote service. Never mutated locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub task: Option<String>,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub steps: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub finished_at: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    #[serde(default)]
    pub screenshots: Option<Vec<String>>,
    #[serde(default)]
    pub gif_url: Option<String>,
}

impl Task {
    pub fn new(id: impl Into<String>, status: TaskStatus) -> Self {
        Self {
            id: id.into(),
            status,
            task: None,
            output: None,
            steps: None,
            error: None,
            created_at: None,
            finished_at: None,
            metadata: None,
            screenshots: None,
            gif_url: None,
        }
    }

    /// Number of agent steps recorded so far (0 when the service sent none).
    pub fn step_count(&self) -> u32 {
        self.steps.as_ref().map(|s| s.len() as u32).unwrap_or(0)
    }
}

/// Body of `POST /tasks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub task: String,
    pub llm: String,
    pub max_steps: u32,
    #[serde(rename = "maxLLMTokens", skip_serializing_if = "Option::is_none")]
    pub max_llm_tokens: Option<u32>,
    /// JSON Schema serialized to a string, as the API expects.
    pub structured_output: String,
    pub timeout_seconds: u64,
    pub metadata: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskAction {
    Pause,
    Resume,
    Stop,
}

impl TaskAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskAction::Pause => "pause",
            TaskAction::Resume => "resume",
            TaskAction::Stop => "stop",
        }
    }
}

/// Result of probing the account endpoint with the configured key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KeyValidation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits: Option<f64>,
}
