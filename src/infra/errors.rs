// src/infra/errors.rs — Error types for diet-agent

use thiserror::Error;

use crate::remote::TaskStatus;

#[derive(Error, Debug)]
pub enum DietAgentError {
    // Credential errors (raised before any network call)
    #[error("Browser-Use API key is required. Set BROWSER_USE_API_KEY or run `diet-agent key set`.")]
    CredentialMissing,

    // Remote task API errors
    #[error("Failed to create {kind} task: HTTP {status}: {body}")]
    RemoteSubmission {
        kind: String,
        status: u16,
        body: String,
    },

    #[error("Failed to fetch task {task_id}: {message}")]
    RemoteFetch { task_id: String, message: String },

    #[error("Failed to control task {task_id}: HTTP {status}: {body}")]
    RemoteControl {
        task_id: String,
        status: u16,
        body: String,
    },

    #[error("Network error during {operation}: {message}")]
    Transport { operation: String, message: String },

    #[error("Task {task_id} timed out after {elapsed_secs} seconds")]
    TaskTimeout { task_id: String, elapsed_secs: u64 },

    #[error("Task {status}: {message}")]
    TaskTerminal {
        task_id: String,
        status: TaskStatus,
        message: String,
    },

    // Output validation errors
    #[error("No output received from task {task_id}")]
    OutputMissing { task_id: String },

    #[error("Invalid {kind} output: {message}")]
    OutputShape { kind: String, message: String },

    // Infra
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DietAgentError {
    /// Transport-level failures that a poll loop absorbs through backoff.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            DietAgentError::Transport { .. } | DietAgentError::RemoteFetch { .. }
        )
    }

    /// HTTP status carried by the error, if the remote answered at all.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            DietAgentError::RemoteSubmission { status, .. }
            | DietAgentError::RemoteControl { status, .. } => Some(*status),
            _ => None,
        }
    }
}
