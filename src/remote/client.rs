// src/remote/client.rs — reqwest client for the browser-automation task API

use async_trait::async_trait;
use std::time::Duration;

use super::{CreateTaskRequest, KeyValidation, Task, TaskAction, TaskApi, API_KEY_HEADER};
use crate::infra::config::RemoteConfig;
use crate::infra::errors::DietAgentError;
use crate::util::truncate_str;

const USER_AGENT: &str = concat!("diet-agent/", env!("CARGO_PKG_VERSION"));
const REQUEST_SOURCE: &str = "diet-agent";
const BODY_PREVIEW_LIMIT: usize = 512;

pub struct BrowserUseClient {
    api_key: Option<String>,
    client: reqwest::Client,
    base_url: String,
}

impl BrowserUseClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(api_key, super::DEFAULT_BASE_URL.into())
    }

    pub fn with_base_url(api_key: Option<String>, base_url: String) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &RemoteConfig, api_key: Option<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Attach credential and identification headers. Fails before any
    /// network activity when no key is configured.
    fn authorized(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, DietAgentError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(DietAgentError::CredentialMissing)?;
        Ok(builder
            .header(API_KEY_HEADER, key)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header("X-Request-Source", REQUEST_SOURCE))
    }

    /// Probe the account endpoint. Never returns an error; problems are
    /// reported through `KeyValidation::error`.
    pub async fn validate_api_key(&self) -> KeyValidation {
        let request = match self.authorized(self.client.get(format!("{}/accounts/me", self.base_url)))
        {
            Ok(r) => r,
            Err(e) => {
                return KeyValidation {
                    valid: false,
                    error: Some(e.to_string()),
                    credits: None,
                }
            }
        };

        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("API key validation request failed: {}", e);
                return KeyValidation {
                    valid: false,
                    error: Some(e.to_string()),
                    credits: None,
                };
            }
        };

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return KeyValidation {
                valid: false,
                error: Some(format!(
                    "API validation failed: HTTP {} - {}",
                    status,
                    preview_body(&body)
                )),
                credits: None,
            };
        }

        // A 200 whose body we cannot read still proves the key works.
        let credits = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|account| {
                account["credits"]
                    .as_f64()
                    .or_else(|| account["balance"].as_f64())
            });

        KeyValidation {
            valid: true,
            error: None,
            credits,
        }
    }
}

fn preview_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }
    let cut = truncate_str(trimmed, BODY_PREVIEW_LIMIT);
    if cut.len() < trimmed.len() {
        format!("{cut}...")
    } else {
        cut.to_string()
    }
}

fn transport_error(operation: &str, err: reqwest::Error) -> DietAgentError {
    DietAgentError::Transport {
        operation: operation.to_string(),
        message: err.to_string(),
    }
}

fn kind_label(request: &CreateTaskRequest) -> String {
    match request.metadata["type"].as_str() {
        Some("meal_plan_generation") => "meal plan".into(),
        Some("shopping_cart_generation") => "shopping cart".into(),
        Some(other) => other.replace('_', " "),
        None => "remote".into(),
    }
}

#[async_trait]
impl TaskApi for BrowserUseClient {
    async fn create_task(&self, request: &CreateTaskRequest) -> Result<Task, DietAgentError> {
        let builder = self
            .authorized(self.client.post(format!("{}/tasks", self.base_url)))?
            .json(request);

        tracing::debug!(
            max_steps = request.max_steps,
            llm = %request.llm,
            "Creating remote task"
        );

        let response = builder
            .send()
            .await
            .map_err(|e| transport_error("task creation", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), "Task API rejected task creation");
            return Err(DietAgentError::RemoteSubmission {
                kind: kind_label(request),
                status: status.as_u16(),
                body: preview_body(&body),
            });
        }

        let task: Task = response
            .json()
            .await
            .map_err(|e| transport_error("task creation", e))?;
        tracing::info!(task_id = %task.id, "Remote task created");
        Ok(task)
    }

    async fn get_task(&self, task_id: &str) -> Result<Task, DietAgentError> {
        let response = self
            .authorized(self.client.get(format!("{}/tasks/{}", self.base_url, task_id)))?
            .send()
            .await
            .map_err(|e| DietAgentError::RemoteFetch {
                task_id: task_id.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DietAgentError::RemoteFetch {
                task_id: task_id.to_string(),
                message: format!("HTTP {}: {}", status, preview_body(&body)),
            });
        }

        response
            .json()
            .await
            .map_err(|e| DietAgentError::RemoteFetch {
                task_id: task_id.to_string(),
                message: format!("Failed to parse task: {}", e),
            })
    }

    async fn control_task(&self, task_id: &str, action: TaskAction) -> Result<(), DietAgentError> {
        let response = self
            .authorized(self.client.patch(format!("{}/tasks/{}", self.base_url, task_id)))?
            .json(&serde_json::json!({ "action": action }))
            .send()
            .await
            .map_err(|e| transport_error(&format!("task {}", action.as_str()), e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DietAgentError::RemoteControl {
                task_id: task_id.to_string(),
                status: status.as_u16(),
                body: preview_body(&body),
            });
        }

        tracing::info!(task_id, action = action.as_str(), "Task control accepted");
        Ok(())
    }
}
