// src/remote/completions.rs — LLM completion endpoint used by the chat assistant

use async_trait::async_trait;

use super::API_KEY_HEADER;
use crate::infra::errors::DietAgentError;

const MAX_TOKENS: u32 = 500;
const TEMPERATURE: f32 = 0.7;
pub const NO_REPLY: &str = "I'm sorry, I couldn't generate a response at this time.";

#[async_trait]
pub trait CompletionApi: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, DietAgentError>;
}

pub struct CompletionClient {
    api_key: String,
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl CompletionClient {
    pub fn new(api_key: String, base_url: String, model: String) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        }
    }
}

/// Pull the reply text out of a completion response: `choices[0].text`,
/// then `output`, then a fixed apology.
fn reply_text(resp: &serde_json::Value) -> String {
    resp["choices"][0]["text"]
        .as_str()
        .or_else(|| resp["output"].as_str())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(NO_REPLY)
        .to_string()
}

#[async_trait]
impl CompletionApi for CompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String, DietAgentError> {
        if self.api_key.trim().is_empty() {
            return Err(DietAgentError::CredentialMissing);
        }

        let body = serde_json::json!({
            "prompt": prompt,
            "max_tokens": MAX_TOKENS,
            "temperature": TEMPERATURE,
            "model": self.model,
        });

        let response = self
            .client
            .post(format!("{}/completions", self.base_url))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| DietAgentError::Transport {
                operation: "completion".into(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DietAgentError::Transport {
                operation: "completion".into(),
                message: format!("API request failed: HTTP {}", status),
            });
        }

        let resp: serde_json::Value =
            response.json().await.map_err(|e| DietAgentError::Transport {
                operation: "completion".into(),
                message: format!("Failed to parse response: {}", e),
            })?;

        Ok(reply_text(&resp))
    }
}
