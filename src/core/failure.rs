// src/core/failure.rs — Map final errors to user-facing failure text

use serde::Serialize;

use super::validate::PROSE_OUTPUT_PREFIX;
use crate::infra::errors::DietAgentError;

const CONSECUTIVE_STEP_FAILURES: &str = "consecutive step failures";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    Credential,
    Network,
    TemporaryService,
    DataFormat,
}

impl FailureCategory {
    pub fn classify(err: &DietAgentError) -> Self {
        match err {
            DietAgentError::CredentialMissing => FailureCategory::Credential,
            e if matches!(e.http_status(), Some(401 | 403)) => FailureCategory::Credential,
            DietAgentError::Transport { .. } | DietAgentError::RemoteFetch { .. } => {
                FailureCategory::Network
            }
            DietAgentError::OutputShape { message, .. }
                if !message.starts_with(PROSE_OUTPUT_PREFIX) =>
            {
                FailureCategory::DataFormat
            }
            _ => FailureCategory::TemporaryService,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FailureCategory::Credential => "credential",
            FailureCategory::Network => "network",
            FailureCategory::TemporaryService => "temporary_service",
            FailureCategory::DataFormat => "data_format",
        }
    }

    fn explanation(&self) -> &'static str {
        match self {
            FailureCategory::Credential => {
                "There seems to be an issue with the API key configuration. \
                 Please check your Browser-Use API key with `diet-agent key check`."
            }
            FailureCategory::Network => {
                "There was a network connectivity issue. \
                 Please check your internet connection and try again."
            }
            FailureCategory::TemporaryService => {
                "The AI agent task was unsuccessful. \
                 This could be due to complexity or temporary service limitations."
            }
            FailureCategory::DataFormat => {
                "There was a data formatting issue during processing. \
                 Please try rephrasing your request."
            }
        }
    }
}

impl std::fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A generation that ran out of attempts.
#[derive(Debug, Clone, Serialize)]
pub struct Failure {
    pub category: FailureCategory,
    pub user_message: String,
    /// Raw text of the last error, for diagnostics.
    pub detail: String,
    pub attempts: u32,
}

impl Failure {
    pub fn from_error(what: &str, err: &DietAgentError, attempts: u32) -> Self {
        let category = FailureCategory::classify(err);
        let detail = err.to_string();

        let mut user_message = format!(
            "I apologize, but I encountered an error while creating your {}. {}",
            what,
            category.explanation()
        );
        if detail.contains(CONSECUTIVE_STEP_FAILURES) {
            user_message
                .push_str(" Try simplifying your request or breaking it into smaller parts.");
        }
        user_message.push_str(" Please try again in a few moments.");

        Self {
            category,
            user_message,
            detail,
            attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::TaskStatus;

    #[test]
    fn test_classify_credential() {
        assert_eq!(
            FailureCategory::classify(&DietAgentError::CredentialMissing),
            FailureCategory::Credential
        );
        let unauthorized = DietAgentError::RemoteSubmission {
            kind: "meal plan".into(),
            status: 401,
            body: "bad key".into(),
        };
        assert_eq!(
            FailureCategory::classify(&unauthorized),
            FailureCategory::Credential
        );
    }

    #[test]
    fn test_classify_network() {
        let err = DietAgentError::Transport {
            operation: "create task".into(),
            message: "dns failure".into(),
        };
        assert_eq!(FailureCategory::classify(&err), FailureCategory::Network);
    }

    #[test]
    fn test_classify_temporary_service() {
        let cases = [
            DietAgentError::TaskTimeout {
                task_id: "t".into(),
                elapsed_secs: 301,
            },
            DietAgentError::TaskTerminal {
                task_id: "t".into(),
                status: TaskStatus::Failed,
                message: "boom".into(),
            },
            DietAgentError::RemoteSubmission {
                kind: "meal plan".into(),
                status: 503,
                body: "".into(),
            },
            DietAgentError::OutputShape {
                kind: "meal plan".into(),
                message: format!("{}: sorry", PROSE_OUTPUT_PREFIX),
            },
        ];
        for err in &cases {
            assert_eq!(
                FailureCategory::classify(err),
                FailureCategory::TemporaryService,
                "{err}"
            );
        }
    }

    #[test]
    fn test_classify_data_format() {
        let err = DietAgentError::OutputShape {
            kind: "meal plan".into(),
            message: "JSON parse error: EOF".into(),
        };
        assert_eq!(FailureCategory::classify(&err), FailureCategory::DataFormat);
    }

    #[test]
    fn test_failure_message_keeps_detail() {
        let err = DietAgentError::TaskTerminal {
            task_id: "t".into(),
            status: TaskStatus::Stopped,
            message: "Agent stopped because of consecutive step failures".into(),
        };
        let failure = Failure::from_error("meal plan", &err, 3);
        assert_eq!(failure.attempts, 3);
        assert_eq!(failure.category, FailureCategory::TemporaryService);
        assert!(failure.user_message.starts_with(
            "I apologize, but I encountered an error while creating your meal plan."
        ));
        assert!(failure.user_message.contains("Try simplifying your request"));
        assert!(failure.user_message.ends_with("Please try again in a few moments."));
        assert_eq!(
            failure.detail,
            "Task stopped: Agent stopped because of consecutive step failures"
        );
    }
}
