// src/core/validate.rs — Turn a terminal task into a typed, checked output
//
// Order of checks: terminal failure, missing output, prose instead of JSON,
// JSON parse, then the type's own required-field validation.

use crate::infra::errors::DietAgentError;
use crate::planner::TaskOutput;
use crate::remote::Task;
use crate::util::truncate_str;

/// Prefix for outputs that are prose rather than JSON (usually an apology
/// or an error message from the remote agent).
pub const PROSE_OUTPUT_PREFIX: &str = "API returned error message";

const PROSE_PREVIEW_LIMIT: usize = 300;

pub fn parse_task_output<T: TaskOutput>(task: &Task) -> Result<T, DietAgentError> {
    if task.status.is_failure() {
        return Err(DietAgentError::TaskTerminal {
            task_id: task.id.clone(),
            status: task.status,
            message: task
                .error
                .clone()
                .unwrap_or_else(|| "Unknown error".to_string()),
        });
    }

    let output = task
        .output
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| DietAgentError::OutputMissing {
            task_id: task.id.clone(),
        })?;

    if !output.starts_with('{') && !output.starts_with('[') {
        return Err(shape_error::<T>(format!(
            "{}: {}",
            PROSE_OUTPUT_PREFIX,
            truncate_str(output, PROSE_PREVIEW_LIMIT)
        )));
    }

    let value: serde_json::Value = serde_json::from_str(output)
        .map_err(|e| shape_error::<T>(format!("JSON parse error: {}", e)))?;

    // Some agents wrap the object in a one-element array.
    let value = match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .next()
            .ok_or_else(|| shape_error::<T>("JSON array is empty".to_string()))?,
        other => other,
    };

    let parsed: T = serde_json::from_value(value).map_err(|e| {
        shape_error::<T>(format!("Incomplete {} data received: {}", T::KIND, e))
    })?;

    parsed.validate().map_err(|msg| {
        shape_error::<T>(format!("Incomplete {} data received: {}", T::KIND, msg))
    })?;

    Ok(parsed)
}

fn shape_error<T: TaskOutput>(message: String) -> DietAgentError {
    DietAgentError::OutputShape {
        kind: T::KIND.to_string(),
        message,
    }
}
