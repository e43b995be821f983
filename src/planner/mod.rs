// src/planner/mod.rs — Request builders for the two remote task kinds
//
// Everything here is pure: the same input yields the same instruction text.
// Timestamps are passed in and only ever land in request metadata.

mod lenient;
pub mod meal_plan;
pub mod preferences;
pub mod shopping_cart;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Value};

use crate::remote::CreateTaskRequest;
use meal_plan::{build_meal_plan_instruction, meal_plan_schema, MealPlan};
use preferences::Preferences;
use shopping_cart::{build_shopping_cart_instruction, shopping_cart_schema};

/// Version of the output schemas sent with each task; bump on any change.
pub const SCHEMA_VERSION: u32 = 1;

/// Server-side time limit requested for every task.
pub const TASK_TIMEOUT_SECS: u64 = 300;

const METADATA_SOURCE: &str = "diet-agent";

/// A parsed task output that can check its own required fields.
pub trait TaskOutput: serde::de::DeserializeOwned {
    /// Human label used in error messages ("meal plan", "shopping cart").
    const KIND: &'static str;

    fn validate(&self) -> Result<(), String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    MealPlan,
    ShoppingCart,
}

impl TaskKind {
    pub fn max_steps(&self) -> u32 {
        match self {
            TaskKind::MealPlan => 25,
            TaskKind::ShoppingCart => 35,
        }
    }

    /// Token budget; only meal plans carry one.
    pub fn max_llm_tokens(&self) -> Option<u32> {
        match self {
            TaskKind::MealPlan => Some(4000),
            TaskKind::ShoppingCart => None,
        }
    }

    pub fn metadata_type(&self) -> &'static str {
        match self {
            TaskKind::MealPlan => "meal_plan_generation",
            TaskKind::ShoppingCart => "shopping_cart_generation",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskKind::MealPlan => "meal plan",
            TaskKind::ShoppingCart => "shopping cart",
        }
    }

    pub fn schema(&self) -> &'static Value {
        match self {
            TaskKind::MealPlan => meal_plan_schema(),
            TaskKind::ShoppingCart => shopping_cart_schema(),
        }
    }
}

/// Input for one task submission.
#[derive(Debug, Clone)]
pub enum TaskPayload<'a> {
    MealPlan {
        prompt: &'a str,
        preferences: Option<&'a Preferences>,
    },
    ShoppingCart {
        plan: &'a MealPlan,
        supermarket: &'a str,
        country: &'a str,
    },
}

impl TaskPayload<'_> {
    pub fn kind(&self) -> TaskKind {
        match self {
            TaskPayload::MealPlan { .. } => TaskKind::MealPlan,
            TaskPayload::ShoppingCart { .. } => TaskKind::ShoppingCart,
        }
    }

    pub fn instruction(&self) -> String {
        match self {
            TaskPayload::MealPlan {
                prompt,
                preferences,
            } => build_meal_plan_instruction(prompt, *preferences),
            TaskPayload::ShoppingCart {
                plan,
                supermarket,
                country,
            } => build_shopping_cart_instruction(plan, supermarket, country),
        }
    }

    fn metadata(&self, now: DateTime<Utc>) -> Value {
        let timestamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);
        let kind = self.kind();
        match self {
            TaskPayload::MealPlan { preferences, .. } => {
                let prefs = preferences
                    .map(|p| serde_json::to_string(p).unwrap_or_else(|_| "{}".into()))
                    .unwrap_or_else(|| "{}".into());
                json!({
                    "type": kind.metadata_type(),
                    "preferences": prefs,
                    "timestamp": timestamp,
                    "source": METADATA_SOURCE,
                    "schemaVersion": SCHEMA_VERSION,
                })
            }
            TaskPayload::ShoppingCart {
                plan,
                supermarket,
                country,
            } => json!({
                "type": kind.metadata_type(),
                "mealPlanId": plan.id,
                "supermarket": supermarket,
                "country": country,
                "timestamp": timestamp,
                "source": METADATA_SOURCE,
                "schemaVersion": SCHEMA_VERSION,
            }),
        }
    }

    /// Full `POST /tasks` body for this payload.
    pub fn to_request(&self, llm: &str, now: DateTime<Utc>) -> CreateTaskRequest {
        let kind = self.kind();
        CreateTaskRequest {
            task: self.instruction(),
            llm: llm.to_string(),
            max_steps: kind.max_steps(),
            max_llm_tokens: kind.max_llm_tokens(),
            structured_output: kind.schema().to_string(),
            timeout_seconds: TASK_TIMEOUT_SECS,
            metadata: self.metadata(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fallback::demo_meal_plan;
    use crate::remote::DEFAULT_LLM;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_meal_plan_request_limits_and_metadata() {
        let prefs = Preferences {
            people: Some(4),
            days: Some(7),
            ..Default::default()
        };
        let payload = TaskPayload::MealPlan {
            prompt: "vegetarian plan",
            preferences: Some(&prefs),
        };
        let req = payload.to_request(DEFAULT_LLM, fixed_now());

        assert_eq!(req.llm, "gemini-2.5-flash");
        assert_eq!(req.max_steps, 25);
        assert_eq!(req.max_llm_tokens, Some(4000));
        assert_eq!(req.timeout_seconds, 300);
        assert_eq!(req.metadata["type"], "meal_plan_generation");
        assert_eq!(req.metadata["preferences"], r#"{"people":4,"days":7}"#);
        assert_eq!(req.metadata["timestamp"], "2026-03-01T12:00:00.000Z");
        assert_eq!(req.metadata["schemaVersion"], 1);

        let schema: Value = serde_json::from_str(&req.structured_output).unwrap();
        assert_eq!(&schema, meal_plan_schema());
    }

    #[test]
    fn test_shopping_cart_request_has_no_token_budget() {
        let plan = demo_meal_plan(Some(2), Some(3));
        let payload = TaskPayload::ShoppingCart {
            plan: &plan,
            supermarket: "Kroger",
            country: "United States",
        };
        let req = payload.to_request(DEFAULT_LLM, fixed_now());

        assert_eq!(req.max_steps, 35);
        assert_eq!(req.max_llm_tokens, None);
        assert_eq!(req.metadata["type"], "shopping_cart_generation");
        assert_eq!(req.metadata["mealPlanId"], plan.id.as_str());
        assert_eq!(req.metadata["supermarket"], "Kroger");
    }

    #[test]
    fn test_timestamp_only_affects_metadata() {
        let payload = TaskPayload::MealPlan {
            prompt: "quick dinners",
            preferences: None,
        };
        let a = payload.to_request(DEFAULT_LLM, fixed_now());
        let b = payload.to_request(DEFAULT_LLM, fixed_now() + chrono::Duration::hours(1));
        assert_eq!(a.task, b.task);
        assert_ne!(a.metadata, b.metadata);
        assert_eq!(a.metadata["preferences"], "{}");
    }
}
