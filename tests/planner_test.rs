// tests/planner_test.rs — Integration test: free text to remote task request

use chrono::{Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;

use diet_agent::core::fallback::demo_meal_plan;
use diet_agent::planner::preferences::extract_preferences;
use diet_agent::planner::{TaskKind, TaskPayload};
use diet_agent::remote::DEFAULT_LLM;

#[test]
fn test_request_builder_is_pure_apart_from_timestamp() {
    let prefs = extract_preferences("Vegan plan for 3 people, 5 days, in Canada");
    let payload = TaskPayload::MealPlan {
        prompt: "Vegan plan for 3 people, 5 days, in Canada",
        preferences: Some(&prefs),
    };
    let t0 = Utc.with_ymd_and_hms(2026, 5, 1, 8, 0, 0).unwrap();

    let first = payload.to_request(DEFAULT_LLM, t0);
    let second = payload.to_request(DEFAULT_LLM, t0 + Duration::seconds(90));

    assert_eq!(first.task, second.task);
    assert_eq!(first.structured_output, second.structured_output);
    assert_eq!(first.metadata["preferences"], second.metadata["preferences"]);
    assert_ne!(first.metadata["timestamp"], second.metadata["timestamp"]);
    assert_eq!(first.metadata["timestamp"], "2026-05-01T08:00:00.000Z");
}

#[test]
fn test_extracted_preferences_reach_instruction() {
    let text = "High-protein meals for 2 people for 10 days, 2500 calories, budget $200";
    let prefs = extract_preferences(text);
    let request = TaskPayload::MealPlan {
        prompt: text,
        preferences: Some(&prefs),
    }
    .to_request(DEFAULT_LLM, Utc::now());

    assert!(request.task.contains("Days: 10"));
    assert!(request.task.contains("People: 2"));
    assert!(request.task.contains("Target Calories: 2500"));
    assert!(request.task.contains("Dietary Restrictions: high-protein"));
    assert_eq!(request.max_steps, TaskKind::MealPlan.max_steps());
}

#[test]
fn test_cart_request_names_store_and_plan() {
    let plan = demo_meal_plan(Some(2), Some(3));
    let request = TaskPayload::ShoppingCart {
        plan: &plan,
        supermarket: "Tesco",
        country: "United Kingdom",
    }
    .to_request(DEFAULT_LLM, Utc::now());

    assert_eq!(request.max_steps, 35);
    assert_eq!(request.max_llm_tokens, None);
    assert!(request.task.contains("Tesco"));
    assert!(request.task.contains("United Kingdom"));
    assert_eq!(request.metadata["mealPlanId"], "demo-meal-plan");
    assert_eq!(request.metadata["type"], "shopping_cart_generation");
}
