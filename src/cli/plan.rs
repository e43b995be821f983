// src/cli/plan.rs — `diet-agent plan`: generate a meal plan, fall back to the demo

use std::path::Path;

use super::progress::TerminalProgress;
use super::{render, App};
use crate::core::fallback::demo_meal_plan;
use crate::core::{Failure, Generation};
use crate::infra::errors::DietAgentError;
use crate::history::{History, NewChat, NewRecipe, RecipeIngredient};
use crate::onboarding::missing_key_hint;
use crate::planner::meal_plan::{Ingredient, MealPlan};
use crate::planner::preferences::extract_preferences;

pub async fn run_plan(
    app: &App,
    request: &str,
    json: bool,
    save: Option<&Path>,
    keep_recipes: bool,
) -> anyhow::Result<()> {
    let preferences = extract_preferences(request);
    let prefs = (!preferences.is_empty()).then_some(&preferences);

    let generated = match app.agent()? {
        Some(agent) => {
            let progress = TerminalProgress::start(app.quiet);
            let cb = progress.callback();
            let result = agent.generate_meal_plan(request, prefs, Some(&cb)).await;
            drop(cb);
            progress.finish().await;
            result
        }
        None => {
            eprintln!("{}", missing_key_hint());
            Generation::Failed(Failure::from_error(
                "meal plan",
                &DietAgentError::CredentialMissing,
                0,
            ))
        }
    };

    let (plan, is_demo) = match generated {
        Generation::Ready {
            value,
            task_id,
            attempts,
        } => {
            tracing::info!(task_id = %task_id, attempts, "Meal plan ready");
            (value, false)
        }
        Generation::Failed(failure) => {
            eprintln!("{}", failure.user_message);
            eprintln!("Showing a demo meal plan instead.\n");
            (demo_meal_plan(preferences.people, preferences.days), true)
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print!("{}", render::meal_plan(&plan));
    }

    if let Some(path) = save {
        tokio::fs::write(path, serde_json::to_string_pretty(&plan)?).await?;
        eprintln!("Saved plan to {}", path.display());
    }

    if !is_demo {
        if let Some(mut history) = app.try_history() {
            record_plan(&mut history, request, &plan, keep_recipes);
        }
    }
    Ok(())
}

/// Store the request in chat history and, optionally, each meal as a recipe.
/// Write failures are logged, not returned.
pub fn record_plan(history: &mut History, request: &str, plan: &MealPlan, keep_recipes: bool) {
    if let Err(e) = history.add_chat(NewChat {
        query: request.to_string(),
        plan: plan.title.clone(),
        messages: None,
    }) {
        tracing::warn!("Failed to save chat history: {}", e);
    }

    if !keep_recipes {
        return;
    }
    for recipe in recipes_from_plan(plan) {
        if let Err(e) = history.add_recipe(recipe) {
            tracing::warn!("Failed to save recipe: {}", e);
            break;
        }
    }
}

pub fn recipes_from_plan(plan: &MealPlan) -> Vec<NewRecipe> {
    plan.meals
        .iter()
        .flat_map(|day| day.iter())
        .map(|(_, meal)| NewRecipe {
            title: meal.name.clone(),
            difficulty: plan.difficulty.clone(),
            cooking_time: meal
                .total_minutes()
                .map(|m| format!("{m} min"))
                .unwrap_or_else(|| "unknown".to_string()),
            rating: None,
            tags: meal.tags.clone(),
            plan_id: Some(plan.id.clone()),
            ingredients: (!meal.ingredients.is_empty()).then(|| {
                meal.ingredients
                    .iter()
                    .map(|i| RecipeIngredient {
                        item: i.name.clone(),
                        quantity: ingredient_quantity(i),
                    })
                    .collect()
            }),
            instructions: (!meal.instructions.is_empty()).then(|| meal.instructions.clone()),
        })
        .collect()
}

/// Quantity text for a recipe line; the unit is appended only when the
/// quantity doesn't already carry it ("1 cup" + "cup" stays "1 cup").
fn ingredient_quantity(i: &Ingredient) -> String {
    let quantity = i.quantity.trim();
    let unit = i.unit.trim();
    let carries_unit = quantity.strip_suffix(unit).is_some_and(|rest| {
        rest.chars()
            .last()
            .map_or(true, |c| c.is_whitespace() || c.is_ascii_digit())
    });
    if unit.is_empty() || carries_unit {
        quantity.to_string()
    } else {
        format!("{quantity} {unit}").trim().to_string()
    }
}
