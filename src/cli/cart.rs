// src/cli/cart.rs — `diet-agent cart`: price a saved meal plan at one supermarket

use std::path::Path;

use anyhow::Context;

use super::progress::TerminalProgress;
use super::{render, App};
use crate::core::Generation;
use crate::history::{NewPurchase, PurchaseStatus};
use crate::onboarding::missing_key_hint;
use crate::planner::meal_plan::MealPlan;
use crate::planner::shopping_cart::ShoppingCart;

pub async fn run_cart(
    app: &App,
    plan_path: &Path,
    supermarket: &str,
    country: &str,
    json: bool,
) -> anyhow::Result<()> {
    let plan = read_plan(plan_path).await?;

    let Some(agent) = app.agent()? else {
        anyhow::bail!("{}", missing_key_hint());
    };

    let progress = TerminalProgress::start(app.quiet);
    let cb = progress.callback();
    let generated = agent
        .generate_shopping_cart(&plan, supermarket, country, Some(&cb))
        .await;
    drop(cb);
    progress.finish().await;

    let mut history = app.try_history();
    match generated {
        Generation::Ready { value, task_id, .. } => {
            tracing::info!(task_id = %task_id, items = value.items.len(), "Shopping cart ready");
            if json {
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                print!("{}", render::shopping_cart(&value));
            }
            if let Some(history) = history.as_mut() {
                if let Err(e) = history.add_purchase(purchase_for(&plan, &value)) {
                    tracing::warn!("Failed to save purchase: {}", e);
                }
            }
            Ok(())
        }
        Generation::Failed(failure) => {
            if let Some(history) = history.as_mut() {
                let failed = NewPurchase {
                    plan: plan.title.clone(),
                    items: 0,
                    total: 0.0,
                    supermarket: Some(supermarket.to_string()),
                    status: PurchaseStatus::Failed,
                };
                if let Err(e) = history.add_purchase(failed) {
                    tracing::warn!("Failed to save purchase: {}", e);
                }
            }
            anyhow::bail!("{}", failure.user_message)
        }
    }
}

async fn read_plan(path: &Path) -> anyhow::Result<MealPlan> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading meal plan {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing meal plan {}", path.display()))
}

/// A built cart has not been checked out yet, so it is recorded as pending.
pub fn purchase_for(plan: &MealPlan, cart: &ShoppingCart) -> NewPurchase {
    NewPurchase {
        plan: plan.title.clone(),
        items: cart.total_items,
        total: cart.grand_total,
        supermarket: Some(cart.supermarket.clone()),
        status: PurchaseStatus::Pending,
    }
}
