// src/cli/render.rs — Plain-text rendering of plans, carts, and tasks

use std::fmt::Write;

use crate::chat::ChatReply;
use crate::planner::meal_plan::MealPlan;
use crate::planner::shopping_cart::ShoppingCart;
use crate::remote::Task;
use crate::util::{ellipsize, truncate_str};

const OUTPUT_PREVIEW: usize = 400;

pub fn meal_plan(plan: &MealPlan) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", plan.title);
    let _ = writeln!(out, "{}", plan.description);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "  {} days for {} people | Difficulty: {}",
        plan.days, plan.people, plan.difficulty
    );
    if let Some(cost) = &plan.estimated_cost {
        let _ = writeln!(
            out,
            "  Estimated cost: {} {:.0} - {:.0}",
            cost.currency, cost.min, cost.max
        );
    }
    if let Some(summary) = &plan.nutritional_summary {
        let _ = writeln!(
            out,
            "  Daily: {:.0} kcal, {:.0}g protein, {:.0}g carbs, {:.0}g fat",
            summary.daily_calories, summary.daily_protein, summary.daily_carbs, summary.daily_fat
        );
    }

    for (i, day) in plan.meals.iter().enumerate() {
        let number = if day.day > 0 { day.day } else { i as u32 + 1 };
        let _ = writeln!(out, "\nDay {}", number);
        for (slot, meal) in day.iter() {
            let time = meal
                .total_minutes()
                .map(|m| format!(" ({} min)", m))
                .unwrap_or_default();
            let _ = writeln!(out, "  {:<10} {}{}", slot, meal.name, time);
        }
    }

    if !plan.supermarkets.is_empty() {
        let names: Vec<&str> = plan.supermarkets.iter().map(|s| s.name.as_str()).collect();
        let _ = writeln!(out, "\nPriced at: {}", names.join(", "));
    }
    out
}

pub fn shopping_cart(cart: &ShoppingCart) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({}) - {} item(s)",
        cart.supermarket, cart.country, cart.total_items
    );
    for item in &cart.items {
        let _ = writeln!(
            out,
            "  {:<32} {:>12} {:>10.2}  {}",
            truncate_str(&item.name, 32),
            item.quantity,
            item.line_total(),
            item.product_url
        );
    }
    let _ = writeln!(out, "  Subtotal: {:.2} {}", cart.subtotal, cart.currency);
    if let Some(fee) = cart.delivery_fee {
        let _ = writeln!(out, "  Delivery: {:.2}", fee);
    }
    if let Some(tax) = cart.tax {
        let _ = writeln!(out, "  Tax: {:.2}", tax);
    }
    let _ = writeln!(out, "  Total: {:.2} {}", cart.grand_total, cart.currency);
    if let Some(eta) = &cart.estimated_delivery_time {
        let _ = writeln!(out, "  Delivery estimate: {}", eta);
    }
    out
}

pub fn task(task: &Task) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Task {}", task.id);
    let _ = writeln!(out, "  Status: {}", task.status);
    let _ = writeln!(out, "  Steps: {}", task.step_count());
    if let Some(created) = &task.created_at {
        let _ = writeln!(out, "  Created: {}", created);
    }
    if let Some(finished) = &task.finished_at {
        let _ = writeln!(out, "  Finished: {}", finished);
    }
    if let Some(error) = &task.error {
        let _ = writeln!(out, "  Error: {}", error);
    }
    if let Some(shots) = task.screenshots.as_ref().filter(|s| !s.is_empty()) {
        let _ = writeln!(out, "  Screenshots: {}", shots.len());
    }
    if let Some(gif) = &task.gif_url {
        let _ = writeln!(out, "  Recording: {}", gif);
    }
    if let Some(output) = &task.output {
        let _ = writeln!(out, "  Output: {}", ellipsize(output.trim(), OUTPUT_PREVIEW));
    }
    out
}

pub fn chat_reply(reply: &ChatReply) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", reply.message);
    if let Some(suggestions) = &reply.suggestions {
        for (i, s) in suggestions.iter().enumerate() {
            let _ = writeln!(out, "\n  {}. {} [{}]", i + 1, s.title, s.difficulty);
            let _ = writeln!(out, "     {}", s.description);
            let _ = writeln!(out, "     e.g. {}", s.sample_meals.join(", "));
        }
    }
    if !reply.next_questions.is_empty() {
        let _ = writeln!(out);
        for q in &reply.next_questions {
            let _ = writeln!(out, "  - {}", q);
        }
    }
    out
}
