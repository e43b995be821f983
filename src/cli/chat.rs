// src/cli/chat.rs — Interactive REPL

use std::sync::Arc;

use super::progress::TerminalProgress;
use super::{render, App};
use crate::chat::{is_meal_plan_request, ChatSession};
use crate::core::fallback::demo_meal_plan;
use crate::core::{DietAgent, Generation};
use crate::history::{History, HistoryMessage, NewChat};
use crate::onboarding::missing_key_hint;
use crate::planner::meal_plan::MealPlan;
use crate::planner::preferences::Preferences;
use crate::remote::completions::CompletionApi;

/// Run the interactive chat REPL.
pub async fn run_chat(app: &App) -> anyhow::Result<()> {
    let agent = app.agent()?;
    let completions = app
        .completion_client()
        .map(|c| Arc::new(c) as Arc<dyn CompletionApi>);
    let mut history = app.try_history();
    let mut session = ChatSession::new(completions);

    eprintln!(
        "diet-agent v{} | {} | type /help for commands\n",
        env!("CARGO_PKG_VERSION"),
        if agent.is_some() {
            "connected"
        } else {
            "offline (demo plans only)"
        },
    );
    eprintln!("Tell me about your diet goals, or ask for a meal plan.\n");

    while let Some(input) = read_input() {
        let trimmed = input.trim();

        if trimmed == "quit" || trimmed == "exit" || trimmed == "/quit" {
            break;
        }

        if trimmed.starts_with('/') {
            handle_slash_command(trimmed, &mut session);
            continue;
        }

        if trimmed.is_empty() {
            continue;
        }

        if is_meal_plan_request(trimmed) {
            let plan = plan_from_chat(app, agent.as_ref(), &mut session, trimmed).await;
            if let (Some(plan), Some(history)) = (plan, history.as_mut()) {
                save_conversation(history, trimmed, &plan, &session);
            }
        } else {
            let reply = session.send(trimmed).await;
            print!("{}", render::chat_reply(&reply));
        }
        println!();
    }

    Ok(())
}

/// Generate a plan using everything the session has learned so far.
/// Returns the plan only when it came from the agent, not the demo.
async fn plan_from_chat(
    app: &App,
    agent: Option<&DietAgent>,
    session: &mut ChatSession,
    message: &str,
) -> Option<MealPlan> {
    session.record_user(message);
    let preferences = session.profile().preferences.clone();
    let prefs = (!preferences.is_empty()).then_some(&preferences);

    let generated = match agent {
        Some(agent) => {
            let progress = TerminalProgress::start(app.quiet);
            let cb = progress.callback();
            let result = agent.generate_meal_plan(message, prefs, Some(&cb)).await;
            drop(cb);
            progress.finish().await;
            Some(result)
        }
        None => None,
    };

    match generated {
        Some(Generation::Ready { value, .. }) => {
            print!("{}", render::meal_plan(&value));
            session.record_assistant(format!("Here is your meal plan: {}", value.title));
            Some(value)
        }
        Some(Generation::Failed(failure)) => {
            println!("{}", failure.user_message);
            show_demo(session, &preferences);
            None
        }
        None => {
            println!("{}", missing_key_hint());
            show_demo(session, &preferences);
            None
        }
    }
}

fn show_demo(session: &mut ChatSession, preferences: &Preferences) {
    let demo = demo_meal_plan(preferences.people, preferences.days);
    println!("In the meantime, here is a sample plan:\n");
    print!("{}", render::meal_plan(&demo));
    session.record_assistant(format!("Here is a sample meal plan: {}", demo.title));
}

fn save_conversation(history: &mut History, query: &str, plan: &MealPlan, session: &ChatSession) {
    let messages: Vec<HistoryMessage> = session.messages().iter().map(HistoryMessage::from).collect();
    if let Err(e) = history.add_chat(NewChat {
        query: query.to_string(),
        plan: plan.title.clone(),
        messages: Some(messages),
    }) {
        tracing::warn!("Failed to save chat history: {}", e);
    }
}

fn read_input() -> Option<String> {
    use std::io::{self, BufRead, Write};

    print!("> ");
    io::stdout().flush().ok();

    let stdin = io::stdin();
    let mut line = String::new();
    match stdin.lock().read_line(&mut line) {
        Ok(0) => None, // EOF
        Ok(_) => Some(line),
        Err(_) => None,
    }
}

fn handle_slash_command(input: &str, session: &mut ChatSession) {
    let cmd = input.split_whitespace().next().unwrap_or(input);

    match cmd {
        "/prefs" => {
            let profile = session.profile();
            let prefs = &profile.preferences;
            let show = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());
            eprintln!("  People: {}", show(prefs.people.map(|n| n.to_string())));
            eprintln!("  Days: {}", show(prefs.days.map(|n| n.to_string())));
            eprintln!("  Calories: {}", show(prefs.calories.map(|n| n.to_string())));
            eprintln!("  Country: {}", show(prefs.country.clone()));
            eprintln!("  Budget: {}", show(prefs.budget.map(|n| n.to_string())));
            eprintln!("  Supermarket: {}", show(profile.supermarket.clone()));
            eprintln!(
                "  Dietary: {}",
                show(prefs.dietary_restrictions.as_ref().map(|d| d.join(", ")))
            );
        }

        "/reset" => {
            session.reset();
            eprintln!("  Conversation cleared.");
        }

        "/help" => {
            eprintln!("Slash commands:");
            eprintln!("  /prefs             Show what I know about your preferences");
            eprintln!("  /reset             Forget this conversation");
            eprintln!("  /help              Show this help");
            eprintln!("  /quit, quit, exit  End session");
        }

        _ => {
            eprintln!("Unknown command: {}. Type /help for commands.", cmd);
        }
    }
}
