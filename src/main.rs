// src/main.rs — diet-agent entry point

use clap::Parser;

use diet_agent::cli::{self, App, Cli, Commands};
use diet_agent::infra::config::Config;
use diet_agent::infra::logger;

#[tokio::main]
async fn main() {
    // Initialize logging (respects RUST_LOG / DIET_AGENT_LOG)
    logger::init_logging("warn");

    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load config (falls back to defaults if no config.toml)
    let config = if let Some(ref path) = cli.config {
        Config::load_from(std::path::Path::new(path))?
    } else {
        Config::load()?
    };

    let credential = diet_agent::onboarding::ensure_ready().await?;
    let app = App {
        config,
        credential,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Plan {
            request,
            json,
            save,
            keep_recipes,
        } => {
            let request = request.join(" ");
            cli::plan::run_plan(&app, &request, json, save.as_deref(), keep_recipes).await
        }
        Commands::Cart {
            plan,
            store,
            country,
            json,
        } => cli::cart::run_cart(&app, &plan, &store, &country, json).await,
        Commands::Chat => cli::chat::run_chat(&app).await,
        Commands::Key { action } => cli::key::run_key(&app, action).await,
        Commands::Task { action } => cli::task::run_task(&app, action).await,
        Commands::History { action } => cli::history::run_history(&app, action),
    }
}
