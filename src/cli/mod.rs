// src/cli/mod.rs — CLI definition (clap derive)

pub mod cart;
pub mod chat;
pub mod history;
pub mod key;
pub mod plan;
pub mod progress;
pub mod render;
pub mod task;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use crate::core::DietAgent;
use crate::history::store::SqliteStore;
use crate::history::{History, HistoryCaps, HistoryKind};
use crate::infra::config::Config;
use crate::infra::paths;
use crate::onboarding::credentials::Credential;
use crate::remote::client::BrowserUseClient;
use crate::remote::completions::CompletionClient;

#[derive(Parser)]
#[command(
    name = "diet-agent",
    about = "Meal plans and grocery carts researched by a remote browser agent",
    version
)]
pub struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Suppress progress output (only emit final result)
    #[arg(long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a meal plan from a free-text request
    Plan {
        /// What you want, e.g. "vegetarian week for 4 people"
        #[arg(required = true, trailing_var_arg = true)]
        request: Vec<String>,
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
        /// Also write the plan JSON to this file
        #[arg(long)]
        save: Option<PathBuf>,
        /// Save every meal of the plan to recipe history
        #[arg(long)]
        keep_recipes: bool,
    },
    /// Build a priced shopping cart for a saved meal plan
    Cart {
        /// Meal plan JSON (as written by `plan --save`)
        #[arg(long)]
        plan: PathBuf,
        /// Supermarket to shop at
        #[arg(long)]
        store: String,
        #[arg(long, default_value = "United States")]
        country: String,
        /// Print the cart as JSON
        #[arg(long)]
        json: bool,
    },
    /// Interactive chat session
    Chat,
    /// Manage the Browser-Use API key
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },
    /// Inspect or control a remote task
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },
    /// Show or clear local history
    History {
        #[command(subcommand)]
        action: Option<HistoryAction>,
    },
}

#[derive(Subcommand, Clone)]
pub enum KeyAction {
    /// Save a key (must start with `bu_`)
    Set { key: String },
    /// Validate the configured key against the service
    Check,
}

#[derive(Subcommand, Clone)]
pub enum TaskAction {
    /// Show a task's status and output
    Status {
        id: String,
        #[arg(long)]
        json: bool,
    },
    Pause { id: String },
    Resume { id: String },
    Stop { id: String },
}

#[derive(Subcommand, Clone)]
pub enum HistoryAction {
    /// List recent entries
    List {
        kind: Option<HistoryKind>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Clear one kind of history, or everything
    Clear { kind: Option<HistoryKind> },
}

/// Everything a command needs, resolved once in `main`.
pub struct App {
    pub config: Config,
    pub credential: Option<Credential>,
    pub quiet: bool,
}

impl App {
    pub fn api_key(&self) -> Option<String> {
        self.credential.as_ref().map(|c| c.key.clone())
    }

    pub fn task_client(&self) -> anyhow::Result<Arc<BrowserUseClient>> {
        Ok(Arc::new(BrowserUseClient::from_config(
            &self.config.remote,
            self.api_key(),
        )?))
    }

    /// Agent wired to the real client, or `None` without a key.
    pub fn agent(&self) -> anyhow::Result<Option<DietAgent>> {
        if self.credential.is_none() {
            return Ok(None);
        }
        let client = self.task_client()?;
        Ok(Some(DietAgent::from_config(client, &self.config)))
    }

    pub fn completion_client(&self) -> Option<CompletionClient> {
        self.api_key().map(|key| {
            CompletionClient::new(
                key,
                self.config.remote.base_url.clone(),
                self.config.remote.llm.clone(),
            )
        })
    }

    pub fn open_history(&self) -> anyhow::Result<History> {
        let path = paths::history_db_path();
        let store = SqliteStore::open(&path)
            .with_context(|| format!("opening history at {}", path.display()))?;
        Ok(History::load(
            Box::new(store),
            HistoryCaps::from(&self.config.history),
        )?)
    }

    /// History is best-effort for generation commands: failures are logged.
    pub fn try_history(&self) -> Option<History> {
        match self.open_history() {
            Ok(h) => Some(h),
            Err(e) => {
                tracing::warn!("History unavailable: {:#}", e);
                None
            }
        }
    }
}
