// src/infra/paths.rs — Path management
//
// All paths respect the DIET_AGENT_HOME environment variable for isolation.
// When DIET_AGENT_HOME is set, config and data live under that directory.
// When unset, config uses ~/.diet-agent/ and data uses XDG_DATA_HOME/diet-agent.

use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

/// Environment variable that relocates every path below.
pub const HOME_ENV: &str = "DIET_AGENT_HOME";

fn diet_agent_home() -> Option<PathBuf> {
    std::env::var_os(HOME_ENV).map(PathBuf::from)
}

/// Home directory, falling back to the working directory on systems without one.
pub fn dirs_home() -> PathBuf {
    BaseDirs::new()
        .map(|b| b.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Configuration directory: $DIET_AGENT_HOME/ or ~/.diet-agent/
pub fn config_dir() -> PathBuf {
    if let Some(home) = diet_agent_home() {
        return home;
    }
    dirs_home().join(".diet-agent")
}

/// Data directory: $DIET_AGENT_HOME/data/ or ~/.local/share/diet-agent/
pub fn data_dir() -> PathBuf {
    if let Some(home) = diet_agent_home() {
        return home.join("data");
    }
    ProjectDirs::from("", "", "diet-agent")
        .map(|p| p.data_local_dir().to_path_buf())
        .unwrap_or_else(|| config_dir().join("data"))
}

/// Config file path
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Credentials directory
pub fn credentials_dir() -> PathBuf {
    config_dir().join("credentials")
}

/// History database path
pub fn history_db_path() -> PathBuf {
    data_dir().join("history.db")
}

/// Ensure all required directories exist
pub async fn ensure_dirs() -> anyhow::Result<()> {
    for dir in [config_dir(), credentials_dir(), data_dir()] {
        tokio::fs::create_dir_all(&dir).await?;
    }
    Ok(())
}
