// src/onboarding/credentials.rs — Browser-Use API key storage with filesystem permissions

use anyhow::Result;
use std::fs::Permissions;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use crate::infra::paths;

pub const API_KEY_ENV: &str = "BROWSER_USE_API_KEY";
pub const KEY_PREFIX: &str = "bu_";
const KEY_FILE: &str = "browser-use.key";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    EnvVar(&'static str),
    KeyFile(PathBuf),
}

impl std::fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialSource::EnvVar(var) => write!(f, "from {var}"),
            CredentialSource::KeyFile(path) => write!(f, "saved in {}", path.display()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub key: String,
    pub source: CredentialSource,
}

/// Keys are issued with a `bu_` prefix; anything else is a paste error.
pub fn validate_key_format(key: &str) -> Result<()> {
    let key = key.trim();
    if key.is_empty() {
        anyhow::bail!("API key is empty");
    }
    if !key.starts_with(KEY_PREFIX) {
        anyhow::bail!("Invalid API key format. Browser-Use API keys start with '{KEY_PREFIX}'");
    }
    Ok(())
}

pub fn key_path_in(dir: &Path) -> PathBuf {
    dir.join(KEY_FILE)
}

/// Save the key under `dir`. File is chmod 600, directory is chmod 700.
pub async fn save_api_key_in(dir: &Path, key: &str) -> Result<PathBuf> {
    validate_key_format(key)?;
    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::set_permissions(dir, Permissions::from_mode(0o700)).await?;

    let key_path = key_path_in(dir);
    tokio::fs::write(&key_path, key.trim()).await?;
    tokio::fs::set_permissions(&key_path, Permissions::from_mode(0o600)).await?;

    Ok(key_path)
}

pub async fn save_api_key(key: &str) -> Result<PathBuf> {
    save_api_key_in(&paths::credentials_dir(), key).await
}

pub async fn load_api_key_from(dir: &Path) -> Option<String> {
    tokio::fs::read_to_string(key_path_in(dir))
        .await
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Environment value first, then the saved key file.
pub async fn resolve_from(env_value: Option<String>, dir: &Path) -> Option<Credential> {
    if let Some(key) = env_value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        return Some(Credential {
            key,
            source: CredentialSource::EnvVar(API_KEY_ENV),
        });
    }
    let key = load_api_key_from(dir).await?;
    Some(Credential {
        key,
        source: CredentialSource::KeyFile(key_path_in(dir)),
    })
}

pub async fn resolve_api_key() -> Option<Credential> {
    resolve_from(std::env::var(API_KEY_ENV).ok(), &paths::credentials_dir()).await
}
