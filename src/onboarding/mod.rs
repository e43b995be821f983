// src/onboarding/mod.rs — First-run setup: directories and credential discovery

pub mod credentials;

use anyhow::Result;

use crate::infra::paths;
use credentials::{resolve_api_key, Credential, API_KEY_ENV};

/// Ensure the runtime directories exist and look for an API key.
/// Called on every invocation; cheap once set up.
pub async fn ensure_ready() -> Result<Option<Credential>> {
    paths::ensure_dirs().await?;

    let credential = resolve_api_key().await;
    match &credential {
        Some(c) => tracing::debug!(source = %c.source, "Browser-Use API key found"),
        None => tracing::debug!("No Browser-Use API key configured"),
    }
    Ok(credential)
}

/// Hint printed when a command needs a key and none is configured.
pub fn missing_key_hint() -> String {
    format!(
        "No Browser-Use API key found.\n  Set {API_KEY_ENV}, or run: diet-agent key set <KEY>\n  \
         Keys are available at https://cloud.browser-use.com"
    )
}
