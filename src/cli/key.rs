// src/cli/key.rs — `diet-agent key`: store and check the Browser-Use API key

use super::{App, KeyAction};
use crate::onboarding::credentials::{save_api_key, validate_key_format};
use crate::onboarding::missing_key_hint;
use crate::remote::client::BrowserUseClient;

pub async fn run_key(app: &App, action: KeyAction) -> anyhow::Result<()> {
    match action {
        KeyAction::Set { key } => {
            let key = key.trim();
            validate_key_format(key)?;
            let path = save_api_key(key).await?;
            eprintln!("Saved API key to {}", path.display());

            let client = BrowserUseClient::from_config(&app.config.remote, Some(key.to_string()))?;
            report(&client).await
        }
        KeyAction::Check => {
            let Some(credential) = &app.credential else {
                anyhow::bail!("{}", missing_key_hint());
            };
            eprintln!("Using key from {}", credential.source);
            report(app.task_client()?.as_ref()).await
        }
    }
}

async fn report(client: &BrowserUseClient) -> anyhow::Result<()> {
    let validation = client.validate_api_key().await;
    if !validation.valid {
        anyhow::bail!(
            "API key rejected: {}",
            validation.error.as_deref().unwrap_or("unknown error")
        );
    }
    match validation.credits {
        Some(credits) => println!("API key is valid ({credits} credits remaining)"),
        None => println!("API key is valid"),
    }
    Ok(())
}
